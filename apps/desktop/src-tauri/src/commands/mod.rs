//! Tauri commands exposed to the frontend.
//!
//! Commands that change what is on screen return the `SurfaceOp`s the
//! webview has to apply.

pub mod locale;
pub mod log;
pub mod quiz;

pub use locale::{get_language, set_language, translate};
pub use log::{change_log_page, show_error_log};
pub use quiz::{
    begin_drag, close_overlay, drop_item, end_drag, get_score, get_view, hover_box, leave_box,
    load_sample, load_taxonomy_text, open_detail, open_taxonomy_file, restart,
};

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct CommandError {
    pub message: String,
}

impl CommandError {
    pub fn poisoned(what: &str) -> Self {
        Self {
            message: format!("{what} lock poisoned"),
        }
    }
}

impl From<crate::db::DbError> for CommandError {
    fn from(e: crate::db::DbError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<std::io::Error> for CommandError {
    fn from(e: std::io::Error) -> Self {
        Self { message: e.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matchquiz_core::{QuizConfig, QuizSession, SurfaceOp};
    use pretty_assertions::assert_eq;

    #[test]
    fn command_error_serializes_as_message() {
        let json = serde_json::to_value(CommandError::poisoned("session")).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "session lock poisoned" }));
    }

    #[test]
    fn db_errors_convert() {
        let err = CommandError::from(crate::db::DbError::InvalidData("bad".into()));
        assert_eq!(err.message, "invalid data: bad");
    }

    #[test]
    fn drop_response_carries_tagged_ops() {
        let mut session = QuizSession::with_seed(QuizConfig::default(), 3);
        let mut ops: Vec<SurfaceOp> = Vec::new();
        session.load_sample(&mut ops);

        let response = quiz::DropResponse { verdict: None, ops };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["verdict"], serde_json::Value::Null);
        assert_eq!(json["ops"][0]["op"], "set_label");
    }
}

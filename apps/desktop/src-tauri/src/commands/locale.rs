//! Language Tauri commands.

use crate::db::PreferenceRepository;
use crate::state::AppState;
use matchquiz_core::{LocaleOrigin, SurfaceOp};
use tauri::State;

use super::CommandError;

#[derive(Debug, serde::Serialize)]
pub struct LanguageResponse {
    pub language: String,
    /// `None` when a newer switch overtook this one.
    pub origin: Option<LocaleOrigin>,
    pub ops: Vec<SurfaceOp>,
}

/// Switch the UI language. The session is not locked while the
/// translations are read, so the board stays usable meanwhile.
#[tauri::command]
pub async fn set_language(
    code: String,
    state: State<'_, AppState>,
) -> Result<LanguageResponse, CommandError> {
    let request = state.session()?.begin_language_switch(code.clone());
    let fetched = state.locales.fetch(&code).await;

    let mut ops: Vec<SurfaceOp> = Vec::new();
    let (origin, language) = {
        let mut session = state.session()?;
        let origin = session.complete_language_switch(request, fetched, &mut ops);
        (origin, session.language().to_string())
    };

    if origin.is_some() {
        if let Err(e) = state.repository()?.save_language(&code) {
            tracing::warn!(code = %code, error = %e, "language preference not saved");
        }
    }

    Ok(LanguageResponse {
        language,
        origin,
        ops,
    })
}

#[tauri::command]
pub async fn get_language(state: State<'_, AppState>) -> Result<String, CommandError> {
    Ok(state.session()?.language().to_string())
}

/// Text for `key` in the active language.
#[tauri::command]
pub async fn translate(key: String, state: State<'_, AppState>) -> Result<String, CommandError> {
    Ok(state.session()?.translate(&key))
}

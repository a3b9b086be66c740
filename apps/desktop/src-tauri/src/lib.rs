mod commands;
mod db;
mod locale;
mod state;

use commands::{
    begin_drag, change_log_page, close_overlay, drop_item, end_drag, get_language, get_score,
    get_view, hover_box, leave_box, load_sample, load_taxonomy_text, open_detail,
    open_taxonomy_file, restart, set_language, show_error_log, translate,
};
use db::{PreferenceRepository, SqliteRepository};
use locale::LocaleDirectory;
use matchquiz_core::{QuizConfig, QuizSession, SurfaceOp};
use state::AppState;
use std::path::PathBuf;
use tauri::{Emitter, Manager};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Event carrying `SurfaceOp`s the backend pushes without being asked.
pub const SURFACE_EVENT: &str = "surface";

fn get_db_path() -> PathBuf {
    // Use app data directory for production, fallback to current dir
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("matchquiz")
        .join("matchquiz.db")
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Start in the stored language, or the built-in one.
fn startup_config(repository: &SqliteRepository) -> QuizConfig {
    let mut config = QuizConfig::default();
    match repository.get_language() {
        Ok(Some(code)) => config.default_language = code,
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "ignoring stored language"),
    }
    config
}

/// Fetch translations for the startup language and push the repaint.
fn load_startup_language(app: tauri::AppHandle) {
    tauri::async_runtime::spawn(async move {
        let state = app.state::<AppState>();
        let (code, request) = {
            let Ok(mut session) = state.session() else {
                return;
            };
            let code = session.language().to_string();
            let request = session.begin_language_switch(code.clone());
            (code, request)
        };

        let fetched = state.locales.fetch(&code).await;

        let mut ops: Vec<SurfaceOp> = Vec::new();
        match state.session() {
            Ok(mut session) => {
                session.complete_language_switch(request, fetched, &mut ops);
            }
            Err(e) => {
                tracing::error!(error = %e.message, "startup language not applied");
                return;
            }
        }

        if let Err(e) = app.emit(SURFACE_EVENT, ops) {
            tracing::warn!(error = %e, "failed to push startup repaint");
        }
    });
}

fn try_run() -> anyhow::Result<()> {
    // Ensure data directory exists
    let db_path = get_db_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Open database
    let repository = SqliteRepository::open(&db_path)?;
    let config = startup_config(&repository);
    tracing::info!(db = %db_path.display(), language = %config.default_language, "starting");

    // The webview asks for a full repaint once it is up.
    let mut session = QuizSession::new(config);
    session.load_sample(&mut Vec::<SurfaceOp>::new());

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .setup(move |app| {
            let locales = LocaleDirectory::resolve(app.path().resource_dir().ok());
            tracing::info!(locales = %locales.root().display(), "translations directory");
            app.manage(AppState::new(session, repository, locales));
            load_startup_language(app.handle().clone());
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Board commands
            get_view,
            load_sample,
            load_taxonomy_text,
            open_taxonomy_file,
            restart,
            begin_drag,
            end_drag,
            hover_box,
            leave_box,
            drop_item,
            open_detail,
            close_overlay,
            get_score,
            // Error log commands
            show_error_log,
            change_log_page,
            // Language commands
            set_language,
            get_language,
            translate,
        ])
        .run(tauri::generate_context!())?;

    Ok(())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    init_tracing();

    if let Err(e) = try_run() {
        tracing::error!(error = %e, "matchquiz exited with an error");
        std::process::exit(1);
    }
}

//! Quiz board Tauri commands.

use crate::state::AppState;
use matchquiz_core::{BoxId, DropTarget, ItemId, ScoreState, SurfaceOp, Verdict};
use tauri::{AppHandle, State};
use tauri_plugin_dialog::DialogExt;

use super::CommandError;

#[derive(Debug, serde::Serialize)]
pub struct DropResponse {
    /// `None` when the drop was ignored.
    pub verdict: Option<Verdict>,
    pub ops: Vec<SurfaceOp>,
}

/// Full repaint of the current session.
#[tauri::command]
pub async fn get_view(state: State<'_, AppState>) -> Result<Vec<SurfaceOp>, CommandError> {
    let session = state.session()?;
    let mut ops: Vec<SurfaceOp> = Vec::new();
    session.render(&mut ops);
    Ok(ops)
}

/// Load the built-in sample taxonomy.
#[tauri::command]
pub async fn load_sample(state: State<'_, AppState>) -> Result<Vec<SurfaceOp>, CommandError> {
    let mut session = state.session()?;
    let mut ops: Vec<SurfaceOp> = Vec::new();
    session.load_sample(&mut ops);
    Ok(ops)
}

/// Load taxonomy JSON handed over by the webview (e.g. a dropped file).
/// Invalid content comes back as an alert op, not an error.
#[tauri::command]
pub async fn load_taxonomy_text(
    contents: String,
    state: State<'_, AppState>,
) -> Result<Vec<SurfaceOp>, CommandError> {
    let mut session = state.session()?;
    let mut ops: Vec<SurfaceOp> = Vec::new();
    if session.load_taxonomy(&contents, &mut ops).is_err() {
        tracing::debug!("taxonomy text rejected");
    }
    Ok(ops)
}

/// Ask the user for a taxonomy file and load it. Cancelling changes nothing.
#[tauri::command]
pub async fn open_taxonomy_file(
    app: AppHandle,
    state: State<'_, AppState>,
) -> Result<Vec<SurfaceOp>, CommandError> {
    let Some(picked) = app
        .dialog()
        .file()
        .add_filter("JSON", &["json"])
        .blocking_pick_file()
    else {
        return Ok(Vec::new());
    };

    let path = picked.into_path().map_err(|e| CommandError {
        message: e.to_string(),
    })?;
    tracing::info!(path = %path.display(), "opening taxonomy file");
    let contents = tokio::fs::read_to_string(&path).await?;

    let mut session = state.session()?;
    let mut ops: Vec<SurfaceOp> = Vec::new();
    if session.load_taxonomy(&contents, &mut ops).is_err() {
        tracing::debug!(path = %path.display(), "taxonomy file rejected");
    }
    Ok(ops)
}

/// Reset score and log and deal a fresh board.
#[tauri::command]
pub async fn restart(state: State<'_, AppState>) -> Result<Vec<SurfaceOp>, CommandError> {
    let mut session = state.session()?;
    let mut ops: Vec<SurfaceOp> = Vec::new();
    session.restart(&mut ops);
    Ok(ops)
}

// Drag commands are synchronous: they run on the main thread in the order
// the webview sends them.

/// A drag gesture started on `item`.
#[tauri::command]
pub fn begin_drag(item: ItemId, state: State<'_, AppState>) -> Result<bool, CommandError> {
    Ok(state.session()?.begin_drag(item))
}

/// The drag gesture ended, whether or not anything was dropped.
#[tauri::command]
pub fn end_drag(state: State<'_, AppState>) -> Result<(), CommandError> {
    state.session()?.end_drag();
    Ok(())
}

#[tauri::command]
pub fn hover_box(
    box_id: BoxId,
    state: State<'_, AppState>,
) -> Result<Vec<SurfaceOp>, CommandError> {
    let session = state.session()?;
    let mut ops: Vec<SurfaceOp> = Vec::new();
    session.hover_box(box_id, &mut ops);
    Ok(ops)
}

#[tauri::command]
pub fn leave_box(
    box_id: BoxId,
    state: State<'_, AppState>,
) -> Result<Vec<SurfaceOp>, CommandError> {
    let session = state.session()?;
    let mut ops: Vec<SurfaceOp> = Vec::new();
    session.leave_box(box_id, &mut ops);
    Ok(ops)
}

/// `item` released over `box_id`, or outside any box when absent. The whole
/// gesture resolves under one lock.
#[tauri::command]
pub fn drop_item(
    item: ItemId,
    box_id: Option<BoxId>,
    state: State<'_, AppState>,
) -> Result<DropResponse, CommandError> {
    let mut session = state.session()?;
    let mut ops: Vec<SurfaceOp> = Vec::new();
    let verdict = session.drop_item(item, DropTarget::from(box_id), &mut ops);
    Ok(DropResponse { verdict, ops })
}

/// Detail overlay for a placed item.
#[tauri::command]
pub async fn open_detail(
    item: ItemId,
    state: State<'_, AppState>,
) -> Result<Vec<SurfaceOp>, CommandError> {
    let mut session = state.session()?;
    let mut ops: Vec<SurfaceOp> = Vec::new();
    session.open_detail(item, &mut ops);
    Ok(ops)
}

/// The webview dismissed whatever overlay was showing.
#[tauri::command]
pub fn close_overlay(state: State<'_, AppState>) -> Result<(), CommandError> {
    state.session()?.close_overlay();
    Ok(())
}

#[tauri::command]
pub async fn get_score(state: State<'_, AppState>) -> Result<ScoreState, CommandError> {
    Ok(state.session()?.score())
}

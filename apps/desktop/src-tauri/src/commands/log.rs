//! Wrong-answer log Tauri commands.

use crate::state::AppState;
use matchquiz_core::SurfaceOp;
use tauri::State;

use super::CommandError;

/// Show the current page of the error log.
#[tauri::command]
pub async fn show_error_log(state: State<'_, AppState>) -> Result<Vec<SurfaceOp>, CommandError> {
    let mut session = state.session()?;
    let mut ops: Vec<SurfaceOp> = Vec::new();
    session.show_error_log(&mut ops);
    Ok(ops)
}

/// Move to `page`. Out-of-range pages return no ops.
#[tauri::command]
pub async fn change_log_page(
    page: usize,
    state: State<'_, AppState>,
) -> Result<Vec<SurfaceOp>, CommandError> {
    let mut session = state.session()?;
    let mut ops: Vec<SurfaceOp> = Vec::new();
    session.change_log_page(page, &mut ops);
    Ok(ops)
}

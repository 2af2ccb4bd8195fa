//! Session Store commands.

use tauri::State;

use crate::controller::ViewSnapshot;
use crate::AppState;

use super::{CommandError, CommandResult};

/// Delete a saved session. The frontend asks for confirmation before
/// invoking this; on failure the history list is left untouched.
#[tauri::command]
pub async fn delete_session(
    state: State<'_, AppState>,
    session_id: String,
) -> CommandResult<ViewSnapshot> {
    let controller = state.controller.clone();
    controller.delete_session(&session_id).await.map_err(|e| {
        log::error!("Delete session error: {}", e);
        CommandError::new("Failed to delete session.")
    })
}

//! Login, registration, logout and startup restore.

use tauri::State;

use crate::backend::BackendError;
use crate::controller::{ControllerError, ViewSnapshot};
use crate::AppState;

use super::{CommandError, CommandResult};

const AUTH_FALLBACK_MESSAGE: &str = "Login/Register failed";

fn auth_error(err: ControllerError) -> CommandError {
    // Surface the server-provided message when there is one.
    match err {
        ControllerError::Backend(BackendError::AuthFailed(message)) => CommandError::new(message),
        other => {
            log::error!("Auth error: {}", other);
            CommandError::new(AUTH_FALLBACK_MESSAGE)
        }
    }
}

/// Restore persisted credentials and reload state. Called once when the
/// frontend mounts; never fails (failures are logged).
#[tauri::command]
pub async fn startup(state: State<'_, AppState>) -> CommandResult<ViewSnapshot> {
    let controller = state.controller.clone();
    controller.startup().await;
    Ok(controller.snapshot())
}

#[tauri::command]
pub async fn login(
    state: State<'_, AppState>,
    username: String,
    password: String,
) -> CommandResult<ViewSnapshot> {
    let controller = state.controller.clone();
    controller
        .authenticate(&username, &password, false)
        .await
        .map_err(auth_error)
}

#[tauri::command]
pub async fn register(
    state: State<'_, AppState>,
    username: String,
    password: String,
) -> CommandResult<ViewSnapshot> {
    let controller = state.controller.clone();
    controller
        .authenticate(&username, &password, true)
        .await
        .map_err(auth_error)
}

#[tauri::command]
pub fn logout(state: State<AppState>) -> CommandResult<ViewSnapshot> {
    state.controller.logout().map_err(|e| {
        log::error!("Logout error: {}", e);
        CommandError::new("Failed to log out")
    })
}

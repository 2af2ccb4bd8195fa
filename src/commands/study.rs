//! Generation, history browsing and per-card interaction commands.

use tauri::State;

use crate::controller::{ControllerError, SessionSummary, ViewSnapshot};
use crate::study::CardKey;
use crate::AppState;

use super::{CommandError, CommandResult};

/// Generate flashcards and a quiz from the pasted notes. The prior
/// result is kept when the generator returns garbage.
#[tauri::command]
pub async fn generate_study_content(
    state: State<'_, AppState>,
    input: String,
) -> CommandResult<ViewSnapshot> {
    let controller = state.controller.clone();
    controller.generate(input).await.map_err(|e| match e {
        ControllerError::Parse(err) => {
            log::error!("Generation parse error: {}", err);
            CommandError::new("AI returned invalid JSON. Try again.")
        }
        other => {
            log::error!("Generation error: {}", other);
            CommandError::new("AI returned invalid JSON. Try again.")
        }
    })
}

/// Current view model for the frontend.
#[tauri::command]
pub fn get_snapshot(state: State<AppState>) -> CommandResult<ViewSnapshot> {
    Ok(state.controller.snapshot())
}

/// Show a previously saved session from the history panel.
#[tauri::command]
pub fn open_session(state: State<AppState>, session_id: String) -> CommandResult<ViewSnapshot> {
    state
        .controller
        .open_session(&session_id)
        .map_err(|e| CommandError::new(e.to_string()))
}

/// Case-insensitive title search over the fetched history, recomputed on
/// every keystroke. Order is preserved.
#[tauri::command]
pub fn search_history(state: State<AppState>, query: String) -> CommandResult<Vec<SessionSummary>> {
    Ok(state.controller.filter_history(&query))
}

#[tauri::command]
pub fn select_quiz_option(
    state: State<AppState>,
    key: CardKey,
    option: String,
) -> CommandResult<ViewSnapshot> {
    Ok(state.controller.select_option(key, option))
}

#[tauri::command]
pub fn toggle_show_answer(state: State<AppState>, key: CardKey) -> CommandResult<ViewSnapshot> {
    Ok(state.controller.toggle_show_answer(key))
}

#[tauri::command]
pub fn toggle_flashcard_flip(state: State<AppState>, key: CardKey) -> CommandResult<ViewSnapshot> {
    Ok(state.controller.toggle_flip(key))
}

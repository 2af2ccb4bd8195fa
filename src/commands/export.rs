//! PDF export commands. Each renders fully in memory and only then
//! writes to the target path, so a failed render never leaves a partial
//! file behind.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use tauri::State;

use crate::pdf::export::{
    export_flashcards, export_quiz, export_study_book, flashcards_filename, quiz_filename,
    ExportArtifact, ExportError, STUDY_BOOK_FILENAME,
};
use crate::AppState;

use super::{CommandError, CommandResult};

/// Suggested filenames for the save dialog, derived from the current
/// input text.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFilenames {
    pub flashcards: String,
    pub quiz: String,
    pub study_book: String,
}

#[tauri::command]
pub fn suggested_export_filenames(state: State<AppState>) -> CommandResult<ExportFilenames> {
    let content = state.controller.current_result().unwrap_or_default();
    Ok(ExportFilenames {
        flashcards: flashcards_filename(&content),
        quiz: quiz_filename(&content),
        study_book: STUDY_BOOK_FILENAME.to_string(),
    })
}

fn write_artifact(artifact: ExportArtifact, path: &str) -> CommandResult<String> {
    let path = PathBuf::from(path);
    fs::write(&path, &artifact.bytes).map_err(|e| {
        log::error!("Failed to write {:?}: {}", path, e);
        CommandError::new("Failed to save PDF file.")
    })?;
    Ok(path.to_string_lossy().to_string())
}

fn export_failure(err: ExportError, generic: &str) -> CommandError {
    match err {
        ExportError::Render(message) => {
            log::error!("PDF render error: {}", message);
            CommandError::new(generic)
        }
        // Empty-input errors carry their exact user-facing message.
        other => CommandError::new(other.to_string()),
    }
}

/// Export the current result's flashcards to `path`.
#[tauri::command]
pub fn export_flashcards_pdf(state: State<AppState>, path: String) -> CommandResult<String> {
    let content = state
        .controller
        .current_result()
        .ok_or_else(|| CommandError::new("No flashcards to export."))?;
    let artifact = export_flashcards(&content)
        .map_err(|e| export_failure(e, "Failed to download flashcards PDF."))?;
    write_artifact(artifact, &path)
}

/// Export the current result's quiz to `path`.
#[tauri::command]
pub fn export_quiz_pdf(state: State<AppState>, path: String) -> CommandResult<String> {
    let content = state
        .controller
        .current_result()
        .ok_or_else(|| CommandError::new("No quiz to export."))?;
    let artifact = export_quiz(&content).map_err(|e| export_failure(e, "PDF export failed."))?;
    write_artifact(artifact, &path)
}

/// Export every saved session as one study book to `path`.
#[tauri::command]
pub fn export_study_book_pdf(state: State<AppState>, path: String) -> CommandResult<String> {
    let history = state.controller.history();
    let artifact = export_study_book(&history)
        .map_err(|e| export_failure(e, "Failed to generate study book PDF."))?;
    write_artifact(artifact, &path)
}

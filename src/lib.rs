use std::path::PathBuf;
use std::sync::Arc;

mod auth;
mod backend;
mod commands;
mod controller;
mod pdf;
mod study;

use auth::CredentialStore;
use backend::{BackendClient, BackendConfig};
use controller::AppController;

pub struct AppState {
    pub controller: Arc<AppController>,
    pub data_dir: PathBuf,
}

/// Application data directory (config + credential store).
fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("studycoach"))
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let data_dir = default_data_dir().expect("Failed to get data directory");

    let config = BackendConfig::load(&data_dir);
    let client =
        BackendClient::new(config.base_url.clone()).expect("Failed to build backend client");
    let credentials = CredentialStore::new(data_dir.clone());

    let state = AppState {
        controller: Arc::new(AppController::new(client, credentials)),
        data_dir,
    };

    tauri::Builder::default()
        .manage(state)
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            if cfg!(debug_assertions) {
                app.handle().plugin(
                    tauri_plugin_log::Builder::default()
                        .level(log::LevelFilter::Info)
                        .build(),
                )?;
            }
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Auth commands
            commands::startup,
            commands::login,
            commands::register,
            commands::logout,
            // Study commands
            commands::generate_study_content,
            commands::get_snapshot,
            commands::open_session,
            commands::search_history,
            commands::select_quiz_option,
            commands::toggle_show_answer,
            commands::toggle_flashcard_flip,
            // Session commands
            commands::delete_session,
            // Settings commands
            commands::get_backend_url,
            commands::set_backend_url,
            // Export commands
            commands::suggested_export_filenames,
            commands::export_flashcards_pdf,
            commands::export_quiz_pdf,
            commands::export_study_book_pdf,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

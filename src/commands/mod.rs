mod auth;
mod export;
mod session;
mod settings;
mod study;

pub use auth::*;
pub use export::*;
pub use session::*;
pub use settings::*;
pub use study::*;

/// Error shape surfaced to the frontend; `message` is what the alert
/// shows verbatim.
#[derive(Debug, serde::Serialize)]
pub struct CommandError {
    pub message: String,
}

impl CommandError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

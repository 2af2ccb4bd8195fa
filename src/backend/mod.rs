pub mod client;
pub mod config;

pub use client::{BackendClient, BackendError};
pub use config::BackendConfig;

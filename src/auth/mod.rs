pub mod credentials;

pub use credentials::{AuthContext, CredentialError, CredentialStore};

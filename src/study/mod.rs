pub mod models;
pub mod parse;
pub mod title;

pub use models::*;
pub use parse::{parse_generator_response, ParseError};
pub use title::{derive_title, sanitize_filename_stem};

//! Client-side PDF generation.
//!
//! A [`document::PaginationDocument`] describes what to print (title plus
//! ordered sections of styled text blocks); [`layout`] wraps and paginates
//! it into positioned lines, and [`writer`] materializes the pages as PDF
//! bytes. The export adapters in [`export`] build documents from study
//! content and saved-session history.

pub mod document;
pub mod export;
pub mod layout;
pub mod metrics;
pub mod writer;

pub use document::{DocSection, Font, PageConfig, PaginationDocument, TextBlock, TextStyle};
pub use export::{export_flashcards, export_quiz, export_study_book, ExportArtifact, ExportError};

//! Export adapters: build a `PaginationDocument` from study content or
//! saved-session history and render it to PDF bytes.

use thiserror::Error;

use crate::study::{sanitize_filename_stem, Session, StudyContent};

use super::document::{DocSection, PageConfig, PaginationDocument, TextBlock, TextStyle};
use super::layout::layout;
use super::writer::write_pdf;

const FILENAME_STEM_MAX: usize = 40;
const ANSWER_INDENT_PT: f64 = 14.0;
const CORRECT_GREEN: (u8, u8, u8) = (34, 139, 34);

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No flashcards to export.")]
    NoFlashcards,
    #[error("No quiz to export.")]
    NoQuiz,
    #[error("No saved sessions found.")]
    NoSessions,
    #[error("PDF rendering failed: {0}")]
    Render(String),
}

/// A rendered export: final bytes plus the filename to offer the user.
pub struct ExportArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

fn render(doc: &PaginationDocument, config: &PageConfig) -> Result<Vec<u8>, ExportError> {
    let pages = layout(doc, config);
    write_pdf(&pages, config).map_err(ExportError::Render)
}

fn topic_title(input_text: &str, fallback: &str) -> String {
    let trimmed = input_text.trim();
    let topic = if trimmed.is_empty() { fallback } else { trimmed };
    format!("Topic: {}", topic)
}

/// Suggested filename for the flashcards export of the given content.
pub fn flashcards_filename(content: &StudyContent) -> String {
    format!(
        "{}-Flashcards.pdf",
        sanitize_filename_stem(&content.input_text, FILENAME_STEM_MAX)
    )
}

/// Suggested filename for the quiz export of the given content.
pub fn quiz_filename(content: &StudyContent) -> String {
    format!(
        "{}-Quiz.pdf",
        sanitize_filename_stem(&content.input_text, FILENAME_STEM_MAX)
    )
}

pub const STUDY_BOOK_FILENAME: &str = "Study-Book.pdf";

fn flashcard_blocks(content: &StudyContent, numbered_prefix: bool) -> Vec<TextBlock> {
    let normal = TextStyle::normal(12.0);
    let mut blocks = Vec::new();
    for (i, card) in content.flashcards.iter().enumerate() {
        if numbered_prefix {
            blocks.push(TextBlock::new(
                normal,
                format!("Q{}: {}", i + 1, card.question),
            ));
            blocks.push(TextBlock::indented(
                normal,
                ANSWER_INDENT_PT,
                format!("A{}: {}", i + 1, card.answer),
            ));
        } else {
            blocks.push(TextBlock::new(
                normal,
                format!(
                    "Flashcard {}\nQ: {}\nA: {}",
                    i + 1,
                    card.question,
                    card.answer
                ),
            ));
        }
    }
    blocks
}

/// Render the current result's flashcards as a single-session PDF.
pub fn export_flashcards(content: &StudyContent) -> Result<ExportArtifact, ExportError> {
    if content.flashcards.is_empty() {
        return Err(ExportError::NoFlashcards);
    }

    let doc = PaginationDocument {
        title: topic_title(&content.input_text, "Untitled Notes"),
        sections: vec![DocSection {
            heading: "Flashcards".to_string(),
            heading_style: TextStyle::bold(14.0),
            blocks: flashcard_blocks(content, true),
        }],
    };

    let config = PageConfig::letter_single();
    Ok(ExportArtifact {
        filename: flashcards_filename(content),
        bytes: render(&doc, &config)?,
    })
}

fn quiz_blocks(content: &StudyContent, compact: bool) -> Vec<TextBlock> {
    let normal = TextStyle::normal(12.0);
    let mut blocks = Vec::new();
    for (i, q) in content.quiz.iter().enumerate() {
        if compact {
            let options = q
                .options
                .iter()
                .map(|o| format!("- {}", o))
                .collect::<Vec<_>>()
                .join("\n");
            blocks.push(TextBlock::new(
                normal,
                format!(
                    "Q{}: {}\nOptions:\n{}\nAnswer: {}",
                    i + 1,
                    q.question,
                    options,
                    q.answer
                ),
            ));
        } else {
            blocks.push(TextBlock::new(normal, format!("{}. {}", i + 1, q.question)));
            for option in &q.options {
                blocks.push(TextBlock::indented(
                    normal,
                    ANSWER_INDENT_PT,
                    format!("\u{2022} {}", option),
                ));
            }
            // Emphasis carries its own full style; the next question's
            // block starts from the plain style again.
            blocks.push(TextBlock::new(
                TextStyle::bold(12.0).with_color(CORRECT_GREEN),
                format!("Correct Answer: {}", q.answer),
            ));
        }
    }
    blocks
}

/// Render the current result's quiz as a single-session PDF.
pub fn export_quiz(content: &StudyContent) -> Result<ExportArtifact, ExportError> {
    if content.quiz.is_empty() {
        return Err(ExportError::NoQuiz);
    }

    let doc = PaginationDocument {
        title: topic_title(&content.input_text, "Study Notes"),
        sections: vec![DocSection {
            heading: "Quiz".to_string(),
            heading_style: TextStyle::bold(14.0),
            blocks: quiz_blocks(content, false),
        }],
    };

    let config = PageConfig::letter_single();
    Ok(ExportArtifact {
        filename: quiz_filename(content),
        bytes: render(&doc, &config)?,
    })
}

/// Render every saved session into one "study book" PDF, in fetch order.
pub fn export_study_book(history: &[Session]) -> Result<ExportArtifact, ExportError> {
    if history.is_empty() {
        return Err(ExportError::NoSessions);
    }

    let label = TextStyle::bold(14.0);
    let sections = history
        .iter()
        .enumerate()
        .map(|(i, session)| {
            let heading = if session.title.trim().is_empty() {
                format!("Session {}", i + 1)
            } else {
                session.title.trim().to_string()
            };

            let mut blocks = Vec::new();
            if !session.content.flashcards.is_empty() {
                blocks.push(TextBlock::new(label, "Flashcards:"));
                blocks.extend(flashcard_blocks(&session.content, false));
            }
            if !session.content.quiz.is_empty() {
                blocks.push(TextBlock::new(label, "Quiz:"));
                blocks.extend(quiz_blocks(&session.content, true));
            }

            DocSection {
                heading,
                heading_style: TextStyle::bold(16.0),
                blocks,
            }
        })
        .collect();

    let doc = PaginationDocument {
        title: "Study Book".to_string(),
        sections,
    };

    let config = PageConfig::a4_study_book();
    Ok(ExportArtifact {
        filename: STUDY_BOOK_FILENAME.to_string(),
        bytes: render(&doc, &config)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::study::{Flashcard, QuizQuestion};

    fn sample_content() -> StudyContent {
        StudyContent {
            flashcards: vec![Flashcard {
                question: "What is the powerhouse of the cell?".to_string(),
                answer: "The mitochondrion".to_string(),
            }],
            quiz: vec![QuizQuestion {
                question: "Which molecule stores energy?".to_string(),
                options: vec!["ATP".to_string(), "DNA".to_string(), "RNA".to_string()],
                answer: "ATP".to_string(),
            }],
            input_text: "Cell biology: organelles & energy!".to_string(),
        }
    }

    fn sample_session(title: &str) -> Session {
        Session {
            id: "abc".to_string(),
            title: title.to_string(),
            input_text: String::new(),
            content: sample_content(),
            created_at: 1_700_000_000,
        }
    }

    #[test]
    fn test_flashcards_export_produces_pdf() {
        let artifact = export_flashcards(&sample_content()).unwrap();
        assert!(artifact.bytes.starts_with(b"%PDF"));
        assert_eq!(artifact.filename, "Cell biology organelles  energy-Flashcards.pdf");
    }

    #[test]
    fn test_quiz_export_produces_pdf() {
        let artifact = export_quiz(&sample_content()).unwrap();
        assert!(artifact.bytes.starts_with(b"%PDF"));
        assert!(artifact.filename.ends_with("-Quiz.pdf"));
    }

    #[test]
    fn test_empty_flashcards_rejected_without_bytes() {
        let content = StudyContent {
            flashcards: vec![],
            ..sample_content()
        };
        match export_flashcards(&content) {
            Err(ExportError::NoFlashcards) => {}
            other => panic!("expected NoFlashcards, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_empty_quiz_rejected() {
        let content = StudyContent {
            quiz: vec![],
            ..sample_content()
        };
        assert!(matches!(export_quiz(&content), Err(ExportError::NoQuiz)));
    }

    #[test]
    fn test_empty_history_rejected() {
        assert!(matches!(export_study_book(&[]), Err(ExportError::NoSessions)));
    }

    #[test]
    fn test_filename_fallback_for_empty_input() {
        let mut content = sample_content();
        content.input_text = "??!!".to_string();
        assert_eq!(flashcards_filename(&content), "Notes-Flashcards.pdf");
        assert_eq!(quiz_filename(&content), "Notes-Quiz.pdf");
    }

    #[test]
    fn test_study_book_session_heading_fallback() {
        let sessions = vec![sample_session(""), sample_session("Krebs Cycle")];
        let artifact = export_study_book(&sessions).unwrap();
        assert_eq!(artifact.filename, STUDY_BOOK_FILENAME);
        assert!(artifact.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_export_is_deterministic() {
        let content = sample_content();
        let a = export_quiz(&content).unwrap();
        let b = export_quiz(&content).unwrap();
        assert_eq!(a.bytes, b.bytes);
    }
}

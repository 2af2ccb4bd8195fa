//! Data models for generated study content and persisted sessions

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single question/answer card. Order within the list is significant:
/// it drives both display and export order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}

/// A multiple-choice question. `answer` is expected to match one of
/// `options` verbatim; mismatches are logged at ingestion but kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub answer: String,
}

/// The structured payload produced by the Content Generator, plus the
/// original input text injected by the controller after parsing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudyContent {
    #[serde(default)]
    pub flashcards: Vec<Flashcard>,
    #[serde(default)]
    pub quiz: Vec<QuizQuestion>,
    #[serde(default)]
    pub input_text: String,
}

impl StudyContent {
    pub fn is_empty(&self) -> bool {
        self.flashcards.is_empty() && self.quiz.is_empty()
    }
}

/// A persisted session as returned by the Session Store. The client only
/// ever holds read-through copies; edits go through generate + save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub input_text: String,
    pub content: StudyContent,
    /// Unix timestamp in seconds.
    #[serde(default)]
    pub created_at: i64,
}

/// Which list a card belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardKind {
    Flashcard,
    Quiz,
}

/// Stable identifier for a card within the currently loaded result.
/// Assigned when the result is attached and immutable for its lifetime,
/// so interaction state survives any later reordering or filtering of
/// the display list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardKey {
    pub kind: CardKind,
    pub index: usize,
}

impl CardKey {
    pub fn flashcard(index: usize) -> Self {
        Self {
            kind: CardKind::Flashcard,
            index,
        }
    }

    pub fn quiz(index: usize) -> Self {
        Self {
            kind: CardKind::Quiz,
            index,
        }
    }
}

/// Transient per-card UI state. Never persisted; reset whenever a new
/// result is loaded or generated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardInteraction {
    pub selected: Option<String>,
    pub show_answer: bool,
    pub flipped: bool,
}

pub type InteractionMap = HashMap<CardKey, CardInteraction>;

//! crates/studydesk_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format
//! beyond the serde derives the quiz-question column encoding needs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Generates a fresh opaque record id.
///
/// Collisions would only ever be cosmetic (two list rows rendering the same
/// key), so a v4 uuid is more than strong enough.
pub fn new_record_id() -> Uuid {
    Uuid::new_v4()
}

/// The six course buckets documents are filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Course {
    #[serde(rename = "Anatomic Pathology")]
    AnatomicPathology,
    #[serde(rename = "Chemical Pathology")]
    ChemicalPathology,
    #[serde(rename = "Hematology")]
    Hematology,
    #[serde(rename = "Microbiology")]
    Microbiology,
    #[serde(rename = "Pharmacology")]
    Pharmacology,
    #[serde(rename = "General Medicine")]
    General,
}

impl Course {
    pub const ALL: [Course; 6] = [
        Course::AnatomicPathology,
        Course::ChemicalPathology,
        Course::Hematology,
        Course::Microbiology,
        Course::Pharmacology,
        Course::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Course::AnatomicPathology => "Anatomic Pathology",
            Course::ChemicalPathology => "Chemical Pathology",
            Course::Hematology => "Hematology",
            Course::Microbiology => "Microbiology",
            Course::Pharmacology => "Pharmacology",
            Course::General => "General Medicine",
        }
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Course {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Course::ALL
            .into_iter()
            .find(|course| course.as_str() == s)
            .ok_or_else(|| format!("unknown course '{}'", s))
    }
}

/// What kind of file a document wraps: a primary document (pdf) or a
/// slide deck (pptx).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    #[serde(rename = "pdf")]
    Pdf,
    #[serde(rename = "pptx")]
    SlideDeck,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::SlideDeck => "pptx",
        }
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(DocumentKind::Pdf),
            "pptx" => Ok(DocumentKind::SlideDeck),
            other => Err(format!("unknown document kind '{}'", other)),
        }
    }
}

/// A document uploaded into a course bucket.
///
/// `id` and `added_at` are set once at creation and never change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub name: String,
    pub course: Course,
    /// The raw file bytes, as uploaded.
    pub data: Vec<u8>,
    pub kind: DocumentKind,
    pub added_at: DateTime<Utc>,
    /// Filled in by the reader once the file has been rendered at least once.
    pub page_count: Option<u32>,
}

impl Document {
    pub fn new(name: impl Into<String>, course: Course, data: Vec<u8>, kind: DocumentKind) -> Self {
        Self {
            id: new_record_id(),
            name: name.into(),
            course,
            data,
            kind,
            added_at: Utc::now(),
            page_count: None,
        }
    }
}

/// A sticky note attached to one page (or slide) of a document.
///
/// Edits replace the whole record by `id`; `created_at` is preserved across
/// edits rather than tracking last modification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub document_id: Uuid,
    /// 1-based page number; for slide decks this is the slide index.
    pub page_number: u32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Note {
    pub fn new(document_id: Uuid, page_number: u32, content: impl Into<String>) -> Self {
        Self {
            id: new_record_id(),
            document_id,
            page_number,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// One multiple-choice question inside a quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// 1-based, reassigned sequentially at ingestion so ids never collide.
    pub id: u32,
    pub question: String,
    /// Always exactly four options; enforced at the generator boundary.
    pub options: Vec<String>,
    /// Index into `options`, 0–3.
    pub correct_answer: usize,
    pub explanation: String,
}

/// A generated quiz for one document.
///
/// The question list is fixed at creation. The only mutation a quiz ever
/// sees is recording `score` and `completed_at`, exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: Uuid,
    pub document_id: Uuid,
    pub questions: Vec<QuizQuestion>,
    /// Percentage 0–100, set at completion.
    pub score: Option<f32>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Quiz {
    pub fn new(document_id: Uuid, questions: Vec<QuizQuestion>) -> Self {
        Self {
            id: new_record_id(),
            document_id,
            questions,
            score: None,
            completed_at: None,
            created_at: Utc::now(),
        }
    }
}

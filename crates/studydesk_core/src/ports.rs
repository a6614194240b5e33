//! crates/studydesk_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Document, Note, Quiz, QuizQuestion};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    /// A durable read or write failed. The repository absorbs these: they
    /// are logged, never surfaced, never retried.
    #[error("Storage unavailable: {0}")]
    Storage(String),
    /// The remote quiz generator failed, returned nothing, or returned a
    /// payload that could not be coerced to the question schema.
    #[error("Quiz generation failed: {0}")]
    Generation(String),
    /// The slide-deck bytes were not a valid archive of the expected shape.
    #[error("Slide extraction failed: {0}")]
    Extraction(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Durable storage for the three record kinds, each in its own collection
/// keyed by record id, with a secondary non-unique index on `document_id`
/// for notes and quizzes.
///
/// Every `put` is insert-or-replace and idempotent; every `delete` is a
/// no-op when the key does not exist. Operations may fail independently;
/// the store itself never retries.
#[async_trait]
pub trait RecordStore: Send + Sync {
    // --- Documents ---
    async fn put_document(&self, document: &Document) -> PortResult<()>;
    async fn get_all_documents(&self) -> PortResult<Vec<Document>>;
    async fn delete_document(&self, id: Uuid) -> PortResult<()>;

    // --- Notes ---
    async fn put_note(&self, note: &Note) -> PortResult<()>;
    async fn get_all_notes(&self) -> PortResult<Vec<Note>>;
    async fn delete_note(&self, id: Uuid) -> PortResult<()>;
    /// Secondary-index lookup of every note attached to one document.
    async fn notes_for_document(&self, document_id: Uuid) -> PortResult<Vec<Note>>;

    // --- Quizzes ---
    async fn put_quiz(&self, quiz: &Quiz) -> PortResult<()>;
    async fn get_all_quizzes(&self) -> PortResult<Vec<Quiz>>;
    async fn delete_quiz(&self, id: Uuid) -> PortResult<()>;
    /// Secondary-index lookup of every quiz attached to one document.
    async fn quizzes_for_document(&self, document_id: Uuid) -> PortResult<Vec<Quiz>>;
}

#[async_trait]
pub trait SlideTextExtraction: Send + Sync {
    /// Extracts one plain-text string per slide, in slide order.
    async fn extract_slide_text(&self, deck: &[u8]) -> PortResult<Vec<String>>;
}

#[async_trait]
pub trait QuizGeneration: Send + Sync {
    /// Generates `question_count` multiple-choice questions from `text`.
    /// Each question carries exactly four options and a valid 0–3 correct
    /// answer index; question ids are 1-based and sequential.
    async fn generate_questions(
        &self,
        text: &str,
        question_count: usize,
    ) -> PortResult<Vec<QuizQuestion>>;
}

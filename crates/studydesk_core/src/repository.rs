//! crates/studydesk_core/src/repository.rs
//!
//! The in-memory repository: the single source of truth for the running
//! session. It mediates every read and write between the (out-of-scope)
//! view layer and the durable store, and owns the navigation state.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use crate::domain::{Course, Document, Note, Quiz};
use crate::ports::{PortResult, RecordStore};
use crate::view::ViewState;

//=========================================================================================
// The Repository
//=========================================================================================

/// The authoritative in-memory state for one session.
///
/// Constructed once at startup and passed by handle to every consumer;
/// there is no ambient global. Mutations are optimistic: memory is updated
/// synchronously and the durable write is dispatched fire-and-forget. A
/// failed write is logged and never rolled back, so the cache stays
/// authoritative for the session at the cost of at-most-once durability.
pub struct Repository {
    store: Arc<dyn RecordStore>,
    /// Sorted by `added_at` descending. Fully re-sorted only at load time;
    /// new documents are prepended, which preserves the order because they
    /// always carry the newest timestamp.
    documents: Vec<Document>,
    notes: Vec<Note>,
    quizzes: Vec<Quiz>,
    view: ViewState,
    loading: bool,
}

impl Repository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            documents: Vec::new(),
            notes: Vec::new(),
            quizzes: Vec::new(),
            view: ViewState::Dashboard,
            loading: true,
        }
    }

    /// Bulk-loads all records from the durable store.
    ///
    /// The three reads run in parallel. A failed read logs the error and
    /// leaves that collection empty rather than blocking the other two;
    /// the load is not all-or-nothing. Collections are installed and the
    /// loading flag flipped in one synchronous step, so no caller ever
    /// observes a partially populated state.
    pub async fn load(&mut self) {
        let (documents, notes, quizzes) = tokio::join!(
            self.store.get_all_documents(),
            self.store.get_all_notes(),
            self.store.get_all_quizzes(),
        );

        let mut documents = documents.unwrap_or_else(|err| {
            warn!(error = %err, "failed to load documents");
            Vec::new()
        });
        documents.sort_by(|a, b| b.added_at.cmp(&a.added_at));

        self.documents = documents;
        self.notes = notes.unwrap_or_else(|err| {
            warn!(error = %err, "failed to load notes");
            Vec::new()
        });
        self.quizzes = quizzes.unwrap_or_else(|err| {
            warn!(error = %err, "failed to load quizzes");
            Vec::new()
        });
        self.loading = false;
    }

    // --- Mutations ---

    /// Adds a freshly uploaded document to the front of the catalog.
    /// File-type validation is the upload handler's job; none happens here.
    pub fn add_document(&mut self, document: Document) {
        self.documents.insert(0, document.clone());
        let store = Arc::clone(&self.store);
        self.persist("document", document.id, async move {
            store.put_document(&document).await
        });
    }

    /// Removes a document and, in memory, every note and quiz attached to
    /// it. Durably only the document row is deleted; orphaned note and
    /// quiz rows stay on disk with no parent to render under.
    pub fn delete_document(&mut self, id: Uuid) {
        self.documents.retain(|d| d.id != id);
        self.notes.retain(|n| n.document_id != id);
        self.quizzes.retain(|q| q.document_id != id);
        let store = Arc::clone(&self.store);
        self.persist("document delete", id, async move {
            store.delete_document(id).await
        });
    }

    pub fn add_note(&mut self, note: Note) {
        self.notes.push(note.clone());
        let store = Arc::clone(&self.store);
        self.persist("note", note.id, async move { store.put_note(&note).await });
    }

    /// Replaces the note with the same id, value for value. An unknown id
    /// leaves memory untouched; the durable put is issued regardless.
    pub fn update_note(&mut self, note: Note) {
        if let Some(existing) = self.notes.iter_mut().find(|n| n.id == note.id) {
            *existing = note.clone();
        }
        let store = Arc::clone(&self.store);
        self.persist("note", note.id, async move { store.put_note(&note).await });
    }

    pub fn add_quiz(&mut self, quiz: Quiz) {
        self.quizzes.push(quiz.clone());
        let store = Arc::clone(&self.store);
        self.persist("quiz", quiz.id, async move { store.put_quiz(&quiz).await });
    }

    /// Records the result of a completed quiz: sets the score and stamps
    /// `completed_at`. An unknown id is a silent no-op.
    pub fn update_quiz_score(&mut self, id: Uuid, score: f32) {
        let Some(quiz) = self.quizzes.iter_mut().find(|q| q.id == id) else {
            return;
        };
        quiz.score = Some(score);
        quiz.completed_at = Some(Utc::now());
        let updated = quiz.clone();
        let store = Arc::clone(&self.store);
        self.persist("quiz", id, async move { store.put_quiz(&updated).await });
    }

    /// Replaces the current view unconditionally. Whether the referenced
    /// entity exists is the view layer's problem.
    pub fn navigate(&mut self, view: ViewState) {
        self.view = view;
    }

    // --- Reads ---

    /// True until the startup load has finished; gates presentation.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// All documents, newest first.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn quizzes(&self) -> &[Quiz] {
        &self.quizzes
    }

    pub fn document(&self, id: Uuid) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn quiz(&self, id: Uuid) -> Option<&Quiz> {
        self.quizzes.iter().find(|q| q.id == id)
    }

    pub fn documents_for_course(&self, course: Course) -> Vec<&Document> {
        self.documents.iter().filter(|d| d.course == course).collect()
    }

    /// Notes on one page of one document, in insertion order.
    pub fn notes_for_page(&self, document_id: Uuid, page_number: u32) -> Vec<&Note> {
        self.notes
            .iter()
            .filter(|n| n.document_id == document_id && n.page_number == page_number)
            .collect()
    }

    // --- Persistence plumbing ---

    /// Dispatches a durable write without awaiting it. Failure is logged
    /// and swallowed; the in-memory state is already the source of truth.
    fn persist(
        &self,
        what: &'static str,
        id: Uuid,
        op: impl Future<Output = PortResult<()>> + Send + 'static,
    ) {
        tokio::spawn(async move {
            if let Err(err) = op.await {
                warn!(error = %err, %id, "failed to persist {}", what);
            }
        });
    }
}

//=========================================================================================
// Tests
//=========================================================================================

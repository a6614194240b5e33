//! crates/studydesk_core/src/view.rs
//!
//! The navigation state: a tagged value describing which screen is
//! currently presented. Owned by the repository, consumed by the
//! (out-of-scope) rendering layer.

use crate::domain::Course;
use uuid::Uuid;

/// Whether a quiz screen is being taken or reviewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizMode {
    Take,
    Result,
}

/// The current view. Transitions are unconditional replacement; there is no
/// history stack, and no validation that a referenced entity exists — the
/// view layer renders a missing-entity state instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Dashboard,
    Course { course: Course },
    Reader { document_id: Uuid },
    Quiz { quiz_id: Uuid, mode: QuizMode },
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::Dashboard
    }
}

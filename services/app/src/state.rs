//! services/app/src/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use std::sync::Arc;
use studydesk_core::ports::{QuizGeneration, SlideTextExtraction};
use studydesk_core::Repository;

/// The shared application state, created once at startup and handed to the
/// presentation layer. The repository is the single source of truth for
/// session data; the adapters are the collaborators it is wired to.
pub struct AppState {
    pub config: Arc<Config>,
    pub repository: Repository,
    pub extractor: Arc<dyn SlideTextExtraction>,
    /// `None` when no API key is configured; the generate action is then
    /// unavailable while everything else keeps working.
    pub generator: Option<Arc<dyn QuizGeneration>>,
}

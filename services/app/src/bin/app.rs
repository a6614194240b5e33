//! services/app/src/bin/app.rs

use app_lib::{
    adapters::{quiz_llm::OpenAiQuizAdapter, slides::PptxExtractor, store::SqliteStore},
    config::Config,
    error::AppError,
    state::AppState,
};
use async_openai::{config::OpenAIConfig, Client};
use std::sync::Arc;
use studydesk_core::ports::{QuizGeneration, RecordStore, SlideTextExtraction};
use studydesk_core::Repository;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting studydesk...");

    // --- 2. Open the Durable Store ---
    info!("Opening database at {}", config.database_path.display());
    let store: Arc<dyn RecordStore> = Arc::new(SqliteStore::open(&config.database_path).await?);

    // --- 3. Initialize Collaborator Adapters ---
    let extractor: Arc<dyn SlideTextExtraction> = Arc::new(PptxExtractor);
    let generator: Option<Arc<dyn QuizGeneration>> = config.openai_api_key.as_ref().map(|key| {
        let client = Client::with_config(OpenAIConfig::new().with_api_key(key));
        Arc::new(OpenAiQuizAdapter::new(
            client,
            config.quiz_model.clone(),
            config.max_context_chars,
        )) as Arc<dyn QuizGeneration>
    });
    if generator.is_none() {
        info!("OPENAI_API_KEY not set; quiz generation is disabled");
    }

    // --- 4. Build the Repository & Load Session State ---
    let mut repository = Repository::new(store);
    repository.load().await;
    info!(
        documents = repository.documents().len(),
        notes = repository.notes().len(),
        quizzes = repository.quizzes().len(),
        "Session state loaded"
    );

    // --- 5. Hand Off to the Presentation Layer ---
    // The rendering layer is a separate component; this state is its handle
    // onto everything it needs.
    let _state = AppState {
        config,
        repository,
        extractor,
        generator,
    };

    Ok(())
}

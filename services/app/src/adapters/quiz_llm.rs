//! services/app/src/adapters/quiz_llm.rs
//!
//! This module contains the adapter for the quiz-generating LLM.
//! It implements the `QuizGeneration` port from the `core` crate.

const SYSTEM_INSTRUCTIONS: &str = r#"You are a strict medical professor creating an exam for medical students.
Based on the provided text content from a medical textbook or lecture, generate high-quality, difficult multiple-choice questions (MCQs).

Requirements:
1. Questions must be relevant to the text provided.
2. Provide exactly 4 options for each question.
3. Clearly mark the correct answer index (0-3) in the "correctAnswer" field.
4. Provide a short clinical explanation for the correct answer.

Respond with ONLY a JSON array, no prose. Each element must be an object with
the fields "id", "question", "options", "correctAnswer" and "explanation"."#;

const USER_INPUT_TEMPLATE: &str = r#"Generate {count} multiple-choice questions from this source text:

"{text}""#;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use studydesk_core::{
    domain::QuizQuestion,
    ports::{PortError, PortResult, QuizGeneration},
};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `QuizGeneration` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiQuizAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    max_context_chars: usize,
}

impl OpenAiQuizAdapter {
    /// Creates a new `OpenAiQuizAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String, max_context_chars: usize) -> Self {
        Self {
            client,
            model,
            max_context_chars,
        }
    }
}

//=========================================================================================
// The Trust Boundary: Wire Shapes and Ingestion
//=========================================================================================

/// One question as the remote model returns it. `correctAnswer` arrives
/// untyped; coercion to a concrete index happens in `ingest`. The model's
/// own `id` field, when present, is ignored and reassigned.
#[derive(Debug, serde::Deserialize)]
struct RawQuestion {
    question: String,
    options: Vec<String>,
    #[serde(rename = "correctAnswer")]
    correct_answer: serde_json::Value,
    explanation: String,
}

/// Validates the remote payload and produces the typed question list,
/// reassigning ids 1-based sequentially so they never collide.
fn ingest(raw: Vec<RawQuestion>) -> PortResult<Vec<QuizQuestion>> {
    if raw.is_empty() {
        return Err(PortError::Generation(
            "the model returned no questions".to_string(),
        ));
    }
    raw.into_iter()
        .enumerate()
        .map(|(idx, q)| {
            if q.options.len() != 4 {
                return Err(PortError::Generation(format!(
                    "question {} has {} options, expected 4",
                    idx + 1,
                    q.options.len()
                )));
            }
            let correct = coerce_index(&q.correct_answer).ok_or_else(|| {
                PortError::Generation(format!(
                    "question {} has a non-numeric correctAnswer: {}",
                    idx + 1,
                    q.correct_answer
                ))
            })?;
            if correct > 3 {
                return Err(PortError::Generation(format!(
                    "question {} has correctAnswer {} out of range",
                    idx + 1,
                    correct
                )));
            }
            Ok(QuizQuestion {
                id: idx as u32 + 1,
                question: q.question,
                options: q.options,
                correct_answer: correct,
                explanation: q.explanation,
            })
        })
        .collect()
}

/// Accepts the integer and numeric-string encodings seen in the wild.
fn coerce_index(value: &serde_json::Value) -> Option<usize> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().map(|n| n as usize),
        serde_json::Value::String(s) => s.trim().parse::<usize>().ok(),
        _ => None,
    }
}

/// Models sometimes wrap the payload in a markdown code fence despite the
/// instructions; tolerate that.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

//=========================================================================================
// `QuizGeneration` Trait Implementation
//=========================================================================================

#[async_trait]
impl QuizGeneration for OpenAiQuizAdapter {
    /// Generates multiple-choice questions from page or slide text.
    async fn generate_questions(
        &self,
        text: &str,
        question_count: usize,
    ) -> PortResult<Vec<QuizQuestion>> {
        let context: String = text.chars().take(self.max_context_chars).collect();
        let user_input = USER_INPUT_TEMPLATE
            .replace("{count}", &question_count.to_string())
            .replace("{text}", &context);

        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| PortError::Generation(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_input)
                .build()
                .map_err(|e| PortError::Generation(e.to_string()))?
                .into(),
        ];

        // Lower temperature for more factual accuracy.
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(0.3)
            .n(1)
            .build()
            .map_err(|e| PortError::Generation(e.to_string()))?;

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Generation(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Generation(
                    "Quiz generation LLM response contained no text content.".to_string(),
                )
            })?;

        let raw: Vec<RawQuestion> = serde_json::from_str(strip_code_fence(&content))
            .map_err(|e| PortError::Generation(format!("unparseable quiz payload: {}", e)))?;
        ingest(raw)
    }
}

//=========================================================================================
// Tests
//=========================================================================================

//! services/app/src/quiz_task.rs
//!
//! Orchestrates quiz generation for one page or slide: the caller-side
//! precondition, the generator call, and assembly of the quiz record.

use studydesk_core::domain::Quiz;
use studydesk_core::ports::{PortError, PortResult, QuizGeneration};
use uuid::Uuid;

/// Pages with less text than this are rejected before the remote call;
/// the generator needs something to work with.
pub const MIN_SOURCE_TEXT_CHARS: usize = 10;

/// Generates a quiz from the text of one page or slide of a document.
///
/// Fails with a generation error when the text is too short, the remote
/// call errors, or the payload cannot be coerced to the question schema.
/// No partial quiz is ever produced; on success the caller hands the quiz
/// to the repository.
pub async fn generate_quiz(
    generator: &dyn QuizGeneration,
    document_id: Uuid,
    page_text: &str,
    question_count: usize,
) -> PortResult<Quiz> {
    if page_text.trim().chars().count() < MIN_SOURCE_TEXT_CHARS {
        return Err(PortError::Generation(
            "not enough text on this page to generate a quiz".to_string(),
        ));
    }
    let questions = generator.generate_questions(page_text, question_count).await?;
    Ok(Quiz::new(document_id, questions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use studydesk_core::domain::QuizQuestion;
    use studydesk_core::new_record_id;

    /// Counts calls and returns a canned question list.
    #[derive(Default)]
    struct StubGenerator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl QuizGeneration for StubGenerator {
        async fn generate_questions(
            &self,
            _text: &str,
            question_count: usize,
        ) -> PortResult<Vec<QuizQuestion>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((1..=question_count as u32)
                .map(|id| QuizQuestion {
                    id,
                    question: "?".to_string(),
                    options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    correct_answer: 0,
                    explanation: String::new(),
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn short_text_is_rejected_without_calling_the_generator() {
        let generator = StubGenerator::default();
        let err = generate_quiz(&generator, new_record_id(), "  tiny  ", 5)
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Generation(_)));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn builds_an_uncompleted_quiz_on_success() {
        let generator = StubGenerator::default();
        let document_id = new_record_id();
        let quiz = generate_quiz(&generator, document_id, "plenty of page text here", 5)
            .await
            .unwrap();
        assert_eq!(quiz.document_id, document_id);
        assert_eq!(quiz.questions.len(), 5);
        assert!(quiz.score.is_none());
        assert!(quiz.completed_at.is_none());
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn generator_failure_yields_no_quiz() {
        struct FailingGenerator;

        #[async_trait]
        impl QuizGeneration for FailingGenerator {
            async fn generate_questions(
                &self,
                _text: &str,
                _question_count: usize,
            ) -> PortResult<Vec<QuizQuestion>> {
                Err(PortError::Generation("quota exceeded".to_string()))
            }
        }

        let err = generate_quiz(&FailingGenerator, new_record_id(), "plenty of page text", 5)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }
}

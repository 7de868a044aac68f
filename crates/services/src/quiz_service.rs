use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use quiz_core::model::{Quiz, QuizError, QuizId};
use storage::repository::{QuizRepository, StorageError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error(transparent)]
    Invalid(#[from] QuizError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Authoring-side save/get/list over a [`QuizRepository`].
///
/// Host-authored quizzes are validated before they reach the store, so
/// everything loaded back satisfies the structural invariants without
/// another check.
pub struct QuizService {
    quizzes: Arc<dyn QuizRepository>,
}

impl QuizService {
    #[must_use]
    pub fn new(quizzes: Arc<dyn QuizRepository>) -> Self {
        Self { quizzes }
    }

    /// Validate and persist a quiz, returning its id.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Invalid` for a structurally invalid quiz,
    /// or `Storage` when persisting fails.
    pub async fn save_quiz(&self, quiz: &Quiz) -> Result<QuizId, QuizServiceError> {
        quiz.validate()?;
        let id = self.quizzes.save_quiz(quiz).await?;
        debug!(quiz_id = %id, "quiz saved");
        Ok(id)
    }

    /// Fetch a quiz by id.
    ///
    /// # Errors
    ///
    /// Returns `Storage(NotFound)` when no quiz has this id.
    pub async fn get_quiz(&self, id: &QuizId) -> Result<Quiz, QuizServiceError> {
        Ok(self.quizzes.get_quiz(id).await?)
    }

    /// All stored quizzes.
    ///
    /// # Errors
    ///
    /// Returns `Storage` on backend failure.
    pub async fn list_quizzes(&self) -> Result<Vec<Quiz>, QuizServiceError> {
        Ok(self.quizzes.list_quizzes().await?)
    }
}

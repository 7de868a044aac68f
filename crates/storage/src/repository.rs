use async_trait::async_trait;
use quiz_core::model::{Quiz, QuizId, StudentProgress, UserId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for authored quizzes.
///
/// Backends range from browser-local storage to a remote database; the core
/// crates never depend on a concrete one.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Persist or update a quiz, returning its id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the quiz cannot be stored.
    async fn save_quiz(&self, quiz: &Quiz) -> Result<QuizId, StorageError>;

    /// Fetch a quiz by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_quiz(&self, id: &QuizId) -> Result<Quiz, StorageError>;

    /// All stored quizzes.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure.
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, StorageError>;
}

/// Store contract for per-learner progress records.
///
/// The progress transition itself is a pure function in `quiz-core`; this
/// trait only loads and saves its input/output. When the backing store is
/// shared across tabs or processes, two concurrent read-compute-write cycles
/// on the same user can silently drop one update. Serializing those cycles
/// (a transaction around load-apply-save, or optimistic retry on a version
/// column) is the implementation's obligation, not the core's.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Fetch the progress record for a learner.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` for a learner with no record yet, or
    /// other storage errors.
    async fn load(&self, user_id: &UserId) -> Result<StudentProgress, StorageError>;

    /// Persist or update a progress record, keyed by its user id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save(&self, progress: &StudentProgress) -> Result<(), StorageError>;
}

/// Simple in-memory storage implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    quizzes: Arc<Mutex<HashMap<QuizId, Quiz>>>,
    progress: Arc<Mutex<HashMap<UserId, StudentProgress>>>,
}

impl InMemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self {
            quizzes: Arc::new(Mutex::new(HashMap::new())),
            progress: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl QuizRepository for InMemoryStorage {
    async fn save_quiz(&self, quiz: &Quiz) -> Result<QuizId, StorageError> {
        let mut guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(quiz.id.clone(), quiz.clone());
        Ok(quiz.id.clone())
    }

    async fn get_quiz(&self, id: &QuizId) -> Result<Quiz, StorageError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(id).cloned().ok_or(StorageError::NotFound)
    }

    async fn list_quizzes(&self) -> Result<Vec<Quiz>, StorageError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.values().cloned().collect())
    }
}

#[async_trait]
impl ProgressStore for InMemoryStorage {
    async fn load(&self, user_id: &UserId) -> Result<StudentProgress, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(user_id).cloned().ok_or(StorageError::NotFound)
    }

    async fn save(&self, progress: &StudentProgress) -> Result<(), StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(progress.user_id.clone(), progress.clone());
        Ok(())
    }
}

/// Aggregates both stores behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub quizzes: Arc<dyn QuizRepository>,
    pub progress: Arc<dyn ProgressStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let store = InMemoryStorage::new();
        let quizzes: Arc<dyn QuizRepository> = Arc::new(store.clone());
        let progress: Arc<dyn ProgressStore> = Arc::new(store);
        Self { quizzes, progress }
    }
}

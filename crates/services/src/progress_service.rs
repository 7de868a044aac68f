use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use quiz_core::model::{QuizId, StudentProgress, UserId};
use quiz_core::time::Clock;
use quiz_core::tracker;
use storage::repository::{ProgressStore, StorageError};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Applies the pure progress transition around a [`ProgressStore`].
///
/// Each call is one read-compute-write cycle: load (creating the lazy
/// zero-counter record for first-time learners), apply
/// [`tracker::record_attempt`], save. The cycle itself is not atomic — when
/// the store is shared across tabs or processes, two concurrent cycles for
/// the same user can lose one update. Stores that need that guarantee must
/// serialize the cycle (transaction or optimistic retry); this service
/// deliberately adds no locking of its own.
pub struct ProgressService {
    clock: Clock,
    store: Arc<dyn ProgressStore>,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, store: Arc<dyn ProgressStore>) -> Self {
        Self { clock, store }
    }

    /// Record a finished quiz session for a learner and persist the result.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` when the store fails to load
    /// or save; the transition itself cannot fail.
    pub async fn record_attempt(
        &self,
        user_id: UserId,
        quiz_id: QuizId,
        score: u8,
        total_questions: usize,
        answers: Vec<Option<usize>>,
        time_spent_secs: u32,
    ) -> Result<StudentProgress, ProgressServiceError> {
        let progress = match self.store.load(&user_id).await {
            Ok(existing) => existing,
            Err(StorageError::NotFound) => StudentProgress::new_for_user(user_id),
            Err(other) => return Err(other.into()),
        };
        let had_certificate = progress.certificate_earned;

        let updated = tracker::record_attempt(
            progress,
            quiz_id,
            score,
            total_questions,
            answers,
            time_spent_secs,
            self.clock.now(),
        );

        if updated.certificate_earned && !had_certificate {
            info!(user_id = %updated.user_id, streak = updated.streak_count, "certificate earned");
        }

        self.store.save(&updated).await?;
        Ok(updated)
    }

    /// Current progress for a learner; first-time learners get the lazy
    /// zero-counter record (not persisted until their first attempt).
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` on store failure other than
    /// `NotFound`.
    pub async fn progress_for(
        &self,
        user_id: &UserId,
    ) -> Result<StudentProgress, ProgressServiceError> {
        match self.store.load(user_id).await {
            Ok(existing) => Ok(existing),
            Err(StorageError::NotFound) => Ok(StudentProgress::new_for_user(user_id.clone())),
            Err(other) => Err(other.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::time::fixed_now;
    use storage::repository::InMemoryStorage;

    fn service_at(clock: Clock) -> (ProgressService, Arc<InMemoryStorage>) {
        let store = Arc::new(InMemoryStorage::new());
        (
            ProgressService::new(clock, Arc::clone(&store) as Arc<dyn ProgressStore>),
            store,
        )
    }

    #[tokio::test]
    async fn first_attempt_creates_and_persists_progress() {
        let (service, store) = service_at(Clock::fixed(fixed_now()));
        let user = UserId::new("student-1");

        let updated = service
            .record_attempt(user.clone(), QuizId::new("quiz-a"), 80, 4, vec![Some(0)], 95)
            .await
            .unwrap();

        assert_eq!(updated.streak_count, 1);
        assert_eq!(updated.completed_days, 1);

        let persisted = store.load(&user).await.unwrap();
        assert_eq!(persisted, updated);
    }

    #[tokio::test]
    async fn consecutive_days_accumulate_through_the_store() {
        let mut clock = Clock::fixed(fixed_now());
        let user = UserId::new("student-1");
        let store = Arc::new(InMemoryStorage::new());

        for day in 0..5 {
            let service =
                ProgressService::new(clock, Arc::clone(&store) as Arc<dyn ProgressStore>);
            service
                .record_attempt(
                    user.clone(),
                    QuizId::new(format!("quiz-{day}")),
                    100,
                    4,
                    vec![Some(0), Some(1), Some(2), Some(3)],
                    60,
                )
                .await
                .unwrap();
            clock.advance(Duration::days(1));
        }

        let persisted = store.load(&user).await.unwrap();
        assert_eq!(persisted.streak_count, 5);
        assert!(persisted.certificate_earned);
        assert_eq!(persisted.quiz_attempts.len(), 5);
    }

    struct FailingStore;

    #[async_trait::async_trait]
    impl ProgressStore for FailingStore {
        async fn load(&self, _user_id: &UserId) -> Result<StudentProgress, StorageError> {
            Err(StorageError::Connection("store offline".to_owned()))
        }

        async fn save(&self, _progress: &StudentProgress) -> Result<(), StorageError> {
            Err(StorageError::Connection("store offline".to_owned()))
        }
    }

    #[tokio::test]
    async fn store_failures_surface_as_service_errors() {
        let service = ProgressService::new(Clock::fixed(fixed_now()), Arc::new(FailingStore));
        let err = service
            .record_attempt(
                UserId::new("student-1"),
                QuizId::new("quiz-a"),
                50,
                2,
                vec![None, None],
                30,
            )
            .await;
        assert!(matches!(
            err,
            Err(ProgressServiceError::Storage(StorageError::Connection(_)))
        ));
    }

    #[tokio::test]
    async fn progress_for_unknown_user_is_lazy_zero_state() {
        let (service, _store) = service_at(Clock::fixed(fixed_now()));
        let progress = service.progress_for(&UserId::new("nobody")).await.unwrap();
        assert_eq!(progress.completed_days, 0);
        assert!(progress.quiz_attempts.is_empty());
    }
}

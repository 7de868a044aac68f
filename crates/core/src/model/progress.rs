use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::attempt::QuizAttempt;
use crate::model::ids::{ProgressId, QuizId, UserId};

/// Per-learner progress record: attempt history, streak, and certificate
/// state.
///
/// Owned and mutated exclusively by the progress tracker
/// ([`crate::tracker::record_attempt`]); everything else treats it as an
/// opaque value to load and save. At most one attempt is retained per quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProgress {
    pub id: ProgressId,
    pub user_id: UserId,
    /// Lifetime count of attempt recordings; never decreases.
    pub completed_days: u32,
    /// UTC calendar date of the most recent recorded attempt.
    pub last_completed_date: Option<NaiveDate>,
    pub quiz_attempts: Vec<QuizAttempt>,
    /// Count of consecutive UTC calendar days with at least one attempt.
    pub streak_count: u32,
    /// One-way flag: set once the streak reaches the certificate threshold,
    /// never cleared afterwards.
    pub certificate_earned: bool,
}

impl StudentProgress {
    /// The lazily-created initial state for a learner: all counters zero, no
    /// attempts, no certificate.
    #[must_use]
    pub fn new_for_user(user_id: UserId) -> Self {
        Self {
            id: ProgressId::generate(),
            user_id,
            completed_days: 0,
            last_completed_date: None,
            quiz_attempts: Vec::new(),
            streak_count: 0,
            certificate_earned: false,
        }
    }

    /// The retained attempt for a quiz, if the learner has taken it.
    #[must_use]
    pub fn attempt_for(&self, quiz_id: &QuizId) -> Option<&QuizAttempt> {
        self.quiz_attempts
            .iter()
            .find(|attempt| &attempt.quiz_id == quiz_id)
    }
}

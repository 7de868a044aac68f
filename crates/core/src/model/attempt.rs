use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::{AttemptId, QuizId, UserId};
use crate::model::quiz::Quiz;

/// Record of one quiz-taking session.
///
/// Attempts are immutable once recorded; retaking the same quiz replaces the
/// stored attempt rather than appending a second one (see the progress
/// tracker's upsert rule).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizAttempt {
    pub id: AttemptId,
    pub quiz_id: QuizId,
    pub user_id: UserId,
    /// Percentage of correct answers, 0–100.
    pub score: u8,
    pub total_questions: usize,
    pub date: DateTime<Utc>,
    /// Selected option index per question; `None` marks an unanswered one.
    pub answers: Vec<Option<usize>>,
    pub time_spent_secs: u32,
}

impl QuizAttempt {
    /// Computes the rounded 0–100 score for a set of selected answers.
    ///
    /// Unanswered questions and out-of-range selections count as wrong.
    /// Returns 0 for a quiz with no questions (repair guarantees hosts never
    /// hold one, but the function stays total).
    #[must_use]
    // correct <= total <= quiz sizes on human scales; the rounded percentage
    // always fits in u8.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    #[allow(clippy::cast_sign_loss)]
    pub fn score_from_answers(quiz: &Quiz, answers: &[Option<usize>]) -> u8 {
        let total = quiz.questions.len();
        if total == 0 {
            return 0;
        }
        let correct = quiz
            .questions
            .iter()
            .zip(answers.iter().copied().chain(std::iter::repeat(None)))
            .filter(|(question, selected)| *selected == Some(question.correct_answer_index))
            .count();

        ((correct as f64 / total as f64) * 100.0).round() as u8
    }
}

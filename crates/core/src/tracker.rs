//! The attempt-recording state machine over [`StudentProgress`].
//!
//! [`record_attempt`] is a pure transition: it never touches storage and has
//! no failure path over its documented input domain. Hosts persist the
//! returned value through whatever store they use; if that store is shared
//! across tabs or processes, serializing concurrent read-compute-write
//! cycles is the store's job (see the `ProgressStore` contract in the
//! storage crate).

use chrono::{DateTime, NaiveDate, Utc};

use crate::model::{AttemptId, QuizAttempt, QuizId, StudentProgress};
use crate::time::utc_date;

/// Streak length at which the certificate is granted.
pub const CERTIFICATE_STREAK_DAYS: u32 = 5;

//
// ─── STREAK ────────────────────────────────────────────────────────────────────
//

/// Next streak value after an attempt on `today`, given the previous
/// completion date.
///
/// UTC calendar dates, four cases:
/// - no previous completion → 1 (first day);
/// - previous completion is `today` → unchanged (same-day re-attempt);
/// - previous completion is the day before `today` → `current + 1`;
/// - anything else (gap, or a clock that went backwards) → reset to 1.
#[must_use]
pub fn streak_after(last_completed: Option<NaiveDate>, today: NaiveDate, current: u32) -> u32 {
    match last_completed {
        None => 1,
        Some(last) if last == today => current,
        Some(last) if today.pred_opt() == Some(last) => current.saturating_add(1),
        Some(_) => 1,
    }
}

//
// ─── RECORD ATTEMPT ────────────────────────────────────────────────────────────
//

/// Records a finished quiz session and returns the updated progress.
///
/// Pure and total; persistence is the caller's job. The transition:
/// 1. builds a [`QuizAttempt`] with a fresh id and `date = now`;
/// 2. upserts it into `quiz_attempts` keyed by `quiz_id` (a retake replaces
///    the stored attempt, never duplicates it);
/// 3. updates `streak_count` per [`streak_after`] over UTC calendar dates;
/// 4. sets `last_completed_date` to today;
/// 5. bumps the lifetime `completed_days` counter;
/// 6. grants the certificate once the streak reaches
///    [`CERTIFICATE_STREAK_DAYS`] — a one-way transition this function never
///    reverses.
///
/// Input validation (score range, non-empty ids) is the caller's
/// responsibility.
#[must_use]
pub fn record_attempt(
    mut progress: StudentProgress,
    quiz_id: QuizId,
    score: u8,
    total_questions: usize,
    answers: Vec<Option<usize>>,
    time_spent_secs: u32,
    now: DateTime<Utc>,
) -> StudentProgress {
    let attempt = QuizAttempt {
        id: AttemptId::generate(),
        quiz_id: quiz_id.clone(),
        user_id: progress.user_id.clone(),
        score,
        total_questions,
        date: now,
        answers,
        time_spent_secs,
    };

    match progress
        .quiz_attempts
        .iter_mut()
        .find(|existing| existing.quiz_id == quiz_id)
    {
        Some(existing) => *existing = attempt,
        None => progress.quiz_attempts.push(attempt),
    }

    let today = utc_date(now);
    progress.streak_count = streak_after(progress.last_completed_date, today, progress.streak_count);
    progress.last_completed_date = Some(today);
    progress.completed_days = progress.completed_days.saturating_add(1);

    if progress.streak_count >= CERTIFICATE_STREAK_DAYS {
        progress.certificate_earned = true;
    }

    progress
}

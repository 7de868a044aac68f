use std::sync::Arc;

use chrono::Duration;
use url::Url;

use quiz_core::model::{
    Difficulty, GradeLevel, QuestionId, QuizAttempt, QuizId, QuizQuestion, SourceContent, UserId,
};
use quiz_core::time::{fixed_now, Clock};
use quiz_core::RepairOutcome;
use services::{ProgressService, QuizService, ShareLinkError, ShareLinkService};
use storage::repository::{ProgressStore, Storage};

fn build_quiz() -> quiz_core::model::Quiz {
    quiz_core::model::Quiz {
        id: QuizId::new("quiz-peace-1"),
        title: "한반도 평화".to_owned(),
        description: "평화 교육 퀴즈".to_owned(),
        questions: vec![
            QuizQuestion {
                id: QuestionId::new("q-1"),
                question: "첫 번째 질문".to_owned(),
                options: vec![
                    "하나".to_owned(),
                    "둘".to_owned(),
                    "셋".to_owned(),
                    "넷".to_owned(),
                ],
                correct_answer_index: 2,
                explanation: "셋이 정답".to_owned(),
            },
            QuizQuestion {
                id: QuestionId::new("q-2"),
                question: "두 번째 질문".to_owned(),
                options: vec![
                    "A".to_owned(),
                    "B".to_owned(),
                    "C".to_owned(),
                    "D".to_owned(),
                ],
                correct_answer_index: 0,
                explanation: "A가 정답".to_owned(),
            },
        ],
        category: "peace_education".to_owned(),
        difficulty: Difficulty::Medium,
        target_grade: vec![GradeLevel::Middle],
        source_content: SourceContent::fallback(),
        created_at: fixed_now(),
    }
}

#[tokio::test]
async fn teacher_shares_student_takes_progress_persists() {
    let storage = Storage::in_memory();
    let clock = Clock::fixed(fixed_now());

    // Teacher flow: author, save, share.
    let quiz_service = QuizService::new(Arc::clone(&storage.quizzes));
    let quiz = build_quiz();
    quiz_service.save_quiz(&quiz).await.expect("save quiz");

    let share = ShareLinkService::new(
        Url::parse("https://quiz.example.org/student/shared-quiz").expect("base url"),
    )
    .with_clock(clock);
    let link = share.create_link(&quiz);

    // Student flow: open the link on another machine, no shared database.
    let resolved = share.resolve_url(&link).expect("link has data");
    assert_eq!(resolved.outcome, RepairOutcome::Intact);
    assert_eq!(resolved.quiz, quiz);

    // Student answers: first question right, second wrong.
    let answers = vec![Some(2), Some(3)];
    let score = QuizAttempt::score_from_answers(&resolved.quiz, &answers);
    assert_eq!(score, 50);

    let progress_service = ProgressService::new(clock, Arc::clone(&storage.progress));
    let user = UserId::new("student-7");
    let progress = progress_service
        .record_attempt(
            user.clone(),
            resolved.quiz.id.clone(),
            score,
            resolved.quiz.questions.len(),
            answers,
            180,
        )
        .await
        .expect("record attempt");

    assert_eq!(progress.streak_count, 1);
    assert_eq!(progress.completed_days, 1);
    assert_eq!(progress.quiz_attempts.len(), 1);
    assert!(!progress.certificate_earned);

    let persisted = storage.progress.load(&user).await.expect("persisted");
    assert_eq!(persisted, progress);
}

#[tokio::test]
async fn corrupt_link_still_yields_playable_quiz() {
    let share = ShareLinkService::new(
        Url::parse("https://quiz.example.org/student/shared-quiz").expect("base url"),
    )
    .with_clock(Clock::fixed(fixed_now()));

    let resolved = share
        .resolve(Some("dGhpcyBpcyBub3QgYSBxdWl6"))
        .expect("token present");
    assert!(resolved.is_placeholder());
    assert_eq!(resolved.quiz.validate(), Ok(()));
    assert!(!resolved.quiz.questions.is_empty());

    // Absent token is the distinct no-data state, not a placeholder quiz.
    assert_eq!(share.resolve(None), Err(ShareLinkError::MissingData));
}

#[tokio::test]
async fn week_of_study_earns_certificate_once() {
    let storage = Storage::in_memory();
    let mut clock = Clock::fixed(fixed_now());
    let user = UserId::new("student-streak");

    let mut last = None;
    for day in 0..7 {
        let service = ProgressService::new(clock, Arc::clone(&storage.progress));
        let updated = service
            .record_attempt(
                user.clone(),
                QuizId::new(format!("quiz-{day}")),
                100,
                2,
                vec![Some(0), Some(1)],
                60,
            )
            .await
            .expect("record attempt");
        last = Some(updated);
        clock.advance(Duration::days(1));
    }

    let progress = last.expect("seven recordings");
    assert_eq!(progress.streak_count, 7);
    assert_eq!(progress.completed_days, 7);
    assert!(progress.certificate_earned);

    // A long break resets the streak but never the certificate.
    clock.advance(Duration::days(30));
    let service = ProgressService::new(clock, Arc::clone(&storage.progress));
    let after_break = service
        .record_attempt(user, QuizId::new("quiz-return"), 80, 2, vec![Some(1), None], 45)
        .await
        .expect("record attempt");

    assert_eq!(after_break.streak_count, 1);
    assert!(after_break.certificate_earned);
}

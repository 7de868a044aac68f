//! URL-safe transport encoding for quizzes.
//!
//! A share link carries the whole quiz in its `data` query parameter, so a
//! token must survive copy-paste through chat apps and e-mail. Encoding is
//! reduced-JSON wrapped in url-safe base64; decoding is total and funnels
//! every failure through [`repair`].

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::model::{Difficulty, GradeLevel, Quiz, QuestionId, QuizId};
use crate::repair::{repair, RepairedQuiz};

//
// ─── TRANSPORT RECORD ──────────────────────────────────────────────────────────
//

// The reduced field set embedded in a link: enough to reconstruct a playable
// quiz, nothing derived or host-local. Field names stay camelCase on the
// wire.

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TransportQuiz<'a> {
    id: &'a QuizId,
    title: &'a str,
    description: &'a str,
    questions: Vec<TransportQuestion<'a>>,
    category: &'a str,
    difficulty: Difficulty,
    target_grade: &'a [GradeLevel],
    source_content: TransportSource<'a>,
    created_at: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TransportQuestion<'a> {
    id: &'a QuestionId,
    question: &'a str,
    options: &'a [String],
    correct_answer_index: usize,
    explanation: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TransportSource<'a> {
    id: &'a str,
    title: &'a str,
    source: &'a str,
    source_url: &'a str,
}

impl<'a> TransportQuiz<'a> {
    fn from_quiz(quiz: &'a Quiz) -> Self {
        Self {
            id: &quiz.id,
            title: &quiz.title,
            description: &quiz.description,
            questions: quiz
                .questions
                .iter()
                .map(|q| TransportQuestion {
                    id: &q.id,
                    question: &q.question,
                    options: &q.options,
                    correct_answer_index: q.correct_answer_index,
                    explanation: &q.explanation,
                })
                .collect(),
            category: &quiz.category,
            difficulty: quiz.difficulty,
            target_grade: &quiz.target_grade,
            source_content: TransportSource {
                id: &quiz.source_content.id,
                title: &quiz.source_content.title,
                source: &quiz.source_content.source,
                source_url: &quiz.source_content.source_url,
            },
            created_at: quiz.created_at,
        }
    }
}

//
// ─── ENCODE / DECODE ───────────────────────────────────────────────────────────
//

/// Encodes a quiz as a URL-safe token.
///
/// Deterministic for the same input. Only the transported field set is
/// carried (`content_type` and any host-local bookkeeping are dropped).
/// Output length grows with the quiz; bounding it against URL limits is the
/// caller's concern.
#[must_use]
pub fn encode(quiz: &Quiz) -> String {
    let transport = TransportQuiz::from_quiz(quiz);
    // serializing this fixed struct shape cannot fail; the fallback keeps
    // encode total
    let json = serde_json::to_string(&transport).unwrap_or_else(|_| "{}".to_owned());
    URL_SAFE_NO_PAD.encode(json)
}

/// Decodes a token back into a guaranteed-valid quiz.
///
/// Never fails: an invalid alphabet, truncated token, non-UTF-8 payload, or
/// unparseable JSON all fall back to `repair(None, ..)` (a placeholder
/// outcome); a parseable payload goes through field-level repair. For any
/// token produced by [`encode`] from a valid quiz, the result is `Intact`
/// and reproduces the transported fields exactly.
#[must_use]
pub fn decode(token: &str, now: DateTime<Utc>) -> RepairedQuiz {
    let Ok(bytes) = URL_SAFE_NO_PAD.decode(token.trim()) else {
        return repair(None, now);
    };
    let Ok(text) = String::from_utf8(bytes) else {
        return repair(None, now);
    };
    let Ok(value) = serde_json::from_str::<Value>(&text) else {
        return repair(None, now);
    };
    repair(Some(&value), now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentType, QuizQuestion, SourceContent};
    use crate::repair::RepairOutcome;
    use crate::time::fixed_now;

    fn build_quiz() -> Quiz {
        Quiz {
            id: QuizId::new("quiz-rt"),
            title: "한반도 평화".to_owned(),
            description: "Shared quiz".to_owned(),
            questions: vec![QuizQuestion {
                id: QuestionId::new("q-rt-0"),
                question: "다음 중 옳은 것은?".to_owned(),
                options: vec![
                    "첫째".to_owned(),
                    "둘째".to_owned(),
                    "셋째".to_owned(),
                    "넷째".to_owned(),
                ],
                correct_answer_index: 2,
                explanation: "셋째가 정답입니다.".to_owned(),
            }],
            category: "peace_education".to_owned(),
            difficulty: Difficulty::Hard,
            target_grade: vec![GradeLevel::Middle, GradeLevel::High],
            source_content: SourceContent {
                id: "source-7".to_owned(),
                title: "Source article".to_owned(),
                source: "News desk".to_owned(),
                source_url: "https://example.org/article/7".to_owned(),
                content_type: ContentType::Article,
            },
            created_at: fixed_now(),
        }
    }

    #[test]
    fn round_trip_is_intact_and_lossless() {
        let quiz = build_quiz();
        let token = encode(&quiz);
        let decoded = decode(&token, fixed_now());

        assert_eq!(decoded.outcome, RepairOutcome::Intact);
        assert_eq!(decoded.quiz, quiz);
    }

    #[test]
    fn validated_quiz_keeps_its_ids_through_transport() {
        let quiz = build_quiz();
        assert_eq!(quiz.validate(), Ok(()));

        let decoded = decode(&encode(&quiz), fixed_now());
        assert_eq!(decoded.outcome, RepairOutcome::Intact);
        assert_eq!(decoded.quiz.id, quiz.id);
        assert_eq!(decoded.quiz.questions[0].id, quiz.questions[0].id);
    }

    #[test]
    fn empty_description_round_trips_intact() {
        let mut quiz = build_quiz();
        quiz.description = String::new();

        let decoded = decode(&encode(&quiz), fixed_now());
        assert_eq!(decoded.outcome, RepairOutcome::Intact);
        assert_eq!(decoded.quiz.description, "");
    }

    #[test]
    fn encode_is_deterministic() {
        let quiz = build_quiz();
        assert_eq!(encode(&quiz), encode(&quiz));
    }

    #[test]
    fn token_is_url_safe() {
        let token = encode(&build_quiz());
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn korean_title_end_to_end() {
        let quiz = build_quiz();
        let token = encode(&quiz);
        let decoded = decode(&token, fixed_now());

        assert_eq!(decoded.quiz.title, "한반도 평화");
        let first = &decoded.quiz.questions[0];
        assert_eq!(first.correct_answer_index, 2);
        assert_eq!(first.options.len(), 4);
    }

    #[test]
    fn invalid_alphabet_falls_back_to_placeholder() {
        let decoded = decode("not a token!!", fixed_now());
        assert!(decoded.is_placeholder());
        assert_eq!(decoded.quiz.validate(), Ok(()));
    }

    #[test]
    fn truncated_token_falls_back_to_placeholder() {
        let token = encode(&build_quiz());
        let decoded = decode(&token[..token.len() / 2], fixed_now());
        assert!(decoded.is_placeholder());
    }

    #[test]
    fn valid_base64_of_garbage_json_falls_back_to_placeholder() {
        let token = URL_SAFE_NO_PAD.encode("{not json");
        let decoded = decode(&token, fixed_now());
        assert!(decoded.is_placeholder());
    }

    #[test]
    fn valid_json_non_object_falls_back_to_placeholder() {
        let token = URL_SAFE_NO_PAD.encode("[1,2,3]");
        let decoded = decode(&token, fixed_now());
        assert!(decoded.is_placeholder());
    }

    #[test]
    fn partial_object_is_repaired_not_rejected() {
        let token = URL_SAFE_NO_PAD.encode(r#"{"title":"Half a quiz"}"#);
        let decoded = decode(&token, fixed_now());
        assert_eq!(decoded.outcome, RepairOutcome::Patched);
        assert_eq!(decoded.quiz.title, "Half a quiz");
        assert_eq!(decoded.quiz.validate(), Ok(()));
    }
}

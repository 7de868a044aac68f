//! Field-by-field repair of untrusted quiz payloads.
//!
//! Share-link tokens arrive from outside the application and may be
//! truncated, hand-edited, or produced by an older client. Rather than
//! rejecting them, [`repair`] converts whatever decoded into a structurally
//! valid [`Quiz`], substituting deterministic placeholder content for every
//! missing or wrong-typed field. Callers never need further validation.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::model::{
    ContentType, Difficulty, GradeLevel, QuestionId, Quiz, QuizId, QuizQuestion, SourceContent,
    OPTION_COUNT,
};

/// Title substituted when the payload carries none.
pub const PLACEHOLDER_TITLE: &str = "Untitled quiz";

/// Description substituted when the payload carries none.
pub const PLACEHOLDER_DESCRIPTION: &str = "No description provided.";

/// Explanation substituted when a question carries none.
pub const PLACEHOLDER_EXPLANATION: &str = "No explanation provided.";

/// Category substituted when the payload carries none.
pub const PLACEHOLDER_CATEGORY: &str = "general";

//
// ─── RESULT ────────────────────────────────────────────────────────────────────
//

/// How much of the original payload survived repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairOutcome {
    /// Every transported field was present and well-typed.
    Intact,
    /// The payload was an object, but at least one field was defaulted.
    Patched,
    /// The payload was absent or not an object; the quiz is fully synthetic.
    Placeholder,
}

/// A guaranteed-valid quiz plus the outcome tag.
///
/// The quiz always satisfies the structural invariants
/// ([`Quiz::validate`] passes), whatever the input looked like.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairedQuiz {
    pub quiz: Quiz,
    pub outcome: RepairOutcome,
}

impl RepairedQuiz {
    /// True when the quiz was invented wholesale because the payload was
    /// unusable. Hosts typically render a warning instead of the quiz.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.outcome == RepairOutcome::Placeholder
    }
}

//
// ─── REPAIR ────────────────────────────────────────────────────────────────────
//

/// Converts an arbitrary decoded value into a structurally valid [`Quiz`].
///
/// Total and deterministic given `(raw, now)`: `now` seeds generated ids and
/// the defaulted `created_at`. `None` (or any non-object value) yields a
/// fully synthetic placeholder quiz whose id carries the `quiz-` prefix.
#[must_use]
pub fn repair(raw: Option<&Value>, now: DateTime<Utc>) -> RepairedQuiz {
    let Some(obj) = raw.and_then(Value::as_object) else {
        return RepairedQuiz {
            quiz: placeholder_quiz(now),
            outcome: RepairOutcome::Placeholder,
        };
    };

    let mut patched = false;

    let id = match non_empty_str(obj.get("id")) {
        Some(id) => QuizId::new(id),
        None => {
            patched = true;
            QuizId::generate(now)
        }
    };
    let title = typed_string_or(obj.get("title"), PLACEHOLDER_TITLE, &mut patched);
    let description = typed_string_or(obj.get("description"), PLACEHOLDER_DESCRIPTION, &mut patched);
    let category = typed_string_or(obj.get("category"), PLACEHOLDER_CATEGORY, &mut patched);

    let questions = match obj.get("questions").and_then(Value::as_array) {
        Some(items) if !items.is_empty() => items
            .iter()
            .enumerate()
            .map(|(index, item)| repair_question(item, index, now, &mut patched))
            .collect(),
        _ => {
            patched = true;
            vec![placeholder_question(now, 0)]
        }
    };

    let difficulty = match obj.get("difficulty").and_then(Value::as_str) {
        Some(value) => Difficulty::parse(value).unwrap_or_else(|| {
            patched = true;
            Difficulty::default()
        }),
        None => {
            patched = true;
            Difficulty::default()
        }
    };

    let target_grade = repair_target_grade(obj.get("targetGrade"), &mut patched);
    let source_content = repair_source_content(obj.get("sourceContent"), &mut patched);

    let created_at = match obj
        .get("createdAt")
        .and_then(Value::as_str)
        .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
    {
        Some(parsed) => parsed.with_timezone(&Utc),
        None => {
            patched = true;
            now
        }
    };

    let outcome = if patched {
        RepairOutcome::Patched
    } else {
        RepairOutcome::Intact
    };

    RepairedQuiz {
        quiz: Quiz {
            id,
            title,
            description,
            questions,
            category,
            difficulty,
            target_grade,
            source_content,
            created_at,
        },
        outcome,
    }
}

//
// ─── FIELD REPAIRS ─────────────────────────────────────────────────────────────
//

fn repair_question(
    raw: &Value,
    index: usize,
    now: DateTime<Utc>,
    patched: &mut bool,
) -> QuizQuestion {
    let Some(obj) = raw.as_object() else {
        *patched = true;
        return placeholder_question(now, index);
    };

    let id = match non_empty_str(obj.get("id")) {
        Some(id) => QuestionId::new(id),
        None => {
            *patched = true;
            QuestionId::generate(now, index)
        }
    };
    // blank question text counts as missing; a quiz with an empty prompt is
    // unplayable even when the field is technically present
    let question = blank_string_or(
        obj.get("question"),
        &format!("Question #{}", index + 1),
        patched,
    );
    let options = repair_options(obj.get("options"), patched);

    let correct_answer_index = match obj
        .get("correctAnswerIndex")
        .and_then(Value::as_u64)
        .and_then(|value| usize::try_from(value).ok())
    {
        Some(value) if value < options.len() => value,
        _ => {
            *patched = true;
            0
        }
    };

    let explanation = typed_string_or(obj.get("explanation"), PLACEHOLDER_EXPLANATION, patched);

    QuizQuestion {
        id,
        question,
        options,
        correct_answer_index,
        explanation,
    }
}

/// Normalizes an options value to exactly [`OPTION_COUNT`] strings.
///
/// Arrays with 2 or more usable entries are kept, padded with generated
/// placeholders up to four entries (supplied entries keep their positions)
/// or truncated down to four. Anything else is replaced wholesale.
fn repair_options(raw: Option<&Value>, patched: &mut bool) -> Vec<String> {
    let entries: Vec<String> = match raw.and_then(Value::as_array) {
        Some(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| match item.as_str() {
                Some(text) => text.to_owned(),
                None => {
                    *patched = true;
                    placeholder_option(i)
                }
            })
            .collect(),
        None => Vec::new(),
    };

    if entries.len() < 2 {
        *patched = true;
        return (0..OPTION_COUNT).map(placeholder_option).collect();
    }

    let mut options = entries;
    if options.len() != OPTION_COUNT {
        *patched = true;
        while options.len() < OPTION_COUNT {
            options.push(placeholder_option(options.len()));
        }
        options.truncate(OPTION_COUNT);
    }
    options
}

fn repair_target_grade(raw: Option<&Value>, patched: &mut bool) -> Vec<GradeLevel> {
    let Some(items) = raw.and_then(Value::as_array) else {
        *patched = true;
        return GradeLevel::all();
    };

    let parsed: Vec<GradeLevel> = items
        .iter()
        .filter_map(|item| item.as_str().and_then(GradeLevel::parse))
        .collect();

    if parsed.is_empty() {
        *patched = true;
        return GradeLevel::all();
    }
    if parsed.len() != items.len() {
        *patched = true;
    }
    parsed
}

fn repair_source_content(raw: Option<&Value>, patched: &mut bool) -> SourceContent {
    let fallback = SourceContent::fallback();
    let Some(obj) = raw.and_then(Value::as_object) else {
        *patched = true;
        return fallback;
    };

    // `contentType` is dropped from the transport record by design, so its
    // absence does not count as a patch.
    let content_type = obj
        .get("contentType")
        .and_then(Value::as_str)
        .and_then(|value| match value {
            "article" => Some(ContentType::Article),
            "video" => Some(ContentType::Video),
            "news" => Some(ContentType::News),
            _ => None,
        })
        .unwrap_or_default();

    SourceContent {
        id: typed_string_or(obj.get("id"), &fallback.id, patched),
        title: typed_string_or(obj.get("title"), &fallback.title, patched),
        source: typed_string_or(obj.get("source"), &fallback.source, patched),
        source_url: typed_string_or(obj.get("sourceUrl"), &fallback.source_url, patched),
        content_type,
    }
}

//
// ─── PLACEHOLDERS ──────────────────────────────────────────────────────────────
//

fn placeholder_quiz(now: DateTime<Utc>) -> Quiz {
    Quiz {
        id: QuizId::generate(now),
        title: PLACEHOLDER_TITLE.to_owned(),
        description: PLACEHOLDER_DESCRIPTION.to_owned(),
        questions: vec![placeholder_question(now, 0)],
        category: PLACEHOLDER_CATEGORY.to_owned(),
        difficulty: Difficulty::default(),
        target_grade: GradeLevel::all(),
        source_content: SourceContent::fallback(),
        created_at: now,
    }
}

fn placeholder_question(now: DateTime<Utc>, index: usize) -> QuizQuestion {
    QuizQuestion {
        id: QuestionId::generate(now, index),
        question: format!("Question #{}", index + 1),
        options: (0..OPTION_COUNT).map(placeholder_option).collect(),
        correct_answer_index: 0,
        explanation: PLACEHOLDER_EXPLANATION.to_owned(),
    }
}

fn placeholder_option(index: usize) -> String {
    format!("Option {}", index + 1)
}

fn non_empty_str(raw: Option<&Value>) -> Option<&str> {
    raw.and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
}

/// Defaults only when the field is missing or not a string. Empty strings
/// are kept: the transport may legitimately carry them (e.g. a blank
/// description), and replacing them would break the encode/decode
/// round-trip for valid quizzes.
fn typed_string_or(raw: Option<&Value>, default: &str, patched: &mut bool) -> String {
    match raw.and_then(Value::as_str) {
        Some(text) => text.to_owned(),
        None => {
            *patched = true;
            default.to_owned()
        }
    }
}

/// Defaults when the field is missing, not a string, or blank.
fn blank_string_or(raw: Option<&Value>, default: &str, patched: &mut bool) -> String {
    match non_empty_str(raw) {
        Some(text) => text.to_owned(),
        None => {
            *patched = true;
            default.to_owned()
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{QuestionId, QuizId};

/// Every question carries exactly this many answer options.
pub const OPTION_COUNT: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Violations of the quiz structural invariants.
///
/// Host-authored quizzes go through [`Quiz::validate`]; quizzes coming out of
/// the repair path already satisfy these by construction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz id cannot be blank")]
    BlankId,

    #[error("quiz must contain at least one question")]
    EmptyQuestions,

    #[error("target grade set cannot be empty")]
    EmptyTargetGrade,

    #[error("question {index} id is blank")]
    BlankQuestionId { index: usize },

    #[error("question {index} has no text")]
    EmptyQuestionText { index: usize },

    #[error("question {index} has {len} options, expected {OPTION_COUNT}")]
    WrongOptionCount { index: usize, len: usize },

    #[error("question {index} correct answer index {value} is out of range")]
    CorrectAnswerOutOfRange { index: usize, value: usize },
}

//
// ─── ENUMS ─────────────────────────────────────────────────────────────────────
//

/// School grade band a quiz is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeLevel {
    Elementary,
    Middle,
    High,
}

impl GradeLevel {
    /// The full set of grade bands, used as the repair default for
    /// `target_grade`.
    #[must_use]
    pub fn all() -> Vec<GradeLevel> {
        vec![GradeLevel::Elementary, GradeLevel::Middle, GradeLevel::High]
    }

    /// Parses the wire spelling (`elementary` / `middle` / `high`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "elementary" => Some(Self::Elementary),
            "middle" => Some(Self::Middle),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    /// The wire spelling of this grade band.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Elementary => "elementary",
            Self::Middle => "middle",
            Self::High => "high",
        }
    }
}

/// Quiz difficulty rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Parses the wire spelling (`easy` / `medium` / `hard`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }

    /// The wire spelling of this difficulty.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

/// Kind of the source material a quiz was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Article,
    Video,
    News,
}

//
// ─── SOURCE CONTENT ────────────────────────────────────────────────────────────
//

/// Attribution record for the material a quiz was built from.
///
/// The share-link transport carries only `id`, `title`, `source` and
/// `source_url`; `content_type` is re-defaulted on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceContent {
    pub id: String,
    pub title: String,
    pub source: String,
    pub source_url: String,
    pub content_type: ContentType,
}

impl SourceContent {
    /// Fixed default attribution used whenever a quiz arrives without a
    /// usable source record.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            id: "default-source".to_owned(),
            title: "Default source".to_owned(),
            source: "Quiz Library".to_owned(),
            source_url: "https://example.org/quiz-library".to_owned(),
            content_type: ContentType::Article,
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question.
///
/// Invariants (checked by [`QuizQuestion::validate`], guaranteed by repair):
/// non-empty `question` text, exactly [`OPTION_COUNT`] options, and
/// `correct_answer_index` within range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: QuestionId,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
    pub explanation: String,
}

impl QuizQuestion {
    /// Checks the per-question invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant, tagged with `index` (the
    /// question's position within its quiz) for error messages.
    pub fn validate(&self, index: usize) -> Result<(), QuizError> {
        if self.id.as_str().trim().is_empty() {
            return Err(QuizError::BlankQuestionId { index });
        }
        if self.question.trim().is_empty() {
            return Err(QuizError::EmptyQuestionText { index });
        }
        if self.options.len() != OPTION_COUNT {
            return Err(QuizError::WrongOptionCount {
                index,
                len: self.options.len(),
            });
        }
        if self.correct_answer_index >= self.options.len() {
            return Err(QuizError::CorrectAnswerOutOfRange {
                index,
                value: self.correct_answer_index,
            });
        }
        Ok(())
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// A complete, playable quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: QuizId,
    pub title: String,
    pub description: String,
    pub questions: Vec<QuizQuestion>,
    pub category: String,
    pub difficulty: Difficulty,
    pub target_grade: Vec<GradeLevel>,
    pub source_content: SourceContent,
    pub created_at: DateTime<Utc>,
}

impl Quiz {
    /// Checks the structural invariants for a host-authored quiz.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant. Quizzes produced by the repair
    /// path always pass.
    pub fn validate(&self) -> Result<(), QuizError> {
        // repair regenerates blank ids, so a quiz carrying one would not
        // survive encode/decode unchanged; validation rejects it up front
        if self.id.as_str().trim().is_empty() {
            return Err(QuizError::BlankId);
        }
        if self.questions.is_empty() {
            return Err(QuizError::EmptyQuestions);
        }
        if self.target_grade.is_empty() {
            return Err(QuizError::EmptyTargetGrade);
        }
        for (index, question) in self.questions.iter().enumerate() {
            question.validate(index)?;
        }
        Ok(())
    }
}

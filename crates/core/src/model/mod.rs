mod attempt;
mod ids;
mod progress;
mod quiz;

pub use attempt::QuizAttempt;
pub use ids::{AttemptId, ProgressId, QuestionId, QuizId, UserId, QUIZ_ID_PREFIX};
pub use progress::StudentProgress;
pub use quiz::{
    ContentType, Difficulty, GradeLevel, Quiz, QuizError, QuizQuestion, SourceContent,
    OPTION_COUNT,
};

#![forbid(unsafe_code)]

pub mod progress_service;
pub mod quiz_service;
pub mod share_link_service;

pub use quiz_core::Clock;

pub use progress_service::{ProgressService, ProgressServiceError};
pub use quiz_service::{QuizService, QuizServiceError};
pub use share_link_service::{ShareLinkError, ShareLinkService};

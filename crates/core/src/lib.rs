#![forbid(unsafe_code)]

//! Pure domain core for quiz sharing and student progress.
//!
//! Everything here is synchronous and I/O-free: the codec and repair
//! functions are pure, and the progress tracker is a pure state transition
//! given an injected `now`. Storage and link plumbing live in the sibling
//! crates.

pub mod codec;
pub mod error;
pub mod model;
pub mod repair;
pub mod time;
pub mod tracker;

pub use error::Error;
pub use repair::{RepairOutcome, RepairedQuiz};
pub use time::Clock;
pub use tracker::CERTIFICATE_STREAK_DAYS;

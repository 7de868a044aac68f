#![forbid(unsafe_code)]

pub mod repository;

pub use repository::{InMemoryStorage, ProgressStore, QuizRepository, Storage, StorageError};

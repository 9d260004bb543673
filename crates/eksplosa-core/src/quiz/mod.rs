//! Quiz progression: level gating, answer checking and persisted progress.

pub mod answer;
mod engine;
mod outcome;
pub mod params;
pub mod progress;

pub use answer::is_correct;
pub use engine::{LevelBadge, QuizEngine, QuizSession, QuizSnapshot, QuizState};
pub use outcome::{OutcomeCopy, OutcomeKind};
pub use params::QuizParams;
pub use progress::{MemoryStore, ProgressRecord, ProgressStore};

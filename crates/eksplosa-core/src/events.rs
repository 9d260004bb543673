use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::quiz::{OutcomeKind, QuizState};

/// Every state change of the quiz engine produces an Event.
/// The render layer subscribes to them; the CLI prints them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Questions for a level are being fetched.
    LevelLoading {
        level_id: String,
        at: DateTime<Utc>,
    },
    /// A level became the active level with its questions loaded.
    LevelStarted {
        level_id: String,
        level_number: u32,
        question_count: usize,
        at: DateTime<Utc>,
    },
    /// A question is ready for word picks.
    QuestionPresented {
        level_id: String,
        question_index: usize,
        question_id: String,
        prompt: String,
        at: DateTime<Utc>,
    },
    /// The selection buffer changed.
    SelectionChanged {
        selected: Vec<String>,
        at: DateTime<Utc>,
    },
    /// The player filled the answer slots and the answer was checked.
    AnswerEvaluated {
        question_id: String,
        correct: bool,
        score: u32,
        at: DateTime<Utc>,
    },
    /// Feedback the modal layer should display.
    Outcome {
        kind: OutcomeKind,
        at: DateTime<Utc>,
    },
    /// The player tried to open a level that is not unlocked yet.
    LevelLocked {
        level_id: String,
        at: DateTime<Utc>,
    },
    /// All questions of a level were answered; progress was persisted.
    LevelCompleted {
        level_id: String,
        at: DateTime<Utc>,
    },
    /// The last level was completed.
    QuizFinished {
        score: u32,
        at: DateTime<Utc>,
    },
    StateChanged {
        from: QuizState,
        to: QuizState,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Wire name of the variant, as written in the `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Event::LevelLoading { .. } => "LevelLoading",
            Event::LevelStarted { .. } => "LevelStarted",
            Event::QuestionPresented { .. } => "QuestionPresented",
            Event::SelectionChanged { .. } => "SelectionChanged",
            Event::AnswerEvaluated { .. } => "AnswerEvaluated",
            Event::Outcome { .. } => "Outcome",
            Event::LevelLocked { .. } => "LevelLocked",
            Event::LevelCompleted { .. } => "LevelCompleted",
            Event::QuizFinished { .. } => "QuizFinished",
            Event::StateChanged { .. } => "StateChanged",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_serializes_with_type_tag() {
        let event = Event::Outcome {
            kind: OutcomeKind::Failure,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Outcome");
        assert_eq!(json["kind"], "failure");
        assert_eq!(event.name(), "Outcome");
    }
}

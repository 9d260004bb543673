//! Quiz progression engine.
//!
//! The engine is a wall-clock state machine in the same spirit as a timer:
//! it has no internal threads. After an answer is checked the follow-up
//! transition is scheduled, and the caller either calls `tick()` periodically
//! or `acknowledge()` when the player dismisses the feedback modal.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Loading -> Presenting -> Evaluating -> Presenting (next question)
//!                                             -> LevelComplete -> Loading -> Presenting (next level)
//!                                                              -> SessionComplete
//! ```
//!
//! Data fetches happen only in `Loading`. Nothing is committed until a fetch
//! succeeds, so a failed level switch leaves the previous level playable.

use std::collections::BTreeSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::answer;
use super::outcome::OutcomeKind;
use super::params::QuizParams;
use super::progress::{ProgressRecord, ProgressStore};
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::gateway::{DataGateway, LevelFilter, QuestionFilter};
use crate::model::{Level, Question};
use crate::storage::config::QuizConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizState {
    /// Not initialized yet.
    Idle,
    /// Fetching levels or questions.
    Loading,
    /// A question is waiting for word picks.
    Presenting,
    /// An answer was checked; its follow-up transition is pending.
    Evaluating,
    /// Progress for the finished level is saved; the next level is not loaded.
    LevelComplete,
    /// The last level was completed.
    SessionComplete,
}

/// Runtime data of the active session.
#[derive(Debug, Clone, Serialize)]
pub struct QuizSession {
    pub language_id: String,
    pub province_id: String,
    /// Levels of the language, ordered by `level_number`.
    pub levels: Vec<Level>,
    /// Index of the active level in `levels`.
    pub active: usize,
    pub questions: Vec<Question>,
    pub question_index: usize,
    /// Words placed so far, in order.
    pub selected: Vec<String>,
    pub score: u32,
    pub completed: bool,
}

impl QuizSession {
    pub fn active_level(&self) -> &Level {
        &self.levels[self.active]
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.question_index)
    }
}

/// Follow-up of a checked answer.
#[derive(Debug, Clone, Copy)]
struct Pending {
    correct: bool,
    due_at_ms: u64,
}

/// Per-level badge for the level picker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelBadge {
    pub id: String,
    pub level_number: u32,
    pub topic: String,
    pub accessible: bool,
    pub completed: bool,
    pub active: bool,
}

/// Everything a renderer needs to draw the quiz screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuizSnapshot {
    pub state: QuizState,
    pub language_id: Option<String>,
    pub level_id: Option<String>,
    /// e.g. `#Bagian 1A - Percakapan sehari-hari`
    pub heading: Option<String>,
    pub prompt: Option<String>,
    pub question_index: usize,
    pub question_count: usize,
    pub answer_len: usize,
    pub selected: Vec<String>,
    /// Options not placed yet.
    pub options: Vec<String>,
    pub score: u32,
    pub levels: Vec<LevelBadge>,
}

type Listener = Box<dyn FnMut(&Event) + Send>;

struct Loaded {
    progress: ProgressRecord,
    levels: Vec<Level>,
    active: usize,
    questions: Vec<Question>,
}

pub struct QuizEngine {
    gateway: Box<dyn DataGateway>,
    store: Box<dyn ProgressStore>,
    feedback_delay_ms: u64,
    state: QuizState,
    session: Option<QuizSession>,
    progress: ProgressRecord,
    pending: Option<Pending>,
    listeners: Vec<Listener>,
}

impl QuizEngine {
    pub fn new(gateway: Box<dyn DataGateway>, store: Box<dyn ProgressStore>) -> Self {
        Self {
            gateway,
            store,
            feedback_delay_ms: QuizConfig::default().feedback_delay_ms,
            state: QuizState::Idle,
            session: None,
            progress: ProgressRecord::default(),
            pending: None,
            listeners: Vec::new(),
        }
    }

    pub fn from_config(
        gateway: Box<dyn DataGateway>,
        store: Box<dyn ProgressStore>,
        config: &QuizConfig,
    ) -> Self {
        Self::new(gateway, store).with_feedback_delay(config.feedback_delay_ms)
    }

    pub fn with_feedback_delay(mut self, delay_ms: u64) -> Self {
        self.feedback_delay_ms = delay_ms;
        self
    }

    /// Register a callback that receives every event as it is emitted.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&Event) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    pub fn progress(&self) -> &ProgressRecord {
        &self.progress
    }

    pub fn score(&self) -> u32 {
        self.session.as_ref().map(|s| s.score).unwrap_or(0)
    }

    pub fn levels(&self) -> &[Level] {
        self.session.as_ref().map(|s| s.levels.as_slice()).unwrap_or(&[])
    }

    pub fn active_level(&self) -> Option<&Level> {
        self.session.as_ref().map(|s| s.active_level())
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.session.as_ref().and_then(|s| s.current_question())
    }

    pub fn selected_words(&self) -> &[String] {
        self.session.as_ref().map(|s| s.selected.as_slice()).unwrap_or(&[])
    }

    /// When the pending post-answer transition fires (epoch ms).
    pub fn pending_due_at(&self) -> Option<u64> {
        self.pending.map(|p| p.due_at_ms)
    }

    /// The first level is always open; any other needs its predecessor completed.
    pub fn is_level_accessible(&self, level_id: &str) -> bool {
        is_accessible(self.levels(), &self.progress.completed, level_id)
    }

    pub fn is_level_completed(&self, level_id: &str) -> bool {
        self.progress.is_completed(level_id)
    }

    /// Options of the current question that are not placed yet. A word
    /// offered twice stays available until both copies are placed.
    pub fn remaining_options(&self) -> Vec<String> {
        let mut placed = self.selected_words().to_vec();
        self.current_question()
            .map(|q| {
                q.options
                    .iter()
                    .filter(|o| match placed.iter().position(|w| w == *o) {
                        Some(pos) => {
                            placed.remove(pos);
                            false
                        }
                        None => true,
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> QuizSnapshot {
        let session = self.session.as_ref();
        let question = self.current_question();
        let levels = session
            .map(|s| {
                s.levels
                    .iter()
                    .enumerate()
                    .map(|(i, l)| LevelBadge {
                        id: l.id.clone(),
                        level_number: l.level_number,
                        topic: l.topic_label().to_string(),
                        accessible: self.is_level_accessible(&l.id),
                        completed: self.is_level_completed(&l.id),
                        active: i == s.active,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let heading = session.zip(question).map(|(s, q)| {
            let tag: String = q.kind.chars().take(1).collect();
            format!(
                "#Bagian {}{} - {}",
                s.question_index + 1,
                tag,
                s.active_level().topic_label()
            )
        });

        QuizSnapshot {
            state: self.state,
            language_id: session.map(|s| s.language_id.clone()),
            level_id: session.map(|s| s.active_level().id.clone()),
            heading,
            prompt: question.map(|q| q.prompt.clone()),
            question_index: session.map(|s| s.question_index).unwrap_or(0),
            question_count: session.map(|s| s.questions.len()).unwrap_or(0),
            answer_len: question.map(|q| q.answer_len()).unwrap_or(0),
            selected: self.selected_words().to_vec(),
            options: self.remaining_options(),
            score: self.score(),
            levels,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Load levels and progress for the requested language and present the
    /// first question of the starting level.
    ///
    /// The starting level is the requested level if it exists and is
    /// accessible, else the level after the last completed one, else the
    /// first level.
    pub async fn initialize(&mut self, params: &QuizParams) -> Result<Vec<Event>> {
        let (language_id, province_id) = params.require()?;
        let (language_id, province_id) = (language_id.to_string(), province_id.to_string());

        let mut out = Vec::new();
        let previous = self.state;
        let pending = self.pending.take();
        self.transition(QuizState::Loading, &mut out);

        let loaded = match self
            .load_start(&language_id, params.level_id.as_deref(), &mut out)
            .await
        {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!(%language_id, "quiz initialization failed: {e}");
                self.pending = pending;
                self.transition(previous, &mut out);
                return Err(e);
            }
        };

        tracing::info!(
            language_id,
            level_id = %loaded.levels[loaded.active].id,
            "quiz initialized"
        );
        self.progress = loaded.progress;
        self.session = Some(QuizSession {
            language_id,
            province_id,
            levels: loaded.levels,
            active: loaded.active,
            questions: loaded.questions,
            question_index: 0,
            selected: Vec::new(),
            score: 0,
            completed: false,
        });
        self.enter_level(&mut out)?;
        Ok(out)
    }

    /// Switch to `level_id`. Locked levels produce an information outcome
    /// and leave the session unchanged; unknown levels are ignored.
    pub async fn select_level(&mut self, level_id: &str) -> Result<Vec<Event>> {
        let mut out = Vec::new();
        let index = {
            let session = self.session_ref()?;
            session.levels.iter().position(|l| l.id == level_id)
        };
        let Some(index) = index else {
            tracing::warn!(level_id, "ignoring unknown level");
            return Ok(out);
        };

        if !self.is_level_accessible(level_id) {
            tracing::warn!(level_id, "level is locked");
            self.emit(
                &mut out,
                Event::LevelLocked {
                    level_id: level_id.to_string(),
                    at: Utc::now(),
                },
            );
            self.emit(
                &mut out,
                Event::Outcome {
                    kind: OutcomeKind::Information,
                    at: Utc::now(),
                },
            );
            return Ok(out);
        }

        let previous = self.state;
        let pending = self.pending.take();
        self.transition(QuizState::Loading, &mut out);
        let level = self.session_ref()?.levels[index].clone();

        match self.load_questions(&level, &mut out).await {
            Ok(questions) => {
                let session = self.session_mut()?;
                session.active = index;
                session.questions = questions;
                session.question_index = 0;
                session.selected.clear();
                session.completed = false;
                self.enter_level(&mut out)?;
                Ok(out)
            }
            Err(e) => {
                tracing::warn!(level_id, "level switch failed: {e}");
                self.pending = pending;
                self.transition(previous, &mut out);
                Err(e)
            }
        }
    }

    /// Toggle `word` in the selection. A word offered more than once is placed
    /// again until every copy is used. Filling every answer slot checks the
    /// answer. Ignored while feedback is pending or after the quiz finished.
    pub fn select_word(&mut self, word: &str) -> Result<Vec<Event>> {
        let mut out = Vec::new();
        if !self.accepts_picks()? {
            return Ok(out);
        }

        let question = self.current_question_or_err()?;
        if !question.has_option(word) {
            tracing::warn!(word, "word is not an option of the current question");
            return Ok(out);
        }
        let answer_len = question.answer_len();

        let copies = question.options.iter().filter(|o| *o == word).count();
        let session = self.session_mut()?;
        let placed = session.selected.iter().filter(|w| *w == word).count();
        if placed < copies {
            session.selected.push(word.to_string());
        } else if let Some(pos) = session.selected.iter().rposition(|w| w == word) {
            session.selected.remove(pos);
        }
        let selected = session.selected.clone();
        tracing::debug!(?selected, "selection changed");
        self.emit(
            &mut out,
            Event::SelectionChanged {
                selected: selected.clone(),
                at: Utc::now(),
            },
        );

        if selected.len() == answer_len {
            out.extend(self.evaluate_answer()?);
        }
        Ok(out)
    }

    /// Take back a single placed word.
    pub fn reset_word(&mut self, word: &str) -> Result<Vec<Event>> {
        let mut out = Vec::new();
        if !self.accepts_picks()? {
            return Ok(out);
        }
        let session = self.session_mut()?;
        let Some(pos) = session.selected.iter().position(|w| w == word) else {
            return Ok(out);
        };
        session.selected.remove(pos);
        let selected = session.selected.clone();
        self.emit(
            &mut out,
            Event::SelectionChanged {
                selected,
                at: Utc::now(),
            },
        );
        Ok(out)
    }

    /// Check the current selection against the correct answer and schedule
    /// the follow-up: next question on success, cleared selection on failure.
    pub fn evaluate_answer(&mut self) -> Result<Vec<Event>> {
        if self.state != QuizState::Presenting {
            return Err(CoreError::InvalidState(format!(
                "cannot evaluate an answer while {:?}",
                self.state
            )));
        }
        let question = self.current_question_or_err()?.clone();
        let delay = self.feedback_delay_ms;

        let session = self.session_mut()?;
        let correct = answer::is_correct(&question, &session.selected);
        if correct {
            session.score += 1;
        }
        let score = session.score;

        let mut out = Vec::new();
        self.pending = Some(Pending {
            correct,
            due_at_ms: now_ms().saturating_add(delay),
        });
        self.transition(QuizState::Evaluating, &mut out);
        tracing::info!(question_id = %question.id, correct, score, "answer evaluated");
        self.emit(
            &mut out,
            Event::AnswerEvaluated {
                question_id: question.id,
                correct,
                score,
                at: Utc::now(),
            },
        );
        self.emit(
            &mut out,
            Event::Outcome {
                kind: if correct {
                    OutcomeKind::Success
                } else {
                    OutcomeKind::Failure
                },
                at: Utc::now(),
            },
        );
        Ok(out)
    }

    /// Call periodically. Fires the pending transition once its delay elapsed.
    pub async fn tick(&mut self) -> Result<Vec<Event>> {
        self.tick_at(now_ms()).await
    }

    pub async fn tick_at(&mut self, now_ms: u64) -> Result<Vec<Event>> {
        match self.pending {
            Some(p) if p.due_at_ms <= now_ms => self.resolve_pending().await,
            _ => Ok(Vec::new()),
        }
    }

    /// The player dismissed the feedback modal: fire the pending transition now.
    pub async fn acknowledge(&mut self) -> Result<Vec<Event>> {
        if self.pending.is_none() {
            return Ok(Vec::new());
        }
        self.resolve_pending().await
    }

    /// Move to the next question, or complete the level after the last one.
    pub async fn advance_question(&mut self) -> Result<Vec<Event>> {
        if !matches!(self.state, QuizState::Presenting | QuizState::Evaluating) {
            return Err(CoreError::InvalidState(format!(
                "cannot advance while {:?}",
                self.state
            )));
        }
        self.pending = None;

        let session = self.session_mut()?;
        let next = session.question_index + 1;
        if next < session.questions.len() {
            session.question_index = next;
            session.selected.clear();
            let mut out = Vec::new();
            self.present_question(&mut out)?;
            return Ok(out);
        }
        self.complete_level().await
    }

    /// Record the active level as completed, persist progress, and continue
    /// with the next level or finish the session.
    pub async fn complete_level(&mut self) -> Result<Vec<Event>> {
        if !matches!(
            self.state,
            QuizState::Presenting | QuizState::Evaluating | QuizState::LevelComplete
        ) {
            return Err(CoreError::InvalidState(format!(
                "cannot complete a level while {:?}",
                self.state
            )));
        }
        let pending = self.pending.take();

        let (language_id, level, next) = {
            let session = self.session_ref()?;
            (
                session.language_id.clone(),
                session.active_level().clone(),
                session.levels.get(session.active + 1).cloned(),
            )
        };

        if let Err(e) = self
            .progress
            .record_completion(self.store.as_mut(), &language_id, &level.id)
        {
            tracing::warn!(level_id = %level.id, "saving progress failed: {e}");
            self.pending = pending;
            return Err(e);
        }

        let mut out = Vec::new();
        self.transition(QuizState::LevelComplete, &mut out);
        self.emit(
            &mut out,
            Event::LevelCompleted {
                level_id: level.id.clone(),
                at: Utc::now(),
            },
        );

        let Some(next) = next else {
            let session = self.session_mut()?;
            session.completed = true;
            session.selected.clear();
            let score = session.score;
            tracing::info!(%language_id, score, "quiz finished");
            self.transition(QuizState::SessionComplete, &mut out);
            self.emit(
                &mut out,
                Event::QuizFinished {
                    score,
                    at: Utc::now(),
                },
            );
            return Ok(out);
        };

        self.transition(QuizState::Loading, &mut out);
        match self.load_questions(&next, &mut out).await {
            Ok(questions) => {
                let session = self.session_mut()?;
                session.active += 1;
                session.questions = questions;
                session.question_index = 0;
                session.selected.clear();
                self.enter_level(&mut out)?;
                Ok(out)
            }
            Err(e) => {
                tracing::warn!(level_id = %next.id, "loading next level failed: {e}");
                self.transition(QuizState::LevelComplete, &mut out);
                Err(e)
            }
        }
    }

    /// Replay the active level from its first question.
    pub fn restart_level(&mut self) -> Result<Vec<Event>> {
        if matches!(self.state, QuizState::Idle | QuizState::Loading) {
            return Err(CoreError::InvalidState("quiz is not initialized".into()));
        }
        self.pending = None;
        let session = self.session_mut()?;
        session.question_index = 0;
        session.selected.clear();
        session.completed = false;
        let mut out = Vec::new();
        self.present_question(&mut out)?;
        Ok(out)
    }

    // ── Internal ─────────────────────────────────────────────────────

    async fn resolve_pending(&mut self) -> Result<Vec<Event>> {
        let Some(pending) = self.pending.take() else {
            return Ok(Vec::new());
        };
        if pending.correct {
            let result = self.advance_question().await;
            // Still evaluating means nothing moved on; keep the transition for a retry.
            if result.is_err() && self.state == QuizState::Evaluating {
                self.pending = Some(pending);
            }
            return result;
        }
        let mut out = Vec::new();
        self.session_mut()?.selected.clear();
        self.transition(QuizState::Presenting, &mut out);
        self.emit(
            &mut out,
            Event::SelectionChanged {
                selected: Vec::new(),
                at: Utc::now(),
            },
        );
        Ok(out)
    }

    async fn load_start(
        &mut self,
        language_id: &str,
        requested: Option<&str>,
        out: &mut Vec<Event>,
    ) -> Result<Loaded> {
        let progress = ProgressRecord::load(self.store.as_ref(), language_id)?;

        let mut levels: Vec<Level> = self
            .gateway
            .levels(LevelFilter::Language(language_id.to_string()))
            .await?
            .into_iter()
            .filter(|l| l.language_id.as_deref().map_or(true, |id| id == language_id))
            .collect();
        levels.sort_by_key(|l| l.level_number);
        if levels.is_empty() {
            return Err(CoreError::not_found("levels for language", language_id));
        }

        let active = start_index(&levels, &progress, requested);
        let questions = self.load_questions(&levels[active], out).await?;
        Ok(Loaded {
            progress,
            levels,
            active,
            questions,
        })
    }

    async fn load_questions(&mut self, level: &Level, out: &mut Vec<Event>) -> Result<Vec<Question>> {
        self.emit(
            out,
            Event::LevelLoading {
                level_id: level.id.clone(),
                at: Utc::now(),
            },
        );
        let questions: Vec<Question> = self
            .gateway
            .questions(QuestionFilter::Level(level.id.clone()))
            .await?
            .into_iter()
            .filter(|q| q.level_id.as_deref().map_or(true, |id| id == level.id))
            .collect();
        if questions.is_empty() {
            return Err(CoreError::not_found("questions for level", level.id.clone()));
        }
        Ok(questions)
    }

    fn enter_level(&mut self, out: &mut Vec<Event>) -> Result<()> {
        let session = self.session_ref()?;
        let level = session.active_level();
        let event = Event::LevelStarted {
            level_id: level.id.clone(),
            level_number: level.level_number,
            question_count: session.questions.len(),
            at: Utc::now(),
        };
        self.emit(out, event);
        self.present_question(out)
    }

    fn present_question(&mut self, out: &mut Vec<Event>) -> Result<()> {
        let session = self.session_ref()?;
        let question = session
            .current_question()
            .ok_or_else(|| CoreError::InvalidState("no question loaded".into()))?;
        let event = Event::QuestionPresented {
            level_id: session.active_level().id.clone(),
            question_index: session.question_index,
            question_id: question.id.clone(),
            prompt: question.prompt.clone(),
            at: Utc::now(),
        };
        self.transition(QuizState::Presenting, out);
        self.emit(out, event);
        Ok(())
    }

    /// Ok(true) when word picks are accepted; Ok(false) when they are
    /// silently ignored; Err when no question was ever loaded.
    fn accepts_picks(&self) -> Result<bool> {
        match self.state {
            QuizState::Presenting => Ok(true),
            QuizState::Evaluating | QuizState::LevelComplete | QuizState::SessionComplete => {
                tracing::debug!(state = ?self.state, "word pick ignored");
                Ok(false)
            }
            QuizState::Idle | QuizState::Loading => {
                Err(CoreError::InvalidState("no active question".into()))
            }
        }
    }

    fn session_ref(&self) -> Result<&QuizSession> {
        self.session
            .as_ref()
            .ok_or_else(|| CoreError::InvalidState("quiz is not initialized".into()))
    }

    fn session_mut(&mut self) -> Result<&mut QuizSession> {
        self.session
            .as_mut()
            .ok_or_else(|| CoreError::InvalidState("quiz is not initialized".into()))
    }

    fn current_question_or_err(&self) -> Result<&Question> {
        self.current_question()
            .ok_or_else(|| CoreError::InvalidState("no active question".into()))
    }

    fn transition(&mut self, to: QuizState, out: &mut Vec<Event>) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        self.emit(
            out,
            Event::StateChanged {
                from,
                to,
                at: Utc::now(),
            },
        );
    }

    fn emit(&mut self, out: &mut Vec<Event>, event: Event) {
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
        out.push(event);
    }
}

fn is_accessible(levels: &[Level], completed: &BTreeSet<String>, level_id: &str) -> bool {
    let Some(first) = levels.first() else {
        return false;
    };
    if first.id == level_id {
        return true;
    }
    match levels.iter().position(|l| l.id == level_id) {
        Some(idx) if idx > 0 => completed.contains(&levels[idx - 1].id),
        _ => false,
    }
}

fn start_index(levels: &[Level], progress: &ProgressRecord, requested: Option<&str>) -> usize {
    if let Some(requested) = requested {
        match levels.iter().position(|l| l.id == requested) {
            Some(idx) if is_accessible(levels, &progress.completed, requested) => return idx,
            Some(_) => tracing::warn!(level_id = requested, "requested level is locked"),
            None => tracing::warn!(level_id = requested, "requested level does not exist"),
        }
    }
    // After the final level has been completed the final level is replayed.
    progress
        .last_level
        .as_deref()
        .and_then(|last| levels.iter().position(|l| l.id == last))
        .map(|idx| (idx + 1).min(levels.len() - 1))
        .unwrap_or(0)
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use solfa_domain::{KeyboardKey, Question};

use crate::scoring::{apply_delta, ScoringEngine};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnswerStatus {
    Waiting,
    Correct,
    Incorrect,
}

/// Localization key for the feedback line; the UI resolves it to text.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FeedbackKey {
    WaitingSingle,
    WaitingChord,
    Correct,
    Incorrect,
}

/// What one key press did, for the orchestrator to act on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyPressOutcome {
    /// Not answerable right now; nothing changed.
    Ignored,
    /// A chord member landed but the chord is not complete yet.
    Progress,
    Correct {
        awarded: u32,
    },
    Incorrect {
        key: KeyboardKey,
    },
}

/// The whole answerable state of one running game, mutated only through
/// the transition methods so every rule stays in one place.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub status: AnswerStatus,
    pub question: Question,
    pub pressed_keys: HashSet<KeyboardKey>,
    pub error_keys: HashSet<KeyboardKey>,
    pub score: u32,
    pub streak: u32,
    /// Highest streak reached since the last scoreboard reset.
    pub best_streak: u32,
    pub last_awarded: Option<u32>,
    pub feedback: FeedbackKey,
    pub answer_started_ms: u64,
}

impl Session {
    pub fn new(question: Question, chord_mode: bool, now_ms: u64) -> Self {
        Self {
            status: AnswerStatus::Waiting,
            question,
            pressed_keys: HashSet::new(),
            error_keys: HashSet::new(),
            score: 0,
            streak: 0,
            best_streak: 0,
            last_awarded: None,
            feedback: waiting_feedback(chord_mode),
            answer_started_ms: now_ms,
        }
    }

    /// Swap in the next question and reopen the answer window.
    pub fn install_question(&mut self, question: Question, chord_mode: bool, now_ms: u64) {
        self.question = question;
        self.status = AnswerStatus::Waiting;
        self.pressed_keys.clear();
        self.error_keys.clear();
        self.last_awarded = None;
        self.feedback = waiting_feedback(chord_mode);
        self.answer_started_ms = now_ms;
    }

    /// Settings change or challenge restart: the scoreboard starts over.
    pub fn reset_scoreboard(&mut self) {
        self.score = 0;
        self.streak = 0;
        self.best_streak = 0;
        self.last_awarded = None;
    }

    pub fn apply_key_press(
        &mut self,
        key: KeyboardKey,
        chord_mode: bool,
        engine: &ScoringEngine,
        now_ms: u64,
    ) -> KeyPressOutcome {
        if self.status != AnswerStatus::Waiting {
            return KeyPressOutcome::Ignored;
        }

        if chord_mode {
            if self.question.contains_key(key) {
                if !self.pressed_keys.insert(key) {
                    // Re-pressing a held member changes nothing.
                    return KeyPressOutcome::Progress;
                }
                if self.pressed_keys.len() == self.question.notes.len() {
                    self.complete(engine, now_ms)
                } else {
                    KeyPressOutcome::Progress
                }
            } else {
                self.miss(key, engine);
                KeyPressOutcome::Incorrect { key }
            }
        } else if key == self.question.root().keyboard_key {
            self.pressed_keys.insert(key);
            self.complete(engine, now_ms)
        } else {
            self.miss(key, engine);
            KeyPressOutcome::Incorrect { key }
        }
    }

    pub fn clear_error_key(&mut self, key: KeyboardKey) {
        self.error_keys.remove(&key);
    }

    fn complete(&mut self, engine: &ScoringEngine, now_ms: u64) -> KeyPressOutcome {
        let elapsed_ms = now_ms.saturating_sub(self.answer_started_ms);
        let update = engine.assess(true, elapsed_ms, self.streak);
        self.score = apply_delta(self.score, update.score_delta);
        self.streak = update.new_streak;
        self.best_streak = self.best_streak.max(self.streak);
        let awarded = update.score_delta.max(0) as u32;
        self.last_awarded = Some(awarded);
        self.status = AnswerStatus::Correct;
        self.feedback = FeedbackKey::Correct;
        KeyPressOutcome::Correct { awarded }
    }

    /// A wrong key costs points and flashes, but the question stays
    /// answerable: the status does not leave `Waiting`.
    fn miss(&mut self, key: KeyboardKey, engine: &ScoringEngine) {
        self.error_keys.insert(key);
        let update = engine.assess(false, 0, self.streak);
        self.score = apply_delta(self.score, update.score_delta);
        self.streak = update.new_streak;
        self.feedback = FeedbackKey::Incorrect;
    }
}

fn waiting_feedback(chord_mode: bool) -> FeedbackKey {
    if chord_mode {
        FeedbackKey::WaitingChord
    } else {
        FeedbackKey::WaitingSingle
    }
}

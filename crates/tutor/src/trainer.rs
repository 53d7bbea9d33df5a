use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use solfa_audio::{TonePlayer, Waveform};
use solfa_domain::{GameMode, HistoryLog, HistoryStore, KeyboardKey, ScoreRecord, Settings};

use crate::challenge::ChallengeState;
use crate::generator::QuestionGenerator;
use crate::scheduler::{Scheduler, TimerEvent, TimerToken};
use crate::scoring::ScoringEngine;
use crate::session::{KeyPressOutcome, Session};

const KEY_TONE: Duration = Duration::from_millis(300);
const ROUND_OVER_TONE: Duration = Duration::from_millis(500);
const ROUND_OVER_HZ: f64 = 300.0;
const ERROR_CLEAR_MS: u64 = 500;
const ADVANCE_MS: u64 = 1_200;
const CHALLENGE_ADVANCE_MS: u64 = 300;
const TICK_MS: u64 = 1_000;

/// Ties the session, generator, scheduler and challenge round together
/// behind the event surface the UI layers drive: key presses in, elapsed
/// time in, snapshots out.
pub struct Trainer {
    settings: Settings,
    session: Session,
    challenge: ChallengeState,
    history: HistoryLog,
    scheduler: Scheduler,
    generator: QuestionGenerator,
    scoring: ScoringEngine,
    rng: StdRng,
    player: Box<dyn TonePlayer>,
    store: Box<dyn HistoryStore>,
    advance_timer: Option<TimerToken>,
    tick_timer: Option<TimerToken>,
}

impl Trainer {
    pub fn new(
        settings: Settings,
        player: Box<dyn TonePlayer>,
        store: Box<dyn HistoryStore>,
    ) -> Self {
        Self::with_rng(settings, player, store, StdRng::from_entropy())
    }

    /// Deterministic construction for tests and replays.
    pub fn with_rng(
        settings: Settings,
        player: Box<dyn TonePlayer>,
        store: Box<dyn HistoryStore>,
        mut rng: StdRng,
    ) -> Self {
        let history = match store.load() {
            Ok(records) => HistoryLog::from_records(records),
            Err(err) => {
                warn!(%err, "history unavailable, starting empty");
                HistoryLog::new()
            }
        };
        let scheduler = Scheduler::new();
        let generator = QuestionGenerator;
        let mode = effective_mode(settings.mode);
        let question = generator.generate(
            &mut rng,
            mode,
            settings.clef,
            settings.key_signature,
            settings.difficulty,
            None,
        );
        let session = Session::new(question, mode == GameMode::Chord, scheduler.now_ms());
        Self {
            settings,
            session,
            challenge: ChallengeState::idle(),
            history,
            scheduler,
            generator,
            scoring: ScoringEngine,
            rng,
            player,
            store,
            advance_timer: None,
            tick_timer: None,
        }
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn challenge(&self) -> ChallengeState {
        self.challenge
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// A key press from the keyboard widget. Scoring, feedback and the
    /// follow-up timers all happen here, synchronously.
    pub fn handle_key_press(&mut self, key: KeyboardKey) -> KeyPressOutcome {
        if self.settings.mode == GameMode::Challenge && !self.challenge.active {
            return KeyPressOutcome::Ignored;
        }
        let mode = effective_mode(self.settings.mode);
        let outcome = self.session.apply_key_press(
            key,
            mode == GameMode::Chord,
            &self.scoring,
            self.scheduler.now_ms(),
        );
        if outcome == KeyPressOutcome::Ignored {
            return outcome;
        }

        self.play(key.frequency_hz(), Waveform::Triangle, KEY_TONE);
        match outcome {
            KeyPressOutcome::Correct { awarded } => {
                debug!(awarded, streak = self.session.streak, "correct answer");
                let delay = if self.challenge.active {
                    CHALLENGE_ADVANCE_MS
                } else {
                    ADVANCE_MS
                };
                if let Some(token) = self.advance_timer.take() {
                    self.scheduler.cancel(token);
                }
                self.advance_timer = Some(
                    self.scheduler
                        .schedule_in(delay, TimerEvent::AdvanceQuestion),
                );
            }
            KeyPressOutcome::Incorrect { key } => {
                debug!(%key, "wrong key");
                self.scheduler
                    .schedule_in(ERROR_CLEAR_MS, TimerEvent::ClearErrorKey(key));
            }
            KeyPressOutcome::Progress | KeyPressOutcome::Ignored => {}
        }
        outcome
    }

    /// Push virtual time forward, firing every timer that comes due on
    /// the way. The embedder calls this from its real clock.
    pub fn advance(&mut self, delta_ms: u64) {
        let target = self.scheduler.now_ms() + delta_ms;
        while let Some(due) = self.scheduler.next_due_ms() {
            if due > target {
                break;
            }
            let step = due.saturating_sub(self.scheduler.now_ms());
            for event in self.scheduler.advance(step) {
                self.dispatch(event);
            }
        }
        let remaining = target.saturating_sub(self.scheduler.now_ms());
        if remaining > 0 {
            self.scheduler.advance(remaining);
        }
    }

    pub fn start_challenge(&mut self) {
        info!("challenge round starting");
        self.teardown_timers();
        self.session.reset_scoreboard();
        self.challenge.start();
        self.tick_timer = Some(self.scheduler.schedule_in(TICK_MS, TimerEvent::ChallengeTick));
        self.install_fresh_question();
    }

    /// Any settings change is a full reset: score, streak, challenge and
    /// every pending timer go, and a fresh question comes in.
    pub fn set_settings(&mut self, settings: Settings) {
        info!(
            mode = %settings.mode,
            clef = %settings.clef,
            key = %settings.key_signature,
            difficulty = %settings.difficulty,
            "settings changed, resetting session"
        );
        self.settings = settings;
        self.teardown_timers();
        self.challenge = ChallengeState::idle();
        self.session.reset_scoreboard();
        self.install_fresh_question();
    }

    fn dispatch(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::ClearErrorKey(key) => self.session.clear_error_key(key),
            TimerEvent::AdvanceQuestion => {
                self.advance_timer = None;
                self.next_question();
            }
            TimerEvent::ChallengeTick => {
                self.tick_timer = None;
                if self.challenge.tick() {
                    self.finish_round();
                } else if self.challenge.active {
                    self.tick_timer =
                        Some(self.scheduler.schedule_in(TICK_MS, TimerEvent::ChallengeTick));
                }
            }
        }
    }

    fn next_question(&mut self) {
        if self.settings.mode == GameMode::Challenge && !self.challenge.active {
            return;
        }
        self.install_fresh_question();
    }

    fn install_fresh_question(&mut self) {
        let mode = effective_mode(self.settings.mode);
        let previous = self.session.question.root_identity.clone();
        let question = self.generator.generate(
            &mut self.rng,
            mode,
            self.settings.clef,
            self.settings.key_signature,
            self.settings.difficulty,
            Some(previous.as_str()),
        );
        debug!(root = %question.root_identity, "installing question");
        self.session
            .install_question(question, mode == GameMode::Chord, self.scheduler.now_ms());
    }

    fn finish_round(&mut self) {
        info!(
            score = self.session.score,
            best_streak = self.session.best_streak,
            "challenge round over"
        );
        self.play(ROUND_OVER_HZ, Waveform::Sine, ROUND_OVER_TONE);
        let record = ScoreRecord::new(
            self.session.score,
            self.session.best_streak,
            self.settings.difficulty,
        );
        self.history.push(record);
        if let Err(err) = self.store.save(self.history.records()) {
            warn!(%err, "failed to persist history");
        }
    }

    fn teardown_timers(&mut self) {
        self.scheduler.cancel_all();
        self.advance_timer = None;
        self.tick_timer = None;
    }

    fn play(&self, frequency_hz: f64, waveform: Waveform, duration: Duration) {
        if let Err(err) = self.player.play_tone(frequency_hz, waveform, duration) {
            warn!(%err, "tone playback failed");
        }
    }
}

fn effective_mode(mode: GameMode) -> GameMode {
    // Challenge rounds always quiz single notes.
    if mode == GameMode::Challenge {
        GameMode::Single
    } else {
        mode
    }
}

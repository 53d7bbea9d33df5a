use serde::{Deserialize, Serialize};

pub const CHALLENGE_SECONDS: u32 = 60;

/// Countdown state for the timed round. Expiry is reported exactly once
/// even if a stray tick arrives after the round already ended.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChallengeState {
    pub active: bool,
    pub seconds_remaining: u32,
}

impl ChallengeState {
    pub fn idle() -> Self {
        Self {
            active: false,
            seconds_remaining: CHALLENGE_SECONDS,
        }
    }

    pub fn start(&mut self) {
        self.active = true;
        self.seconds_remaining = CHALLENGE_SECONDS;
    }

    /// One second elapsed; returns true exactly when this tick ends the
    /// round.
    pub fn tick(&mut self) -> bool {
        if !self.active || self.seconds_remaining == 0 {
            return false;
        }
        self.seconds_remaining -= 1;
        if self.seconds_remaining == 0 {
            self.active = false;
            true
        } else {
            false
        }
    }
}

impl Default for ChallengeState {
    fn default() -> Self {
        Self::idle()
    }
}

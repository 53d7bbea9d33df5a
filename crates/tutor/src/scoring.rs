use serde::{Deserialize, Serialize};

pub const BASE_POINTS: i32 = 100;
pub const MISS_PENALTY: i32 = 50;
pub const TIME_BONUS_CEILING: f64 = 50.0;
/// Answers slower than this earn no time bonus.
pub const TIME_BONUS_WINDOW_MS: u64 = 10_000;
pub const STREAK_BONUS_STEP: u32 = 10;
pub const STREAK_BONUS_CAP: u32 = 100;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreUpdate {
    pub score_delta: i32,
    pub new_streak: u32,
}

pub struct ScoringEngine;

impl ScoringEngine {
    /// Pure scoring rule. The streak bonus uses the streak as it stood
    /// before this answer.
    pub fn assess(&self, correct: bool, elapsed_ms: u64, streak: u32) -> ScoreUpdate {
        if !correct {
            return ScoreUpdate {
                score_delta: -MISS_PENALTY,
                new_streak: 0,
            };
        }
        let streak_bonus = (streak * STREAK_BONUS_STEP).min(STREAK_BONUS_CAP) as i32;
        ScoreUpdate {
            score_delta: BASE_POINTS + time_bonus(elapsed_ms) + streak_bonus,
            new_streak: streak + 1,
        }
    }
}

fn time_bonus(elapsed_ms: u64) -> i32 {
    let fraction = 1.0 - elapsed_ms as f64 / TIME_BONUS_WINDOW_MS as f64;
    ((TIME_BONUS_CEILING * fraction).floor() as i32).max(0)
}

/// Applies a delta to a cumulative score that never drops below zero.
pub fn apply_delta(score: u32, delta: i32) -> u32 {
    if delta >= 0 {
        score + delta as u32
    } else {
        score.saturating_sub(delta.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_answer_with_streak() {
        let update = ScoringEngine.assess(true, 500, 3);
        // 100 base + floor(50 * 0.95) + 3 * 10
        assert_eq!(update.score_delta, 177);
        assert_eq!(update.new_streak, 4);
    }

    #[test]
    fn instant_answer_maxes_the_time_bonus() {
        let update = ScoringEngine.assess(true, 0, 0);
        assert_eq!(update.score_delta, 150);
    }

    #[test]
    fn slow_answers_earn_no_time_bonus() {
        assert_eq!(ScoringEngine.assess(true, 10_000, 0).score_delta, 100);
        assert_eq!(ScoringEngine.assess(true, 25_000, 0).score_delta, 100);
    }

    #[test]
    fn streak_bonus_is_capped() {
        let update = ScoringEngine.assess(true, 10_000, 37);
        assert_eq!(update.score_delta, 200);
        assert_eq!(update.new_streak, 38);
    }

    #[test]
    fn miss_resets_the_streak() {
        let update = ScoringEngine.assess(false, 123, 9);
        assert_eq!(update.score_delta, -50);
        assert_eq!(update.new_streak, 0);
    }

    #[test]
    fn cumulative_score_clamps_at_zero() {
        assert_eq!(apply_delta(20, -50), 0);
        assert_eq!(apply_delta(70, -50), 20);
        assert_eq!(apply_delta(0, 177), 177);
    }
}

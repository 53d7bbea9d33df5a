pub mod challenge;
pub mod generator;
pub mod scheduler;
pub mod scoring;
pub mod session;
pub mod trainer;

pub use challenge::{ChallengeState, CHALLENGE_SECONDS};
pub use generator::QuestionGenerator;
pub use scheduler::{Scheduler, TimerEvent, TimerToken};
pub use scoring::{apply_delta, ScoreUpdate, ScoringEngine};
pub use session::{AnswerStatus, FeedbackKey, KeyPressOutcome, Session};
pub use trainer::Trainer;

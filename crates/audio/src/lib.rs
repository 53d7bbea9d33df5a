pub mod backend;
pub mod tone;

pub use backend::{CpalPlayer, NullPlayer, TonePlayer};
pub use tone::{render_tone, Waveform, DEFAULT_SAMPLE_RATE};

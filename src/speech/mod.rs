//! Speech synthesis system

pub mod backends;
pub mod engine;
pub mod pcm;
pub mod wav;

pub use engine::{create_engine, SpeechEngine, Synthesis, VoiceStyle};

//! Deterministic mock backend
//!
//! Generates a pure tone instead of speech: each voice maps to a fixed
//! pitch and the duration scales with text length and inversely with the
//! speed factor. Used by the integration tests and for running the
//! daemon on machines without a synthesizer installed.

use crate::speech::engine::{SpeechEngine, Synthesis, VoiceStyle};
use crate::{Result, TtsdError};
use log::debug;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::f32::consts::TAU;

/// Voice table: identifier -> tone pitch in Hz
///
/// Male voices sit around A2, female voices an octave up.
static VOICE_PITCHES: Lazy<HashMap<&'static str, f32>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("M1", 110.00);
    m.insert("M2", 98.00);
    m.insert("M3", 123.47);
    m.insert("M4", 87.31);
    m.insert("F1", 220.00);
    m.insert("F2", 196.00);
    m.insert("F3", 246.94);
    m.insert("F4", 174.61);
    m
});

/// Output sample rate of the mock engine
pub const MOCK_SAMPLE_RATE: u32 = 44_100;

/// Seconds of tone per character at speed 1.0
const SECONDS_PER_CHAR: f32 = 0.08;

/// Tone generator engine
pub struct MockEngine {
    sample_rate: u32,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            sample_rate: MOCK_SAMPLE_RATE,
        }
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechEngine for MockEngine {
    fn voice_style(&mut self, voice: &str) -> Result<VoiceStyle> {
        if VOICE_PITCHES.contains_key(voice) {
            Ok(VoiceStyle::new(voice, voice))
        } else {
            Err(TtsdError::UnknownVoice(voice.to_string()))
        }
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn synthesize(
        &mut self,
        text: &str,
        style: &VoiceStyle,
        _language: &str,
        _steps: u32,
        speed: f32,
    ) -> Result<Synthesis> {
        let pitch = VOICE_PITCHES
            .get(style.token())
            .copied()
            .ok_or_else(|| TtsdError::UnknownVoice(style.voice().to_string()))?;

        // A non-positive or non-finite speed would make the duration
        // unbounded; fall back to unity for tone generation
        let speed = if speed.is_finite() && speed > 0.0 {
            speed
        } else {
            1.0
        };

        let duration = (text.chars().count() as f32 * SECONDS_PER_CHAR / speed).max(0.05);
        let sample_count = (duration * self.sample_rate as f32) as usize;

        debug!(
            "Mock synthesis: {} chars at {} Hz for {:.2}s",
            text.chars().count(),
            pitch,
            duration
        );

        let waveform: Vec<f32> = (0..sample_count)
            .map(|i| {
                let t = i as f32 / self.sample_rate as f32;
                0.5 * (TAU * pitch * t).sin()
            })
            .collect();

        Ok(Synthesis { waveform, duration })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_voices_resolve() {
        let mut engine = MockEngine::new();
        let style = engine.voice_style("M1").unwrap();
        assert_eq!(style.voice(), "M1");
        assert!(engine.voice_style("F1").is_ok());
    }

    #[test]
    fn test_unknown_voice_fails() {
        let mut engine = MockEngine::new();
        let err = engine.voice_style("doesnotexist").unwrap_err();
        assert!(matches!(err, TtsdError::UnknownVoice(_)));
    }

    #[test]
    fn test_synthesis_is_non_silent() {
        let mut engine = MockEngine::new();
        let style = engine.voice_style("M1").unwrap();
        let result = engine.synthesize("hello", &style, "ko", 5, 1.0).unwrap();
        assert!(!result.waveform.is_empty());
        assert!(result.duration > 0.0);
        assert!(result.waveform.iter().any(|&s| s.abs() > 0.01));
        // Tone stays inside the nominal sample range
        assert!(result.waveform.iter().all(|&s| s.abs() <= 1.0));
    }

    #[test]
    fn test_speed_shortens_output() {
        let mut engine = MockEngine::new();
        let style = engine.voice_style("M1").unwrap();
        let slow = engine.synthesize("hello world", &style, "ko", 5, 1.0).unwrap();
        let fast = engine.synthesize("hello world", &style, "ko", 5, 2.0).unwrap();
        assert!(fast.waveform.len() < slow.waveform.len());
    }
}

//! Speech engine abstraction
//!
//! The daemon treats the synthesizer as an opaque collaborator: it
//! resolves voice identifiers to style handles, reports a fixed sample
//! rate, and turns text into a floating-point waveform. Backends
//! implement this trait; the daemon never sees past it.

use crate::{Result, TtsdError};
use log::info;

use super::backends::espeak::EspeakEngine;
use super::backends::mock::MockEngine;

/// Opaque voice-style handle derived from a voice identifier
///
/// `token` is backend-specific (an espeak variant name, a mock voice key)
/// and is only meaningful to the engine that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceStyle {
    voice: String,
    token: String,
}

impl VoiceStyle {
    pub(crate) fn new(voice: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            voice: voice.into(),
            token: token.into(),
        }
    }

    /// The voice identifier this style was resolved from
    pub fn voice(&self) -> &str {
        &self.voice
    }

    /// Backend-specific style token
    pub(crate) fn token(&self) -> &str {
        &self.token
    }
}

/// One synthesis result: normalized waveform plus reported duration
///
/// Samples are nominally in [-1, 1]; the PCM conversion documents what
/// happens outside that range. Not retained across requests.
pub struct Synthesis {
    /// Mono waveform at the engine's fixed sample rate
    pub waveform: Vec<f32>,
    /// Reported audio duration in seconds, for diagnostics
    pub duration: f32,
}

/// Speech synthesis engine
///
/// All backends implement this to provide text-to-speech. Calls are
/// blocking and synchronous; the daemon has no other work while a
/// synthesis is in flight.
pub trait SpeechEngine: Send {
    /// Resolve a voice identifier to an opaque style handle
    ///
    /// Fails with a lookup error for unknown identifiers.
    fn voice_style(&mut self, voice: &str) -> Result<VoiceStyle>;

    /// Fixed output sample rate, constant after initialization
    fn sample_rate(&self) -> u32;

    /// Synthesize text into a waveform
    ///
    /// `steps` is the synthesis step count; backends without a stepped
    /// inference process accept and ignore it.
    fn synthesize(
        &mut self,
        text: &str,
        style: &VoiceStyle,
        language: &str,
        steps: u32,
        speed: f32,
    ) -> Result<Synthesis>;
}

/// Create the configured engine backend
///
/// Engine construction is the expensive one-time startup cost the daemon
/// exists to amortize; a failure here is fatal since there is no request
/// loop to protect yet.
pub fn create_engine(backend: &str) -> Result<Box<dyn SpeechEngine>> {
    match backend {
        "espeak" => {
            info!("Initializing espeak-ng engine backend");
            Ok(Box::new(EspeakEngine::new()?))
        }
        "mock" => {
            info!("Initializing mock engine backend");
            Ok(Box::new(MockEngine::new()))
        }
        other => Err(TtsdError::Config(format!(
            "Unknown engine backend '{}' (expected 'espeak' or 'mock')",
            other
        ))),
    }
}

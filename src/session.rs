//! Session state
//!
//! The process-lifetime record of the active voice, language, speed, and
//! step count, together with the engine handle and the style resolved
//! from the current voice. Created once at startup and mutated in place
//! by control commands; the single-threaded loop serializes all access.

use crate::speech::{pcm, SpeechEngine, VoiceStyle};
use crate::Result;
use log::info;

/// Mutable daemon session
pub struct Session {
    /// Active voice identifier
    voice: String,

    /// Active language code, unvalidated
    language: String,

    /// Active speed factor
    speed: f32,

    /// Synthesis step count, fixed at startup
    steps: u32,

    /// Style handle resolved from the active voice
    style: VoiceStyle,

    /// The resident synthesis engine
    engine: Box<dyn SpeechEngine>,
}

impl Session {
    /// Create the session, resolving the initial voice style
    ///
    /// Fails if the initial voice is unknown to the engine; at startup
    /// there is no client to acknowledge, so the failure is fatal.
    pub fn new(
        mut engine: Box<dyn SpeechEngine>,
        voice: &str,
        language: &str,
        speed: f32,
        steps: u32,
    ) -> Result<Self> {
        let style = engine.voice_style(voice)?;

        Ok(Self {
            voice: voice.to_string(),
            language: language.to_string(),
            speed,
            steps,
            style,
            engine,
        })
    }

    pub fn voice(&self) -> &str {
        &self.voice
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// The engine's fixed output sample rate
    pub fn sample_rate(&self) -> u32 {
        self.engine.sample_rate()
    }

    /// Change the active voice
    ///
    /// Re-resolves the style through the engine; on failure the previous
    /// voice and style stay in effect.
    pub fn set_voice(&mut self, voice: &str) -> Result<()> {
        let style = self.engine.voice_style(voice)?;
        self.style = style;
        self.voice = voice.to_string();
        info!("Voice changed to {}", voice);
        Ok(())
    }

    /// Change the language code, unconditionally
    pub fn set_language(&mut self, language: &str) {
        self.language = language.to_string();
        info!("Language changed to {}", language);
    }

    /// Change the speed factor from its textual form
    ///
    /// An unparsable value leaves the current speed in effect.
    pub fn set_speed(&mut self, raw: &str) -> Result<()> {
        let speed: f32 = raw
            .parse()
            .map_err(|_| format!("Invalid speed value '{}'", raw))?;
        self.speed = speed;
        info!("Speed changed to {}", speed);
        Ok(())
    }

    /// Synthesize text with the current session parameters
    ///
    /// Returns the serialized 16-bit PCM payload and the reported audio
    /// duration; writing it to the wire is the caller's job.
    pub fn synthesize(&mut self, text: &str) -> Result<(Vec<u8>, f32)> {
        let result = self.engine.synthesize(
            text,
            &self.style,
            &self.language,
            self.steps,
            self.speed,
        )?;
        Ok((pcm::waveform_to_pcm(&result.waveform), result.duration))
    }
}

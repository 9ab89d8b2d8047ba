//! espeak-ng subprocess backend
//!
//! Shells out to espeak-ng for each synthesis, capturing the WAV stream
//! it writes to stdout. Voice identifiers map onto espeak voice variants
//! (M1 -> m1, F2 -> f2, ...), validated against the installed variant
//! listing at startup.
//!
//! Dependencies:
//! - espeak-ng (install with: sudo apt install espeak-ng)

use crate::speech::engine::{SpeechEngine, Synthesis, VoiceStyle};
use crate::speech::wav;
use crate::{Result, TtsdError};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::io::Write;
use std::process::{Command, Stdio};

/// Matches the variant file column of `espeak-ng --voices=variant` output,
/// e.g. "!v/m1"
static VARIANT_FILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!v/(\S+)").expect("variant regex"));

/// espeak's default speaking rate in words per minute
const BASE_WPM: f32 = 175.0;

/// espeak-ng subprocess engine
pub struct EspeakEngine {
    /// Path to espeak-ng
    espeak_path: String,

    /// Installed voice variant tokens, lowercase
    variants: HashSet<String>,

    /// Output sample rate, probed once at startup
    sample_rate: u32,
}

impl EspeakEngine {
    /// Create a new espeak-ng engine
    ///
    /// Verifies espeak-ng is installed, loads the variant table, and
    /// probes the output sample rate from a short synthesis.
    pub fn new() -> Result<Self> {
        let espeak_path = Self::find_espeak()?;
        debug!("Found espeak-ng at: {}", espeak_path);

        let variants = Self::list_variants(&espeak_path)?;
        debug!("Loaded {} espeak voice variants", variants.len());

        let sample_rate = Self::probe_sample_rate(&espeak_path)?;
        info!("espeak-ng ready, sample rate {} Hz", sample_rate);

        Ok(Self {
            espeak_path,
            variants,
            sample_rate,
        })
    }

    /// Find the espeak-ng executable
    fn find_espeak() -> Result<String> {
        let paths = ["espeak-ng", "/usr/bin/espeak-ng"];

        for path in paths {
            if let Ok(status) = Command::new(path)
                .arg("--version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
            {
                if status.success() {
                    return Ok(path.to_string());
                }
            }
        }

        Err(TtsdError::Engine(
            "espeak-ng not found. Install with: sudo apt install espeak-ng".to_string(),
        ))
    }

    /// Load the installed voice variant tokens
    fn list_variants(espeak_path: &str) -> Result<HashSet<String>> {
        let output = Command::new(espeak_path)
            .arg("--voices=variant")
            .stderr(Stdio::null())
            .output()
            .map_err(|e| TtsdError::Engine(format!("Failed to list espeak voices: {}", e)))?;

        if !output.status.success() {
            return Err(TtsdError::Engine(
                "espeak-ng --voices=variant failed".to_string(),
            ));
        }

        let listing = String::from_utf8_lossy(&output.stdout);
        let variants: HashSet<String> = listing
            .lines()
            .filter_map(|line| VARIANT_FILE.captures(line))
            .map(|caps| caps[1].to_lowercase())
            .collect();

        if variants.is_empty() {
            return Err(TtsdError::Engine(
                "espeak-ng reported no voice variants".to_string(),
            ));
        }

        Ok(variants)
    }

    /// Probe the output sample rate by synthesizing a short utterance
    fn probe_sample_rate(espeak_path: &str) -> Result<u32> {
        let bytes = Self::run_espeak(espeak_path, ".", "en", BASE_WPM as u32)?;
        let audio = wav::parse(&bytes)?;
        Ok(audio.sample_rate)
    }

    /// Run one espeak-ng synthesis, returning the captured WAV stream
    fn run_espeak(espeak_path: &str, text: &str, voice: &str, wpm: u32) -> Result<Vec<u8>> {
        let mut child = Command::new(espeak_path)
            .arg("--stdout")
            .arg("--stdin")
            .arg("-v")
            .arg(voice)
            .arg("-s")
            .arg(wpm.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| TtsdError::Engine(format!("Failed to spawn espeak-ng: {}", e)))?;

        {
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| TtsdError::Engine("espeak-ng stdin unavailable".to_string()))?;
            stdin
                .write_all(text.as_bytes())
                .map_err(|e| TtsdError::Engine(format!("Failed to write to espeak-ng: {}", e)))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| TtsdError::Engine(format!("Failed to wait for espeak-ng: {}", e)))?;

        if !output.status.success() {
            return Err(TtsdError::Engine(format!(
                "espeak-ng exited with {}",
                output.status
            )));
        }

        Ok(output.stdout)
    }

    /// Convert a speed factor to espeak words per minute
    ///
    /// Factor 1.0 is espeak's 175 wpm default; the result is clamped to
    /// espeak's accepted 80-450 wpm range.
    fn speed_to_wpm(speed: f32) -> u32 {
        let wpm = (BASE_WPM * speed).round();
        wpm.clamp(80.0, 450.0) as u32
    }
}

impl SpeechEngine for EspeakEngine {
    fn voice_style(&mut self, voice: &str) -> Result<VoiceStyle> {
        let token = voice.to_lowercase();
        if self.variants.contains(&token) {
            Ok(VoiceStyle::new(voice, token))
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
        language: &str,
        _steps: u32,
        speed: f32,
    ) -> Result<Synthesis> {
        // espeak has no stepped inference; the step count is accepted for
        // interface parity and ignored
        let voice = format!("{}+{}", language, style.token());
        let wpm = Self::speed_to_wpm(speed);

        let bytes = Self::run_espeak(&self.espeak_path, text, &voice, wpm)?;
        let audio = wav::parse(&bytes)?;

        if audio.sample_rate != self.sample_rate {
            warn!(
                "espeak sample rate changed mid-run: {} -> {}",
                self.sample_rate, audio.sample_rate
            );
        }

        let waveform: Vec<f32> = audio
            .samples
            .iter()
            .map(|&s| s as f32 / 32768.0)
            .collect();
        let duration = waveform.len() as f32 / audio.sample_rate as f32;

        Ok(Synthesis { waveform, duration })
    }
}

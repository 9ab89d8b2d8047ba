//! Minimal RIFF/WAV reader
//!
//! Parses the 16-bit mono PCM stream espeak-ng writes to stdout. espeak
//! emits the header before it knows the final audio length, so the
//! declared data-chunk size is unreliable; the reader takes whatever
//! bytes actually arrived instead of trusting it.

use crate::{Result, TtsdError};

/// Decoded WAV audio
pub struct WavAudio {
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<i16>,
}

fn read_u16(bytes: &[u8], at: usize) -> Result<u16> {
    let chunk: [u8; 2] = bytes
        .get(at..at + 2)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| TtsdError::Engine("Truncated WAV header".to_string()))?;
    Ok(u16::from_le_bytes(chunk))
}

fn read_u32(bytes: &[u8], at: usize) -> Result<u32> {
    let chunk: [u8; 4] = bytes
        .get(at..at + 4)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| TtsdError::Engine("Truncated WAV header".to_string()))?;
    Ok(u32::from_le_bytes(chunk))
}

/// Parse a WAV byte stream
///
/// Requires an uncompressed 16-bit PCM format chunk ahead of the data
/// chunk. Chunks other than `fmt ` and `data` are skipped.
pub fn parse(bytes: &[u8]) -> Result<WavAudio> {
    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(TtsdError::Engine("Not a RIFF/WAVE stream".to_string()));
    }

    let mut format: Option<(u16, u16, u32, u16)> = None;
    let mut pos = 12;

    while pos + 8 <= bytes.len() {
        let chunk_id = &bytes[pos..pos + 4];
        let chunk_size = read_u32(bytes, pos + 4)? as usize;
        let body = pos + 8;

        match chunk_id {
            b"fmt " => {
                let audio_format = read_u16(bytes, body)?;
                let channels = read_u16(bytes, body + 2)?;
                let sample_rate = read_u32(bytes, body + 4)?;
                let bits_per_sample = read_u16(bytes, body + 14)?;
                format = Some((audio_format, channels, sample_rate, bits_per_sample));
            }
            b"data" => {
                let (audio_format, channels, sample_rate, bits_per_sample) = format
                    .ok_or_else(|| {
                        TtsdError::Engine("WAV data chunk before fmt chunk".to_string())
                    })?;
                if audio_format != 1 || bits_per_sample != 16 {
                    return Err(TtsdError::Engine(format!(
                        "Unsupported WAV format (format={}, bits={})",
                        audio_format, bits_per_sample
                    )));
                }

                // Streamed headers declare a placeholder size; use the
                // bytes that are actually present
                let available = bytes.len() - body;
                let take = if chunk_size == 0 || chunk_size > available {
                    available
                } else {
                    chunk_size
                };

                let samples = bytes[body..body + take]
                    .chunks_exact(2)
                    .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
                    .collect();

                return Ok(WavAudio {
                    sample_rate,
                    channels,
                    samples,
                });
            }
            _ => {}
        }

        // Chunk bodies are padded to even length
        pos = body + chunk_size + (chunk_size & 1);
    }

    Err(TtsdError::Engine("WAV stream has no data chunk".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a minimal WAV stream around the given samples
    fn wav_bytes(sample_rate: u32, samples: &[i16], declared_data_size: u32) -> Vec<u8> {
        let data: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        let mut out = Vec::new();
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data.len() as u32).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes()); // PCM
        out.extend_from_slice(&1u16.to_le_bytes()); // mono
        out.extend_from_slice(&sample_rate.to_le_bytes());
        out.extend_from_slice(&(sample_rate * 2).to_le_bytes()); // byte rate
        out.extend_from_slice(&2u16.to_le_bytes()); // block align
        out.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
        out.extend_from_slice(b"data");
        out.extend_from_slice(&declared_data_size.to_le_bytes());
        out.extend_from_slice(&data);
        out
    }

    #[test]
    fn test_parse_well_formed() {
        let samples = [0i16, 1000, -1000, i16::MAX];
        let wav = wav_bytes(22050, &samples, 8);
        let audio = parse(&wav).unwrap();
        assert_eq!(audio.sample_rate, 22050);
        assert_eq!(audio.channels, 1);
        assert_eq!(audio.samples, samples);
    }

    #[test]
    fn test_parse_bogus_declared_size() {
        // espeak's streamed header lies about the data size
        let samples = [42i16, -42];
        let wav = wav_bytes(22050, &samples, u32::MAX);
        let audio = parse(&wav).unwrap();
        assert_eq!(audio.samples, samples);
    }

    #[test]
    fn test_parse_rejects_non_riff() {
        assert!(parse(b"OggS garbage that is not wav").is_err());
        assert!(parse(b"").is_err());
    }

    #[test]
    fn test_parse_requires_data_chunk() {
        let mut wav = wav_bytes(22050, &[1, 2, 3], 6);
        wav.truncate(36); // keep RIFF + fmt only
        assert!(parse(&wav).is_err());
    }
}

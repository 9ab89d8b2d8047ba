//! Waveform to PCM conversion
//!
//! The wire payload of a synthesis response is signed 16-bit
//! little-endian mono PCM. Each float sample is scaled by 32767 and
//! rounded; the cast saturates at the i16 limits for samples outside
//! [-1, 1].

/// Serialize a normalized waveform as 16-bit little-endian PCM bytes
pub fn waveform_to_pcm(samples: &[f32]) -> Vec<u8> {
    let mut pcm = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        let value = (sample * 32767.0).round() as i16;
        pcm.extend_from_slice(&value.to_le_bytes());
    }
    pcm
}

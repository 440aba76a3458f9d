//! WAV duration measurement.
//!
//! The speech contract requires truthful durations, and LINEAR16 responses
//! arrive as RIFF/WAVE containers, so the duration is derived from the
//! container itself: data-chunk length over the fmt-chunk byte rate.

/// Measure the duration of a WAV payload in seconds.
///
/// Returns `None` when the bytes are not a parseable RIFF/WAVE container or
/// the fmt chunk precedes no data chunk.
pub(crate) fn wav_duration_secs(bytes: &[u8]) -> Option<f64> {
    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return None;
    }

    let mut pos = 12;
    let mut byte_rate: Option<u32> = None;

    while pos + 8 <= bytes.len() {
        let id = &bytes[pos..pos + 4];
        let size = u32::from_le_bytes(bytes[pos + 4..pos + 8].try_into().ok()?) as usize;
        let body = pos + 8;

        match id {
            b"fmt " if body + 16 <= bytes.len() => {
                // fmt chunk: format(2) channels(2) sample_rate(4) byte_rate(4) ...
                byte_rate = Some(u32::from_le_bytes(bytes[body + 8..body + 12].try_into().ok()?));
            }
            b"data" => {
                let rate = byte_rate?;
                if rate == 0 {
                    return None;
                }
                // Tolerate a header whose declared size overruns the payload
                let data_len = size.min(bytes.len().saturating_sub(body));
                return Some(data_len as f64 / rate as f64);
            }
            _ => {}
        }

        // Chunks are word-aligned
        pos = body + size + (size & 1);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wav_with(sample_rate: u32, channels: u16, bits: u16, data_len: usize) -> Vec<u8> {
        let byte_rate = sample_rate * channels as u32 * (bits as u32 / 8);
        let block_align = channels * (bits / 8);
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&((36 + data_len) as u32).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
        bytes.extend_from_slice(&channels.to_le_bytes());
        bytes.extend_from_slice(&sample_rate.to_le_bytes());
        bytes.extend_from_slice(&byte_rate.to_le_bytes());
        bytes.extend_from_slice(&block_align.to_le_bytes());
        bytes.extend_from_slice(&bits.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&(data_len as u32).to_le_bytes());
        bytes.extend(std::iter::repeat(0u8).take(data_len));
        bytes
    }

    #[test]
    fn measures_mono_16bit_duration() {
        // 24kHz mono 16-bit: 48000 bytes per second
        let bytes = wav_with(24000, 1, 16, 96000);
        let duration = wav_duration_secs(&bytes).unwrap();
        assert!((duration - 2.0).abs() < 1e-9);
    }

    #[test]
    fn measures_stereo_duration() {
        let bytes = wav_with(44100, 2, 16, 44100 * 4);
        let duration = wav_duration_secs(&bytes).unwrap();
        assert!((duration - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_wav_payload() {
        assert_eq!(wav_duration_secs(b"ID3\x04mp3 data here"), None);
        assert_eq!(wav_duration_secs(b""), None);
    }

    #[test]
    fn tolerates_truncated_data_chunk() {
        let mut bytes = wav_with(24000, 1, 16, 48000);
        bytes.truncate(bytes.len() - 24000);
        let duration = wav_duration_secs(&bytes).unwrap();
        assert!((duration - 0.5).abs() < 1e-9);
    }
}

//! In-memory WAV encoding for uploads

use crate::api::AudioFile;
use crate::error::{MealVoiceError, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::Cursor;
use tracing::debug;

/// MIME type of encoded recordings
pub const WAV_MIME: &str = "audio/wav";

/// Encode mono f32 samples (-1.0..1.0) as 16-bit PCM WAV bytes
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut bytes = Vec::with_capacity(44 + samples.len() * 2);
    {
        let mut writer = WavWriter::new(Cursor::new(&mut bytes), spec)
            .map_err(|e| MealVoiceError::AudioProcessingError(format!("WAV header: {}", e)))?;
        for &sample in samples {
            let pcm = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer
                .write_sample(pcm)
                .map_err(|e| MealVoiceError::AudioProcessingError(format!("WAV sample: {}", e)))?;
        }
        writer
            .finalize()
            .map_err(|e| MealVoiceError::AudioProcessingError(format!("WAV finalize: {}", e)))?;
    }

    debug!("[AUDIO] Encoded {} samples at {} Hz", samples.len(), sample_rate);
    Ok(bytes)
}

/// Decode WAV bytes into mono f32 samples and the sample rate
///
/// Multi-channel input is averaged down to mono.
pub fn decode_wav(bytes: &[u8]) -> Result<(Vec<f32>, u32)> {
    let mut reader = WavReader::new(Cursor::new(bytes))
        .map_err(|e| MealVoiceError::AudioProcessingError(format!("Invalid WAV: {}", e)))?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: std::result::Result<Vec<f32>, hound::Error> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect(),
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect()
        }
    };
    let interleaved =
        interleaved.map_err(|e| MealVoiceError::AudioProcessingError(format!("WAV read: {}", e)))?;

    let mono = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    };
    Ok((mono, spec.sample_rate))
}

/// Package mono samples as an uploadable WAV file
pub fn recording_file(samples: &[f32], sample_rate: u32) -> Result<AudioFile> {
    let bytes = encode_wav(samples, sample_rate)?;
    let id = uuid::Uuid::new_v4().simple().to_string();
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    Ok(AudioFile {
        file_name: format!("meal-{}-{}.wav", stamp, &id[..8]),
        mime_type: WAV_MIME.to_string(),
        bytes,
        duration_secs: samples.len() as f32 / sample_rate.max(1) as f32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(len: usize, rate: u32) -> Vec<f32> {
        (0..len)
            .map(|i| (i as f32 * 440.0 * 2.0 * std::f32::consts::PI / rate as f32).sin() * 0.5)
            .collect()
    }

    #[test]
    fn test_encoded_header() {
        let bytes = encode_wav(&tone(160, 16000), 16000).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(bytes.len(), 44 + 160 * 2);
    }

    #[test]
    fn test_decode_preserves_shape() {
        let samples = tone(1600, 16000);
        let bytes = encode_wav(&samples, 16000).unwrap();
        let (decoded, rate) = decode_wav(&bytes).unwrap();
        assert_eq!(rate, 16000);
        assert_eq!(decoded.len(), samples.len());
        for (a, b) in samples.iter().zip(decoded.iter()) {
            assert!((a - b).abs() < 0.001);
        }
    }

    #[test]
    fn test_out_of_range_samples_are_clipped() {
        let bytes = encode_wav(&[2.0, -2.0], 8000).unwrap();
        let (decoded, _) = decode_wav(&bytes).unwrap();
        assert!(decoded[0] > 0.99);
        assert!(decoded[1] < -0.99);
    }

    #[test]
    fn test_recording_file_metadata() {
        let file = recording_file(&tone(8000, 16000), 16000).unwrap();
        assert_eq!(file.mime_type, "audio/wav");
        assert!(file.file_name.starts_with("meal-"));
        assert!(file.file_name.ends_with(".wav"));
        assert!((file.duration_secs - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(decode_wav(b"not a wav file").is_err());
    }
}

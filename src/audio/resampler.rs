//! Mono sample-rate conversion for uploads
//!
//! Capture runs at whatever rate the device prefers; uploads go out at the
//! configured rate (16 kHz by default).

use crate::error::{MealVoiceError, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::debug;

const CHUNK_FRAMES: usize = 1024;

/// Sinc resampler over a single channel
pub struct MonoResampler {
    inner: SincFixedIn<f32>,
    input_rate: u32,
    output_rate: u32,
}

impl MonoResampler {
    pub fn new(input_rate: u32, output_rate: u32) -> Result<Self> {
        if input_rate == 0 || output_rate == 0 {
            return Err(MealVoiceError::ConfigError(
                "Sample rates must be greater than 0".into(),
            ));
        }

        let params = SincInterpolationParameters {
            sinc_len: 128,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor: 128,
            window: WindowFunction::BlackmanHarris2,
        };

        let inner = SincFixedIn::<f32>::new(
            output_rate as f64 / input_rate as f64,
            1.0,
            params,
            CHUNK_FRAMES,
            1,
        )
        .map_err(|e| MealVoiceError::AudioProcessingError(format!("Resampler setup: {}", e)))?;

        debug!("[AUDIO] Resampler {} Hz -> {} Hz", input_rate, output_rate);
        Ok(Self {
            inner,
            input_rate,
            output_rate,
        })
    }

    /// Resample a complete recording
    ///
    /// The output length is the input duration at the output rate; zero
    /// padding added to fill the last chunk is cut off again.
    pub fn process_all(&mut self, input: &[f32]) -> Result<Vec<f32>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }

        let ratio = self.output_rate as f64 / self.input_rate as f64;
        let expected = (input.len() as f64 * ratio).round() as usize;
        let mut output = Vec::with_capacity(expected + CHUNK_FRAMES);

        // Extra zero chunks flush the filter delay out of the resampler.
        let padded_len = input.len() + CHUNK_FRAMES * 2;
        let mut offset = 0;
        while offset < padded_len && output.len() < expected + self.inner.output_delay() {
            let mut chunk = vec![0.0f32; CHUNK_FRAMES];
            if offset < input.len() {
                let end = (offset + CHUNK_FRAMES).min(input.len());
                chunk[..end - offset].copy_from_slice(&input[offset..end]);
            }
            let out = self
                .inner
                .process(&[chunk], None)
                .map_err(|e| MealVoiceError::AudioProcessingError(format!("Resampling: {}", e)))?;
            output.extend_from_slice(&out[0]);
            offset += CHUNK_FRAMES;
        }

        let delay = self.inner.output_delay().min(output.len());
        let mut output = output.split_off(delay);
        output.resize(expected, 0.0);
        Ok(output)
    }

    pub fn input_rate(&self) -> u32 {
        self.input_rate
    }

    pub fn output_rate(&self) -> u32 {
        self.output_rate
    }
}

/// Convert a recording between rates; a no-op when the rates match
pub fn resample_mono(input: &[f32], input_rate: u32, output_rate: u32) -> Result<Vec<f32>> {
    if input_rate == output_rate {
        return Ok(input.to_vec());
    }
    MonoResampler::new(input_rate, output_rate)?.process_all(input)
}

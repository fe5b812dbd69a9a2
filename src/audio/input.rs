//! Microphone capture through cpal

use super::capture::AudioSource;
use crate::error::{MealVoiceError, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{
    BuildStreamError, Device, FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig,
};
use crossbeam_channel::Sender;
use tracing::{debug, error, info};

/// Default input device, opened for one recording
///
/// The OS stream is released when the recorder is stopped or dropped.
pub struct AudioRecorder {
    device: Device,
    config: StreamConfig,
    format: SampleFormat,
    stream: Option<Stream>,
}

impl AudioRecorder {
    /// Open the default input device
    pub fn open() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(MealVoiceError::NoMicrophone)?;

        info!(
            "[AUDIO] Using input device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let supported = device.default_input_config().map_err(|e| {
            let message = e.to_string();
            if is_permission_error(&message) {
                MealVoiceError::MicrophonePermissionDenied
            } else {
                MealVoiceError::AudioDeviceError(format!("Failed to get input config: {}", message))
            }
        })?;

        Ok(Self {
            device,
            format: supported.sample_format(),
            config: supported.into(),
            stream: None,
        })
    }

    pub fn channels(&self) -> u16 {
        self.config.channels
    }

    fn build<T>(&self, tx: Sender<Vec<f32>>) -> std::result::Result<Stream, BuildStreamError>
    where
        T: SizedSample,
        f32: FromSample<T>,
    {
        let channels = self.config.channels.max(1) as usize;
        self.device.build_input_stream(
            &self.config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                let mono: Vec<f32> = data
                    .chunks(channels)
                    .map(|frame| {
                        frame.iter().map(|s| s.to_sample::<f32>()).sum::<f32>()
                            / frame.len() as f32
                    })
                    .collect();
                if let Err(e) = tx.try_send(mono) {
                    debug!("[AUDIO] Dropped input chunk: {}", e);
                }
            },
            |err| error!("[AUDIO] Input stream error: {}", err),
            None,
        )
    }
}

impl AudioSource for AudioRecorder {
    fn start(&mut self, tx: Sender<Vec<f32>>) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let stream = match self.format {
            SampleFormat::F32 => self.build::<f32>(tx),
            SampleFormat::I16 => self.build::<i16>(tx),
            SampleFormat::U16 => self.build::<u16>(tx),
            SampleFormat::I32 => self.build::<i32>(tx),
            other => {
                return Err(MealVoiceError::AudioDeviceError(format!(
                    "Unsupported sample format: {}",
                    other
                )))
            }
        }
        .map_err(map_build_error)?;

        stream.play().map_err(|e| {
            let message = e.to_string();
            if is_permission_error(&message) {
                MealVoiceError::MicrophonePermissionDenied
            } else {
                MealVoiceError::AudioDeviceError(format!("Failed to start input: {}", message))
            }
        })?;

        self.stream = Some(stream);
        info!("[AUDIO] Capture started at {} Hz", self.sample_rate());
        Ok(())
    }

    fn stop(&mut self) {
        if self.stream.take().is_some() {
            info!("[AUDIO] Capture stopped, device released");
        }
    }

    fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }
}

impl Drop for AudioRecorder {
    fn drop(&mut self) {
        self.stop();
    }
}

fn is_permission_error(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("permission") || lower.contains("denied") || lower.contains("not authorized")
}

fn map_build_error(err: BuildStreamError) -> MealVoiceError {
    match err {
        BuildStreamError::DeviceNotAvailable => MealVoiceError::NoMicrophone,
        other => {
            let message = other.to_string();
            if is_permission_error(&message) {
                MealVoiceError::MicrophonePermissionDenied
            } else {
                MealVoiceError::AudioDeviceError(format!("Failed to open input: {}", message))
            }
        }
    }
}

/// Open the system microphone as a boxed source
pub fn open_default() -> Result<Box<dyn AudioSource>> {
    Ok(Box::new(AudioRecorder::open()?))
}

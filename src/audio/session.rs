//! One recording from start to upload-ready file

use super::buffer::LevelHistory;
use super::resampler::resample_mono;
use super::silence::{rms, SilenceDetector, SilenceParams};
use super::wav::recording_file;
use crate::api::AudioFile;
use crate::config::RecordingConfig;
use crate::error::{MealVoiceError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Readings kept for the level meter
const LEVEL_HISTORY: usize = 48;

/// How the record control starts and stops a recording
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMode {
    /// Record while the control is held down
    #[default]
    Hold,
    /// Click to start, click again (or fall silent) to stop
    Toggle,
}

/// Why a recording ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The user ended it (release in hold mode, second click in toggle mode)
    User,
    /// Quiet period elapsed after speech (toggle mode only)
    Silence,
    /// Hard duration cap reached
    MaxDuration,
}

/// Outcome of feeding audio to a session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionSignal {
    Continue,
    Stop(StopReason),
}

/// Samples and level tracking for a single recording
pub struct RecordingSession {
    mode: CaptureMode,
    sample_rate: u32,
    upload_rate: u32,
    max_samples: usize,
    window_samples: usize,
    samples: Vec<f32>,
    window: Vec<f32>,
    detector: SilenceDetector,
    levels: LevelHistory,
    stopped: Option<StopReason>,
}

impl RecordingSession {
    pub fn new(mode: CaptureMode, sample_rate: u32, config: &RecordingConfig) -> Self {
        let sample_rate = sample_rate.max(1);
        let max_samples = (config.max_duration().as_secs_f64() * sample_rate as f64) as usize;
        let window_samples =
            ((config.check_interval().as_secs_f64() * sample_rate as f64) as usize).max(1);

        let params = SilenceParams {
            threshold: config.silence_threshold,
            check_interval: config.check_interval(),
            quiet_period: config.silence_duration(),
        };

        debug!(
            "[AUDIO] New {:?} session at {} Hz (cap {} samples)",
            mode, sample_rate, max_samples
        );

        Self {
            mode,
            sample_rate,
            upload_rate: config.upload_sample_rate,
            max_samples,
            window_samples,
            samples: Vec::with_capacity(sample_rate as usize * 10),
            window: Vec::with_capacity(window_samples),
            detector: SilenceDetector::new(params),
            levels: LevelHistory::new(LEVEL_HISTORY),
            stopped: None,
        }
    }

    /// Append captured mono samples
    ///
    /// Samples past the duration cap are dropped, so the captured duration
    /// never exceeds it.
    pub fn push(&mut self, chunk: &[f32]) -> SessionSignal {
        if let Some(reason) = self.stopped {
            return SessionSignal::Stop(reason);
        }

        let room = self.max_samples.saturating_sub(self.samples.len());
        let accepted = &chunk[..chunk.len().min(room)];

        for &sample in accepted {
            self.samples.push(sample);
            self.window.push(sample);
            if self.window.len() < self.window_samples {
                continue;
            }
            let level = rms(&self.window);
            self.window.clear();
            self.levels.push(level);

            if self.mode == CaptureMode::Toggle && self.detector.observe(level) {
                info!("[AUDIO] Silence after speech, stopping");
                return self.stop(StopReason::Silence);
            }
        }

        if self.samples.len() >= self.max_samples {
            info!("[AUDIO] Maximum duration reached, stopping");
            return self.stop(StopReason::MaxDuration);
        }

        SessionSignal::Continue
    }

    /// Mark the session as ended; later pushes are ignored
    pub fn stop(&mut self, reason: StopReason) -> SessionSignal {
        if self.stopped.is_none() {
            self.stopped = Some(reason);
        }
        SessionSignal::Stop(self.stopped.unwrap_or(reason))
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stopped
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Captured audio length
    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }

    /// Time left before the duration cap
    pub fn remaining(&self) -> Duration {
        let left = self.max_samples.saturating_sub(self.samples.len());
        Duration::from_secs_f64(left as f64 / self.sample_rate as f64)
    }

    /// Level meter shared with the UI
    pub fn levels(&self) -> &LevelHistory {
        &self.levels
    }

    pub fn speech_detected(&self) -> bool {
        self.detector.speech_detected()
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Resample to the upload rate and encode as WAV
    pub fn finish(self) -> Result<AudioFile> {
        if self.samples.is_empty() {
            return Err(MealVoiceError::AudioProcessingError(
                "No audio was captured".into(),
            ));
        }

        let samples = resample_mono(&self.samples, self.sample_rate, self.upload_rate)?;
        let file = recording_file(&samples, self.upload_rate)?;
        info!(
            "[AUDIO] Recording finished: {:.1}s, {} bytes",
            file.duration_secs,
            file.bytes.len()
        );
        Ok(file)
    }
}

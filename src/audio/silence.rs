//! Silence-triggered auto-stop heuristic
//!
//! Input is a sequence of RMS levels, one per check interval. Recording may
//! stop once the level has reached the threshold at least once and then
//! stayed below it for the whole quiet period. Leading silence never counts.

use std::time::Duration;

/// Root-mean-square amplitude of a block of samples
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

/// Parameters of the heuristic
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SilenceParams {
    /// RMS level counted as speech
    pub threshold: f32,
    /// Audio covered by one level reading
    pub check_interval: Duration,
    /// Quiet time after speech that stops recording
    pub quiet_period: Duration,
}

impl SilenceParams {
    /// Number of consecutive quiet readings that make up the quiet period
    pub fn quiet_checks(&self) -> u32 {
        let interval = self.check_interval.as_millis().max(1);
        let checks = self.quiet_period.as_millis().div_ceil(interval);
        checks.max(1) as u32
    }
}

/// Decide from a full level history whether recording should stop
///
/// Equivalent to feeding every level to a fresh [`SilenceDetector`].
pub fn should_auto_stop(levels: &[f32], params: &SilenceParams) -> bool {
    let mut detector = SilenceDetector::new(*params);
    levels.iter().any(|&level| detector.observe(level))
}

/// Incremental form of [`should_auto_stop`]
#[derive(Clone, Debug)]
pub struct SilenceDetector {
    params: SilenceParams,
    speech_detected: bool,
    quiet_checks: u32,
}

impl SilenceDetector {
    pub fn new(params: SilenceParams) -> Self {
        Self {
            params,
            speech_detected: false,
            quiet_checks: 0,
        }
    }

    /// Feed one level reading; returns true when recording should stop
    pub fn observe(&mut self, level: f32) -> bool {
        if level >= self.params.threshold {
            self.speech_detected = true;
            self.quiet_checks = 0;
            return false;
        }

        if !self.speech_detected {
            return false;
        }

        self.quiet_checks = self.quiet_checks.saturating_add(1);
        self.quiet_checks >= self.params.quiet_checks()
    }

    /// Whether the threshold has been reached since the last reset
    pub fn speech_detected(&self) -> bool {
        self.speech_detected
    }

    /// Quiet time accumulated since the last speech reading
    pub fn quiet_for(&self) -> Duration {
        self.params.check_interval * self.quiet_checks
    }

    pub fn reset(&mut self) {
        self.speech_detected = false;
        self.quiet_checks = 0;
    }

    pub fn params(&self) -> &SilenceParams {
        &self.params
    }
}

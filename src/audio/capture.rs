//! Record control state machine
//!
//! Maps pointer gestures to recording start/stop according to the capture
//! mode, and drives the active [`RecordingSession`] from the device channel.

use super::buffer::LevelHistory;
use super::session::{CaptureMode, RecordingSession, SessionSignal, StopReason};
use crate::api::AudioFile;
use crate::config::RecordingConfig;
use crate::error::Result;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::time::Duration;
use tracing::{info, warn};

/// Capture device abstraction
///
/// A source is opened for one recording and dropped afterwards, which must
/// release the underlying device.
pub trait AudioSource {
    /// Begin delivering mono f32 chunks on `tx`
    fn start(&mut self, tx: Sender<Vec<f32>>) -> Result<()>;
    /// Stop delivering chunks
    fn stop(&mut self);
    /// Rate of the delivered samples
    fn sample_rate(&self) -> u32;
}

/// Opens a fresh [`AudioSource`] for each recording
pub type SourceOpener = Box<dyn FnMut() -> Result<Box<dyn AudioSource>>>;

/// Observable capture state for the UI
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapturePhase {
    Idle,
    Recording,
}

/// What a gesture or poll produced
#[derive(Debug)]
pub enum CaptureOutcome {
    /// Nothing changed
    None,
    /// Recording started
    Started,
    /// Recording ended and produced a file
    Finished { file: AudioFile, reason: StopReason },
}

struct ActiveRecording {
    source: Box<dyn AudioSource>,
    rx: Receiver<Vec<f32>>,
    session: RecordingSession,
}

/// Owns the capture device for the duration of a recording
pub struct VoiceCapture {
    opener: SourceOpener,
    config: RecordingConfig,
    mode: CaptureMode,
    active: Option<ActiveRecording>,
}

impl VoiceCapture {
    pub fn new(config: RecordingConfig, opener: SourceOpener) -> Self {
        Self {
            mode: config.default_mode,
            config,
            opener,
            active: None,
        }
    }

    /// Capture from the system default microphone
    #[cfg(feature = "audio-io")]
    pub fn with_default_device(config: RecordingConfig) -> Self {
        Self::new(config, Box::new(super::input::open_default))
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    /// Change mode; ignored while recording
    pub fn set_mode(&mut self, mode: CaptureMode) {
        if self.active.is_none() {
            self.mode = mode;
        }
    }

    pub fn phase(&self) -> CapturePhase {
        if self.active.is_some() {
            CapturePhase::Recording
        } else {
            CapturePhase::Idle
        }
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    pub fn elapsed(&self) -> Duration {
        self.active
            .as_ref()
            .map(|a| a.session.elapsed())
            .unwrap_or_default()
    }

    pub fn remaining(&self) -> Duration {
        self.active
            .as_ref()
            .map(|a| a.session.remaining())
            .unwrap_or_else(|| self.config.max_duration())
    }

    /// Live level history of the active recording
    pub fn levels(&self) -> Option<LevelHistory> {
        self.active.as_ref().map(|a| a.session.levels().clone())
    }

    /// Pointer went down on the record control
    pub fn press(&mut self) -> Result<CaptureOutcome> {
        match self.mode {
            CaptureMode::Hold if self.active.is_none() => self.start(),
            _ => Ok(CaptureOutcome::None),
        }
    }

    /// Pointer was released
    pub fn release(&mut self) -> Result<CaptureOutcome> {
        match self.mode {
            CaptureMode::Hold if self.active.is_some() => self.stop(StopReason::User),
            _ => Ok(CaptureOutcome::None),
        }
    }

    /// Record control was clicked
    pub fn click(&mut self) -> Result<CaptureOutcome> {
        match self.mode {
            CaptureMode::Toggle if self.active.is_none() => self.start(),
            CaptureMode::Toggle => self.stop(StopReason::User),
            CaptureMode::Hold => Ok(CaptureOutcome::None),
        }
    }

    /// Drain captured audio; finishes the recording on auto-stop
    pub fn poll(&mut self) -> Result<CaptureOutcome> {
        let Some(active) = self.active.as_mut() else {
            return Ok(CaptureOutcome::None);
        };

        let mut signal = SessionSignal::Continue;
        while let Ok(chunk) = active.rx.try_recv() {
            signal = active.session.push(&chunk);
            if signal != SessionSignal::Continue {
                break;
            }
        }

        match signal {
            SessionSignal::Continue => Ok(CaptureOutcome::None),
            SessionSignal::Stop(reason) => self.stop(reason),
        }
    }

    /// Abandon the recording without producing a file
    pub fn cancel(&mut self) {
        if let Some(mut active) = self.active.take() {
            active.source.stop();
            info!("[AUDIO] Recording cancelled");
        }
    }

    fn start(&mut self) -> Result<CaptureOutcome> {
        let mut source = (self.opener)()?;
        let (tx, rx) = bounded(256);
        source.start(tx)?;

        let session = RecordingSession::new(self.mode, source.sample_rate(), &self.config);
        info!("[AUDIO] Recording started ({:?})", self.mode);
        self.active = Some(ActiveRecording {
            source,
            rx,
            session,
        });
        Ok(CaptureOutcome::Started)
    }

    fn stop(&mut self, reason: StopReason) -> Result<CaptureOutcome> {
        let Some(mut active) = self.active.take() else {
            return Ok(CaptureOutcome::None);
        };

        active.source.stop();
        // Keep whatever arrived before the device stopped.
        while let Ok(chunk) = active.rx.try_recv() {
            if active.session.push(&chunk) != SessionSignal::Continue {
                break;
            }
        }
        drop(active.source);

        match active.session.finish() {
            Ok(file) => Ok(CaptureOutcome::Finished { file, reason }),
            Err(e) => {
                warn!("[AUDIO] Discarding recording: {}", e);
                Err(e)
            }
        }
    }
}

impl Drop for VoiceCapture {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Source driven by the caller instead of a device
///
/// Clones share the same feed: tests keep one handle and hand a clone to
/// [`VoiceCapture`] through [`ScriptedSource::opener`].
#[derive(Clone)]
pub struct ScriptedSource {
    inner: std::sync::Arc<parking_lot::Mutex<ScriptedInner>>,
    sample_rate: u32,
}

#[derive(Default)]
struct ScriptedInner {
    tx: Option<Sender<Vec<f32>>>,
    fail_with: Option<crate::error::MealVoiceError>,
    opened: usize,
    released: usize,
}

impl ScriptedSource {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            inner: Default::default(),
            sample_rate,
        }
    }

    /// Make every open attempt fail with `error`
    pub fn fail_with(self, error: crate::error::MealVoiceError) -> Self {
        self.inner.lock().fail_with = Some(error);
        self
    }

    /// Opener handing out clones of this source
    pub fn opener(&self) -> SourceOpener {
        let source = self.clone();
        Box::new(move || {
            let mut inner = source.inner.lock();
            if let Some(err) = inner.fail_with.clone() {
                return Err(err);
            }
            inner.opened += 1;
            drop(inner);
            Ok(Box::new(source.clone()) as Box<dyn AudioSource>)
        })
    }

    /// Deliver samples as if the device captured them; false when not started
    pub fn feed(&self, samples: &[f32]) -> bool {
        let inner = self.inner.lock();
        match &inner.tx {
            Some(tx) => tx.send(samples.to_vec()).is_ok(),
            None => false,
        }
    }

    /// Deliver `secs` of constant-amplitude audio in 100 ms chunks
    pub fn feed_level(&self, amplitude: f32, secs: f32) {
        let chunk_len = (self.sample_rate / 10) as usize;
        let chunks = (secs * 10.0).round() as usize;
        let chunk: Vec<f32> = (0..chunk_len)
            .map(|i| if i % 2 == 0 { amplitude } else { -amplitude })
            .collect();
        for _ in 0..chunks {
            self.feed(&chunk);
        }
    }

    pub fn is_started(&self) -> bool {
        self.inner.lock().tx.is_some()
    }

    /// Times the source was opened
    pub fn opened(&self) -> usize {
        self.inner.lock().opened
    }

    /// Times the source was stopped
    pub fn released(&self) -> usize {
        self.inner.lock().released
    }
}

impl AudioSource for ScriptedSource {
    fn start(&mut self, tx: Sender<Vec<f32>>) -> Result<()> {
        self.inner.lock().tx = Some(tx);
        Ok(())
    }

    fn stop(&mut self) {
        let mut inner = self.inner.lock();
        if inner.tx.take().is_some() {
            inner.released += 1;
        }
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

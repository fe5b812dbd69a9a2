//! Voice capture: device input, silence detection, encoding

pub mod buffer;
pub mod capture;
#[cfg(feature = "audio-io")]
pub mod input;
pub mod resampler;
pub mod session;
pub mod silence;
pub mod wav;

pub use buffer::LevelHistory;
pub use capture::{
    AudioSource, CaptureOutcome, CapturePhase, ScriptedSource, SourceOpener, VoiceCapture,
};
#[cfg(feature = "audio-io")]
pub use input::AudioRecorder;
pub use resampler::{resample_mono, MonoResampler};
pub use session::{CaptureMode, RecordingSession, SessionSignal, StopReason};
pub use silence::{rms, should_auto_stop, SilenceDetector, SilenceParams};
pub use wav::{decode_wav, encode_wav, recording_file};

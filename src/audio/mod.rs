//! Audio pipeline — microphone capture → spectrum analysis → volume sample.
//!
//! # Pipeline
//!
//! ```text
//! Microphone → cpal callback → AudioChunk (mpsc) → downmix_mono
//!           → SampleWindow → SpectrumAnalyzer → volume percent [0, 100]
//! ```
//!
//! The monitor never touches cpal directly; it talks to the [`AudioSampler`]
//! seam, which hides device selection, the non-`Send` stream, and the FFT
//! behind a single `volume_percent()` reading per poll.

pub mod capture;
pub mod sampler;
pub mod spectrum;
pub mod window;

pub use capture::{AudioChunk, CaptureError, MicCapture, StreamHandle};
pub use sampler::{AudioSampler, MicSampler, SamplerError, VolumeSource};
pub use spectrum::{downmix_mono, SpectrumAnalyzer, DEFAULT_FFT_SIZE, DEFAULT_SMOOTHING};
pub use window::SampleWindow;

// test-only re-exports so the monitor's runner tests can use the scripted
// doubles without reaching into `sampler::` paths.
#[cfg(test)]
pub use sampler::{ScriptedSampler, UnavailableSampler};

//! Quiet Please — a classroom noise monitor with a sleeping mascot.
//!
//! Samples the microphone, classifies the room as quiet or noisy against a
//! user-adjustable sensitivity threshold, and drives a small animated
//! window: the mascot sleeps while the class is quiet, wakes up startled
//! when it is not, and a timer shows how long the quiet streak has lasted.
//!
//! # Data flow
//!
//! ```text
//! Microphone → cpal callback → AudioChunk (mpsc) → SpectrumAnalyzer
//!           → volume percent → NoiseClassifier (threshold + 4 s hold)
//!           → UiPresenter → UiEvent channel → egui window
//! ```
//!
//! The interesting logic lives in [`monitor::NoiseClassifier`]; everything
//! else is plumbing around it.  See each module's docs for details:
//!
//! * [`audio`]   — capture, FFT volume metering, the `AudioSampler` seam.
//! * [`monitor`] — classifier, runner task, presenter seam.
//! * [`config`]  — `settings.toml` persistence.
//! * [`app`]     — the eframe window.

pub mod app;
pub mod audio;
pub mod config;
pub mod monitor;

//! The audio-sampling seam between the monitor and the microphone.
//!
//! [`AudioSampler`] is the interface the monitor runner sees: `acquire` the
//! microphone once, then read one [`VolumeSource::volume_percent`] per poll.
//! Releasing is RAII — dropping the source stops the capture stream.
//!
//! [`MicSampler`] is the production implementation.  Because `cpal::Stream`
//! is not `Send`, the stream is created and parked on a dedicated thread;
//! the returned [`VolumeSource`] holds only channel endpoints and the
//! analyser, so it can live inside the tokio runner task.  Dropping it hangs
//! up the park channel, which wakes the thread and drops the stream.

use std::sync::mpsc;

use thiserror::Error;

use super::capture::{AudioChunk, CaptureError, MicCapture};
use super::spectrum::{downmix_mono, SpectrumAnalyzer, DEFAULT_FFT_SIZE};
use crate::config::AudioConfig;

// ---------------------------------------------------------------------------
// SamplerError
// ---------------------------------------------------------------------------

/// The two ways acquiring the microphone can fail.
///
/// Both are surfaced to the user as a blocking notification and never
/// retried automatically — monitoring simply stays stopped.
#[derive(Debug, Clone, Error)]
pub enum SamplerError {
    /// The platform refused microphone access.
    #[error("microphone access denied — check the system's privacy settings")]
    PermissionDenied,

    /// No input device, or the device rejected the stream.
    #[error("no usable microphone: {0}")]
    DeviceUnavailable(String),
}

// ---------------------------------------------------------------------------
// Trait seam
// ---------------------------------------------------------------------------

/// A live audio stream reduced to one loudness reading per poll.
pub trait VolumeSource: Send {
    /// Current loudness as a percentage in `[0, 100]`.
    fn volume_percent(&mut self) -> f32;
}

/// Owns microphone access; produces a [`VolumeSource`] on demand.
pub trait AudioSampler: Send {
    /// Acquire the audio stream.
    ///
    /// This is the monitor's only suspension point: on some platforms it
    /// blocks until the user answers the OS permission prompt.
    fn acquire(&mut self) -> Result<Box<dyn VolumeSource>, SamplerError>;
}

// ---------------------------------------------------------------------------
// MicSampler
// ---------------------------------------------------------------------------

/// Production sampler: cpal capture → spectrum analyser.
pub struct MicSampler {
    device: Option<String>,
    fft_size: usize,
    smoothing: f32,
}

impl MicSampler {
    pub fn new(device: Option<String>, fft_size: usize, smoothing: f32) -> Self {
        Self {
            device,
            fft_size,
            smoothing,
        }
    }

    /// Build a sampler from the `[audio]` section of `settings.toml`.
    ///
    /// A hand-edited `fft_size` that is not a power of two falls back to
    /// the default instead of panicking the analyser.
    pub fn from_config(config: &AudioConfig) -> Self {
        let fft_size = if config.fft_size.is_power_of_two() && config.fft_size >= 32 {
            config.fft_size
        } else {
            log::warn!(
                "audio.fft_size {} is not a power of two; using {}",
                config.fft_size,
                DEFAULT_FFT_SIZE
            );
            DEFAULT_FFT_SIZE
        };
        Self::new(config.input_device.clone(), fft_size, config.smoothing)
    }
}

impl AudioSampler for MicSampler {
    fn acquire(&mut self) -> Result<Box<dyn VolumeSource>, SamplerError> {
        let (chunk_tx, chunk_rx) = mpsc::channel::<AudioChunk>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), SamplerError>>();
        let (park_tx, park_rx) = mpsc::channel::<()>();
        let device = self.device.clone();

        // The stream must be created and dropped on one thread.
        std::thread::Builder::new()
            .name("mic-stream".into())
            .spawn(move || {
                let capture = match MicCapture::new(device.as_deref()) {
                    Ok(c) => c,
                    Err(e) => {
                        let _ = ready_tx.send(Err(map_capture_err(e)));
                        return;
                    }
                };

                let handle = match capture.start(chunk_tx) {
                    Ok(h) => h,
                    Err(e) => {
                        let _ = ready_tx.send(Err(map_capture_err(e)));
                        return;
                    }
                };

                log::info!(
                    "audio capture started ({} Hz, {} ch)",
                    capture.sample_rate(),
                    capture.channels()
                );
                let _ = ready_tx.send(Ok(()));

                // Parked until the MicVolumeSource drops its park_tx.
                let _ = park_rx.recv();
                drop(handle);
                log::info!("audio capture released");
            })
            .map_err(|e| SamplerError::DeviceUnavailable(format!("audio thread: {e}")))?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Box::new(MicVolumeSource {
                rx: chunk_rx,
                analyzer: SpectrumAnalyzer::new(self.fft_size, self.smoothing),
                _park: park_tx,
            })),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(SamplerError::DeviceUnavailable(
                "audio thread exited unexpectedly".into(),
            )),
        }
    }
}

/// Live microphone source: drains pending chunks, feeds the analyser,
/// reports the smoothed loudness.
struct MicVolumeSource {
    rx: mpsc::Receiver<AudioChunk>,
    analyzer: SpectrumAnalyzer,
    /// Held only so that dropping the source unparks the stream thread.
    _park: mpsc::Sender<()>,
}

impl VolumeSource for MicVolumeSource {
    fn volume_percent(&mut self) -> f32 {
        while let Ok(chunk) = self.rx.try_recv() {
            let mono = downmix_mono(&chunk.samples, chunk.channels);
            self.analyzer.push_samples(&mono);
        }
        self.analyzer.volume_percent()
    }
}

/// Collapse a [`CaptureError`] into the two user-facing failure kinds.
///
/// cpal reports a denied microphone permission as a backend-specific stream
/// error, so the distinction has to be made from the message text.
fn map_capture_err(err: CaptureError) -> SamplerError {
    let text = err.to_string();
    let lower = text.to_ascii_lowercase();
    if lower.contains("permission") || lower.contains("denied") {
        SamplerError::PermissionDenied
    } else {
        SamplerError::DeviceUnavailable(text)
    }
}

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

/// Sampler whose source replays a scripted volume sequence, repeating the
/// final value.  Lets the runner tests drive transitions deterministically.
#[cfg(test)]
pub struct ScriptedSampler {
    volumes: Vec<f32>,
}

#[cfg(test)]
impl ScriptedSampler {
    pub fn new(volumes: Vec<f32>) -> Self {
        Self { volumes }
    }

    /// A sampler that always reads the same level.
    pub fn constant(volume: f32) -> Self {
        Self::new(vec![volume])
    }
}

#[cfg(test)]
impl AudioSampler for ScriptedSampler {
    fn acquire(&mut self) -> Result<Box<dyn VolumeSource>, SamplerError> {
        Ok(Box::new(ScriptedSource {
            volumes: self.volumes.clone(),
            next: 0,
        }))
    }
}

#[cfg(test)]
struct ScriptedSource {
    volumes: Vec<f32>,
    next: usize,
}

#[cfg(test)]
impl VolumeSource for ScriptedSource {
    fn volume_percent(&mut self) -> f32 {
        let v = self
            .volumes
            .get(self.next)
            .or(self.volumes.last())
            .copied()
            .unwrap_or(0.0);
        self.next += 1;
        v
    }
}

/// Sampler whose `acquire` always fails with the configured error.
#[cfg(test)]
pub struct UnavailableSampler(pub SamplerError);

#[cfg(test)]
impl AudioSampler for UnavailableSampler {
    fn acquire(&mut self) -> Result<Box<dyn VolumeSource>, SamplerError> {
        Err(self.0.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Frequency-domain volume metering.
//!
//! [`SpectrumAnalyzer`] reduces the raw microphone stream to the single
//! loudness percentage the classifier consumes: a Hann-windowed 256-point
//! FFT over the newest samples, per-bin magnitudes mapped onto a decibel
//! range, exponentially smoothed, then averaged across the 128
//! positive-frequency bins and scaled to `[0, 100]`.
//!
//! The dB range and the 0.8 smoothing factor reproduce the behaviour of a
//! stock WebAudio analyser node, which is what classroom volume meters are
//! usually calibrated against.

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use super::window::SampleWindow;

/// FFT length — 128 frequency bins.
pub const DEFAULT_FFT_SIZE: usize = 256;

/// Exponential smoothing factor applied to each bin between polls.
pub const DEFAULT_SMOOTHING: f32 = 0.8;

/// Magnitudes at or below this level read as 0 %.
const MIN_DECIBELS: f32 = -100.0;
/// Magnitudes at or above this level read as 100 %.
const MAX_DECIBELS: f32 = -30.0;

// ---------------------------------------------------------------------------
// SpectrumAnalyzer
// ---------------------------------------------------------------------------

/// Streaming FFT volume meter.
///
/// Feed raw mono samples with [`push_samples`](Self::push_samples) as they
/// arrive, then call [`volume_percent`](Self::volume_percent) once per poll.
/// Smoothing state persists across polls, so consecutive reads converge on
/// the current level instead of jumping with every hardware buffer.
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    /// Pre-computed Hann window, reduces spectral leakage.
    hann: Vec<f32>,
    window: SampleWindow,
    /// Per-bin smoothed magnitudes, `fft_size / 2` entries.
    smoothed: Vec<f32>,
    smoothing: f32,
}

impl SpectrumAnalyzer {
    /// Create an analyser with the given FFT length and smoothing factor.
    ///
    /// `smoothing` is clamped to `[0.0, 1.0]`; `0.0` disables smoothing
    /// entirely and `1.0` would freeze the meter.
    ///
    /// # Panics
    ///
    /// Panics if `fft_size` is not a power of two or is below 32.
    pub fn new(fft_size: usize, smoothing: f32) -> Self {
        assert!(
            fft_size.is_power_of_two() && fft_size >= 32,
            "fft_size must be a power of two >= 32"
        );

        let hann = (0..fft_size)
            .map(|i| 0.5 * (1.0 - ((2.0 * PI * i as f32) / (fft_size as f32 - 1.0)).cos()))
            .collect();

        Self {
            fft: FftPlanner::new().plan_fft_forward(fft_size),
            fft_size,
            hann,
            window: SampleWindow::new(fft_size),
            smoothed: vec![0.0; fft_size / 2],
            smoothing: smoothing.clamp(0.0, 1.0),
        }
    }

    /// Number of positive-frequency bins contributing to the average.
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Append freshly captured mono samples to the analysis window.
    pub fn push_samples(&mut self, samples: &[f32]) {
        self.window.push_slice(samples);
    }

    /// Analyse the current window and return the loudness in `[0, 100]`.
    ///
    /// Each call advances the per-bin smoothing by one step, so the meter
    /// decays toward silence when no new samples arrive.
    pub fn volume_percent(&mut self) -> f32 {
        let samples = self.window.snapshot();

        // Windowed, zero-padded FFT input.
        let mut buffer: Vec<Complex<f32>> = samples
            .iter()
            .zip(&self.hann)
            .map(|(&s, &w)| Complex::new(s * w, 0.0))
            .collect();
        buffer.resize(self.fft_size, Complex::new(0.0, 0.0));

        self.fft.process(&mut buffer);

        let norm = 2.0 / self.fft_size as f32;
        let mut sum = 0.0;
        for (slot, bin) in self.smoothed.iter_mut().zip(&buffer) {
            let magnitude = bin.norm() * norm;
            *slot = self.smoothing * *slot + (1.0 - self.smoothing) * magnitude;
            sum += db_scale(*slot);
        }

        (sum / self.bin_count() as f32) * 100.0
    }
}

impl Default for SpectrumAnalyzer {
    /// The reference analyser: 256-point FFT, 0.8 smoothing.
    fn default() -> Self {
        Self::new(DEFAULT_FFT_SIZE, DEFAULT_SMOOTHING)
    }
}

/// Map a linear magnitude onto `[0.0, 1.0]` across the analyser's dB range.
fn db_scale(magnitude: f32) -> f32 {
    if magnitude <= 0.0 {
        return 0.0;
    }
    let db = 20.0 * magnitude.log10();
    ((db - MIN_DECIBELS) / (MAX_DECIBELS - MIN_DECIBELS)).clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// downmix_mono
// ---------------------------------------------------------------------------

/// Collapse interleaved multi-channel samples to mono by averaging frames.
///
/// Mono input is returned unchanged (copied).  A trailing partial frame is
/// dropped.
pub fn downmix_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    let ch = channels as usize;
    samples
        .chunks_exact(ch)
        .map(|frame| frame.iter().sum::<f32>() / ch as f32)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

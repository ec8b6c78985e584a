//! Monitor runner — owns the classifier and drives the polling cadences.
//!
//! [`MonitorRunner::run`] is a single tokio task that exclusively owns the
//! [`NoiseClassifier`] and the acquired [`VolumeSource`], so no locking is
//! needed anywhere in the monitor.  It multiplexes three inputs:
//!
//! * the command channel from the UI (`Start` / `Stop` / `SetSensitivity`),
//! * a ~30 Hz poll interval — the "per animation frame" cadence — active
//!   only while a source is held: read one volume sample, tick the
//!   classifier,
//! * an independent 1 s interval that refreshes the `MM:SS` quiet-streak
//!   display, deliberately decoupled from the poll cadence.
//!
//! The loop ends when the command channel closes (window gone).  Start
//! failures are forwarded to the UI as [`UiEvent::StartFailed`] and never
//! retried — the user has to press start again.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::audio::{AudioSampler, VolumeSource};

use super::classifier::NoiseClassifier;
use super::presenter::{UiEvent, UiPresenter};
use super::timer::format_mm_ss;

// ---------------------------------------------------------------------------
// MonitorCommand
// ---------------------------------------------------------------------------

/// Commands sent from the UI to the runner.
#[derive(Debug, Clone)]
pub enum MonitorCommand {
    /// Acquire the microphone and begin monitoring.
    Start,
    /// Stop monitoring and release the microphone.
    Stop,
    /// Update the sensitivity dial (0–100).
    SetSensitivity(u8),
}

// ---------------------------------------------------------------------------
// MonitorRunner
// ---------------------------------------------------------------------------

/// Drives the classifier from a command channel and the poll clock.
///
/// Create with [`MonitorRunner::new`], then spawn [`run`](Self::run) on the
/// tokio runtime.
pub struct MonitorRunner {
    classifier: NoiseClassifier,
    sampler: Box<dyn AudioSampler>,
    /// `Some` exactly while monitoring; dropping it releases the stream.
    source: Option<Box<dyn VolumeSource>>,
    presenter: Arc<dyn UiPresenter>,
    ui_tx: mpsc::Sender<UiEvent>,
    poll_interval: Duration,
}

impl MonitorRunner {
    /// Create a new runner.
    ///
    /// * `classifier` — the state machine, already configured.
    /// * `sampler`    — microphone access (e.g. [`crate::audio::MicSampler`]).
    /// * `presenter`  — where volume/timer updates go; normally the same
    ///   [`super::ChannelPresenter`] the classifier holds.
    /// * `ui_tx`      — channel for events with no presenter method
    ///   (start failures).
    pub fn new(
        classifier: NoiseClassifier,
        sampler: Box<dyn AudioSampler>,
        presenter: Arc<dyn UiPresenter>,
        ui_tx: mpsc::Sender<UiEvent>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            classifier,
            sampler,
            source: None,
            presenter,
            ui_tx,
            poll_interval,
        }
    }

    /// Run until the command channel closes.
    ///
    /// Spawn as a tokio task from `main()`; it never returns while the UI
    /// holds the sender.
    pub async fn run(mut self, mut commands: mpsc::Receiver<MonitorCommand>) {
        let mut poll = tokio::time::interval(self.poll_interval);
        let mut clock = tokio::time::interval(Duration::from_secs(1));
        // Skip, don't burst, after the intervals sat disabled while stopped.
        poll.set_missed_tick_behavior(MissedTickBehavior::Skip);
        clock.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                cmd = commands.recv() => match cmd {
                    Some(MonitorCommand::Start) => self.handle_start(),
                    Some(MonitorCommand::Stop) => self.handle_stop(),
                    Some(MonitorCommand::SetSensitivity(level)) => {
                        self.classifier.set_sensitivity(level);
                        log::debug!("monitor: sensitivity -> {level}");
                    }
                    None => break,
                },
                _ = poll.tick(), if self.source.is_some() => self.poll_once(),
                _ = clock.tick(), if self.source.is_some() => self.refresh_timer(),
            }
        }

        log::info!("monitor: command channel closed, runner shutting down");
    }

    // -----------------------------------------------------------------------
    // Command handlers
    // -----------------------------------------------------------------------

    fn handle_start(&mut self) {
        if self.source.is_some() {
            return; // already monitoring
        }

        match self.sampler.acquire() {
            Ok(source) => {
                self.source = Some(source);
                self.classifier.start(Instant::now());
                self.presenter.set_timer_text("00:00");
                log::info!(
                    "monitor: started (sensitivity {})",
                    self.classifier.sensitivity()
                );
            }
            Err(e) => {
                log::warn!("monitor: could not start: {e}");
                let _ = self.ui_tx.try_send(UiEvent::StartFailed(e.to_string()));
            }
        }
    }

    fn handle_stop(&mut self) {
        // take() drops the source, which releases the capture stream.
        if self.source.take().is_none() {
            return;
        }
        self.classifier.stop();
        self.presenter.set_timer_text("00:00");
        log::info!("monitor: stopped");
    }

    // -----------------------------------------------------------------------
    // Clock handlers
    // -----------------------------------------------------------------------

    fn poll_once(&mut self) {
        if let Some(source) = self.source.as_mut() {
            let volume = source.volume_percent();
            if let Some(state) = self.classifier.tick(volume, Instant::now()) {
                log::debug!("monitor: state -> {}", state.label());
            }
        }
    }

    fn refresh_timer(&self) {
        let elapsed = self.classifier.quiet_elapsed(Instant::now());
        self.presenter.set_timer_text(&format_mm_ss(elapsed));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

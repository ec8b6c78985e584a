//! The noise/quiet classifier.
//!
//! [`NoiseClassifier`] is a polling state machine: one volume sample per
//! tick, one threshold comparison, and a hold window that keeps the mascot
//! from flickering when the room hovers around the threshold.
//!
//! # Transition rules
//!
//! * `threshold = 100 - sensitivity`; a sample is noisy when it is
//!   **strictly** above the threshold.
//! * Quiet → Noisy happens on a single loud sample, no debounce.
//! * Noisy → Quiet requires a quiet sample **and** at least
//!   [`DEFAULT_HOLD`] elapsed since the transition into Noisy.  Loud
//!   samples during the hold do not move the anchor; the window is
//!   measured from the moment the state flipped.
//! * The scolding message is re-rolled exactly once per Quiet→Noisy
//!   transition.
//!
//! The classifier owns no clock: callers pass `Instant`s into
//! [`tick`](NoiseClassifier::tick), which keeps every timing rule
//! unit-testable without sleeping.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::messages::{pick_random, NOISY_MESSAGES};
use super::presenter::UiPresenter;
use super::state::MonitorState;

/// Minimum sustained quiet period before Noisy reverts to Quiet.
pub const DEFAULT_HOLD: Duration = Duration::from_millis(4000);

// ---------------------------------------------------------------------------
// NoiseClassifier
// ---------------------------------------------------------------------------

/// Polling noise/quiet state machine with an injected presenter.
pub struct NoiseClassifier {
    state: MonitorState,
    /// User dial in `[0, 100]`; higher flags more sounds as noisy.
    sensitivity: u8,
    hold: Duration,
    /// Set while Quiet: when the current quiet streak began.
    quiet_since: Option<Instant>,
    /// Set while Noisy: when the state flipped to Noisy.
    noisy_since: Option<Instant>,
    presenter: Arc<dyn UiPresenter>,
    rng: StdRng,
}

impl NoiseClassifier {
    /// Create a classifier with the standard 4-second hold.
    pub fn new(presenter: Arc<dyn UiPresenter>, sensitivity: u8) -> Self {
        Self::with_hold(presenter, sensitivity, DEFAULT_HOLD)
    }

    /// Create a classifier with an explicit hold duration.
    pub fn with_hold(presenter: Arc<dyn UiPresenter>, sensitivity: u8, hold: Duration) -> Self {
        Self {
            state: MonitorState::Stopped,
            sensitivity: sensitivity.min(100),
            hold,
            quiet_since: None,
            noisy_since: None,
            presenter,
            rng: StdRng::from_entropy(),
        }
    }

    /// Reseed the message RNG for a deterministic pick sequence.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Current state.
    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Current sensitivity dial value.
    pub fn sensitivity(&self) -> u8 {
        self.sensitivity
    }

    /// Volume level a sample must exceed to count as noisy.
    pub fn threshold(&self) -> f32 {
        (100 - self.sensitivity) as f32
    }

    /// Update the sensitivity dial.
    ///
    /// Takes effect on the next tick; never triggers a transition by
    /// itself.  Values above 100 are clamped.
    pub fn set_sensitivity(&mut self, level: u8) {
        self.sensitivity = level.min(100);
    }

    /// Begin monitoring: `→ Quiet`, quiet streak starts at `now`.
    ///
    /// The caller is responsible for having acquired the audio stream
    /// first; on acquisition failure this is never reached and the state
    /// stays Stopped.
    pub fn start(&mut self, now: Instant) {
        self.state = MonitorState::Quiet;
        self.quiet_since = Some(now);
        self.noisy_since = None;
        self.presenter.set_mascot_state(MonitorState::Quiet);
        self.presenter.set_message("");
    }

    /// Stop monitoring: `→ Stopped` unconditionally, both timers zeroed.
    pub fn stop(&mut self) {
        self.state = MonitorState::Stopped;
        self.quiet_since = None;
        self.noisy_since = None;
        self.presenter.set_mascot_state(MonitorState::Stopped);
        self.presenter.set_message("");
        self.presenter.set_volume(0.0);
    }

    /// Process one volume sample.
    ///
    /// Returns the new state when a transition happened, `None` otherwise.
    /// A stopped classifier ignores the sample entirely — this is the
    /// cooperative-cancellation guard at the top of the polling loop.
    pub fn tick(&mut self, volume: f32, now: Instant) -> Option<MonitorState> {
        if self.state == MonitorState::Stopped {
            return None;
        }

        self.presenter.set_volume(volume);

        let is_noisy = volume > self.threshold();
        match self.state {
            MonitorState::Quiet if is_noisy => {
                self.state = MonitorState::Noisy;
                self.quiet_since = None;
                self.noisy_since = Some(now);
                if let Some(message) = pick_random(NOISY_MESSAGES, &mut self.rng) {
                    self.presenter.set_message(message);
                }
                self.presenter.set_mascot_state(MonitorState::Noisy);
                Some(MonitorState::Noisy)
            }
            MonitorState::Noisy
                if !is_noisy
                    && self
                        .noisy_since
                        .is_some_and(|t0| now.duration_since(t0) >= self.hold) =>
            {
                self.state = MonitorState::Quiet;
                self.quiet_since = Some(now);
                self.noisy_since = None;
                self.presenter.set_mascot_state(MonitorState::Quiet);
                Some(MonitorState::Quiet)
            }
            // Still debouncing, or already in the matching state.
            _ => None,
        }
    }

    /// Elapsed quiet streak, `Duration::ZERO` unless the state is Quiet.
    pub fn quiet_elapsed(&self, now: Instant) -> Duration {
        match (self.state, self.quiet_since) {
            (MonitorState::Quiet, Some(since)) => now.duration_since(since),
            _ => Duration::ZERO,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::presenter::{PresenterCall, RecordingPresenter};

    /// A started classifier with a recording presenter and a fixed seed.
    fn started(sensitivity: u8) -> (NoiseClassifier, Arc<RecordingPresenter>, Instant) {
        let presenter = Arc::new(RecordingPresenter::new());
        let dyn_presenter: Arc<dyn UiPresenter> = presenter.clone();
        let mut classifier = NoiseClassifier::new(dyn_presenter, sensitivity);
        classifier.reseed(7);

        let t0 = Instant::now();
        classifier.start(t0);
        (classifier, presenter, t0)
    }

    fn at(t0: Instant, ms: u64) -> Instant {
        t0 + Duration::from_millis(ms)
    }

    // ---- Threshold rule ----------------------------------------------------

    #[test]
    fn quiet_to_noisy_iff_volume_exceeds_threshold() {
        for sensitivity in [0u8, 10, 30, 50, 90, 100] {
            let threshold = (100 - sensitivity) as f32;
            for volume in [0.0f32, 5.0, 10.0, 10.5, 50.0, 99.0, 100.0] {
                let (mut c, _, t0) = started(sensitivity);
                c.tick(volume, at(t0, 100));

                let expected = if volume > threshold {
                    MonitorState::Noisy
                } else {
                    MonitorState::Quiet
                };
                assert_eq!(
                    c.state(),
                    expected,
                    "sensitivity {sensitivity}, volume {volume}"
                );
            }
        }
    }

    #[test]
    fn single_loud_sample_flips_immediately() {
        let (mut c, _, t0) = started(50);
        assert_eq!(c.tick(51.0, at(t0, 33)), Some(MonitorState::Noisy));
    }

    #[test]
    fn volume_exactly_at_threshold_stays_quiet() {
        let (mut c, _, t0) = started(50);
        assert_eq!(c.tick(50.0, at(t0, 33)), None);
        assert_eq!(c.state(), MonitorState::Quiet);
    }

    #[test]
    fn sensitivity_zero_disables_detection() {
        let (mut c, _, t0) = started(0);
        for i in 1..=10 {
            c.tick(100.0, at(t0, i * 100));
        }
        assert_eq!(c.state(), MonitorState::Quiet);
    }

    #[test]
    fn sensitivity_hundred_flags_any_positive_volume() {
        let (mut c, _, t0) = started(100);
        assert_eq!(c.tick(0.0, at(t0, 100)), None);
        assert_eq!(c.tick(0.5, at(t0, 200)), Some(MonitorState::Noisy));
    }

    // ---- Hold window -------------------------------------------------------

    #[test]
    fn hold_blocks_return_to_quiet_before_4s() {
        let (mut c, _, t0) = started(90); // threshold 10
        c.tick(50.0, at(t0, 0)); // → Noisy at t0

        for ms in [500, 1000, 2000, 3000, 3999] {
            assert_eq!(c.tick(5.0, at(t0, ms)), None, "at {ms} ms");
            assert_eq!(c.state(), MonitorState::Noisy);
        }
    }

    #[test]
    fn hold_boundary_is_inclusive() {
        let (mut c, _, t0) = started(90);
        c.tick(50.0, at(t0, 0));
        assert_eq!(c.tick(5.0, at(t0, 4000)), Some(MonitorState::Quiet));
    }

    #[test]
    fn loud_samples_during_hold_do_not_move_the_anchor() {
        // The window is anchored at the Quiet→Noisy transition, not at the
        // last loud sample.
        let (mut c, _, t0) = started(90);
        c.tick(50.0, at(t0, 0)); // → Noisy
        c.tick(80.0, at(t0, 3900)); // still loud, still Noisy
        assert_eq!(c.tick(5.0, at(t0, 4100)), Some(MonitorState::Quiet));
    }

    #[test]
    fn loud_sample_after_hold_expiry_keeps_noisy() {
        let (mut c, _, t0) = started(90);
        c.tick(50.0, at(t0, 0));
        assert_eq!(c.tick(50.0, at(t0, 5000)), None);
        assert_eq!(c.state(), MonitorState::Noisy);
    }

    #[test]
    fn custom_hold_duration_is_honoured() {
        let presenter: Arc<dyn UiPresenter> = Arc::new(RecordingPresenter::new());
        let mut c = NoiseClassifier::with_hold(presenter, 90, Duration::from_millis(1000));
        let t0 = Instant::now();
        c.start(t0);

        c.tick(50.0, at(t0, 0));
        assert_eq!(c.tick(5.0, at(t0, 999)), None);
        assert_eq!(c.tick(5.0, at(t0, 1000)), Some(MonitorState::Quiet));
    }

    // ---- 500 ms sampling scenarios, sensitivity 90 -------------------------

    #[test]
    fn scenario_noisy_burst_shorter_than_hold() {
        let (mut c, _, t0) = started(90); // threshold 10
        let samples = [5.0, 5.0, 50.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0];

        for (i, &v) in samples.iter().enumerate() {
            c.tick(v, at(t0, i as u64 * 500));
        }
        // Noisy entered at sample 3 (t = 1000 ms); by sample 9 (t = 4000 ms)
        // only 3000 ms have elapsed — still inside the hold.
        assert_eq!(c.state(), MonitorState::Noisy);
    }

    #[test]
    fn scenario_extended_run_reverts_once_hold_elapses() {
        let (mut c, _, t0) = started(90);
        let samples = [5.0, 5.0, 50.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0];

        let mut reverted_at = None;
        for (i, &v) in samples.iter().enumerate() {
            if c.tick(v, at(t0, i as u64 * 500)) == Some(MonitorState::Quiet) {
                reverted_at = Some(i);
            }
        }
        // Noisy at t = 1000 ms; the first quiet tick with elapsed ≥ 4000 ms
        // is sample 11 at t = 5000 ms.
        assert_eq!(reverted_at, Some(10));
        assert_eq!(c.state(), MonitorState::Quiet);
    }

    // ---- Quiet timer -------------------------------------------------------

    #[test]
    fn quiet_timer_counts_from_start() {
        let (c, _, t0) = started(50);
        assert_eq!(c.quiet_elapsed(at(t0, 10_000)), Duration::from_secs(10));
    }

    #[test]
    fn quiet_timer_zeroes_on_noisy_transition() {
        let (mut c, _, t0) = started(50);
        c.tick(90.0, at(t0, 10_000));
        assert_eq!(c.quiet_elapsed(at(t0, 11_000)), Duration::ZERO);
    }

    #[test]
    fn quiet_timer_restarts_on_revert() {
        let (mut c, _, t0) = started(90);
        c.tick(50.0, at(t0, 0)); // → Noisy
        c.tick(5.0, at(t0, 4000)); // → Quiet, streak anchored here
        assert_eq!(c.quiet_elapsed(at(t0, 9000)), Duration::from_secs(5));
    }

    #[test]
    fn quiet_timer_zero_while_stopped() {
        let (mut c, _, t0) = started(50);
        c.stop();
        assert_eq!(c.quiet_elapsed(at(t0, 60_000)), Duration::ZERO);
    }

    // ---- stop() ------------------------------------------------------------

    #[test]
    fn stop_from_quiet_and_noisy_always_yields_stopped() {
        let (mut c, _, _) = started(50);
        c.stop();
        assert_eq!(c.state(), MonitorState::Stopped);

        let (mut c, _, t0) = started(50);
        c.tick(90.0, at(t0, 100));
        assert_eq!(c.state(), MonitorState::Noisy);
        c.stop();
        assert_eq!(c.state(), MonitorState::Stopped);
        assert_eq!(c.quiet_elapsed(at(t0, 200)), Duration::ZERO);
    }

    #[test]
    fn stop_resets_volume_indicator() {
        let (mut c, presenter, t0) = started(50);
        c.tick(30.0, at(t0, 100));
        c.stop();
        assert_eq!(presenter.volumes().last(), Some(&0.0));
    }

    #[test]
    fn tick_after_stop_is_a_no_op() {
        let (mut c, presenter, t0) = started(50);
        c.stop();
        let calls_before = presenter.calls().len();

        assert_eq!(c.tick(100.0, at(t0, 1000)), None);
        assert_eq!(c.state(), MonitorState::Stopped);
        // Not even the volume sample is forwarded.
        assert_eq!(presenter.calls().len(), calls_before);
    }

    // ---- Sensitivity updates ----------------------------------------------

    #[test]
    fn set_sensitivity_alone_triggers_no_transition() {
        let (mut c, presenter, t0) = started(10); // threshold 90
        c.tick(50.0, at(t0, 100));
        assert_eq!(c.state(), MonitorState::Quiet);

        let calls_before = presenter.calls().len();
        c.set_sensitivity(90); // threshold now 10 — 50.0 would be noisy
        assert_eq!(c.state(), MonitorState::Quiet);
        assert_eq!(presenter.calls().len(), calls_before);

        // Takes effect on the next poll.
        assert_eq!(c.tick(50.0, at(t0, 200)), Some(MonitorState::Noisy));
    }

    #[test]
    fn sensitivity_is_clamped_to_100() {
        let (mut c, _, _) = started(50);
        c.set_sensitivity(255);
        assert_eq!(c.sensitivity(), 100);
        assert_eq!(c.threshold(), 0.0);
    }

    // ---- Messages ----------------------------------------------------------

    #[test]
    fn message_rerolled_only_on_quiet_to_noisy() {
        let (mut c, presenter, t0) = started(90);
        c.tick(50.0, at(t0, 0)); // → Noisy: one roll
        c.tick(60.0, at(t0, 500)); // still Noisy: no roll
        c.tick(5.0, at(t0, 1000)); // debouncing: no roll
        c.tick(5.0, at(t0, 4000)); // → Quiet: message kept, no roll

        // start() clears the message, then exactly one roll.
        let messages = presenter.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], "");
        assert!(NOISY_MESSAGES.contains(&messages[1].as_str()));
    }

    #[test]
    fn seeded_classifiers_pick_identical_messages() {
        let run = || {
            let (mut c, presenter, t0) = started(90);
            // Three separate Quiet→Noisy transitions.
            for round in 0u64..3 {
                let base = round * 10_000;
                c.tick(50.0, at(t0, base)); // → Noisy
                c.tick(5.0, at(t0, base + 4000)); // → Quiet
            }
            presenter.messages()
        };
        assert_eq!(run(), run());
    }

    // ---- Presentation sequence --------------------------------------------

    #[test]
    fn every_tick_forwards_the_volume() {
        let (mut c, presenter, t0) = started(50);
        for (i, v) in [10.0f32, 20.0, 90.0, 15.0].into_iter().enumerate() {
            c.tick(v, at(t0, i as u64 * 33));
        }
        assert_eq!(presenter.volumes(), vec![10.0, 20.0, 90.0, 15.0]);
    }

    #[test]
    fn transition_updates_mascot_after_message() {
        // The message must be on screen when the mascot wakes up.
        let (mut c, presenter, t0) = started(90);
        c.tick(50.0, at(t0, 0));

        let calls = presenter.calls();
        let msg_idx = calls
            .iter()
            .position(|c| matches!(c, PresenterCall::Message(m) if !m.is_empty()))
            .expect("a scolding message");
        let mascot_idx = calls
            .iter()
            .position(|c| matches!(c, PresenterCall::Mascot(MonitorState::Noisy)))
            .expect("a noisy mascot update");
        assert!(msg_idx < mascot_idx);
    }
}

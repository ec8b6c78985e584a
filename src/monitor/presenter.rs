//! UI presentation seam.
//!
//! [`UiPresenter`] is everything the classifier knows about rendering:
//! four fire-and-forget setters with no return values.  The production
//! implementation, [`ChannelPresenter`], forwards each call as a
//! [`UiEvent`] over a tokio mpsc channel to the egui app.
//!
//! [`RecordingPresenter`] (available under `#[cfg(test)]`) records every
//! call so the classifier and runner tests can assert on the exact
//! presentation sequence.

use tokio::sync::mpsc;

use super::state::MonitorState;

// ---------------------------------------------------------------------------
// UiPresenter trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe rendering interface.
///
/// All methods are fire-and-forget: rendering failures are the UI's
/// problem, never the classifier's.
pub trait UiPresenter: Send + Sync {
    /// Switch the mascot animation to match `state`.
    fn set_mascot_state(&self, state: MonitorState);

    /// Replace the message line.  An empty string clears it.
    fn set_message(&self, text: &str);

    /// Update the volume indicator, `percent` in `[0, 100]`.
    fn set_volume(&self, percent: f32);

    /// Update the quiet-streak display (`MM:SS`).
    fn set_timer_text(&self, text: &str);
}

// Compile-time assertion: Box<dyn UiPresenter> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn UiPresenter>) {}
};

// ---------------------------------------------------------------------------
// UiEvent
// ---------------------------------------------------------------------------

/// Events delivered from the monitor to the egui app.
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// The mascot state changed.
    Mascot(MonitorState),
    /// The message line changed.
    Message(String),
    /// A fresh volume reading, in `[0, 100]`.
    Volume(f32),
    /// The quiet-streak display changed.
    TimerText(String),
    /// `start()` failed; monitoring never began.  Carries the error text
    /// for the blocking notification.
    StartFailed(String),
}

// ---------------------------------------------------------------------------
// ChannelPresenter
// ---------------------------------------------------------------------------

/// Production presenter: forwards every call over an mpsc channel.
pub struct ChannelPresenter {
    tx: mpsc::Sender<UiEvent>,
}

impl ChannelPresenter {
    pub fn new(tx: mpsc::Sender<UiEvent>) -> Self {
        Self { tx }
    }
}

impl UiPresenter for ChannelPresenter {
    // try_send everywhere: the monitor must never block on the UI, and a
    // closed receiver just means the window is gone.
    fn set_mascot_state(&self, state: MonitorState) {
        let _ = self.tx.try_send(UiEvent::Mascot(state));
    }

    fn set_message(&self, text: &str) {
        let _ = self.tx.try_send(UiEvent::Message(text.to_string()));
    }

    fn set_volume(&self, percent: f32) {
        let _ = self.tx.try_send(UiEvent::Volume(percent));
    }

    fn set_timer_text(&self, text: &str) {
        let _ = self.tx.try_send(UiEvent::TimerText(text.to_string()));
    }
}

// ---------------------------------------------------------------------------
// RecordingPresenter  (test-only)
// ---------------------------------------------------------------------------

/// One recorded presenter call.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum PresenterCall {
    Mascot(MonitorState),
    Message(String),
    Volume(f32),
    Timer(String),
}

/// Test double that records every call in order.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingPresenter {
    calls: std::sync::Mutex<Vec<PresenterCall>>,
}

#[cfg(test)]
impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<PresenterCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mascot_states(&self) -> Vec<MonitorState> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PresenterCall::Mascot(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PresenterCall::Message(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn volumes(&self) -> Vec<f32> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PresenterCall::Volume(v) => Some(v),
                _ => None,
            })
            .collect()
    }

    pub fn timer_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PresenterCall::Timer(t) => Some(t),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
impl UiPresenter for RecordingPresenter {
    fn set_mascot_state(&self, state: MonitorState) {
        self.calls.lock().unwrap().push(PresenterCall::Mascot(state));
    }

    fn set_message(&self, text: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(PresenterCall::Message(text.to_string()));
    }

    fn set_volume(&self, percent: f32) {
        self.calls
            .lock()
            .unwrap()
            .push(PresenterCall::Volume(percent));
    }

    fn set_timer_text(&self, text: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(PresenterCall::Timer(text.to_string()));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_presenter_forwards_events() {
        let (tx, mut rx) = mpsc::channel(8);
        let presenter = ChannelPresenter::new(tx);

        presenter.set_mascot_state(MonitorState::Noisy);
        presenter.set_message("shh");
        presenter.set_volume(42.0);
        presenter.set_timer_text("01:30");

        assert!(matches!(
            rx.try_recv().unwrap(),
            UiEvent::Mascot(MonitorState::Noisy)
        ));
        assert!(matches!(rx.try_recv().unwrap(), UiEvent::Message(m) if m == "shh"));
        assert!(matches!(rx.try_recv().unwrap(), UiEvent::Volume(v) if v == 42.0));
        assert!(matches!(rx.try_recv().unwrap(), UiEvent::TimerText(t) if t == "01:30"));
    }

    #[test]
    fn channel_presenter_survives_closed_receiver() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let presenter = ChannelPresenter::new(tx);
        // Must not panic.
        presenter.set_volume(10.0);
        presenter.set_message("nobody listening");
    }

    #[test]
    fn recording_presenter_keeps_call_order() {
        let presenter = RecordingPresenter::new();
        presenter.set_volume(1.0);
        presenter.set_mascot_state(MonitorState::Quiet);
        presenter.set_timer_text("00:01");

        assert_eq!(
            presenter.calls(),
            vec![
                PresenterCall::Volume(1.0),
                PresenterCall::Mascot(MonitorState::Quiet),
                PresenterCall::Timer("00:01".into()),
            ]
        );
    }
}

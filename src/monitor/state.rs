//! Monitor state shared by the classifier, the runner and the UI.

// ---------------------------------------------------------------------------
// MonitorState
// ---------------------------------------------------------------------------

/// The three states of the noise monitor.
///
/// Exactly one value holds at any time:
///
/// ```text
/// Stopped ──start()──▶ Quiet ──loud sample──▶ Noisy
///    ▲                   ▲                      │
///    │                   └─quiet ≥ hold (4 s)───┘
///    └───────── stop(), from any state
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// Not monitoring; the microphone is released.
    Stopped,
    /// Monitoring, and the room is below the sensitivity threshold.
    Quiet,
    /// Monitoring, and a sample exceeded the threshold; the hold window
    /// must elapse before the state can revert.
    Noisy,
}

impl MonitorState {
    /// Returns `true` while monitoring is running (Quiet or Noisy).
    pub fn is_active(&self) -> bool {
        !matches!(self, MonitorState::Stopped)
    }

    /// Short lowercase label for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            MonitorState::Stopped => "stopped",
            MonitorState::Quiet => "quiet",
            MonitorState::Noisy => "noisy",
        }
    }
}

impl Default for MonitorState {
    fn default() -> Self {
        MonitorState::Stopped
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_stopped() {
        assert_eq!(MonitorState::default(), MonitorState::Stopped);
    }

    #[test]
    fn only_stopped_is_inactive() {
        assert!(!MonitorState::Stopped.is_active());
        assert!(MonitorState::Quiet.is_active());
        assert!(MonitorState::Noisy.is_active());
    }

    #[test]
    fn labels() {
        assert_eq!(MonitorState::Stopped.label(), "stopped");
        assert_eq!(MonitorState::Quiet.label(), "quiet");
        assert_eq!(MonitorState::Noisy.label(), "noisy");
    }
}

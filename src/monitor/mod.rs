//! The noise monitor — classifier, runner, and the seams around them.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                     MonitorRunner (task)                    │
//! │                                                            │
//! │  commands ──▶ Start / Stop / SetSensitivity                │
//! │  poll 30 Hz ─▶ AudioSampler ─▶ NoiseClassifier.tick()      │
//! │  clock 1 Hz ─▶ quiet_elapsed ─▶ "MM:SS"                    │
//! │                        │                                   │
//! │                        ▼                                   │
//! │                  UiPresenter ──▶ UiEvent channel ──▶ egui  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything stateful is owned by the runner task; the UI only ever sees
//! `UiEvent`s and only ever sends `MonitorCommand`s.

pub mod classifier;
pub mod messages;
pub mod presenter;
pub mod runner;
pub mod state;
pub mod timer;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use classifier::{NoiseClassifier, DEFAULT_HOLD};
pub use messages::{pick_random, NOISY_MESSAGES};
pub use presenter::{ChannelPresenter, UiEvent, UiPresenter};
pub use runner::{MonitorCommand, MonitorRunner};
pub use state::MonitorState;
pub use timer::format_mm_ss;

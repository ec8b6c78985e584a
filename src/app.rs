//! Classroom monitor window — egui/eframe application.
//!
//! # Architecture
//!
//! [`MonitorApp`] is the top-level [`eframe::App`].  It owns two channel
//! endpoints:
//!
//! * `command_tx` — sends [`MonitorCommand`] to the monitor runner.
//! * `ui_rx`      — receives [`UiEvent`] from the runner's presenter.
//!
//! Every frame it drains `ui_rx` non-blocking and renders the current
//! snapshot: mascot glyph, scolding message, volume bar, quiet-streak
//! timer, plus the two controls (start/stop toggle, sensitivity slider).
//!
//! # States
//!
//! | State | Visual |
//! |-------|--------|
//! | `Stopped` | Sleeping bear, hint to press start |
//! | `Quiet` | Sleeping face, green volume bar, timer counting |
//! | `Noisy` | Startled face, red-tinted background, scolding message |

use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::monitor::{MonitorCommand, MonitorState, UiEvent};

// ---------------------------------------------------------------------------
// MonitorApp
// ---------------------------------------------------------------------------

/// eframe application — the classroom noise monitor window.
pub struct MonitorApp {
    // ── Monitor snapshot (driven by UiEvents) ────────────────────────────
    mascot: MonitorState,
    message: String,
    /// Latest volume reading in `[0, 100]`.
    volume: f32,
    /// Quiet-streak display, `MM:SS`.
    timer_text: String,
    /// Start-failure text for the error banner.
    error_message: Option<String>,

    // ── Controls ─────────────────────────────────────────────────────────
    /// Slider value; mirrored to the runner on change.
    sensitivity: u8,
    /// Whether we believe monitoring is running (reconciled from events).
    monitoring: bool,

    // ── Channels ─────────────────────────────────────────────────────────
    command_tx: mpsc::Sender<MonitorCommand>,
    ui_rx: mpsc::Receiver<UiEvent>,

    // ── Configuration ────────────────────────────────────────────────────
    config: AppConfig,
}

impl MonitorApp {
    /// Create a new [`MonitorApp`].
    ///
    /// * `command_tx` — sender end of the monitor command channel.
    /// * `ui_rx`      — receiver end of the presenter event channel.
    /// * `config`     — loaded application configuration.
    pub fn new(
        command_tx: mpsc::Sender<MonitorCommand>,
        ui_rx: mpsc::Receiver<UiEvent>,
        config: AppConfig,
    ) -> Self {
        Self {
            mascot: MonitorState::Stopped,
            message: String::new(),
            volume: 0.0,
            timer_text: "00:00".into(),
            error_message: None,
            sensitivity: config.monitor.sensitivity.min(100),
            monitoring: false,
            command_tx,
            ui_rx,
            config,
        }
    }

    // ── Channel polling ──────────────────────────────────────────────────

    /// Drain all pending monitor events (non-blocking).
    fn poll_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Mascot(state) => {
                    self.mascot = state;
                    self.monitoring = state.is_active();
                }
                UiEvent::Message(text) => self.message = text,
                UiEvent::Volume(percent) => self.volume = percent,
                UiEvent::TimerText(text) => self.timer_text = text,
                UiEvent::StartFailed(message) => {
                    self.monitoring = false;
                    self.error_message = Some(message);
                }
            }
        }
    }

    // ── Widget renderers ─────────────────────────────────────────────────

    /// The mascot glyph for the current state.
    fn mascot_glyph(&self) -> &'static str {
        match self.mascot {
            MonitorState::Stopped => "🐻",
            MonitorState::Quiet => "😴",
            MonitorState::Noisy => "😱",
        }
    }

    /// Line of text under the mascot.
    fn message_line(&self) -> (String, egui::Color32) {
        match self.mascot {
            MonitorState::Noisy => (
                self.message.clone(),
                egui::Color32::from_rgb(255, 120, 120),
            ),
            MonitorState::Quiet => (
                "Shhh... the bear is sleeping".into(),
                egui::Color32::from_rgb(150, 170, 150),
            ),
            MonitorState::Stopped => (
                "Press ▶ to start monitoring".into(),
                egui::Color32::from_rgb(130, 130, 130),
            ),
        }
    }

    /// Draw the horizontal volume bar.
    fn draw_volume_bar(&self, ui: &mut egui::Ui) {
        let (rect, _) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), 18.0),
            egui::Sense::hover(),
        );

        let painter = ui.painter();
        painter.rect_filled(rect, 4.0, egui::Color32::from_rgb(45, 45, 45));

        let fraction = (self.volume / 100.0).clamp(0.0, 1.0);
        if fraction > 0.0 {
            let fill = egui::Rect::from_min_size(
                rect.min,
                egui::vec2(rect.width() * fraction, rect.height()),
            );
            let color = if self.mascot == MonitorState::Noisy {
                egui::Color32::from_rgb(255, 80, 80)
            } else {
                egui::Color32::from_rgb(80, 200, 120)
            };
            painter.rect_filled(fill, 4.0, color);
        }

        // Threshold marker: how close the room is to a scolding.
        let threshold_x = rect.left() + rect.width() * (100 - self.sensitivity) as f32 / 100.0;
        painter.line_segment(
            [
                egui::pos2(threshold_x, rect.top()),
                egui::pos2(threshold_x, rect.bottom()),
            ],
            egui::Stroke::new(1.5, egui::Color32::from_rgb(200, 200, 120)),
        );
    }

    /// Draw the error banner for a failed start.
    fn draw_error_banner(&mut self, ui: &mut egui::Ui) {
        let Some(message) = self.error_message.clone() else {
            return;
        };
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(message)
                    .color(egui::Color32::from_rgb(255, 136, 68))
                    .size(13.0),
            );
            if ui
                .add(egui::Button::new(egui::RichText::new("Dismiss").size(11.0)))
                .clicked()
            {
                self.error_message = None;
            }
        });
    }

    /// Draw the start/stop toggle and the sensitivity slider.
    fn draw_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let label = if self.monitoring { "⏹ Stop" } else { "▶ Start" };
            if ui
                .add(egui::Button::new(egui::RichText::new(label).size(16.0)))
                .clicked()
            {
                if self.monitoring {
                    let _ = self.command_tx.try_send(MonitorCommand::Stop);
                } else {
                    self.error_message = None;
                    let _ = self.command_tx.try_send(MonitorCommand::Start);
                }
            }

            ui.add_space(12.0);

            let slider = egui::Slider::new(&mut self.sensitivity, 0..=100).text("sensitivity");
            if ui.add(slider).changed() {
                let _ = self
                    .command_tx
                    .try_send(MonitorCommand::SetSensitivity(self.sensitivity));
            }
        });
    }

    /// Background tint for the current state.
    fn background_fill(&self) -> egui::Color32 {
        match self.mascot {
            MonitorState::Noisy => egui::Color32::from_rgb(58, 26, 26),
            MonitorState::Quiet => egui::Color32::from_rgb(26, 34, 28),
            MonitorState::Stopped => egui::Color32::from_rgb(30, 30, 30),
        }
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for MonitorApp {
    /// Called every frame by eframe.  Polls the event channel, then renders
    /// the current monitor snapshot.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_events();

        // Remember where the window sits so the next launch opens there.
        if let Some(outer_rect) = ctx.input(|i| i.viewport().outer_rect) {
            self.config.ui.window_position = Some((outer_rect.min.x, outer_rect.min.y));
        }

        // Keep polling the channel: fast while the bar is animating, slow
        // while stopped (a start failure can still arrive after a click).
        let repaint_after = if self.monitoring {
            Duration::from_millis(33)
        } else {
            Duration::from_millis(200)
        };
        ctx.request_repaint_after(repaint_after);

        let frame = egui::Frame::new()
            .fill(self.background_fill())
            .inner_margin(egui::Margin::same(16));

        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(8.0);
                ui.label(egui::RichText::new(self.mascot_glyph()).size(96.0));

                ui.add_space(6.0);
                let (message, color) = self.message_line();
                ui.label(egui::RichText::new(message).color(color).size(20.0));

                ui.add_space(10.0);
                ui.label(
                    egui::RichText::new(&self.timer_text)
                        .color(egui::Color32::from_rgb(220, 220, 220))
                        .monospace()
                        .size(40.0),
                );
                ui.label(
                    egui::RichText::new("quiet time")
                        .color(egui::Color32::from_rgb(120, 120, 120))
                        .size(11.0),
                );
            });

            ui.add_space(14.0);
            self.draw_volume_bar(ui);

            self.draw_error_banner(ui);

            ui.add_space(14.0);
            ui.separator();
            ui.add_space(6.0);
            self.draw_controls(ui);
        });
    }

    /// Persist the chosen sensitivity and window position on exit
    /// (best-effort).
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.config.monitor.sensitivity = self.sensitivity;
        if let Err(e) = self.config.save() {
            log::warn!("could not save settings: {e}");
        }
        log::info!("Quiet Please closing");
    }
}

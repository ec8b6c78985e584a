//! Application entry point — Quiet Please.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Create the command and UI-event channels.
//! 5. Build the presenter, classifier and microphone sampler.
//! 6. Spawn the monitor runner on the tokio runtime.
//! 7. Run [`eframe::run_native`] — blocks the main thread until the window
//!    is closed.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use quiet_please::{
    app::MonitorApp,
    audio::MicSampler,
    config::AppConfig,
    monitor::{
        ChannelPresenter, MonitorCommand, MonitorRunner, NoiseClassifier, UiEvent, UiPresenter,
    },
};

use eframe::egui;

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let mut vp = egui::ViewportBuilder::default()
        .with_inner_size([420.0, 520.0])
        .with_min_inner_size([340.0, 420.0]);

    if config.ui.always_on_top {
        vp = vp.with_always_on_top();
    }

    if let Some((x, y)) = config.ui.window_position {
        vp = vp.with_position(egui::pos2(x, y));
    }

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> eframe::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Quiet Please starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime (the monitor runner is the only long-lived task)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    // 4. Channel setup
    let (command_tx, command_rx) = mpsc::channel::<MonitorCommand>(16);
    let (ui_tx, ui_rx) = mpsc::channel::<UiEvent>(64);

    // 5. Presenter, classifier, sampler
    let presenter: Arc<dyn UiPresenter> = Arc::new(ChannelPresenter::new(ui_tx.clone()));

    let classifier = NoiseClassifier::with_hold(
        Arc::clone(&presenter),
        config.monitor.sensitivity,
        Duration::from_millis(config.monitor.hold_ms),
    );

    let sampler = Box::new(MicSampler::from_config(&config.audio));

    let poll_ms = (1_000 / u64::from(config.monitor.poll_hz.max(1))).max(1);
    let poll_interval = Duration::from_millis(poll_ms);

    // 6. Spawn the monitor runner onto the tokio runtime
    let runner = MonitorRunner::new(classifier, sampler, presenter, ui_tx, poll_interval);
    rt.spawn(runner.run(command_rx));

    // 7. Build the egui app and run it (blocks until the window is closed)
    let app = MonitorApp::new(command_tx, ui_rx, config.clone());

    eframe::run_native(
        "Quiet Please",
        native_options(&config),
        Box::new(move |_cc| Ok(Box::new(app))),
    )
}

//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// MonitorConfig
// ---------------------------------------------------------------------------

/// Settings for the noise classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Sensitivity dial (0–100); higher flags more sounds as noisy.
    /// The volume threshold is `100 - sensitivity`.
    pub sensitivity: u8,
    /// Minimum sustained quiet period in milliseconds before the mascot
    /// goes back to sleep.  Keeps readings that hover around the threshold
    /// from flickering the state every frame.
    pub hold_ms: u64,
    /// Volume polls per second.
    pub poll_hz: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sensitivity: 30,
            hold_ms: 4000,
            poll_hz: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// Settings for microphone capture and spectrum analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// FFT length; must be a power of two.  256 gives 128 frequency bins.
    pub fft_size: usize,
    /// Exponential smoothing factor (0.0–1.0) applied per frequency bin
    /// between polls.
    pub smoothing: f32,
    /// Audio input device name — `None` means the system default.
    pub input_device: Option<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            fft_size: 256,
            smoothing: 0.8,
            input_device: None,
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Window appearance and behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Last saved window position `(x, y)` in screen pixels.  `None` means
    /// let the OS / window manager pick a position on first launch.
    pub window_position: Option<(f32, f32)>,
    /// Keep the monitor floating above other windows — useful when the
    /// classroom projector also shows slides.
    pub always_on_top: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_position: None,
            always_on_top: false,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use quiet_please::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Classifier settings.
    pub monitor: MonitorConfig,
    /// Capture / analysis settings.
    pub audio: AudioConfig,
    /// Window settings.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns `true` when no `settings.toml` file exists yet.
    pub fn is_first_run() -> bool {
        !AppPaths::new().settings_file.exists()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Verify that a default `AppConfig` can be serialised to TOML and
    /// deserialised back without any data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.monitor.sensitivity, loaded.monitor.sensitivity);
        assert_eq!(original.monitor.hold_ms, loaded.monitor.hold_ms);
        assert_eq!(original.monitor.poll_hz, loaded.monitor.poll_hz);
        assert_eq!(original.audio.fft_size, loaded.audio.fft_size);
        assert_eq!(original.audio.smoothing, loaded.audio.smoothing);
        assert_eq!(original.audio.input_device, loaded.audio.input_device);
        assert_eq!(original.ui.always_on_top, loaded.ui.always_on_top);
        assert_eq!(original.ui.window_position, loaded.ui.window_position);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        let default = AppConfig::default();

        assert_eq!(config.monitor.sensitivity, default.monitor.sensitivity);
        assert_eq!(config.audio.fft_size, default.audio.fft_size);
    }

    /// Verify default values match the reference behaviour.
    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.monitor.sensitivity, 30);
        assert_eq!(cfg.monitor.hold_ms, 4000);
        assert_eq!(cfg.monitor.poll_hz, 30);
        assert_eq!(cfg.audio.fft_size, 256);
        assert_eq!(cfg.audio.smoothing, 0.8);
        assert!(cfg.audio.input_device.is_none());
        assert!(!cfg.ui.always_on_top);
        assert!(cfg.ui.window_position.is_none());
    }

    /// Verify that modified non-default values survive a round trip.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.monitor.sensitivity = 85;
        cfg.monitor.hold_ms = 2500;
        cfg.audio.input_device = Some("USB Classroom Mic".into());
        cfg.ui.always_on_top = true;
        cfg.ui.window_position = Some((100.0, 200.0));

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.monitor.sensitivity, 85);
        assert_eq!(loaded.monitor.hold_ms, 2500);
        assert_eq!(loaded.audio.input_device.as_deref(), Some("USB Classroom Mic"));
        assert!(loaded.ui.always_on_top);
        assert_eq!(loaded.ui.window_position, Some((100.0, 200.0)));
    }
}

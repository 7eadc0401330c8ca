//! # Kiosk Settings
//!
//! Persisted client state: the backend URL and the admin-mode flag, plus a
//! few tunables for the check-in bonus, point presets and how failed
//! background writes are reconciled. Stored as YAML in the platform config
//! directory and reloaded on every start.

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "attendance-kiosk";
const SETTINGS_FILE: &str = "settings.yaml";

pub const ENV_BACKEND_URL: &str = "KIOSK_BACKEND_URL";
pub const ENV_SETTINGS_PATH: &str = "KIOSK_SETTINGS_PATH";

/// What to do with an optimistic change whose background write failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcilePolicy {
    /// Undo the local change when the backend explicitly rejected it;
    /// keep it (and warn) when the outcome is unknown
    #[default]
    RollbackOnRejection,
    /// Never undo; only warn
    KeepOptimistic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KioskSettings {
    pub backend_url: Option<String>,
    pub admin_mode: bool,
    /// Points added locally on a successful check-in
    pub checkin_bonus: u64,
    /// Quick award buttons on the point screen
    pub point_presets: Vec<u64>,
    pub reconcile_policy: ReconcilePolicy,
}

impl Default for KioskSettings {
    fn default() -> Self {
        Self {
            backend_url: None,
            admin_mode: false,
            checkin_bonus: 10,
            point_presets: vec![10, 50, 100],
            reconcile_policy: ReconcilePolicy::default(),
        }
    }
}

impl KioskSettings {
    /// Apply environment overrides; `lookup` is `std::env::var` outside tests
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BACKEND_URL).filter(|u| !u.trim().is_empty()) {
            info!("Backend URL overridden by {}", ENV_BACKEND_URL);
            self.backend_url = Some(url.trim().to_string());
        }
        self
    }

    pub fn backend_url(&self) -> Option<&str> {
        self.backend_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }
}

/// File-backed settings store
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$KIOSK_SETTINGS_PATH`, else `<config dir>/attendance-kiosk/settings.yaml`
    pub fn default_location() -> Result<Self> {
        if let Ok(path) = std::env::var(ENV_SETTINGS_PATH) {
            return Ok(Self::new(path));
        }
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(Self::new(config_dir.join(APP_DIR).join(SETTINGS_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings; a missing file yields the defaults
    pub fn load(&self) -> Result<KioskSettings> {
        if !self.path.exists() {
            warn!("No settings file at {:?}, using defaults", self.path);
            return Ok(KioskSettings::default());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {:?}", self.path))?;
        let settings: KioskSettings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse settings in {:?}", self.path))?;

        info!("⚙️ Loaded settings from {:?}", self.path);
        Ok(settings)
    }

    pub fn save(&self, settings: &KioskSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create settings directory {:?}", parent))?;
        }

        let content = serde_yaml::to_string(settings).context("Failed to serialize settings")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write settings to {:?}", self.path))?;

        info!("💾 Saved settings to {:?}", self.path);
        Ok(())
    }
}

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub(crate) fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// User preferences. Missing fields in a saved file fall back to defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub(crate) sound: bool,
    pub(crate) vibration: bool,
    pub(crate) theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound: true,
            vibration: true,
            theme: Theme::Light,
        }
    }
}

pub(crate) const SETTINGS_ITEMS: usize = 3;

impl Settings {
    /// Flips the item at a settings-screen row.
    pub(crate) fn toggle(&mut self, row: usize) {
        match row {
            0 => self.sound = !self.sound,
            1 => self.vibration = !self.vibration,
            2 => self.theme = self.theme.toggled(),
            _ => {}
        }
    }
}

pub(crate) struct Paths {
    pub(crate) settings_path: PathBuf,
    pub(crate) log_path: PathBuf,
}

pub(crate) fn project_paths() -> Result<Paths> {
    let proj = ProjectDirs::from("com", "foodsafe", "FoodsafeQuiz")
        .context("could not resolve project directories")?;
    let dir = proj.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir).ok();
    Ok(Paths {
        settings_path: dir.join("settings.json"),
        log_path: dir.join("foodsafe-quiz.log"),
    })
}

/// Durable home of [`Settings`]: one JSON file, rewritten on every change.
pub(crate) struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn load(&self) -> Settings {
        let raw = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "no saved settings");
                return Settings::default();
            }
        };
        match serde_json::from_str::<Settings>(&raw) {
            Ok(v) => v,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring malformed settings");
                Settings::default()
            }
        }
    }

    pub(crate) fn save(&self, s: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let data = serde_json::to_vec_pretty(s)?;
        fs::write(&tmp, data)?;
        atomic_rename(&tmp, &self.path)
            .with_context(|| format!("could not replace {}", self.path.display()))?;
        Ok(())
    }
}

pub(crate) fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    // rename-over-existing is not atomic on Windows
    if cfg!(windows) && to.exists() {
        let _ = fs::remove_file(to);
    }
    fs::rename(from, to)?;
    Ok(())
}

//! Persistent client-side key-value preferences and the light/dark theme.
//!
//! Preferences live in a small JSON object on disk (`prefs.json` in the state
//! directory). Writes go to a temp file first and are renamed into place, so
//! an interrupted write never leaves a truncated file behind.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::config::{self, PREFS_FILE};
use crate::error::Result;

pub const THEME_KEY: &str = "theme";

// ---------------------------------------------------------------------------
// PreferenceStore
// ---------------------------------------------------------------------------

/// String-to-string preferences persisted as JSON.
#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl PreferenceStore {
    /// Open (or create) the store in `dir`.
    ///
    /// If `dir` is `None`, the platform config directory is used. A corrupt
    /// preferences file is discarded with a warning rather than failing.
    pub fn open(dir: Option<PathBuf>) -> Result<Self> {
        let dir = dir.unwrap_or_else(config::default_state_dir);
        fs::create_dir_all(&dir)?;
        let path = dir.join(PREFS_FILE);

        let values = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            match serde_json::from_str::<BTreeMap<String, String>>(&contents) {
                Ok(values) => values,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "corrupt preferences file -- ignoring");
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Set a value and write the store to disk immediately.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn save(&self) -> Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        let result = (|| -> Result<()> {
            fs::write(&tmp, serde_json::to_vec_pretty(&self.values)?)?;
            fs::rename(&tmp, &self.path)?;
            Ok(())
        })();

        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result
    }

    /// The persisted theme, if one was ever saved and is recognised.
    pub fn theme(&self) -> Option<Theme> {
        self.get(THEME_KEY).and_then(Theme::parse)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.set(THEME_KEY, theme.as_str())
    }
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

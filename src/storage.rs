//! Persistence layer
//!
//! Manages the data directory holding the persisted snapshot and the window
//! geometry record:
//!
//! ```text
//! <data dir>/
//!   tracker_state.json      # visibility + completion + last reset check
//!   window_geometry.json    # last window position/size (best-effort)
//!   dailies.toml            # optional configuration
//! ```
//!
//! Loads are best-effort: a missing or unreadable file falls back to
//! defaults with a logged warning, because the in-memory state is
//! authoritative. Saves go through an atomic temp-file-and-rename so a crash
//! mid-write never leaves a truncated snapshot behind.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::warn;

use crate::error::{Error, Result};
use crate::state::StateSnapshot;

/// Name of the persisted snapshot file
pub const STATE_FILE: &str = "tracker_state.json";

/// Name of the window geometry file
pub const WINDOW_FILE: &str = "window_geometry.json";

/// Name of the optional configuration file
pub const CONFIG_FILE: &str = "dailies.toml";

/// Storage manager rooted at a data directory
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    /// Create a storage manager for an explicit directory
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Resolve the data directory: explicit override or the platform default
    pub fn resolve(override_dir: Option<PathBuf>) -> Result<Self> {
        if let Some(dir) = override_dir {
            return Ok(Self::new(dir));
        }
        let dirs = ProjectDirs::from("", "", "dailies").ok_or_else(|| {
            Error::OperationFailed("could not determine a data directory".to_string())
        })?;
        Ok(Self::new(dirs.data_dir().to_path_buf()))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn state_file(&self) -> PathBuf {
        self.data_dir.join(STATE_FILE)
    }

    pub fn window_file(&self) -> PathBuf {
        self.data_dir.join(WINDOW_FILE)
    }

    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }

    /// Ensure the data directory exists
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }

    // =========================================================================
    // File I/O helpers (atomic writes)
    // =========================================================================

    /// Write JSON data atomically (write to temp, then rename)
    pub fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        self.write_atomic(path, json.as_bytes())
    }

    /// Read JSON data from a file
    pub fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = fs::read_to_string(path)?;
        let data: T = serde_json::from_str(&content)?;
        Ok(data)
    }

    /// Write data atomically using temp file + rename
    ///
    /// Readers never see a partial write; the file is either fully written
    /// or untouched.
    pub fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("tmp");
        let mut file = File::create(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;

        fs::rename(&temp_path, path)?;
        Ok(())
    }

    // =========================================================================
    // Snapshot persistence
    // =========================================================================

    /// Load the persisted snapshot, falling back to defaults
    ///
    /// Missing file is the normal first-run case. A corrupt file is logged
    /// and treated as absent; the next save overwrites it.
    pub fn load_snapshot(&self) -> StateSnapshot {
        let path = self.state_file();
        if !path.exists() {
            return StateSnapshot::default();
        }
        match self.read_json(&path) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to load state; using defaults");
                StateSnapshot::default()
            }
        }
    }

    /// Persist the snapshot
    ///
    /// Failure is reported, never fatal: in-memory state stays authoritative
    /// and the caller may retry on the next save.
    pub fn save_snapshot(&self, snapshot: &StateSnapshot) -> Result<()> {
        self.init()?;
        let path = self.state_file();
        self.write_json(&path, snapshot).map_err(|err| {
            warn!(path = %path.display(), error = %err, "failed to save state");
            Error::Persist(path)
        })
    }

    // =========================================================================
    // Window geometry (presentation concern, same lifecycle contract)
    // =========================================================================

    /// Load the last window geometry, or defaults if absent/unreadable
    pub fn load_window(&self) -> WindowGeometry {
        let path = self.window_file();
        if !path.exists() {
            return WindowGeometry::default();
        }
        match self.read_json(&path) {
            Ok(geometry) => geometry,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to load window geometry");
                WindowGeometry::default()
            }
        }
    }

    /// Save the window geometry, best-effort
    pub fn save_window(&self, geometry: &WindowGeometry) -> Result<()> {
        self.init()?;
        let path = self.window_file();
        self.write_json(&path, geometry).map_err(|err| {
            warn!(path = %path.display(), error = %err, "failed to save window geometry");
            Error::Persist(path)
        })
    }
}

/// Last window position and size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowGeometry {
    #[serde(default = "default_window_dim")]
    pub width: u32,
    #[serde(default = "default_window_dim")]
    pub height: u32,
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
}

fn default_window_dim() -> u32 {
    700
}

impl Default for WindowGeometry {
    fn default() -> Self {
        Self {
            width: 700,
            height: 700,
            x: 0,
            y: 0,
        }
    }
}

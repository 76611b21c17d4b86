use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::game::GameTimings;
use crate::mode::Mode;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Mode to open with; updated to the last mode played
    pub mode: Mode,
    pub mismatch_delay_ms: u64,
    pub match_delay_ms: u64,
    pub win_announce_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        let timings = GameTimings::default();
        Self {
            mode: Mode::Normal,
            mismatch_delay_ms: timings.mismatch_delay_ms,
            match_delay_ms: timings.match_delay_ms,
            win_announce_delay_ms: timings.win_announce_delay_ms,
        }
    }
}

impl Config {
    pub fn timings(&self) -> GameTimings {
        GameTimings {
            mismatch_delay_ms: self.mismatch_delay_ms,
            match_delay_ms: self.match_delay_ms,
            win_announce_delay_ms: self.win_announce_delay_ms,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "pairs") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("pairs_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice::<Config>(&bytes).unwrap_or_else(|e| {
                log::warn!("ignoring unreadable {}: {}", self.path.display(), e);
                Config::default()
            }),
            Err(_) => Config::default(),
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

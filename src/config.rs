use crate::session::{SessionConfig, WrongAnswerPolicy, DEFAULT_TARGET_SCORE};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_FEEDBACK_MILLIS: u64 = 4_000;
pub const DEFAULT_REWARD_MILLIS: u64 = 1_500;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub target_score: u32,
    pub wrong_answer: WrongAnswerPolicy,
    /// How long the correction for a wrong answer stays on screen
    pub feedback_millis: u64,
    /// How long the reward animation runs after a correct answer
    pub reward_millis: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_score: DEFAULT_TARGET_SCORE,
            wrong_answer: WrongAnswerPolicy::Deferred,
            feedback_millis: DEFAULT_FEEDBACK_MILLIS,
            reward_millis: DEFAULT_REWARD_MILLIS,
        }
    }
}

impl Config {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            // a target of zero would finish before the first answer
            target_score: self.target_score.max(1),
            wrong_answer: self.wrong_answer,
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
        let path = if let Some(pd) = ProjectDirs::from("", "", "mathdrill") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("mathdrill_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Config::default(),
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!(
                    "ignoring unreadable config {}: {}",
                    self.path.display(),
                    e
                );
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}

use crate::error::{SweepError, SweepResult};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default = "default_blacklist_file")]
    pub blacklist_file: PathBuf,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    #[serde(default = "default_prompt")]
    pub prompt: bool,

    /// Run the fix-broken sweep after every processed package, not only
    /// between a failed attempt and its retry.
    #[serde(default = "default_repair_after_each_package")]
    pub repair_after_each_package: bool,
}

impl Config {
    /// Loads the TOML file at `config_path`, or returns the defaults when no
    /// path is given. An explicitly named file must exist.
    pub fn load(config_path: Option<&str>) -> SweepResult<Self> {
        let Some(path) = config_path else {
            return Ok(Config::default());
        };
        let path = PathBuf::from(path);
        if !path.is_file() {
            return Err(SweepError::ConfigError(format!(
                "config file {} does not exist",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            blacklist_file: default_blacklist_file(),
            log_dir: default_log_dir(),
            prompt: default_prompt(),
            repair_after_each_package: default_repair_after_each_package(),
        }
    }
}

fn default_blacklist_file() -> PathBuf {
    PathBuf::from("blacklist.txt")
}

fn default_log_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_prompt() -> bool {
    true
}

fn default_repair_after_each_package() -> bool {
    true
}

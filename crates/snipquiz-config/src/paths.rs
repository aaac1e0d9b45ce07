use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Points the whole install (config and data) at one directory.
///
/// Set it to run the quiz from a USB stick or to keep several independent
/// leaderboards side by side.
pub const BASE_DIR_ENV: &str = "SNIPQUIZ_BASE_DIR";

const CONFIG_FILE: &str = "snipquiz.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("toml error: {0}")]
  Toml(#[from] toml::de::Error),
  #[error("no home directory to place config and data in")]
  Directories,
  #[error("missing section [{0}]")]
  MissingSection(String),
  #[error("{0}")]
  Other(String),
}

/// Where the quiz keeps `snipquiz.toml` and its data files (catalog, local scores).
#[derive(Debug, Clone)]
pub struct QuizPaths {
  pub config_dir: PathBuf,
  pub data_dir: PathBuf,
}

impl QuizPaths {
  /// `SNIPQUIZ_BASE_DIR` if set and non-empty, otherwise the per-user OS dirs.
  /// Both directories exist on return.
  pub fn detect() -> Result<Self, ConfigError> {
    match std::env::var_os(BASE_DIR_ENV) {
      Some(base) if !base.is_empty() => Self::rooted_at(base),
      _ => {
        let dirs = ProjectDirs::from("com", "snipquiz", "snipquiz").ok_or(ConfigError::Directories)?;
        Self::create(dirs.config_dir().to_path_buf(), dirs.data_dir().to_path_buf())
      }
    }
  }

  /// `<base>/config` + `<base>/data`.
  pub fn rooted_at(base: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let base = base.as_ref();
    Self::create(base.join("config"), base.join("data"))
  }

  fn create(config_dir: PathBuf, data_dir: PathBuf) -> Result<Self, ConfigError> {
    for dir in [&config_dir, &data_dir] {
      std::fs::create_dir_all(dir)?;
    }
    Ok(Self { config_dir, data_dir })
  }

  pub fn config_file(&self) -> PathBuf {
    self.config_dir.join(CONFIG_FILE)
  }
}

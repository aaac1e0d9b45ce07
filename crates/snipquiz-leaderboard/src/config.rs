use snipquiz_config::{ConfigBackend, ConfigError, PATHS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Dónde se guardan las puntuaciones. Sección `[leaderboard]`, discriminada por `kind`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LeaderboardConfig {
  /// Documento JSON local con altas condicionales.
  File { path: PathBuf },

  /// Tabla remota: `GET`/`POST` sobre `{base_url}/{table}`.
  Http {
    base_url: String,
    table: String,
    /// Variable de entorno con el token; nunca se escribe en el archivo.
    token_env: String,
    #[serde(default = "default_timeout_seconds")]
    timeout_seconds: u64,
  },
}

fn default_timeout_seconds() -> u64 {
  10
}

impl Default for LeaderboardConfig {
  fn default() -> Self {
    LeaderboardConfig::File { path: PATHS.data_dir.join("scores.json") }
  }
}

impl LeaderboardConfig {
  pub fn load_from<B: ConfigBackend>(backend: &B) -> Result<Self, ConfigError> {
    backend.load_section_or_default("leaderboard")
  }
}

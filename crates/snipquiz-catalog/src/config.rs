use snipquiz_config::{ConfigBackend, ConfigError, PATHS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CatalogConfig {
  /// Archivo JSON con la lista de canciones.
  pub path: PathBuf,
}

impl Default for CatalogConfig {
  fn default() -> Self {
    CatalogConfig { path: PATHS.data_dir.join("songs.json") }
  }
}

impl CatalogConfig {
  /// Lee la sección `[catalog]`; si falta, la ruta por defecto en `data_dir`.
  pub fn load_from<B: ConfigBackend>(backend: &B) -> Result<Self, ConfigError> {
    backend.load_section_or_default("catalog")
  }
}

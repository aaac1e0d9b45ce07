// crates/snipquiz-core/src/errors.rs
use thiserror::Error;

/// Error genérico del núcleo del quiz.
///
/// Las capas superiores (UI, composition root) deberían mapear este error
/// a mensajes de usuario o logs.
#[derive(Debug, Error)]
pub enum CoreError {
  /// Configuración inválida; se rechaza al arrancar, nunca a mitad de ronda.
  #[error("configuration error: {0}")]
  Config(String),

  /// El catálogo no se pudo cargar o está mal formado. Fatal, sin reintento.
  #[error("catalog error: {0}")]
  Catalog(String),

  #[error("invalid display name: {0}")]
  InvalidName(String),
}

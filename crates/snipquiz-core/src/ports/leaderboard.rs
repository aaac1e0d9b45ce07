use crate::domain::player::{DisplayName, ScoreRecord};

#[derive(Debug, thiserror::Error)]
pub enum LeaderboardError {
  /// Red o servicio caído. El envío se puede reintentar.
  #[error("leaderboard unavailable: {0}")]
  Unavailable(String),

  /// El almacenamiento rechazó el alta porque el nombre ya existe.
  ///
  /// Sólo lo devuelven backends con escritura condicional.
  #[error("display name already taken: {0}")]
  NameTaken(String),
}

/// Port del leaderboard compartido: "¿existe este nombre?" + "añade un registro".
///
/// Entre las dos llamadas hay una ventana de carrera si dos sesiones usan el
/// mismo nombre a la vez. Un backend que pueda hacer altas condicionales debe
/// cerrarla devolviendo [`LeaderboardError::NameTaken`] desde `append`; el
/// resto la acepta (unicidad best-effort, uso cooperativo).
#[async_trait::async_trait]
pub trait Leaderboard: Send + Sync {
  async fn name_exists(&self, name: &DisplayName) -> Result<bool, LeaderboardError>;
  async fn append(&self, record: &ScoreRecord) -> Result<(), LeaderboardError>;
}

use crate::domain::song::Song;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
  #[error("catalog unreachable: {0}")]
  Unreachable(String),

  #[error("malformed catalog: {0}")]
  Malformed(String),
}

/// Port que abstrae de dónde sale la lista de canciones.
///
/// Se llama una vez al empezar la partida. Un fallo es fatal y visible para
/// el usuario; el núcleo no reintenta.
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
  async fn load(&self) -> Result<Vec<Song>, CatalogError>;
}

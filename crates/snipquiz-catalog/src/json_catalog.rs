use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use snipquiz_core::CoreError;
use snipquiz_core::domain::{AudioRef, Catalog, Song};
use snipquiz_core::ports::catalog::{CatalogError, CatalogSource};

/// Una entrada del archivo de catálogo tal como está en disco.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SongRecord {
  pub id: u32,
  pub title: String,
  pub artist: String,
  #[serde(alias = "audio_path", alias = "audioRef")]
  pub audio_path: String,
}

impl From<SongRecord> for Song {
  fn from(r: SongRecord) -> Self {
    Song::new(r.id, r.title, r.artist, AudioRef::new(r.audio_path))
  }
}

/// Catálogo servido desde un archivo JSON: un array de [`SongRecord`].
#[derive(Debug, Clone)]
pub struct JsonCatalog {
  path: PathBuf,
}

impl JsonCatalog {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

#[async_trait]
impl CatalogSource for JsonCatalog {
  async fn load(&self) -> Result<Vec<Song>, CatalogError> {
    let raw = match tokio::fs::read_to_string(&self.path).await {
      Ok(raw) => raw,
      Err(e) if e.kind() == ErrorKind::NotFound => {
        return Err(CatalogError::Unreachable(format!("{} not found", self.path.display())));
      }
      Err(e) => return Err(CatalogError::Unreachable(format!("{}: {e}", self.path.display()))),
    };

    let records: Vec<SongRecord> =
      serde_json::from_str(&raw).map_err(|e| CatalogError::Malformed(format!("{}: {e}", self.path.display())))?;

    tracing::debug!(path = %self.path.display(), songs = records.len(), "catalog file parsed");

    Ok(records.into_iter().map(Song::from).collect())
  }
}

/// Carga la lista desde `source` y la valida como [`Catalog`].
///
/// Cualquier fallo aquí es fatal para la partida.
pub async fn load_catalog<S: CatalogSource + ?Sized>(source: &S) -> Result<Catalog, CoreError> {
  let songs = source.load().await.map_err(|e| CoreError::Catalog(e.to_string()))?;
  let catalog = Catalog::new(songs)?;
  tracing::info!(songs = catalog.len(), "catalog loaded");
  Ok(catalog)
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  const SONGS: &str = r#"[
    { "id": 1, "title": "Blue Monday", "artist": "New Order", "audioPath": "audio/1.mp3" },
    { "id": 2, "title": "Karma Police", "artist": "Radiohead", "audioPath": "audio/2.mp3" }
  ]"#;

  #[tokio::test]
  async fn parses_song_records() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("songs.json");
    std::fs::write(&path, SONGS).unwrap();

    let songs = JsonCatalog::new(&path).load().await.unwrap();

    assert_eq!(songs.len(), 2);
    assert_eq!(songs[1].title, "Karma Police");
    assert_eq!(songs[1].audio_ref.as_str(), "audio/2.mp3");
  }

  #[tokio::test]
  async fn missing_file_is_unreachable() {
    let dir = tempdir().unwrap();
    let err = JsonCatalog::new(dir.path().join("nope.json")).load().await.unwrap_err();
    assert!(matches!(err, CatalogError::Unreachable(_)));
  }

  #[tokio::test]
  async fn broken_json_is_malformed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("songs.json");
    std::fs::write(&path, r#"[{ "id": 1, "title": "x" }]"#).unwrap();

    let err = JsonCatalog::new(&path).load().await.unwrap_err();
    assert!(matches!(err, CatalogError::Malformed(_)));
  }

  #[tokio::test]
  async fn empty_list_fails_validation() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("songs.json");
    std::fs::write(&path, "[]").unwrap();

    let err = load_catalog(&JsonCatalog::new(&path)).await.unwrap_err();
    assert!(matches!(err, CoreError::Config(_)));
  }

  #[tokio::test]
  async fn duplicate_ids_fail_validation() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("songs.json");
    std::fs::write(
      &path,
      r#"[
        { "id": 7, "title": "A", "artist": "X", "audioPath": "a.mp3" },
        { "id": 7, "title": "B", "artist": "Y", "audioPath": "b.mp3" }
      ]"#,
    )
    .unwrap();

    let err = load_catalog(&JsonCatalog::new(&path)).await.unwrap_err();
    assert!(matches!(err, CoreError::Catalog(_)));
  }
}

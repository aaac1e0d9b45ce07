use crate::domain::ids::SongId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Localizador opaco del audio (URL, ruta relativa...). El núcleo no lo interpreta.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioRef(String);

impl AudioRef {
  pub fn new(locator: impl Into<String>) -> Self {
    AudioRef(locator.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for AudioRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// La canción tal como la ve el quiz. Inmutable una vez cargada.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
  /// Identificador único dentro del catálogo.
  pub id: SongId,
  /// El título de la canción.
  pub title: String,
  /// El intérprete principal.
  pub artist: String,
  /// Dónde encontrar el audio.
  pub audio_ref: AudioRef,
}

impl Song {
  pub fn new(id: impl Into<SongId>, title: impl Into<String>, artist: impl Into<String>, audio_ref: AudioRef) -> Self {
    Self { id: id.into(), title: title.into(), artist: artist.into(), audio_ref }
  }

  /// Coincidencia por subcadena, sin distinguir mayúsculas, en título o artista.
  pub fn matches(&self, needle_lowercase: &str) -> bool {
    self.title.to_lowercase().contains(needle_lowercase) || self.artist.to_lowercase().contains(needle_lowercase)
  }
}

impl fmt::Display for Song {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} - {}", self.title, self.artist)
  }
}

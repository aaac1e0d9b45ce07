use serde::{Deserialize, Serialize};
use std::fmt;

/// Identificador de una canción dentro del catálogo.
///
/// El catálogo lo asigna (entero único); el núcleo nunca lo genera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(u32);

impl SongId {
  pub const fn new(raw: u32) -> Self {
    SongId(raw)
  }

  pub fn get(&self) -> u32 {
    self.0
  }
}

impl From<u32> for SongId {
  fn from(raw: u32) -> Self {
    SongId(raw)
  }
}

impl From<SongId> for u32 {
  fn from(id: SongId) -> Self {
    id.0
  }
}

impl fmt::Display for SongId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

use std::collections::HashMap;

use crate::domain::config::SelectionMode;
use crate::domain::ids::SongId;
use crate::domain::song::Song;
use crate::errors::CoreError;

/// Vista de solo lectura de la lista de canciones de una partida.
///
/// Se valida al construirse: un catálogo vacío es un error de configuración
/// y un id repetido lo deja mal formado. Ninguno de los dos se descubre a
/// mitad de ronda.
#[derive(Debug, Clone)]
pub struct Catalog {
  songs: Vec<Song>,
  index: HashMap<SongId, usize>,
}

impl Catalog {
  pub fn new(songs: Vec<Song>) -> Result<Self, CoreError> {
    if songs.is_empty() {
      return Err(CoreError::Config("catalog contains no songs".into()));
    }

    let mut index = HashMap::with_capacity(songs.len());
    for (pos, song) in songs.iter().enumerate() {
      if index.insert(song.id, pos).is_some() {
        return Err(CoreError::Catalog(format!("duplicate song id {}", song.id)));
      }
    }

    Ok(Self { songs, index })
  }

  pub fn len(&self) -> usize {
    self.songs.len()
  }

  /// Siempre `false`: [`Catalog::new`] rechaza listas vacías.
  pub fn is_empty(&self) -> bool {
    self.songs.is_empty()
  }

  pub fn songs(&self) -> &[Song] {
    &self.songs
  }

  pub fn get(&self, id: SongId) -> Option<&Song> {
    self.index.get(&id).map(|&pos| &self.songs[pos])
  }

  pub fn contains(&self, id: SongId) -> bool {
    self.index.contains_key(&id)
  }

  /// Candidatos que la UI ofrece para adivinar.
  ///
  /// - `FreeTextSearch`: filtra por título o artista; consulta vacía → todo el catálogo.
  /// - `FixedList`: siempre el catálogo completo, ordenado por título.
  pub fn candidates(&self, mode: SelectionMode, query: &str) -> Vec<&Song> {
    match mode {
      SelectionMode::FreeTextSearch => {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
          return self.songs.iter().collect();
        }
        self.songs.iter().filter(|s| s.matches(&needle)).collect()
      }
      SelectionMode::FixedList => {
        let mut all: Vec<&Song> = self.songs.iter().collect();
        all.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
        all
      }
    }
  }
}

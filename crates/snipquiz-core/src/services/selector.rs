use rand::Rng;
use rand::seq::IndexedRandom;

use crate::domain::{Catalog, PlayedSet, Song};

/// No quedan canciones sin presentar en esta partida.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("every song in the catalog has been played")]
pub struct Exhausted;

/// Elige, uniformemente, una canción que no esté en `played` y la marca como presentada.
///
/// Se calcula primero el pool restante y se sortea sobre él, así que termina
/// siempre, incluso con un único candidato, y señala el agotamiento en vez de
/// reintentar.
pub fn pick_next<R: Rng + ?Sized>(catalog: &Catalog, played: &mut PlayedSet, rng: &mut R) -> Result<Song, Exhausted> {
  let remaining: Vec<&Song> = catalog.songs().iter().filter(|song| !played.contains(song.id)).collect();

  let song = remaining.choose(rng).ok_or(Exhausted)?;
  played.insert(song.id);

  Ok((*song).clone())
}

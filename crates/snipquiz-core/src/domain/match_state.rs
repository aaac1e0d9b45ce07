use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::domain::ids::SongId;

/// Canciones ya presentadas en la partida. Sólo crece.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayedSet(HashSet<SongId>);

impl PlayedSet {
  /// Devuelve `false` si el id ya estaba.
  pub fn insert(&mut self, id: SongId) -> bool {
    self.0.insert(id)
  }

  pub fn contains(&self, id: SongId) -> bool {
    self.0.contains(&id)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

/// Por qué terminó una partida.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
  /// Se presentaron todas las canciones del catálogo.
  Exhausted,
  /// Se jugó el número de rondas configurado.
  RoundLimit,
  /// El reloj de la partida llegó a cero.
  TimeUp,
}

impl EndReason {
  /// Mensaje final que ve el jugador.
  pub fn message(&self, final_score: i64) -> String {
    match self {
      EndReason::TimeUp => format!("Time's up! Your final score is {final_score}."),
      EndReason::Exhausted | EndReason::RoundLimit => format!("Game Over! Your final score is {final_score}."),
    }
  }
}

impl fmt::Display for EndReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = match self {
      EndReason::Exhausted => "catalog exhausted",
      EndReason::RoundLimit => "round limit reached",
      EndReason::TimeUp => "time up",
    };
    f.write_str(label)
  }
}

/// Estado global de la partida. Una vez `ended` es `Some`, queda congelado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
  pub score: i64,
  pub round_number: u32,
  pub played: PlayedSet,
  /// `None` en partidas sin reloj.
  pub time_remaining_seconds: Option<u32>,
  /// Ticks del reloj desde el inicio; es el "time taken" del registro final.
  pub elapsed_seconds: u32,
  pub ended: Option<EndReason>,
}

impl MatchState {
  pub fn new(played: PlayedSet, time_limit_seconds: Option<u32>) -> Self {
    Self {
      score: 0,
      round_number: 1,
      played,
      time_remaining_seconds: time_limit_seconds,
      elapsed_seconds: 0,
      ended: None,
    }
  }

  pub fn is_ended(&self) -> bool {
    self.ended.is_some()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn played_set_ignores_duplicates() {
    let mut played = PlayedSet::default();
    assert!(played.insert(SongId::new(4)));
    assert!(!played.insert(SongId::new(4)));
    assert_eq!(played.len(), 1);
    assert!(played.contains(SongId::new(4)));
  }

  #[test]
  fn end_messages_distinguish_timeout() {
    assert_eq!(EndReason::TimeUp.message(14), "Time's up! Your final score is 14.");
    assert_eq!(EndReason::Exhausted.message(-2), "Game Over! Your final score is -2.");
  }
}

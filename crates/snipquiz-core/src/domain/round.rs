use serde::Serialize;
use std::fmt;

use crate::domain::config::MatchConfig;
use crate::domain::ids::SongId;
use crate::domain::song::Song;

/// Resultado de evaluar una respuesta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
  pub correct: bool,
  pub points_awarded: i64,
  /// La respuesta correcta; la UI la revela cuando se falla.
  pub answer: Song,
}

impl fmt::Display for Outcome {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.correct {
      write!(f, "Correct! {:+} points", self.points_awarded)
    } else {
      write!(f, "Incorrect. The answer was {} by {}.", self.answer.title, self.answer.artist)
    }
  }
}

/// Fase de una ronda: `AwaitingSelection` → `Evaluated`. Una ronda evaluada es terminal;
/// la siguiente ronda es un `RoundState` nuevo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundPhase {
  AwaitingSelection,
  Evaluated(Outcome),
}

/// Estado de la ronda en curso. Se reemplaza entero al cargar la siguiente.
///
/// Invariante: `snippet_duration_seconds == base + step * skips_used`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
  pub current_song: Song,
  pub round_number: u32,
  pub skips_used: u32,
  pub snippet_duration_seconds: u32,
  pub selected_candidate: Option<SongId>,
  pub phase: RoundPhase,
}

impl RoundState {
  pub fn fresh(song: Song, round_number: u32, config: &MatchConfig) -> Self {
    Self {
      current_song: song,
      round_number,
      skips_used: 0,
      snippet_duration_seconds: config.base_snippet_seconds,
      selected_candidate: None,
      phase: RoundPhase::AwaitingSelection,
    }
  }

  pub fn is_evaluated(&self) -> bool {
    matches!(self.phase, RoundPhase::Evaluated(_))
  }

  pub fn outcome(&self) -> Option<&Outcome> {
    match &self.phase {
      RoundPhase::Evaluated(outcome) => Some(outcome),
      RoundPhase::AwaitingSelection => None,
    }
  }

  /// What the UI may show without spoiling the answer.
  pub fn view(&self, config: &MatchConfig) -> RoundView {
    RoundView {
      round_number: self.round_number,
      skips_used: self.skips_used,
      skips_allowed: config.skips_allowed,
      snippet_duration_seconds: self.snippet_duration_seconds,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoundView {
  pub round_number: u32,
  pub skips_used: u32,
  pub skips_allowed: u32,
  pub snippet_duration_seconds: u32,
}

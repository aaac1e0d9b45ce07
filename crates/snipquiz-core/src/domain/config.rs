use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Cómo elige el jugador su respuesta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
  /// Búsqueda libre por título o artista.
  #[default]
  FreeTextSearch,
  /// Lista fija con todo el catálogo.
  FixedList,
}

/// Reglas de una partida. Un único motor cubre todas las variantes del juego
/// (con o sin reloj, tope de saltos 3 o 6, búsqueda libre o lista fija).
///
/// Los valores por defecto son los de la variante con reloj de 8 minutos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
  /// Puntos por acierto sin saltos.
  pub base_points: i64,
  /// Puntos que cuesta cada salto usado.
  pub penalty_per_skip: i64,
  /// Duración del fragmento antes de cualquier salto.
  pub base_snippet_seconds: u32,
  /// Segundos que añade cada salto.
  pub skip_step_seconds: u32,
  /// Tope de saltos por ronda; debe ser > 0.
  pub skips_allowed: u32,
  /// Duración total de la partida. Omitir la clave en TOML → partida sin reloj.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub match_time_limit_seconds: Option<u32>,
  /// Rondas máximas por partida; sin límite → hasta agotar el catálogo.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub rounds_per_match: Option<u32>,
  pub selection_mode: SelectionMode,
  /// Si es `true`, un acierto nunca resta puntos aunque los saltos superen la base.
  pub clamp_score_at_zero: bool,
}

impl Default for MatchConfig {
  fn default() -> Self {
    Self {
      base_points: 10,
      penalty_per_skip: 2,
      base_snippet_seconds: 3,
      skip_step_seconds: 2,
      skips_allowed: 3,
      match_time_limit_seconds: Some(480),
      rounds_per_match: None,
      selection_mode: SelectionMode::FreeTextSearch,
      clamp_score_at_zero: false,
    }
  }
}

impl MatchConfig {
  /// Rechaza configuraciones que romperían una ronda a mitad de partida.
  pub fn validate(&self) -> Result<(), CoreError> {
    if self.skips_allowed == 0 {
      return Err(CoreError::Config("skips_allowed must be greater than zero".into()));
    }
    if self.base_snippet_seconds == 0 {
      return Err(CoreError::Config("base_snippet_seconds must be greater than zero".into()));
    }
    if self.match_time_limit_seconds == Some(0) {
      return Err(CoreError::Config("match_time_limit_seconds must be greater than zero".into()));
    }
    if self.rounds_per_match == Some(0) {
      return Err(CoreError::Config("rounds_per_match must be greater than zero".into()));
    }
    if self.penalty_per_skip < 0 {
      return Err(CoreError::Config("penalty_per_skip must not be negative".into()));
    }
    if self.checked_max_snippet_seconds().is_none() {
      return Err(CoreError::Config("base_snippet_seconds + skip_step_seconds * skips_allowed overflows".into()));
    }
    let worst_penalty = self.penalty_per_skip.checked_mul(i64::from(self.skips_allowed));
    if worst_penalty.and_then(|p| self.base_points.checked_sub(p)).is_none() {
      return Err(CoreError::Config("base_points - penalty_per_skip * skips_allowed overflows".into()));
    }
    Ok(())
  }

  fn checked_max_snippet_seconds(&self) -> Option<u32> {
    self.skip_step_seconds.checked_mul(self.skips_allowed)?.checked_add(self.base_snippet_seconds)
  }

  /// Longest snippet a round can reach.
  pub fn max_snippet_seconds(&self) -> u32 {
    self.checked_max_snippet_seconds().unwrap_or(u32::MAX)
  }
}

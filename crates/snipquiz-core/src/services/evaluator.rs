use crate::domain::{MatchConfig, Outcome, RoundState, SongId};

/// Puntos de un acierto tras `skips_used` saltos.
///
/// Sin `clamp_score_at_zero` puede salir negativo (base baja y muchos saltos).
pub fn points_for(skips_used: u32, config: &MatchConfig) -> i64 {
  let points = config.base_points - i64::from(skips_used) * config.penalty_per_skip;
  if config.clamp_score_at_zero { points.max(0) } else { points }
}

/// Evalúa `candidate` contra la canción de la ronda. Un fallo vale 0.
pub fn evaluate(round: &RoundState, candidate: SongId, config: &MatchConfig) -> Outcome {
  let correct = candidate == round.current_song.id;
  let points_awarded = if correct { points_for(round.skips_used, config) } else { 0 };

  Outcome { correct, points_awarded, answer: round.current_song.clone() }
}

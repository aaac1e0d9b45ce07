use crate::domain::{MatchConfig, RoundState};

pub fn can_skip(round: &RoundState, config: &MatchConfig) -> bool {
  round.skips_used < config.skips_allowed
}

/// Duración del fragmento tras `skips_used` saltos. Satura en vez de desbordar;
/// [`MatchConfig::validate`] ya rechaza configuraciones que lleguen a ese punto.
pub fn snippet_seconds_after(skips_used: u32, config: &MatchConfig) -> u32 {
  config.skip_step_seconds.saturating_mul(skips_used).saturating_add(config.base_snippet_seconds)
}

/// Aplica un salto: un segundo fragmento más largo y un acierto que vale menos.
///
/// Con el tope alcanzado devuelve la ronda sin cambios. No reproduce nada: el
/// siguiente `play` ya usa la nueva duración.
pub fn use_skip(round: &RoundState, config: &MatchConfig) -> RoundState {
  if !can_skip(round, config) {
    return round.clone();
  }

  let skips_used = round.skips_used + 1;
  RoundState { skips_used, snippet_duration_seconds: snippet_seconds_after(skips_used, config), ..round.clone() }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{AudioRef, Song};

  fn round(config: &MatchConfig) -> RoundState {
    RoundState::fresh(Song::new(1, "T", "A", AudioRef::new("a.mp3")), 1, config)
  }

  #[test]
  fn duration_tracks_skips_even_past_the_cap() {
    let config = MatchConfig { skips_allowed: 3, ..MatchConfig::default() };
    let mut state = round(&config);

    for _ in 0..10 {
      state = use_skip(&state, &config);
      assert_eq!(state.snippet_duration_seconds, snippet_seconds_after(state.skips_used, &config));
    }

    assert_eq!(state.skips_used, 3);
    assert_eq!(state.snippet_duration_seconds, 9);
    assert!(!can_skip(&state, &config));
  }

  #[test]
  fn six_skip_variant() {
    let config = MatchConfig { skips_allowed: 6, ..MatchConfig::default() };
    let mut state = round(&config);
    for _ in 0..6 {
      state = use_skip(&state, &config);
    }
    assert_eq!(state.snippet_duration_seconds, 15);
    assert_eq!(use_skip(&state, &config), state);
  }

  #[test]
  fn extreme_step_saturates_instead_of_panicking() {
    let config = MatchConfig { skip_step_seconds: u32::MAX, skips_allowed: 3, ..MatchConfig::default() };
    let state = use_skip(&round(&config), &config);
    assert_eq!(state.snippet_duration_seconds, u32::MAX);
  }
}

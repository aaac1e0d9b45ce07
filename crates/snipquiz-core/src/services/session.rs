use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::domain::{
  Catalog, DisplayName, EndReason, MatchConfig, MatchState, Outcome, PlayedSet, RoundPhase, RoundState, RoundView,
  ScoreRecord, Song, SongId,
};
use crate::errors::CoreError;
use crate::services::{escalator, evaluator, selector};

/// Qué controles de la UI están habilitados ahora mismo.
///
/// Las acciones inválidas (adivinar sin selección, saltar pasado el tope) se
/// evitan deshabilitando el control, no con errores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Controls {
  pub play: bool,
  pub skip: bool,
  pub search: bool,
  pub submit_guess: bool,
  pub next_round: bool,
  pub submit_score: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundAdvance {
  Started(RoundView),
  Ended(EndReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
  Running { time_remaining_seconds: Option<u32>, elapsed_seconds: u32 },
  Expired,
  /// La partida ya había terminado; el reloj debería estar parado.
  Stopped,
}

/// Una partida: catálogo, reglas, jugador y estado, sin nada global.
///
/// Es una máquina de estados síncrona; los relojes y el audio viven en
/// [`MatchRuntime`](crate::services::MatchRuntime), que la envuelve. Cuando la
/// partida termina queda congelada: ningún método posterior cambia `score` ni
/// `round_number`.
pub struct MatchSession {
  config: MatchConfig,
  catalog: Arc<Catalog>,
  player: DisplayName,
  state: MatchState,
  round: RoundState,
  rng: StdRng,
}

impl MatchSession {
  pub fn start(config: MatchConfig, catalog: Arc<Catalog>, player: DisplayName) -> Result<Self, CoreError> {
    Self::start_with_rng(config, catalog, player, StdRng::from_os_rng())
  }

  pub fn start_with_rng(
    config: MatchConfig,
    catalog: Arc<Catalog>,
    player: DisplayName,
    mut rng: StdRng,
  ) -> Result<Self, CoreError> {
    config.validate()?;

    let mut played = PlayedSet::default();
    let song = selector::pick_next(&catalog, &mut played, &mut rng)
      .map_err(|e| CoreError::Config(format!("cannot start a match: {e}")))?;

    let round = RoundState::fresh(song, 1, &config);
    let state = MatchState::new(played, config.match_time_limit_seconds);

    info!(player = %player, songs = catalog.len(), time_limit = ?config.match_time_limit_seconds, "match started");

    Ok(Self { config, catalog, player, state, round, rng })
  }

  pub fn config(&self) -> &MatchConfig {
    &self.config
  }

  pub fn catalog(&self) -> &Catalog {
    &self.catalog
  }

  pub fn player(&self) -> &DisplayName {
    &self.player
  }

  pub fn state(&self) -> &MatchState {
    &self.state
  }

  pub fn round(&self) -> &RoundState {
    &self.round
  }

  pub fn round_view(&self) -> RoundView {
    self.round.view(&self.config)
  }

  pub fn is_ended(&self) -> bool {
    self.state.is_ended()
  }

  pub fn end_reason(&self) -> Option<EndReason> {
    self.state.ended
  }

  fn accepts_round_input(&self) -> bool {
    !self.is_ended() && matches!(self.round.phase, RoundPhase::AwaitingSelection)
  }

  pub fn controls(&self) -> Controls {
    let input = self.accepts_round_input();
    Controls {
      play: !self.is_ended(),
      skip: input && escalator::can_skip(&self.round, &self.config),
      search: input,
      submit_guess: input && self.round.selected_candidate.is_some(),
      next_round: !self.is_ended() && self.round.is_evaluated(),
      submit_score: self.is_ended(),
    }
  }

  /// Candidatos para la consulta actual según el modo de selección.
  pub fn candidates(&self, query: &str) -> Vec<&Song> {
    self.catalog.candidates(self.config.selection_mode, query)
  }

  /// Nueva duración del fragmento, o `None` si el salto no procede.
  pub fn use_skip(&mut self) -> Option<u32> {
    if !self.accepts_round_input() || !escalator::can_skip(&self.round, &self.config) {
      return None;
    }

    self.round = escalator::use_skip(&self.round, &self.config);
    debug!(round = self.round.round_number, skips = self.round.skips_used, "skip used");
    Some(self.round.snippet_duration_seconds)
  }

  pub fn select_candidate(&mut self, id: SongId) -> bool {
    if !self.accepts_round_input() || !self.catalog.contains(id) {
      return false;
    }
    self.round.selected_candidate = Some(id);
    true
  }

  pub fn clear_selection(&mut self) {
    if self.accepts_round_input() {
      self.round.selected_candidate = None;
    }
  }

  /// Evalúa la selección actual. `None` sin selección, fuera de fase o con la partida terminada.
  pub fn submit_guess(&mut self) -> Option<Outcome> {
    if !self.accepts_round_input() {
      return None;
    }
    let candidate = self.round.selected_candidate?;

    let outcome = evaluator::evaluate(&self.round, candidate, &self.config);
    self.state.score += outcome.points_awarded;
    self.round.phase = RoundPhase::Evaluated(outcome.clone());

    info!(
      round = self.round.round_number,
      correct = outcome.correct,
      points = outcome.points_awarded,
      score = self.state.score,
      "guess evaluated"
    );
    Some(outcome)
  }

  /// Pasa de una ronda evaluada a la siguiente, o termina la partida si no quedan.
  pub fn next_round(&mut self) -> Option<RoundAdvance> {
    if self.is_ended() || !self.round.is_evaluated() {
      return None;
    }

    if self.config.rounds_per_match.is_some_and(|limit| self.state.round_number >= limit) {
      return Some(RoundAdvance::Ended(self.end(EndReason::RoundLimit)));
    }

    let song = match selector::pick_next(&self.catalog, &mut self.state.played, &mut self.rng) {
      Ok(song) => song,
      Err(selector::Exhausted) => return Some(RoundAdvance::Ended(self.end(EndReason::Exhausted))),
    };

    self.state.round_number += 1;
    self.round = RoundState::fresh(song, self.state.round_number, &self.config);
    debug!(round = self.state.round_number, played = self.state.played.len(), "round started");

    Some(RoundAdvance::Started(self.round_view()))
  }

  /// Un segundo del reloj de la partida. Al llegar a cero termina la partida,
  /// esté como esté la ronda.
  pub fn tick(&mut self) -> TickOutcome {
    if self.is_ended() {
      return TickOutcome::Stopped;
    }

    self.state.elapsed_seconds += 1;

    if let Some(remaining) = self.state.time_remaining_seconds.as_mut() {
      *remaining = remaining.saturating_sub(1);
      if *remaining == 0 {
        self.end(EndReason::TimeUp);
        return TickOutcome::Expired;
      }
    }

    TickOutcome::Running {
      time_remaining_seconds: self.state.time_remaining_seconds,
      elapsed_seconds: self.state.elapsed_seconds,
    }
  }

  fn end(&mut self, reason: EndReason) -> EndReason {
    if let Some(already) = self.state.ended {
      return already;
    }
    self.state.ended = Some(reason);
    info!(%reason, score = self.state.score, rounds = self.state.round_number, "match ended");
    reason
  }

  /// Cambia el nombre con el que se enviará la puntuación (p. ej. tras un rechazo).
  pub fn rename_player(&mut self, player: DisplayName) {
    self.player = player;
  }

  /// El registro a enviar; sólo existe cuando la partida terminó.
  pub fn score_record(&self) -> Option<ScoreRecord> {
    self.is_ended().then(|| ScoreRecord {
      display_name: self.player.clone(),
      final_score: self.state.score,
      time_taken_seconds: self.state.elapsed_seconds,
    })
  }
}

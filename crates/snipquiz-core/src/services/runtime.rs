use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rand::rngs::StdRng;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::domain::{Catalog, DisplayName, EndReason, MatchConfig, Outcome, RoundView, ScoreRecord, Song, SongId};
use crate::errors::CoreError;
use crate::ports::{AudioPlayer, Leaderboard, MatchObserver};
use crate::services::session::{Controls, MatchSession, RoundAdvance, TickOutcome};
use crate::services::snippet::SnippetController;
use crate::services::submission::{Ack, SubmissionGate, SubmitError};
use crate::services::timer::MatchTimer;

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Adapters a runtime is wired with.
pub struct MatchDeps<A, L, O>
where
  A: AudioPlayer + 'static,
  L: Leaderboard + 'static,
  O: MatchObserver + 'static,
{
  pub audio: Arc<A>,
  pub gate: SubmissionGate<L>,
  pub observer: Arc<O>,
}

/// Lo que la UI pinta en cabecera: marcador, ronda, reloj.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSnapshot {
  pub score: i64,
  pub round_number: u32,
  pub songs_played: usize,
  pub time_remaining_seconds: Option<u32>,
  pub elapsed_seconds: u32,
  pub ended: Option<EndReason>,
}

struct RuntimeCore<A: AudioPlayer + 'static, O: MatchObserver + 'static> {
  session: Mutex<MatchSession>,
  snippet: SnippetController<A>,
  observer: Arc<O>,
}

impl<A: AudioPlayer + 'static, O: MatchObserver + 'static> RuntimeCore<A, O> {
  fn session(&self) -> MutexGuard<'_, MatchSession> {
    self.session.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Llamado desde el reloj. La expiración gana siempre: se aplica bajo el mismo
  /// lock que cualquier evaluación, y después nada puede mutar la partida.
  fn on_tick(&self) -> ControlFlow<()> {
    let (outcome, score) = {
      let mut session = self.session();
      (session.tick(), session.state().score)
    };

    match outcome {
      TickOutcome::Running { time_remaining_seconds, elapsed_seconds } => {
        self.observer.tick(time_remaining_seconds, elapsed_seconds);
        ControlFlow::Continue(())
      }
      TickOutcome::Expired => {
        self.observer.tick(Some(0), self.session().state().elapsed_seconds);
        self.snippet.stop();
        self.observer.match_ended(EndReason::TimeUp, score);
        ControlFlow::Break(())
      }
      TickOutcome::Stopped => ControlFlow::Break(()),
    }
  }

  /// Posición nativa del reproductor → progreso del fragmento.
  fn on_position(&self, position_seconds: f64) {
    self.observer.progress(self.snippet.progress(position_seconds));
  }
}

/// Una partida en marcha: sesión + audio + reloj + envío de puntuación.
///
/// Todas las operaciones de ronda son síncronas y cortas; sólo
/// [`MatchRuntime::submit_score`] suspende, y no bloquea ni el reloj ni la
/// parada automática del fragmento. Debe crearse dentro de un runtime de Tokio.
pub struct MatchRuntime<A, L, O>
where
  A: AudioPlayer + 'static,
  L: Leaderboard + 'static,
  O: MatchObserver + 'static,
{
  core: Arc<RuntimeCore<A, O>>,
  timer: Mutex<MatchTimer>,
  position_feed: JoinHandle<()>,
  gate: SubmissionGate<L>,
}

impl<A, L, O> MatchRuntime<A, L, O>
where
  A: AudioPlayer + 'static,
  L: Leaderboard + 'static,
  O: MatchObserver + 'static,
{
  pub fn start(
    config: MatchConfig,
    catalog: Arc<Catalog>,
    player: DisplayName,
    deps: MatchDeps<A, L, O>,
  ) -> Result<Self, CoreError> {
    let session = MatchSession::start(config, catalog, player)?;
    Ok(Self::with_session(session, deps))
  }

  pub fn start_with_rng(
    config: MatchConfig,
    catalog: Arc<Catalog>,
    player: DisplayName,
    rng: StdRng,
    deps: MatchDeps<A, L, O>,
  ) -> Result<Self, CoreError> {
    let session = MatchSession::start_with_rng(config, catalog, player, rng)?;
    Ok(Self::with_session(session, deps))
  }

  fn with_session(session: MatchSession, deps: MatchDeps<A, L, O>) -> Self {
    let MatchDeps { audio, gate, observer } = deps;

    load_round(&session, &audio, &observer);
    let mut positions = audio.positions();

    let core = Arc::new(RuntimeCore { session: Mutex::new(session), snippet: SnippetController::new(audio), observer });

    let ticking = Arc::clone(&core);
    let timer = MatchTimer::start(TICK_PERIOD, move || ticking.on_tick());

    let listening = Arc::clone(&core);
    let position_feed = tokio::spawn(async move {
      while positions.changed().await.is_ok() {
        let position = *positions.borrow_and_update();
        listening.on_position(position);
      }
    });

    Self { core, timer: Mutex::new(timer), position_feed, gate }
  }

  fn session(&self) -> MutexGuard<'_, MatchSession> {
    self.core.session()
  }

  pub fn snapshot(&self) -> MatchSnapshot {
    let session = self.session();
    let state = session.state();
    MatchSnapshot {
      score: state.score,
      round_number: state.round_number,
      songs_played: state.played.len(),
      time_remaining_seconds: state.time_remaining_seconds,
      elapsed_seconds: state.elapsed_seconds,
      ended: state.ended,
    }
  }

  pub fn controls(&self) -> Controls {
    let mut controls = self.session().controls();
    controls.submit_score &= self.gate.is_enabled();
    controls
  }

  pub fn round_view(&self) -> RoundView {
    self.session().round_view()
  }

  pub fn is_timer_running(&self) -> bool {
    self.timer.lock().unwrap_or_else(PoisonError::into_inner).is_running()
  }

  pub fn has_pending_snippet_stop(&self) -> bool {
    self.core.snippet.has_pending_stop()
  }

  /// Reproduce el fragmento con la duración actual. Devuelve esa duración.
  pub fn play(&self) -> Option<u32> {
    let duration = {
      let session = self.session();
      if !session.controls().play {
        return None;
      }
      session.round().snippet_duration_seconds
    };

    self.core.snippet.play(duration);
    Some(duration)
  }

  pub fn skip(&self) -> Option<u32> {
    self.session().use_skip()
  }

  /// Candidatos para `query`. Editar la búsqueda descarta la selección actual.
  pub fn search(&self, query: &str) -> Vec<Song> {
    let mut session = self.session();
    session.clear_selection();
    session.candidates(query).into_iter().cloned().collect()
  }

  pub fn select(&self, id: SongId) -> bool {
    self.session().select_candidate(id)
  }

  /// Evalúa la selección; también corta la reproducción en curso.
  pub fn guess(&self) -> Option<Outcome> {
    let outcome = self.session().submit_guess()?;
    self.core.snippet.stop();
    self.core.observer.guess_evaluated(&outcome);
    Some(outcome)
  }

  pub fn next_round(&self) -> Option<RoundAdvance> {
    let mut session = self.session();
    let advance = session.next_round()?;

    match &advance {
      RoundAdvance::Started(_) => {
        load_round(&session, self.core.snippet.player(), &self.core.observer);
      }
      RoundAdvance::Ended(reason) => {
        let score = session.state().score;
        drop(session);
        self.finish(*reason, score);
      }
    }

    Some(advance)
  }

  fn finish(&self, reason: EndReason, score: i64) {
    self.timer.lock().unwrap_or_else(PoisonError::into_inner).cancel();
    self.core.snippet.stop();
    self.core.observer.match_ended(reason, score);
  }

  /// Cambia el nombre para el envío. No se permite tras un envío aceptado.
  pub fn rename_player(&self, player: DisplayName) -> bool {
    if self.gate.is_submitted() {
      return false;
    }
    self.session().rename_player(player);
    true
  }

  pub fn score_record(&self) -> Option<ScoreRecord> {
    self.session().score_record()
  }

  /// Envía la puntuación final. El control se deshabilita antes de la primera
  /// espera, así que dos llamadas seguidas producen una sola escritura.
  pub async fn submit_score(&self) -> Result<Ack, SubmitError> {
    let record = self.score_record().ok_or(SubmitError::MatchInProgress)?;
    let token = self.gate.begin()?;
    debug!(?token, player = %record.display_name, "submitting score");
    self.gate.complete(token, &record).await
  }
}

impl<A, L, O> Drop for MatchRuntime<A, L, O>
where
  A: AudioPlayer + 'static,
  L: Leaderboard + 'static,
  O: MatchObserver + 'static,
{
  fn drop(&mut self) {
    self.position_feed.abort();
  }
}

fn load_round<A: AudioPlayer, O: MatchObserver>(session: &MatchSession, audio: &Arc<A>, observer: &Arc<O>) {
  let round = session.round();
  audio.set_source(&round.current_song.audio_ref);
  info!(round = round.round_number, "round loaded");
  observer.round_started(&session.round_view());
}

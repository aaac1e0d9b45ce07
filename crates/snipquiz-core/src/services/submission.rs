use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::ScoreRecord;
use crate::ports::{Leaderboard, LeaderboardError};

pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
  /// El control está deshabilitado: hay un intento en curso o ya se envió.
  #[error("score submission is disabled")]
  Disabled,

  #[error("the match has not ended yet")]
  MatchInProgress,

  /// El nombre ya está en el leaderboard. Se puede reintentar con otro.
  #[error("display name {0} is already on the leaderboard")]
  Rejected(String),

  /// Fallo de red o del servicio. Se puede reintentar.
  #[error("leaderboard service error: {0}")]
  Service(String),

  /// El servicio no respondió a tiempo. El intento sigue vivo en segundo plano
  /// y el control sigue deshabilitado hasta que se resuelva.
  #[error("leaderboard did not answer within {0:?}")]
  TimedOut(Duration),

  /// Resolución tardía de un intento cuando otro ya fue aceptado; se ignora.
  #[error("a later submission was already accepted")]
  Superseded,
}

/// Identifica un intento de envío; se compara al resolverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttemptToken(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
  pub record: ScoreRecord,
  pub attempt: AttemptToken,
}

#[derive(Debug, Default)]
struct GateState {
  next_token: u64,
  in_flight: Option<AttemptToken>,
  accepted: Option<AttemptToken>,
}

type SharedState = Arc<Mutex<GateState>>;

fn lock(state: &SharedState) -> MutexGuard<'_, GateState> {
  state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Single-shot score submission against a shared leaderboard.
///
/// Protocol per attempt: existence check on the display name, then append.
/// [`SubmissionGate::begin`] disables the control synchronously, before any
/// I/O, so a double click yields exactly one write. A service failure
/// re-enables it; an accepted write closes the gate for good.
///
/// In-flight attempts are never cancelled. One that outlives its timeout
/// reports [`SubmitError::TimedOut`] to the caller but keeps its reservation:
/// only the task's own resolution releases it, so at most one write per match
/// is ever running. Resolutions are matched against the attempt token, never
/// against a plain flag.
pub struct SubmissionGate<L: Leaderboard + 'static> {
  leaderboard: Arc<L>,
  state: SharedState,
  attempt_timeout: Duration,
}

impl<L: Leaderboard + 'static> SubmissionGate<L> {
  pub fn new(leaderboard: L) -> Self {
    Self::from_shared(Arc::new(leaderboard))
  }

  pub fn from_shared(leaderboard: Arc<L>) -> Self {
    Self { leaderboard, state: Arc::new(Mutex::new(GateState::default())), attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT }
  }

  pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
    self.attempt_timeout = timeout;
    self
  }

  pub fn leaderboard(&self) -> &Arc<L> {
    &self.leaderboard
  }

  /// Whether the submit control should be enabled.
  pub fn is_enabled(&self) -> bool {
    let state = lock(&self.state);
    state.in_flight.is_none() && state.accepted.is_none()
  }

  pub fn is_submitted(&self) -> bool {
    lock(&self.state).accepted.is_some()
  }

  pub fn accepted_attempt(&self) -> Option<AttemptToken> {
    lock(&self.state).accepted
  }

  /// Reserva un intento y deshabilita el control. Síncrono: no hace I/O.
  pub fn begin(&self) -> Result<AttemptToken, SubmitError> {
    let mut state = lock(&self.state);
    if state.in_flight.is_some() || state.accepted.is_some() {
      return Err(SubmitError::Disabled);
    }

    let token = AttemptToken(state.next_token);
    state.next_token += 1;
    state.in_flight = Some(token);
    Ok(token)
  }

  /// Ejecuta comprobación + alta para un intento reservado con [`SubmissionGate::begin`].
  pub async fn complete(&self, token: AttemptToken, record: &ScoreRecord) -> Result<Ack, SubmitError> {
    let leaderboard = Arc::clone(&self.leaderboard);
    let state = Arc::clone(&self.state);
    let owned = record.clone();

    let attempt = tokio::spawn(async move {
      let result = check_then_append(leaderboard.as_ref(), &owned).await;
      resolve(&state, token, result.map(|()| owned))
    });

    match tokio::time::timeout(self.attempt_timeout, attempt).await {
      Ok(Ok(resolution)) => resolution,
      Ok(Err(join)) => {
        self.release(token);
        Err(SubmitError::Service(format!("submission task failed: {join}")))
      }
      Err(_elapsed) => {
        warn!(?token, timeout = ?self.attempt_timeout, "score submission timed out; still waiting for the leaderboard");
        Err(SubmitError::TimedOut(self.attempt_timeout))
      }
    }
  }

  /// `begin` + `complete` en una llamada.
  pub async fn submit(&self, record: &ScoreRecord) -> Result<Ack, SubmitError> {
    let token = self.begin()?;
    self.complete(token, record).await
  }

  fn release(&self, token: AttemptToken) {
    let mut state = lock(&self.state);
    if state.in_flight == Some(token) {
      state.in_flight = None;
    }
  }
}

async fn check_then_append<L: Leaderboard + ?Sized>(leaderboard: &L, record: &ScoreRecord) -> Result<(), SubmitError> {
  let name = &record.display_name;

  let taken = leaderboard.name_exists(name).await.map_err(map_leaderboard_error)?;
  if taken {
    return Err(SubmitError::Rejected(name.to_string()));
  }

  leaderboard.append(record).await.map_err(map_leaderboard_error)
}

fn resolve(state: &SharedState, token: AttemptToken, result: Result<ScoreRecord, SubmitError>) -> Result<Ack, SubmitError> {
  let mut state = lock(state);
  if state.in_flight == Some(token) {
    state.in_flight = None;
  }

  if let Some(accepted) = state.accepted {
    if accepted != token {
      debug!(?token, ?accepted, "ignoring late submission result");
      return Err(SubmitError::Superseded);
    }
  }

  match result {
    Ok(record) => {
      state.accepted = Some(token);
      info!(player = %record.display_name, score = record.final_score, "score submitted");
      Ok(Ack { record, attempt: token })
    }
    Err(e) => {
      warn!(?token, error = %e, "score submission failed");
      Err(e)
    }
  }
}

fn map_leaderboard_error(err: LeaderboardError) -> SubmitError {
  match err {
    LeaderboardError::Unavailable(e) => SubmitError::Service(e),
    LeaderboardError::NameTaken(name) => SubmitError::Rejected(name),
  }
}

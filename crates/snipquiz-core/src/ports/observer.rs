use crate::domain::match_state::EndReason;
use crate::domain::round::{Outcome, RoundView};
use crate::services::snippet::SnippetProgress;

// Port de salida: la UI implementa esto para enterarse de lo que pasa.
// Todos los métodos tienen implementación vacía por defecto.
pub trait MatchObserver: Send + Sync {
  fn round_started(&self, _round: &RoundView) {}
  fn tick(&self, _time_remaining_seconds: Option<u32>, _elapsed_seconds: u32) {}
  fn progress(&self, _progress: SnippetProgress) {}
  fn guess_evaluated(&self, _outcome: &Outcome) {}
  fn match_ended(&self, _reason: EndReason, _final_score: i64) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl MatchObserver for NoopObserver {}

use snipquiz_core::domain::clock::format_clock;
use snipquiz_core::domain::{EndReason, Outcome, RoundView};
use snipquiz_core::ports::MatchObserver;
use snipquiz_core::services::SnippetProgress;
use tracing::{debug, info};

/// A `MatchObserver` that bridges match events to the tracing subscriber.
///
/// Stands in for a UI: every side-channel notification becomes a log line.
/// Ticks and progress are noisy, so they go out at `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl TracingObserver {
  pub fn new() -> Self {
    Self
  }
}

impl MatchObserver for TracingObserver {
  fn round_started(&self, round: &RoundView) {
    info!(
      round = round.round_number,
      snippet_seconds = round.snippet_duration_seconds,
      skips_allowed = round.skips_allowed,
      "round started"
    );
  }

  fn tick(&self, time_remaining_seconds: Option<u32>, elapsed_seconds: u32) {
    match time_remaining_seconds {
      Some(left) => debug!(clock = %format_clock(left as f64), "tick"),
      None => debug!(elapsed = %format_clock(elapsed_seconds as f64), "tick"),
    }
  }

  fn progress(&self, progress: SnippetProgress) {
    debug!(
      position = %format_clock(progress.elapsed_seconds),
      total = %format_clock(progress.total_seconds),
      "snippet progress"
    );
  }

  fn guess_evaluated(&self, outcome: &Outcome) {
    info!(correct = outcome.correct, points = outcome.points_awarded, "{outcome}");
  }

  fn match_ended(&self, reason: EndReason, final_score: i64) {
    info!(?reason, final_score, "{}", reason.message(final_score));
  }
}

use std::ops::ControlFlow;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// Periodic countdown task, independent of round progress.
///
/// The first tick fires one `period` after start. `on_tick` returning
/// `ControlFlow::Break` stops the task from inside; [`MatchTimer::cancel`]
/// stops it from outside. After either, no further tick runs.
pub struct MatchTimer {
  handle: Option<JoinHandle<()>>,
}

impl MatchTimer {
  pub fn start<F>(period: Duration, mut on_tick: F) -> Self
  where
    F: FnMut() -> ControlFlow<()> + Send + 'static,
  {
    let handle = tokio::spawn(async move {
      let mut ticks = interval_at(Instant::now() + period, period);
      ticks.set_missed_tick_behavior(MissedTickBehavior::Burst);

      loop {
        ticks.tick().await;
        if on_tick().is_break() {
          break;
        }
      }
    });

    Self { handle: Some(handle) }
  }

  /// Un temporizador que nunca arrancó; útil antes de tener runtime.
  pub fn idle() -> Self {
    Self { handle: None }
  }

  pub fn cancel(&mut self) {
    if let Some(handle) = self.handle.take() {
      handle.abort();
    }
  }

  pub fn is_running(&self) -> bool {
    self.handle.as_ref().is_some_and(|h| !h.is_finished())
  }
}

impl Drop for MatchTimer {
  fn drop(&mut self) {
    self.cancel();
  }
}

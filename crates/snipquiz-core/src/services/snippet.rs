use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::ports::AudioPlayer;

/// Progreso del fragmento para la barra de la UI. No influye en puntuación ni tiempos.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SnippetProgress {
  pub elapsed_seconds: f64,
  pub total_seconds: f64,
}

impl SnippetProgress {
  pub fn fraction(&self) -> f64 {
    if self.total_seconds <= 0.0 { 0.0 } else { (self.elapsed_seconds / self.total_seconds).clamp(0.0, 1.0) }
  }
}

struct PendingStop {
  token: u64,
  handle: JoinHandle<()>,
}

type Slot = Arc<Mutex<Option<PendingStop>>>;

fn lock(slot: &Slot) -> MutexGuard<'_, Option<PendingStop>> {
  slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Drives the opaque player so it sounds for exactly the snippet duration.
///
/// Each `play` cancels the previous auto-stop before scheduling its own, so at
/// most one stop is ever pending. The stop task also compares its token on
/// wake-up, which covers an abort that lands after the sleep already finished.
/// Must be used inside a Tokio runtime.
pub struct SnippetController<A: AudioPlayer + 'static> {
  player: Arc<A>,
  pending: Slot,
  next_token: AtomicU64,
  total_seconds: AtomicU32,
}

impl<A: AudioPlayer + 'static> SnippetController<A> {
  pub fn new(player: Arc<A>) -> Self {
    Self { player, pending: Arc::new(Mutex::new(None)), next_token: AtomicU64::new(0), total_seconds: AtomicU32::new(0) }
  }

  pub fn player(&self) -> &Arc<A> {
    &self.player
  }

  /// Rebobina, reproduce y programa la parada a `duration_seconds`.
  pub fn play(&self, duration_seconds: u32) {
    let mut pending = lock(&self.pending);
    if let Some(previous) = pending.take() {
      previous.handle.abort();
      debug!(token = previous.token, "superseded pending snippet stop");
    }

    self.player.pause();
    self.player.seek(0.0);
    self.player.play();
    self.total_seconds.store(duration_seconds, Ordering::Relaxed);

    let token = self.next_token.fetch_add(1, Ordering::Relaxed);
    let player = Arc::clone(&self.player);
    let slot = Arc::clone(&self.pending);

    let handle = tokio::spawn(async move {
      tokio::time::sleep(Duration::from_secs(u64::from(duration_seconds))).await;

      let mut pending = lock(&slot);
      if pending.as_ref().is_some_and(|p| p.token == token) {
        pending.take();
        player.pause();
        debug!(token, "snippet auto-stopped");
      }
    });

    *pending = Some(PendingStop { token, handle });
  }

  /// Cancela la parada programada, si la hay, sin tocar el reproductor.
  pub fn cancel_pending(&self) {
    if let Some(previous) = lock(&self.pending).take() {
      previous.handle.abort();
    }
  }

  /// Cancela la parada programada y pausa ya.
  pub fn stop(&self) {
    self.cancel_pending();
    self.player.pause();
  }

  pub fn has_pending_stop(&self) -> bool {
    lock(&self.pending).is_some()
  }

  /// Traduce una notificación de posición del reproductor en progreso del fragmento.
  pub fn progress(&self, position_seconds: f64) -> SnippetProgress {
    let total_seconds = f64::from(self.total_seconds.load(Ordering::Relaxed));
    SnippetProgress { elapsed_seconds: position_seconds.clamp(0.0, total_seconds), total_seconds }
  }
}

impl<A: AudioPlayer + 'static> Drop for SnippetController<A> {
  fn drop(&mut self) {
    self.cancel_pending();
  }
}

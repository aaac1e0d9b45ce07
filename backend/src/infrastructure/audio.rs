use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use snipquiz_core::domain::AudioRef;
use snipquiz_core::ports::AudioPlayer;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::debug;

/// How often the headless transport publishes its position while playing.
pub const POSITION_INTERVAL: Duration = Duration::from_millis(250);

/// What the headless player would be doing if it had a device.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackState {
  pub source: Option<AudioRef>,
  pub position_seconds: f64,
  pub playing: bool,
}

struct Transport {
  state: Mutex<PlaybackState>,
  position: watch::Sender<f64>,
}

impl Transport {
  fn lock(&self) -> MutexGuard<'_, PlaybackState> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  fn publish(&self, position_seconds: f64) {
    self.position.send_replace(position_seconds);
  }
}

/// `AudioPlayer` with no output device.
///
/// Keeps the transport state, advances the position on a clock while playing
/// and publishes it like a real player's time-update events, so the quiz runs
/// the same in a terminal or under test. `play` must be called inside a Tokio
/// runtime.
pub struct HeadlessPlayer {
  transport: Arc<Transport>,
  clock: Mutex<Option<JoinHandle<()>>>,
}

impl Default for HeadlessPlayer {
  fn default() -> Self {
    Self::new()
  }
}

impl HeadlessPlayer {
  pub fn new() -> Self {
    let transport = Transport { state: Mutex::new(PlaybackState::default()), position: watch::channel(0.0).0 };
    Self { transport: Arc::new(transport), clock: Mutex::new(None) }
  }

  pub fn state(&self) -> PlaybackState {
    self.transport.lock().clone()
  }

  fn stop_clock(&self) {
    if let Some(handle) = self.clock.lock().unwrap_or_else(PoisonError::into_inner).take() {
      handle.abort();
    }
  }

  fn start_clock(&self) {
    let transport = Arc::clone(&self.transport);
    let handle = tokio::spawn(async move {
      let mut ticks = interval_at(Instant::now() + POSITION_INTERVAL, POSITION_INTERVAL);
      ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

      loop {
        ticks.tick().await;
        let position = {
          let mut state = transport.lock();
          if !state.playing {
            break;
          }
          state.position_seconds += POSITION_INTERVAL.as_secs_f64();
          state.position_seconds
        };
        transport.publish(position);
      }
    });

    if let Some(previous) = self.clock.lock().unwrap_or_else(PoisonError::into_inner).replace(handle) {
      previous.abort();
    }
  }
}

impl AudioPlayer for HeadlessPlayer {
  fn set_source(&self, source: &AudioRef) {
    self.stop_clock();
    {
      let mut state = self.transport.lock();
      state.source = Some(source.clone());
      state.position_seconds = 0.0;
      state.playing = false;
    }
    self.transport.publish(0.0);
    debug!(%source, "audio source loaded");
  }

  fn seek(&self, position_seconds: f64) {
    let position = position_seconds.max(0.0);
    self.transport.lock().position_seconds = position;
    self.transport.publish(position);
  }

  fn play(&self) {
    self.transport.lock().playing = true;
    self.start_clock();
    debug!("playback started");
  }

  fn pause(&self) {
    self.stop_clock();
    self.transport.lock().playing = false;
    debug!("playback paused");
  }

  fn positions(&self) -> watch::Receiver<f64> {
    self.transport.position.subscribe()
  }
}

impl Drop for HeadlessPlayer {
  fn drop(&mut self) {
    self.stop_clock();
  }
}

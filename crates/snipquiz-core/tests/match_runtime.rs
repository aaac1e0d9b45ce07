use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::watch;
use tokio::time::sleep;

use snipquiz_core::domain::{AudioRef, Catalog, DisplayName, EndReason, MatchConfig, RoundView, ScoreRecord, Song, SongId};
use snipquiz_core::ports::{AudioPlayer, Leaderboard, LeaderboardError, MatchObserver};
use snipquiz_core::services::{MatchDeps, MatchRuntime, RoundAdvance, SnippetProgress, SubmissionGate, SubmitError};

#[derive(Debug, Clone, PartialEq)]
enum AudioEvent {
  Source(String),
  Seek,
  Play,
  Pause,
}

struct RecordingAudio {
  events: Mutex<Vec<AudioEvent>>,
  position: watch::Sender<f64>,
}

impl Default for RecordingAudio {
  fn default() -> Self {
    Self { events: Mutex::default(), position: watch::channel(0.0).0 }
  }
}

impl RecordingAudio {
  fn last(&self) -> Option<AudioEvent> {
    self.events.lock().unwrap().last().cloned()
  }

  fn sources(&self) -> usize {
    self.events.lock().unwrap().iter().filter(|e| matches!(e, AudioEvent::Source(_))).count()
  }
}

impl AudioPlayer for RecordingAudio {
  fn set_source(&self, source: &AudioRef) {
    self.events.lock().unwrap().push(AudioEvent::Source(source.to_string()));
  }
  fn seek(&self, _position_seconds: f64) {
    self.events.lock().unwrap().push(AudioEvent::Seek);
  }
  fn play(&self) {
    self.events.lock().unwrap().push(AudioEvent::Play);
  }
  fn pause(&self) {
    self.events.lock().unwrap().push(AudioEvent::Pause);
  }
  fn positions(&self) -> watch::Receiver<f64> {
    self.position.subscribe()
  }
}

#[derive(Default)]
struct CountingBoard {
  names: Mutex<HashSet<String>>,
  appends: AtomicU32,
}

#[async_trait]
impl Leaderboard for CountingBoard {
  async fn name_exists(&self, name: &DisplayName) -> Result<bool, LeaderboardError> {
    Ok(self.names.lock().unwrap().contains(name.as_str()))
  }

  async fn append(&self, record: &ScoreRecord) -> Result<(), LeaderboardError> {
    self.appends.fetch_add(1, Ordering::SeqCst);
    self.names.lock().unwrap().insert(record.display_name.to_string());
    Ok(())
  }
}

#[derive(Default)]
struct RecordingObserver {
  rounds: Mutex<Vec<RoundView>>,
  endings: Mutex<Vec<(EndReason, i64)>>,
  progress: Mutex<Vec<SnippetProgress>>,
  ticks: AtomicU32,
}

impl MatchObserver for RecordingObserver {
  fn round_started(&self, round: &RoundView) {
    self.rounds.lock().unwrap().push(*round);
  }
  fn tick(&self, _time_remaining_seconds: Option<u32>, _elapsed_seconds: u32) {
    self.ticks.fetch_add(1, Ordering::SeqCst);
  }
  fn progress(&self, progress: SnippetProgress) {
    self.progress.lock().unwrap().push(progress);
  }
  fn match_ended(&self, reason: EndReason, final_score: i64) {
    self.endings.lock().unwrap().push((reason, final_score));
  }
}

type Runtime = MatchRuntime<RecordingAudio, CountingBoard, RecordingObserver>;

struct Harness {
  runtime: Runtime,
  audio: Arc<RecordingAudio>,
  board: Arc<CountingBoard>,
  observer: Arc<RecordingObserver>,
}

fn catalog(n: u32) -> Arc<Catalog> {
  Arc::new(
    Catalog::new(
      (1..=n).map(|i| Song::new(i, format!("Title {i}"), format!("Artist {i}"), AudioRef::new(format!("songs/{i}.mp3")))).collect(),
    )
    .unwrap(),
  )
}

fn harness(config: MatchConfig, songs: u32, board: CountingBoard) -> Harness {
  let audio = Arc::new(RecordingAudio::default());
  let board = Arc::new(board);
  let observer = Arc::new(RecordingObserver::default());
  let deps = MatchDeps {
    audio: Arc::clone(&audio),
    gate: SubmissionGate::from_shared(Arc::clone(&board)),
    observer: Arc::clone(&observer),
  };

  let runtime = MatchRuntime::start_with_rng(
    config,
    catalog(songs),
    DisplayName::parse("alice").unwrap(),
    StdRng::seed_from_u64(3),
    deps,
  )
  .unwrap();

  Harness { runtime, audio, board, observer }
}

fn current_song(h: &Harness) -> SongId {
  // The runtime never exposes the answer; the loaded audio source gives it away.
  let events = h.audio.events.lock().unwrap();
  let source = events
    .iter()
    .rev()
    .find_map(|e| match e {
      AudioEvent::Source(s) => Some(s.clone()),
      _ => None,
    })
    .unwrap();
  let raw = source.trim_start_matches("songs/").trim_end_matches(".mp3");
  SongId::new(raw.parse().unwrap())
}

fn wrong_song(h: &Harness) -> SongId {
  let right = current_song(h);
  if right == SongId::new(1) { SongId::new(2) } else { SongId::new(1) }
}

fn answer_correctly(h: &Harness) {
  assert!(h.runtime.select(current_song(h)));
  assert!(h.runtime.guess().unwrap().correct);
}

#[tokio::test(start_paused = true)]
async fn two_skips_then_correct_guess_scores_six() {
  let h = harness(MatchConfig { skips_allowed: 3, ..MatchConfig::default() }, 5, CountingBoard::default());

  assert_eq!(h.runtime.skip(), Some(5));
  assert_eq!(h.runtime.skip(), Some(7));
  answer_correctly(&h);

  let snapshot = h.runtime.snapshot();
  assert_eq!(snapshot.score, 6);
  assert_eq!(snapshot.round_number, 1);
  assert_eq!(snapshot.songs_played, 1);
}

#[tokio::test(start_paused = true)]
async fn timer_expiry_ends_match_without_any_round() {
  let h = harness(MatchConfig { match_time_limit_seconds: Some(10), ..MatchConfig::default() }, 5, CountingBoard::default());

  sleep(Duration::from_millis(9_500)).await;
  assert_eq!(h.runtime.snapshot().ended, None);
  assert!(!h.runtime.controls().submit_score);

  sleep(Duration::from_secs(1)).await;
  let snapshot = h.runtime.snapshot();
  assert_eq!(snapshot.ended, Some(EndReason::TimeUp));
  assert_eq!(snapshot.time_remaining_seconds, Some(0));
  assert_eq!(snapshot.round_number, 1);
  assert!(h.runtime.controls().submit_score);
  assert!(!h.runtime.is_timer_running());

  sleep(Duration::from_secs(30)).await;
  assert_eq!(h.runtime.snapshot().elapsed_seconds, 10);
  assert_eq!(h.observer.endings.lock().unwrap().as_slice(), &[(EndReason::TimeUp, 0)]);
}

#[tokio::test(start_paused = true)]
async fn expiry_wins_over_a_pending_guess_and_stops_audio() {
  let h = harness(MatchConfig { match_time_limit_seconds: Some(4), ..MatchConfig::default() }, 5, CountingBoard::default());

  sleep(Duration::from_millis(2_500)).await;
  assert!(h.runtime.skip().is_some());
  assert_eq!(h.runtime.play(), Some(5));
  assert!(h.runtime.select(current_song(&h)));

  sleep(Duration::from_secs(2)).await;
  assert_eq!(h.runtime.snapshot().ended, Some(EndReason::TimeUp));
  assert!(!h.runtime.has_pending_snippet_stop());
  assert_eq!(h.audio.last(), Some(AudioEvent::Pause));

  assert_eq!(h.runtime.guess(), None);
  assert_eq!(h.runtime.skip(), None);
  assert_eq!(h.runtime.next_round(), None);
  assert_eq!(h.runtime.play(), None);
  assert_eq!(h.runtime.snapshot().score, 0);
}

#[tokio::test(start_paused = true)]
async fn snippet_auto_stops_and_replay_restarts_it() {
  let h = harness(MatchConfig::default(), 5, CountingBoard::default());

  assert_eq!(h.runtime.play(), Some(3));
  sleep(Duration::from_secs(2)).await;
  assert_eq!(h.audio.last(), Some(AudioEvent::Play));

  assert_eq!(h.runtime.play(), Some(3));
  sleep(Duration::from_secs(2)).await;
  assert_eq!(h.audio.last(), Some(AudioEvent::Play));

  sleep(Duration::from_millis(1_500)).await;
  assert_eq!(h.audio.last(), Some(AudioEvent::Pause));
}

#[tokio::test(start_paused = true)]
async fn player_position_updates_drive_snippet_progress() {
  let h = harness(MatchConfig::default(), 5, CountingBoard::default());
  assert_eq!(h.runtime.play(), Some(3));

  h.audio.position.send_replace(1.5);
  sleep(Duration::from_millis(100)).await;
  h.audio.position.send_replace(7.0);
  sleep(Duration::from_millis(100)).await;

  let seen = h.observer.progress.lock().unwrap().clone();
  assert_eq!(
    seen,
    vec![
      SnippetProgress { elapsed_seconds: 1.5, total_seconds: 3.0 },
      SnippetProgress { elapsed_seconds: 3.0, total_seconds: 3.0 },
    ]
  );
}

#[tokio::test(start_paused = true)]
async fn guess_stops_playback_and_reveals_answer() {
  let h = harness(MatchConfig::default(), 5, CountingBoard::default());

  h.runtime.play();
  assert!(h.runtime.select(wrong_song(&h)));
  let outcome = h.runtime.guess().unwrap();

  assert!(!outcome.correct);
  assert_eq!(outcome.points_awarded, 0);
  assert_eq!(outcome.answer.id, current_song(&h));
  assert!(!h.runtime.has_pending_snippet_stop());
  assert_eq!(h.audio.last(), Some(AudioEvent::Pause));
  assert!(h.runtime.controls().next_round);
}

#[tokio::test(start_paused = true)]
async fn search_clears_the_selection() {
  let h = harness(MatchConfig::default(), 5, CountingBoard::default());

  assert!(h.runtime.select(current_song(&h)));
  assert!(h.runtime.controls().submit_guess);

  let hits = h.runtime.search("title 3");
  assert_eq!(hits.len(), 1);
  assert!(!h.runtime.controls().submit_guess);
  assert_eq!(h.runtime.guess(), None);
}

#[tokio::test(start_paused = true)]
async fn exhaustion_ends_match_and_cancels_timer() {
  let h = harness(MatchConfig::default(), 3, CountingBoard::default());

  for round in 1..=3 {
    answer_correctly(&h);
    let advance = h.runtime.next_round().unwrap();
    if round < 3 {
      assert!(matches!(advance, RoundAdvance::Started(v) if v.round_number == round + 1));
    } else {
      assert_eq!(advance, RoundAdvance::Ended(EndReason::Exhausted));
    }
  }

  assert!(!h.runtime.is_timer_running());
  assert_eq!(h.audio.sources(), 3);
  assert_eq!(h.observer.rounds.lock().unwrap().len(), 3);

  let elapsed = h.runtime.snapshot().elapsed_seconds;
  sleep(Duration::from_secs(20)).await;
  assert_eq!(h.runtime.snapshot().elapsed_seconds, elapsed);
  assert_eq!(h.observer.ticks.load(Ordering::SeqCst), 0);
  assert_eq!(h.observer.endings.lock().unwrap().as_slice(), &[(EndReason::Exhausted, 30)]);
}

#[tokio::test(start_paused = true)]
async fn submitting_before_the_end_is_refused() {
  let h = harness(MatchConfig::default(), 3, CountingBoard::default());
  assert_eq!(h.runtime.submit_score().await, Err(SubmitError::MatchInProgress));
  assert_eq!(h.runtime.score_record(), None);
}

#[tokio::test(start_paused = true)]
async fn double_click_on_submit_writes_once() {
  let h = harness(MatchConfig { match_time_limit_seconds: Some(2), ..MatchConfig::default() }, 3, CountingBoard::default());
  sleep(Duration::from_millis(2_500)).await;

  let (first, second) = tokio::join!(h.runtime.submit_score(), h.runtime.submit_score());

  let ack = first.unwrap();
  assert_eq!(ack.record.time_taken_seconds, 2);
  assert_eq!(second, Err(SubmitError::Disabled));
  assert_eq!(h.board.appends.load(Ordering::SeqCst), 1);
  assert!(!h.runtime.controls().submit_score);
  assert_eq!(h.runtime.submit_score().await, Err(SubmitError::Disabled));
}

#[tokio::test(start_paused = true)]
async fn taken_name_is_rejected_then_rename_succeeds() {
  let board = CountingBoard::default();
  board.names.lock().unwrap().insert("alice".into());
  let h = harness(MatchConfig { match_time_limit_seconds: Some(1), ..MatchConfig::default() }, 3, board);
  sleep(Duration::from_millis(1_500)).await;

  assert_eq!(h.runtime.submit_score().await, Err(SubmitError::Rejected("alice".into())));
  assert_eq!(h.board.appends.load(Ordering::SeqCst), 0);
  assert!(h.runtime.controls().submit_score);

  assert!(h.runtime.rename_player(DisplayName::parse("alice2").unwrap()));
  let ack = h.runtime.submit_score().await.unwrap();
  assert_eq!(ack.record.display_name.as_str(), "alice2");
  assert!(!h.runtime.rename_player(DisplayName::parse("alice3").unwrap()));
}

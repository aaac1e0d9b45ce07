use std::path::Path;

use snipquiz_catalog::CatalogConfig;
use snipquiz_core::domain::{DisplayName, EndReason, MatchConfig};
use snipquiz_core::services::{RoundAdvance, SubmitError};
use snipquiz_leaderboard::LeaderboardConfig;
use snipquiz_lib::{AppSettings, QuizApp, QuizRuntime};
use tempfile::tempdir;

const SONGS: &str = r#"[
  { "id": 1, "title": "Blue Monday", "artist": "New Order", "audioPath": "audio/1.mp3" },
  { "id": 2, "title": "Karma Police", "artist": "Radiohead", "audioPath": "audio/2.mp3" },
  { "id": 3, "title": "Hyperballad", "artist": "Bjork", "audioPath": "audio/3.mp3" }
]"#;

fn settings_in(dir: &Path) -> AppSettings {
  let catalog = dir.join("songs.json");
  std::fs::write(&catalog, SONGS).unwrap();

  AppSettings {
    match_rules: MatchConfig::default(),
    catalog: CatalogConfig { path: catalog },
    leaderboard: LeaderboardConfig::File { path: dir.join("scores.json") },
  }
}

/// Guesses the first listed candidate every round until the catalog runs out.
fn play_to_the_end(runtime: &QuizRuntime) -> EndReason {
  loop {
    let first = runtime.search("").into_iter().next().unwrap();
    assert!(runtime.select(first.id));
    runtime.guess().unwrap();

    match runtime.next_round().unwrap() {
      RoundAdvance::Started(_) => continue,
      RoundAdvance::Ended(reason) => return reason,
    }
  }
}

#[tokio::test]
async fn full_match_is_played_and_submitted_once() {
  let dir = tempdir().unwrap();
  let app = QuizApp::from_settings(settings_in(dir.path())).await.unwrap();
  assert_eq!(app.catalog().len(), 3);

  let runtime = app.start_match("  zoe ").unwrap();
  assert_eq!(play_to_the_end(&runtime), EndReason::Exhausted);
  assert_eq!(runtime.snapshot().songs_played, 3);
  assert!(!runtime.is_timer_running());

  let ack = runtime.submit_score().await.unwrap();
  assert_eq!(ack.record.display_name.as_str(), "zoe");
  assert_eq!(runtime.submit_score().await, Err(SubmitError::Disabled));

  let raw = std::fs::read_to_string(dir.path().join("scores.json")).unwrap();
  assert!(raw.contains("\"Username\": \"zoe\""));
}

#[tokio::test]
async fn second_match_with_a_taken_name_must_rename() {
  let dir = tempdir().unwrap();
  let app = QuizApp::from_settings(settings_in(dir.path())).await.unwrap();

  let first = app.start_match("zoe").unwrap();
  play_to_the_end(&first);
  first.submit_score().await.unwrap();

  let second = app.start_match("zoe").unwrap();
  play_to_the_end(&second);
  assert_eq!(second.submit_score().await, Err(SubmitError::Rejected("zoe".into())));

  assert!(second.rename_player(DisplayName::parse("zoe2").unwrap()));
  second.submit_score().await.unwrap();
  assert!(!second.rename_player(DisplayName::parse("zoe3").unwrap()));
}

#[tokio::test]
async fn missing_catalog_is_fatal() {
  let dir = tempdir().unwrap();
  let mut settings = settings_in(dir.path());
  settings.catalog.path = dir.path().join("absent.json");

  let err = QuizApp::from_settings(settings).await.err().unwrap();
  assert!(err.to_string().contains("catalog"));
}

#[tokio::test]
async fn blank_name_cannot_start_a_match() {
  let dir = tempdir().unwrap();
  let app = QuizApp::from_settings(settings_in(dir.path())).await.unwrap();

  assert!(app.start_match("   ").is_err());
}

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

use snipquiz_core::domain::{DisplayName, ScoreRecord};
use snipquiz_core::ports::leaderboard::{Leaderboard, LeaderboardError};

/// One document of the scores collection, as persisted on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredScore {
  #[serde(rename = "Username")]
  pub username: String,
  #[serde(rename = "Score")]
  pub score: i64,
  #[serde(rename = "Time Taken")]
  pub time_taken: u32,
  /// Assigned by the store at insert time, seconds since the unix epoch.
  #[serde(rename = "Timestamp")]
  pub timestamp: u64,
}

/// Document-store leaderboard backed by a single JSON file.
///
/// Every read-modify-write runs under one async lock, so `append` can refuse
/// a name that is already present. The lock is per instance: two instances
/// pointed at the same file do not see each other's critical sections.
pub struct FileLeaderboard {
  path: PathBuf,
  lock: Mutex<()>,
}

impl FileLeaderboard {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into(), lock: Mutex::new(()) }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Snapshot of every stored score, in insertion order.
  pub async fn entries(&self) -> Result<Vec<StoredScore>, LeaderboardError> {
    let _guard = self.lock.lock().await;
    self.read_entries().await
  }

  async fn read_entries(&self) -> Result<Vec<StoredScore>, LeaderboardError> {
    let raw = snipquiz_fs::read_to_string_opt(&self.path)
      .await
      .map_err(|e| LeaderboardError::Unavailable(format!("{}: {e}", self.path.display())))?;

    match raw {
      None => Ok(Vec::new()),
      Some(raw) if raw.trim().is_empty() => Ok(Vec::new()),
      Some(raw) => serde_json::from_str(&raw)
        .map_err(|e| LeaderboardError::Unavailable(format!("corrupt scores file {}: {e}", self.path.display()))),
    }
  }

  async fn write_entries(&self, entries: &[StoredScore]) -> Result<(), LeaderboardError> {
    let json =
      serde_json::to_string_pretty(entries).map_err(|e| LeaderboardError::Unavailable(format!("encode scores: {e}")))?;

    if let Some(parent) = self.path.parent() {
      tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| LeaderboardError::Unavailable(format!("{}: {e}", parent.display())))?;
    }

    snipquiz_fs::atomic_write_str_async(&self.path, &json)
      .await
      .map_err(|e| LeaderboardError::Unavailable(format!("{}: {e}", self.path.display())))
  }
}

fn unix_now() -> u64 {
  SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0)
}

#[async_trait]
impl Leaderboard for FileLeaderboard {
  async fn name_exists(&self, name: &DisplayName) -> Result<bool, LeaderboardError> {
    let _guard = self.lock.lock().await;
    let entries = self.read_entries().await?;
    Ok(entries.iter().any(|e| e.username == name.as_str()))
  }

  async fn append(&self, record: &ScoreRecord) -> Result<(), LeaderboardError> {
    let _guard = self.lock.lock().await;
    let mut entries = self.read_entries().await?;

    if entries.iter().any(|e| e.username == record.display_name.as_str()) {
      tracing::warn!(name = %record.display_name, "conditional insert refused: name already stored");
      return Err(LeaderboardError::NameTaken(record.display_name.to_string()));
    }

    entries.push(StoredScore {
      username: record.display_name.to_string(),
      score: record.final_score,
      time_taken: record.time_taken_seconds,
      timestamp: unix_now(),
    });

    self.write_entries(&entries).await?;
    tracing::info!(
      name = %record.display_name,
      score = record.final_score,
      total = entries.len(),
      "score stored"
    );
    Ok(())
  }
}

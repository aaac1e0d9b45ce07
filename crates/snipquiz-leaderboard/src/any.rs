use async_trait::async_trait;

use snipquiz_core::domain::{DisplayName, ScoreRecord};
use snipquiz_core::ports::leaderboard::{Leaderboard, LeaderboardError};

use crate::config::LeaderboardConfig;
use crate::file::FileLeaderboard;
use crate::http::TabularHttpLeaderboard;

/// Backend elegido en tiempo de arranque según `[leaderboard]`.
pub enum AnyLeaderboard {
  File(FileLeaderboard),
  Http(TabularHttpLeaderboard),
}

impl AnyLeaderboard {
  pub fn from_config(cfg: &LeaderboardConfig) -> Result<Self, LeaderboardError> {
    match cfg {
      LeaderboardConfig::File { path } => {
        tracing::info!(path = %path.display(), "using file leaderboard");
        Ok(AnyLeaderboard::File(FileLeaderboard::new(path.clone())))
      }
      LeaderboardConfig::Http { base_url, table, token_env, timeout_seconds } => {
        let board = TabularHttpLeaderboard::from_env(
          base_url,
          table,
          token_env,
          std::time::Duration::from_secs(*timeout_seconds),
        )?;
        tracing::info!(endpoint = board.endpoint(), "using remote table leaderboard");
        Ok(AnyLeaderboard::Http(board))
      }
    }
  }
}

#[async_trait]
impl Leaderboard for AnyLeaderboard {
  async fn name_exists(&self, name: &DisplayName) -> Result<bool, LeaderboardError> {
    match self {
      AnyLeaderboard::File(b) => b.name_exists(name).await,
      AnyLeaderboard::Http(b) => b.name_exists(name).await,
    }
  }

  async fn append(&self, record: &ScoreRecord) -> Result<(), LeaderboardError> {
    match self {
      AnyLeaderboard::File(b) => b.append(record).await,
      AnyLeaderboard::Http(b) => b.append(record).await,
    }
  }
}

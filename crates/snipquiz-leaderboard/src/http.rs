use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use snipquiz_core::domain::{DisplayName, ScoreRecord};
use snipquiz_core::ports::leaderboard::{Leaderboard, LeaderboardError};

/// Leaderboard kept in a remote table service (`GET`/`POST {base_url}/{table}`).
///
/// The service has no conditional insert, so the gap between `name_exists`
/// and `append` stays open: two sessions racing with the same name can both
/// land a row. Accepted for cooperative use.
#[derive(Clone)]
pub struct TabularHttpLeaderboard {
  endpoint: String,
  token: String,
  agent: ureq::Agent,
}

#[derive(Debug, Deserialize)]
struct RecordsPage {
  #[serde(default)]
  records: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct NewRow<'a> {
  fields: RowFields<'a>,
}

#[derive(Debug, Serialize)]
struct RowFields<'a> {
  #[serde(rename = "Username")]
  username: &'a str,
  #[serde(rename = "Score")]
  score: i64,
  #[serde(rename = "Time Taken")]
  time_taken: u32,
}

impl TabularHttpLeaderboard {
  pub fn new(base_url: &str, table: &str, token: impl Into<String>, timeout: Duration) -> Self {
    let agent = ureq::Agent::config_builder().timeout_global(Some(timeout)).build().into();
    Self { endpoint: format!("{}/{}", base_url.trim_end_matches('/'), table), token: token.into(), agent }
  }

  /// Reads the bearer token from `token_env`.
  pub fn from_env(base_url: &str, table: &str, token_env: &str, timeout: Duration) -> Result<Self, LeaderboardError> {
    let token = std::env::var(token_env)
      .map_err(|_| LeaderboardError::Unavailable(format!("environment variable {token_env} is not set")))?;
    Ok(Self::new(base_url, table, token, timeout))
  }

  pub fn endpoint(&self) -> &str {
    &self.endpoint
  }

  fn bearer(&self) -> String {
    format!("Bearer {}", self.token)
  }
}

/// Formula that matches rows whose `Username` equals `name` exactly.
pub(crate) fn name_formula(name: &str) -> String {
  let escaped = name.replace('\\', "\\\\").replace('\'', "\\'");
  format!("{{Username}}='{escaped}'")
}

/// Query string of the existence lookup: one matching row is enough.
fn lookup_query(name: &str) -> [(&'static str, String); 2] {
  [("filterByFormula", name_formula(name)), ("maxRecords", "1".to_string())]
}

fn new_row(record: &ScoreRecord) -> NewRow<'_> {
  NewRow {
    fields: RowFields {
      username: record.display_name.as_str(),
      score: record.final_score,
      time_taken: record.time_taken_seconds,
    },
  }
}

fn unavailable(e: impl std::fmt::Display) -> LeaderboardError {
  LeaderboardError::Unavailable(e.to_string())
}

#[async_trait]
impl Leaderboard for TabularHttpLeaderboard {
  async fn name_exists(&self, name: &DisplayName) -> Result<bool, LeaderboardError> {
    let agent = self.agent.clone();
    let url = self.endpoint.clone();
    let auth = self.bearer();
    let query = lookup_query(name.as_str());

    let page = tokio::task::spawn_blocking(move || -> Result<RecordsPage, ureq::Error> {
      let response = agent.get(&url).header("Authorization", &auth).query_pairs(query).call()?;
      response.into_body().read_json::<RecordsPage>()
    })
    .await
    .map_err(unavailable)?
    .map_err(unavailable)?;

    let taken = !page.records.is_empty();
    tracing::debug!(name = %name, taken, "remote name lookup");
    Ok(taken)
  }

  async fn append(&self, record: &ScoreRecord) -> Result<(), LeaderboardError> {
    let agent = self.agent.clone();
    let url = self.endpoint.clone();
    let auth = self.bearer();
    let body = serde_json::to_value(new_row(record)).map_err(unavailable)?;

    tokio::task::spawn_blocking(move || -> Result<(), ureq::Error> {
      agent.post(&url).header("Authorization", &auth).send_json(&body)?;
      Ok(())
    })
    .await
    .map_err(unavailable)?
    .map_err(unavailable)?;

    tracing::info!(name = %record.display_name, score = record.final_score, "score posted");
    Ok(())
  }
}

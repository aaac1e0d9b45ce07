use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::CoreError;

/// Nombre visible del jugador en el leaderboard. Nunca vacío; se guarda sin espacios
/// sobrantes a los lados.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
  pub fn parse(raw: &str) -> Result<Self, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
      return Err(CoreError::InvalidName("display name must not be empty".into()));
    }
    Ok(DisplayName(trimmed.to_string()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl TryFrom<String> for DisplayName {
  type Error = CoreError;

  fn try_from(raw: String) -> Result<Self, Self::Error> {
    DisplayName::parse(&raw)
  }
}

impl From<DisplayName> for String {
  fn from(name: DisplayName) -> Self {
    name.0
  }
}

impl fmt::Display for DisplayName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// Registro que se envía al leaderboard. Uno por partida como máximo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
  pub display_name: DisplayName,
  pub final_score: i64,
  pub time_taken_seconds: u32,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn names_are_trimmed_and_must_not_be_blank() {
    assert_eq!(DisplayName::parse("  alice ").unwrap().as_str(), "alice");
    assert!(DisplayName::parse("   ").is_err());
    assert!(DisplayName::parse("").is_err());
  }
}

use snipquiz_catalog::CatalogConfig;
use snipquiz_config::{CONFIG_BACKEND, ConfigBackend, ConfigError};
use snipquiz_core::domain::MatchConfig;
use snipquiz_leaderboard::LeaderboardConfig;

/// All configuration the app needs to start a match, one field per TOML section.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
  pub match_rules: MatchConfig,
  pub catalog: CatalogConfig,
  pub leaderboard: LeaderboardConfig,
}

impl AppSettings {
  /// Loads from the platform config file and writes the effective values back.
  pub fn load() -> Result<Self, ConfigError> {
    Self::load_from(&*CONFIG_BACKEND)
  }

  /// Missing sections fall back to defaults; the result is saved so the file
  /// documents every knob after the first run.
  pub fn load_from<B: ConfigBackend>(backend: &B) -> Result<Self, ConfigError> {
    let match_rules: MatchConfig = backend.load_section_or_default("match")?;
    match_rules.validate().map_err(|e| ConfigError::Other(e.to_string()))?;

    let catalog = CatalogConfig::load_from(backend)?;
    let leaderboard = LeaderboardConfig::load_from(backend)?;

    backend.save_section("match", &match_rules)?;
    backend.save_section("catalog", &catalog)?;
    backend.save_section("leaderboard", &leaderboard)?;

    Ok(Self { match_rules, catalog, leaderboard })
  }
}

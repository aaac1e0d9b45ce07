mod config;
pub mod infrastructure;

use std::sync::Arc;

use snipquiz_catalog::{JsonCatalog, load_catalog};
use snipquiz_core::domain::{Catalog, DisplayName, MatchConfig};
use snipquiz_core::services::{MatchDeps, MatchRuntime, SubmissionGate};
use snipquiz_leaderboard::AnyLeaderboard;
use tracing_subscriber::EnvFilter;

pub use crate::config::AppSettings;
use infrastructure::audio::HeadlessPlayer;
use infrastructure::observer::TracingObserver;

/// Type alias to simplify the generic signature of the runtime.
pub type QuizRuntime = MatchRuntime<HeadlessPlayer, AnyLeaderboard, TracingObserver>;

/// Installs the global fmt subscriber. `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() -> anyhow::Result<()> {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .try_init()
    .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

/// Application state shared by every match: rules, catalog and leaderboard.
///
/// The catalog is loaded once and read-only afterwards. The leaderboard is
/// shared so that the file backend's conditional insert covers every match
/// started from this process.
pub struct QuizApp {
  rules: MatchConfig,
  catalog: Arc<Catalog>,
  leaderboard: Arc<AnyLeaderboard>,
}

impl QuizApp {
  /// Loads config from the platform directory and wires the adapters.
  pub async fn bootstrap() -> anyhow::Result<Self> {
    let settings = AppSettings::load()?;
    Self::from_settings(settings).await
  }

  pub async fn from_settings(settings: AppSettings) -> anyhow::Result<Self> {
    // --- Dependency Injection Phase ---

    // 1. Catalog Adapter (JSON file)
    // A missing or malformed list is fatal: no match can start without songs.
    let source = JsonCatalog::new(&settings.catalog.path);
    let catalog = load_catalog(&source).await?;

    // 2. Leaderboard Adapter (file or remote table)
    let leaderboard = AnyLeaderboard::from_config(&settings.leaderboard)?;

    Ok(Self { rules: settings.match_rules, catalog: Arc::new(catalog), leaderboard: Arc::new(leaderboard) })
  }

  pub fn rules(&self) -> &MatchConfig {
    &self.rules
  }

  pub fn catalog(&self) -> &Arc<Catalog> {
    &self.catalog
  }

  pub fn leaderboard(&self) -> &Arc<AnyLeaderboard> {
    &self.leaderboard
  }

  /// Starts a match for `player_name`. Must be called inside a Tokio runtime.
  pub fn start_match(&self, player_name: &str) -> anyhow::Result<QuizRuntime> {
    let player = DisplayName::parse(player_name)?;

    // Output ports: headless audio and a log-backed observer.
    let deps = MatchDeps {
      audio: Arc::new(HeadlessPlayer::new()),
      gate: SubmissionGate::from_shared(Arc::clone(&self.leaderboard)),
      observer: Arc::new(TracingObserver::new()),
    };

    let runtime = MatchRuntime::start(self.rules.clone(), Arc::clone(&self.catalog), player, deps)?;
    tracing::info!(player = player_name.trim(), songs = self.catalog.len(), "match started");
    Ok(runtime)
  }
}

pub mod audio;
pub mod catalog;
pub mod leaderboard;
pub mod observer;

pub use audio::AudioPlayer;
pub use catalog::{CatalogError, CatalogSource};
pub use leaderboard::{Leaderboard, LeaderboardError};
pub use observer::{MatchObserver, NoopObserver};

pub mod any;
pub mod config;
pub mod file;
pub mod http;

pub use any::AnyLeaderboard;
pub use config::LeaderboardConfig;
pub use file::{FileLeaderboard, StoredScore};
pub use http::TabularHttpLeaderboard;

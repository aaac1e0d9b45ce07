pub mod catalog;
pub mod clock;
pub mod config;
pub mod ids;
pub mod match_state;
pub mod player;
pub mod round;
pub mod song;

pub use catalog::Catalog;
pub use config::{MatchConfig, SelectionMode};
pub use ids::SongId;
pub use match_state::{EndReason, MatchState, PlayedSet};
pub use player::{DisplayName, ScoreRecord};
pub use round::{Outcome, RoundPhase, RoundState, RoundView};
pub use song::{AudioRef, Song};

pub mod escalator;
pub mod evaluator;
pub mod runtime;
pub mod selector;
pub mod session;
pub mod snippet;
pub mod submission;
pub mod timer;

pub use runtime::{MatchDeps, MatchRuntime, MatchSnapshot};
pub use session::{Controls, MatchSession, RoundAdvance, TickOutcome};
pub use snippet::{SnippetController, SnippetProgress};
pub use submission::{Ack, AttemptToken, SubmissionGate, SubmitError};
pub use timer::MatchTimer;

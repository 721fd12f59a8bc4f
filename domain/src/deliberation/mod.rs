//! Round state machine types: session state, meta-critic output, trace.

pub mod hints;
pub mod meta;
pub mod outcome;
pub mod record;
pub mod state;
pub mod status;

pub use hints::HintSnapshot;
pub use meta::{MetaEvaluation, MetaScores, StopLabel};
pub use outcome::DeliberationOutcome;
pub use record::{RoundRecord, Trace};
pub use state::{DEFAULT_GOAL, Message, OrchestratorState, Role};
pub use status::SessionStatus;

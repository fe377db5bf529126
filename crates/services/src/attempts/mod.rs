//! Attempt lifecycle: presentation order, state machine, and persistence.

pub mod plan;
pub mod progress;
pub mod session;
pub mod workflow;

pub use plan::{AttemptBuilder, AttemptPlan};
pub use progress::{AttemptProgress, format_clock};
pub use session::PlayerSession;
pub use workflow::{AttemptOutcome, AttemptService};

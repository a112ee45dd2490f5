//! Validation and session core for the launch-planning wizard.
//!
//! Every domain computation happens on the backend; this crate owns what the
//! client decides on its own: input checks, the order in which steps unlock,
//! and the JSON shapes exchanged with the backend.

pub mod api;
pub mod mission;
pub mod prelude;
pub mod session;
pub mod telemetry;

pub use prelude::{WizardError, WizardResult};
pub use session::{MissionFlow, MissionSession, WizardStage};

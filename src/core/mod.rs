//! Core types - pure abstractions shared across the codebase.

mod category;
mod phase;
mod state;

pub use category::TargetKind;
pub use phase::{IllegalTransition, Phase, PhaseTracker};
pub use state::{is_shutdown, setup_shutdown_handler};

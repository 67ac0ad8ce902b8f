//! List Layer
//!
//! The client-side list state machine and its derived, render-ready view.

mod snapshot;
mod state;

pub use snapshot::{FilterChip, ListSnapshot};
pub use state::{FetchSpec, ListState, LoadPhase, MergeMode};

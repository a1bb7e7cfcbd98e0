//! Application state for an audit session.
//!
//! One [`ScanController`] holds the current [`AnalysisPhase`]; the CLI and
//! the web page both render from it.

mod controller;
mod phase;

pub use controller::{PhaseTimings, PhaseWatcher, ScanController, ScanError, ScanTicket};
pub use phase::{AnalysisPhase, PhaseKind, PhaseSnapshot, GENERIC_FAILURE_MESSAGE};

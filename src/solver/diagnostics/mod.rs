//! Diagnostic output.
//!
//! - [`DiagnosticLog`]: per-node matrix snapshots of the LSQ precomputation

mod diagnostics;

pub use diagnostics::{DEFAULT_NODE_THRESHOLD, DiagnosticLog, format_matrix};

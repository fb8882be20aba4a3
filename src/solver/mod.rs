//! Node-centered solver components.
//!
//! # Submodules
//!
//! - [`core`]: Nodal solution and gradient containers
//! - [`state`]: Euler nodal solution with primitive/conservative sync
//! - [`diagnostics`]: Diagnostic snapshots of the LSQ precomputation

pub mod core;
pub mod diagnostics;
pub mod state;

pub use self::core::{NodalField, NodalGradient};
pub use diagnostics::DiagnosticLog;
pub use state::{EulerSolution, NodalSolution};

//! Core solution containers for node-centered discretizations.
//!
//! - [`NodalField`]: N variables per node, interleaved
//! - [`NodalGradient`]: (∂/∂x, ∂/∂y) of N variables per node

mod nodal_solution;

pub use nodal_solution::{NodalField, NodalGradient};

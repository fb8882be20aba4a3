//! Physical state types.
//!
//! - [`NodalSolution`], [`EulerSolution`]: nodal w, U and their gradients

mod euler_2d;

pub use euler_2d::{EulerSolution, NodalSolution};

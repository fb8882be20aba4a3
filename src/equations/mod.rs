//! Governing equations.
//!
//! Variable conversions of the 2D Euler equations.

mod euler_2d;

pub use euler_2d::{Euler2D, NQ};

//! Least-squares gradient reconstruction at the nodes of an unstructured grid.
//!
//! Two reconstructions are provided:
//! - Linear LSQ over the direct neighbors of each node (2x2 normal equations)
//! - Two-step quadratic LSQ over the neighbors of the neighbors (5x5 normal
//!   equations in first and second derivatives)
//!
//! Coefficients are precomputed once per grid with [`LsqCoefficients`] and
//! applied to nodal fields with [`LsqGradient`]. The [`verification`]
//! module checks both reconstructions against analytic fields.

mod coefficients;
mod config;
pub mod dense;
mod error;
mod evaluator;
mod linear;
mod quadratic;
pub mod verification;
mod weight;

pub use coefficients::{LsqCoefficients, StencilSet};
pub use config::{
    DEFAULT_WEIGHT_EXPONENT, GradientType, GradientWeight, LsqConfig, MAX_TYPICAL_EXPONENT,
};
pub use error::{ConfigError, DegenerateWeight, LsqError};
pub use evaluator::{FieldKind, LsqGradient};
pub use linear::{LINEAR_MIN_NEIGHBORS, LinearStencil};
pub use quadratic::{NeighborOffsets, QUADRATIC_MIN_PAIRS, QuadraticStencil, StencilPair};
pub use verification::{
    AnalyticField, ComponentError, LinearField, QuadraticField, VerificationReport,
    check_lsq_coefficients, verify_gradient,
};
pub use weight::{MIN_DISPLACEMENT, MIN_WEIGHT_DENOMINATOR};

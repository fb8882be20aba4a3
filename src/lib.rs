//! # ncfv-rs
//!
//! Least-squares gradient reconstruction for node-centered finite-volume
//! solvers of the 2D Euler equations on unstructured grids.
//!
//! This crate provides:
//! - Triangle/quadrilateral grids with per-node neighbor stencils
//! - Linear (2x2) and two-step quadratic (5x5) LSQ coefficient builders
//! - Gradient evaluation of primitive or conservative nodal fields
//! - Verification against analytic linear and quadratic fields
//!
//! # Example
//!
//! ```
//! use ncfv_rs::{GradientType, LsqConfig, check_lsq_coefficients};
//! use ncfv_rs::mesh::structured;
//! use ncfv_rs::solver::DiagnosticLog;
//!
//! let grid = structured::uniform_trias(0.0, 1.0, 0.0, 1.0, 8, 8).unwrap();
//! let config = LsqConfig::new().with_gradient_type(GradientType::Quadratic2);
//! let reports = check_lsq_coefficients(&grid, &config, &DiagnosticLog::disabled()).unwrap();
//! assert!(reports.iter().all(|r| r.passes(1e-6)));
//! ```

pub mod equations;
pub mod gradient;
pub mod mesh;
pub mod solver;
pub mod types;

pub use equations::{Euler2D, NQ};
pub use gradient::{
    FieldKind, GradientType, GradientWeight, LsqCoefficients, LsqConfig, LsqError, LsqGradient,
    VerificationReport, check_lsq_coefficients,
};
pub use mesh::{Grid2D, GridError};
pub use solver::{DiagnosticLog, EulerSolution, NodalField, NodalGradient, NodalSolution};
pub use types::{EdgeIndex, ElementIndex, NodeIndex};

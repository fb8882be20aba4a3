//! Grid representation.
//!
//! Provides the node-centered grid consumed by the gradient reconstruction:
//! - Triangle/quadrilateral grid with edge-based neighbor lists
//! - Stencil-only grids built from explicit neighbor lists
//! - Structured generators for verification

mod grid2d;
pub mod structured;

pub use grid2d::{Edge, Element, ElementKind, Grid2D, GridError, Node};

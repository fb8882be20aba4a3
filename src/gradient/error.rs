//! Error types for LSQ gradient reconstruction.

use thiserror::Error;

use crate::types::NodeIndex;

use super::config::GradientType;

/// Unrecognized or invalid configuration values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid gradient_type '{0}' (expected none, linear or quadratic2)")]
    UnknownGradientType(String),

    #[error("Invalid gradient_weight '{0}' (expected none or inverse_distance)")]
    UnknownGradientWeight(String),

    #[error("Invalid gradient_weight_p {0}: exponent must be finite")]
    InvalidWeightExponent(f64),
}

/// Inverse-distance weight evaluated at (nearly) coincident points.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("distance^p = {value:e} is below {min:e} for (dx, dy) = ({dx:e}, {dy:e})")]
pub struct DegenerateWeight {
    pub dx: f64,
    pub dy: f64,
    pub value: f64,
    pub min: f64,
}

/// Errors raised while building or applying LSQ stencils.
///
/// Every variant names the node whose stencil triggered it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LsqError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A neighbor list contains the node itself.
    #[error("Node {node} lists itself as a neighbor")]
    SelfReference { node: NodeIndex },

    /// Not enough stencil points for the number of unknowns.
    #[error("Node {node}: {n_neighbors} stencil points, at least {required} required")]
    UnderDetermined {
        node: NodeIndex,
        n_neighbors: usize,
        required: usize,
    },

    /// Coincident stencil points.
    #[error(
        "Zero distance at node {node} (x, y) = ({x}, {y}): neighbor {neighbor}, (dx, dy) = ({dx:e}, {dy:e})"
    )]
    ZeroDistance {
        node: NodeIndex,
        neighbor: NodeIndex,
        x: f64,
        y: f64,
        dx: f64,
        dy: f64,
    },

    /// 2x2 normal matrix with a vanishing determinant.
    #[error("Singular 2x2 LSQ matrix at node {node}: det = {det:e}")]
    SingularLinear { node: NodeIndex, det: f64 },

    /// 5x5 normal matrix that could not be inverted reliably.
    #[error("Singular 5x5 LSQ matrix at node {node}: condition estimate = {condition:e}")]
    SingularQuadratic { node: NodeIndex, condition: f64 },

    /// Gradients requested for a reconstruction whose coefficients were not built.
    #[error("No {gradient_type} LSQ coefficients have been built")]
    MissingCoefficients { gradient_type: GradientType },

    #[error("Variable index {ivar} out of range (nq = {nq})")]
    VariableOutOfRange { ivar: usize, nq: usize },

    /// The grid changed after the coefficients were built.
    #[error("LSQ coefficients do not match the grid: expected {expected}, found {actual}")]
    StaleCoefficients { expected: usize, actual: usize },

    /// Solution storage sized for a different grid.
    #[error("Solution has {actual} nodes but the grid has {expected}")]
    SolutionSizeMismatch { expected: usize, actual: usize },
}

impl LsqError {
    /// Zero-distance error from a degenerate weight evaluation.
    pub(crate) fn zero_distance(
        node: usize,
        neighbor: usize,
        (x, y): (f64, f64),
        err: DegenerateWeight,
    ) -> Self {
        Self::ZeroDistance {
            node: NodeIndex::new(node),
            neighbor: NodeIndex::new(neighbor),
            x,
            y,
            dx: err.dx,
            dy: err.dy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_node() {
        let err = LsqError::SingularLinear {
            node: NodeIndex::new(12),
            det: 1e-20,
        };
        let msg = err.to_string();
        assert!(msg.contains("N12"), "{msg}");
        assert!(msg.contains("det"), "{msg}");
    }

    #[test]
    fn test_config_error_converts() {
        let err: LsqError = ConfigError::UnknownGradientType("cubic".into()).into();
        assert!(matches!(err, LsqError::Config(_)));
        assert!(err.to_string().contains("cubic"));
    }

    #[test]
    fn test_zero_distance_from_weight() {
        let weight_err = DegenerateWeight {
            dx: 0.0,
            dy: 1e-9,
            value: 1e-9,
            min: 1e-6,
        };
        let err = LsqError::zero_distance(3, 4, (1.0, 2.0), weight_err);
        match err {
            LsqError::ZeroDistance {
                node, neighbor, dy, ..
            } => {
                assert_eq!(node.get(), 3);
                assert_eq!(neighbor.get(), 4);
                assert_eq!(dy, 1e-9);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}

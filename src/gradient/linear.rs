//! Linear LSQ stencils (2x2 normal equations).
//!
//! For node i with direct neighbors n_1..n_k, the gradient minimizes
//!
//! Σ_k w_k² (∇u · d_k - (u_{n_k} - u_i))²,  d_k = x_{n_k} - x_i
//!
//! whose normal equations give A = Σ w² d dᵀ. The solution is linear in the
//! differences, ∇u = Σ (cx_k, cy_k) (u_{n_k} - u_i), with
//! (cx_k, cy_k) = A⁻¹ w_k² d_k.

use crate::mesh::Grid2D;
use crate::solver::DiagnosticLog;
use crate::types::NodeIndex;

use super::config::GradientWeight;
use super::dense::{Matrix2, invert_2x2, is_symmetric, matmul};
use super::error::LsqError;
use super::weight::stencil_weight;

/// Fewest direct neighbors that determine a 2D gradient.
pub const LINEAR_MIN_NEIGHBORS: usize = 2;

/// Linear LSQ coefficients of one node.
///
/// `cx[k]`, `cy[k]` belong to `neighbors[k]`, in neighbor-list order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinearStencil {
    pub neighbors: Vec<usize>,
    pub cx: Vec<f64>,
    pub cy: Vec<f64>,
}

impl LinearStencil {
    /// Reject self-references and short stencils before any assembly.
    fn check_stencil(grid: &Grid2D, i: usize) -> Result<(), LsqError> {
        let neighbors = grid.neighbors(i);
        if neighbors.contains(&i) {
            return Err(LsqError::SelfReference {
                node: NodeIndex::new(i),
            });
        }
        if neighbors.len() < LINEAR_MIN_NEIGHBORS {
            return Err(LsqError::UnderDetermined {
                node: NodeIndex::new(i),
                n_neighbors: neighbors.len(),
                required: LINEAR_MIN_NEIGHBORS,
            });
        }
        Ok(())
    }

    /// Assemble the 2x2 normal matrix `Σ w² d dᵀ` of node `i`.
    pub fn normal_matrix(
        grid: &Grid2D,
        i: usize,
        weight: &GradientWeight,
    ) -> Result<Matrix2, LsqError> {
        Self::check_stencil(grid, i)?;
        let center = grid.coords(i);

        let mut a = [[0.0; 2]; 2];
        for &n in grid.neighbors(i) {
            let (xn, yn) = grid.coords(n);
            let (dx, dy) = (xn - center.0, yn - center.1);
            let w2 = stencil_weight(weight, i, n, center, dx, dy)?;

            a[0][0] += w2 * dx * dx;
            a[0][1] += w2 * dx * dy;
            a[1][1] += w2 * dy * dy;
        }
        a[1][0] = a[0][1];

        Ok(a)
    }

    /// Build the linear stencil of node `i`.
    pub fn build(
        grid: &Grid2D,
        i: usize,
        weight: &GradientWeight,
        log: &DiagnosticLog,
    ) -> Result<Self, LsqError> {
        let a = Self::normal_matrix(grid, i, weight)?;
        debug_assert!(is_symmetric(&a), "asymmetric 2x2 normal matrix at node {i}");
        let ainv = invert_2x2(&a).map_err(|det| LsqError::SingularLinear {
            node: NodeIndex::new(i),
            det,
        })?;

        if log.wants(i) {
            log.matrix(i, "a", &a);
            log.matrix(i, "ainv", &ainv);
            log.matrix(i, "ainv * a", &matmul(&ainv, &a));
        }

        let center = grid.coords(i);
        let neighbors = grid.neighbors(i).to_vec();
        let mut cx = Vec::with_capacity(neighbors.len());
        let mut cy = Vec::with_capacity(neighbors.len());

        for &n in &neighbors {
            let (xn, yn) = grid.coords(n);
            let (dx, dy) = (xn - center.0, yn - center.1);
            let w2 = stencil_weight(weight, i, n, center, dx, dy)?;

            cx.push(ainv[0][0] * w2 * dx + ainv[0][1] * w2 * dy);
            cy.push(ainv[1][0] * w2 * dx + ainv[1][1] * w2 * dy);
        }

        Ok(Self { neighbors, cx, cy })
    }

    /// Number of stencil entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Gradient at the center from nodal values `value(node)`.
    #[inline]
    pub fn gradient(&self, center: f64, value: impl Fn(usize) -> f64) -> [f64; 2] {
        let mut grad = [0.0; 2];
        for (k, &n) in self.neighbors.iter().enumerate() {
            let da = value(n) - center;
            grad[0] += self.cx[k] * da;
            grad[1] += self.cy[k] * da;
        }
        grad
    }

    /// Whether the stencil still matches the neighbor list of node `i`.
    pub fn matches(&self, grid: &Grid2D, i: usize) -> bool {
        self.neighbors == grid.neighbors(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Center node 0 at the origin with four axis neighbors.
    fn cross() -> Grid2D {
        Grid2D::from_neighbor_lists(
            vec![(0.0, 0.0), (1.0, 0.0), (-1.0, 0.0), (0.0, 1.0), (0.0, -1.0)],
            vec![vec![1, 2, 3, 4], vec![0], vec![0], vec![0], vec![0]],
        )
        .unwrap()
    }

    #[test]
    fn test_cross_coefficients() {
        let grid = cross();
        let stencil =
            LinearStencil::build(&grid, 0, &GradientWeight::None, &DiagnosticLog::disabled())
                .unwrap();

        // A = diag(2, 2): cx = dx / 2, cy = dy / 2
        assert_eq!(stencil.cx, vec![0.5, -0.5, 0.0, 0.0]);
        assert_eq!(stencil.cy, vec![0.0, 0.0, 0.5, -0.5]);
    }

    #[test]
    fn test_linear_field_is_exact() {
        let grid = cross();
        let stencil = LinearStencil::build(
            &grid,
            0,
            &GradientWeight::InverseDistance { p: 2.0 },
            &DiagnosticLog::disabled(),
        )
        .unwrap();

        let f = |n: usize| {
            let (x, y) = grid.coords(n);
            2.0 + 3.0 * x + 5.0 * y
        };
        let grad = stencil.gradient(f(0), f);
        assert!((grad[0] - 3.0).abs() < 1e-14);
        assert!((grad[1] - 5.0).abs() < 1e-14);
    }

    #[test]
    fn test_normal_matrix_is_symmetric() {
        let grid = Grid2D::from_neighbor_lists(
            vec![(0.1, 0.2), (1.3, 0.4), (-0.7, 0.9), (0.2, -1.1)],
            vec![vec![1, 2, 3], vec![0], vec![0], vec![0]],
        )
        .unwrap();
        let a = LinearStencil::normal_matrix(&grid, 0, &GradientWeight::InverseDistance { p: 1.0 })
            .unwrap();
        assert!(is_symmetric(&a));
    }

    #[test]
    fn test_self_reference_rejected() {
        let grid = Grid2D::from_neighbor_lists(
            vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)],
            vec![vec![1, 0, 2], vec![0], vec![0]],
        )
        .unwrap();
        let result =
            LinearStencil::build(&grid, 0, &GradientWeight::None, &DiagnosticLog::disabled());
        assert!(matches!(result, Err(LsqError::SelfReference { .. })));
    }

    #[test]
    fn test_colinear_neighbors_are_singular() {
        let grid = Grid2D::from_neighbor_lists(
            vec![(0.0, 0.0), (1.0, 0.0), (-2.0, 0.0)],
            vec![vec![1, 2], vec![0], vec![0]],
        )
        .unwrap();
        let result =
            LinearStencil::build(&grid, 0, &GradientWeight::None, &DiagnosticLog::disabled());
        match result {
            Err(LsqError::SingularLinear { node, det }) => {
                assert_eq!(node.get(), 0);
                assert_eq!(det, 0.0);
            }
            other => panic!("expected singular stencil, got {other:?}"),
        }
    }

    #[test]
    fn test_single_neighbor_is_underdetermined() {
        let grid = Grid2D::from_neighbor_lists(
            vec![(0.0, 0.0), (1.0, 0.0)],
            vec![vec![1], vec![0]],
        )
        .unwrap();
        let result =
            LinearStencil::build(&grid, 1, &GradientWeight::None, &DiagnosticLog::disabled());
        assert!(matches!(
            result,
            Err(LsqError::UnderDetermined {
                n_neighbors: 1,
                required: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_coincident_neighbor_rejected() {
        let grid = Grid2D::from_neighbor_lists(
            vec![(0.0, 0.0), (1.0, 0.0), (0.0, 0.0), (0.0, 1.0)],
            vec![vec![1, 2, 3], vec![0], vec![0], vec![0]],
        )
        .unwrap();
        let result = LinearStencil::build(
            &grid,
            0,
            &GradientWeight::InverseDistance { p: 1.0 },
            &DiagnosticLog::disabled(),
        );
        assert!(matches!(result, Err(LsqError::ZeroDistance { .. })));
    }
}

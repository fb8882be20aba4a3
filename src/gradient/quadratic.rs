//! Two-step quadratic LSQ stencils (5x5 normal equations).
//!
//! The stencil of node i is the list of pairs (n, m) where n is a direct
//! neighbor of i and m is the `ell`-th neighbor of n. Each pair contributes
//! the displacement
//!
//! d = (x_n - x_i) + (x_m - x_n)
//!
//! with the neighbor-to-neighbor part (x_m - x_n) staged once per grid in
//! [`NeighborOffsets`]. When m is i itself the pair falls back to the direct
//! displacement x_n - x_i. The unknowns are (∂x, ∂y, ∂xx, ∂xy, ∂yy) and the
//! monomials are (dx, dy, dx²/2, dx·dy, dy²/2).
//!
//! The ordered pair list is stored with the coefficients, so the evaluator
//! walks exactly the traversal used for assembly.

use crate::mesh::Grid2D;
use crate::solver::DiagnosticLog;
use crate::types::NodeIndex;

use super::config::GradientWeight;
use super::dense::{Matrix5, invert_5x5, is_symmetric, matmul, quadratic_monomials};
use super::error::LsqError;
use super::weight::stencil_weight;

/// Fewest extended-stencil pairs that determine the five unknowns.
pub const QUADRATIC_MIN_PAIRS: usize = 5;

/// Per-node displacement to each direct neighbor, `x(nghbr[k]) - x(node)`.
///
/// Staged for every node before any quadratic stencil is assembled.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NeighborOffsets {
    pub dx: Vec<Vec<f64>>,
    pub dy: Vec<Vec<f64>>,
}

impl NeighborOffsets {
    fn node_offsets(grid: &Grid2D, i: usize) -> (Vec<f64>, Vec<f64>) {
        let (xi, yi) = grid.coords(i);
        grid.neighbors(i)
            .iter()
            .map(|&n| {
                let (xn, yn) = grid.coords(n);
                (xn - xi, yn - yi)
            })
            .unzip()
    }

    /// Stage the offsets of every node.
    pub fn stage(grid: &Grid2D) -> Self {
        let (dx, dy) = (0..grid.n_nodes())
            .map(|i| Self::node_offsets(grid, i))
            .unzip();
        Self { dx, dy }
    }

    /// Stage the offsets of every node in parallel.
    #[cfg(feature = "parallel")]
    pub fn stage_parallel(grid: &Grid2D) -> Self {
        use rayon::prelude::*;

        let (dx, dy) = (0..grid.n_nodes())
            .into_par_iter()
            .map(|i| Self::node_offsets(grid, i))
            .unzip();
        Self { dx, dy }
    }
}

/// One entry of the extended stencil.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StencilPair {
    /// Direct neighbor n of the center
    pub neighbor: usize,
    /// Local index `ell` of m inside the neighbor list of n
    pub slot: usize,
    /// Neighbor-of-neighbor m
    pub target: usize,
    /// m is the center node itself
    pub self_ref: bool,
}

impl StencilPair {
    /// Displacement of this pair from the center `i`.
    #[inline]
    fn displacement(&self, grid: &Grid2D, offsets: &NeighborOffsets, i: usize) -> (f64, f64) {
        let (xi, yi) = grid.coords(i);
        let (xn, yn) = grid.coords(self.neighbor);
        if self.self_ref {
            (xn - xi, yn - yi)
        } else {
            (
                xn - xi + offsets.dx[self.neighbor][self.slot],
                yn - yi + offsets.dy[self.neighbor][self.slot],
            )
        }
    }

    /// Stencil point used in diagnostics.
    #[inline]
    fn point(&self) -> usize {
        if self.self_ref {
            self.neighbor
        } else {
            self.target
        }
    }
}

/// Quadratic LSQ coefficients of one node.
///
/// `cx[ii]`, `cy[ii]` belong to `pairs[ii]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuadraticStencil {
    pub pairs: Vec<StencilPair>,
    pub cx: Vec<f64>,
    pub cy: Vec<f64>,
}

impl QuadraticStencil {
    /// Ordered extended stencil of node `i`.
    pub fn pairs(grid: &Grid2D, i: usize) -> Vec<StencilPair> {
        let mut pairs = Vec::with_capacity(grid.extended_stencil_len(i));
        for &n in grid.neighbors(i) {
            for (slot, &m) in grid.neighbors(n).iter().enumerate() {
                pairs.push(StencilPair {
                    neighbor: n,
                    slot,
                    target: m,
                    self_ref: m == i,
                });
            }
        }
        pairs
    }

    /// Ordered pairs with their displacements and squared weights.
    fn weighted_pairs(
        grid: &Grid2D,
        offsets: &NeighborOffsets,
        i: usize,
        weight: &GradientWeight,
    ) -> Result<Vec<(StencilPair, f64, f64, f64)>, LsqError> {
        if grid.neighbors(i).contains(&i) {
            return Err(LsqError::SelfReference {
                node: NodeIndex::new(i),
            });
        }
        let pairs = Self::pairs(grid, i);
        if pairs.len() < QUADRATIC_MIN_PAIRS {
            return Err(LsqError::UnderDetermined {
                node: NodeIndex::new(i),
                n_neighbors: pairs.len(),
                required: QUADRATIC_MIN_PAIRS,
            });
        }

        let center = grid.coords(i);
        pairs
            .into_iter()
            .map(|pair| {
                let (dx, dy) = pair.displacement(grid, offsets, i);
                let w2 = stencil_weight(weight, i, pair.point(), center, dx, dy)?;
                Ok((pair, dx, dy, w2))
            })
            .collect()
    }

    fn assemble(weighted: &[(StencilPair, f64, f64, f64)]) -> Matrix5 {
        let mut a = [[0.0; 5]; 5];
        for &(_, dx, dy, w2) in weighted {
            let m = quadratic_monomials(dx, dy);
            for r in 0..5 {
                for c in r..5 {
                    a[r][c] += w2 * m[r] * m[c];
                }
            }
        }
        for r in 1..5 {
            for c in 0..r {
                a[r][c] = a[c][r];
            }
        }
        a
    }

    /// Assemble the 5x5 normal matrix of node `i`.
    ///
    /// `offsets` must be staged from the same grid.
    pub fn normal_matrix(
        grid: &Grid2D,
        offsets: &NeighborOffsets,
        i: usize,
        weight: &GradientWeight,
    ) -> Result<Matrix5, LsqError> {
        let weighted = Self::weighted_pairs(grid, offsets, i, weight)?;
        Ok(Self::assemble(&weighted))
    }

    /// Build the quadratic stencil of node `i`.
    pub fn build(
        grid: &Grid2D,
        offsets: &NeighborOffsets,
        i: usize,
        weight: &GradientWeight,
        log: &DiagnosticLog,
    ) -> Result<Self, LsqError> {
        let weighted = Self::weighted_pairs(grid, offsets, i, weight)?;
        let a = Self::assemble(&weighted);
        debug_assert!(is_symmetric(&a), "asymmetric 5x5 normal matrix at node {i}");
        let ainv = invert_5x5(&a).map_err(|condition| LsqError::SingularQuadratic {
            node: NodeIndex::new(i),
            condition,
        })?;

        if log.wants(i) {
            for (pair, dx, dy, w2) in &weighted {
                if pair.self_ref {
                    log.note(
                        i,
                        &format!(
                            " self reference through {}: dx = {dx:e}, dy = {dy:e}, w2 = {w2:e}",
                            NodeIndex::new(pair.neighbor)
                        ),
                    );
                }
            }
            log.matrix(i, "a", &a);
            log.matrix(i, "ainv", &ainv);
            log.matrix(i, "ainv * a", &matmul(&ainv, &a));
        }

        let mut pairs = Vec::with_capacity(weighted.len());
        let mut cx: Vec<f64> = Vec::with_capacity(weighted.len());
        let mut cy: Vec<f64> = Vec::with_capacity(weighted.len());

        for (pair, dx, dy, w2) in weighted {
            let m = quadratic_monomials(dx, dy);
            pairs.push(pair);
            cx.push((0..5).map(|j| ainv[0][j] * w2 * m[j]).sum());
            cy.push((0..5).map(|j| ainv[1][j] * w2 * m[j]).sum());
        }

        Ok(Self { pairs, cx, cy })
    }

    /// Number of extended-stencil entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Gradient at the center.
    ///
    /// # Arguments
    /// * `center` - Value at the center node
    /// * `value` - Nodal values by node index
    /// * `dw` - Staged neighbor differences, `dw[n][ell] = value(nghbr_n[ell]) - value(n)`
    #[inline]
    pub fn gradient(
        &self,
        center: f64,
        value: impl Fn(usize) -> f64,
        dw: &[Vec<f64>],
    ) -> [f64; 2] {
        let mut grad = [0.0; 2];
        for (ii, pair) in self.pairs.iter().enumerate() {
            let mut da = value(pair.neighbor) - center;
            if !pair.self_ref {
                da += dw[pair.neighbor][pair.slot];
            }
            grad[0] += self.cx[ii] * da;
            grad[1] += self.cy[ii] * da;
        }
        grad
    }

    /// Whether the stencil still matches the neighbor graph around node `i`.
    pub fn matches(&self, grid: &Grid2D, i: usize) -> bool {
        let mut pairs = self.pairs.iter();
        for &n in grid.neighbors(i) {
            for (slot, &m) in grid.neighbors(n).iter().enumerate() {
                match pairs.next() {
                    Some(p) if p.neighbor == n && p.slot == slot && p.target == m => {}
                    _ => return false,
                }
            }
        }
        pairs.next().is_none()
    }
}

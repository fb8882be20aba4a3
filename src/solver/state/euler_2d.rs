//! Nodal solution of the 2D Euler equations.
//!
//! Each node carries the primitive state w = (ρ, u, v, p), the conservative
//! state U = (ρ, ρu, ρv, ρE) and the gradients of both.

use crate::equations::{Euler2D, NQ};

use super::super::core::{NodalField, NodalGradient};

/// Node-centered solution of N variables with gradient storage.
#[derive(Clone, Debug)]
pub struct NodalSolution<const N: usize> {
    /// Primitive variables
    pub w: NodalField<N>,
    /// Conservative variables
    pub u: NodalField<N>,
    /// Gradients of the primitive variables
    pub gradw: NodalGradient<N>,
    /// Gradients of the conservative variables
    pub gradu: NodalGradient<N>,
}

impl<const N: usize> NodalSolution<N> {
    /// Create a zero solution.
    pub fn new(n_nodes: usize) -> Self {
        Self {
            w: NodalField::zeros(n_nodes),
            u: NodalField::zeros(n_nodes),
            gradw: NodalGradient::zeros(n_nodes),
            gradu: NodalGradient::zeros(n_nodes),
        }
    }

    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.w.n_nodes
    }

    /// Number of variables per node.
    #[inline]
    pub const fn nq(&self) -> usize {
        N
    }
}

/// Nodal solution of the 2D Euler equations.
pub type EulerSolution = NodalSolution<NQ>;

impl NodalSolution<NQ> {
    /// Create a solution from primitive states and fill the conservative field.
    pub fn from_primitives(euler: &Euler2D, w: NodalField<NQ>) -> Self {
        let mut solution = Self::new(w.n_nodes);
        solution.w = w;
        solution.sync_conservative(euler);
        solution
    }

    /// Recompute U from w at every node.
    pub fn sync_conservative(&mut self, euler: &Euler2D) {
        for i in 0..self.n_nodes() {
            self.u.set(i, euler.w2u(&self.w.get(i)));
        }
    }

    /// Recompute w from U at every node.
    pub fn sync_primitive(&mut self, euler: &Euler2D) {
        for i in 0..self.n_nodes() {
            self.w.set(i, euler.u2w(&self.u.get(i)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_primitives() {
        let euler = Euler2D::default();
        let w = NodalField::from_fn(3, |i| [1.0 + i as f64, 0.5, -0.5, 1.0]);
        let solution = EulerSolution::from_primitives(&euler, w);

        assert_eq!(solution.n_nodes(), 3);
        assert_eq!(solution.nq(), 4);
        let u = solution.u.get(2);
        assert!((u[0] - 3.0).abs() < 1e-14);
        assert!((u[1] - 1.5).abs() < 1e-14);
        assert!((u[2] + 1.5).abs() < 1e-14);
    }

    #[test]
    fn test_sync_primitive_round_trip() {
        let euler = Euler2D::default();
        let w = NodalField::from_fn(4, |i| [1.2, 0.1 * i as f64, 0.3, 0.8]);
        let mut solution = EulerSolution::from_primitives(&euler, w.clone());

        solution.w = NodalField::zeros(4);
        solution.sync_primitive(&euler);
        for (a, b) in solution.w.data.iter().zip(&w.data) {
            assert!((a - b).abs() < 1e-13);
        }
    }
}

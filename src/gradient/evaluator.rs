//! Gradient evaluation from precomputed LSQ coefficients.
//!
//! # Example
//!
//! ```
//! use ncfv_rs::gradient::{FieldKind, GradientType, LsqConfig, LsqGradient};
//! use ncfv_rs::mesh::structured;
//! use ncfv_rs::solver::{EulerSolution, NodalField};
//! use ncfv_rs::equations::Euler2D;
//!
//! let grid = structured::uniform_quads(0.0, 1.0, 0.0, 1.0, 4, 4).unwrap();
//! let mut lsq = LsqGradient::build(&grid, &LsqConfig::new()).unwrap();
//!
//! let w = NodalField::from_fn(grid.n_nodes(), |i| {
//!     let (x, y) = grid.coords(i);
//!     [1.0 + 0.1 * x, 0.2 * y, 0.0, 1.0]
//! });
//! let mut solution = EulerSolution::from_primitives(&Euler2D::default(), w);
//!
//! lsq.compute_gradient(&grid, &mut solution, FieldKind::Primitive, 0, GradientType::Linear)
//!     .unwrap();
//! let [gx, gy] = solution.gradw.get(5, 0);
//! assert!((gx - 0.1).abs() < 1e-12 && gy.abs() < 1e-12);
//! ```

use crate::mesh::Grid2D;
use crate::solver::{NodalField, NodalGradient, NodalSolution};

use super::coefficients::LsqCoefficients;
use super::config::{GradientType, LsqConfig};
use super::error::LsqError;

/// Which nodal field a gradient is computed for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FieldKind {
    /// w into gradw
    #[default]
    Primitive,
    /// u into gradu
    Conservative,
}

fn split_field<const N: usize>(
    solution: &mut NodalSolution<N>,
    field: FieldKind,
) -> (&NodalField<N>, &mut NodalGradient<N>) {
    match field {
        FieldKind::Primitive => (&solution.w, &mut solution.gradw),
        FieldKind::Conservative => (&solution.u, &mut solution.gradu),
    }
}

/// LSQ gradient operator: coefficients plus the two-step staging buffer.
#[derive(Clone, Debug)]
pub struct LsqGradient {
    coeffs: LsqCoefficients,
    /// `dw[i][k] = value(nghbr_i[k]) - value(i)`, restaged on every quadratic pass
    dw: Vec<Vec<f64>>,
}

impl LsqGradient {
    pub fn new(coeffs: LsqCoefficients) -> Self {
        Self {
            coeffs,
            dw: Vec::new(),
        }
    }

    /// Build coefficients for `config` and wrap them.
    pub fn build(grid: &Grid2D, config: &LsqConfig) -> Result<Self, LsqError> {
        Ok(Self::new(LsqCoefficients::build(grid, config)?))
    }

    pub fn coefficients(&self) -> &LsqCoefficients {
        &self.coeffs
    }

    /// Common checks; `Ok(false)` means there is nothing to do.
    fn prepare(
        &self,
        grid: &Grid2D,
        n_nodes: usize,
        nq: usize,
        ivar: usize,
        gradient_type: GradientType,
    ) -> Result<bool, LsqError> {
        if gradient_type == GradientType::None {
            return Ok(false);
        }
        if ivar >= nq {
            return Err(LsqError::VariableOutOfRange { ivar, nq });
        }
        if n_nodes != grid.n_nodes() {
            return Err(LsqError::SolutionSizeMismatch {
                expected: grid.n_nodes(),
                actual: n_nodes,
            });
        }
        let built = match gradient_type {
            GradientType::Linear => self.coeffs.linear.is_some(),
            GradientType::Quadratic2 => self.coeffs.quadratic.is_some(),
            GradientType::None => false,
        };
        if !built {
            return Err(LsqError::MissingCoefficients { gradient_type });
        }
        self.coeffs.ensure_matches(grid)?;
        tracing::debug!(%gradient_type, ivar, "computing LSQ gradients");
        Ok(true)
    }

    /// Restage `dw` for variable `ivar` at every node.
    fn stage_differences<const N: usize>(&mut self, grid: &Grid2D, values: &NodalField<N>, ivar: usize) {
        self.dw.resize_with(grid.n_nodes(), Vec::new);
        for (i, row) in self.dw.iter_mut().enumerate() {
            let wi = values.get_var(i, ivar);
            row.clear();
            row.extend(grid.neighbors(i).iter().map(|&n| values.get_var(n, ivar) - wi));
        }
    }

    /// Compute gradients of variable `ivar` of the selected field at every node.
    ///
    /// `GradientType::None` returns immediately without touching the solution.
    /// Only the gradient entries of `ivar` are overwritten.
    pub fn compute_gradient<const N: usize>(
        &mut self,
        grid: &Grid2D,
        solution: &mut NodalSolution<N>,
        field: FieldKind,
        ivar: usize,
        gradient_type: GradientType,
    ) -> Result<(), LsqError> {
        if !self.prepare(grid, solution.n_nodes(), N, ivar, gradient_type)? {
            return Ok(());
        }
        let (values, grads) = split_field(solution, field);

        match gradient_type {
            GradientType::Linear => {
                if let Some(stencils) = self.coeffs.linear() {
                    for (i, stencil) in stencils.iter().enumerate() {
                        let grad = stencil
                            .gradient(values.get_var(i, ivar), |n| values.get_var(n, ivar));
                        grads.set(i, ivar, grad);
                    }
                }
            }
            GradientType::Quadratic2 => {
                // All differences must be staged before any node reads them
                self.stage_differences(grid, values, ivar);
                if let Some(stencils) = self.coeffs.quadratic() {
                    for (i, stencil) in stencils.iter().enumerate() {
                        let grad = stencil.gradient(
                            values.get_var(i, ivar),
                            |n| values.get_var(n, ivar),
                            &self.dw,
                        );
                        grads.set(i, ivar, grad);
                    }
                }
            }
            GradientType::None => {}
        }
        Ok(())
    }

    /// Compute gradients of all N variables with the configured reconstruction.
    pub fn compute_gradients<const N: usize>(
        &mut self,
        grid: &Grid2D,
        solution: &mut NodalSolution<N>,
        field: FieldKind,
    ) -> Result<(), LsqError> {
        let gradient_type = self.coeffs.config.gradient_type;
        for ivar in 0..N {
            self.compute_gradient(grid, solution, field, ivar, gradient_type)?;
        }
        Ok(())
    }

    /// Parallel version of [`Self::compute_gradient`].
    ///
    /// Staging of `dw` completes for all nodes before evaluation starts.
    #[cfg(feature = "parallel")]
    pub fn compute_gradient_parallel<const N: usize>(
        &mut self,
        grid: &Grid2D,
        solution: &mut NodalSolution<N>,
        field: FieldKind,
        ivar: usize,
        gradient_type: GradientType,
    ) -> Result<(), LsqError> {
        use rayon::prelude::*;

        if !self.prepare(grid, solution.n_nodes(), N, ivar, gradient_type)? {
            return Ok(());
        }
        let (values, grads) = split_field(solution, field);
        let node_grads = grads.data.par_chunks_mut(N * 2).enumerate();

        match gradient_type {
            GradientType::Linear => {
                if let Some(stencils) = self.coeffs.linear() {
                    node_grads.for_each(|(i, out)| {
                        let grad = stencils[i]
                            .gradient(values.get_var(i, ivar), |n| values.get_var(n, ivar));
                        out[ivar * 2] = grad[0];
                        out[ivar * 2 + 1] = grad[1];
                    });
                }
            }
            GradientType::Quadratic2 => {
                self.dw.resize_with(grid.n_nodes(), Vec::new);
                self.dw.par_iter_mut().enumerate().for_each(|(i, row)| {
                    let wi = values.get_var(i, ivar);
                    row.clear();
                    row.extend(grid.neighbors(i).iter().map(|&n| values.get_var(n, ivar) - wi));
                });

                let dw = &self.dw;
                if let Some(stencils) = self.coeffs.quadratic() {
                    node_grads.for_each(|(i, out)| {
                        let grad = stencils[i].gradient(
                            values.get_var(i, ivar),
                            |n| values.get_var(n, ivar),
                            dw,
                        );
                        out[ivar * 2] = grad[0];
                        out[ivar * 2 + 1] = grad[1];
                    });
                }
            }
            GradientType::None => {}
        }
        Ok(())
    }
}

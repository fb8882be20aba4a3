//! Verification of LSQ gradients against analytic fields.
//!
//! A field that the reconstruction represents exactly (linear for the
//! linear scheme, quadratic for the two-step quadratic scheme) is injected
//! into the primitive variables. The computed gradients are then compared
//! with the analytic ones node by node.

use crate::equations::NQ;
use crate::mesh::Grid2D;
use crate::solver::{DiagnosticLog, NodalSolution};
use crate::types::NodeIndex;

use super::coefficients::{LsqCoefficients, StencilSet};
use super::config::{GradientType, LsqConfig};
use super::error::LsqError;
use super::evaluator::{FieldKind, LsqGradient};

/// Relative errors are measured against `max(|exact|, RELATIVE_ERROR_FLOOR)`.
pub const RELATIVE_ERROR_FLOOR: f64 = 1.0;

/// A scalar field with a known gradient.
pub trait AnalyticField {
    fn value(&self, x: f64, y: f64) -> f64;

    fn gradient(&self, x: f64, y: f64) -> [f64; 2];

    fn name(&self) -> &'static str;
}

/// f = a0 + a1·x + a2·y
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearField {
    pub a0: f64,
    pub a1: f64,
    pub a2: f64,
}

impl LinearField {
    /// f = x + 2y
    pub fn reference() -> Self {
        Self {
            a0: 0.0,
            a1: 1.0,
            a2: 2.0,
        }
    }
}

impl AnalyticField for LinearField {
    fn value(&self, x: f64, y: f64) -> f64 {
        self.a0 + self.a1 * x + self.a2 * y
    }

    fn gradient(&self, _x: f64, _y: f64) -> [f64; 2] {
        [self.a1, self.a2]
    }

    fn name(&self) -> &'static str {
        "linear"
    }
}

/// f = a0 + a1·x + a2·y + a3·x² + a4·x·y + a5·y²
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadraticField {
    pub a: [f64; 6],
}

impl QuadraticField {
    pub fn reference() -> Self {
        Self {
            a: [21.122, 1.0, -1.97, 280.4, -2129.71, 170.999],
        }
    }
}

impl AnalyticField for QuadraticField {
    fn value(&self, x: f64, y: f64) -> f64 {
        let a = &self.a;
        a[0] + a[1] * x + a[2] * y + a[3] * x * x + a[4] * x * y + a[5] * y * y
    }

    fn gradient(&self, x: f64, y: f64) -> [f64; 2] {
        let a = &self.a;
        [
            a[1] + 2.0 * a[3] * x + a[4] * y,
            a[2] + 2.0 * a[5] * y + a[4] * x,
        ]
    }

    fn name(&self) -> &'static str {
        "quadratic"
    }
}

/// Worst relative error of one gradient component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComponentError {
    pub max_relative_error: f64,
    pub node: NodeIndex,
    pub x: f64,
    pub y: f64,
    pub computed: f64,
    pub exact: f64,
}

impl ComponentError {
    fn new() -> Self {
        Self {
            max_relative_error: 0.0,
            node: NodeIndex::new(0),
            x: 0.0,
            y: 0.0,
            computed: 0.0,
            exact: 0.0,
        }
    }
}

/// Outcome of one verification run.
#[derive(Clone, Debug, PartialEq)]
pub struct VerificationReport {
    pub gradient_type: GradientType,
    pub field: &'static str,
    pub n_nodes: usize,
    /// Errors of ∂/∂x and ∂/∂y
    pub components: [ComponentError; 2],
}

impl VerificationReport {
    /// Largest relative error over both components.
    pub fn max_relative_error(&self) -> f64 {
        let [ex, ey] = &self.components;
        if ex.max_relative_error.is_nan() || ey.max_relative_error.is_nan() {
            return f64::NAN;
        }
        ex.max_relative_error.max(ey.max_relative_error)
    }

    pub fn passes(&self, tolerance: f64) -> bool {
        self.max_relative_error() < tolerance
    }

    /// One-line summary for logging.
    pub fn summary_line(&self) -> String {
        let [ex, ey] = &self.components;
        format!(
            "{} LSQ on {} field ({} nodes): max rel err x = {:.3e} at {} ({:.4}, {:.4}), y = {:.3e} at {} ({:.4}, {:.4})",
            self.gradient_type,
            self.field,
            self.n_nodes,
            ex.max_relative_error,
            ex.node,
            ex.x,
            ex.y,
            ey.max_relative_error,
            ey.node,
            ey.x,
            ey.y,
        )
    }
}

/// Inject `field` into variable `ivar` of w, compute its gradient and
/// compare with the analytic gradient at every node.
pub fn verify_gradient<F: AnalyticField, const N: usize>(
    grid: &Grid2D,
    lsq: &mut LsqGradient,
    solution: &mut NodalSolution<N>,
    field: &F,
    ivar: usize,
    gradient_type: GradientType,
) -> Result<VerificationReport, LsqError> {
    if ivar >= N {
        return Err(LsqError::VariableOutOfRange { ivar, nq: N });
    }
    if solution.n_nodes() != grid.n_nodes() {
        return Err(LsqError::SolutionSizeMismatch {
            expected: grid.n_nodes(),
            actual: solution.n_nodes(),
        });
    }
    for i in 0..grid.n_nodes() {
        let (x, y) = grid.coords(i);
        solution.w.set_var(i, ivar, field.value(x, y));
    }

    lsq.compute_gradient(grid, solution, FieldKind::Primitive, ivar, gradient_type)?;

    let mut components = [ComponentError::new(); 2];
    for i in 0..grid.n_nodes() {
        let (x, y) = grid.coords(i);
        let computed = solution.gradw.get(i, ivar);
        let exact = field.gradient(x, y);
        for (dim, worst) in components.iter_mut().enumerate() {
            let err = (computed[dim] - exact[dim]).abs() / exact[dim].abs().max(RELATIVE_ERROR_FLOOR);
            // NaN gradients must surface as the worst node
            if i == 0 || err.is_nan() || err > worst.max_relative_error {
                *worst = ComponentError {
                    max_relative_error: err,
                    node: NodeIndex::new(i),
                    x,
                    y,
                    computed: computed[dim],
                    exact: exact[dim],
                };
            }
        }
    }

    Ok(VerificationReport {
        gradient_type,
        field: field.name(),
        n_nodes: grid.n_nodes(),
        components,
    })
}

/// Build both coefficient families and verify each against the field it
/// reproduces exactly: the linear scheme on [`LinearField::reference`] and
/// the two-step quadratic scheme on [`QuadraticField::reference`].
pub fn check_lsq_coefficients(
    grid: &Grid2D,
    config: &LsqConfig,
    log: &DiagnosticLog,
) -> Result<Vec<VerificationReport>, LsqError> {
    let coeffs = LsqCoefficients::build_with(grid, config, StencilSet::ALL, log)?;
    let mut lsq = LsqGradient::new(coeffs);
    let mut solution = NodalSolution::<NQ>::new(grid.n_nodes());

    let reports = vec![
        verify_gradient(
            grid,
            &mut lsq,
            &mut solution,
            &LinearField::reference(),
            0,
            GradientType::Linear,
        )?,
        verify_gradient(
            grid,
            &mut lsq,
            &mut solution,
            &QuadraticField::reference(),
            0,
            GradientType::Quadratic2,
        )?,
    ];

    for report in &reports {
        tracing::info!("{}", report.summary_line());
    }
    Ok(reports)
}

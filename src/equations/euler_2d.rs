//! 2D Euler equations of an ideal gas.
//!
//! ∂ρ/∂t + ∂(ρu)/∂x + ∂(ρv)/∂y = 0
//! ∂(ρu)/∂t + ∂(ρu² + p)/∂x + ∂(ρuv)/∂y = 0
//! ∂(ρv)/∂t + ∂(ρuv)/∂x + ∂(ρv² + p)/∂y = 0
//! ∂(ρE)/∂t + ∂(u(ρE + p))/∂x + ∂(v(ρE + p))/∂y = 0
//!
//! with p = (γ - 1)(ρE - ρ(u² + v²)/2).
//!
//! # Variable sets
//!
//! w = [ρ, u, v, p]ᵀ     (primitive)
//! U = [ρ, ρu, ρv, ρE]ᵀ  (conservative)

/// Number of solution variables of the 2D Euler equations.
pub const NQ: usize = 4;

/// 2D Euler equations with a constant ratio of specific heats.
///
/// # Example
///
/// ```
/// use ncfv_rs::equations::Euler2D;
///
/// let euler = Euler2D::default();
/// let u = euler.w2u(&[1.0, 0.5, 0.0, 1.0 / 1.4]);
/// let w = euler.u2w(&u);
/// assert!((w[3] - 1.0 / 1.4).abs() < 1e-14);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Euler2D {
    /// Ratio of specific heats (default 1.4)
    pub gamma: f64,
}

impl Default for Euler2D {
    fn default() -> Self {
        Self { gamma: 1.4 }
    }
}

impl Euler2D {
    pub fn new(gamma: f64) -> Self {
        Self { gamma }
    }

    /// Primitive [ρ, u, v, p] to conservative [ρ, ρu, ρv, ρE].
    #[inline]
    pub fn w2u(&self, w: &[f64; NQ]) -> [f64; NQ] {
        let [rho, u, v, p] = *w;
        [
            rho,
            rho * u,
            rho * v,
            p / (self.gamma - 1.0) + 0.5 * rho * (u * u + v * v),
        ]
    }

    /// Conservative [ρ, ρu, ρv, ρE] to primitive [ρ, u, v, p].
    #[inline]
    pub fn u2w(&self, q: &[f64; NQ]) -> [f64; NQ] {
        let rho = q[0];
        let u = q[1] / rho;
        let v = q[2] / rho;
        let p = (self.gamma - 1.0) * (q[3] - 0.5 * rho * (u * u + v * v));
        [rho, u, v, p]
    }

    /// Speed of sound c = sqrt(γp/ρ).
    #[inline]
    pub fn sound_speed(&self, w: &[f64; NQ]) -> f64 {
        (self.gamma * w[3] / w[0]).sqrt()
    }
}

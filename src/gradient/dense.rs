//! Small dense kernels for the LSQ normal equations.
//!
//! The 2x2 system is inverted in closed form. The 5x5 system goes through a
//! full-pivoting LU factorization from faer, solved against the identity.

use faer::{Mat, linalg::solvers::Solve};

/// Determinant threshold of the 2x2 normal matrix.
pub const LINEAR_DET_MIN: f64 = 1e-14;

/// Largest accepted 1-norm condition estimate of the 5x5 normal matrix.
pub const QUADRATIC_CONDITION_MAX: f64 = 1e14;

/// Largest accepted entry of `|A·A⁻¹ - I|` for the 5x5 inverse.
const INVERSE_RESIDUAL_MAX: f64 = 1e-2;

pub type Matrix2 = [[f64; 2]; 2];
pub type Matrix5 = [[f64; 5]; 5];

/// Quadratic monomials `[dx, dy, dx²/2, dx·dy, dy²/2]` of a displacement.
#[inline(always)]
pub fn quadratic_monomials(dx: f64, dy: f64) -> [f64; 5] {
    [dx, dy, 0.5 * dx * dx, dx * dy, 0.5 * dy * dy]
}

/// Closed-form inverse of a 2x2 matrix.
///
/// Returns the determinant as the error when `|det| < LINEAR_DET_MIN`.
pub fn invert_2x2(a: &Matrix2) -> Result<Matrix2, f64> {
    let det = a[0][0] * a[1][1] - a[0][1] * a[1][0];
    if det.is_nan() || det.abs() < LINEAR_DET_MIN {
        return Err(det);
    }
    let inv_det = 1.0 / det;
    Ok([
        [a[1][1] * inv_det, -a[0][1] * inv_det],
        [-a[1][0] * inv_det, a[0][0] * inv_det],
    ])
}

/// Inverse of a 5x5 matrix via full-pivoting LU.
///
/// Returns the condition estimate `‖A‖₁·‖A⁻¹‖₁` as the error when it exceeds
/// `QUADRATIC_CONDITION_MAX`, or infinity when the inverse is not usable.
pub fn invert_5x5(a: &Matrix5) -> Result<Matrix5, f64> {
    let mut m = Mat::zeros(5, 5);
    let mut identity = Mat::zeros(5, 5);
    for row in 0..5 {
        for col in 0..5 {
            m[(row, col)] = a[row][col];
        }
        identity[(row, row)] = 1.0;
    }

    let lu = m.as_ref().full_piv_lu();
    let solution = lu.solve(&identity);

    let mut inv = [[0.0; 5]; 5];
    for (row, inv_row) in inv.iter_mut().enumerate() {
        for (col, value) in inv_row.iter_mut().enumerate() {
            *value = solution[(row, col)];
        }
    }

    if inv.iter().flatten().any(|v| !v.is_finite()) {
        return Err(f64::INFINITY);
    }
    // Rank-deficient factorizations can yield a finite but wrong inverse
    if !(identity_residual(&matmul(a, &inv)) <= INVERSE_RESIDUAL_MAX) {
        return Err(f64::INFINITY);
    }
    let condition = norm_1(a) * norm_1(&inv);
    if !(condition <= QUADRATIC_CONDITION_MAX) {
        return Err(condition);
    }
    Ok(inv)
}

/// Maximum absolute column sum.
pub fn norm_1<const N: usize>(a: &[[f64; N]; N]) -> f64 {
    (0..N)
        .map(|col| a.iter().map(|row| row[col].abs()).sum::<f64>())
        .fold(0.0, f64::max)
}

/// Dense product `a · b`.
pub fn matmul<const N: usize>(a: &[[f64; N]; N], b: &[[f64; N]; N]) -> [[f64; N]; N] {
    let mut c = [[0.0; N]; N];
    for i in 0..N {
        for j in 0..N {
            c[i][j] = (0..N).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    c
}

/// Exact symmetry `a[i][j] == a[j][i]`.
pub fn is_symmetric<const N: usize>(a: &[[f64; N]; N]) -> bool {
    (0..N).all(|i| (i + 1..N).all(|j| a[i][j] == a[j][i]))
}

/// Largest entry of `|a - I|`.
pub fn identity_residual<const N: usize>(a: &[[f64; N]; N]) -> f64 {
    let mut max = 0.0_f64;
    for (i, row) in a.iter().enumerate() {
        for (j, &v) in row.iter().enumerate() {
            let target = if i == j { 1.0 } else { 0.0 };
            max = max.max((v - target).abs());
        }
    }
    max
}

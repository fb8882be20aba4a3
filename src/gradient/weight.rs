//! LSQ weighting function.

use super::config::GradientWeight;
use super::error::{DegenerateWeight, LsqError};

/// Smallest admissible `distance^p` for inverse-distance weighting.
pub const MIN_WEIGHT_DENOMINATOR: f64 = 1e-6;

/// Stencil points with `|dx| + |dy|` below this are coincident.
pub const MIN_DISPLACEMENT: f64 = 1e-13;

impl GradientWeight {
    /// Weight of a stencil point at relative displacement `(dx, dy)`.
    ///
    /// The normal equations use the squared weight, see [`Self::weight_squared`].
    #[inline]
    pub fn weight(&self, dx: f64, dy: f64) -> Result<f64, DegenerateWeight> {
        match *self {
            GradientWeight::None => Ok(1.0),
            GradientWeight::InverseDistance { p } => {
                let value = (dx * dx + dy * dy).sqrt().powf(p);
                if value.is_nan() || value < MIN_WEIGHT_DENOMINATOR {
                    return Err(DegenerateWeight {
                        dx,
                        dy,
                        value,
                        min: MIN_WEIGHT_DENOMINATOR,
                    });
                }
                Ok(1.0 / value)
            }
        }
    }

    /// Squared weight `w²` as used in the normal equations.
    #[inline]
    pub fn weight_squared(&self, dx: f64, dy: f64) -> Result<f64, DegenerateWeight> {
        let w = self.weight(dx, dy)?;
        Ok(w * w)
    }
}

/// Squared weight of the stencil point `neighbor` of `node`.
///
/// Rejects coincident points before weighting, so unweighted stencils
/// fail the same way as inverse-distance ones.
pub(crate) fn stencil_weight(
    weight: &GradientWeight,
    node: usize,
    neighbor: usize,
    center: (f64, f64),
    dx: f64,
    dy: f64,
) -> Result<f64, LsqError> {
    if dx.abs() + dy.abs() < MIN_DISPLACEMENT {
        return Err(LsqError::zero_distance(
            node,
            neighbor,
            center,
            DegenerateWeight {
                dx,
                dy,
                value: dx.abs() + dy.abs(),
                min: MIN_DISPLACEMENT,
            },
        ));
    }
    weight
        .weight_squared(dx, dy)
        .map_err(|err| LsqError::zero_distance(node, neighbor, center, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_weight() {
        let weight = GradientWeight::None;
        assert_eq!(weight.weight(3.0, 4.0).unwrap(), 1.0);
        // Unweighted stencils never fail, even at zero displacement
        assert_eq!(weight.weight_squared(0.0, 0.0).unwrap(), 1.0);
    }

    #[test]
    fn test_inverse_distance() {
        let weight = GradientWeight::InverseDistance { p: 1.0 };
        assert!((weight.weight(3.0, 4.0).unwrap() - 0.2).abs() < 1e-15);

        let weight = GradientWeight::InverseDistance { p: 2.0 };
        assert!((weight.weight_squared(3.0, 4.0).unwrap() - 1.0 / 625.0).abs() < 1e-15);
    }

    #[test]
    fn test_zero_distance_is_an_error() {
        let weight = GradientWeight::InverseDistance { p: 1.0 };
        let err = weight.weight(0.0, 0.0).unwrap_err();
        assert_eq!(err.value, 0.0);
        assert_eq!(err.min, MIN_WEIGHT_DENOMINATOR);

        // Small but nonzero distance below the threshold
        assert!(weight.weight(1e-7, 0.0).is_err());
        assert!(weight.weight(1e-5, 0.0).is_ok());
    }

    #[test]
    fn test_stencil_weight_rejects_coincident_points() {
        let err = stencil_weight(&GradientWeight::None, 2, 7, (1.0, 1.0), 0.0, 0.0).unwrap_err();
        assert!(matches!(err, LsqError::ZeroDistance { .. }));
        assert!(err.to_string().contains("N7"));

        let w2 = stencil_weight(&GradientWeight::None, 2, 7, (1.0, 1.0), 0.5, 0.0).unwrap();
        assert_eq!(w2, 1.0);
    }

    #[test]
    fn test_exponent_amplifies_threshold() {
        // (2e-3)^2 = 4e-6 is admissible, (2e-3)^3 = 8e-9 is not
        let p2 = GradientWeight::InverseDistance { p: 2.0 };
        let p3 = GradientWeight::InverseDistance { p: 3.0 };
        assert!(p2.weight(2e-3, 0.0).is_ok());
        assert!(p3.weight(2e-3, 0.0).is_err());
    }
}

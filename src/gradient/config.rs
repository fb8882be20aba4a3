//! LSQ gradient configuration.
//!
//! String options are resolved once into closed enums so that builders and
//! evaluators only ever pattern-match.
//!
//! # Example
//!
//! ```
//! use ncfv_rs::gradient::{GradientType, GradientWeight, LsqConfig};
//!
//! let config = LsqConfig::from_options("quadratic2", "inverse_distance", 1.0).unwrap();
//! assert_eq!(config.gradient_type, GradientType::Quadratic2);
//! assert_eq!(config.weight, GradientWeight::InverseDistance { p: 1.0 });
//!
//! let config = LsqConfig::new().with_gradient_type(GradientType::Linear);
//! assert_eq!(config.weight, GradientWeight::None);
//! ```

use std::fmt;
use std::str::FromStr;

use super::error::ConfigError;

/// Default exponent of inverse-distance weighting.
pub const DEFAULT_WEIGHT_EXPONENT: f64 = 1.0;

/// Exponents outside `(0, MAX_TYPICAL_EXPONENT]` are accepted but flagged.
pub const MAX_TYPICAL_EXPONENT: f64 = 8.0;

/// Reconstruction type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GradientType {
    /// Gradients are not computed
    None,
    /// Linear LSQ over direct neighbors (2x2 system)
    #[default]
    Linear,
    /// Two-step quadratic LSQ over the extended stencil (5x5 system)
    Quadratic2,
}

impl GradientType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GradientType::None => "none",
            GradientType::Linear => "linear",
            GradientType::Quadratic2 => "quadratic2",
        }
    }
}

impl fmt::Display for GradientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GradientType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "none" => Ok(GradientType::None),
            "linear" => Ok(GradientType::Linear),
            "quadratic2" => Ok(GradientType::Quadratic2),
            other => Err(ConfigError::UnknownGradientType(other.to_string())),
        }
    }
}

/// LSQ weighting function.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum GradientWeight {
    /// Uniform weights (w = 1)
    #[default]
    None,
    /// w = 1 / distance^p
    InverseDistance { p: f64 },
}

impl GradientWeight {
    /// Resolve a weight name and exponent. The exponent is ignored for `"none"`.
    pub fn parse(name: &str, p: f64) -> Result<Self, ConfigError> {
        match name.parse::<GradientWeight>()? {
            GradientWeight::None => Ok(GradientWeight::None),
            GradientWeight::InverseDistance { .. } => Ok(GradientWeight::InverseDistance { p }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GradientWeight::None => "none",
            GradientWeight::InverseDistance { .. } => "inverse_distance",
        }
    }
}

impl fmt::Display for GradientWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradientWeight::None => f.write_str("none"),
            GradientWeight::InverseDistance { p } => write!(f, "inverse_distance (p = {p})"),
        }
    }
}

impl FromStr for GradientWeight {
    type Err = ConfigError;

    /// Parses the weight name with the default exponent.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "none" => Ok(GradientWeight::None),
            "inverse_distance" => Ok(GradientWeight::InverseDistance {
                p: DEFAULT_WEIGHT_EXPONENT,
            }),
            other => Err(ConfigError::UnknownGradientWeight(other.to_string())),
        }
    }
}

/// Configuration of the LSQ gradient subsystem.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LsqConfig {
    pub gradient_type: GradientType,
    pub weight: GradientWeight,
}

impl LsqConfig {
    /// Default configuration: linear, unweighted.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gradient_type(mut self, gradient_type: GradientType) -> Self {
        self.gradient_type = gradient_type;
        self
    }

    pub fn with_weight(mut self, weight: GradientWeight) -> Self {
        self.weight = weight;
        self
    }

    /// Resolve the raw `gradient_type`, `gradient_weight` and
    /// `gradient_weight_p` options.
    pub fn from_options(
        gradient_type: &str,
        gradient_weight: &str,
        gradient_weight_p: f64,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            gradient_type: gradient_type.parse()?,
            weight: GradientWeight::parse(gradient_weight, gradient_weight_p)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration before any stencil loop runs.
    ///
    /// Non-finite exponents are rejected. Non-positive exponents and
    /// exponents above [`MAX_TYPICAL_EXPONENT`] are logged as warnings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let GradientWeight::InverseDistance { p } = self.weight {
            if !p.is_finite() {
                return Err(ConfigError::InvalidWeightExponent(p));
            }
            if p <= 0.0 {
                tracing::warn!(
                    p,
                    "gradient_weight_p <= 0 does not decay with distance"
                );
            } else if p > MAX_TYPICAL_EXPONENT {
                tracing::warn!(
                    p,
                    max = MAX_TYPICAL_EXPONENT,
                    "large gradient_weight_p may produce ill-conditioned LSQ matrices"
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LsqConfig::default();
        assert_eq!(config.gradient_type, GradientType::Linear);
        assert_eq!(config.weight, GradientWeight::None);
    }

    #[test]
    fn test_parse_gradient_type() {
        assert_eq!("none".parse::<GradientType>().unwrap(), GradientType::None);
        assert_eq!(
            " quadratic2 ".parse::<GradientType>().unwrap(),
            GradientType::Quadratic2
        );
        assert_eq!(
            "quadratic".parse::<GradientType>(),
            Err(ConfigError::UnknownGradientType("quadratic".into()))
        );
    }

    #[test]
    fn test_parse_weight() {
        assert_eq!(
            GradientWeight::parse("inverse_distance", 2.0).unwrap(),
            GradientWeight::InverseDistance { p: 2.0 }
        );
        assert_eq!(
            GradientWeight::parse("none", 2.0).unwrap(),
            GradientWeight::None
        );
        assert!(matches!(
            GradientWeight::parse("gaussian", 1.0),
            Err(ConfigError::UnknownGradientWeight(_))
        ));
    }

    #[test]
    fn test_round_trip_names() {
        for t in [GradientType::None, GradientType::Linear, GradientType::Quadratic2] {
            assert_eq!(t.to_string().parse::<GradientType>().unwrap(), t);
        }
        assert_eq!(
            GradientWeight::InverseDistance { p: 3.0 }.as_str(),
            "inverse_distance"
        );
    }

    #[test]
    fn test_from_options_rejects_non_finite_exponent() {
        let result = LsqConfig::from_options("linear", "inverse_distance", f64::NAN);
        assert!(matches!(result, Err(ConfigError::InvalidWeightExponent(_))));

        // Exponent is irrelevant without weighting
        assert!(LsqConfig::from_options("linear", "none", f64::INFINITY).is_ok());
    }

    #[test]
    fn test_unusual_exponents_are_accepted() {
        for p in [-1.0, 0.0, 12.0] {
            let config = LsqConfig::new().with_weight(GradientWeight::InverseDistance { p });
            assert!(config.validate().is_ok(), "p = {p}");
        }
    }
}

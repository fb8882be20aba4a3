//! Per-grid store of LSQ coefficients.
//!
//! Coefficients are built once per grid and configuration. Each node's
//! stencil depends only on read-only grid data, so the per-node work maps
//! directly onto `rayon` when the `parallel` feature is enabled. The
//! quadratic builder stages [`NeighborOffsets`] for all nodes before any
//! stencil is assembled.

use crate::mesh::Grid2D;
use crate::solver::DiagnosticLog;

use super::config::{GradientType, LsqConfig};
use super::error::LsqError;
use super::linear::LinearStencil;
use super::quadratic::{NeighborOffsets, QuadraticStencil};

/// Which stencil families to build.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StencilSet {
    pub linear: bool,
    pub quadratic: bool,
}

impl StencilSet {
    /// Both linear and quadratic stencils.
    pub const ALL: Self = Self {
        linear: true,
        quadratic: true,
    };

    /// The stencils a reconstruction type needs.
    pub fn for_type(gradient_type: GradientType) -> Self {
        Self {
            linear: gradient_type == GradientType::Linear,
            quadratic: gradient_type == GradientType::Quadratic2,
        }
    }
}

/// LSQ coefficients of every node of a grid.
#[derive(Clone, Debug, PartialEq)]
pub struct LsqCoefficients {
    /// Configuration the coefficients were built with
    pub config: LsqConfig,
    /// Number of grid nodes at build time
    pub n_nodes: usize,
    /// Linear stencils, one per node
    pub linear: Option<Vec<LinearStencil>>,
    /// Quadratic stencils, one per node
    pub quadratic: Option<Vec<QuadraticStencil>>,
    /// Neighbor offsets staged for the quadratic build
    pub offsets: Option<NeighborOffsets>,
}

fn log_failure(i: usize, err: LsqError) -> LsqError {
    tracing::error!(node = i, error = %err, "LSQ stencil construction failed");
    err
}

impl LsqCoefficients {
    /// Build the stencils required by `config.gradient_type`.
    pub fn build(grid: &Grid2D, config: &LsqConfig) -> Result<Self, LsqError> {
        Self::build_with(
            grid,
            config,
            StencilSet::for_type(config.gradient_type),
            &DiagnosticLog::default(),
        )
    }

    /// Build both linear and quadratic stencils.
    pub fn build_all(grid: &Grid2D, config: &LsqConfig) -> Result<Self, LsqError> {
        Self::build_with(grid, config, StencilSet::ALL, &DiagnosticLog::default())
    }

    /// Build the selected stencil families, snapshotting into `log`.
    pub fn build_with(
        grid: &Grid2D,
        config: &LsqConfig,
        set: StencilSet,
        log: &DiagnosticLog,
    ) -> Result<Self, LsqError> {
        config.validate()?;
        let n_nodes = grid.n_nodes();
        let weight = config.weight;

        let linear = if set.linear {
            tracing::info!(n_nodes, weight = %weight, "Constructing Linear LSQ coefficients");
            let stencils = (0..n_nodes)
                .map(|i| LinearStencil::build(grid, i, &weight, log).map_err(|e| log_failure(i, e)))
                .collect::<Result<Vec<_>, _>>()?;
            tracing::info!(
                entries = stencils.iter().map(LinearStencil::len).sum::<usize>(),
                "Linear LSQ coefficients constructed"
            );
            Some(stencils)
        } else {
            None
        };

        let (quadratic, offsets) = if set.quadratic {
            tracing::info!(n_nodes, weight = %weight, "Constructing Quadratic LSQ coefficients");
            let offsets = NeighborOffsets::stage(grid);
            let stencils = (0..n_nodes)
                .map(|i| {
                    QuadraticStencil::build(grid, &offsets, i, &weight, log)
                        .map_err(|e| log_failure(i, e))
                })
                .collect::<Result<Vec<_>, _>>()?;
            tracing::info!(
                entries = stencils.iter().map(QuadraticStencil::len).sum::<usize>(),
                "Quadratic LSQ coefficients constructed"
            );
            (Some(stencils), Some(offsets))
        } else {
            (None, None)
        };

        Ok(Self {
            config: *config,
            n_nodes,
            linear,
            quadratic,
            offsets,
        })
    }

    /// Parallel version of [`Self::build_with`].
    ///
    /// Produces the same coefficients as the serial build. Offsets are fully
    /// staged before quadratic assembly starts.
    #[cfg(feature = "parallel")]
    pub fn build_parallel(
        grid: &Grid2D,
        config: &LsqConfig,
        set: StencilSet,
        log: &DiagnosticLog,
    ) -> Result<Self, LsqError> {
        use rayon::prelude::*;

        config.validate()?;
        let n_nodes = grid.n_nodes();
        let weight = config.weight;

        let linear = if set.linear {
            tracing::info!(n_nodes, weight = %weight, "Constructing Linear LSQ coefficients (parallel)");
            let stencils = (0..n_nodes)
                .into_par_iter()
                .map(|i| LinearStencil::build(grid, i, &weight, log).map_err(|e| log_failure(i, e)))
                .collect::<Result<Vec<_>, _>>()?;
            Some(stencils)
        } else {
            None
        };

        let (quadratic, offsets) = if set.quadratic {
            tracing::info!(n_nodes, weight = %weight, "Constructing Quadratic LSQ coefficients (parallel)");
            let offsets = NeighborOffsets::stage_parallel(grid);
            let stencils = (0..n_nodes)
                .into_par_iter()
                .map(|i| {
                    QuadraticStencil::build(grid, &offsets, i, &weight, log)
                        .map_err(|e| log_failure(i, e))
                })
                .collect::<Result<Vec<_>, _>>()?;
            (Some(stencils), Some(offsets))
        } else {
            (None, None)
        };

        Ok(Self {
            config: *config,
            n_nodes,
            linear,
            quadratic,
            offsets,
        })
    }

    /// Linear stencils, if built.
    pub fn linear(&self) -> Option<&[LinearStencil]> {
        self.linear.as_deref()
    }

    /// Quadratic stencils, if built.
    pub fn quadratic(&self) -> Option<&[QuadraticStencil]> {
        self.quadratic.as_deref()
    }

    /// Check that the coefficients were built from `grid`'s current stencils.
    pub fn ensure_matches(&self, grid: &Grid2D) -> Result<(), LsqError> {
        if grid.n_nodes() != self.n_nodes {
            return Err(LsqError::StaleCoefficients {
                expected: self.n_nodes,
                actual: grid.n_nodes(),
            });
        }
        if let Some(stencils) = &self.linear {
            for (i, stencil) in stencils.iter().enumerate() {
                if !stencil.matches(grid, i) {
                    return Err(LsqError::StaleCoefficients {
                        expected: stencil.len(),
                        actual: grid.neighbors(i).len(),
                    });
                }
            }
        }
        if let Some(stencils) = &self.quadratic {
            for (i, stencil) in stencils.iter().enumerate() {
                if !stencil.matches(grid, i) {
                    return Err(LsqError::StaleCoefficients {
                        expected: stencil.len(),
                        actual: grid.extended_stencil_len(i),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradient::GradientWeight;
    use crate::mesh::structured;

    #[test]
    fn test_build_selects_stencils() {
        let grid = structured::uniform_quads(0.0, 1.0, 0.0, 1.0, 3, 3).unwrap();

        let linear = LsqCoefficients::build(&grid, &LsqConfig::new()).unwrap();
        assert!(linear.linear().is_some());
        assert!(linear.quadratic().is_none());

        let config = LsqConfig::new().with_gradient_type(GradientType::Quadratic2);
        let quadratic = LsqCoefficients::build(&grid, &config).unwrap();
        assert!(quadratic.linear().is_none());
        assert_eq!(quadratic.quadratic().map(|q| q.len()), Some(16));
        assert!(quadratic.offsets.is_some());

        let config = LsqConfig::new().with_gradient_type(GradientType::None);
        let none = LsqCoefficients::build(&grid, &config).unwrap();
        assert!(none.linear().is_none() && none.quadratic().is_none());
    }

    #[test]
    fn test_coefficient_lengths_follow_stencils() {
        let grid = structured::uniform_trias(0.0, 1.0, 0.0, 1.0, 3, 2).unwrap();
        let coeffs = LsqCoefficients::build_all(&grid, &LsqConfig::new()).unwrap();

        for i in 0..grid.n_nodes() {
            let lin = &coeffs.linear().unwrap()[i];
            assert_eq!(lin.cx.len(), grid.neighbors(i).len());
            assert_eq!(lin.cy.len(), grid.neighbors(i).len());

            let quad = &coeffs.quadratic().unwrap()[i];
            assert_eq!(quad.cx.len(), grid.extended_stencil_len(i));
            assert_eq!(quad.pairs.len(), grid.extended_stencil_len(i));
        }
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let mut grid = structured::uniform_trias(0.0, 2.0, 0.0, 1.0, 6, 3).unwrap();
        structured::perturb_interior(&mut grid, 0.3);
        let config = LsqConfig::new().with_weight(GradientWeight::InverseDistance { p: 1.5 });

        let a = LsqCoefficients::build_all(&grid, &config).unwrap();
        let b = LsqCoefficients::build_all(&grid, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_config_validated_first() {
        let grid = structured::uniform_quads(0.0, 1.0, 0.0, 1.0, 2, 2).unwrap();
        let config =
            LsqConfig::new().with_weight(GradientWeight::InverseDistance { p: f64::NAN });
        let result = LsqCoefficients::build(&grid, &config);
        assert!(matches!(result, Err(LsqError::Config(_))));
    }

    #[test]
    fn test_ensure_matches_detects_other_grid() {
        let grid = structured::uniform_quads(0.0, 1.0, 0.0, 1.0, 2, 2).unwrap();
        let coeffs = LsqCoefficients::build_all(&grid, &LsqConfig::new()).unwrap();
        assert!(coeffs.ensure_matches(&grid).is_ok());

        let bigger = structured::uniform_quads(0.0, 1.0, 0.0, 1.0, 3, 2).unwrap();
        assert!(matches!(
            coeffs.ensure_matches(&bigger),
            Err(LsqError::StaleCoefficients {
                expected: 9,
                actual: 12
            })
        ));

        // Same node count, different connectivity
        let trias = structured::uniform_trias(0.0, 1.0, 0.0, 1.0, 2, 2).unwrap();
        assert!(matches!(
            coeffs.ensure_matches(&trias),
            Err(LsqError::StaleCoefficients { .. })
        ));
    }
}

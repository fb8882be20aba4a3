//! Structured grid generators for testing and verification.
//!
//! All generators number nodes row by row, `node = j * (nx + 1) + i`,
//! and emit counter-clockwise elements.

use super::grid2d::{Grid2D, GridError};

fn rectangle_nodes(
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
    nx: usize,
    ny: usize,
) -> Result<Vec<(f64, f64)>, GridError> {
    if nx == 0 || ny == 0 {
        return Err(GridError::InvalidDimensions(format!(
            "need at least one element in each direction, got {nx} x {ny}"
        )));
    }
    if !(x1 > x0 && y1 > y0) {
        return Err(GridError::InvalidDimensions(format!(
            "invalid domain bounds [{x0}, {x1}] x [{y0}, {y1}]"
        )));
    }

    let dx = (x1 - x0) / nx as f64;
    let dy = (y1 - y0) / ny as f64;

    let mut coords = Vec::with_capacity((nx + 1) * (ny + 1));
    for j in 0..=ny {
        for i in 0..=nx {
            coords.push((x0 + i as f64 * dx, y0 + j as f64 * dy));
        }
    }
    Ok(coords)
}

/// Uniform grid of `nx` x `ny` quadrilaterals on `[x0, x1] x [y0, y1]`.
pub fn uniform_quads(
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
    nx: usize,
    ny: usize,
) -> Result<Grid2D, GridError> {
    let coords = rectangle_nodes(x0, x1, y0, y1, nx, ny)?;

    let mut elements = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            let v0 = j * (nx + 1) + i; // bottom-left
            let v1 = v0 + 1; // bottom-right
            let v2 = v1 + (nx + 1); // top-right
            let v3 = v0 + (nx + 1); // top-left
            elements.push(vec![v0, v1, v2, v3]);
        }
    }

    Grid2D::from_elements(coords, elements)
}

/// Uniform grid of `2 * nx * ny` triangles on `[x0, x1] x [y0, y1]`.
///
/// Each cell is split along alternating diagonals so that interior nodes
/// see neighbors in all directions.
pub fn uniform_trias(
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
    nx: usize,
    ny: usize,
) -> Result<Grid2D, GridError> {
    let coords = rectangle_nodes(x0, x1, y0, y1, nx, ny)?;

    let mut elements = Vec::with_capacity(2 * nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            let v0 = j * (nx + 1) + i;
            let v1 = v0 + 1;
            let v2 = v1 + (nx + 1);
            let v3 = v0 + (nx + 1);
            if (i + j) % 2 == 0 {
                elements.push(vec![v0, v1, v2]);
                elements.push(vec![v0, v2, v3]);
            } else {
                elements.push(vec![v0, v1, v3]);
                elements.push(vec![v1, v2, v3]);
            }
        }
    }

    Grid2D::from_elements(coords, elements)
}

/// Displace interior nodes by a deterministic pseudo-random offset.
///
/// Each offset component lies in `[-amplitude / 2, amplitude / 2] * h_min`.
/// Boundary nodes (endpoints of boundary edges) are left in place.
/// Amplitudes below 0.5 keep elements valid on uniform grids.
pub fn perturb_interior(grid: &mut Grid2D, amplitude: f64) {
    let h = grid.h_min();
    if !h.is_finite() {
        return;
    }

    let mut on_boundary = vec![false; grid.n_nodes()];
    for edge in grid.edges.iter().filter(|e| e.is_boundary()) {
        on_boundary[edge.n1] = true;
        on_boundary[edge.n2] = true;
    }

    for (k, node) in grid.nodes.iter_mut().enumerate() {
        if on_boundary[k] {
            continue;
        }
        let sx = ((k * 37 + 11) % 17) as f64 / 16.0 - 0.5;
        let sy = ((k * 91 + 5) % 19) as f64 / 18.0 - 0.5;
        node.x += amplitude * h * sx;
        node.y += amplitude * h * sy;
    }
}

//! Node-centered solution and gradient storage.
//!
//! Values are stored interleaved per node so that all variables of a node
//! are contiguous, which is the access pattern of stencil loops.

/// Nodal values of N variables.
///
/// Layout: `data[i * N + var]` for node i, variable var.
#[derive(Clone, Debug, PartialEq)]
pub struct NodalField<const N: usize> {
    /// Nodal values in interleaved layout
    pub data: Vec<f64>,
    /// Number of nodes
    pub n_nodes: usize,
}

impl<const N: usize> NodalField<N> {
    /// Create a new field initialized to zero.
    pub fn zeros(n_nodes: usize) -> Self {
        Self {
            data: vec![0.0; n_nodes * N],
            n_nodes,
        }
    }

    /// Create a field by evaluating `f` at every node.
    pub fn from_fn(n_nodes: usize, mut f: impl FnMut(usize) -> [f64; N]) -> Self {
        let mut field = Self::zeros(n_nodes);
        for i in 0..n_nodes {
            field.set(i, f(i));
        }
        field
    }

    /// Get the state at node i.
    #[inline(always)]
    pub fn get(&self, i: usize) -> [f64; N] {
        let base = i * N;
        let mut result = [0.0; N];
        result.copy_from_slice(&self.data[base..base + N]);
        result
    }

    /// Set the state at node i.
    #[inline(always)]
    pub fn set(&mut self, i: usize, values: [f64; N]) {
        let base = i * N;
        self.data[base..base + N].copy_from_slice(&values);
    }

    /// Get a single variable at node i.
    #[inline(always)]
    pub fn get_var(&self, i: usize, var: usize) -> f64 {
        self.data[i * N + var]
    }

    /// Set a single variable at node i.
    #[inline(always)]
    pub fn set_var(&mut self, i: usize, var: usize, value: f64) {
        self.data[i * N + var] = value;
    }
}

/// Nodal gradients of N variables.
///
/// Layout: `data[(i * N + var) * 2 + dim]` with dim 0 = ∂/∂x, 1 = ∂/∂y.
#[derive(Clone, Debug, PartialEq)]
pub struct NodalGradient<const N: usize> {
    /// Gradient components in interleaved layout
    pub data: Vec<f64>,
    /// Number of nodes
    pub n_nodes: usize,
}

impl<const N: usize> NodalGradient<N> {
    /// Create a new gradient storage initialized to zero.
    pub fn zeros(n_nodes: usize) -> Self {
        Self {
            data: vec![0.0; n_nodes * N * 2],
            n_nodes,
        }
    }

    /// Gradient `[∂/∂x, ∂/∂y]` of variable var at node i.
    #[inline(always)]
    pub fn get(&self, i: usize, var: usize) -> [f64; 2] {
        let base = (i * N + var) * 2;
        [self.data[base], self.data[base + 1]]
    }

    /// Set the gradient of variable var at node i.
    #[inline(always)]
    pub fn set(&mut self, i: usize, var: usize, grad: [f64; 2]) {
        let base = (i * N + var) * 2;
        self.data[base] = grad[0];
        self.data[base + 1] = grad[1];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_layout() {
        let mut field = NodalField::<4>::zeros(3);
        field.set(1, [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(field.data[4..8], [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(field.get_var(1, 2), 3.0);

        field.set_var(2, 0, -5.0);
        assert_eq!(field.get(2), [-5.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_field_from_fn() {
        let field = NodalField::<2>::from_fn(3, |i| [i as f64, 2.0 * i as f64]);
        assert_eq!(field.get(2), [2.0, 4.0]);
    }

    #[test]
    fn test_gradient_layout() {
        let mut grad = NodalGradient::<4>::zeros(2);
        grad.set(1, 3, [0.5, -0.5]);
        assert_eq!(grad.get(1, 3), [0.5, -0.5]);
        assert_eq!(grad.data[(4 + 3) * 2], 0.5);
        assert_eq!(grad.data[(4 + 3) * 2 + 1], -0.5);
    }
}

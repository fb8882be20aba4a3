//! 2D unstructured grid of triangles and quadrilaterals for node-centered schemes.
//!
//! The grid stores:
//! - Node coordinates and the per-node neighbor list (the LSQ stencil)
//! - Element-node connectivity (counter-clockwise ordering)
//! - A unique edge list, each edge shared by one or two elements
//! - Node-to-element connectivity
//!
//! Neighbor lists are derived from the edge list: every edge `(n1, n2)`
//! appends `n2` to the list of `n1` and `n1` to the list of `n2`, in edge order.
//! Edge order follows element order, so the neighbor graph is deterministic
//! for a given connectivity.

use std::collections::HashMap;

use thiserror::Error;

use crate::types::{EdgeIndex, ElementIndex, NodeIndex};

/// Error type for grid construction.
#[derive(Debug, Error)]
pub enum GridError {
    /// Connectivity refers to a node that does not exist.
    #[error("{owner} refers to node {node}, but the grid has only {n_nodes} nodes")]
    NodeOutOfRange {
        owner: String,
        node: usize,
        n_nodes: usize,
    },

    /// Element with an unsupported vertex count or a repeated vertex.
    #[error("Degenerate element {element}: vertices {vertices:?}")]
    DegenerateElement {
        element: ElementIndex,
        vertices: Vec<usize>,
    },

    /// A node lists the same neighbor more than once.
    #[error("Node {node} lists neighbor {neighbor} more than once")]
    DuplicateNeighbor { node: NodeIndex, neighbor: usize },

    /// Input arrays of inconsistent or invalid size.
    #[error("Invalid grid dimensions: {0}")]
    InvalidDimensions(String),
}

/// Element shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Triangle,
    Quadrilateral,
}

/// A triangle or quadrilateral element.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    /// Node indices in counter-clockwise order (3 or 4 entries)
    pub vertices: Vec<usize>,
}

impl Element {
    /// Element shape from the vertex count.
    pub fn kind(&self) -> ElementKind {
        if self.vertices.len() == 3 {
            ElementKind::Triangle
        } else {
            ElementKind::Quadrilateral
        }
    }

    /// Iterate over the local edges `(v_k, v_{k+1})`.
    pub fn local_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |k| (self.vertices[k], self.vertices[(k + 1) % n]))
    }
}

/// Information about an edge in the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    /// First node (as first seen in element traversal)
    pub n1: usize,
    /// Second node
    pub n2: usize,
    /// Element that first referenced this edge
    pub e1: ElementIndex,
    /// Second element (None for boundary edges)
    pub e2: Option<ElementIndex>,
}

impl Edge {
    /// Check if this is a boundary edge.
    pub fn is_boundary(&self) -> bool {
        self.e2.is_none()
    }
}

/// Nodal data owned by the grid: coordinates and stencil.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// x-coordinate
    pub x: f64,
    /// y-coordinate
    pub y: f64,
    /// Ordered neighbor list (direct stencil)
    pub nghbr: Vec<usize>,
    /// Elements sharing this node
    pub elms: Vec<ElementIndex>,
}

impl Node {
    fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            nghbr: Vec::new(),
            elms: Vec::new(),
        }
    }

    /// Number of direct neighbors.
    #[inline]
    pub fn n_neighbors(&self) -> usize {
        self.nghbr.len()
    }
}

/// 2D node-centered grid of triangles and quadrilaterals.
#[derive(Clone, Debug)]
pub struct Grid2D {
    /// Nodes with coordinates and neighbor lists
    pub nodes: Vec<Node>,
    /// Element-node connectivity (empty for stencil-only grids)
    pub elements: Vec<Element>,
    /// Unique edges (empty for stencil-only grids)
    pub edges: Vec<Edge>,
}

impl Grid2D {
    /// Build a grid from node coordinates and element connectivity.
    ///
    /// # Arguments
    /// * `coords` - Node coordinates `(x, y)`
    /// * `elements` - Per element, 3 (triangle) or 4 (quad) node indices,
    ///   counter-clockwise
    pub fn from_elements(
        coords: Vec<(f64, f64)>,
        elements: Vec<Vec<usize>>,
    ) -> Result<Self, GridError> {
        let n_nodes = coords.len();
        if n_nodes == 0 {
            return Err(GridError::InvalidDimensions("no nodes".to_string()));
        }

        let mut nodes: Vec<Node> = coords.iter().map(|&(x, y)| Node::at(x, y)).collect();
        let elements: Vec<Element> = elements
            .into_iter()
            .map(|vertices| Element { vertices })
            .collect();

        for (k, elm) in elements.iter().enumerate() {
            let id = ElementIndex::new(k);
            let nv = elm.vertices.len();
            let repeated = (0..nv).any(|a| (a + 1..nv).any(|b| elm.vertices[a] == elm.vertices[b]));
            if !(nv == 3 || nv == 4) || repeated {
                return Err(GridError::DegenerateElement {
                    element: id,
                    vertices: elm.vertices.clone(),
                });
            }
            for &v in &elm.vertices {
                if v >= n_nodes {
                    return Err(GridError::NodeOutOfRange {
                        owner: id.to_string(),
                        node: v,
                        n_nodes,
                    });
                }
                nodes[v].elms.push(id);
            }
        }

        // Unique edges in element traversal order
        let mut edge_map: HashMap<(usize, usize), EdgeIndex> = HashMap::new();
        let mut edges: Vec<Edge> = Vec::new();

        for (k, elm) in elements.iter().enumerate() {
            for (v0, v1) in elm.local_edges() {
                let key = (v0.min(v1), v0.max(v1));
                match edge_map.get(&key) {
                    Some(&idx) => edges[idx.get()].e2 = Some(ElementIndex::new(k)),
                    None => {
                        edge_map.insert(key, EdgeIndex::new(edges.len()));
                        edges.push(Edge {
                            n1: v0,
                            n2: v1,
                            e1: ElementIndex::new(k),
                            e2: None,
                        });
                    }
                }
            }
        }

        for edge in &edges {
            nodes[edge.n1].nghbr.push(edge.n2);
            nodes[edge.n2].nghbr.push(edge.n1);
        }

        Ok(Self {
            nodes,
            elements,
            edges,
        })
    }

    /// Build a stencil-only grid from coordinates and explicit neighbor lists.
    ///
    /// Neighbor order is preserved. A neighbor list may contain the node
    /// itself; that defect is reported by the LSQ builders, not here.
    pub fn from_neighbor_lists(
        coords: Vec<(f64, f64)>,
        neighbors: Vec<Vec<usize>>,
    ) -> Result<Self, GridError> {
        let n_nodes = coords.len();
        if neighbors.len() != n_nodes {
            return Err(GridError::InvalidDimensions(format!(
                "{} coordinates but {} neighbor lists",
                n_nodes,
                neighbors.len()
            )));
        }

        let mut nodes = Vec::with_capacity(n_nodes);
        for (i, (&(x, y), nghbr)) in coords.iter().zip(neighbors).enumerate() {
            for (k, &n) in nghbr.iter().enumerate() {
                if n >= n_nodes {
                    return Err(GridError::NodeOutOfRange {
                        owner: NodeIndex::new(i).to_string(),
                        node: n,
                        n_nodes,
                    });
                }
                if nghbr[..k].contains(&n) {
                    return Err(GridError::DuplicateNeighbor {
                        node: NodeIndex::new(i),
                        neighbor: n,
                    });
                }
            }
            nodes.push(Node {
                x,
                y,
                nghbr,
                elms: Vec::new(),
            });
        }

        Ok(Self {
            nodes,
            elements: Vec::new(),
            edges: Vec::new(),
        })
    }

    /// Number of nodes.
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of elements.
    #[inline]
    pub fn n_elements(&self) -> usize {
        self.elements.len()
    }

    /// Number of edges.
    #[inline]
    pub fn n_edges(&self) -> usize {
        self.edges.len()
    }

    /// Number of triangular elements.
    pub fn n_triangles(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| e.kind() == ElementKind::Triangle)
            .count()
    }

    /// Number of quadrilateral elements.
    pub fn n_quads(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| e.kind() == ElementKind::Quadrilateral)
            .count()
    }

    /// Coordinates of node `i`.
    #[inline]
    pub fn coords(&self, i: usize) -> (f64, f64) {
        let node = &self.nodes[i];
        (node.x, node.y)
    }

    /// Ordered direct neighbors of node `i`.
    #[inline]
    pub fn neighbors(&self, i: usize) -> &[usize] {
        &self.nodes[i].nghbr
    }

    /// Total number of extended-stencil pairs of node `i`
    /// (sum of the neighbor counts of its direct neighbors).
    pub fn extended_stencil_len(&self, i: usize) -> usize {
        self.neighbors(i)
            .iter()
            .map(|&n| self.nodes[n].n_neighbors())
            .sum()
    }

    /// Minimum edge length (or minimum neighbor distance for stencil-only grids).
    pub fn h_min(&self) -> f64 {
        let mut h_min = f64::INFINITY;
        for (i, node) in self.nodes.iter().enumerate() {
            for &n in &node.nghbr {
                if n > i {
                    let (xn, yn) = self.coords(n);
                    let len = ((xn - node.x).powi(2) + (yn - node.y).powi(2)).sqrt();
                    h_min = h_min.min(len);
                }
            }
        }
        h_min
    }
}

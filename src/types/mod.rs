//! Strongly-typed index types for safer APIs.

mod indices;

pub use indices::{EdgeIndex, ElementIndex, NodeIndex};

//! Strongly-typed index newtypes.
//!
//! These types keep node, element and edge indices of a [`Grid2D`]
//! from being mixed up in diagnostics and connectivity tables.
//!
//! [`Grid2D`]: crate::mesh::Grid2D

use std::fmt;

/// Declares a `usize` newtype with a display prefix.
macro_rules! define_index {
    (
        $(#[$meta:meta])*
        $name:ident, $prefix:literal
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(usize);

        impl $name {
            #[inline]
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            #[inline]
            pub const fn get(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_index!(
    /// Node index in a grid.
    ///
    /// Nodes carry the unknowns of the node-centered scheme.
    ///
    /// # Example
    ///
    /// ```
    /// use ncfv_rs::types::NodeIndex;
    ///
    /// let node = NodeIndex::new(3);
    /// assert_eq!(node.get(), 3);
    /// assert_eq!(node.to_string(), "N3");
    /// ```
    NodeIndex,
    "N"
);

define_index!(
    /// Element (triangle or quadrilateral) index in a grid.
    ElementIndex,
    "E"
);

define_index!(
    /// Edge index in a grid.
    ///
    /// Each edge connects two nodes and contributes one entry to
    /// the neighbor list of each endpoint.
    EdgeIndex,
    "D"
);

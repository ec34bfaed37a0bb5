pub mod avl_set;

pub use avl_set::AvlSet;

/// The error type for [`AvlSet::validate`], describing the first broken invariant found.
///
/// Depths are counted from the root, which has depth 0.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantError {
    /// Two adjacent elements of the in-order sequence are not strictly ascending
    /// under the set's order, typically because the order is inconsistent.
    #[error("elements out of order at in-order position {position}")]
    OutOfOrder {
        /// Position of the second element of the offending pair.
        position: usize,
    },

    /// The heights of a node's subtrees differ by more than one.
    #[error("node at depth {depth} has balance factor {balance}")]
    Unbalanced {
        /// Depth of the node.
        depth: usize,
        /// Height of the right subtree minus height of the left subtree.
        balance: i32,
    },

    /// A node's cached height does not match the height of its subtree.
    #[error("node at depth {depth} caches height {cached}, actual height is {computed}")]
    StaleHeight {
        /// Depth of the node.
        depth: usize,
        /// Cached value.
        cached: i32,
        /// Recomputed value.
        computed: i32,
    },

    /// A node's cached balance factor does not match its subtrees.
    #[error("node at depth {depth} caches balance {cached}, actual balance is {computed}")]
    StaleBalance {
        /// Depth of the node.
        depth: usize,
        /// Cached value.
        cached: i32,
        /// Recomputed value.
        computed: i32,
    },

    /// A node's parent link does not point at the node that holds it as a child.
    #[error("parent link broken at depth {depth}")]
    BrokenParent {
        /// Depth of the node.
        depth: usize,
    },

    /// The recorded length differs from the number of reachable nodes.
    #[error("length is {len} but {count} nodes are reachable")]
    LenMismatch {
        /// Recorded length.
        len: usize,
        /// Nodes counted (counting stops once it exceeds `len`).
        count: usize,
    },
}

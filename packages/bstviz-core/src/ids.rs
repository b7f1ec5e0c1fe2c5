#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Key stored in the tree. Ordered and comparable; integers in practice.
pub type Value = i64;

/// Index of a node slot inside the tree arena.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Which child link of a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Side {
    Left,
    Right,
}

/// A place in the tree that can hold a subtree: the root slot or one child link of a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Link {
    Root,
    Child(NodeId, Side),
}

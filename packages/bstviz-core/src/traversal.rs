use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::ids::{NodeId, Value};
use crate::tree::TreeStore;

/// The four classic traversal orders.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TraversalKind {
    Inorder,
    Preorder,
    Postorder,
    Levelorder,
}

impl TraversalKind {
    pub const ALL: [TraversalKind; 4] = [
        TraversalKind::Inorder,
        TraversalKind::Preorder,
        TraversalKind::Postorder,
        TraversalKind::Levelorder,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TraversalKind::Inorder => "inorder",
            TraversalKind::Preorder => "preorder",
            TraversalKind::Postorder => "postorder",
            TraversalKind::Levelorder => "levelorder",
        }
    }
}

impl fmt::Display for TraversalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TraversalKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inorder" => Ok(TraversalKind::Inorder),
            "preorder" => Ok(TraversalKind::Preorder),
            "postorder" => Ok(TraversalKind::Postorder),
            "levelorder" | "level_order" | "level-order" => Ok(TraversalKind::Levelorder),
            _ => Err(Error::UnknownTraversal(s.to_string())),
        }
    }
}

pub fn traverse(tree: &TreeStore, kind: TraversalKind) -> Vec<Value> {
    match kind {
        TraversalKind::Inorder => inorder(tree),
        TraversalKind::Preorder => preorder(tree),
        TraversalKind::Postorder => postorder(tree),
        TraversalKind::Levelorder => level_order(tree),
    }
}

/// Left subtree, node, right subtree. Ascending for a valid BST.
pub fn inorder(tree: &TreeStore) -> Vec<Value> {
    let mut out = Vec::with_capacity(tree.size());
    let mut stack: Vec<NodeId> = Vec::new();
    let mut current = tree.root();
    loop {
        while let Some(node) = current.and_then(|id| tree.node(id)) {
            stack.push(node.id);
            current = node.left;
        }
        let Some(node) = stack.pop().and_then(|id| tree.node(id)) else {
            break;
        };
        out.push(node.value);
        current = node.right;
    }
    out
}

/// Node, left subtree, right subtree.
pub fn preorder(tree: &TreeStore) -> Vec<Value> {
    let mut out = Vec::with_capacity(tree.size());
    let mut stack: Vec<NodeId> = tree.root().into_iter().collect();
    while let Some(node) = stack.pop().and_then(|id| tree.node(id)) {
        out.push(node.value);
        // right first so the left subtree is popped next
        stack.extend(node.right);
        stack.extend(node.left);
    }
    out
}

/// Left subtree, right subtree, node.
pub fn postorder(tree: &TreeStore) -> Vec<Value> {
    // Reverse of a node-right-left walk.
    let mut out = Vec::with_capacity(tree.size());
    let mut stack: Vec<NodeId> = tree.root().into_iter().collect();
    while let Some(node) = stack.pop().and_then(|id| tree.node(id)) {
        out.push(node.value);
        stack.extend(node.left);
        stack.extend(node.right);
    }
    out.reverse();
    out
}

/// Breadth-first, left to right within each level.
pub fn level_order(tree: &TreeStore) -> Vec<Value> {
    let mut out = Vec::with_capacity(tree.size());
    let mut queue: VecDeque<NodeId> = tree.root().into_iter().collect();
    while let Some(node) = queue.pop_front().and_then(|id| tree.node(id)) {
        out.push(node.value);
        queue.extend(node.left);
        queue.extend(node.right);
    }
    out
}

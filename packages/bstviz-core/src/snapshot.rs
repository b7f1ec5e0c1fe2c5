use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ids::{NodeId, Value};
use crate::tree::TreeStore;

/// Owned copy of one node and its subtrees.
///
/// Clone, equality, Debug and Drop walk the subtree with an explicit stack, so a degenerate chain
/// of any depth is safe to hold. Serialization nests one level per tree level and therefore uses
/// native stack proportional to the height; `serde_json` refuses to read back more than 128
/// levels.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeSnapshot {
    pub value: Value,
    pub left: Option<Box<NodeSnapshot>>,
    pub right: Option<Box<NodeSnapshot>>,
}

impl NodeSnapshot {
    pub fn leaf(value: Value) -> Self {
        Self {
            value,
            left: None,
            right: None,
        }
    }
}

impl Drop for NodeSnapshot {
    fn drop(&mut self) {
        let mut stack: Vec<Box<NodeSnapshot>> = Vec::new();
        stack.extend(self.left.take());
        stack.extend(self.right.take());
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

impl Clone for NodeSnapshot {
    fn clone(&self) -> Self {
        // Postorder: both children are finished before their parent is assembled.
        let mut pending = vec![(self, false)];
        let mut done: Vec<NodeSnapshot> = Vec::new();
        while let Some((node, children_done)) = pending.pop() {
            if children_done {
                let left = node.left.as_ref().and_then(|_| done.pop()).map(Box::new);
                let right = node.right.as_ref().and_then(|_| done.pop()).map(Box::new);
                done.push(NodeSnapshot {
                    value: node.value,
                    left,
                    right,
                });
            } else {
                pending.push((node, true));
                pending.extend(node.left.as_deref().map(|l| (l, false)));
                pending.extend(node.right.as_deref().map(|r| (r, false)));
            }
        }
        done.pop().unwrap_or_else(|| NodeSnapshot::leaf(self.value))
    }
}

impl PartialEq for NodeSnapshot {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            if a.value != b.value {
                return false;
            }
            for (x, y) in [(&a.left, &b.left), (&a.right, &b.right)] {
                match (x.as_deref(), y.as_deref()) {
                    (Some(x), Some(y)) => stack.push((x, y)),
                    (None, None) => {}
                    _ => return false,
                }
            }
        }
        true
    }
}

impl Eq for NodeSnapshot {}

impl fmt::Debug for NodeSnapshot {
    /// Preorder `value(left, right)`, `_` marking a missing child.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        enum Token<'a> {
            Node(&'a NodeSnapshot),
            Text(&'static str),
        }
        fn child(c: &Option<Box<NodeSnapshot>>) -> Token<'_> {
            c.as_deref().map_or(Token::Text("_"), Token::Node)
        }

        let mut stack = vec![Token::Node(self)];
        while let Some(token) = stack.pop() {
            match token {
                Token::Text(text) => f.write_str(text)?,
                Token::Node(node) => {
                    write!(f, "{}", node.value)?;
                    if node.left.is_none() && node.right.is_none() {
                        continue;
                    }
                    stack.push(Token::Text(")"));
                    stack.push(child(&node.right));
                    stack.push(Token::Text(", "));
                    stack.push(child(&node.left));
                    stack.push(Token::Text("("));
                }
            }
        }
        Ok(())
    }
}

/// Deep copy of the tree's shape plus summary statistics.
///
/// Shares nothing with the live store, so later mutations never show through.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TreeSnapshot {
    pub root: Option<NodeSnapshot>,
    pub size: usize,
    pub height: i64,
    pub is_empty: bool,
}

impl Default for TreeSnapshot {
    fn default() -> Self {
        Self {
            root: None,
            size: 0,
            height: -1,
            is_empty: true,
        }
    }
}

impl TreeSnapshot {
    pub fn capture(tree: &TreeStore) -> Self {
        Self {
            root: tree.root().and_then(|root| build(tree, root)),
            size: tree.size(),
            height: tree.height(),
            is_empty: tree.is_empty(),
        }
    }
}

// Builds bottom-up from an explicit postorder so deep, degenerate trees do not recurse.
fn build(tree: &TreeStore, root: NodeId) -> Option<NodeSnapshot> {
    let mut order = Vec::with_capacity(tree.size());
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if let Some(node) = tree.node(id) {
            order.push(node);
            stack.extend(node.left);
            stack.extend(node.right);
        }
    }

    let mut built: HashMap<NodeId, NodeSnapshot> = HashMap::with_capacity(order.len());
    for node in order.into_iter().rev() {
        let left = node.left.and_then(|id| built.remove(&id)).map(Box::new);
        let right = node.right.and_then(|id| built.remove(&id)).map(Box::new);
        built.insert(
            node.id,
            NodeSnapshot {
                value: node.value,
                left,
                right,
            },
        );
    }
    built.remove(&root)
}

impl fmt::Display for TreeSnapshot {
    /// Sideways rendering: right subtrees above their parent, left subtrees below.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(root) = &self.root else {
            return f.write_str("Empty BST");
        };
        f.write_str(&render(root).join("\n"))
    }
}

// Reverse inorder (right, node, left) with an explicit stack; each frame carries its line prefix.
fn render(root: &NodeSnapshot) -> Vec<String> {
    enum Frame<'a> {
        Enter(&'a NodeSnapshot, String, bool),
        Emit(&'a NodeSnapshot, String, bool),
    }

    let mut lines = Vec::new();
    let mut stack = vec![Frame::Enter(root, String::new(), true)];
    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Emit(node, prefix, is_left) => {
                let connector = if is_left { "└── " } else { "┌── " };
                lines.push(format!("{prefix}{connector}{}", node.value));
            }
            Frame::Enter(node, prefix, is_left) => {
                let (above, below) = if is_left {
                    ("│   ", "    ")
                } else {
                    ("    ", "│   ")
                };
                if let Some(left) = node.left.as_deref() {
                    stack.push(Frame::Enter(left, format!("{prefix}{below}"), true));
                }
                let right = node.right.as_deref();
                let right_prefix = format!("{prefix}{above}");
                stack.push(Frame::Emit(node, prefix, is_left));
                if let Some(right) = right {
                    stack.push(Frame::Enter(right, right_prefix, false));
                }
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::Side;

    #[test]
    fn empty_snapshot() {
        let snapshot = TreeSnapshot::capture(&TreeStore::new());
        assert_eq!(snapshot, TreeSnapshot::default());
        assert_eq!(snapshot.to_string(), "Empty BST");
    }

    #[test]
    fn captures_shape_and_stats() {
        let mut tree = TreeStore::new();
        let root = tree.set_root(10);
        tree.attach(root, Side::Left, 5).unwrap();
        tree.attach(root, Side::Right, 15).unwrap();

        let snapshot = TreeSnapshot::capture(&tree);
        assert_eq!(
            snapshot.root,
            Some(NodeSnapshot {
                value: 10,
                left: Some(Box::new(NodeSnapshot::leaf(5))),
                right: Some(Box::new(NodeSnapshot::leaf(15))),
            })
        );
        assert_eq!(snapshot.size, 3);
        assert_eq!(snapshot.height, 1);
        assert!(!snapshot.is_empty);
    }

    #[test]
    fn snapshot_is_independent_of_later_mutation() {
        let mut tree = TreeStore::new();
        let root = tree.set_root(10);
        let before = TreeSnapshot::capture(&tree);
        tree.attach(root, Side::Left, 5).unwrap();
        tree.set_value(root, 11).unwrap();
        assert_eq!(before.root, Some(NodeSnapshot::leaf(10)));
        assert_eq!(before.size, 1);
    }

    #[test]
    fn renders_sideways() {
        let mut tree = TreeStore::new();
        let root = tree.set_root(5);
        tree.attach(root, Side::Left, 3).unwrap();
        tree.attach(root, Side::Right, 8).unwrap();
        let rendered = TreeSnapshot::capture(&tree).to_string();
        assert_eq!(rendered, "│   ┌── 8\n└── 5\n    └── 3");
    }

    #[test]
    fn renders_nested_connectors() {
        let mut tree = TreeStore::new();
        let root = tree.set_root(5);
        let three = tree.attach(root, Side::Left, 3).unwrap();
        let eight = tree.attach(root, Side::Right, 8).unwrap();
        tree.attach(three, Side::Right, 4).unwrap();
        tree.attach(eight, Side::Left, 7).unwrap();
        let rendered = TreeSnapshot::capture(&tree).to_string();
        assert_eq!(
            rendered,
            "│   ┌── 8\n│   │   └── 7\n└── 5\n    │   ┌── 4\n    └── 3"
        );
    }

    #[test]
    fn debug_lists_children_in_preorder() {
        let node = NodeSnapshot {
            value: 5,
            left: Some(Box::new(NodeSnapshot::leaf(3))),
            right: None,
        };
        assert_eq!(format!("{node:?}"), "5(3, _)");
    }

    #[test]
    fn deep_chain_snapshot_is_stack_safe() {
        const DEPTH: i64 = 100_000;
        let mut tree = TreeStore::new();
        let mut tail = tree.set_root(0);
        for value in 1..DEPTH {
            tail = tree.attach(tail, Side::Right, value).unwrap();
        }

        let snapshot = TreeSnapshot::capture(&tree);
        assert_eq!(snapshot.height, DEPTH - 1);
        assert_eq!(snapshot.size, DEPTH as usize);

        let copy = snapshot.clone();
        assert_eq!(copy, snapshot);
        let mut other = TreeSnapshot::capture(&tree);
        tree.set_value(tail, -1).unwrap();
        assert_eq!(other, snapshot);
        other = TreeSnapshot::capture(&tree);
        assert_ne!(other, snapshot);

        drop(copy);
        drop(other);
        drop(snapshot);
    }
}

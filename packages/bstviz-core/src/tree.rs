use std::collections::{HashSet, VecDeque};

use crate::error::{Error, Result};
use crate::ids::{Link, NodeId, Side, Value};

#[derive(Clone, Debug)]
struct NodeState {
    value: Value,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl NodeState {
    fn leaf(value: Value) -> Self {
        Self {
            value,
            left: None,
            right: None,
        }
    }

    fn child_mut(&mut self, side: Side) -> &mut Option<NodeId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// Copy of a single node's fields, detached from the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeView {
    pub id: NodeId,
    pub value: Value,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl NodeView {
    pub fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Arena-backed binary search tree storage.
///
/// Nodes live in a slot vector and refer to their children by `NodeId`. Every live node is
/// reachable from the root through exactly one parent link; the store never keeps back-pointers.
/// The ordering invariant is maintained by the operation engine, not by these primitives.
#[derive(Clone, Debug, Default)]
pub struct TreeStore {
    slots: Vec<Option<NodeState>>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
    len: usize,
}

impl TreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn root_node(&self) -> Option<NodeView> {
        self.root.and_then(|id| self.node(id))
    }

    pub fn node(&self, id: NodeId) -> Option<NodeView> {
        self.slots
            .get(id.index())
            .and_then(|slot| slot.as_ref())
            .map(|state| NodeView {
                id,
                value: state.value,
                left: state.left,
                right: state.right,
            })
    }

    /// Like [`TreeStore::node`], but a dangling id is reported as corruption.
    pub fn expect_node(&self, id: NodeId) -> Result<NodeView> {
        self.node(id)
            .ok_or_else(|| Error::InconsistentState(format!("dangling node id {}", id.0)))
    }

    pub fn value(&self, id: NodeId) -> Option<Value> {
        self.node(id).map(|n| n.value)
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Edge count of the longest root-to-leaf path. The empty tree has height -1.
    pub fn height(&self) -> i64 {
        let mut height = -1;
        let mut level: Vec<NodeId> = self.root.into_iter().collect();
        while !level.is_empty() {
            height += 1;
            level = level
                .iter()
                .filter_map(|id| self.node(*id))
                .flat_map(|n| [n.left, n.right])
                .flatten()
                .collect();
        }
        height
    }

    /// Node currently held at `link`, if any.
    pub fn subtree_at(&self, link: Link) -> Option<NodeView> {
        let id = match link {
            Link::Root => self.root,
            Link::Child(parent, side) => self.node(parent).and_then(|p| p.child(side)),
        }?;
        self.node(id)
    }

    /// Discard the current contents and make `value` the only node.
    pub fn set_root(&mut self, value: Value) -> NodeId {
        self.clear();
        let id = self.alloc(value);
        self.root = Some(id);
        id
    }

    /// Create a new leaf under `parent` on `side`. The link must be empty.
    pub fn attach(&mut self, parent: NodeId, side: Side, value: Value) -> Result<NodeId> {
        match self.node(parent) {
            None => {
                return Err(Error::InconsistentState(format!(
                    "attach under missing node {}",
                    parent.0
                )))
            }
            Some(p) if p.child(side).is_some() => {
                return Err(Error::InconsistentState(format!(
                    "{side:?} link of node {} is occupied",
                    p.value
                )))
            }
            Some(_) => {}
        }
        let id = self.alloc(value);
        if let Some(state) = self.state_mut(parent) {
            *state.child_mut(side) = Some(id);
        }
        Ok(id)
    }

    /// Point `link` at `subtree`, returning whatever it held before.
    ///
    /// The previous subtree is detached but not freed; callers either re-link it or release the
    /// nodes with [`TreeStore::remove`].
    pub fn replace_at(&mut self, link: Link, subtree: Option<NodeId>) -> Result<Option<NodeId>> {
        match link {
            Link::Root => Ok(std::mem::replace(&mut self.root, subtree)),
            Link::Child(parent, side) => match self.state_mut(parent) {
                Some(state) => Ok(std::mem::replace(state.child_mut(side), subtree)),
                None => Err(Error::InconsistentState(format!(
                    "replace under missing node {}",
                    parent.0
                ))),
            },
        }
    }

    pub fn set_value(&mut self, id: NodeId, value: Value) -> Result<()> {
        match self.state_mut(id) {
            Some(state) => {
                state.value = value;
                Ok(())
            }
            None => Err(Error::InconsistentState(format!(
                "set value on missing node {}",
                id.0
            ))),
        }
    }

    /// Release a node slot that has already been unlinked from the tree.
    pub fn remove(&mut self, id: NodeId) -> Result<Value> {
        let state = self
            .slots
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or_else(|| Error::InconsistentState(format!("remove of missing node {}", id.0)))?;
        self.free.push(id);
        self.len -= 1;
        Ok(state.value)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.root = None;
        self.len = 0;
    }

    /// Validate invariants: strict BST ordering, every live slot reachable exactly once from the
    /// root, and a size counter that matches. Intended for tests and debugging.
    pub fn validate_invariants(&self) -> Result<()> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();
        if let Some(root) = self.root {
            queue.push_back((root, None::<Value>, None::<Value>));
        }
        while let Some((id, low, high)) = queue.pop_front() {
            if !seen.insert(id) {
                return Err(Error::InconsistentState(format!(
                    "node {} reachable more than once",
                    id.0
                )));
            }
            let node = self.expect_node(id)?;
            if low.is_some_and(|l| node.value <= l) || high.is_some_and(|h| node.value >= h) {
                return Err(Error::InconsistentState(format!(
                    "value {} violates ordering bounds",
                    node.value
                )));
            }
            if let Some(left) = node.left {
                queue.push_back((left, low, Some(node.value)));
            }
            if let Some(right) = node.right {
                queue.push_back((right, Some(node.value), high));
            }
        }

        let live = self.slots.iter().filter(|s| s.is_some()).count();
        if seen.len() != self.len || live != self.len {
            return Err(Error::InconsistentState(format!(
                "size {} but {} reachable and {} live nodes",
                self.len,
                seen.len(),
                live
            )));
        }
        Ok(())
    }

    fn alloc(&mut self, value: Value) -> NodeId {
        self.len += 1;
        if let Some(id) = self.free.pop() {
            self.slots[id.index()] = Some(NodeState::leaf(value));
            return id;
        }
        let id = NodeId(self.slots.len() as u32);
        self.slots.push(Some(NodeState::leaf(value)));
        id
    }

    fn state_mut(&mut self, id: NodeId) -> Option<&mut NodeState> {
        self.slots.get_mut(id.index()).and_then(|slot| slot.as_mut())
    }
}

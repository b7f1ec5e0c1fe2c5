use crate::ids::{Side, Value};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One decision point of an algorithm run, in the order it happened.
///
/// `value` is always the value the operation was invoked with. `current_node` is the value held
/// by the node being examined at that point.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "action", rename_all = "snake_case"))]
pub enum Step {
    InsertRoot {
        value: Value,
    },
    InsertLeft {
        value: Value,
        parent: Value,
    },
    InsertRight {
        value: Value,
        parent: Value,
    },
    TraverseLeft {
        value: Value,
        current_node: Value,
    },
    TraverseRight {
        value: Value,
        current_node: Value,
    },
    DuplicateFound {
        value: Value,
        current_node: Value,
    },
    VisitNode {
        value: Value,
        current_node: Value,
    },
    Found {
        value: Value,
        current_node: Value,
    },
    NotFound {
        value: Value,
    },
    DeleteVisit {
        value: Value,
        current_node: Value,
    },
    /// The deleted node had no left child; `replacement` is the right child moved into its place.
    DeleteNoLeft {
        value: Value,
        replacement: Option<Value>,
    },
    DeleteNoRight {
        value: Value,
        replacement: Option<Value>,
    },
    DeleteTwoChildren {
        value: Value,
        successor: Value,
    },
    DeleteNotFound {
        value: Value,
    },
}

impl Step {
    pub(crate) fn traverse(side: Side, value: Value, current_node: Value) -> Self {
        match side {
            Side::Left => Step::TraverseLeft {
                value,
                current_node,
            },
            Side::Right => Step::TraverseRight {
                value,
                current_node,
            },
        }
    }

    pub(crate) fn inserted(side: Side, value: Value, parent: Value) -> Self {
        match side {
            Side::Left => Step::InsertLeft { value, parent },
            Side::Right => Step::InsertRight { value, parent },
        }
    }

    /// Wire name of the step kind.
    pub fn action(&self) -> &'static str {
        match self {
            Step::InsertRoot { .. } => "insert_root",
            Step::InsertLeft { .. } => "insert_left",
            Step::InsertRight { .. } => "insert_right",
            Step::TraverseLeft { .. } => "traverse_left",
            Step::TraverseRight { .. } => "traverse_right",
            Step::DuplicateFound { .. } => "duplicate_found",
            Step::VisitNode { .. } => "visit_node",
            Step::Found { .. } => "found",
            Step::NotFound { .. } => "not_found",
            Step::DeleteVisit { .. } => "delete_visit",
            Step::DeleteNoLeft { .. } => "delete_no_left",
            Step::DeleteNoRight { .. } => "delete_no_right",
            Step::DeleteTwoChildren { .. } => "delete_two_children",
            Step::DeleteNotFound { .. } => "delete_not_found",
        }
    }

    pub fn value(&self) -> Value {
        match self {
            Step::InsertRoot { value }
            | Step::InsertLeft { value, .. }
            | Step::InsertRight { value, .. }
            | Step::TraverseLeft { value, .. }
            | Step::TraverseRight { value, .. }
            | Step::DuplicateFound { value, .. }
            | Step::VisitNode { value, .. }
            | Step::Found { value, .. }
            | Step::NotFound { value }
            | Step::DeleteVisit { value, .. }
            | Step::DeleteNoLeft { value, .. }
            | Step::DeleteNoRight { value, .. }
            | Step::DeleteTwoChildren { value, .. }
            | Step::DeleteNotFound { value } => *value,
        }
    }

    /// Value of the node being examined, for the kinds that visit a node.
    pub fn current_node(&self) -> Option<Value> {
        match self {
            Step::TraverseLeft { current_node, .. }
            | Step::TraverseRight { current_node, .. }
            | Step::DuplicateFound { current_node, .. }
            | Step::VisitNode { current_node, .. }
            | Step::Found { current_node, .. }
            | Step::DeleteVisit { current_node, .. } => Some(*current_node),
            _ => None,
        }
    }
}

/// Ordered, append-only record of the steps taken by one operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StepLog {
    steps: Vec<Step>,
}

impl StepLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Append another log, keeping chronological order.
    pub fn append(&mut self, other: StepLog) {
        self.steps.extend(other.steps);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    pub fn as_slice(&self) -> &[Step] {
        &self.steps
    }

    pub fn actions(&self) -> Vec<&'static str> {
        self.steps.iter().map(Step::action).collect()
    }
}

impl<'a> IntoIterator for &'a StepLog {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

use std::cmp::Ordering;

use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::ids::{Link, Side, Value};
use crate::snapshot::TreeSnapshot;
use crate::steps::{Step, StepLog};
use crate::traits::{RngSource, ValueSource};
use crate::traversal::{self, TraversalKind};
use crate::tree::{NodeView, TreeStore};

const FALLBACK_SEED: u64 = 0x5eed_b57;

/// Result of an algorithm run together with the steps it took.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Traced<T> {
    pub outcome: T,
    pub steps: StepLog,
}

impl<T> Traced<T> {
    fn new(outcome: T, steps: StepLog) -> Self {
        Self { outcome, steps }
    }
}

/// Insert `value`, returning whether the tree grew. Duplicates leave the tree unchanged.
pub fn insert(tree: &mut TreeStore, value: Value) -> Result<Traced<bool>> {
    let mut steps = StepLog::new();
    let Some(mut current) = tree.root_node() else {
        tree.set_root(value);
        steps.push(Step::InsertRoot { value });
        return Ok(Traced::new(true, steps));
    };

    loop {
        let side = match value.cmp(&current.value) {
            Ordering::Less => Side::Left,
            Ordering::Greater => Side::Right,
            Ordering::Equal => {
                steps.push(Step::DuplicateFound {
                    value,
                    current_node: current.value,
                });
                return Ok(Traced::new(false, steps));
            }
        };
        match current.child(side) {
            Some(next) => {
                steps.push(Step::traverse(side, value, current.value));
                current = tree.expect_node(next)?;
            }
            None => {
                tree.attach(current.id, side, value)?;
                steps.push(Step::inserted(side, value, current.value));
                return Ok(Traced::new(true, steps));
            }
        }
    }
}

/// Look up `value` without touching the tree. One `visit_node` per node entered.
pub fn search(tree: &TreeStore, value: Value) -> Result<Traced<bool>> {
    let mut steps = StepLog::new();
    let mut next = tree.root();
    while let Some(id) = next {
        let node = tree.expect_node(id)?;
        steps.push(Step::VisitNode {
            value,
            current_node: node.value,
        });
        next = match value.cmp(&node.value) {
            Ordering::Less => node.left,
            Ordering::Greater => node.right,
            Ordering::Equal => {
                steps.push(Step::Found {
                    value,
                    current_node: node.value,
                });
                return Ok(Traced::new(true, steps));
            }
        };
    }
    steps.push(Step::NotFound { value });
    Ok(Traced::new(false, steps))
}

/// Remove `value`, returning whether it was present.
///
/// A node with two children takes its inorder successor's value and the successor node is
/// spliced out of the right subtree; that removal adds no steps, so `delete_two_children` is the
/// final record.
pub fn delete(tree: &mut TreeStore, value: Value) -> Result<Traced<bool>> {
    let mut steps = StepLog::new();
    let mut link = Link::Root;
    loop {
        let Some(node) = tree.subtree_at(link) else {
            steps.push(Step::DeleteNotFound { value });
            return Ok(Traced::new(false, steps));
        };
        steps.push(Step::DeleteVisit {
            value,
            current_node: node.value,
        });
        link = match value.cmp(&node.value) {
            Ordering::Less => Link::Child(node.id, Side::Left),
            Ordering::Greater => Link::Child(node.id, Side::Right),
            Ordering::Equal => {
                steps.push(splice_out(tree, link, node)?);
                return Ok(Traced::new(true, steps));
            }
        };
    }
}

fn splice_out(tree: &mut TreeStore, link: Link, node: NodeView) -> Result<Step> {
    match (node.left, node.right) {
        (None, right) => {
            let replacement = right.and_then(|id| tree.value(id));
            tree.replace_at(link, right)?;
            tree.remove(node.id)?;
            Ok(Step::DeleteNoLeft {
                value: node.value,
                replacement,
            })
        }
        (Some(left), None) => {
            let replacement = tree.value(left);
            tree.replace_at(link, Some(left))?;
            tree.remove(node.id)?;
            Ok(Step::DeleteNoRight {
                value: node.value,
                replacement,
            })
        }
        (Some(_), Some(right)) => {
            let mut successor_link = Link::Child(node.id, Side::Right);
            let mut successor = tree.expect_node(right)?;
            while let Some(next) = successor.left {
                successor_link = Link::Child(successor.id, Side::Left);
                successor = tree.expect_node(next)?;
            }
            tree.replace_at(successor_link, successor.right)?;
            tree.remove(successor.id)?;
            tree.set_value(node.id, successor.value)?;
            Ok(Step::DeleteTwoChildren {
                value: node.value,
                successor: successor.value,
            })
        }
    }
}

/// What a mutating or searching operation hands back to its caller.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OperationOutcome {
    pub success: bool,
    pub message: String,
    pub tree_state: TreeSnapshot,
    pub operation_steps: StepLog,
}

/// Owner of the tree and of the step log of the most recent operation.
///
/// Every operation replaces the step log before it runs. Traversals and snapshots read the tree
/// directly and leave the log alone.
pub struct BstEngine<V = RngSource<ChaCha8Rng>>
where
    V: ValueSource,
{
    tree: TreeStore,
    steps: StepLog,
    config: EngineConfig,
    source: V,
}

impl BstEngine {
    /// Engine drawing random values from a ChaCha generator seeded by `config.random.seed`.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let seed = config.random.seed.unwrap_or_else(clock_seed);
        Self::with_source(config, RngSource::seeded(seed))
    }
}

impl Default for BstEngine {
    fn default() -> Self {
        let config = EngineConfig::default();
        let seed = config.random.seed.unwrap_or_else(clock_seed);
        Self {
            tree: TreeStore::new(),
            steps: StepLog::new(),
            config,
            source: RngSource::seeded(seed),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(FALLBACK_SEED)
}

#[cfg(target_arch = "wasm32")]
fn clock_seed() -> u64 {
    FALLBACK_SEED
}

impl<V: ValueSource> BstEngine<V> {
    pub fn with_source(config: EngineConfig, source: V) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            tree: TreeStore::new(),
            steps: StepLog::new(),
            config,
            source,
        })
    }

    pub fn tree(&self) -> &TreeStore {
        &self.tree
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Steps recorded by the most recent operation.
    pub fn last_steps(&self) -> &StepLog {
        &self.steps
    }

    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot::capture(&self.tree)
    }

    pub fn traversal(&self, kind: TraversalKind) -> Vec<Value> {
        traversal::traverse(&self.tree, kind)
    }

    pub fn insert(&mut self, value: Value) -> Result<OperationOutcome> {
        self.steps = StepLog::new();
        let traced = insert(&mut self.tree, value)?;
        debug!(value, inserted = traced.outcome, steps = traced.steps.len(), "insert");
        let message = if traced.outcome {
            format!("Value {value} inserted successfully")
        } else {
            format!("Value {value} already exists")
        };
        Ok(self.finish(traced, message))
    }

    pub fn search(&mut self, value: Value) -> Result<OperationOutcome> {
        self.steps = StepLog::new();
        let traced = search(&self.tree, value)?;
        debug!(value, found = traced.outcome, steps = traced.steps.len(), "search");
        let message = if traced.outcome {
            format!("Value {value} found")
        } else {
            format!("Value {value} not found")
        };
        Ok(self.finish(traced, message))
    }

    pub fn delete(&mut self, value: Value) -> Result<OperationOutcome> {
        self.steps = StepLog::new();
        let traced = delete(&mut self.tree, value)?;
        debug!(value, deleted = traced.outcome, steps = traced.steps.len(), "delete");
        let message = if traced.outcome {
            format!("Value {value} deleted successfully")
        } else {
            format!("Value {value} not found")
        };
        Ok(self.finish(traced, message))
    }

    /// Drop every node. Records no steps.
    pub fn clear(&mut self) -> OperationOutcome {
        let removed = self.tree.size();
        self.tree.clear();
        info!(removed, "tree cleared");
        self.finish(
            Traced::new(true, StepLog::new()),
            "Tree cleared successfully".to_string(),
        )
    }

    /// Replace the tree with a random batch of distinct values.
    ///
    /// The batch size is drawn from `[min_count, max_count]`; each draw runs the ordinary insert,
    /// so a repeated value only adds a `duplicate_found` step. Drawing stops once the batch is
    /// complete or `batch * max_attempts_per_value` draws have been spent.
    pub fn random(&mut self) -> Result<OperationOutcome> {
        let cfg = self.config.random;
        self.steps = StepLog::new();
        self.tree.clear();

        let target = self.source.draw_count(cfg.min_count..=cfg.max_count);
        let budget = target.saturating_mul(cfg.max_attempts_per_value);
        let mut steps = StepLog::new();
        let mut attempts = 0;
        while self.tree.size() < target && attempts < budget {
            attempts += 1;
            let value = self.source.draw_value(cfg.min_value..=cfg.max_value);
            steps.append(insert(&mut self.tree, value)?.steps);
        }

        let size = self.tree.size();
        info!(target, size, attempts, "random tree generated");
        Ok(self.finish(
            Traced::new(true, steps),
            format!("Random tree generated with {size} values"),
        ))
    }

    fn finish(&mut self, traced: Traced<bool>, message: String) -> OperationOutcome {
        self.steps = traced.steps;
        OperationOutcome {
            success: traced.outcome,
            message,
            tree_state: self.snapshot(),
            operation_steps: self.steps.clone(),
        }
    }
}

use std::collections::VecDeque;
use std::ops::RangeInclusive;

use bstviz_core::{BstEngine, EngineConfig, RandomConfig, Step, TraversalKind, ValueSource};

/// Replays fixed draws, falling back to the range start when exhausted.
struct Scripted {
    count: usize,
    values: VecDeque<i64>,
}

impl ValueSource for Scripted {
    fn draw_count(&mut self, range: RangeInclusive<usize>) -> usize {
        self.count.clamp(*range.start(), *range.end())
    }

    fn draw_value(&mut self, range: RangeInclusive<i64>) -> i64 {
        self.values.pop_front().unwrap_or(*range.start())
    }
}

fn seeded(seed: u64) -> BstEngine {
    BstEngine::new(EngineConfig {
        random: RandomConfig {
            seed: Some(seed),
            ..RandomConfig::default()
        },
    })
    .unwrap()
}

#[test]
fn same_seed_same_tree() {
    let mut a = seeded(2024);
    let mut b = seeded(2024);
    let first = a.random().unwrap();
    let second = b.random().unwrap();
    assert_eq!(first, second);
    assert_eq!(
        a.traversal(TraversalKind::Preorder),
        b.traversal(TraversalKind::Preorder)
    );
}

#[test]
fn duplicates_are_skipped_through_insert() {
    let source = Scripted {
        count: 3,
        values: VecDeque::from(vec![7, 7, 3, 9]),
    };
    let config = EngineConfig {
        random: RandomConfig {
            min_count: 1,
            max_count: 3,
            ..RandomConfig::default()
        },
    };
    let mut engine = BstEngine::with_source(config, source).unwrap();
    let outcome = engine.random().unwrap();

    assert_eq!(engine.traversal(TraversalKind::Inorder), vec![3, 7, 9]);
    assert_eq!(
        outcome.operation_steps.as_slice(),
        &[
            Step::InsertRoot { value: 7 },
            Step::DuplicateFound {
                value: 7,
                current_node: 7
            },
            Step::InsertLeft {
                value: 3,
                parent: 7
            },
            Step::InsertRight {
                value: 9,
                parent: 7
            },
        ]
    );
    assert_eq!(outcome.message, "Random tree generated with 3 values");
}

#[test]
fn attempt_budget_guarantees_termination() {
    let config = EngineConfig {
        random: RandomConfig {
            min_count: 4,
            max_count: 4,
            max_attempts_per_value: 2,
            ..RandomConfig::default()
        },
    };
    // Every draw is the same value; only one node can ever be inserted.
    let source = Scripted {
        count: 4,
        values: VecDeque::new(),
    };
    let mut engine = BstEngine::with_source(config, source).unwrap();
    let outcome = engine.random().unwrap();

    assert_eq!(outcome.tree_state.size, 1);
    assert_eq!(outcome.operation_steps.len(), 8);
    assert_eq!(
        outcome
            .operation_steps
            .iter()
            .filter(|s| s.action() == "duplicate_found")
            .count(),
        7
    );
}

#[test]
fn random_discards_previous_tree() {
    let mut engine = seeded(5);
    engine.insert(1000).unwrap();
    engine.random().unwrap();
    assert!(!engine.search(1000).unwrap().success);
    engine.tree().validate_invariants().unwrap();
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let config = EngineConfig {
        random: RandomConfig {
            min_count: 30,
            max_count: 30,
            ..RandomConfig::default()
        },
    };
    assert!(BstEngine::new(config).is_err());
}

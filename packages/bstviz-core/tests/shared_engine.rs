use std::thread;

use bstviz_core::{BstEngine, Request, Response, SharedEngine, TraversalKind};

#[test]
fn concurrent_inserts_are_serialized() {
    let shared = SharedEngine::new(BstEngine::default());
    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let shared = shared.clone();
            thread::spawn(move || {
                for i in 0..50 {
                    shared.insert(worker * 1000 + i).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(shared.snapshot().size, 200);
    let inorder = shared.traversal(TraversalKind::Inorder);
    assert!(inorder.windows(2).all(|w| w[0] < w[1]));
    shared.with(|engine| engine.tree().validate_invariants()).unwrap();
}

#[test]
fn each_response_carries_its_own_steps() {
    let shared = SharedEngine::new(BstEngine::default());
    let handles: Vec<_> = (0..8)
        .map(|value| {
            let shared = shared.clone();
            thread::spawn(move || shared.execute(Request::Insert(value)).unwrap())
        })
        .collect();
    for handle in handles {
        let Response::Operation(outcome) = handle.join().unwrap() else {
            panic!("insert should answer with an operation outcome");
        };
        assert!(outcome.success);
        // every trace ends in exactly one structural insert for the value it was issued for
        let last = outcome.operation_steps.last().unwrap();
        assert!(last.action().starts_with("insert_"));
        assert!(outcome
            .operation_steps
            .iter()
            .all(|step| step.value() == last.value()));
    }
    assert_eq!(shared.snapshot().size, 8);
}

#[test]
fn concurrent_mixed_workload_keeps_invariants() {
    let shared = SharedEngine::new(BstEngine::default());
    for v in 0..100 {
        shared.insert(v).unwrap();
    }
    let deleters: Vec<_> = (0..2)
        .map(|parity| {
            let shared = shared.clone();
            thread::spawn(move || {
                for v in (parity..100).step_by(4) {
                    shared.delete(v).unwrap();
                }
            })
        })
        .collect();
    let searcher = {
        let shared = shared.clone();
        thread::spawn(move || {
            for v in 0..100 {
                shared.search(v).unwrap();
            }
        })
    };
    for handle in deleters {
        handle.join().unwrap();
    }
    searcher.join().unwrap();

    assert_eq!(shared.snapshot().size, 50);
    shared.with(|engine| engine.tree().validate_invariants()).unwrap();
}

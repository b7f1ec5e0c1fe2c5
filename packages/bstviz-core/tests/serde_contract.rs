#[cfg(feature = "serde")]
mod json {
    use bstviz_core::{BstEngine, EngineConfig, Error, RandomConfig, Request, Response, Step};
    use serde_json::{json, Value};

    fn engine_with(values: &[i64]) -> BstEngine {
        let mut engine = BstEngine::new(EngineConfig {
            random: RandomConfig {
                seed: Some(1),
                ..RandomConfig::default()
            },
        })
        .unwrap();
        for v in values {
            engine.insert(*v).unwrap();
        }
        engine
    }

    #[test]
    fn steps_serialize_with_action_tag() {
        let step = Step::InsertLeft {
            value: 3,
            parent: 5,
        };
        assert_eq!(
            serde_json::to_value(&step).unwrap(),
            json!({"action": "insert_left", "value": 3, "parent": 5})
        );

        let step = Step::DeleteTwoChildren {
            value: 3,
            successor: 4,
        };
        assert_eq!(
            serde_json::to_value(&step).unwrap(),
            json!({"action": "delete_two_children", "value": 3, "successor": 4})
        );

        // the wire tag and `Step::action` must never drift apart
        for step in [
            Step::InsertRoot { value: 1 },
            Step::TraverseRight {
                value: 1,
                current_node: 0,
            },
            Step::VisitNode {
                value: 1,
                current_node: 0,
            },
            Step::NotFound { value: 1 },
            Step::DeleteNoLeft {
                value: 1,
                replacement: None,
            },
            Step::DeleteNotFound { value: 1 },
        ] {
            let json = serde_json::to_value(&step).unwrap();
            assert_eq!(json["action"], step.action());
            let back: Step = serde_json::from_value(json).unwrap();
            assert_eq!(back, step);
        }
    }

    #[test]
    fn operation_response_shape() {
        let mut engine = engine_with(&[5, 3]);
        let response = engine.execute(Request::Insert(8)).unwrap();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Value 8 inserted successfully");
        assert_eq!(
            json["tree_state"],
            json!({
                "root": {
                    "value": 5,
                    "left": {"value": 3, "left": null, "right": null},
                    "right": {"value": 8, "left": null, "right": null}
                },
                "size": 3,
                "height": 1,
                "is_empty": false
            })
        );
        assert_eq!(
            json["operation_steps"],
            json!([{"action": "insert_right", "value": 8, "parent": 5}])
        );
    }

    #[test]
    fn empty_state_and_traversal_shapes() {
        let mut engine = engine_with(&[]);
        let state = serde_json::to_value(engine.execute(Request::State).unwrap()).unwrap();
        assert_eq!(
            state,
            json!({
                "tree_state": {"root": null, "size": 0, "height": -1, "is_empty": true},
                "operation_steps": []
            })
        );

        let mut engine = engine_with(&[2, 1, 3]);
        let traversal = engine
            .execute(Request::from_json(r#"{"op":"traversal","traversal":"postorder"}"#).unwrap())
            .unwrap();
        let json: Value = serde_json::to_value(&traversal).unwrap();
        assert_eq!(json["traversal"], json!([1, 3, 2]));
        assert!(matches!(traversal, Response::Traversal(_)));
    }

    #[test]
    fn json_requests_validate_before_running() {
        assert_eq!(
            Request::from_json(r#"{"op":"insert","value":4}"#).unwrap(),
            Request::Insert(4)
        );
        assert!(matches!(
            Request::from_json(r#"{"op":"insert","value":"four"}"#),
            Err(Error::InvalidRequest(_))
        ));
        assert!(matches!(
            Request::from_json(r#"{"op":"balance"}"#),
            Err(Error::UnknownOperation(op)) if op == "balance"
        ));
        assert!(matches!(
            Request::from_json(r#"{"op":"traversal","traversal":"spiral"}"#),
            Err(Error::UnknownTraversal(_))
        ));
    }
}

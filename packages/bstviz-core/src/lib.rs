#![forbid(unsafe_code)]
//! Binary search tree engine with step instrumentation.
//! Every insert, delete, and search returns the ordered list of decisions the algorithm made, so a
//! frontend can replay it one micro-step at a time. The crate has no transport of its own; hosts
//! call [`BstEngine`] directly, share it through [`SharedEngine`], or feed it [`Request`]s.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod ids;
pub mod shared;
pub mod snapshot;
pub mod steps;
pub mod traits;
pub mod traversal;
pub mod tree;

pub use api::{
    HeightResponse, RawRequest, Request, Response, SizeResponse, TraversalResponse,
    TreeStateResponse,
};
pub use config::{EngineConfig, RandomConfig};
pub use engine::{BstEngine, OperationOutcome, Traced};
pub use error::{Error, Result};
pub use ids::{Link, NodeId, Side, Value};
pub use shared::SharedEngine;
pub use snapshot::{NodeSnapshot, TreeSnapshot};
pub use steps::{Step, StepLog};
pub use traits::{RngSource, ValueSource};
pub use traversal::TraversalKind;
pub use tree::{NodeView, TreeStore};

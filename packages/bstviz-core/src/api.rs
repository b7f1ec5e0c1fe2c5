//! Transport-agnostic request/response contract.
//!
//! A request is validated in full (operation name, required value, traversal type) before the
//! engine is touched, so a rejected request never mutates the tree.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::{BstEngine, OperationOutcome};
use crate::error::{Error, Result};
use crate::ids::Value;
use crate::snapshot::TreeSnapshot;
use crate::steps::StepLog;
use crate::traits::ValueSource;
use crate::traversal::TraversalKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Request {
    State,
    Insert(Value),
    Delete(Value),
    Search(Value),
    Clear,
    Random,
    Traversal(TraversalKind),
    Height,
    Size,
}

/// Untyped request as it arrives from a caller: `{"op": "insert", "value": 5}`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawRequest {
    pub op: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: Option<Value>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub traversal: Option<String>,
}

impl Request {
    pub fn parse(op: &str, value: Option<Value>, traversal: Option<&str>) -> Result<Self> {
        let need_value = |op: &str| {
            value.ok_or_else(|| Error::InvalidRequest(format!("{op} requires an integer value")))
        };
        match op.trim().to_ascii_lowercase().as_str() {
            "state" | "tree" => Ok(Request::State),
            "insert" => Ok(Request::Insert(need_value("insert")?)),
            "delete" => Ok(Request::Delete(need_value("delete")?)),
            "search" => Ok(Request::Search(need_value("search")?)),
            "clear" => Ok(Request::Clear),
            "random" => Ok(Request::Random),
            "traversal" => {
                let kind = traversal.ok_or_else(|| {
                    Error::InvalidRequest("traversal requires a traversal type".into())
                })?;
                Ok(Request::Traversal(kind.parse()?))
            }
            "height" => Ok(Request::Height),
            "size" => Ok(Request::Size),
            _ => Err(Error::UnknownOperation(op.to_string())),
        }
    }

    /// Parse the JSON form. A body that is not a request object, or whose `value` is not an
    /// integer, is an `InvalidRequest`; an unrecognised `op` is an `UnknownOperation`.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawRequest =
            serde_json::from_str(json).map_err(|e| Error::InvalidRequest(e.to_string()))?;
        Request::try_from(raw)
    }

    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Request::Insert(_) | Request::Delete(_) | Request::Clear | Request::Random
        )
    }
}

impl TryFrom<RawRequest> for Request {
    type Error = Error;

    fn try_from(raw: RawRequest) -> Result<Self> {
        Request::parse(&raw.op, raw.value, raw.traversal.as_deref())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TreeStateResponse {
    pub tree_state: TreeSnapshot,
    pub operation_steps: StepLog,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraversalResponse {
    pub traversal: Vec<Value>,
    pub tree_state: TreeSnapshot,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeightResponse {
    pub height: i64,
    pub tree_state: TreeSnapshot,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SizeResponse {
    pub size: usize,
    pub tree_state: TreeSnapshot,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Response {
    Operation(OperationOutcome),
    State(TreeStateResponse),
    Traversal(TraversalResponse),
    Height(HeightResponse),
    Size(SizeResponse),
}

impl<V: ValueSource> BstEngine<V> {
    /// Current tree with an empty step list.
    pub fn state(&self) -> TreeStateResponse {
        TreeStateResponse {
            tree_state: self.snapshot(),
            operation_steps: StepLog::new(),
        }
    }

    pub fn execute(&mut self, request: Request) -> Result<Response> {
        debug!(?request, mutating = request.is_mutating(), "execute");
        Ok(match request {
            Request::State => Response::State(self.state()),
            Request::Insert(value) => Response::Operation(self.insert(value)?),
            Request::Delete(value) => Response::Operation(self.delete(value)?),
            Request::Search(value) => Response::Operation(self.search(value)?),
            Request::Clear => Response::Operation(self.clear()),
            Request::Random => Response::Operation(self.random()?),
            Request::Traversal(kind) => Response::Traversal(TraversalResponse {
                traversal: self.traversal(kind),
                tree_state: self.snapshot(),
            }),
            Request::Height => Response::Height(HeightResponse {
                height: self.tree().height(),
                tree_state: self.snapshot(),
            }),
            Request::Size => Response::Size(SizeResponse {
                size: self.tree().size(),
                tree_state: self.snapshot(),
            }),
        })
    }

    /// Validate and run an untyped request.
    pub fn dispatch(&mut self, raw: RawRequest) -> Result<Response> {
        let request =
            Request::try_from(raw).inspect_err(|e| warn!(error = %e, "rejected request"))?;
        self.execute(request)
    }
}

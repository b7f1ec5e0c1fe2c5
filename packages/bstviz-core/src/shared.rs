use std::sync::Arc;

use parking_lot::Mutex;

use crate::api::{RawRequest, Request, Response};
use crate::engine::{BstEngine, OperationOutcome};
use crate::error::Result;
use crate::ids::Value;
use crate::snapshot::TreeSnapshot;
use crate::traits::ValueSource;
use crate::traversal::TraversalKind;

/// Cloneable handle to one engine, for hosts that serve concurrent callers.
///
/// Each call holds the lock for the whole operation, so two operations never interleave on the
/// tree and every caller observes either all or none of another caller's mutation.
pub struct SharedEngine<V: ValueSource = crate::traits::RngSource<rand_chacha::ChaCha8Rng>> {
    inner: Arc<Mutex<BstEngine<V>>>,
}

impl<V: ValueSource> Clone for SharedEngine<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: ValueSource> SharedEngine<V> {
    pub fn new(engine: BstEngine<V>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    pub fn execute(&self, request: Request) -> Result<Response> {
        self.inner.lock().execute(request)
    }

    pub fn dispatch(&self, raw: RawRequest) -> Result<Response> {
        self.inner.lock().dispatch(raw)
    }

    pub fn insert(&self, value: Value) -> Result<OperationOutcome> {
        self.inner.lock().insert(value)
    }

    pub fn delete(&self, value: Value) -> Result<OperationOutcome> {
        self.inner.lock().delete(value)
    }

    pub fn search(&self, value: Value) -> Result<OperationOutcome> {
        self.inner.lock().search(value)
    }

    pub fn clear(&self) -> OperationOutcome {
        self.inner.lock().clear()
    }

    pub fn random(&self) -> Result<OperationOutcome> {
        self.inner.lock().random()
    }

    pub fn traversal(&self, kind: TraversalKind) -> Vec<Value> {
        self.inner.lock().traversal(kind)
    }

    pub fn snapshot(&self) -> TreeSnapshot {
        self.inner.lock().snapshot()
    }

    /// Run `f` with exclusive access to the engine.
    pub fn with<R>(&self, f: impl FnOnce(&mut BstEngine<V>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl<V: ValueSource> From<BstEngine<V>> for SharedEngine<V> {
    fn from(engine: BstEngine<V>) -> Self {
        Self::new(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_one_tree() {
        let a = SharedEngine::new(BstEngine::default());
        let b = a.clone();
        a.insert(5).unwrap();
        b.insert(3).unwrap();
        assert_eq!(a.traversal(TraversalKind::Inorder), vec![3, 5]);
        assert_eq!(b.with(|engine| engine.last_steps().actions()), vec!["insert_left"]);
    }
}

#![forbid(unsafe_code)]
//! WASM-friendly bridge for the BST engine.
//! Exposes a small wasm-bindgen surface matching what the visualizer frontend calls.

use bstviz_core::{
    BstEngine, EngineConfig, Error, RawRequest, Request, Response, TraversalKind, Value,
};
use serde::Serialize;
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

fn err_to_js(e: Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// `Number.MAX_SAFE_INTEGER`; anything larger cannot be handed back to JS unchanged.
const MAX_SAFE_INTEGER: Value = (1 << 53) - 1;

/// Reject non-integral or unsafe numbers before they reach the engine.
fn js_number_to_value(n: f64) -> Result<Value, Error> {
    if !n.is_finite() || n.fract() != 0.0 || n.abs() > MAX_SAFE_INTEGER as f64 {
        return Err(Error::InvalidRequest(format!(
            "expected a safe integer value, got {n}"
        )));
    }
    Ok(n as Value)
}

fn ensure_safe(value: Value) -> Result<Value, Error> {
    if value.unsigned_abs() > MAX_SAFE_INTEGER as u64 {
        return Err(Error::InvalidRequest(format!(
            "value {value} exceeds the JS safe integer range"
        )));
    }
    Ok(value)
}

/// Parse a JSON request, refusing values the bridge could not serialize back.
fn parse_request(request_json: &str) -> Result<RawRequest, Error> {
    let raw: RawRequest = serde_json::from_str(request_json)
        .map_err(|e| Error::InvalidRequest(format!("invalid request: {e}")))?;
    if let Some(value) = raw.value {
        ensure_safe(value)?;
    }
    Ok(raw)
}

fn parse_config(config_json: Option<&str>, seed: u32) -> Result<EngineConfig, Error> {
    let mut config = match config_json {
        Some(json) => EngineConfig::from_json(json)?,
        None => EngineConfig::default(),
    };
    ensure_safe(config.random.min_value)?;
    ensure_safe(config.random.max_value)?;
    config.random.seed.get_or_insert(u64::from(seed));
    Ok(config)
}

#[wasm_bindgen]
pub struct WasmBst {
    inner: BstEngine,
}

#[wasm_bindgen]
impl WasmBst {
    /// `seed` drives random populate; pass fresh entropy from JS for varied trees.
    /// `config_json` may override any field of the engine config.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32, config_json: Option<String>) -> Result<WasmBst, JsValue> {
        let config = parse_config(config_json.as_deref(), seed).map_err(err_to_js)?;
        let inner = BstEngine::new(config).map_err(err_to_js)?;
        Ok(WasmBst { inner })
    }

    #[wasm_bindgen(js_name = getTree)]
    pub fn state(&mut self) -> Result<JsValue, JsValue> {
        let response = self.inner.execute(Request::State).map_err(err_to_js)?;
        to_js(&response)
    }

    pub fn insert(&mut self, value: f64) -> Result<JsValue, JsValue> {
        let value = js_number_to_value(value).map_err(err_to_js)?;
        self.run(Request::Insert(value))
    }

    pub fn delete(&mut self, value: f64) -> Result<JsValue, JsValue> {
        let value = js_number_to_value(value).map_err(err_to_js)?;
        self.run(Request::Delete(value))
    }

    pub fn search(&mut self, value: f64) -> Result<JsValue, JsValue> {
        let value = js_number_to_value(value).map_err(err_to_js)?;
        self.run(Request::Search(value))
    }

    pub fn clear(&mut self) -> Result<JsValue, JsValue> {
        self.run(Request::Clear)
    }

    #[wasm_bindgen(js_name = generateRandom)]
    pub fn random(&mut self) -> Result<JsValue, JsValue> {
        self.run(Request::Random)
    }

    /// `kind` is one of `inorder`, `preorder`, `postorder`, `levelorder`.
    pub fn traversal(&mut self, kind: String) -> Result<JsValue, JsValue> {
        let kind: TraversalKind = kind.parse().map_err(err_to_js)?;
        self.run(Request::Traversal(kind))
    }

    pub fn height(&mut self) -> Result<JsValue, JsValue> {
        self.run(Request::Height)
    }

    pub fn size(&mut self) -> Result<JsValue, JsValue> {
        self.run(Request::Size)
    }

    /// Run a request given as JSON, e.g. `{"op":"insert","value":5}`.
    pub fn dispatch(&mut self, request_json: String) -> Result<JsValue, JsValue> {
        let raw = parse_request(&request_json).map_err(err_to_js)?;
        let response = self.inner.dispatch(raw).map_err(err_to_js)?;
        to_js(&response)
    }

    /// Sideways text rendering of the current tree.
    #[wasm_bindgen(js_name = treeText)]
    pub fn tree_text(&self) -> String {
        self.inner.snapshot().to_string()
    }
}

impl WasmBst {
    fn run(&mut self, request: Request) -> Result<JsValue, JsValue> {
        let response: Response = self.inner.execute(request).map_err(err_to_js)?;
        to_js(&response)
    }
}

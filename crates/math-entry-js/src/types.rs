//! Types exposed to JavaScript via wasm-bindgen.

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;

use math_entry_browser::ResponseValue;

/// Single-field response: `{ base: { string } }`.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct JsBaseResponse {
    pub string: String,
}

/// Gap-mode response: `{ list: { string: [...] } }`.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct JsListResponse {
    pub string: Vec<String>,
}

/// Interaction response, also used as its serialized state.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "lowercase")]
pub enum JsResponse {
    Base(JsBaseResponse),
    List(JsListResponse),
}

impl From<ResponseValue> for JsResponse {
    fn from(value: ResponseValue) -> Self {
        match value {
            ResponseValue::Base(base) => JsResponse::Base(JsBaseResponse {
                string: base.string,
            }),
            ResponseValue::List(list) => JsResponse::List(JsListResponse {
                string: list.string,
            }),
        }
    }
}

//! ブラウザ側のカメラ・検出器実装

pub mod camera;
pub mod detector;

pub use camera::BrowserCamera;
pub use detector::{is_supported, BrowserDetector};

use wasm_bindgen::JsValue;

/// JSの例外から表示用メッセージを取り出す
pub fn js_error_message(error: &JsValue) -> String {
    if let Some(s) = error.as_string() {
        return s;
    }
    js_sys::Reflect::get(error, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", error))
}

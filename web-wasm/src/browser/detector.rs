//! BarcodeDetector API バインディング

use js_sys::{Array, Reflect};
use scanverify_common::{BarcodeFormat, BoundingBox, DetectionError, Detector, RawDetection};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlVideoElement;

mod ffi {
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen]
    extern "C" {
        #[derive(Debug, Clone)]
        pub type BarcodeDetector;

        #[wasm_bindgen(constructor, catch)]
        pub fn new(options: &JsValue) -> Result<BarcodeDetector, JsValue>;

        #[wasm_bindgen(method, catch)]
        pub fn detect(this: &BarcodeDetector, source: &web_sys::HtmlVideoElement) -> Result<js_sys::Promise, JsValue>;
    }
}

/// 実行環境に BarcodeDetector があるか
pub fn is_supported() -> bool {
    web_sys::window()
        .map(|window| Reflect::has(&window, &JsValue::from_str("BarcodeDetector")).unwrap_or(false))
        .unwrap_or(false)
}

/// 映像要素の現在フレームを検出する
#[derive(Debug, Clone)]
pub struct BrowserDetector {
    inner: ffi::BarcodeDetector,
    video: HtmlVideoElement,
}

impl BrowserDetector {
    /// 固定の形式セットで検出器を作成
    pub fn new(video: HtmlVideoElement) -> Result<Self, JsValue> {
        let formats: Array = BarcodeFormat::ALL
            .iter()
            .map(|f| JsValue::from_str(f.as_str()))
            .collect();
        let options = js_sys::Object::new();
        Reflect::set(&options, &JsValue::from_str("formats"), &formats)?;

        let inner = ffi::BarcodeDetector::new(&options)?;
        Ok(Self { inner, video })
    }
}

impl Detector for BrowserDetector {
    async fn detect(&mut self) -> Result<Vec<RawDetection>, DetectionError> {
        let promise = self.inner.detect(&self.video).map_err(describe)?;
        let value = JsFuture::from(promise).await.map_err(describe)?;

        Array::from(&value)
            .iter()
            .map(|item| to_raw_detection(&item))
            .collect()
    }
}

fn to_raw_detection(item: &JsValue) -> Result<RawDetection, DetectionError> {
    let raw_value = get(item, "rawValue")?
        .as_string()
        .ok_or_else(|| DetectionError("rawValue is not a string".into()))?;

    // DOMRectReadOnly はゲッターなので Reflect で読む
    let rect = get(item, "boundingBox")?;
    let bounding_box = BoundingBox {
        x: get_f64(&rect, "x")?,
        y: get_f64(&rect, "y")?,
        width: get_f64(&rect, "width")?,
        height: get_f64(&rect, "height")?,
    };

    let format = get(item, "format")
        .ok()
        .and_then(|f| f.as_string())
        .and_then(|f| BarcodeFormat::from_name(&f));

    Ok(RawDetection { raw_value, bounding_box, format })
}

fn get(target: &JsValue, key: &str) -> Result<JsValue, DetectionError> {
    Reflect::get(target, &JsValue::from_str(key)).map_err(describe)
}

fn get_f64(target: &JsValue, key: &str) -> Result<f64, DetectionError> {
    get(target, key)?
        .as_f64()
        .ok_or_else(|| DetectionError(format!("{} is not a number", key)))
}

fn describe(error: JsValue) -> DetectionError {
    DetectionError(super::js_error_message(&error))
}

//! Gemini API連携（静止画認識）
//!
//! リクエスト本文の組み立てとレスポンスの取り出しは scanverify_common を使い、
//! ここでは fetch による送受信のみを行う

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};
use scanverify_common::{
    build_recognition_request, endpoint_url, extract_candidate_text, parse_recognition_response,
    DataUri, GeminiRequest, GeminiResponse, RecognitionInput, RecognitionOutput, DEFAULT_MODEL,
};

/// APIキーをクエリに付けたエンドポイントURL
pub fn request_url(api_key: &str) -> String {
    let key: String = js_sys::encode_uri_component(api_key).into();
    format!("{}?key={}", endpoint_url(DEFAULT_MODEL), key)
}

/// Gemini API呼び出し（1リクエスト1レスポンス）
async fn call_gemini_api(api_key: &str, request: &GeminiRequest) -> Result<GeminiResponse, JsValue> {
    let url = request_url(api_key);
    let body = serde_json::to_string(request)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&JsValue::from_str(&body));

    let request = Request::new_with_str_and_init(&url, &opts)?;
    request.headers().set("Content-Type", "application/json")?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window is unavailable"))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let resp: Response = resp_value.dyn_into()?;

    if !resp.ok() {
        return Err(JsValue::from_str(&format!("API error: {}", resp.status())));
    }

    let json = JsFuture::from(resp.json()?).await?;
    let response: GeminiResponse = serde_wasm_bindgen::from_value(json)?;
    Ok(response)
}

/// 写真（Data URI）からシリアル番号を抽出
///
/// 構造化出力が得られない場合はエラー（空文字は返さない）
pub async fn recognize_barcode(
    api_key: &str,
    input: &RecognitionInput,
) -> Result<RecognitionOutput, JsValue> {
    let photo = DataUri::parse(&input.photo_data_uri)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let request = build_recognition_request(&photo);
    let response = call_gemini_api(api_key, &request).await?;

    extract_candidate_text(&response)
        .and_then(parse_recognition_response)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

//! Gemini API連携（reqwest）
//!
//! 1リクエスト1レスポンス。リトライ・ストリーミングはしない

use crate::error::{Result, ScanVerifyError};
use scanverify_common::gemini::endpoint_url;
use scanverify_common::{
    build_recognition_request, extract_candidate_text, parse_recognition_response, DataUri,
    GeminiResponse, RecognitionOutput,
};
use std::time::Duration;

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            endpoint: endpoint_url(model),
        })
    }

    /// エンドポイントを差し替える（ローカルのモックサーバー向け）
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 写真1枚からシリアル番号を抽出
    pub async fn recognize(&self, photo: &DataUri) -> Result<RecognitionOutput> {
        let request = build_recognition_request(photo);

        tracing::debug!(endpoint = %self.endpoint, mime = photo.mime_type(), "sending recognition request");
        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ScanVerifyError::ApiCall(format!("status {}: {}", status, body)));
        }

        let payload: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ScanVerifyError::ApiParse(e.to_string()))?;

        let text = extract_candidate_text(&payload)?;
        let output = parse_recognition_response(text)?;
        tracing::info!(serial_number = %output.serial_number, "serial number recognized");
        Ok(output)
    }
}

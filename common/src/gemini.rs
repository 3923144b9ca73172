//! Gemini API のリクエスト/レスポンス型
//!
//! HTTPの送受信はCLI（reqwest）とWeb（fetch）がそれぞれ持ち、
//! 本文の組み立てと取り出しはここで共有する。

use crate::data_uri::DataUri;
use crate::error::{Error, Result};
use crate::prompts::{build_recognition_prompt, recognition_schema};
use serde::{Deserialize, Serialize};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// generateContent のエンドポイントURL
pub fn endpoint_url(model: &str) -> String {
    format!("{}/{}:generateContent", GEMINI_API_BASE, model)
}

/// Gemini APIリクエスト
#[derive(Debug, Serialize)]
pub struct GeminiRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct GenerationConfig {
    pub temperature: f32,
    #[serde(rename = "responseMimeType")]
    pub response_mime_type: String,
    #[serde(rename = "responseSchema", skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
}

/// Gemini APIレスポンス
#[derive(Debug, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

/// 静止画認識リクエストを作成（指示文 + 画像1枚 + 出力スキーマ）
pub fn build_recognition_request(photo: &DataUri) -> GeminiRequest {
    GeminiRequest {
        contents: vec![Content {
            parts: vec![
                Part::Text { text: build_recognition_prompt() },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: photo.mime_type().to_string(),
                        data: photo.payload().to_string(),
                    },
                },
            ],
        }],
        generation_config: GenerationConfig {
            temperature: 0.1,
            response_mime_type: "application/json".to_string(),
            response_schema: Some(recognition_schema()),
        },
    }
}

/// 最初の候補の最初のテキストパートを取り出す
///
/// 候補なし・テキストなしは EmptyOutput
pub fn extract_candidate_text(response: &GeminiResponse) -> Result<&str> {
    response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .and_then(|c| c.parts.iter().find_map(|p| p.text.as_deref()))
        .filter(|text| !text.trim().is_empty())
        .ok_or(Error::EmptyOutput)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo() -> DataUri {
        DataUri::parse("data:image/png;base64,iVBORw0KGgo=").unwrap()
    }

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            endpoint_url("gemini-2.0-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_recognition_request_serialize() {
        let request = build_recognition_request(&photo());
        let json = serde_json::to_value(&request).expect("シリアライズ失敗");

        let parts = json["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert!(parts[0]["text"].as_str().unwrap().contains("serial number"));
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/png");
        assert_eq!(parts[1]["inline_data"]["data"], "iVBORw0KGgo=");

        let config = &json["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(config["responseSchema"]["required"][0], "serialNumber");
    }

    #[test]
    fn test_generation_config_without_schema() {
        let config = GenerationConfig {
            temperature: 0.5,
            response_mime_type: "text/plain".to_string(),
            response_schema: None,
        };
        let json = serde_json::to_string(&config).expect("シリアライズ失敗");
        assert!(json.contains("\"temperature\":0.5"));
        assert!(!json.contains("responseSchema"));
    }

    #[test]
    fn test_extract_candidate_text() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [{ "text": "{\"serialNumber\": \"T2132000111632\"}" }]
                }
            }]
        }"#;
        let response: GeminiResponse = serde_json::from_str(json).expect("デシリアライズ失敗");
        let text = extract_candidate_text(&response).unwrap();
        assert!(text.contains("T2132000111632"));
    }

    #[test]
    fn test_extract_candidate_text_no_candidates() {
        let response: GeminiResponse = serde_json::from_str(r#"{"promptFeedback": {}}"#).unwrap();
        assert!(matches!(extract_candidate_text(&response), Err(Error::EmptyOutput)));
    }

    #[test]
    fn test_extract_candidate_text_blocked_candidate() {
        let json = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(extract_candidate_text(&response), Err(Error::EmptyOutput)));
    }
}

//! APIレスポンスパーサー
//!
//! モデルの出力テキストからJSONオブジェクトを抽出し、
//! 静止画認識の結果（serialNumber）を取り出す

use crate::error::{Error, Result};
use crate::prompts::SERIAL_NUMBER_FIELD;
use crate::types::RecognitionOutput;

/// APIレスポンスからJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 本文中で最初に現れる {...} オブジェクト
/// 3. エラー
///
/// # Examples
/// ```
/// use scanverify_common::extract_json;
///
/// let response = "result: {\"serialNumber\": \"T2132000111632\"}";
/// let json = extract_json(response).unwrap();
/// assert!(json.starts_with('{'));
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    // 最初に読み切れたオブジェクトだけを返す（後続の文章は無視）
    for (start, _) in response.match_indices('{') {
        let mut stream = serde_json::Deserializer::from_str(&response[start..])
            .into_iter::<serde_json::Value>();
        if let Some(Ok(serde_json::Value::Object(_))) = stream.next() {
            return Ok(&response[start..start + stream.byte_offset()]);
        }
    }

    Err(Error::Parse("JSON object not found".into()))
}

/// 静止画認識レスポンスをパース
///
/// serialNumber が無い・文字列でない・空の場合は失敗（既定値は返さない）
pub fn parse_recognition_response(response: &str) -> Result<RecognitionOutput> {
    if response.trim().is_empty() {
        return Err(Error::EmptyOutput);
    }

    let json_str = extract_json(response)?;
    let value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| Error::Parse(format!("recognition JSON parse error: {}", e)))?;

    let Some(map) = value.as_object() else {
        return Err(Error::Parse("JSON object not found".into()));
    };

    match map.get(SERIAL_NUMBER_FIELD) {
        None | Some(serde_json::Value::Null) => Err(Error::EmptyOutput),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => Err(Error::EmptyOutput),
        Some(serde_json::Value::String(s)) => Ok(RecognitionOutput {
            serial_number: s.trim().to_string(),
        }),
        Some(other) => Err(Error::Parse(format!(
            "{} must be a string, got {}",
            SERIAL_NUMBER_FIELD, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_with_block() {
        let response = r#"Here is the result:
```json
{"serialNumber": "T2132000111632"}
```
Some additional text."#;

        let json = extract_json(response).unwrap();
        assert_eq!(json, r#"{"serialNumber": "T2132000111632"}"#);
    }

    #[test]
    fn test_extract_json_with_surrounding_text() {
        let response = r#"The code reads {"serialNumber": "ABC"} in the image."#;
        assert_eq!(extract_json(response).unwrap(), r#"{"serialNumber": "ABC"}"#);
    }

    #[test]
    fn test_extract_json_ignores_trailing_braces() {
        let response = r#"{"serialNumber": "A1"} (confidence {high})"#;
        assert_eq!(extract_json(response).unwrap(), r#"{"serialNumber": "A1"}"#);
        assert_eq!(parse_recognition_response(response).unwrap().serial_number, "A1");
    }

    #[test]
    fn test_extract_json_skips_non_json_braces() {
        let response = r#"Read {clearly}: {"serialNumber": "B2"}"#;
        assert_eq!(extract_json(response).unwrap(), r#"{"serialNumber": "B2"}"#);
    }

    #[test]
    fn test_extract_json_error() {
        let result = extract_json("No JSON here, just plain text.");
        if let Err(Error::Parse(msg)) = result {
            assert!(msg.contains("not found"));
        } else {
            panic!("Expected Parse error");
        }
    }

    #[test]
    fn test_parse_recognition_response() {
        let output = parse_recognition_response(r#"{"serialNumber": "T2132000111632"}"#).unwrap();
        assert_eq!(output.serial_number, "T2132000111632");
    }

    #[test]
    fn test_parse_recognition_response_fenced() {
        let response = "```json\n{\n  \"serialNumber\": \" 1234567890128 \"\n}\n```";
        let output = parse_recognition_response(response).unwrap();
        assert_eq!(output.serial_number, "1234567890128");
    }

    #[test]
    fn test_parse_missing_field_fails() {
        let result = parse_recognition_response(r#"{"serial": "T2132000111632"}"#);
        assert!(matches!(result, Err(Error::EmptyOutput)));
    }

    #[test]
    fn test_parse_empty_field_fails() {
        assert!(matches!(
            parse_recognition_response(r#"{"serialNumber": ""}"#),
            Err(Error::EmptyOutput)
        ));
        assert!(matches!(
            parse_recognition_response(r#"{"serialNumber": null}"#),
            Err(Error::EmptyOutput)
        ));
    }

    #[test]
    fn test_parse_non_string_field_fails() {
        let result = parse_recognition_response(r#"{"serialNumber": 42}"#);
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_empty_response_fails() {
        assert!(matches!(parse_recognition_response("   "), Err(Error::EmptyOutput)));
    }

    #[test]
    fn test_parse_invalid_json_fails() {
        let result = parse_recognition_response("{serialNumber: T21}");
        assert!(matches!(result, Err(Error::Parse(_))));
    }
}

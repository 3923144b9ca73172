//! プロンプト生成モジュール
//!
//! CLIとWeb(WASM)で共有される静止画認識用のプロンプトと出力スキーマ

use serde_json::{json, Value};

/// 出力スキーマの唯一のフィールド名
pub const SERIAL_NUMBER_FIELD: &str = "serialNumber";

/// 静止画認識プロンプト生成
///
/// 画像は別パート（inline_data）で渡すので、ここでは指示文のみ
pub fn build_recognition_prompt() -> String {
    format!(
        r#"You are an expert OCR reader specializing in extracting serial numbers from barcodes in images.

You will receive an image containing a barcode. Extract the serial number encoded in the barcode and return it.

Use the attached photo as the primary source of information about the barcode.

## Output format (strictly this JSON object)
{{
  "{field}": "the serial number extracted from the barcode"
}}"#,
        field = SERIAL_NUMBER_FIELD
    )
}

/// Geminiの responseSchema（文字列フィールド1つだけのオブジェクト）
pub fn recognition_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            SERIAL_NUMBER_FIELD: {
                "type": "STRING",
                "description": "The serial number extracted from the barcode."
            }
        },
        "required": [SERIAL_NUMBER_FIELD]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_output_field() {
        let prompt = build_recognition_prompt();
        assert!(prompt.contains("serial number"));
        assert!(prompt.contains("\"serialNumber\""));
    }

    #[test]
    fn test_schema_has_exactly_one_string_field() {
        let schema = recognition_schema();
        let properties = schema["properties"].as_object().unwrap();
        assert_eq!(properties.len(), 1);
        assert_eq!(properties["serialNumber"]["type"], "STRING");
        assert_eq!(schema["required"], json!(["serialNumber"]));
    }
}

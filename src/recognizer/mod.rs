mod client;

pub use client::GeminiClient;

use crate::config::Config;
use crate::error::Result;
use crate::scanner::ImageInfo;
use indicatif::{ProgressBar, ProgressStyle};
use scanverify_common::{DataUri, RecognitionOutput};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// フォルダ一括認識の1件分
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionRecord {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    /// 承認済みシリアル番号と一致したか
    #[serde(default)]
    pub approved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn client_from_config(config: &Config, model: Option<&str>) -> Result<GeminiClient> {
    let api_key = config.get_api_key()?;
    let model = model.unwrap_or(&config.model);
    GeminiClient::new(api_key, model, Duration::from_secs(config.timeout_seconds))
}

/// Data URI 文字列を検証して1回だけ認識
pub async fn recognize_data_uri(client: &GeminiClient, photo_data_uri: &str) -> Result<RecognitionOutput> {
    let photo = DataUri::parse(photo_data_uri)?;
    client.recognize(&photo).await
}

/// 画像ごとに独立したリクエストを順番に送る
///
/// 1枚の失敗は記録して次へ進む
pub async fn recognize_images(
    client: &GeminiClient,
    images: &[ImageInfo],
    approved_serial: &str,
    verbose: bool,
) -> Vec<RecognitionRecord> {
    let progress = ProgressBar::new(images.len() as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}") {
        progress.set_style(style);
    }

    let mut records = Vec::with_capacity(images.len());
    for image in images {
        progress.set_message(image.file_name.clone());

        let result = match crate::scanner::load_photo(&image.path) {
            Ok(photo) => client.recognize(&photo).await,
            Err(e) => Err(e),
        };

        let record = match result {
            Ok(output) => RecognitionRecord {
                file_name: image.file_name.clone(),
                approved: output.serial_number == approved_serial,
                serial_number: Some(output.serial_number),
                error: None,
            },
            Err(e) => {
                tracing::warn!(file = %image.file_name, error = %e, "recognition failed");
                RecognitionRecord {
                    file_name: image.file_name.clone(),
                    serial_number: None,
                    approved: false,
                    error: Some(e.to_string()),
                }
            }
        };

        if verbose {
            progress.println(format!(
                "  {}: {}",
                record.file_name,
                record.serial_number.as_deref().unwrap_or("-")
            ));
        }
        records.push(record);
        progress.inc(1);
    }
    progress.finish_and_clear();

    records
}

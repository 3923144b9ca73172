//! バーコード・認識の型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - BarcodeFormat / BoundingBox / RawDetection: 検出器の出力
//! - BarcodeStatus / BarcodeRecord: 判定結果（セッション中はメモ化）
//! - DetectedBarcode: フレームごとの描画用データ
//! - RecognitionInput / RecognitionOutput: 静止画認識フローの入出力

use serde::{Deserialize, Serialize};
use std::fmt;

/// 検出対象のバーコード形式
///
/// シリアライズ名はブラウザの BarcodeDetector が使う名前と一致させる
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarcodeFormat {
    QrCode,
    #[serde(rename = "ean_13")]
    Ean13,
    #[serde(rename = "code_128")]
    Code128,
    UpcA,
    DataMatrix,
    Aztec,
}

impl BarcodeFormat {
    /// 検出器に渡す固定の形式セット
    pub const ALL: [BarcodeFormat; 6] = [
        BarcodeFormat::QrCode,
        BarcodeFormat::Ean13,
        BarcodeFormat::Code128,
        BarcodeFormat::UpcA,
        BarcodeFormat::DataMatrix,
        BarcodeFormat::Aztec,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BarcodeFormat::QrCode => "qr_code",
            BarcodeFormat::Ean13 => "ean_13",
            BarcodeFormat::Code128 => "code_128",
            BarcodeFormat::UpcA => "upc_a",
            BarcodeFormat::DataMatrix => "data_matrix",
            BarcodeFormat::Aztec => "aztec",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

/// 軸平行の矩形（ソース映像のピクセル座標）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// 判定ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarcodeStatus {
    Pending,
    Approved,
    Rejected,
}

impl BarcodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BarcodeStatus::Pending => "pending",
            BarcodeStatus::Approved => "approved",
            BarcodeStatus::Rejected => "rejected",
        }
    }

    /// 判定が確定しているか（pending 以外）
    pub fn is_settled(&self) -> bool {
        !matches!(self, BarcodeStatus::Pending)
    }
}

impl fmt::Display for BarcodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 生値ごとの判定記録
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeRecord {
    pub status: BarcodeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
}

impl BarcodeRecord {
    pub fn pending() -> Self {
        Self { status: BarcodeStatus::Pending, serial_number: None }
    }

    pub fn approved(serial_number: impl Into<String>) -> Self {
        Self {
            status: BarcodeStatus::Approved,
            serial_number: Some(serial_number.into()),
        }
    }

    pub fn rejected() -> Self {
        Self { status: BarcodeStatus::Rejected, serial_number: None }
    }
}

/// 検出器が返す1件分のデータ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDetection {
    pub raw_value: String,
    pub bounding_box: BoundingBox,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<BarcodeFormat>,
}

impl RawDetection {
    pub fn new(raw_value: impl Into<String>, bounding_box: BoundingBox) -> Self {
        Self {
            raw_value: raw_value.into(),
            bounding_box,
            format: None,
        }
    }
}

/// フレームごとの描画用データ（フレームをまたいで保持しない）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedBarcode {
    pub raw_value: String,
    pub bounding_box: BoundingBox,
    pub status: BarcodeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
}

impl DetectedBarcode {
    pub fn from_record(detection: RawDetection, record: &BarcodeRecord) -> Self {
        Self {
            raw_value: detection.raw_value,
            bounding_box: detection.bounding_box,
            status: record.status,
            serial_number: record.serial_number.clone(),
        }
    }
}

/// 静止画認識フローの入力
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionInput {
    /// "data:<mimetype>;base64,<encoded_data>" 形式
    pub photo_data_uri: String,
}

/// 静止画認識フローの出力
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionOutput {
    pub serial_number: String,
}

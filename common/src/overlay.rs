//! オーバーレイ描画の計算
//!
//! 検出枠は映像の実ピクセル座標で返ってくるので、表示サイズへ拡大縮小する。

use crate::types::{BarcodeStatus, BoundingBox, DetectedBarcode};

/// 幅・高さ（ピクセル）
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DisplaySize {
    pub width: f64,
    pub height: f64,
}

impl DisplaySize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// 映像座標の枠を表示座標へ変換
///
/// 映像サイズが0（メタデータ未読込）の場合は None
pub fn scale_box(bbox: &BoundingBox, video: DisplaySize, display: DisplaySize) -> Option<BoundingBox> {
    if video.width <= 0.0 || video.height <= 0.0 {
        return None;
    }
    let scale_x = display.width / video.width;
    let scale_y = display.height / video.height;

    Some(BoundingBox {
        x: bbox.x * scale_x,
        y: bbox.y * scale_y,
        width: bbox.width * scale_x,
        height: bbox.height * scale_y,
    })
}

/// ステータスごとの表示スタイル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusStyle {
    pub class: &'static str,
    pub icon: &'static str,
}

impl StatusStyle {
    pub fn for_status(status: BarcodeStatus) -> Self {
        match status {
            BarcodeStatus::Approved => Self { class: "box-approved", icon: "✔" },
            BarcodeStatus::Rejected => Self { class: "box-rejected", icon: "✖" },
            BarcodeStatus::Pending => Self { class: "box-pending", icon: "⟳" },
        }
    }
}

/// 枠の上に出すラベル（承認済みならシリアル番号、それ以外は生値）
pub fn label(barcode: &DetectedBarcode) -> &str {
    match (barcode.status, barcode.serial_number.as_deref()) {
        (BarcodeStatus::Approved, Some(serial)) => serial,
        _ => &barcode.raw_value,
    }
}

/// CSSの絶対配置スタイル
pub fn box_style(bbox: &BoundingBox) -> String {
    format!(
        "position: absolute; left: {:.1}px; top: {:.1}px; width: {:.1}px; height: {:.1}px;",
        bbox.x, bbox.y, bbox.width, bbox.height
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn barcode(raw: &str, status: BarcodeStatus, serial: Option<&str>) -> DetectedBarcode {
        DetectedBarcode {
            raw_value: raw.into(),
            bounding_box: BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            status,
            serial_number: serial.map(String::from),
        }
    }

    #[test]
    fn test_scale_box_half_size() {
        let bbox = BoundingBox::new(100.0, 50.0, 200.0, 80.0);
        let scaled = scale_box(
            &bbox,
            DisplaySize::new(1280.0, 720.0),
            DisplaySize::new(640.0, 360.0),
        )
        .unwrap();
        assert_eq!(scaled, BoundingBox::new(50.0, 25.0, 100.0, 40.0));
    }

    #[test]
    fn test_scale_box_non_uniform() {
        let bbox = BoundingBox::new(10.0, 10.0, 10.0, 10.0);
        let scaled = scale_box(
            &bbox,
            DisplaySize::new(100.0, 100.0),
            DisplaySize::new(200.0, 50.0),
        )
        .unwrap();
        assert_eq!(scaled, BoundingBox::new(20.0, 5.0, 20.0, 5.0));
    }

    #[test]
    fn test_scale_box_without_metadata() {
        let bbox = BoundingBox::new(1.0, 1.0, 1.0, 1.0);
        assert!(scale_box(&bbox, DisplaySize::default(), DisplaySize::new(640.0, 480.0)).is_none());
    }

    #[test]
    fn test_label_approved_shows_serial() {
        let b = barcode("T2132000111632", BarcodeStatus::Approved, Some("T2132000111632"));
        assert_eq!(label(&b), "T2132000111632");
    }

    #[test]
    fn test_label_rejected_shows_raw_value() {
        let b = barcode("1234567890128", BarcodeStatus::Rejected, None);
        assert_eq!(label(&b), "1234567890128");
    }

    #[test]
    fn test_status_styles_distinct() {
        let approved = StatusStyle::for_status(BarcodeStatus::Approved);
        let rejected = StatusStyle::for_status(BarcodeStatus::Rejected);
        let pending = StatusStyle::for_status(BarcodeStatus::Pending);
        assert_ne!(approved.class, rejected.class);
        assert_ne!(rejected.class, pending.class);
    }

    #[test]
    fn test_box_style() {
        let style = box_style(&BoundingBox::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(
            style,
            "position: absolute; left: 1.0px; top: 2.0px; width: 3.0px; height: 4.0px;"
        );
    }
}

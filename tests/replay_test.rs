//! フレームログ再生テスト
//!
//! カメラ・画面なしでスキャンループを進め、判定とメモ化を検証

use scanverify::replay::{run_replay, FrameLog};
use scanverify_common::{BarcodeStatus, APPROVED_SERIAL_NUMBER};
use serde_json::json;
use tempfile::tempdir;

fn detections(values: &[&str]) -> serde_json::Value {
    let items: Vec<serde_json::Value> = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            json!({
                "rawValue": v,
                "boundingBox": { "x": 10.0 * i as f64, "y": 20.0, "width": 120.0, "height": 40.0 },
                "format": "code_128"
            })
        })
        .collect();
    json!({ "detections": items })
}

fn log_from(value: serde_json::Value) -> FrameLog {
    FrameLog::from_json(&value.to_string()).expect("フレームログの解析失敗")
}

/// 承認済みの値は approved・シリアル番号付き
#[tokio::test]
async fn test_approved_value() {
    let log = log_from(json!([detections(&[APPROVED_SERIAL_NUMBER])]));
    let report = run_replay(log, APPROVED_SERIAL_NUMBER).await;

    let barcode = &report.frames[0].barcodes[0];
    assert_eq!(barcode.status, BarcodeStatus::Approved);
    assert_eq!(barcode.serial_number.as_deref(), Some(APPROVED_SERIAL_NUMBER));
}

/// それ以外の値は rejected・シリアル番号なし
#[tokio::test]
async fn test_rejected_value() {
    let log = log_from(json!([detections(&["1234567890128"])]));
    let report = run_replay(log, APPROVED_SERIAL_NUMBER).await;

    let barcode = &report.frames[0].barcodes[0];
    assert_eq!(barcode.status, BarcodeStatus::Rejected);
    assert_eq!(barcode.serial_number, None);
}

/// 同じ値を何度検出してもステータスは変わらない
#[tokio::test]
async fn test_repeated_detection_is_stable() {
    let frames: Vec<serde_json::Value> = (0..20)
        .map(|_| detections(&["1234567890128", APPROVED_SERIAL_NUMBER]))
        .collect();
    let report = run_replay(log_from(json!(frames)), APPROVED_SERIAL_NUMBER).await;

    assert_eq!(report.frames.len(), 20);
    for frame in &report.frames {
        assert_eq!(frame.barcodes[0].status, BarcodeStatus::Rejected);
        assert_eq!(frame.barcodes[1].status, BarcodeStatus::Approved);
    }
    assert_eq!(report.records.len(), 2);
}

/// 検出エラーのフレームはスキップしてループ継続
#[tokio::test]
async fn test_detection_error_skips_frame() {
    let log = log_from(json!([
        detections(&["A"]),
        { "error": "InvalidStateError: video is not ready" },
        detections(&["B"]),
    ]));
    let report = run_replay(log, APPROVED_SERIAL_NUMBER).await;

    assert_eq!(report.frames.len(), 3);
    assert_eq!(report.skipped_frames, 1);
    assert!(report.frames[1].barcodes.is_empty());
    assert!(report.frames[1].error.as_deref().unwrap().contains("InvalidStateError"));
    assert_eq!(report.frames[2].barcodes[0].raw_value, "B");
}

/// 空フレームは描画なし
#[tokio::test]
async fn test_empty_frame() {
    let log = log_from(json!([detections(&[])]));
    let report = run_replay(log, APPROVED_SERIAL_NUMBER).await;
    assert!(report.frames[0].barcodes.is_empty());
    assert!(report.records.is_empty());
}

/// 再生終了後はトラックを解放して ready に戻る
#[tokio::test]
async fn test_stop_releases_tracks() {
    let log = log_from(json!([detections(&["A"])]));
    let report = run_replay(log, APPROVED_SERIAL_NUMBER).await;

    assert!(report.tracks_released);
    assert_eq!(report.state, "ready");
}

/// カメラ拒否時はスキャンしない
#[tokio::test]
async fn test_camera_denied() {
    let log = log_from(json!({
        "cameraDenied": true,
        "frames": [detections(&[APPROVED_SERIAL_NUMBER])]
    }));
    let report = run_replay(log, APPROVED_SERIAL_NUMBER).await;

    assert!(report.frames.is_empty());
    assert!(report.records.is_empty());
    assert_eq!(report.state, "idle");
    assert!(report.error.as_deref().unwrap().contains("denied"));
}

/// 検出APIなしはスキャン不可
#[tokio::test]
async fn test_detector_unsupported() {
    let log = log_from(json!({
        "detectorSupported": false,
        "frames": [detections(&["A"])]
    }));
    let report = run_replay(log, APPROVED_SERIAL_NUMBER).await;

    assert!(report.frames.is_empty());
    assert_eq!(report.state, "unsupported");
    assert!(report.error.is_some());
}

/// 承認済みシリアル番号の差し替え
#[tokio::test]
async fn test_custom_approved_serial() {
    let log = log_from(json!([detections(&["SN-0001", APPROVED_SERIAL_NUMBER])]));
    let report = run_replay(log, "SN-0001").await;

    assert_eq!(report.record("SN-0001").unwrap().status, BarcodeStatus::Approved);
    assert_eq!(report.record(APPROVED_SERIAL_NUMBER).unwrap().status, BarcodeStatus::Rejected);
}

/// ファイルから読み込んで再生
#[tokio::test]
async fn test_replay_from_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("frames.json");
    std::fs::write(&path, json!([detections(&["X", "Y"])]).to_string()).unwrap();

    let log = FrameLog::load(&path).unwrap();
    let report = run_replay(log, APPROVED_SERIAL_NUMBER).await;

    let values: Vec<&str> = report.records.iter().map(|r| r.raw_value.as_str()).collect();
    assert_eq!(values, vec!["X", "Y"]);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["records"][0]["status"], "rejected");
    assert!(json["frames"][0]["barcodes"][0]["boundingBox"].is_object());
}

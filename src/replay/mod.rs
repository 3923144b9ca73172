//! 記録済みフレームログの再生
//!
//! カメラや画面なしで `ScanLoop` を1フレームずつ進め、
//! 各フレームの描画内容と最終的な判定結果をまとめる。

use crate::error::{Result, ScanVerifyError};
use scanverify_common::{
    BarcodeStatus, Camera, CameraError, DetectedBarcode, DetectionError, Detector,
    FixedSerialValidator, RawDetection, ScanLoop,
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;

/// 記録された1フレーム
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordedFrame {
    /// 検出器が例外を出したフレーム
    Error { error: String },
    Detections { detections: Vec<RawDetection> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameLog {
    /// 検出APIが使えるか（false ならスキャン不可）
    #[serde(default = "default_true")]
    pub detector_supported: bool,
    /// カメラ許可を拒否されたか
    #[serde(default)]
    pub camera_denied: bool,
    pub frames: Vec<RecordedFrame>,
}

fn default_true() -> bool {
    true
}

impl FrameLog {
    /// オブジェクト形式、またはフレーム配列のみの形式を読む
    pub fn from_json(content: &str) -> Result<Self> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Either {
            Log(FrameLog),
            Frames(Vec<RecordedFrame>),
        }

        match serde_json::from_str::<Either>(content) {
            Ok(Either::Log(log)) => Ok(log),
            Ok(Either::Frames(frames)) => Ok(Self {
                detector_supported: true,
                camera_denied: false,
                frames,
            }),
            Err(e) => Err(ScanVerifyError::InvalidFrameLog(e.to_string())),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ScanVerifyError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

/// 再生用カメラ（ストリームの有無だけを持つ）
#[derive(Debug, Default)]
pub struct ReplayCamera {
    deny: bool,
    live: bool,
}

impl Camera for ReplayCamera {
    async fn open_rear(&mut self) -> std::result::Result<(), CameraError> {
        if self.deny {
            return Err(CameraError::PermissionDenied("recorded denial".into()));
        }
        self.live = true;
        Ok(())
    }

    fn release(&mut self) {
        self.live = false;
    }

    fn is_live(&self) -> bool {
        self.live
    }
}

/// 再生用検出器（記録順にフレームを返す）
#[derive(Debug, Default)]
pub struct ReplayDetector {
    frames: VecDeque<RecordedFrame>,
}

impl ReplayDetector {
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl Detector for ReplayDetector {
    async fn detect(&mut self) -> std::result::Result<Vec<RawDetection>, DetectionError> {
        match self.frames.pop_front() {
            Some(RecordedFrame::Detections { detections }) => Ok(detections),
            Some(RecordedFrame::Error { error }) => Err(DetectionError(error)),
            None => Ok(Vec::new()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameReport {
    pub index: usize,
    pub barcodes: Vec<DetectedBarcode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSummary {
    pub raw_value: String,
    pub status: BarcodeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    pub state: String,
    pub frames: Vec<FrameReport>,
    /// 生値でソート済み
    pub records: Vec<RecordSummary>,
    pub skipped_frames: usize,
    pub tracks_released: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReplayReport {
    pub fn record(&self, raw_value: &str) -> Option<&RecordSummary> {
        self.records.iter().find(|r| r.raw_value == raw_value)
    }
}

/// フレームログを再生
pub async fn run_replay(log: FrameLog, approved_serial: &str) -> ReplayReport {
    let camera = ReplayCamera { deny: log.camera_denied, live: false };
    let detector = ReplayDetector { frames: log.frames.into() };
    let validator = FixedSerialValidator::new(approved_serial);
    let mut scan = ScanLoop::new(camera, detector, validator, log.detector_supported);

    let mut frames = Vec::new();
    let mut skipped_frames = 0;
    let mut error = None;

    match scan.start().await {
        Ok(()) => {
            while scan.detector().remaining() > 0 {
                let index = frames.len();
                let tick = scan.step().await;
                if tick.error.is_some() {
                    skipped_frames += 1;
                }
                frames.push(FrameReport {
                    index,
                    barcodes: tick.renderables,
                    error: tick.error.map(|e| e.to_string()),
                });
                if !tick.schedule_next {
                    break;
                }
            }
        }
        Err(e) => error = Some(e.to_string()),
    }

    let effects = scan.stop();
    tracing::debug!(?effects, frames = frames.len(), "replay finished");

    let mut records: Vec<RecordSummary> = scan
        .session()
        .registry()
        .iter()
        .map(|(raw, record)| RecordSummary {
            raw_value: raw.to_string(),
            status: record.status,
            serial_number: record.serial_number.clone(),
        })
        .collect();
    records.sort_by(|a, b| a.raw_value.cmp(&b.raw_value));

    ReplayReport {
        state: scan.state().as_str().to_string(),
        frames,
        records,
        skipped_frames,
        tracks_released: !scan.camera().is_live(),
        error,
    }
}

//! スキャンループ
//!
//! カメラと検出器をトレイトで抽象化し、`ScanSession` を1フレームずつ進める。
//! `step` は `&mut self` を取るため、前の検出が終わるまで次は走らない。
//! 次フレームの予約（requestAnimationFrame など）は呼び出し側の責務。

use crate::error::{CameraError, DetectionError, Error, Result};
use crate::session::{ScanSession, ScannerState, StopEffects, Tick};
use crate::types::RawDetection;
use crate::validator::{FixedSerialValidator, Validator, Verdict};

/// 背面カメラの映像ストリーム
#[allow(async_fn_in_trait)]
pub trait Camera {
    /// 背面カメラを要求して再生を開始
    async fn open_rear(&mut self) -> std::result::Result<(), CameraError>;

    /// 全トラックを停止して映像ソースをクリア
    fn release(&mut self);

    /// 映像が再生中か（停止・終了していないか）
    fn is_live(&self) -> bool;
}

/// 現在フレームのバーコード検出
#[allow(async_fn_in_trait)]
pub trait Detector {
    async fn detect(&mut self) -> std::result::Result<Vec<RawDetection>, DetectionError>;
}

/// 映像が再生中なら現在フレームを1回検出する
///
/// カメラが停止・終了していれば None（次のパスは予約しない）
pub async fn capture_frame<C: Camera, D: Detector>(
    camera: &C,
    detector: &mut D,
) -> Option<std::result::Result<Vec<RawDetection>, DetectionError>> {
    if !camera.is_live() {
        return None;
    }
    Some(detector.detect().await)
}

pub struct ScanLoop<C: Camera, D: Detector, V: Validator = FixedSerialValidator> {
    camera: C,
    detector: D,
    session: ScanSession<V>,
}

impl<C: Camera, D: Detector, V: Validator> ScanLoop<C, D, V> {
    /// ループを作成してマウント時のチェックを済ませる
    pub fn new(camera: C, detector: D, validator: V, detector_supported: bool) -> Self {
        let session = ScanSession::mounted(validator, detector_supported);
        Self { camera, detector, session }
    }

    /// カメラを開いてスキャン開始
    ///
    /// 失敗時はセッションが Idle に戻り、エラーを返す（自動リトライなし）
    pub async fn start(&mut self) -> Result<()> {
        self.session.begin_start()?;

        match self.camera.open_rear().await {
            Ok(()) => {
                self.session.camera_started()?;
                Ok(())
            }
            Err(error) => {
                self.session.camera_failed(&error);
                self.camera.release();
                Err(Error::Camera(error))
            }
        }
    }

    /// 1フレーム分の検出パス
    ///
    /// 検出エラーはログに出してフレームをスキップする（致命的にしない）
    pub async fn step(&mut self) -> Tick {
        if !self.session.is_scanning() {
            return Tick::halted();
        }
        let Some(frame) = capture_frame(&self.camera, &mut self.detector).await else {
            return Tick::halted();
        };
        let tick = self.session.tick(frame);

        if let Some(error) = &tick.error {
            tracing::warn!(%error, "frame skipped");
        }
        tick
    }

    /// スキャン停止（トラック解放・映像ソースのクリア）
    pub fn stop(&mut self) -> StopEffects {
        let effects = self.session.stop();
        if effects.release_tracks || self.camera.is_live() {
            self.camera.release();
        }
        effects
    }

    /// ユーザー操作による再試行（カメラ取得失敗後）
    pub fn retry(&mut self) -> Result<()> {
        self.session.retry()?;
        Ok(())
    }

    pub fn settle(&mut self, raw_value: &str, verdict: Verdict) -> bool {
        self.session.settle(raw_value, verdict)
    }

    pub fn state(&self) -> ScannerState {
        self.session.state()
    }

    pub fn session(&self) -> &ScanSession<V> {
        &self.session
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }
}

impl<C: Camera, D: Detector, V: Validator> Drop for ScanLoop<C, D, V> {
    fn drop(&mut self) {
        if self.camera.is_live() {
            self.camera.release();
        }
    }
}

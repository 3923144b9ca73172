//! スキャンセッションの状態機械
//!
//! プラットフォームの型を持たない純粋な状態遷移:
//!
//! ```text
//! Idle --mount(true)--> Ready --begin_start--> Starting --camera_started--> Scanning
//!   |                     ^                       |                            |
//!   |                     |                 camera_failed                     stop
//!   |                   retry                     v                            |
//!   |                     +------------------- Idle <-------------------------+ (-> Ready)
//!   +--mount(false)--> Unsupported（永続）
//! ```
//!
//! `tick` は1フレーム分の検出結果を受け取り、描画用データと
//! 次フレームを予約するかどうかを返す。スケジューラには依存しない。

use crate::error::{CameraError, DetectionError, SessionError};
use crate::registry::BarcodeRegistry;
use crate::types::{DetectedBarcode, RawDetection};
use crate::validator::{FixedSerialValidator, Validator, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScannerState {
    /// マウント前、またはカメラ取得失敗後
    Idle,
    /// 検出APIあり、開始待ち
    Ready,
    /// カメラ取得中
    Starting,
    Scanning,
    /// 検出APIなし（セッション中は無効）
    Unsupported,
}

impl ScannerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScannerState::Idle => "idle",
            ScannerState::Ready => "ready",
            ScannerState::Starting => "starting",
            ScannerState::Scanning => "scanning",
            ScannerState::Unsupported => "unsupported",
        }
    }
}

/// 停止時にホスト側で実行すべき後処理
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StopEffects {
    /// メディアトラックを停止し、映像ソースをクリアする
    pub release_tracks: bool,
    /// 予約済みのフレームコールバックを取り消す
    pub cancel_frame: bool,
}

/// 1フレーム分の処理結果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tick {
    pub renderables: Vec<DetectedBarcode>,
    pub schedule_next: bool,
    /// ログ出力用（フレームはスキップ済み）
    pub error: Option<DetectionError>,
}

impl Tick {
    /// ループ停止（描画なし・次フレームなし）
    pub fn halted() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone)]
pub struct ScanSession<V = FixedSerialValidator> {
    state: ScannerState,
    mounted: bool,
    registry: BarcodeRegistry,
    validator: V,
    last_error: Option<String>,
}

impl Default for ScanSession<FixedSerialValidator> {
    fn default() -> Self {
        Self::new(FixedSerialValidator::default())
    }
}

impl<V: Validator> ScanSession<V> {
    pub fn new(validator: V) -> Self {
        Self {
            state: ScannerState::Idle,
            mounted: false,
            registry: BarcodeRegistry::new(),
            validator,
            last_error: None,
        }
    }

    /// マウント済みのセッションを作成
    pub fn mounted(validator: V, detector_supported: bool) -> Self {
        let mut session = Self::new(validator);
        session.apply_mount(detector_supported);
        session
    }

    /// 検出APIの有無をチェック（マウント時に1回だけ）
    pub fn mount(&mut self, detector_supported: bool) -> Result<ScannerState, SessionError> {
        if self.mounted {
            return Err(SessionError::AlreadyMounted);
        }
        self.apply_mount(detector_supported);
        Ok(self.state)
    }

    fn apply_mount(&mut self, detector_supported: bool) {
        self.mounted = true;
        self.state = if detector_supported {
            ScannerState::Ready
        } else {
            tracing::warn!("barcode detection API is unavailable; scanning disabled");
            ScannerState::Unsupported
        };
    }

    pub fn begin_start(&mut self) -> Result<(), SessionError> {
        match self.state {
            ScannerState::Ready => {
                self.state = ScannerState::Starting;
                self.last_error = None;
                Ok(())
            }
            ScannerState::Unsupported => Err(SessionError::Unsupported),
            other => Err(SessionError::NotReady(other.as_str())),
        }
    }

    pub fn camera_started(&mut self) -> Result<(), SessionError> {
        if self.state != ScannerState::Starting {
            return Err(SessionError::NotReady(self.state.as_str()));
        }
        self.state = ScannerState::Scanning;
        tracing::info!("scanning started");
        Ok(())
    }

    /// カメラ取得失敗。自動リトライはしない
    pub fn camera_failed(&mut self, error: &CameraError) {
        tracing::error!(%error, "camera access failed");
        if self.state == ScannerState::Starting {
            self.state = ScannerState::Idle;
        }
        self.last_error = Some(error.to_string());
    }

    /// カメラ取得失敗後、ユーザー操作で Ready に戻す
    pub fn retry(&mut self) -> Result<(), SessionError> {
        match self.state {
            ScannerState::Idle if self.mounted => {
                self.state = ScannerState::Ready;
                self.last_error = None;
                Ok(())
            }
            ScannerState::Unsupported => Err(SessionError::Unsupported),
            other => Err(SessionError::NotReady(other.as_str())),
        }
    }

    pub fn stop(&mut self) -> StopEffects {
        match self.state {
            ScannerState::Scanning | ScannerState::Starting => {
                self.state = ScannerState::Ready;
                tracing::info!(codes = self.registry.len(), "scanning stopped");
                StopEffects { release_tracks: true, cancel_frame: true }
            }
            _ => StopEffects::default(),
        }
    }

    /// 1フレーム分の検出結果を処理
    pub fn tick(&mut self, frame: Result<Vec<RawDetection>, DetectionError>) -> Tick {
        if self.state != ScannerState::Scanning {
            return Tick::halted();
        }

        let detections = match frame {
            Ok(detections) => detections,
            Err(error) => {
                return Tick {
                    renderables: Vec::new(),
                    schedule_next: true,
                    error: Some(error),
                };
            }
        };

        let renderables = detections
            .into_iter()
            .map(|detection| {
                let record = self.registry.resolve(&detection.raw_value, &self.validator);
                DetectedBarcode::from_record(detection, &record)
            })
            .collect();

        Tick {
            renderables,
            schedule_next: true,
            error: None,
        }
    }

    /// 非同期判定の結果を反映
    pub fn settle(&mut self, raw_value: &str, verdict: Verdict) -> bool {
        self.registry.settle(raw_value, verdict)
    }

    pub fn state(&self) -> ScannerState {
        self.state
    }

    pub fn is_scanning(&self) -> bool {
        self.state == ScannerState::Scanning
    }

    pub fn is_ready(&self) -> bool {
        self.state == ScannerState::Ready
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn registry(&self) -> &BarcodeRegistry {
        &self.registry
    }

    pub fn validator(&self) -> &V {
        &self.validator
    }
}

//! バーコードスキャナーコンポーネント
//!
//! カメラ映像に対して requestAnimationFrame ごとに1回検出し、
//! 前の検出が終わってから次のフレームを予約する。

use gloo::render::{request_animation_frame, AnimationFrame};
use leptos::prelude::*;
use leptos::task::spawn_local;
use scanverify_common::{
    capture_frame, Camera, CameraError, DetectedBarcode, FixedSerialValidator, ScanSession,
    ScannerState, Tick,
};

use crate::browser::{self, BrowserCamera, BrowserDetector};
use crate::components::overlay::BarcodeOverlay;
use crate::components::status_panel::StatusPanel;

/// スキャナーの共有ハンドル（すべて Copy）
#[derive(Clone, Copy)]
struct ScanHandles {
    session: StoredValue<ScanSession>,
    camera: StoredValue<Option<BrowserCamera>, LocalStorage>,
    detector: StoredValue<Option<BrowserDetector>, LocalStorage>,
    frame: StoredValue<Option<AnimationFrame>, LocalStorage>,
    video_ref: NodeRef<leptos::html::Video>,
    state: RwSignal<ScannerState>,
    visible: RwSignal<Vec<DetectedBarcode>>,
    error: RwSignal<Option<String>>,
}

impl ScanHandles {
    fn sync_state(&self) {
        if let Some((state, error)) = self
            .session
            .try_with_value(|s| (s.state(), s.last_error().map(String::from)))
        {
            self.state.try_set(state);
            self.error.try_set(error);
        }
    }
}

#[component]
pub fn BarcodeScanner() -> impl IntoView {
    // マウント時に1回だけ検出APIをチェック
    let supported = browser::is_supported();
    let handles = ScanHandles {
        session: StoredValue::new(ScanSession::mounted(FixedSerialValidator::default(), supported)),
        camera: StoredValue::new_local(None),
        detector: StoredValue::new_local(None),
        frame: StoredValue::new_local(None),
        video_ref: NodeRef::new(),
        state: RwSignal::new(ScannerState::Idle),
        visible: RwSignal::new(Vec::new()),
        error: RwSignal::new(None),
    };

    handles.sync_state();

    on_cleanup(move || stop_scan(handles));

    let is_scanning = move || handles.state.get() == ScannerState::Scanning;

    view! {
        <div class="scanner-card">
            <div class="scanner-stage">
                <video
                    node_ref=handles.video_ref
                    class=move || if is_scanning() { "scanner-video visible" } else { "scanner-video" }
                ></video>

                <Show when=move || !is_scanning()>
                    <StatusPanel
                        state=handles.state
                        error=handles.error
                        on_start=move |_| start_scan(handles)
                        on_retry=move |_| retry_scan(handles)
                    />
                </Show>

                <Show when=is_scanning>
                    <BarcodeOverlay barcodes=handles.visible video_ref=handles.video_ref />
                    <button class="btn btn-danger btn-small stop-button" on:click=move |_| stop_scan(handles)>
                        "Stop Scan"
                    </button>
                </Show>
            </div>
        </div>
    }
}

/// カメラを開いてスキャン開始
fn start_scan(handles: ScanHandles) {
    match handles.session.try_update_value(|s| s.begin_start()) {
        Some(Ok(())) => handles.sync_state(),
        Some(Err(error)) => {
            gloo::console::warn!(error.to_string());
            return;
        }
        None => return,
    }

    spawn_local(async move {
        let Some(video) = handles.video_ref.get_untracked() else {
            return;
        };

        let mut camera = BrowserCamera::new(video.clone());
        if let Err(error) = camera.open_rear().await {
            gloo::console::error!(format!("Error accessing camera: {}", error));
            handles.session.try_update_value(|s| s.camera_failed(&error));
            handles.sync_state();
            return;
        }

        if handles.detector.try_with_value(|d| d.is_none()).unwrap_or(false) {
            match BrowserDetector::new(video) {
                Ok(detector) => handles.detector.set_value(Some(detector)),
                Err(error) => {
                    let message = browser::js_error_message(&error);
                    gloo::console::error!(format!("BarcodeDetector could not be initialized: {}", message));
                    camera.release();
                    let error = CameraError::Other(message);
                    handles.session.try_update_value(|s| s.camera_failed(&error));
                    handles.sync_state();
                    return;
                }
            }
        }

        // 起動中に停止・アンマウントされた場合はストリームを手放す
        match handles.session.try_update_value(|s| s.camera_started()) {
            Some(Ok(())) => {
                handles.camera.set_value(Some(camera));
                handles.sync_state();
                schedule_pass(handles);
            }
            _ => {
                camera.release();
                handles.sync_state();
            }
        }
    });
}

/// 全トラックの停止・映像ソースのクリア・予約フレームの取り消し
fn stop_scan(handles: ScanHandles) {
    let Some(effects) = handles.session.try_update_value(|s| s.stop()) else {
        return;
    };

    if effects.cancel_frame {
        // AnimationFrame は drop で取り消される
        handles.frame.try_update_value(|f| f.take());
    }
    handles.camera.try_update_value(|camera| {
        if let Some(mut camera) = camera.take() {
            camera.release();
        }
    });
    handles.visible.try_set(Vec::new());
    handles.sync_state();
}

fn retry_scan(handles: ScanHandles) {
    if let Some(Err(error)) = handles.session.try_update_value(|s| s.retry()) {
        gloo::console::warn!(error.to_string());
    }
    handles.sync_state();
}

fn schedule_pass(handles: ScanHandles) {
    let frame = request_animation_frame(move |_timestamp| {
        spawn_local(run_pass(handles));
    });
    handles.frame.try_update_value(|f| *f = Some(frame));
}

/// 1フレーム分の検出パス。完了後にのみ次を予約する
async fn run_pass(handles: ScanHandles) {
    let camera = handles.camera.try_get_value().flatten();
    let detector = handles.detector.try_get_value().flatten();

    let tick = match (camera, detector) {
        (Some(camera), Some(mut detector)) => match capture_frame(&camera, &mut detector).await {
            // 検出中に停止された場合は tick が halted を返す
            Some(frame) => handles
                .session
                .try_update_value(|s| s.tick(frame))
                .unwrap_or_else(Tick::halted),
            None => Tick::halted(),
        },
        _ => Tick::halted(),
    };

    if let Some(error) = &tick.error {
        gloo::console::error!(error.to_string());
    }

    if tick.schedule_next {
        if tick.error.is_none() {
            handles.visible.try_set(tick.renderables);
        }
        schedule_pass(handles);
    }
}

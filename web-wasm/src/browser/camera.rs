//! getUserMedia による背面カメラ

use js_sys::{Object, Reflect};
use scanverify_common::{Camera, CameraError};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlVideoElement, MediaStream, MediaStreamConstraints, MediaStreamTrack};

#[derive(Debug, Clone)]
pub struct BrowserCamera {
    video: HtmlVideoElement,
}

impl BrowserCamera {
    pub fn new(video: HtmlVideoElement) -> Self {
        Self { video }
    }

    /// 背面カメラ（facingMode: environment）のストリームを要求
    pub async fn request_rear_stream() -> Result<MediaStream, CameraError> {
        let window = web_sys::window().ok_or(CameraError::Unavailable)?;
        let devices = window
            .navigator()
            .media_devices()
            .map_err(|_| CameraError::Unavailable)?;

        let video = Object::new();
        Reflect::set(&video, &JsValue::from_str("facingMode"), &JsValue::from_str("environment"))
            .map_err(|e| CameraError::Other(super::js_error_message(&e)))?;
        let constraints = MediaStreamConstraints::new();
        constraints.set_video(&video);

        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(classify)?;
        let stream = JsFuture::from(promise).await.map_err(classify)?;
        stream
            .dyn_into::<MediaStream>()
            .map_err(|_| CameraError::Other("getUserMedia did not return a MediaStream".into()))
    }

    /// ストリームを映像要素に接続して再生
    pub async fn attach(&self, stream: MediaStream) -> Result<(), CameraError> {
        self.video.set_muted(true);
        let _ = self.video.set_attribute("playsinline", "");
        self.video.set_src_object(Some(&stream));

        let promise = self.video.play().map_err(classify)?;
        JsFuture::from(promise).await.map_err(classify)?;
        Ok(())
    }

    pub fn video(&self) -> &HtmlVideoElement {
        &self.video
    }
}

impl Camera for BrowserCamera {
    async fn open_rear(&mut self) -> Result<(), CameraError> {
        let stream = Self::request_rear_stream().await?;
        if let Err(error) = self.attach(stream).await {
            self.release();
            return Err(error);
        }
        Ok(())
    }

    fn release(&mut self) {
        if let Some(stream) = self.video.src_object() {
            for track in stream.get_tracks().iter() {
                if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                    track.stop();
                }
            }
        }
        self.video.set_src_object(None);
    }

    fn is_live(&self) -> bool {
        self.video.src_object().is_some() && !self.video.paused() && !self.video.ended()
    }
}

/// DOMException の name でエラーを分類
fn classify(error: JsValue) -> CameraError {
    let name = Reflect::get(&error, &JsValue::from_str("name"))
        .ok()
        .and_then(|n| n.as_string())
        .unwrap_or_default();
    let message = super::js_error_message(&error);

    match name.as_str() {
        "NotAllowedError" | "SecurityError" => CameraError::PermissionDenied(message),
        "NotFoundError" | "OverconstrainedError" => CameraError::Unavailable,
        _ => CameraError::Other(message),
    }
}

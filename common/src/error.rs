//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),

    #[error("Model returned no structured output")]
    EmptyOutput,

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Camera(#[from] CameraError),
}

/// カメラ取得・解放のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    #[error("Camera access was denied: {0}")]
    PermissionDenied(String),

    #[error("No camera is available on this device")]
    Unavailable,

    #[error("Camera error: {0}")]
    Other(String),
}

/// 1フレーム分の検出エラー（ループは継続する）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Barcode detection failed: {0}")]
pub struct DetectionError(pub String);

/// セッション状態遷移のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Barcode detection is not supported in this environment")]
    Unsupported,

    #[error("Scanner is not ready (state: {0})")]
    NotReady(&'static str),

    #[error("Scanner is already mounted")]
    AlreadyMounted,
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::Io(io_error);
        let display = format!("{}", error);
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_error_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Json(_)));
    }

    #[test]
    fn test_error_display_empty_output() {
        assert_eq!(
            Error::EmptyOutput.to_string(),
            "Model returned no structured output"
        );
    }

    #[test]
    fn test_session_error_is_transparent() {
        let error: Error = SessionError::Unsupported.into();
        assert_eq!(
            error.to_string(),
            "Barcode detection is not supported in this environment"
        );
    }

    #[test]
    fn test_camera_error_display() {
        let error = CameraError::PermissionDenied("NotAllowedError".into());
        assert!(error.to_string().contains("NotAllowedError"));
        assert_eq!(
            DetectionError("video not ready".into()).to_string(),
            "Barcode detection failed: video not ready"
        );
    }
}

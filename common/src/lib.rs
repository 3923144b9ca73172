//! ScanVerify Common Library
//!
//! CLIとWeb(WASM)で共有される型とロジック:
//! - ライブスキャン: バーコード判定・メモ化・セッション状態機械・スキャンループ
//! - 静止画認識: データURI、プロンプト、Gemini リクエスト/レスポンス

pub mod types;
pub mod error;
pub mod validator;
pub mod registry;
pub mod session;
pub mod scan_loop;
pub mod overlay;
pub mod data_uri;
pub mod prompts;
pub mod gemini;
pub mod parser;

pub use types::{
    BarcodeFormat, BarcodeRecord, BarcodeStatus, BoundingBox, DetectedBarcode, RawDetection,
    RecognitionInput, RecognitionOutput,
};
pub use error::{CameraError, DetectionError, Error, Result, SessionError};
pub use validator::{FixedSerialValidator, Validator, Verdict, APPROVED_SERIAL_NUMBER};
pub use registry::BarcodeRegistry;
pub use session::{ScanSession, ScannerState, StopEffects, Tick};
pub use scan_loop::{capture_frame, Camera, Detector, ScanLoop};
pub use overlay::{box_style, label, scale_box, DisplaySize, StatusStyle};
pub use data_uri::DataUri;
pub use prompts::{build_recognition_prompt, recognition_schema};
pub use gemini::{
    build_recognition_request, endpoint_url, extract_candidate_text, GeminiRequest, GeminiResponse,
    DEFAULT_MODEL,
};
pub use parser::{extract_json, parse_recognition_response};

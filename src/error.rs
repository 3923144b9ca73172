use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanVerifyError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`scanverify config --set-api-key YOUR_KEY` または GEMINI_API_KEY で設定してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像形式を判定できません: {0}")]
    UnsupportedImage(String),

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("フレームログが不正: {0}")]
    InvalidFrameLog(String),

    #[error("{0}")]
    Common(#[from] scanverify_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),
}

pub type Result<T> = std::result::Result<T, ScanVerifyError>;

//! Data URI（"data:<mimetype>;base64,<encoded_data>"）の解析と生成

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    mime_type: String,
    payload: String,
}

impl DataUri {
    /// Data URIを検証してパース
    ///
    /// MIMEタイプ（type/subtype）と ";base64" マーカー、
    /// 正しいBase64ペイロードを要求する
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| Error::InvalidDataUri("missing \"data:\" prefix".into()))?;

        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::InvalidDataUri("missing ',' separator".into()))?;

        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| Error::InvalidDataUri("payload must be base64 encoded".into()))?;

        if !is_mime_type(mime_type) {
            return Err(Error::InvalidDataUri(format!("invalid MIME type: {:?}", mime_type)));
        }
        if payload.is_empty() {
            return Err(Error::InvalidDataUri("empty payload".into()));
        }
        STANDARD
            .decode(payload)
            .map_err(|e| Error::InvalidDataUri(format!("invalid base64 payload: {}", e)))?;

        Ok(Self {
            mime_type: mime_type.to_string(),
            payload: payload.to_string(),
        })
    }

    /// バイト列からData URIを生成
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Result<Self> {
        if !is_mime_type(mime_type) {
            return Err(Error::InvalidDataUri(format!("invalid MIME type: {:?}", mime_type)));
        }
        if bytes.is_empty() {
            return Err(Error::InvalidDataUri("empty payload".into()));
        }
        Ok(Self {
            mime_type: mime_type.to_string(),
            payload: STANDARD.encode(bytes),
        })
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64エンコードされたデータ部分
    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.payload)
            .map_err(|e| Error::InvalidDataUri(e.to_string()))
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.payload)
    }
}

impl FromStr for DataUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn is_mime_type(value: &str) -> bool {
    let Some((kind, subtype)) = value.split_once('/') else {
        return false;
    };
    let valid = |part: &str| {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-'))
    };
    valid(kind) && valid(subtype)
}

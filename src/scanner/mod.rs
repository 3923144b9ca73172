//! 写真ファイルの列挙と Data URI 化

use crate::error::{Result, ScanVerifyError};
use scanverify_common::DataUri;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp"];

pub fn scan_folder(folder: &Path) -> Result<Vec<ImageInfo>> {
    if !folder.is_dir() {
        return Err(ScanVerifyError::FolderNotFound(folder.display().to_string()));
    }

    let mut images = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        if let Some(ext) = path.extension() {
            if is_image_extension(&ext.to_string_lossy()) {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();

                images.push(ImageInfo {
                    path: path.to_path_buf(),
                    file_name,
                });
            }
        }
    }

    // ファイル名でソート
    images.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    Ok(images)
}

fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
}

/// 画像ファイルを読み込んで Data URI にする
///
/// MIMEタイプは先頭バイトから判定し、判定できなければ拡張子を見る
pub fn load_photo(path: &Path) -> Result<DataUri> {
    if !path.is_file() {
        return Err(ScanVerifyError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let format = image::guess_format(&bytes)
        .or_else(|_| image::ImageFormat::from_path(path))
        .map_err(|_| ScanVerifyError::UnsupportedImage(path.display().to_string()))?;

    let uri = DataUri::from_bytes(format.to_mime_type(), &bytes)?;
    tracing::debug!(path = %path.display(), mime = uri.mime_type(), bytes = bytes.len(), "photo loaded");
    Ok(uri)
}

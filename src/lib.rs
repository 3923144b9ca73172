//! ScanVerify CLI
//!
//! 静止画認識（Gemini）とフレームログ再生

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod recognizer;
pub mod replay;
pub mod scanner;

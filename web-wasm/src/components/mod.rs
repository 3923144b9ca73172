//! UIコンポーネント

pub mod header;
pub mod overlay;
pub mod recognition_panel;
pub mod scanner;
pub mod status_panel;

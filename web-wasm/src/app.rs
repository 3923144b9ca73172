//! メインアプリケーションコンポーネント

use leptos::prelude::*;
use crate::components::{
    header::Header,
    recognition_panel::RecognitionPanel,
    scanner::BarcodeScanner,
};

#[component]
pub fn App() -> impl IntoView {
    view! {
        <div class="container">
            <Header />
            <BarcodeScanner />
            <RecognitionPanel />
        </div>
    }
}

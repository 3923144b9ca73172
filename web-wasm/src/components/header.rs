//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"ScanVerify"</h1>
            <p class="text-muted">"Scan a barcode to check it against the approved serial number."</p>
        </header>
    }
}

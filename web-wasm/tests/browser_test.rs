//! ブラウザ側のテスト（wasm-pack test --headless --chrome）

use leptos::prelude::*;
use scanverify_common::ScannerState;
use scanverify_web::api::gemini::request_url;
use scanverify_web::browser::js_error_message;
use scanverify_web::components::status_panel::StatusPanel;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

/// テストごとに独立したマウント先を作る
fn mount_point() -> HtmlElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let element: HtmlElement = document.create_element("div").unwrap().dyn_into().unwrap();
    document.body().unwrap().append_child(&element).unwrap();
    element
}

#[wasm_bindgen_test]
fn test_message_from_string() {
    assert_eq!(js_error_message(&JsValue::from_str("camera busy")), "camera busy");
}

#[wasm_bindgen_test]
fn test_message_from_error_object() {
    let error = js_sys::Error::new("Permission denied");
    assert_eq!(js_error_message(&error.into()), "Permission denied");
}

#[wasm_bindgen_test]
fn test_detector_support_is_a_plain_check() {
    // 実行ブラウザによって結果は変わるが、例外にはならない
    let _ = scanverify_web::browser::is_supported();
}

#[wasm_bindgen_test]
fn test_api_key_is_url_encoded() {
    let url = request_url("a b&c=d");
    assert!(url.ends_with("?key=a%20b%26c%3Dd"));
}

#[wasm_bindgen_test]
fn test_status_panel_start_button() {
    let root = mount_point();
    let state = RwSignal::new(ScannerState::Ready);
    let error = RwSignal::new(None::<String>);
    let started = RwSignal::new(false);

    let _handle = leptos::mount::mount_to(root.clone(), move || {
        view! {
            <StatusPanel
                state=state
                error=error
                on_start=move |_| started.set(true)
                on_retry=|_| {}
            />
        }
    });

    assert!(root.text_content().unwrap_or_default().contains("Ready to Scan"));

    let button: HtmlElement = root
        .query_selector("button")
        .unwrap()
        .unwrap()
        .dyn_into()
        .unwrap();
    button.click();
    assert!(started.get_untracked());
}

#[wasm_bindgen_test]
fn test_status_panel_error_shows_retry() {
    let root = mount_point();
    let state = RwSignal::new(ScannerState::Idle);
    let error = RwSignal::new(Some("Permission denied".to_string()));

    let _handle = leptos::mount::mount_to(root.clone(), move || {
        view! { <StatusPanel state=state error=error on_start=|_| {} on_retry=|_| {} /> }
    });

    let text = root.text_content().unwrap_or_default();
    assert!(text.contains("Permission denied"));
    assert!(text.contains("Try again"));
}

#[wasm_bindgen_test]
fn test_status_panel_unsupported_message() {
    let root = mount_point();
    let state = RwSignal::new(ScannerState::Unsupported);
    let error = RwSignal::new(None::<String>);

    let _handle = leptos::mount::mount_to(root.clone(), move || {
        view! { <StatusPanel state=state error=error on_start=|_| {} on_retry=|_| {} /> }
    });

    let text = root.text_content().unwrap_or_default();
    assert!(text.contains("does not support the Barcode Detection API"));
    assert!(root.query_selector("button").unwrap().is_none());
}

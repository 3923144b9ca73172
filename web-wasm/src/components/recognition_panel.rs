//! 静止画からのシリアル番号認識パネル

use leptos::prelude::*;
use leptos::task::spawn_local;
use scanverify_common::{RecognitionInput, APPROVED_SERIAL_NUMBER};
use wasm_bindgen::prelude::*;
use web_sys::{File, FileReader, HtmlInputElement};

use crate::api::gemini::recognize_barcode;
use crate::browser::js_error_message;

/// 認識結果
#[derive(Clone, PartialEq)]
enum Outcome {
    Serial(String),
    Failed(String),
}

#[component]
pub fn RecognitionPanel() -> impl IntoView {
    let (api_key, set_api_key) = signal(String::new());
    let (photo, set_photo) = signal(None::<String>);
    let (is_running, set_is_running) = signal(false);
    let (outcome, set_outcome) = signal(None::<Outcome>);

    let on_file_change = move |ev: web_sys::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
        else {
            return;
        };
        if let Some(file) = input.files().and_then(|files| files.get(0)) {
            set_outcome.set(None);
            read_file(file, move |data_url| set_photo.set(Some(data_url)));
        }
    };

    let on_recognize = move |_| {
        let Some(photo_data_uri) = photo.get_untracked() else {
            return;
        };
        let key = api_key.get_untracked();
        set_is_running.set(true);
        set_outcome.set(None);

        spawn_local(async move {
            let input = RecognitionInput { photo_data_uri };
            let result = match recognize_barcode(&key, &input).await {
                Ok(output) => Outcome::Serial(output.serial_number),
                Err(error) => {
                    let message = js_error_message(&error);
                    gloo::console::error!(format!("Recognition failed: {}", message));
                    Outcome::Failed(message)
                }
            };
            set_outcome.try_set(Some(result));
            set_is_running.try_set(false);
        });
    };

    let can_run = move || !api_key.get().is_empty() && photo.get().is_some() && !is_running.get();

    view! {
        <div class="recognition-panel">
            <h2>"Recognize from photo"</h2>

            <div class="form-group">
                <label for="api-key">"Gemini API Key"</label>
                <input
                    type="password"
                    id="api-key"
                    placeholder="API Key..."
                    prop:value=move || api_key.get()
                    on:input=move |ev| {
                        set_api_key.set(event_target_value(&ev));
                    }
                />
            </div>

            <div class="form-group">
                <label for="photo">"Photo"</label>
                <input type="file" id="photo" accept="image/*" on:change=on_file_change />
            </div>

            <Show when=move || photo.get().is_some()>
                <img class="photo-preview" src=move || photo.get().unwrap_or_default() alt="selected photo" />
            </Show>

            <button class="btn btn-primary" disabled=move || !can_run() on:click=on_recognize>
                {move || if is_running.get() { "Recognizing..." } else { "Recognize" }}
            </button>

            {move || outcome.get().map(|outcome| match outcome {
                Outcome::Serial(serial) => {
                    let approved = serial == APPROVED_SERIAL_NUMBER;
                    let class = if approved { "result result-approved" } else { "result result-rejected" };
                    let mark = if approved { "✔ approved" } else { "✖ rejected" };
                    view! {
                        <div class=class>
                            <span class="result-serial">{serial}</span>
                            <span class="result-mark">{mark}</span>
                        </div>
                    }
                    .into_any()
                }
                Outcome::Failed(message) => view! {
                    <div class="result result-error">{message}</div>
                }
                .into_any(),
            })}
        </div>
    }
}

/// ファイルを Data URL として読み込む
fn read_file<F>(file: File, on_loaded: F)
where
    F: Fn(String) + 'static,
{
    let Ok(reader) = FileReader::new() else {
        gloo::console::error!("FileReader is unavailable");
        return;
    };

    let reader_clone = reader.clone();
    let closure = Closure::wrap(Box::new(move |_: web_sys::ProgressEvent| {
        if let Some(data_url) = reader_clone.result().ok().and_then(|r| r.as_string()) {
            on_loaded(data_url);
        }
    }) as Box<dyn FnMut(_)>);

    reader.set_onload(Some(closure.as_ref().unchecked_ref()));
    closure.forget();

    if let Err(error) = reader.read_as_data_url(&file) {
        gloo::console::error!(js_error_message(&error));
    }
}

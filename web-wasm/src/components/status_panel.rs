//! スキャン前・エラー時のステータス表示

use leptos::prelude::*;
use scanverify_common::ScannerState;

#[component]
pub fn StatusPanel<FS, FR>(
    state: RwSignal<ScannerState>,
    error: RwSignal<Option<String>>,
    on_start: FS,
    on_retry: FR,
) -> impl IntoView
where
    FS: Fn(()) + Send + Sync + 'static + Clone,
    FR: Fn(()) + Send + Sync + 'static + Clone,
{
    move || {
        if state.get() == ScannerState::Unsupported {
            return view! {
                <div class="status-panel status-error">
                    <div class="status-icon">"⚠"</div>
                    <p>"Your browser does not support the Barcode Detection API."</p>
                    <p class="text-muted">"Please try a recent version of Chrome or Edge on Android, ChromeOS or macOS."</p>
                </div>
            }
            .into_any();
        }

        if let Some(message) = error.get() {
            let on_retry = on_retry.clone();
            return view! {
                <div class="status-panel status-error">
                    <div class="status-icon">"📷"</div>
                    <p>{message}</p>
                    <button class="btn btn-secondary" on:click=move |_| on_retry(())>
                        "Try again"
                    </button>
                </div>
            }
            .into_any();
        }

        match state.get() {
            ScannerState::Ready => {
                let on_start = on_start.clone();
                view! {
                    <div class="status-panel">
                        <div class="status-icon">"▦"</div>
                        <p>"Ready to Scan"</p>
                        <p class="text-muted">"Point the rear camera at a barcode."</p>
                        <button class="btn btn-primary" on:click=move |_| on_start(())>
                            "Start Scanning"
                        </button>
                    </div>
                }
                .into_any()
            }
            ScannerState::Starting => view! {
                <div class="status-panel">
                    <div class="spinner"></div>
                    <p>"Starting camera..."</p>
                </div>
            }
            .into_any(),
            _ => view! {
                <div class="status-panel">
                    <p class="text-muted">"Preparing scanner..."</p>
                </div>
            }
            .into_any(),
        }
    }
}

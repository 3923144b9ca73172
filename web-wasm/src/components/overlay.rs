//! 検出枠オーバーレイ

use leptos::html::Video;
use leptos::prelude::*;
use scanverify_common::{box_style, label, scale_box, DetectedBarcode, DisplaySize, StatusStyle};

#[component]
pub fn BarcodeOverlay(
    barcodes: RwSignal<Vec<DetectedBarcode>>,
    video_ref: NodeRef<Video>,
) -> impl IntoView {
    // 映像の実サイズと表示サイズ。メタデータ未読込なら描画しない
    let sizes = move || {
        video_ref.get().map(|video| {
            (
                DisplaySize::new(video.video_width() as f64, video.video_height() as f64),
                DisplaySize::new(video.client_width() as f64, video.client_height() as f64),
            )
        })
    };

    view! {
        <div class="barcode-overlay">
            {move || {
                let Some((video, display)) = sizes() else {
                    return Vec::new();
                };
                barcodes
                    .get()
                    .into_iter()
                    .filter_map(|barcode| {
                        let bbox = scale_box(&barcode.bounding_box, video, display)?;
                        let style = StatusStyle::for_status(barcode.status);
                        let text = format!("{} {}", style.icon, label(&barcode));
                        Some(view! {
                            <div class=format!("barcode-box {}", style.class) style=box_style(&bbox)>
                                <span class="barcode-label">{text}</span>
                            </div>
                        })
                    })
                    .collect::<Vec<_>>()
            }}
        </div>
    }
}

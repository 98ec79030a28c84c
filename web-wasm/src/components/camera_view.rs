//! Live camera screen
//!
//! Mounts the device's preview element while shown and stops the device when
//! unmounted, whatever the reason.

use chronosnap_common::{Action, CaptureState};
use leptos::html::Div;
use leptos::prelude::*;

use crate::context::AppContext;

#[component]
pub fn CameraView(ctx: AppContext) -> impl IntoView {
    let container = NodeRef::<Div>::new();
    let (capture_error, set_capture_error) = signal(None::<String>);

    Effect::new(move |_| {
        if let Some(container) = container.get() {
            ctx.camera.with_value(|camera| {
                let _ = container.append_child(camera.device().preview());
            });
        }
    });

    on_cleanup(move || ctx.stop_camera());

    let device_error = move || match ctx.camera_state.get() {
        CaptureState::Error(message) => Some(message),
        _ => None,
    };
    let is_streaming = move || ctx.camera_state.get() == CaptureState::Streaming;

    let on_capture = move |_| match ctx.camera.with_value(|camera| camera.capture_frame()) {
        Ok(image) => {
            set_capture_error.set(None);
            ctx.dispatch(Action::FrameCaptured(image));
        }
        Err(err) => {
            gloo::console::warn!(format!("capture failed: {err}"));
            set_capture_error.set(Some(err.to_string()));
        }
    };

    view! {
        <section class="camera-view">
            <div class="camera-frame">
                <div node_ref=container class="camera-surface" class:hidden=move || device_error().is_some()></div>
                <Show when=move || device_error().is_some()>
                    <div class="error-panel">{device_error}</div>
                </Show>

                <button class="btn-icon close" title="Cancel" on:click=move |_| ctx.dispatch(Action::CancelCapture)>
                    "✕"
                </button>

                <div class="camera-controls">
                    <button class="btn-icon" title="Switch Camera / Restart" on:click=move |_| ctx.restart_camera()>
                        "⟳"
                    </button>
                    <button class="shutter" disabled=move || !is_streaming() on:click=on_capture>
                        "📷"
                    </button>
                </div>
            </div>
            <Show when=move || capture_error.get().is_some()>
                <div class="error-panel">{move || capture_error.get()}</div>
            </Show>
            <p class="text-muted">"Align your face in the center"</p>
        </section>
    }
}

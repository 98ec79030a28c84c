//! Captured-image preview: choose Time Travel or Analyze

use chronosnap_common::AppState;
use leptos::prelude::*;

#[component]
pub fn Preview<FR, FT, FA>(
    state: RwSignal<AppState>,
    on_retake: FR,
    on_transform: FT,
    on_analyze: FA,
) -> impl IntoView
where
    FR: Fn(()) + 'static + Clone + Send,
    FT: Fn(()) + 'static + Clone + Send,
    FA: Fn(()) + 'static + Clone + Send,
{
    let image = move || {
        state.with(|s| {
            s.session_image()
                .map(|image| image.as_data_url().to_string())
                .unwrap_or_default()
        })
    };

    view! {
        <section class="preview">
            <h2>"Image Captured. Choose your path."</h2>
            <div class="preview-layout">
                <div class="preview-frame">
                    <img src=image alt="Captured" class="mirrored" />
                    <button class="btn btn-small retake" on:click=move |_| on_retake(())>
                        "Retake"
                    </button>
                </div>
                <div class="preview-actions">
                    <button class="choice" on:click=move |_| on_transform(())>
                        <h3>"🕰 Time Travel"</h3>
                        <p class="text-muted">"Insert yourself into history."</p>
                    </button>
                    <button class="choice" on:click=move |_| on_analyze(())>
                        <h3>"🔍 Analyze Identity"</h3>
                        <p class="text-muted">"What does Gemini see?"</p>
                    </button>
                </div>
            </div>
        </section>
    }
}

use leptos::prelude::*;

#[component]
pub fn Home<FC, FA>(on_start_camera: FC, on_analyze: FA) -> impl IntoView
where
    FC: Fn(()) + 'static + Clone + Send,
    FA: Fn(()) + 'static + Clone + Send,
{
    view! {
        <section class="home">
            <h2>"Step into the " <span class="accent">"Time Machine"</span></h2>
            <p class="text-muted">
                "Take a selfie and transport yourself to the Viking Age, the Roaring 20s, or a Cyberpunk future."
            </p>
            <div class="home-actions">
                <button class="btn btn-primary" on:click=move |_| on_start_camera(())>
                    "📷 Start Camera"
                </button>
                <button class="btn btn-secondary" on:click=move |_| on_analyze(())>
                    "🔍 Analyze Image"
                </button>
            </div>
        </section>
    }
}

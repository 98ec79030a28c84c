//! Header component

use leptos::prelude::*;

#[component]
pub fn Header<F>(on_home: F) -> impl IntoView
where
    F: Fn(()) + 'static + Clone + Send,
{
    view! {
        <header class="header">
            <div class="logo" on:click=move |_| on_home(())>
                <span class="logo-icon">"🕰"</span>
                <h1>"Chrono" <span class="accent">"Snap"</span></h1>
            </div>
            <div class="powered-by">"Powered by Google Gemini"</div>
        </header>
    }
}

//! Transient notification

use leptos::prelude::*;

use crate::context::Toast;

#[component]
pub fn ToastHost(toast: RwSignal<Option<Toast>>) -> impl IntoView {
    view! {
        <Show when=move || toast.with(Option::is_some)>
            <div class="toast" role="alert" on:click=move |_| toast.set(None)>
                {move || toast.with(|t| t.as_ref().map(|t| t.message.clone()).unwrap_or_default())}
            </div>
        </Show>
    }
}

//! Analyze screen: upload or reuse the session image, ask Gemini to describe it

use chronosnap_common::{Action, Completion};
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::HtmlInputElement;

use crate::context::AppContext;
use crate::upload;

#[component]
pub fn AnalysisView(ctx: AppContext) -> impl IntoView {
    let (question, set_question) = signal(String::new());

    let state = ctx.state;
    let image = move || {
        state.with(|s| {
            s.analysis()
                .and_then(|a| a.image())
                .map(|image| image.as_data_url().to_string())
        })
    };
    let has_image = move || state.with(|s| s.analysis().is_some_and(|a| a.image().is_some()));
    let is_analyzing = move || state.with(|s| s.analysis().is_some_and(|a| a.is_analyzing()));
    let result = move || state.with(|s| s.analysis().and_then(|a| a.result()).map(|r| r.text.clone()));

    let on_file = move |ev: leptos::ev::Event| {
        let input: HtmlInputElement = event_target(&ev);
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        // allow picking the same file again
        input.set_value("");

        let ticket = match state.try_update(|s| s.begin_upload()) {
            Some(Ok(ticket)) => ticket,
            _ => return,
        };
        spawn_local(async move {
            let outcome = upload::read_image(file).await;
            match state.try_update(|s| s.complete_upload(ticket, outcome)) {
                Some(Completion::Failed(err)) => {
                    gloo::console::warn!(format!("upload rejected: {err}"));
                    ctx.notify(err.to_string());
                }
                Some(Completion::Stale) => gloo::console::log!("upload dropped: superseded or screen closed"),
                _ => {}
            }
        });
    };

    let on_analyze = move |_| {
        let text = question.get_untracked();
        let instruction = (!text.trim().is_empty()).then_some(text);
        ctx.run_analysis(instruction);
    };

    view! {
        <section class="analysis-view">
            <div class="panel-title">
                <button class="btn-icon" on:click=move |_| ctx.dispatch(Action::Back)>"←"</button>
                <h2>"Deep Image Analysis"</h2>
            </div>

            <div class="analysis-layout">
                <div class="analysis-input">
                    <div class="image-frame">
                        <Show
                            when=has_image
                            fallback=|| view! { <p class="text-muted">"No image selected"</p> }
                        >
                            <img src=move || image().unwrap_or_default() alt="To Analyze" />
                        </Show>
                        <label class="upload-button">
                            <input type="file" accept="image/*" class="hidden" on:change=on_file />
                            {move || if has_image() { "⬆" } else { "⬆ Upload Photo" }}
                        </label>
                    </div>

                    <input
                        type="text"
                        class="question"
                        placeholder="Ask something specific (optional)"
                        prop:value=move || question.get()
                        on:input=move |ev| set_question.set(event_target_value(&ev))
                    />

                    <button
                        class="btn btn-primary"
                        disabled=move || !has_image() || is_analyzing()
                        on:click=on_analyze
                    >
                        {move || if is_analyzing() { "Neural Processing..." } else { "Analyze with Gemini" }}
                    </button>
                </div>

                <div class="analysis-report">
                    <h3>"Analysis Report"</h3>
                    {move || {
                        if is_analyzing() {
                            view! { <div class="skeleton"></div> }.into_any()
                        } else if let Some(text) = result() {
                            view! { <div class="report-text">{text}</div> }.into_any()
                        } else {
                            view! { <p class="text-muted">"Analysis results will appear here."</p> }.into_any()
                        }
                    }}
                </div>
            </div>
        </section>
    }
}

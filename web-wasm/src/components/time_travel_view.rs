//! Transform screen: era presets and custom edits

use chronosnap_common::{Action, Instruction, ERAS};
use leptos::prelude::*;

use crate::context::AppContext;

#[derive(Clone, Copy, PartialEq)]
enum Tab {
    Eras,
    Custom,
}

#[component]
pub fn TimeTravelView(ctx: AppContext) -> impl IntoView {
    let (tab, set_tab) = signal(Tab::Eras);
    let (custom_prompt, set_custom_prompt) = signal(String::new());

    let state = ctx.state;
    let is_processing = move || state.with(|s| s.transform().is_some_and(|t| t.is_processing()));
    let selected_era = move || state.with(|s| s.transform().and_then(|t| t.selected_era()));
    let source = move || {
        state.with(|s| {
            s.transform()
                .map(|t| t.image().as_data_url().to_string())
                .unwrap_or_default()
        })
    };
    let download = move || state.with(|s| s.transform().and_then(|t| t.download()));

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let text = custom_prompt.get_untracked();
        if text.trim().is_empty() {
            return;
        }
        ctx.run_edit(Instruction::custom(text));
    };

    view! {
        <section class="time-travel">
            <aside class="control-panel">
                <div class="panel-title">
                    <button class="btn-icon" on:click=move |_| ctx.dispatch(Action::Back)>"←"</button>
                    <h2>"Control Panel"</h2>
                </div>

                <div class="source-card">
                    <img src=source alt="Source" />
                    <div>
                        <p class="strong">"Source Identity"</p>
                        <p class="text-muted">"Ready for transport"</p>
                    </div>
                </div>

                <div class="tabs">
                    <button class:active=move || tab.get() == Tab::Eras on:click=move |_| set_tab.set(Tab::Eras)>
                        "Time Travel"
                    </button>
                    <button class:active=move || tab.get() == Tab::Custom on:click=move |_| set_tab.set(Tab::Custom)>
                        "Custom Edit"
                    </button>
                </div>

                <Show
                    when=move || tab.get() == Tab::Eras
                    fallback=move || view! {
                        <form class="custom-edit" on:submit=on_submit>
                            <p class="text-muted">
                                "Describe how you want to change the image. E.g., \"Add sunglasses\", \"Make it a pencil sketch\", \"Change background to Mars\"."
                            </p>
                            <textarea
                                placeholder="Enter your command..."
                                prop:value=move || custom_prompt.get()
                                on:input=move |ev| set_custom_prompt.set(event_target_value(&ev))
                            ></textarea>
                            <button
                                type="submit"
                                class="btn btn-primary"
                                disabled=move || is_processing() || custom_prompt.with(|p| p.trim().is_empty())
                            >
                                "Generate Edit"
                            </button>
                        </form>
                    }
                >
                    <div class="era-list">
                        {ERAS
                            .iter()
                            .map(|era| {
                                view! {
                                    <button
                                        class="era-card"
                                        class:selected=move || selected_era() == Some(era.id)
                                        disabled=is_processing
                                        on:click=move |_| ctx.run_edit(Instruction::Era(era))
                                    >
                                        <span class="era-icon">{era.icon}</span>
                                        <div>
                                            <h3>{era.name}</h3>
                                            <p class="text-muted">{era.description}</p>
                                        </div>
                                    </button>
                                }
                            })
                            .collect_view()}
                    </div>
                </Show>
            </aside>

            <div class="result-stage">
                <Show when=is_processing>
                    <div class="loading-overlay">
                        <div class="spinner"></div>
                        <p>"Manipulating Timeline..."</p>
                    </div>
                </Show>

                {move || match download() {
                    Some(download) => {
                        let url = download.image.as_data_url().to_string();
                        view! {
                            <img class="result-image" src=url.clone() alt="Generated Time Travel" />
                            <div class="result-actions">
                                <a class="btn btn-primary" href=url download=download.file_name>
                                    "Download"
                                </a>
                                <button class="btn btn-secondary" on:click=move |_| state.update(|s| s.reset_transform())>
                                    "Reset"
                                </button>
                            </div>
                        }
                        .into_any()
                    }
                    None => view! {
                        <div class="placeholder">
                            <p>"Select a destination"</p>
                        </div>
                    }
                    .into_any(),
                }}
            </div>
        </section>
    }
}

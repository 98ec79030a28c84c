//! Settings panel component

use leptos::prelude::*;

#[component]
pub fn SettingsPanel<FS, FL, FC>(
    api_key: RwSignal<String>,
    passphrase: ReadSignal<String>,
    set_passphrase: WriteSignal<String>,
    api_key_status: ReadSignal<String>,
    on_save_api_key: FS,
    on_load_api_key: FL,
    on_clear_api_key: FC,
) -> impl IntoView
where
    FS: Fn(()) + 'static + Clone + Send,
    FL: Fn(()) + 'static + Clone + Send,
    FC: Fn(()) + 'static + Clone + Send,
{
    view! {
        <details class="settings-panel">
            <summary>"⚙ Settings"</summary>
            <div class="settings-grid">
                <div class="form-group">
                    <label for="api-key">"Gemini API Key"</label>
                    <input
                        type="password"
                        id="api-key"
                        placeholder="Enter your API key..."
                        prop:value=move || api_key.get()
                        on:input=move |ev| {
                            api_key.set(event_target_value(&ev));
                        }
                    />
                    <a
                        href="https://aistudio.google.com/app/apikey"
                        target="_blank"
                        rel="noopener noreferrer"
                        class="api-key-link"
                    >
                        "Get an API key →"
                    </a>
                </div>

                <div class="form-group">
                    <label for="passphrase">"Passphrase for the stored key"</label>
                    <input
                        type="password"
                        id="passphrase"
                        placeholder="Enter a passphrase..."
                        prop:value=move || passphrase.get()
                        on:input=move |ev| {
                            set_passphrase.set(event_target_value(&ev));
                        }
                    />
                    <div class="api-actions">
                        <button class="btn btn-secondary btn-small" on:click=move |_| on_load_api_key(())>
                            "Load"
                        </button>
                        <button class="btn btn-primary btn-small" on:click=move |_| on_save_api_key(())>
                            "Save"
                        </button>
                        <button class="btn btn-tertiary btn-small" on:click=move |_| on_clear_api_key(())>
                            "Clear"
                        </button>
                    </div>
                    <div class="api-key-status">
                        {move || api_key_status.get()}
                    </div>
                </div>
            </div>
        </details>
    }
}

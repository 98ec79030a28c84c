//! Main application component

use chronosnap_common::{Action, Screen};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::camera::BrowserCamera;
use crate::components::{
    analysis_view::AnalysisView, camera_view::CameraView, header::Header, home::Home,
    preview::Preview, settings_panel::SettingsPanel, time_travel_view::TimeTravelView,
    toast::ToastHost,
};
use crate::context::AppContext;
use crate::secure_store;

#[component]
pub fn App() -> impl IntoView {
    let camera = match BrowserCamera::new() {
        Ok(camera) => camera,
        Err(err) => {
            gloo::console::error!("camera element could not be created", err);
            return view! { <p class="error-panel">"This browser cannot run ChronoSnap."</p> }
                .into_any();
        }
    };
    let ctx = AppContext::new(camera);

    // API key settings
    let (passphrase, set_passphrase) = signal(String::new());
    let (api_key_status, set_api_key_status) = signal(String::new());

    let on_save_api_key = move |_| {
        let api_key = ctx.api_key.get_untracked();
        let passphrase = passphrase.get_untracked();
        spawn_local(async move {
            match secure_store::encrypt_api_key(&api_key, &passphrase).await {
                Ok(()) => set_api_key_status.set("Saved (encrypted)".to_string()),
                Err(message) => set_api_key_status.set(message),
            }
        });
    };

    let on_load_api_key = move |_| {
        let passphrase = passphrase.get_untracked();
        spawn_local(async move {
            match secure_store::decrypt_api_key(&passphrase).await {
                Ok(key) => {
                    ctx.api_key.set(key);
                    set_api_key_status.set("Loaded".to_string());
                }
                Err(message) => set_api_key_status.set(message),
            }
        });
    };

    let on_clear_api_key = move |_| {
        secure_store::clear_api_key();
        ctx.api_key.set(String::new());
        set_api_key_status.set("Cleared".to_string());
    };

    let screen = Memo::new(move |_| ctx.state.with(|s| s.screen()));

    view! {
        <div class="container">
            <Header on_home=move |_| ctx.dispatch(Action::GoHome) />

            <SettingsPanel
                api_key=ctx.api_key
                passphrase=passphrase
                set_passphrase=set_passphrase
                api_key_status=api_key_status
                on_save_api_key=on_save_api_key
                on_load_api_key=on_load_api_key
                on_clear_api_key=on_clear_api_key
            />

            <main>
                {move || match screen.get() {
                    Screen::Home => view! {
                        <Home
                            on_start_camera=move |_| ctx.dispatch(Action::StartCamera)
                            on_analyze=move |_| ctx.dispatch(Action::OpenAnalyze)
                        />
                    }
                    .into_any(),
                    Screen::Capture => view! { <CameraView ctx=ctx /> }.into_any(),
                    Screen::Preview => view! {
                        <Preview
                            state=ctx.state
                            on_retake=move |_| ctx.dispatch(Action::Retake)
                            on_transform=move |_| ctx.dispatch(Action::OpenTransform)
                            on_analyze=move |_| ctx.dispatch(Action::OpenAnalyze)
                        />
                    }
                    .into_any(),
                    Screen::Transform => view! { <TimeTravelView ctx=ctx /> }.into_any(),
                    Screen::Analyze => view! { <AnalysisView ctx=ctx /> }.into_any(),
                }}
            </main>

            <ToastHost toast=ctx.toast />

            <footer class="footer">"ChronoSnap. Time travel is experimental."</footer>
        </div>
    }
    .into_any()
}

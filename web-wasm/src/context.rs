//! Shared application handles
//!
//! Everything here is an arena handle, so the context is `Copy` and can be
//! moved into any number of event handlers.

use std::rc::Rc;

use chronosnap_common::{
    Action, AppState, CaptureAdapter, CaptureState, Completion, Effect, Instruction,
};
use gloo::timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::gemini;
use crate::camera::{BrowserCamera, SharedCamera};

pub const TIME_TRAVEL_FAILED: &str = "Time travel failed. The vortex is unstable. (API Error)";
pub const ANALYSIS_FAILED: &str = "Error analyzing image. Please try again.";

const TOAST_MILLIS: u32 = 4_000;

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
}

#[derive(Clone, Copy)]
pub struct AppContext {
    pub state: RwSignal<AppState>,
    pub camera: SharedCamera,
    pub camera_state: RwSignal<CaptureState>,
    pub api_key: RwSignal<String>,
    pub toast: RwSignal<Option<Toast>>,
    toast_seq: StoredValue<u64>,
}

impl AppContext {
    pub fn new(camera: BrowserCamera) -> Self {
        Self {
            state: RwSignal::new(AppState::new()),
            camera: StoredValue::new_local(Rc::new(CaptureAdapter::new(camera))),
            camera_state: RwSignal::new(CaptureState::Idle),
            api_key: RwSignal::new(String::new()),
            toast: RwSignal::new(None),
            toast_seq: StoredValue::new(0),
        }
    }

    /// Applies a user action and runs the camera effects it asks for.
    pub fn dispatch(&self, action: Action) {
        let effects = self
            .state
            .try_update(|state| state.dispatch(action))
            .unwrap_or_default();

        for effect in effects {
            match effect {
                Effect::StartCamera => self.start_camera(),
                Effect::StopCamera => self.stop_camera(),
            }
        }
    }

    pub fn start_camera(&self) {
        let camera = self.camera.get_value();
        let camera_state = self.camera_state;
        camera_state.set(CaptureState::Requesting);
        spawn_local(async move {
            // failure is reflected in the adapter state
            let _ = camera.start().await;
            camera_state.set(camera.state());
        });
    }

    pub fn restart_camera(&self) {
        let camera = self.camera.get_value();
        let camera_state = self.camera_state;
        camera_state.set(CaptureState::Requesting);
        spawn_local(async move {
            let _ = camera.restart().await;
            camera_state.set(camera.state());
        });
    }

    pub fn stop_camera(&self) {
        self.camera.with_value(|camera| camera.stop());
        self.camera_state.set(CaptureState::Idle);
    }

    /// Shows a transient notification.
    pub fn notify(&self, message: impl Into<String>) {
        let id = self.toast_seq.with_value(|seq| seq + 1);
        self.toast_seq.set_value(id);
        self.toast.set(Some(Toast {
            id,
            message: message.into(),
        }));

        let toast = self.toast;
        Timeout::new(TOAST_MILLIS, move || {
            toast.update(|current| {
                if current.as_ref().is_some_and(|t| t.id == id) {
                    *current = None;
                }
            });
        })
        .forget();
    }

    pub fn run_edit(&self, instruction: Instruction) {
        let client = match gemini::client(&self.api_key.get_untracked()) {
            Ok(client) => client,
            Err(message) => return self.notify(message),
        };
        let pending = match self.state.try_update(|state| state.begin_edit(instruction)) {
            Some(Ok(pending)) => pending,
            Some(Err(err)) => return self.notify(err.to_string()),
            None => return,
        };

        let ctx = *self;
        spawn_local(async move {
            let outcome = client.edit(&pending.image, pending.instruction.text()).await;
            let completion = ctx
                .state
                .try_update(|state| state.complete_edit(pending.ticket, outcome));
            if let Some(Completion::Failed(err)) = completion {
                gloo::console::error!(format!("edit failed: {err}"));
                ctx.notify(TIME_TRAVEL_FAILED);
            }
        });
    }

    pub fn run_analysis(&self, instruction: Option<String>) {
        let client = match gemini::client(&self.api_key.get_untracked()) {
            Ok(client) => client,
            Err(message) => return self.notify(message),
        };
        let pending = match self
            .state
            .try_update(|state| state.begin_analysis(instruction.as_deref()))
        {
            Some(Ok(pending)) => pending,
            Some(Err(err)) => return self.notify(err.to_string()),
            None => return,
        };

        let ctx = *self;
        spawn_local(async move {
            let outcome = client
                .analyze(&pending.image, pending.instruction.as_deref())
                .await;
            let created_at_ms = js_sys::Date::now() as u64;
            let completion = ctx
                .state
                .try_update(|state| state.complete_analysis(pending.ticket, outcome, created_at_ms));
            if let Some(Completion::Failed(err)) = completion {
                gloo::console::error!(format!("analysis failed: {err}"));
                ctx.notify(ANALYSIS_FAILED);
            }
        });
    }
}

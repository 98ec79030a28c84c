//! Application view-state machine
//!
//! | From      | Action        | To                         | Effect      |
//! |-----------|---------------|----------------------------|-------------|
//! | Home      | StartCamera   | Capture                    | StartCamera |
//! | Home      | OpenAnalyze   | Analyze                    |             |
//! | Capture   | FrameCaptured | Preview                    | StopCamera  |
//! | Capture   | CancelCapture | Home                       | StopCamera  |
//! | Preview   | Retake        | Capture                    | StartCamera |
//! | Preview   | OpenTransform | Transform                  |             |
//! | Preview   | OpenAnalyze   | Analyze                    |             |
//! | Transform | Back          | Preview                    |             |
//! | Analyze   | Back          | Preview (with image) / Home|             |
//! | any       | GoHome        | Home                       | StopCamera if leaving Capture |
//!
//! Each view variant carries only the data valid in it, so "Home with an
//! image" cannot be represented. Actions that do not apply to the current view
//! are ignored.

use crate::codec::EncodedImage;
use crate::error::{Error, Result};
use crate::session::{AnalysisSession, Completion, PendingAnalysis, PendingEdit, TransformSession};
use crate::request::RequestTicket;
use crate::types::Instruction;

#[derive(Debug, Clone)]
pub enum View {
    Home,
    Capture,
    Preview { image: EncodedImage },
    Transform(TransformSession),
    Analyze(AnalysisSession),
}

/// Discriminant of [`View`], for rendering and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Home,
    Capture,
    Preview,
    Transform,
    Analyze,
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Home => "Home",
            Screen::Capture => "Capture",
            Screen::Preview => "Preview",
            Screen::Transform => "Transform",
            Screen::Analyze => "Analyze",
        }
    }
}

/// User or device events
#[derive(Debug, Clone)]
pub enum Action {
    StartCamera,
    OpenAnalyze,
    FrameCaptured(EncodedImage),
    CancelCapture,
    Retake,
    OpenTransform,
    Back,
    GoHome,
}

/// Side effects the front end must carry out after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    StartCamera,
    StopCamera,
}

#[derive(Debug, Clone)]
pub struct AppState {
    view: View,
    next_screen_id: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl View {
    pub fn screen(&self) -> Screen {
        match self {
            View::Home => Screen::Home,
            View::Capture => Screen::Capture,
            View::Preview { .. } => Screen::Preview,
            View::Transform(_) => Screen::Transform,
            View::Analyze(_) => Screen::Analyze,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            view: View::Home,
            next_screen_id: 0,
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn screen(&self) -> Screen {
        self.view.screen()
    }

    /// The captured or uploaded image the current view holds, if any
    pub fn session_image(&self) -> Option<&EncodedImage> {
        match &self.view {
            View::Home | View::Capture => None,
            View::Preview { image } => Some(image),
            View::Transform(session) => Some(session.image()),
            View::Analyze(session) => session.image(),
        }
    }

    pub fn transform(&self) -> Option<&TransformSession> {
        match &self.view {
            View::Transform(session) => Some(session),
            _ => None,
        }
    }

    pub fn analysis(&self) -> Option<&AnalysisSession> {
        match &self.view {
            View::Analyze(session) => Some(session),
            _ => None,
        }
    }

    fn next_screen(&mut self) -> u64 {
        self.next_screen_id += 1;
        self.next_screen_id
    }

    /// Applies an action and returns the effects to run.
    pub fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        let from = self.screen();
        let view = std::mem::replace(&mut self.view, View::Home);

        let (view, effects) = match (view, action) {
            (View::Capture, Action::GoHome) => (View::Home, vec![Effect::StopCamera]),
            (_, Action::GoHome) => (View::Home, vec![]),

            (View::Home, Action::StartCamera) => (View::Capture, vec![Effect::StartCamera]),
            (View::Home, Action::OpenAnalyze) => {
                let id = self.next_screen();
                (View::Analyze(AnalysisSession::new(id, None)), vec![])
            }

            (View::Capture, Action::FrameCaptured(image)) => {
                (View::Preview { image }, vec![Effect::StopCamera])
            }
            (View::Capture, Action::CancelCapture) => (View::Home, vec![Effect::StopCamera]),

            (View::Preview { .. }, Action::Retake) => (View::Capture, vec![Effect::StartCamera]),
            (View::Preview { image }, Action::OpenTransform) => {
                let id = self.next_screen();
                (View::Transform(TransformSession::new(id, image)), vec![])
            }
            (View::Preview { image }, Action::OpenAnalyze) => {
                let id = self.next_screen();
                (View::Analyze(AnalysisSession::new(id, Some(image))), vec![])
            }

            (View::Transform(session), Action::Back) => (
                View::Preview {
                    image: session.image().clone(),
                },
                vec![],
            ),
            (View::Analyze(session), Action::Back) => match session.into_image() {
                Some(image) => (View::Preview { image }, vec![]),
                None => (View::Home, vec![]),
            },

            (view, action) => {
                tracing::debug!(screen = from.as_str(), ?action, "action ignored");
                (view, vec![])
            }
        };

        self.view = view;
        if self.screen() != from {
            tracing::debug!(from = from.as_str(), to = self.screen().as_str(), "view changed");
        }
        effects
    }

    pub fn begin_edit(&mut self, instruction: Instruction) -> Result<PendingEdit> {
        match &mut self.view {
            View::Transform(session) => session.begin(instruction),
            other => Err(Error::WrongScreen(other.screen().as_str())),
        }
    }

    /// Applies an edit result; stale if the Transform screen that asked is gone.
    pub fn complete_edit(&mut self, ticket: RequestTicket, outcome: Result<EncodedImage>) -> Completion {
        match &mut self.view {
            View::Transform(session) => session.complete(ticket, outcome),
            _ => Completion::Stale,
        }
    }

    pub fn reset_transform(&mut self) {
        if let View::Transform(session) = &mut self.view {
            session.reset();
        }
    }

    /// Registers a file pick on the Analyze screen; the ticket names this
    /// screen instance and this pick.
    pub fn begin_upload(&mut self) -> Result<RequestTicket> {
        match &mut self.view {
            View::Analyze(session) => Ok(session.begin_upload()),
            other => Err(Error::WrongScreen(other.screen().as_str())),
        }
    }

    /// Replaces the working image with a finished upload; stale if the
    /// Analyze screen that asked is gone or a newer file was picked.
    pub fn complete_upload(&mut self, ticket: RequestTicket, outcome: Result<EncodedImage>) -> Completion {
        match &mut self.view {
            View::Analyze(session) => session.complete_upload(ticket, outcome),
            _ => Completion::Stale,
        }
    }

    pub fn begin_analysis(&mut self, instruction: Option<&str>) -> Result<PendingAnalysis> {
        match &mut self.view {
            View::Analyze(session) => session.begin(instruction),
            other => Err(Error::WrongScreen(other.screen().as_str())),
        }
    }

    pub fn complete_analysis(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<String>,
        created_at_ms: u64,
    ) -> Completion {
        match &mut self.view {
            View::Analyze(session) => session.complete(ticket, outcome, created_at_ms),
            _ => Completion::Stale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::testing::FakeCamera;
    use crate::capture::CaptureAdapter;
    use futures::executor::block_on;

    fn image(tag: &str) -> EncodedImage {
        crate::codec::encode_upload("image/png", tag.as_bytes()).unwrap()
    }

    /// Runs effects the way a front end does
    fn run(adapter: &CaptureAdapter<FakeCamera>, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartCamera => block_on(adapter.start()).unwrap(),
                Effect::StopCamera => adapter.stop(),
            }
        }
    }

    fn counts(adapter: &CaptureAdapter<FakeCamera>) -> (u32, u32) {
        let c = &adapter.device().counters;
        (c.acquired.get(), c.released.get())
    }

    fn upload(state: &mut AppState, tag: &str) {
        let ticket = state.begin_upload().unwrap();
        assert_eq!(state.complete_upload(ticket, Ok(image(tag))), Completion::Applied);
    }

    fn preview_with(state: &mut AppState, tag: &str) {
        state.dispatch(Action::StartCamera);
        state.dispatch(Action::FrameCaptured(image(tag)));
        assert_eq!(state.screen(), Screen::Preview);
    }

    // =============================================
    // Navigation
    // =============================================

    #[test]
    fn test_initial_state_is_home() {
        let state = AppState::new();
        assert_eq!(state.screen(), Screen::Home);
        assert!(state.session_image().is_none());
    }

    #[test]
    fn test_capture_retake_stops_once_between() {
        let adapter = CaptureAdapter::new(FakeCamera::new());
        let mut state = AppState::new();

        run(&adapter, state.dispatch(Action::StartCamera));
        assert_eq!(state.screen(), Screen::Capture);
        assert_eq!(counts(&adapter), (1, 0));

        let frame = adapter.capture_frame().unwrap();
        run(&adapter, state.dispatch(Action::FrameCaptured(frame.clone())));
        assert_eq!(state.screen(), Screen::Preview);
        assert_eq!(state.session_image(), Some(&frame));
        assert_eq!(counts(&adapter), (1, 1));

        run(&adapter, state.dispatch(Action::Retake));
        assert_eq!(state.screen(), Screen::Capture);
        assert!(state.session_image().is_none());
        assert_eq!(counts(&adapter), (2, 1));
    }

    #[test]
    fn test_capture_exit_paths_release_device() {
        // cancel
        let adapter = CaptureAdapter::new(FakeCamera::new());
        let mut state = AppState::new();
        run(&adapter, state.dispatch(Action::StartCamera));
        run(&adapter, state.dispatch(Action::CancelCapture));
        assert_eq!(state.screen(), Screen::Home);
        assert_eq!(counts(&adapter), (1, 1));

        // successful capture
        let adapter = CaptureAdapter::new(FakeCamera::new());
        let mut state = AppState::new();
        run(&adapter, state.dispatch(Action::StartCamera));
        let frame = adapter.capture_frame().unwrap();
        run(&adapter, state.dispatch(Action::FrameCaptured(frame)));
        assert_eq!(counts(&adapter), (1, 1));

        // logo click
        let adapter = CaptureAdapter::new(FakeCamera::new());
        let mut state = AppState::new();
        run(&adapter, state.dispatch(Action::StartCamera));
        run(&adapter, state.dispatch(Action::GoHome));
        assert_eq!(counts(&adapter), (1, 1));

        // forced unmount
        let camera = FakeCamera::new();
        let counters = std::rc::Rc::clone(&camera.counters);
        let adapter = CaptureAdapter::new(camera);
        let mut state = AppState::new();
        run(&adapter, state.dispatch(Action::StartCamera));
        drop(adapter);
        assert_eq!((counters.acquired.get(), counters.released.get()), (1, 1));
    }

    #[test]
    fn test_home_to_analyze_and_back() {
        let mut state = AppState::new();
        assert!(state.dispatch(Action::OpenAnalyze).is_empty());
        assert_eq!(state.screen(), Screen::Analyze);

        state.dispatch(Action::Back);
        assert_eq!(state.screen(), Screen::Home);
    }

    #[test]
    fn test_preview_to_analyze_and_back_keeps_image() {
        let mut state = AppState::new();
        preview_with(&mut state, "f");
        state.dispatch(Action::OpenAnalyze);
        assert_eq!(state.analysis().unwrap().image(), Some(&image("f")));

        state.dispatch(Action::Back);
        assert_eq!(state.screen(), Screen::Preview);
        assert_eq!(state.session_image(), Some(&image("f")));
    }

    #[test]
    fn test_upload_on_analyze_becomes_session_image() {
        let mut state = AppState::new();
        state.dispatch(Action::OpenAnalyze);
        upload(&mut state, "upload");

        state.dispatch(Action::Back);
        assert_eq!(state.screen(), Screen::Preview);
        assert_eq!(state.session_image(), Some(&image("upload")));
    }

    #[test]
    fn test_go_home_discards_everything() {
        let mut state = AppState::new();
        preview_with(&mut state, "f");
        state.dispatch(Action::OpenTransform);
        let effects = state.dispatch(Action::GoHome);
        assert!(effects.is_empty());
        assert_eq!(state.screen(), Screen::Home);
        assert!(state.session_image().is_none());
    }

    #[test]
    fn test_invalid_actions_are_ignored() {
        let mut state = AppState::new();
        assert!(state.dispatch(Action::Retake).is_empty());
        assert!(state.dispatch(Action::Back).is_empty());
        assert!(state.dispatch(Action::FrameCaptured(image("x"))).is_empty());
        assert_eq!(state.screen(), Screen::Home);

        preview_with(&mut state, "f");
        assert!(state.dispatch(Action::CancelCapture).is_empty());
        assert_eq!(state.screen(), Screen::Preview);
        assert_eq!(state.session_image(), Some(&image("f")));
    }

    #[test]
    fn test_requests_on_wrong_screen() {
        let mut state = AppState::new();
        assert_eq!(
            state.begin_edit(Instruction::custom("hat")).unwrap_err(),
            Error::WrongScreen("Home")
        );
        assert_eq!(state.begin_analysis(None).unwrap_err(), Error::WrongScreen("Home"));
        assert_eq!(state.begin_upload().unwrap_err(), Error::WrongScreen("Home"));
    }

    // =============================================
    // Transform
    // =============================================

    #[test]
    fn test_transform_back_and_again_shows_no_stale_result() {
        let mut state = AppState::new();
        preview_with(&mut state, "f");

        state.dispatch(Action::OpenTransform);
        let pending = state.begin_edit(Instruction::era("vikings").unwrap()).unwrap();
        assert_eq!(pending.image, image("f"));
        assert_eq!(state.complete_edit(pending.ticket, Ok(image("g"))), Completion::Applied);
        assert_eq!(state.transform().unwrap().displayed_result().unwrap().image, image("g"));

        state.dispatch(Action::Back);
        assert_eq!(state.screen(), Screen::Preview);
        assert_eq!(state.session_image(), Some(&image("f")));

        state.dispatch(Action::OpenTransform);
        assert!(state.transform().unwrap().displayed_result().is_none());
        state.begin_edit(Instruction::era("cyberpunk").unwrap()).unwrap();
        let session = state.transform().unwrap();
        assert!(session.is_processing());
        assert!(session.displayed_result().is_none());
    }

    #[test]
    fn test_edit_result_after_leaving_screen_is_stale() {
        let mut state = AppState::new();
        preview_with(&mut state, "f");
        state.dispatch(Action::OpenTransform);
        let pending = state.begin_edit(Instruction::era("egypt").unwrap()).unwrap();

        state.dispatch(Action::Back);
        assert_eq!(state.complete_edit(pending.ticket, Ok(image("late"))), Completion::Stale);

        // a fresh Transform screen does not accept the old ticket either
        state.dispatch(Action::OpenTransform);
        assert_eq!(state.complete_edit(pending.ticket, Ok(image("late"))), Completion::Stale);
        assert!(state.transform().unwrap().displayed_result().is_none());
        assert!(!state.transform().unwrap().is_processing());
    }

    // =============================================
    // Analyze
    // =============================================

    #[test]
    fn test_analysis_for_replaced_upload_is_discarded() {
        let mut state = AppState::new();
        state.dispatch(Action::OpenAnalyze);
        upload(&mut state, "f1");
        let first = state.begin_analysis(None).unwrap();
        assert_eq!(first.image, image("f1"));

        upload(&mut state, "f2");
        assert_eq!(
            state.complete_analysis(first.ticket, Ok("about f1".into()), 10),
            Completion::Stale
        );
        assert!(state.analysis().unwrap().result().is_none());

        let second = state.begin_analysis(None).unwrap();
        assert_eq!(second.image, image("f2"));
        assert_eq!(
            state.complete_analysis(second.ticket, Ok("about f2".into()), 20),
            Completion::Applied
        );
        assert_eq!(state.analysis().unwrap().result().unwrap().text, "about f2");
    }

    #[test]
    fn test_out_of_order_uploads_keep_last_pick() {
        let mut state = AppState::new();
        state.dispatch(Action::OpenAnalyze);
        let f1 = state.begin_upload().unwrap();
        let f2 = state.begin_upload().unwrap();

        // the smaller second file finishes reading first
        assert_eq!(state.complete_upload(f2, Ok(image("f2"))), Completion::Applied);
        assert_eq!(state.complete_upload(f1, Ok(image("f1"))), Completion::Stale);
        assert_eq!(state.session_image(), Some(&image("f2")));
    }

    #[test]
    fn test_upload_from_closed_analyze_screen_is_stale() {
        let mut state = AppState::new();
        state.dispatch(Action::OpenAnalyze);
        let pending = state.begin_upload().unwrap();

        state.dispatch(Action::Back);
        assert_eq!(state.screen(), Screen::Home);
        assert_eq!(state.complete_upload(pending, Ok(image("late"))), Completion::Stale);

        state.dispatch(Action::OpenAnalyze);
        assert_eq!(state.complete_upload(pending, Ok(image("late"))), Completion::Stale);
        assert!(state.session_image().is_none());
    }

    #[test]
    fn test_analysis_result_discarded_on_back() {
        let mut state = AppState::new();
        preview_with(&mut state, "f");
        state.dispatch(Action::OpenAnalyze);
        let pending = state.begin_analysis(Some("Describe the mood")).unwrap();
        assert_eq!(pending.instruction.as_deref(), Some("Describe the mood"));

        state.dispatch(Action::Back);
        assert_eq!(state.complete_analysis(pending.ticket, Ok("late".into()), 1), Completion::Stale);

        state.dispatch(Action::OpenAnalyze);
        assert!(state.analysis().unwrap().result().is_none());
    }
}

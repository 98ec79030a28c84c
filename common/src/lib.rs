//! ChronoSnap Common Library
//!
//! Platform-independent core shared by the CLI and the web (WASM) app:
//! codec, era catalog, Gemini clients, capture adapter and view-state machine.

pub mod capture;
pub mod codec;
pub mod eras;
pub mod error;
pub mod gemini;
pub mod prompts;
pub mod request;
pub mod session;
pub mod state;
pub mod types;

pub use capture::{CaptureAdapter, CaptureDevice, CaptureState, StreamConstraints, VideoStream};
pub use codec::{EncodedImage, ImagePayload, RgbaFrame};
pub use eras::{find_era, EraPreset, ERAS};
pub use error::{Error, Result};
pub use gemini::{GeminiClient, HttpRequest, HttpResponse, Transport};
pub use request::RequestTicket;
pub use session::{AnalysisSession, Completion, PendingAnalysis, PendingEdit, TransformSession};
pub use state::{Action, AppState, Effect, Screen, View};
pub use types::{AnalysisResult, Download, Instruction, TransformResult, DOWNLOAD_FILE_NAME};

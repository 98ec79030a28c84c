//! Per-screen sessions for the Transform and Analyze screens
//!
//! A session lives exactly as long as its screen. It hands out pending
//! requests that own a copy of their input image, and applies completions
//! only while the request is still current.

use crate::codec::EncodedImage;
use crate::error::{Error, Result};
use crate::prompts;
use crate::request::{RequestGate, RequestTicket};
use crate::types::{AnalysisResult, Download, Instruction, TransformResult};

/// What happened to a completed request
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// The result is now shown
    Applied,
    /// The request failed; the previous result (if any) is still shown
    Failed(Error),
    /// The originating screen or image is gone; the result was dropped
    Stale,
}

/// An edit request ready to be sent
#[derive(Debug, Clone)]
pub struct PendingEdit {
    pub ticket: RequestTicket,
    pub image: EncodedImage,
    pub instruction: Instruction,
}

/// An analysis request ready to be sent
#[derive(Debug, Clone)]
pub struct PendingAnalysis {
    pub ticket: RequestTicket,
    pub image: EncodedImage,
    pub instruction: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TransformSession {
    image: EncodedImage,
    gate: RequestGate,
    result: Option<TransformResult>,
    pending: Option<Instruction>,
    selected_era: Option<&'static str>,
}

impl TransformSession {
    pub fn new(screen: u64, image: EncodedImage) -> Self {
        Self {
            image,
            gate: RequestGate::new(screen),
            result: None,
            pending: None,
            selected_era: None,
        }
    }

    pub fn image(&self) -> &EncodedImage {
        &self.image
    }

    /// True while a generation is in flight (controls disabled)
    pub fn is_processing(&self) -> bool {
        self.gate.is_busy()
    }

    pub fn selected_era(&self) -> Option<&'static str> {
        self.selected_era
    }

    /// Result to display. Hidden while a newer request is pending so a stale
    /// image is never shown next to a new selection.
    pub fn displayed_result(&self) -> Option<&TransformResult> {
        if self.gate.is_busy() {
            None
        } else {
            self.result.as_ref()
        }
    }

    pub fn download(&self) -> Option<Download> {
        self.displayed_result().map(TransformResult::download)
    }

    pub fn begin(&mut self, instruction: Instruction) -> Result<PendingEdit> {
        prompts::validate_instruction(instruction.text())?;
        let ticket = self.gate.begin()?;

        if let Some(id) = instruction.era_id() {
            self.selected_era = Some(id);
        }
        self.pending = Some(instruction.clone());
        tracing::debug!(instruction = %instruction.label(), "edit requested");

        Ok(PendingEdit {
            ticket,
            image: self.image.clone(),
            instruction,
        })
    }

    pub fn complete(&mut self, ticket: RequestTicket, outcome: Result<EncodedImage>) -> Completion {
        if !self.gate.finish(ticket) {
            tracing::debug!("dropping stale edit result");
            return Completion::Stale;
        }
        let instruction = self.pending.take();

        match (outcome, instruction) {
            (Ok(image), Some(instruction)) => {
                self.result = Some(TransformResult { image, instruction });
                Completion::Applied
            }
            (Ok(_), None) => Completion::Stale,
            (Err(err), _) => Completion::Failed(err),
        }
    }

    /// Clears the result and the preset highlight
    pub fn reset(&mut self) {
        if self.gate.is_busy() {
            return;
        }
        self.result = None;
        self.selected_era = None;
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisSession {
    image: Option<EncodedImage>,
    gate: RequestGate,
    // file reads in progress; the latest pick wins
    uploads: RequestGate,
    result: Option<AnalysisResult>,
}

impl AnalysisSession {
    pub fn new(screen: u64, image: Option<EncodedImage>) -> Self {
        Self {
            image,
            gate: RequestGate::new(screen),
            uploads: RequestGate::new(screen),
            result: None,
        }
    }

    pub fn image(&self) -> Option<&EncodedImage> {
        self.image.as_ref()
    }

    pub fn into_image(self) -> Option<EncodedImage> {
        self.image
    }

    pub fn is_analyzing(&self) -> bool {
        self.gate.is_busy()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    /// Swaps the working image; any previous or in-flight analysis is dropped.
    pub fn replace_image(&mut self, image: EncodedImage) {
        self.image = Some(image);
        self.result = None;
        self.gate.invalidate();
    }

    /// Starts reading a picked file. Supersedes any earlier pick still loading.
    pub fn begin_upload(&mut self) -> RequestTicket {
        self.uploads.supersede()
    }

    /// Applies a finished file read if it is still the latest pick.
    pub fn complete_upload(&mut self, ticket: RequestTicket, outcome: Result<EncodedImage>) -> Completion {
        if !self.uploads.finish(ticket) {
            tracing::debug!("dropping stale upload");
            return Completion::Stale;
        }
        match outcome {
            Ok(image) => {
                self.replace_image(image);
                Completion::Applied
            }
            Err(err) => Completion::Failed(err),
        }
    }

    pub fn begin(&mut self, instruction: Option<&str>) -> Result<PendingAnalysis> {
        let image = self.image.clone().ok_or(Error::NoImage)?;
        let ticket = self.gate.begin()?;
        self.result = None;

        Ok(PendingAnalysis {
            ticket,
            image,
            instruction: instruction.map(str::to_string),
        })
    }

    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<String>,
        created_at_ms: u64,
    ) -> Completion {
        if !self.gate.finish(ticket) {
            tracing::debug!("dropping stale analysis result");
            return Completion::Stale;
        }
        match outcome {
            Ok(text) => {
                self.result = Some(AnalysisResult { text, created_at_ms });
                Completion::Applied
            }
            Err(err) => Completion::Failed(err),
        }
    }
}

//! Result types
//!
//! Shared by the CLI and the web app:
//! - Instruction: an era preset or a custom edit
//! - TransformResult: output of the edit client and what produced it
//! - AnalysisResult: output of the analysis client
//! - Download: the current result offered as a file

use crate::codec::EncodedImage;
use crate::eras::{self, EraPreset};
use crate::error::{Error, Result};

/// File name offered when downloading a transform result
pub const DOWNLOAD_FILE_NAME: &str = "chronosnap-result.png";

/// What the edit client is asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Era(&'static EraPreset),
    Custom(String),
}

impl Instruction {
    pub fn era(id: &str) -> Result<Self> {
        eras::find_era(id)
            .map(Instruction::Era)
            .ok_or_else(|| Error::UnknownEra(id.to_string()))
    }

    pub fn custom(text: impl Into<String>) -> Self {
        Instruction::Custom(text.into())
    }

    /// Instruction text before the identity directive is added
    pub fn text(&self) -> &str {
        match self {
            Instruction::Era(era) => era.instruction,
            Instruction::Custom(text) => text,
        }
    }

    pub fn era_id(&self) -> Option<&'static str> {
        match self {
            Instruction::Era(era) => Some(era.id),
            Instruction::Custom(_) => None,
        }
    }

    /// Short label for status lines
    pub fn label(&self) -> String {
        match self {
            Instruction::Era(era) => format!("{} {}", era.icon, era.name),
            Instruction::Custom(text) => format!("\"{}\"", text.trim()),
        }
    }
}

/// Generated image and the instruction that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct TransformResult {
    pub image: EncodedImage,
    pub instruction: Instruction,
}

/// Free-text description and its creation time (ms since the Unix epoch)
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub text: String,
    pub created_at_ms: u64,
}

/// A file offered to the user
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub file_name: &'static str,
    pub image: EncodedImage,
}

impl TransformResult {
    pub fn download(&self) -> Download {
        Download {
            file_name: DOWNLOAD_FILE_NAME,
            image: self.image.clone(),
        }
    }
}

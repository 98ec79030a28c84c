//! Prompt construction
//!
//! Shared by the CLI and the web app:
//! - build_edit_prompt: wraps an era preset or custom edit with the identity directive
//! - DEFAULT_ANALYSIS_PROMPT: the descriptive prompt used when none is supplied
//! - NO_ANALYSIS_FALLBACK: returned when the analysis endpoint produces no text

use crate::error::{Error, Result};

/// Descriptive prompt used by the analysis client by default
pub const DEFAULT_ANALYSIS_PROMPT: &str =
    "Analyze this image in detail. Describe the lighting, subjects, and mood.";

/// Soft-failure text for an analysis response without text
pub const NO_ANALYSIS_FALLBACK: &str = "No analysis could be generated.";

const EDIT_PREFIX: &str = "Edit this image.";
const IDENTITY_DIRECTIVE: &str = "Maintain the person's facial identity as much as possible \
     but change the style and environment completely.";

/// Returns the trimmed instruction, or `Error::EmptyInstruction`.
pub fn validate_instruction(instruction: &str) -> Result<&str> {
    let trimmed = instruction.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyInstruction);
    }
    Ok(trimmed)
}

/// Wraps an edit instruction with the identity-preserving directive
///
/// # Arguments
/// * `instruction` - preset instruction text or the user's custom edit
///
/// # Returns
/// The full prompt sent to the edit endpoint
pub fn build_edit_prompt(instruction: &str) -> Result<String> {
    let instruction = validate_instruction(instruction)?;
    Ok(format!("{EDIT_PREFIX} {instruction} {IDENTITY_DIRECTIVE}"))
}

/// Analysis prompt, falling back to [`DEFAULT_ANALYSIS_PROMPT`] when blank
pub fn analysis_prompt(instruction: Option<&str>) -> &str {
    instruction
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_ANALYSIS_PROMPT)
}

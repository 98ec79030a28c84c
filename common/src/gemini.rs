//! Gemini API integration
//!
//! Edit:    image + instruction -> image (`gemini-2.5-flash-image`)
//! Analyze: image + instruction -> text  (`gemini-3-pro-preview`)
//!
//! The HTTP layer is abstracted behind [`Transport`] so the same client runs
//! on `fetch` in the browser and on `reqwest` in the CLI.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::codec::{self, EncodedImage, ImagePayload};
use crate::error::{Error, Result};
use crate::prompts::{self, NO_ANALYSIS_FALLBACK};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const EDIT_MODEL: &str = "gemini-2.5-flash-image";
pub const ANALYSIS_MODEL: &str = "gemini-3-pro-preview";

/// Message for an edit response that carried no inline image
pub const NO_IMAGE_PRODUCED: &str = "no image produced";

/// Gemini API request
#[derive(Debug, Serialize)]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InlineData {
    #[serde(default, alias = "mimeType")]
    pub mime_type: String,
    pub data: String,
}

/// Gemini API response
#[derive(Debug, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<ResponseContent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, alias = "inlineData")]
    pub inline_data: Option<InlineData>,
}

impl GenerateRequest {
    /// Text first, then the image, matching what the endpoint expects for edits.
    pub fn with_image(instruction: &str, image: &EncodedImage) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: instruction.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.mime_type().to_string(),
                            data: image.base64_data().to_string(),
                        },
                    },
                ],
            }],
        }
    }
}

impl GenerateResponse {
    fn first_parts(&self) -> &[ResponsePart] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
    }

    /// First inline image of the first candidate
    pub fn first_inline_image(&self) -> Option<&InlineData> {
        self.first_parts()
            .iter()
            .filter_map(|part| part.inline_data.as_ref())
            .find(|inline| !inline.data.is_empty())
    }

    /// Text parts of the first candidate, concatenated
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .first_parts()
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// An outgoing POST with a JSON body
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub body: String,
}

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// HTTP seam between the client and the platform
///
/// Implementations only fail for transport-level problems (DNS, CORS,
/// timeouts); non-2xx statuses are returned as responses.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn post_json(&self, request: HttpRequest) -> std::result::Result<HttpResponse, String>;
}

/// Edit / analysis client for the Gemini `generateContent` endpoint
pub struct GeminiClient<T> {
    transport: T,
    api_key: String,
    api_base: String,
    edit_model: String,
    analysis_model: String,
}

impl<T: Transport> GeminiClient<T> {
    pub fn new(transport: T, api_key: impl Into<String>) -> Self {
        Self {
            transport,
            api_key: api_key.into(),
            api_base: GEMINI_API_BASE.to_string(),
            edit_model: EDIT_MODEL.to_string(),
            analysis_model: ANALYSIS_MODEL.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_models(mut self, edit_model: impl Into<String>, analysis_model: impl Into<String>) -> Self {
        self.edit_model = edit_model.into();
        self.analysis_model = analysis_model.into();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        let model = model.trim();
        let model_path = model.strip_prefix("models/").unwrap_or(model);
        format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base, model_path, self.api_key
        )
    }

    async fn generate(&self, model: &str, request: &GenerateRequest) -> std::result::Result<GenerateResponse, String> {
        let body = serde_json::to_string(request).map_err(|e| e.to_string())?;
        tracing::debug!(model, bytes = body.len(), "calling generateContent");

        let response = self
            .transport
            .post_json(HttpRequest {
                url: self.endpoint(model),
                body,
            })
            .await?;

        if !(200..300).contains(&response.status) {
            return Err(format!("API error: {}", response.status));
        }

        serde_json::from_str(&response.body).map_err(|e| format!("malformed response: {e}"))
    }

    /// Edits an image according to an instruction
    ///
    /// # Arguments
    /// * `image` - source image
    /// * `instruction` - era preset instruction or custom edit (non-empty)
    ///
    /// # Returns
    /// The first inline image of the first candidate, re-encoded as PNG.
    /// A response without an image is an `Error::Generation`; nothing is retried.
    pub async fn edit(&self, image: &EncodedImage, instruction: &str) -> Result<EncodedImage> {
        let prompt = prompts::build_edit_prompt(instruction)?;
        let request = GenerateRequest::with_image(&prompt, image);

        let response = self.generate(&self.edit_model, &request).await.map_err(|e| {
            tracing::debug!(error = %e, "image edit failed");
            Error::Generation(e)
        })?;

        let inline = response.first_inline_image().ok_or_else(|| {
            tracing::debug!("edit response contained no inline image");
            Error::Generation(NO_IMAGE_PRODUCED.to_string())
        })?;

        let bytes = BASE64
            .decode(inline.data.as_bytes())
            .map_err(|e| Error::Generation(format!("invalid image data: {e}")))?;
        let payload = ImagePayload {
            mime_type: inline.mime_type.clone(),
            bytes,
        };
        codec::to_png(&payload).map_err(|e| Error::Generation(e.to_string()))
    }

    /// Describes an image
    ///
    /// Missing text is not an error: the fixed fallback string is returned.
    pub async fn analyze(&self, image: &EncodedImage, instruction: Option<&str>) -> Result<String> {
        let prompt = prompts::analysis_prompt(instruction);
        let request = GenerateRequest::with_image(prompt, image);

        let response = self.generate(&self.analysis_model, &request).await.map_err(|e| {
            tracing::debug!(error = %e, "image analysis failed");
            Error::Analysis(e)
        })?;

        Ok(response
            .text()
            .unwrap_or_else(|| NO_ANALYSIS_FALLBACK.to_string()))
    }
}

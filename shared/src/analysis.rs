//! The single AI call: ask a hosted vision model to describe a site photo.
//!
//! Whatever goes wrong, callers get a usable sentence back from
//! [`describe`]; failures are logged here and never surface further.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::error::{AppError, ErrorKind};
use crate::model::ImagePayload;
use crate::report::ReportKind;

pub const FALLBACK_DESCRIPTION: &str =
    "Could not analyze image automatically. Please describe what you see.";

pub const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("no API key configured")]
    MissingApiKey,

    #[error("request could not be built: {0}")]
    InvalidRequest(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("model endpoint returned status {0}")]
    Status(u16),

    #[error("response carried no body")]
    EmptyBody,
}

impl From<AnalysisError> for AppError {
    fn from(e: AnalysisError) -> Self {
        let kind = match e {
            AnalysisError::Transport(_) => ErrorKind::Network,
            _ => ErrorKind::Analysis,
        };
        AppError::new(kind, "image analysis failed").with_internal(e.to_string())
    }
}

pub fn prompt_for(kind: ReportKind) -> &'static str {
    kind.profile().prompt
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// One user turn: the photo first, then the kind-specific prompt.
    pub fn new(image: &ImagePayload, kind: ReportKind) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.mime_type.clone(),
                            data: STANDARD.encode(&image.bytes),
                        },
                    },
                    Part::Text {
                        text: prompt_for(kind).to_string(),
                    },
                ],
            }],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(alias = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InlineData {
    #[serde(alias = "mimeType")]
    pub mime_type: String,
    /// Standard base64, no data-URI prefix.
    pub data: String,
}

impl std::fmt::Debug for InlineData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InlineData")
            .field("mime_type", &self.mime_type)
            .field("data_len", &self.data.len())
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Text parts of the first candidate, concatenated. Empty when the model
    /// returned nothing.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| match part {
                        Part::Text { text } => Some(text.as_str()),
                        Part::InlineData { .. } => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Settles a raw HTTP result into a response or a typed failure.
pub fn outcome(
    result: crux_http::Result<crux_http::Response<GenerateContentResponse>>,
) -> Result<GenerateContentResponse, AnalysisError> {
    let mut response = result.map_err(|e| AnalysisError::Transport(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(AnalysisError::Status(u16::from(status)));
    }
    response.take_body().ok_or(AnalysisError::EmptyBody)
}

/// The text to append to the description.
pub fn describe(outcome: Result<GenerateContentResponse, AnalysisError>) -> String {
    match outcome {
        Ok(response) => response.text(),
        Err(error) => {
            warn!(error = %error, "image analysis failed, using fallback text");
            FALLBACK_DESCRIPTION.to_string()
        }
    }
}

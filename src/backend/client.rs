//! Live backend binding over the `genai` multimodal client.

use genai::Client;
use genai::chat::{ChatMessage, ChatRequest, ContentPart};
use serde::Deserialize;
use tracing::debug;

use crate::candidate::ImageData;

use super::CompareBackend;
use super::error::BackendError;
use super::types::ScoreResult;

const SCORING_PROMPT: &str = "\
You are a facial recognition system comparing two photographs of faces. \
Analyze key facial geometry (distance between eyes, nose shape, jawline) and \
be critical of differences. Estimate the likelihood that both photographs \
show the same person: 95-100 means near certainty, below 70 means likely a \
different person. The first image is the newly captured photo, the second is \
the registered reference photo. Respond with only a JSON object of the form \
{\"confidenceScore\": <number between 0 and 100>} and nothing else.";

const VERIFICATION_PROMPT: &str = "\
You are the final verifier in a face-lock system. The candidate photo scored \
highest in a preliminary scan; make the final, critical decision. Answer \
true only if the captured photo and the candidate photo are definitively the \
same person. If there is any doubt due to angle, lighting, or slight feature \
differences, answer false; a false positive is costly. The first image is \
the captured photo, the second is the candidate photo. Respond with only a \
JSON object of the form {\"isMatch\": <true or false>} and nothing else.";

/// One configured model handle behind the [`CompareBackend`] contract.
///
/// The primary and fallback backends are two instances of this type bound to
/// different models, so one model's outage or quota exhaustion never blocks
/// the other.
pub struct GenaiBackend {
    client: Client,
    model: String,
}

impl std::fmt::Debug for GenaiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiBackend")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GenaiBackend {
    /// Creates a backend bound to `model` with a default client (provider
    /// credentials come from the environment).
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::default(),
            model: model.into(),
        }
    }

    /// Creates a backend with an explicitly configured client.
    pub fn with_client(client: Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// The bound model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn exec(&self, parts: Vec<ContentPart>) -> Result<String, BackendError> {
        let request = ChatRequest::new(vec![ChatMessage::user(parts)]);

        let response = self
            .client
            .exec_chat(&self.model, request, None)
            .await
            .map_err(|e| BackendError::Transport {
                message: e.to_string(),
            })?;

        let text = response
            .first_text()
            .ok_or_else(|| BackendError::MalformedOutput {
                message: "model returned no text content".to_string(),
            })?;

        Ok(text.to_string())
    }
}

impl CompareBackend for GenaiBackend {
    async fn compare(
        &self,
        probe: &ImageData,
        reference: &ImageData,
    ) -> Result<ScoreResult, BackendError> {
        debug!(model = %self.model, "requesting confidence score");

        let text = self
            .exec(vec![
                ContentPart::Text(SCORING_PROMPT.to_string()),
                image_part(probe),
                image_part(reference),
            ])
            .await?;

        let payload: ScorePayload = parse_payload(&text)?;
        Ok(ScoreResult::new(payload.confidence_score))
    }

    async fn verify(
        &self,
        probe: &ImageData,
        reference: &ImageData,
        candidate_name: &str,
    ) -> Result<bool, BackendError> {
        debug!(model = %self.model, candidate = %candidate_name, "requesting final verification");

        let prompt = format!("{VERIFICATION_PROMPT}\n\nCandidate name: {candidate_name}");
        let text = self
            .exec(vec![
                ContentPart::Text(prompt),
                image_part(probe),
                image_part(reference),
            ])
            .await?;

        let payload: VerifyPayload = parse_payload(&text)?;
        Ok(payload.is_match)
    }
}

fn image_part(image: &ImageData) -> ContentPart {
    ContentPart::from_binary_base64(
        image.content_type().to_string(),
        image.base64_payload().to_string(),
        None,
    )
}

fn parse_payload<'a, T: Deserialize<'a>>(text: &'a str) -> Result<T, BackendError> {
    serde_json::from_str(strip_code_fence(text)).map_err(|e| BackendError::MalformedOutput {
        message: format!("unparseable model output: {e}"),
    })
}

/// Models occasionally wrap the requested JSON object in a Markdown code
/// fence despite instructions; tolerate that.
pub(super) fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();

    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let inner = inner.strip_prefix("json").unwrap_or(inner);
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    inner.trim()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ScorePayload {
    pub(super) confidence_score: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct VerifyPayload {
    pub(super) is_match: bool,
}

//! Candidate pool types and preparation.
//!
//! Candidates arrive from the surrounding application's patient registry as
//! serialized records whose `referenceImage` field may hold anything: a data
//! URI, a plain URL, or nothing at all. Only records carrying embedded image
//! data survive [`prepare_candidates`] and reach the scoring stage.

mod prepare;


pub use prepare::prepare_candidates;

use serde::{Deserialize, Serialize};

/// A registered identity record eligible for matching against a probe image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Registry-unique identifier.
    pub id: String,
    /// Display name, forwarded to the verification backend.
    pub name: String,
    /// Raw reference-image value as stored in the registry. May be absent or
    /// hold a non-image string; see [`Candidate::image`].
    #[serde(default)]
    pub reference_image: Option<String>,
}

impl Candidate {
    /// Returns the reference image if the stored value is usable embedded
    /// image data, `None` otherwise.
    pub fn image(&self) -> Option<ImageData> {
        self.reference_image.as_deref().and_then(ImageData::parse)
    }
}

/// Embedded image data in `data:image/...;base64,...` form.
///
/// Construction goes through [`ImageData::parse`], which rejects values that
/// are not recognizable as an image data URI. The declared content type and
/// base64 payload are exposed separately for backend calls.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageData(String);

impl ImageData {
    const IMAGE_URI_PREFIX: &'static str = "data:image";

    /// Parses a raw string as embedded image data.
    ///
    /// Any string without the `data:image` prefix (plain URLs, file paths,
    /// arbitrary text) is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.starts_with(Self::IMAGE_URI_PREFIX)
            .then(|| Self(raw.to_string()))
    }

    /// The full data URI.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The declared content type, e.g. `image/png`.
    pub fn content_type(&self) -> &str {
        let rest = self.0.strip_prefix("data:").unwrap_or(&self.0);
        let end = rest.find([';', ',']).unwrap_or(rest.len());
        &rest[..end]
    }

    /// The base64 payload after the comma separator.
    pub fn base64_payload(&self) -> &str {
        match self.0.find(',') {
            Some(idx) => &self.0[idx + 1..],
            None => "",
        }
    }
}

// Base64 payloads run to megabytes; keep them out of debug output.
impl std::fmt::Debug for ImageData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageData")
            .field("content_type", &self.content_type())
            .field("len", &self.0.len())
            .finish()
    }
}

/// A deduplicated candidate whose reference image passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreableCandidate {
    /// The original registry record.
    pub candidate: Candidate,
    /// Validated reference image.
    pub image: ImageData,
}

use serde::{Deserialize, Serialize};

/// Which branch produced a caption. The pipeline only consumes the text;
/// the source feeds debug logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionSource {
    Primary,
    Fallback,
}

/// Result of caption synthesis. Captioning never fails: when the primary
/// backend is unavailable or errors, `text` holds the deterministic
/// truncation fallback and `source` records that it did.
#[derive(Debug, Clone)]
pub struct CaptionOutcome {
    pub text: String,
    pub source: CaptionSource,
}

impl CaptionOutcome {
    pub fn primary(text: impl Into<String>) -> Self {
        CaptionOutcome {
            text: text.into(),
            source: CaptionSource::Primary,
        }
    }

    pub fn fallback(text: impl Into<String>) -> Self {
        CaptionOutcome {
            text: text.into(),
            source: CaptionSource::Fallback,
        }
    }
}

use crate::error::SynthesisError;
use crate::models::{CaptionOutcome, SynthesisModel};
use async_trait::async_trait;
use image::RgbaImage;

/// Text-to-image capability boundary. One attempt per call; failures are
/// typed so the orchestrator can report them per item.
#[async_trait]
pub trait ImageSynthesis: Send + Sync {
    async fn synthesize(
        &self,
        prompt: &str,
        width: u32,
        height: u32,
        model: SynthesisModel,
    ) -> Result<RgbaImage, SynthesisError>;
}

/// Caption capability boundary. Never fails: implementations fall back to a
/// deterministic truncation when the primary backend is unavailable.
#[async_trait]
pub trait CaptionSynthesis: Send + Sync {
    async fn caption(&self, context: &str, tone: &str) -> CaptionOutcome;
}

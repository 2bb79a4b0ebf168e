use crate::error::SynthesisError;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One fully expanded generation prompt. `index` is 1-based and drives the
/// `creative_<i>.png` / `caption_<i>.txt` filenames, so ordering is
/// significant end-to-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSpec {
    pub index: usize,
    pub text: String,
}

/// One successfully produced creative. Only exists for indices whose
/// synthesis succeeded; a skipped index leaves no placeholder.
#[derive(Debug, Clone)]
pub struct CreativeItem {
    pub prompt_index: usize,
    pub image: RgbaImage,
    pub caption: String,
    pub source_prompt: String,
}

impl CreativeItem {
    pub fn image_filename(&self) -> String {
        format!("creative_{}.png", self.prompt_index)
    }

    pub fn caption_filename(&self) -> String {
        format!("caption_{}.txt", self.prompt_index)
    }
}

/// Per-item failure surfaced to the caller as a diagnostic, keyed by the
/// 1-based prompt index.
#[derive(Debug)]
pub struct ItemDiagnostic {
    pub index: usize,
    pub error: SynthesisError,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataItem {
    pub image: String,
    pub caption: String,
    pub prompt: String,
}

/// Run record written once as `metadata.json`. Lists only the items that
/// were actually produced, so `items.len()` may be below the requested
/// count after partial failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub brand: String,
    pub product: String,
    pub items: Vec<MetadataItem>,
}

impl RunMetadata {
    pub fn new(brand: impl Into<String>, product: impl Into<String>) -> Self {
        RunMetadata {
            brand: brand.into(),
            product: product.into(),
            items: Vec::new(),
        }
    }

    pub fn record(&mut self, item: &CreativeItem) {
        self.items.push(MetadataItem {
            image: item.image_filename(),
            caption: item.caption.clone(),
            prompt: item.source_prompt.clone(),
        });
    }
}

/// Handle to the assembled archive.
#[derive(Debug, Clone)]
pub struct CreativePackage {
    pub archive_path: PathBuf,
    pub archive_name: String,
    pub item_count: usize,
}

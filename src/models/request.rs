use crate::error::{CreativeError, Result, SynthesisError};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hard cap on creatives per run.
pub const MAX_CREATIVES: u32 = 2;

/// Corner anchor for the logo overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogoAnchor {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl LogoAnchor {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogoAnchor::TopLeft => "top-left",
            LogoAnchor::TopRight => "top-right",
            LogoAnchor::BottomLeft => "bottom-left",
            LogoAnchor::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for LogoAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogoAnchor {
    type Err = CreativeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top-left" => Ok(LogoAnchor::TopLeft),
            "top-right" => Ok(LogoAnchor::TopRight),
            "bottom-left" => Ok(LogoAnchor::BottomLeft),
            "bottom-right" => Ok(LogoAnchor::BottomRight),
            other => Err(CreativeError::MissingInput(format!(
                "unknown logo position '{}'",
                other
            ))),
        }
    }
}

/// Supported Stability image-synthesis variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisModel {
    Sd3,
    Core,
    Ultra,
}

impl SynthesisModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SynthesisModel::Sd3 => "sd3",
            SynthesisModel::Core => "core",
            SynthesisModel::Ultra => "ultra",
        }
    }

    /// Endpoint path segment under `/v2beta/stable-image/generate/`.
    pub fn endpoint_path(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for SynthesisModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SynthesisModel {
    type Err = SynthesisError;

    fn from_str(s: &str) -> std::result::Result<Self, SynthesisError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sd3" => Ok(SynthesisModel::Sd3),
            "core" => Ok(SynthesisModel::Core),
            "ultra" => Ok(SynthesisModel::Ultra),
            other => Err(SynthesisError::UnsupportedModel(other.to_string())),
        }
    }
}

/// One run's worth of input. Build through [`CreativeRequest::builder`];
/// `build` enforces the count clamp and rejects absent uploads before any
/// generation work starts.
#[derive(Debug, Clone)]
pub struct CreativeRequest {
    pub brand: String,
    pub product_description: String,
    pub logo_position: LogoAnchor,
    pub requested_count: u32,
    pub target_size: u32,
    pub model: SynthesisModel,
    pub logo_image: RgbaImage,
    pub product_image: RgbaImage,
}

impl CreativeRequest {
    pub fn builder() -> CreativeRequestBuilder {
        CreativeRequestBuilder::new()
    }
}

#[derive(Debug, Clone)]
pub struct CreativeRequestBuilder {
    brand: String,
    product_description: String,
    logo_position: LogoAnchor,
    requested_count: u32,
    target_size: u32,
    model: SynthesisModel,
    logo_image: Option<RgbaImage>,
    product_image: Option<RgbaImage>,
}

impl Default for CreativeRequestBuilder {
    fn default() -> Self {
        CreativeRequestBuilder {
            brand: String::new(),
            product_description: String::new(),
            logo_position: LogoAnchor::TopLeft,
            requested_count: MAX_CREATIVES,
            target_size: 1024,
            model: SynthesisModel::Sd3,
            logo_image: None,
            product_image: None,
        }
    }
}

impl CreativeRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    pub fn with_product_description(mut self, description: impl Into<String>) -> Self {
        self.product_description = description.into();
        self
    }

    pub fn with_logo_position(mut self, position: LogoAnchor) -> Self {
        self.logo_position = position;
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.requested_count = count;
        self
    }

    pub fn with_target_size(mut self, size: u32) -> Self {
        self.target_size = size;
        self
    }

    pub fn with_model(mut self, model: SynthesisModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_logo_image(mut self, logo: RgbaImage) -> Self {
        self.logo_image = Some(logo);
        self
    }

    pub fn with_product_image(mut self, product: RgbaImage) -> Self {
        self.product_image = Some(product);
        self
    }

    pub fn build(self) -> Result<CreativeRequest> {
        let logo_image = self
            .logo_image
            .ok_or_else(|| CreativeError::MissingInput("no logo image supplied".to_string()))?;
        let product_image = self
            .product_image
            .ok_or_else(|| CreativeError::MissingInput("no product image supplied".to_string()))?;
        if self.target_size == 0 {
            return Err(CreativeError::MissingInput(
                "target size must be a positive pixel dimension".to_string(),
            ));
        }

        Ok(CreativeRequest {
            brand: self.brand,
            product_description: self.product_description,
            logo_position: self.logo_position,
            requested_count: self.requested_count.clamp(1, MAX_CREATIVES),
            target_size: self.target_size,
            model: self.model,
            logo_image,
            product_image,
        })
    }
}

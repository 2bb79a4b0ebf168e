use thiserror::Error;

/// Per-item failure raised by the image-synthesis boundary. Non-fatal: the
/// pipeline records a diagnostic for the item and moves on.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("unsupported model '{0}': use sd3, core, or ultra")]
    UnsupportedModel(String),
    #[error("missing credential {0}")]
    MissingCredential(&'static str),
    #[error("backend rejected request ({status}): {body}")]
    BackendRejected { status: u16, body: String },
    #[error("failed to decode image bytes: {0}")]
    DecodeFailure(String),
    #[error("transport error: {0}")]
    Transport(String),
}

/// Compositing failure. Non-fatal: the pipeline keeps the un-branded
/// synthesized image instead.
#[derive(Debug, Error)]
pub enum CompositeError {
    #[error("logo has a zero dimension")]
    DegenerateLogo,
    #[error("base image {base_width}px wide scales the logo to zero width")]
    ZeroTargetWidth { base_width: u32 },
    #[error("scaled logo {logo_width}x{logo_height} does not fit base {base_width}x{base_height} with margins")]
    DoesNotFit {
        logo_width: u32,
        logo_height: u32,
        base_width: u32,
        base_height: u32,
    },
}

#[derive(Debug, Error)]
pub enum CreativeError {
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
    #[error(transparent)]
    Composite(#[from] CompositeError),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CreativeError>;

pub mod backend;
pub mod compositor;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod package;
pub mod pipeline;
pub mod prompt;

pub use backend::{
    CaptionClient, CaptionSynthesis, CreativeBackend, ImageClient, ImageSynthesis,
};
pub use config::{
    Config, CredentialProvider, EnvCredentials, OpenAiConfig, StabilityConfig, StaticCredentials,
};
pub use error::{CompositeError, CreativeError, Result, SynthesisError};
pub use models::{
    CaptionOutcome, CaptionSource, CreativeItem, CreativePackage, CreativeRequest,
    CreativeRequestBuilder, ItemDiagnostic, LogoAnchor, MetadataItem, PromptSpec, RunMetadata,
    SynthesisModel, MAX_CREATIVES,
};
pub use package::PackageAssembler;
pub use pipeline::{CreativePipeline, RunOutput};

pub mod caption_client;
pub mod image_client;
pub mod traits;

use crate::config::{Config, CredentialProvider, EnvCredentials};
use std::sync::Arc;

pub use caption_client::{fallback_caption, CaptionClient};
pub use image_client::ImageClient;
pub use traits::{CaptionSynthesis, ImageSynthesis};

/// Groups the two external-capability clients behind one handle, sharing a
/// single credential provider.
#[derive(Clone)]
pub struct CreativeBackend {
    image_client: ImageClient,
    caption_client: CaptionClient,
}

impl CreativeBackend {
    pub fn new(config: Config, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            image_client: ImageClient::new(config.stability, credentials.clone()),
            caption_client: CaptionClient::new(config.openai, credentials),
        }
    }

    /// Environment-backed backend: endpoints from `Config::from_env`,
    /// credentials from process env vars.
    pub fn from_env() -> Self {
        Self::new(Config::from_env(), Arc::new(EnvCredentials::new()))
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }

    pub fn caption(&self) -> &CaptionClient {
        &self.caption_client
    }

    pub fn into_parts(self) -> (ImageClient, CaptionClient) {
        (self.image_client, self.caption_client)
    }
}

use crate::backend::traits::ImageSynthesis;
use crate::config::{CredentialProvider, StabilityConfig};
use crate::error::SynthesisError;
use crate::models::SynthesisModel;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::RgbaImage;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::multipart::Form;
use std::sync::Arc;

const API_KEY_NAME: &str = "STABILITY_API_KEY";

#[derive(Clone)]
pub struct ImageClient {
    http: reqwest::Client,
    config: StabilityConfig,
    credentials: Arc<dyn CredentialProvider>,
}

impl ImageClient {
    pub fn new(config: StabilityConfig, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            credentials,
        }
    }

    /// Single-attempt text-to-image call. The wire format carries only an
    /// aspect ratio, so the requested dimensions inform logging rather than
    /// the payload; the current request model always asks for a square.
    pub async fn synthesize(
        &self,
        prompt: &str,
        width: u32,
        height: u32,
        model: SynthesisModel,
    ) -> Result<RgbaImage, SynthesisError> {
        let api_key = self
            .credentials
            .credential(API_KEY_NAME)
            .ok_or(SynthesisError::MissingCredential(API_KEY_NAME))?;

        let url = format!(
            "{}/v2beta/stable-image/generate/{}",
            self.config.api_base,
            model.endpoint_path()
        );

        let form = Form::new()
            .text("prompt", prompt.to_string())
            .text("output_format", "png")
            .text("aspect_ratio", "1:1");

        log::info!("Generating {}x{} image with model: {}", width, height, model);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&api_key)
            .header(ACCEPT, "image/*")
            .multipart(form)
            .send()
            .await
            .map_err(|e| SynthesisError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SynthesisError::BackendRejected {
                status: status.as_u16(),
                body,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_ascii_lowercase())
            .unwrap_or_default();

        let bytes = if content_type.starts_with("image/") {
            response
                .bytes()
                .await
                .map_err(|e| SynthesisError::Transport(e.to_string()))?
                .to_vec()
        } else {
            // Some deployments answer with a JSON envelope instead of raw
            // bytes; the image is then a base64 field.
            let payload: serde_json::Value = response
                .json()
                .await
                .map_err(|e| SynthesisError::DecodeFailure(e.to_string()))?;
            decode_json_image(&payload)?
        };

        let decoded = image::load_from_memory(&bytes)
            .map_err(|e| SynthesisError::DecodeFailure(e.to_string()))?;
        Ok(decoded.to_rgba8())
    }
}

#[async_trait]
impl ImageSynthesis for ImageClient {
    async fn synthesize(
        &self,
        prompt: &str,
        width: u32,
        height: u32,
        model: SynthesisModel,
    ) -> Result<RgbaImage, SynthesisError> {
        ImageClient::synthesize(self, prompt, width, height, model).await
    }
}

fn decode_json_image(payload: &serde_json::Value) -> Result<Vec<u8>, SynthesisError> {
    let encoded = payload
        .get("image")
        .or_else(|| {
            payload
                .get("artifacts")
                .and_then(|rows| rows.as_array())
                .and_then(|rows| rows.first())
                .and_then(|row| row.get("base64"))
        })
        .and_then(|value| value.as_str())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            SynthesisError::DecodeFailure("JSON response carries no image bytes".to_string())
        })?;

    BASE64
        .decode(encoded.as_bytes())
        .map_err(|e| SynthesisError::DecodeFailure(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticCredentials;

    fn client_without_credentials() -> ImageClient {
        ImageClient::new(
            StabilityConfig::default(),
            Arc::new(StaticCredentials::new()),
        )
    }

    #[tokio::test]
    async fn missing_credential_fails_before_any_network_call() {
        let client = client_without_credentials();
        let err = client
            .synthesize("a product shot", 512, 512, SynthesisModel::Core)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SynthesisError::MissingCredential("STABILITY_API_KEY")
        ));
    }

    #[test]
    fn json_envelope_decoding_handles_both_layouts() {
        let png = {
            let mut buf = std::io::Cursor::new(Vec::new());
            image::RgbaImage::new(2, 2)
                .write_to(&mut buf, image::ImageOutputFormat::Png)
                .unwrap();
            buf.into_inner()
        };
        let encoded = BASE64.encode(&png);

        let direct = serde_json::json!({ "image": encoded });
        assert_eq!(decode_json_image(&direct).unwrap(), png);

        let artifacts = serde_json::json!({ "artifacts": [{ "base64": encoded }] });
        assert_eq!(decode_json_image(&artifacts).unwrap(), png);

        let empty = serde_json::json!({ "finish_reason": "SUCCESS" });
        assert!(matches!(
            decode_json_image(&empty).unwrap_err(),
            SynthesisError::DecodeFailure(_)
        ));
    }
}

use crate::backend::{CaptionSynthesis, CreativeBackend, ImageSynthesis};
use crate::compositor;
use crate::models::{CreativeItem, CreativeRequest, ItemDiagnostic, RunMetadata};
use crate::prompt;
use std::sync::Arc;

const DEFAULT_TONE: &str = "energetic";

/// Everything one run produces: the surviving items in index order, one
/// diagnostic per skipped index, and the metadata record covering exactly
/// the surviving items.
#[derive(Debug)]
pub struct RunOutput {
    pub items: Vec<CreativeItem>,
    pub diagnostics: Vec<ItemDiagnostic>,
    pub metadata: RunMetadata,
}

/// Drives one run: expand prompts, then synthesize, composite, caption,
/// and record each item, strictly sequentially and in index order. Items are
/// isolated: a synthesis failure skips that index and the loop continues; a
/// compositing failure degrades to the un-branded image; captioning never
/// fails.
pub struct CreativePipeline {
    image: Arc<dyn ImageSynthesis>,
    caption: Arc<dyn CaptionSynthesis>,
}

impl CreativePipeline {
    pub fn new(image: Arc<dyn ImageSynthesis>, caption: Arc<dyn CaptionSynthesis>) -> Self {
        Self { image, caption }
    }

    pub fn from_backend(backend: CreativeBackend) -> Self {
        let (image, caption) = backend.into_parts();
        Self::new(Arc::new(image), Arc::new(caption))
    }

    pub async fn run(&self, request: &CreativeRequest) -> RunOutput {
        self.run_with_progress(request, |_| {}).await
    }

    /// `progress` is called once per item with `i / requested_count`,
    /// whether or not the item succeeded, so a caller can render a
    /// monotonic indicator under partial failure.
    pub async fn run_with_progress<F>(&self, request: &CreativeRequest, mut progress: F) -> RunOutput
    where
        F: FnMut(f32),
    {
        let count = request.requested_count as usize;
        let prompts = prompt::expand(
            &request.brand,
            &request.product_description,
            request.logo_position,
            count,
        );

        let mut items = Vec::new();
        let mut diagnostics = Vec::new();
        let mut metadata = RunMetadata::new(&request.brand, &request.product_description);

        for prompt_spec in prompts {
            let index = prompt_spec.index;
            log::info!("Generating image {}/{}", index, count);

            let synthesized = match self
                .image
                .synthesize(
                    &prompt_spec.text,
                    request.target_size,
                    request.target_size,
                    request.model,
                )
                .await
            {
                Ok(image) => image,
                Err(error) => {
                    log::error!("Error generating image {}: {}", index, error);
                    diagnostics.push(ItemDiagnostic { index, error });
                    progress(index as f32 / count as f32);
                    continue;
                }
            };

            let image = match compositor::overlay_logo(
                &synthesized,
                &request.logo_image,
                request.logo_position,
            ) {
                Ok(composite) => composite,
                Err(e) => {
                    log::warn!("Logo overlay failed for creative {}: {}", index, e);
                    synthesized
                }
            };

            let context = format!(
                "Brand: {}. Product: {}. Style: {}",
                request.brand, request.product_description, prompt_spec.text
            );
            let outcome = self.caption.caption(&context, DEFAULT_TONE).await;

            let item = CreativeItem {
                prompt_index: index,
                image,
                caption: outcome.text,
                source_prompt: prompt_spec.text,
            };
            metadata.record(&item);
            items.push(item);
            progress(index as f32 / count as f32);
        }

        RunOutput {
            items,
            diagnostics,
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SynthesisError;
    use crate::models::{CaptionOutcome, LogoAnchor, SynthesisModel};
    use async_trait::async_trait;
    use image::{Rgba, RgbaImage};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const BASE_COLOR: Rgba<u8> = Rgba([10, 20, 30, 255]);

    /// Returns a solid image per call, failing the calls whose 1-based
    /// position is listed in `fail_on`.
    struct StubSynthesis {
        calls: AtomicUsize,
        fail_on: Vec<usize>,
    }

    impl StubSynthesis {
        fn new(fail_on: Vec<usize>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on,
            }
        }
    }

    #[async_trait]
    impl ImageSynthesis for StubSynthesis {
        async fn synthesize(
            &self,
            _prompt: &str,
            width: u32,
            height: u32,
            _model: SynthesisModel,
        ) -> Result<RgbaImage, SynthesisError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_on.contains(&call) {
                return Err(SynthesisError::BackendRejected {
                    status: 500,
                    body: "stub failure".to_string(),
                });
            }
            Ok(RgbaImage::from_pixel(width, height, BASE_COLOR))
        }
    }

    struct StubCaption {
        contexts: Mutex<Vec<String>>,
    }

    impl StubCaption {
        fn new() -> Self {
            Self {
                contexts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CaptionSynthesis for StubCaption {
        async fn caption(&self, context: &str, _tone: &str) -> CaptionOutcome {
            self.contexts.lock().unwrap().push(context.to_string());
            CaptionOutcome::fallback(crate::backend::fallback_caption(context))
        }
    }

    fn request(count: u32) -> CreativeRequest {
        CreativeRequest::builder()
            .with_brand("Acme")
            .with_product_description("wireless earbuds")
            .with_logo_position(LogoAnchor::TopRight)
            .with_count(count)
            .with_target_size(120)
            .with_logo_image(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])))
            .with_product_image(RgbaImage::new(16, 16))
            .build()
            .unwrap()
    }

    fn pipeline(fail_on: Vec<usize>) -> (CreativePipeline, Arc<StubCaption>) {
        let caption = Arc::new(StubCaption::new());
        let pipeline = CreativePipeline::new(Arc::new(StubSynthesis::new(fail_on)), caption.clone());
        (pipeline, caption)
    }

    #[tokio::test]
    async fn full_run_produces_every_requested_item() {
        let (pipeline, _) = pipeline(vec![]);
        let output = pipeline.run(&request(2)).await;

        assert_eq!(output.items.len(), 2);
        assert!(output.diagnostics.is_empty());
        assert_eq!(output.metadata.items.len(), 2);
        assert_eq!(output.items[0].prompt_index, 1);
        assert_eq!(output.items[1].prompt_index, 2);
        assert_eq!(output.metadata.items[0].image, "creative_1.png");
        assert_eq!(output.metadata.items[1].image, "creative_2.png");
    }

    #[tokio::test]
    async fn failed_item_is_skipped_and_run_continues() {
        let (pipeline, _) = pipeline(vec![2]);
        let output = pipeline.run(&request(2)).await;

        assert_eq!(output.items.len(), 1);
        assert_eq!(output.items[0].prompt_index, 1);
        assert_eq!(output.metadata.items.len(), 1);
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].index, 2);
        assert!(matches!(
            output.diagnostics[0].error,
            SynthesisError::BackendRejected { status: 500, .. }
        ));
    }

    #[tokio::test]
    async fn progress_is_monotonic_even_under_failure() {
        let (pipeline, _) = pipeline(vec![1]);
        let mut fractions = Vec::new();
        let output = pipeline
            .run_with_progress(&request(2), |fraction| fractions.push(fraction))
            .await;

        assert_eq!(fractions, vec![0.5, 1.0]);
        assert_eq!(output.items.len(), 1);
        assert_eq!(output.items[0].prompt_index, 2);
    }

    #[tokio::test]
    async fn count_is_clamped_before_expansion() {
        let (pipeline, _) = pipeline(vec![]);
        let output = pipeline.run(&request(9)).await;
        assert_eq!(output.items.len(), 2);
    }

    #[tokio::test]
    async fn caption_context_follows_brand_product_style_shape() {
        let (pipeline, caption) = pipeline(vec![]);
        let output = pipeline.run(&request(1)).await;

        let contexts = caption.contexts.lock().unwrap();
        assert_eq!(contexts.len(), 1);
        assert!(contexts[0].starts_with("Brand: Acme. Product: wireless earbuds. Style: "));
        assert!(contexts[0].ends_with(&output.items[0].source_prompt));
    }

    #[tokio::test]
    async fn composited_creative_carries_the_logo() {
        let (pipeline, _) = pipeline(vec![]);
        let output = pipeline.run(&request(1)).await;

        // 120 px base scales the logo to 20 px; anchored top-right that
        // puts logo pixels at x in [90, 110).
        let image = &output.items[0].image;
        assert_eq!(image.get_pixel(95, 15), &Rgba([255, 0, 0, 255]));
        assert_eq!(image.get_pixel(50, 60), &BASE_COLOR);
    }

    #[tokio::test]
    async fn end_to_end_run_packages_two_creatives() {
        use crate::package::PackageAssembler;
        use std::collections::BTreeSet;

        let (pipeline, _) = pipeline(vec![]);
        let request = request(2);
        let output = pipeline.run(&request).await;

        assert!(output.items[0].source_prompt.contains("wireless earbuds"));
        assert!(output.items[0]
            .source_prompt
            .contains("place the logo top-right"));
        assert_ne!(output.items[0].source_prompt, output.items[1].source_prompt);

        let dir = tempfile::TempDir::new().unwrap();
        let assembler = PackageAssembler::new(dir.path());
        let package = assembler.assemble(&output.items, &output.metadata).unwrap();
        assert_eq!(package.item_count, 2);

        let file = std::fs::File::open(&package.archive_path).unwrap();
        let archive = zip::ZipArchive::new(file).unwrap();
        let names: BTreeSet<String> = archive.file_names().map(str::to_string).collect();
        for expected in [
            "creative_1.png",
            "caption_1.txt",
            "creative_2.png",
            "caption_2.txt",
            "metadata.json",
        ] {
            assert!(names.contains(expected), "archive missing {}", expected);
        }
    }

    #[tokio::test]
    async fn composite_failure_degrades_to_unbranded_image() {
        let caption = Arc::new(StubCaption::new());
        let pipeline =
            CreativePipeline::new(Arc::new(StubSynthesis::new(vec![])), caption.clone());
        let request = CreativeRequest::builder()
            .with_brand("Acme")
            .with_product_description("earbuds")
            .with_count(1)
            .with_target_size(120)
            .with_logo_image(RgbaImage::new(0, 0))
            .with_product_image(RgbaImage::new(16, 16))
            .build()
            .unwrap();

        let output = pipeline.run(&request).await;
        assert_eq!(output.items.len(), 1);
        assert!(output.diagnostics.is_empty());
        // Every pixel is still the synthesized base color.
        assert!(output.items[0]
            .image
            .pixels()
            .all(|pixel| pixel == &BASE_COLOR));
    }
}

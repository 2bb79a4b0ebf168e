use autocreative::{
    logger, CreativeBackend, CreativePipeline, CreativeRequest, LogoAnchor, PackageAssembler,
    SynthesisModel,
};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(logger::LoggerConfig::development())?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let mut args = env::args().skip(1);
    let (logo_path, product_path) = match (args.next(), args.next()) {
        (Some(logo), Some(product)) => (logo, product),
        _ => return Err("usage: autocreative <logo-image> <product-image>".into()),
    };

    log::info!("🔍 Checking backend credentials...");
    if env::var("STABILITY_API_KEY").map_or(true, |v| v.trim().is_empty()) {
        log::warn!("⚠️  STABILITY_API_KEY not set, image synthesis will fail per item");
    } else {
        log::info!("✅ Stability credential found");
    }
    if env::var("OPENAI_API_KEY").map_or(true, |v| v.trim().is_empty()) {
        log::warn!("⚠️  OPENAI_API_KEY not set, captions will use the deterministic fallback");
    } else {
        log::info!("✅ OpenAI credential found");
    }

    let brand = env::var("BRAND_NAME").unwrap_or_else(|_| "MyBrand".to_string());
    let description = env::var("PRODUCT_DESC")
        .unwrap_or_else(|_| "wireless earbuds with charging case".to_string());
    let position: LogoAnchor = env::var("LOGO_POSITION")
        .unwrap_or_else(|_| "top-left".to_string())
        .parse()?;
    let count: u32 = env::var("CREATIVE_COUNT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(2);
    let size: u32 = env::var("OUTPUT_SIZE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(1024);
    let model: SynthesisModel = env::var("STABILITY_MODEL")
        .unwrap_or_else(|_| "sd3".to_string())
        .parse()?;

    log::info!("📐 Run settings: brand='{}', position={}, count={}, size={}, model={}",
        brand, position, count, size, model);

    let logo = image::open(&logo_path)?.to_rgba8();
    let product = image::open(&product_path)?.to_rgba8();

    let request = CreativeRequest::builder()
        .with_brand(brand)
        .with_product_description(description)
        .with_logo_position(position)
        .with_count(count)
        .with_target_size(size)
        .with_model(model)
        .with_logo_image(logo)
        .with_product_image(product)
        .build()?;

    // Working area lives for exactly this run; dropped on every exit path.
    let workdir = tempfile::Builder::new()
        .prefix("autocreative_")
        .tempdir()?;
    let assembler = PackageAssembler::new(workdir.path());
    assembler.persist_inputs(&request.logo_image, &request.product_image)?;

    let pipeline = CreativePipeline::from_backend(CreativeBackend::from_env());

    let _timer = logger::timer("creative run");
    let output = pipeline
        .run_with_progress(&request, |fraction| {
            log::info!("📊 Progress: {:.0}%", fraction * 100.0);
        })
        .await;

    for diagnostic in &output.diagnostics {
        log::error!("❌ Creative {} skipped: {}", diagnostic.index, diagnostic.error);
    }

    let package = assembler.assemble(&output.items, &output.metadata)?;
    let final_path = env::current_dir()?.join(&package.archive_name);
    std::fs::copy(&package.archive_path, &final_path)?;

    log::info!(
        "🎉 Generated {} creative(s) ({} requested)",
        package.item_count,
        request.requested_count
    );
    log::info!("💾 Package saved to: {}", final_path.display());

    Ok(())
}

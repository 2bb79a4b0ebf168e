use crate::models::{LogoAnchor, PromptSpec};

/// Fixed style library. Order matters: position `i` of a run always draws
/// template `i % len`, so the first requested creative is always the
/// minimal-premium style.
pub const BASE_TEMPLATES: [&str; 10] = [
    "Minimal premium product ad with white background and centered product. Include logo at top-left.",
    "Festive theme ad with warm tones, decorative patterns, product in center, logo bottom-right.",
    "Lifestyle ad: product in use with soft bokeh background and call-to-action overlay.",
    "Bold social-media square: high-contrast colors, large headline space, product on right.",
    "Premium spotlight: dark background, dramatic rim light on product, logo subtle.",
    "Eco-friendly theme: green hues, natural textures, product on wooden surface.",
    "Flat illustration style: simplified shapes, playful mood, big CTA area.",
    "Monochrome modern: grayscale palette with a single accent color from the brand.",
    "Product-on-isolated-surface: shadow underneath, very clean studio shot.",
    "Retro poster style with bold geometric shapes and vintage typography.",
];

const QUALITY_CLAUSE: &str = "High-resolution, photorealistic where applicable, clean composition.";

/// Expand `count` concrete prompts from the template library. Pure: the
/// same inputs always produce the same ordered output. The caller is
/// responsible for clamping `count`; the expander only echoes it.
pub fn expand(
    brand: &str,
    product_description: &str,
    logo_position: LogoAnchor,
    count: usize,
) -> Vec<PromptSpec> {
    (0..count)
        .map(|i| {
            let template = BASE_TEMPLATES[i % BASE_TEMPLATES.len()];
            let text = format!(
                "{} Show the product: {}. Include the brand name '{}' and place the logo {}. {}",
                template, product_description, brand, logo_position, QUALITY_CLAUSE
            );
            PromptSpec {
                index: i + 1,
                text,
            }
        })
        .collect()
}

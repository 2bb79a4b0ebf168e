use crate::error::CompositeError;
use crate::models::LogoAnchor;
use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Margin kept between the logo and the anchored edge(s), in pixels.
const EDGE_MARGIN: u32 = 10;

/// Logo width as a fraction of the base width: floor(base / 6).
const LOGO_WIDTH_DIVISOR: u32 = 6;

/// Overlay `logo` onto a copy of `base` at `anchor`. Pure: neither operand
/// is mutated. Operating on `RgbaImage` guarantees both carry alpha, and
/// the paste blends with the logo's own alpha so transparent logo pixels
/// leave the base visible.
///
/// The logo is scaled uniformly to floor(base_width / 6) wide with Lanczos
/// resampling, then placed with a fixed 10 px margin from the anchored
/// edge(s).
pub fn overlay_logo(
    base: &RgbaImage,
    logo: &RgbaImage,
    anchor: LogoAnchor,
) -> Result<RgbaImage, CompositeError> {
    if logo.width() == 0 || logo.height() == 0 {
        return Err(CompositeError::DegenerateLogo);
    }

    let target_width = base.width() / LOGO_WIDTH_DIVISOR;
    if target_width == 0 {
        return Err(CompositeError::ZeroTargetWidth {
            base_width: base.width(),
        });
    }

    let ratio = target_width as f64 / logo.width() as f64;
    let target_height = (logo.height() as f64 * ratio) as u32;
    if target_height == 0 {
        return Err(CompositeError::DegenerateLogo);
    }

    let scaled = imageops::resize(logo, target_width, target_height, FilterType::Lanczos3);
    let (x, y) = paste_origin(base, &scaled, anchor)?;

    let mut composite = base.clone();
    imageops::overlay(&mut composite, &scaled, x as i64, y as i64);
    Ok(composite)
}

fn paste_origin(
    base: &RgbaImage,
    logo: &RgbaImage,
    anchor: LogoAnchor,
) -> Result<(u32, u32), CompositeError> {
    let does_not_fit = || CompositeError::DoesNotFit {
        logo_width: logo.width(),
        logo_height: logo.height(),
        base_width: base.width(),
        base_height: base.height(),
    };
    let from_right = base
        .width()
        .checked_sub(logo.width() + EDGE_MARGIN)
        .ok_or_else(does_not_fit);
    let from_bottom = base
        .height()
        .checked_sub(logo.height() + EDGE_MARGIN)
        .ok_or_else(does_not_fit);

    match anchor {
        LogoAnchor::TopLeft => Ok((EDGE_MARGIN, EDGE_MARGIN)),
        LogoAnchor::TopRight => Ok((from_right?, EDGE_MARGIN)),
        LogoAnchor::BottomLeft => Ok((EDGE_MARGIN, from_bottom?)),
        LogoAnchor::BottomRight => Ok((from_right?, from_bottom?)),
    }
}

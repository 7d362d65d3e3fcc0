use facewarp_image::{Image, ImageError};

use crate::interpolation::bilinear_sample;
use crate::parallel;

/// Direction of the radial lens warp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistortionMode {
    /// Lines bow outward from the center.
    Barrel,
    /// Lines bow inward toward the center.
    Pincushion,
}

impl DistortionMode {
    /// Lower-case name of the mode, e.g. `barrel`.
    pub fn as_str(&self) -> &'static str {
        match self {
            DistortionMode::Barrel => "barrel",
            DistortionMode::Pincushion => "pincushion",
        }
    }

    /// The radial scale applied at normalized radius `r`.
    ///
    /// `1 + strength * r^2` for barrel and `1 - strength * r^2` for pincushion.
    #[inline]
    pub fn factor(&self, strength: f64, r: f64) -> f64 {
        match self {
            DistortionMode::Barrel => 1.0 + strength * r * r,
            DistortionMode::Pincushion => 1.0 - strength * r * r,
        }
    }
}

impl std::fmt::Display for DistortionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Applies a radial barrel or pincushion warp about the image center.
///
/// The radius is normalized by `min(cols / 2, rows / 2)`. A destination pixel
/// at offset `d` from the center samples the source at `center + d / factor`
/// where `factor` comes from [`DistortionMode::factor`]. Pixels whose factor is
/// not positive are left untouched.
///
/// The center pixel always maps onto itself.
///
/// # Preconditions
///
/// `strength` must be non-negative. With [`DistortionMode::Pincushion`] callers
/// must keep `strength < 1`; larger values drive the factor to zero or below
/// near the unit radius and those pixels stay black. Neither condition is
/// checked here.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image, same size as `src`.
/// * `strength` - The distortion strength.
/// * `mode` - Barrel or pincushion.
///
/// # Errors
///
/// Returns an error if `src` and `dst` differ in size.
pub fn lens_distortion<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    strength: f64,
    mode: DistortionMode,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    let (cx, cy) = (src.cols() / 2, src.rows() / 2);
    let max_radius = cx.min(cy) as f64;
    let (cx, cy) = (cx as f64, cy as f64);

    parallel::par_iter_rows_indexed(dst, |x, y, dst_pixel| {
        let dx = x as f64 - cx;
        let dy = y as f64 - cy;

        // single-pixel-wide images have no radius to normalize by
        let r = if max_radius > 0.0 {
            (dx * dx + dy * dy).sqrt() / max_radius
        } else {
            0.0
        };

        let factor = mode.factor(strength, r);
        if factor <= 0.0 {
            return;
        }

        if let Some(pixel) = bilinear_sample(src, cx + dx / factor, cy + dy / factor) {
            dst_pixel.copy_from_slice(&pixel);
        }
    });

    Ok(())
}

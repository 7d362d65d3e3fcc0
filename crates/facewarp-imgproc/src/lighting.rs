use facewarp_image::{Image, ImageError};

use crate::parallel;

/// Shading multiplier for one pixel.
///
/// `dx` and `dy` are the center-relative offsets normalized by the half
/// extents of the image; `(cos_a, sin_a)` is the light direction.
#[inline]
fn lighting_map(dx: f64, dy: f64, cos_a: f64, sin_a: f64, intensity: f64) -> f64 {
    let dot = dx * cos_a + dy * sin_a;
    let light_factor = 1.0 + intensity * dot;
    let falloff = (1.0 - 0.5 * (dx * dx + dy * dy).sqrt()).max(0.0);
    light_factor * falloff
}

/// Simulates a directional light falling across the image.
///
/// Every channel is multiplied by `(1 + intensity * dot) * falloff`, where
/// `dot` projects the normalized center offset onto the light direction and
/// `falloff = max(0, 1 - 0.5 * |offset|)` darkens toward the corners. Results
/// are clamped to `[0, 255]` and truncated. No pixel moves.
///
/// With `intensity == 0` only the radial falloff remains and the angle has no
/// effect.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image, same size as `src`.
/// * `angle_degrees` - Direction the light comes from, in degrees.
/// * `intensity` - Strength of the directional term, typically in `[0, 1]`.
///
/// # Errors
///
/// Returns an error if `src` and `dst` differ in size.
///
/// # Example
///
/// ```
/// use facewarp_image::{Image, ImageSize};
/// use facewarp_imgproc::lighting::directional_lighting;
///
/// let size = ImageSize { width: 4, height: 4 };
/// let src = Image::<u8, 1>::from_size_val(size, 100).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(size, 0).unwrap();
///
/// directional_lighting(&src, &mut dst, 0.0, 0.0).unwrap();
///
/// // the center keeps its value, the corner is darkened
/// assert_eq!(dst.get_pixel(2, 2, 0).unwrap(), 100);
/// assert!(dst.get_pixel(0, 0, 0).unwrap() < 100);
/// ```
pub fn directional_lighting<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    angle_degrees: f64,
    intensity: f64,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    let (sin_a, cos_a) = angle_degrees.to_radians().sin_cos();
    let (cx, cy) = ((src.cols() / 2) as f64, (src.rows() / 2) as f64);
    let (half_w, half_h) = (src.cols() as f64 / 2.0, src.rows() as f64 / 2.0);

    parallel::par_iter_rows_indexed_val(src, dst, |x, y, src_pixel, dst_pixel| {
        let dx = (x as f64 - cx) / half_w;
        let dy = (y as f64 - cy) / half_h;
        let scale = lighting_map(dx, dy, cos_a, sin_a, intensity);

        src_pixel
            .iter()
            .zip(dst_pixel.iter_mut())
            .for_each(|(&s, d)| *d = (s as f64 * scale).clamp(0.0, 255.0) as u8);
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{directional_lighting, lighting_map};
    use approx::assert_relative_eq;
    use facewarp_image::{Image, ImageError, ImageSize};

    fn checker(size: ImageSize) -> Result<Image<u8, 3>, ImageError> {
        let data = (0..size.height)
            .flat_map(|y| {
                (0..size.width).flat_map(move |x| {
                    let v = if (x + y) % 2 == 0 { 220u8 } else { 60u8 };
                    [v, v / 2, 255 - v]
                })
            })
            .collect();
        Image::new(size, data)
    }

    #[test]
    fn map_values() {
        // center: no direction, no falloff
        assert_relative_eq!(lighting_map(0.0, 0.0, 1.0, 0.0, 0.8), 1.0);
        // lit edge along the light direction
        assert_relative_eq!(lighting_map(1.0, 0.0, 1.0, 0.0, 0.5), 1.5 * 0.5);
        // opposite edge
        assert_relative_eq!(lighting_map(-1.0, 0.0, 1.0, 0.0, 0.5), 0.5 * 0.5);
        // far corner falls off to zero
        assert_relative_eq!(lighting_map(2.0, 2.0, 1.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn zero_intensity_ignores_angle() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 16,
            height: 10,
        };
        let src = checker(size)?;

        let mut reference = Image::<u8, 3>::from_size_val(size, 0)?;
        directional_lighting(&src, &mut reference, 0.0, 0.0)?;

        for angle in [45.0, 90.0, 180.0, 270.0, -33.0] {
            let mut dst = Image::<u8, 3>::from_size_val(size, 0)?;
            directional_lighting(&src, &mut dst, angle, 0.0)?;
            assert_eq!(dst.as_slice(), reference.as_slice(), "angle {angle}");
        }

        // and equals the input scaled by the falloff alone
        for y in 0..size.height {
            for x in 0..size.width {
                let dx = (x as f64 - 8.0) / 8.0;
                let dy = (y as f64 - 5.0) / 5.0;
                let falloff = (1.0 - 0.5 * (dx * dx + dy * dy).sqrt()).max(0.0);
                for c in 0..3 {
                    let expected = (src.get_pixel(x, y, c)? as f64 * falloff) as u8;
                    assert_eq!(reference.get_pixel(x, y, c)?, expected);
                }
            }
        }
        Ok(())
    }

    #[test]
    fn lighting_is_photometric_only() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 9,
            height: 9,
        };
        let src = Image::<u8, 1>::from_size_val(size, 0)?;
        let mut dst = Image::<u8, 1>::from_size_val(size, 7)?;

        directional_lighting(&src, &mut dst, 30.0, 1.0)?;

        // black stays black everywhere, including the last row and column
        assert!(dst.as_slice().iter().all(|&v| v == 0));
        Ok(())
    }

    #[test]
    fn lit_side_is_brighter_and_clamped() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 20,
            height: 20,
        };
        let src = Image::<u8, 1>::from_size_val(size, 250)?;
        let mut dst = Image::<u8, 1>::from_size_val(size, 0)?;

        // light from +x
        directional_lighting(&src, &mut dst, 0.0, 1.0)?;

        let lit = dst.get_pixel(14, 10, 0)?;
        let shaded = dst.get_pixel(6, 10, 0)?;
        assert!(lit > shaded, "{lit} vs {shaded}");
        // 250 * (1 + 0.4) * 0.8 = 280 clamps
        assert_eq!(lit, 255);
        Ok(())
    }
}

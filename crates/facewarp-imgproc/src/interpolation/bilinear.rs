use facewarp_image::Image;

/// Returns true if `(sx, sy)` lies inside the window that [`bilinear_sample`] accepts.
///
/// The window is `0 <= sx < cols - 1` and `0 <= sy < rows - 1`, so the last
/// column and the last row of the source can never be sampled. NaN coordinates
/// are rejected.
#[inline]
pub fn is_sampleable(cols: usize, rows: usize, sx: f64, sy: f64) -> bool {
    sx >= 0.0 && sx < cols as f64 - 1.0 && sy >= 0.0 && sy < rows as f64 - 1.0
}

/// Kernel for bilinear interpolation
///
/// # Arguments
///
/// * `image` - The source image.
/// * `sx` - The fractional x coordinate to sample.
/// * `sy` - The fractional y coordinate to sample.
///
/// # Returns
///
/// The interpolated pixel with every channel truncated toward zero, or `None`
/// if the coordinate is outside the window described in [`is_sampleable`].
///
/// # Example
///
/// ```
/// use facewarp_image::{Image, ImageSize};
/// use facewarp_imgproc::interpolation::bilinear_sample;
///
/// let image = Image::<u8, 1>::new(
///     ImageSize { width: 2, height: 2 },
///     vec![0, 100, 100, 200],
/// ).unwrap();
///
/// assert_eq!(bilinear_sample(&image, 0.5, 0.5), Some([100]));
/// assert_eq!(bilinear_sample(&image, 1.0, 0.0), None);
/// ```
#[inline]
pub fn bilinear_sample<const C: usize>(image: &Image<u8, C>, sx: f64, sy: f64) -> Option<[u8; C]> {
    let (rows, cols) = (image.rows(), image.cols());

    if !is_sampleable(cols, rows, sx, sy) {
        return None;
    }

    let x1 = sx.floor() as usize;
    let y1 = sy.floor() as usize;

    let wx = sx - x1 as f64;
    let wy = sy - y1 as f64;

    let w11 = (1.0 - wx) * (1.0 - wy);
    let w21 = wx * (1.0 - wy);
    let w12 = (1.0 - wx) * wy;
    let w22 = wx * wy;

    // (x1, y1), (x2, y1), (x1, y2), (x2, y2)
    let base11 = (y1 * cols + x1) * C;
    let base21 = base11 + C;
    let base12 = base11 + cols * C;
    let base22 = base12 + C;

    let data = image.as_slice();
    let p11 = &data[base11..base11 + C];
    let p21 = &data[base21..base21 + C];
    let p12 = &data[base12..base12 + C];
    let p22 = &data[base22..base22 + C];

    let mut pixel = [0u8; C];
    for (k, out) in pixel.iter_mut().enumerate() {
        let value = p11[k] as f64 * w11
            + p21[k] as f64 * w21
            + p12[k] as f64 * w12
            + p22[k] as f64 * w22;
        // truncation, not rounding
        *out = value as u8;
    }

    Some(pixel)
}

#[cfg(test)]
mod tests {
    use super::{bilinear_sample, is_sampleable};
    use facewarp_image::{Image, ImageError, ImageSize};

    fn ramp_4x4() -> Result<Image<u8, 1>, ImageError> {
        Image::new(
            ImageSize {
                width: 4,
                height: 4,
            },
            (0..16).collect(),
        )
    }

    #[test]
    fn sample_integer_coordinates_is_exact() -> Result<(), ImageError> {
        let image = ramp_4x4()?;
        for y in 0..3 {
            for x in 0..3 {
                let expected = image.get_pixel(x, y, 0)?;
                assert_eq!(
                    bilinear_sample(&image, x as f64, y as f64),
                    Some([expected])
                );
            }
        }
        Ok(())
    }

    #[test]
    fn sample_blends_and_truncates() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![0, 1, 0, 0],
        )?;
        // 0.5 * 1 * 0.5 = 0.25 truncates to zero
        assert_eq!(bilinear_sample(&image, 0.5, 0.5), Some([0]));

        let image = ramp_4x4()?;
        // between 5 and 6 horizontally, 5 and 9 vertically
        assert_eq!(bilinear_sample(&image, 1.5, 1.0), Some([5]));
        assert_eq!(bilinear_sample(&image, 1.0, 1.5), Some([7]));
        assert_eq!(bilinear_sample(&image, 1.5, 1.5), Some([7]));
        Ok(())
    }

    #[test]
    fn sample_channels_independently() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![10, 20, 30, 20, 40, 60, 10, 20, 30, 20, 40, 60],
        )?;
        assert_eq!(bilinear_sample(&image, 0.5, 0.25), Some([15, 30, 45]));
        Ok(())
    }

    #[test]
    fn sample_rejects_last_row_and_column() -> Result<(), ImageError> {
        let image = ramp_4x4()?;
        assert_eq!(bilinear_sample(&image, 3.0, 0.0), None);
        assert_eq!(bilinear_sample(&image, 0.0, 3.0), None);
        assert_eq!(bilinear_sample(&image, 2.999, 2.999).map(|p| p[0] > 0), Some(true));
        assert_eq!(bilinear_sample(&image, -0.001, 0.0), None);
        assert_eq!(bilinear_sample(&image, f64::NAN, 0.0), None);
        Ok(())
    }

    #[test]
    fn window_degenerate_images() {
        assert!(!is_sampleable(1, 1, 0.0, 0.0));
        assert!(!is_sampleable(0, 0, 0.0, 0.0));
        assert!(is_sampleable(2, 2, 0.0, 0.0));
    }
}

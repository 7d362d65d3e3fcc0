use facewarp_image::{Image, ImageError};

use crate::interpolation::bilinear_sample;
use crate::parallel;

/// Maps a destination pixel back to its source coordinate for a rotation.
///
/// `(sin_a, cos_a)` belong to the forward rotation angle; the inverse is
/// applied here.
#[inline]
fn inverse_rotate_point(
    x: f64,
    y: f64,
    center: (f64, f64),
    sin_a: f64,
    cos_a: f64,
) -> (f64, f64) {
    let tx = x - center.0;
    let ty = y - center.1;
    let sx = tx * cos_a + ty * sin_a + center.0;
    let sy = -tx * sin_a + ty * cos_a + center.1;
    (sx, sy)
}

/// Rotates an image about its center.
///
/// The center is `(cols / 2, rows / 2)` using integer division. Regions that
/// rotate in from outside the source are left untouched in `dst`, which is
/// expected to be zero-initialized.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image, same size as `src`.
/// * `angle_degrees` - The signed rotation angle in degrees.
///
/// # Errors
///
/// Returns an error if `src` and `dst` differ in size.
///
/// # Example
///
/// ```
/// use facewarp_image::{Image, ImageSize};
/// use facewarp_imgproc::warp::rotate;
///
/// let size = ImageSize { width: 4, height: 4 };
/// let src = Image::<u8, 1>::new(size, (0..16).collect()).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(size, 0).unwrap();
///
/// rotate(&src, &mut dst, 0.0).unwrap();
///
/// assert_eq!(
///     dst.as_slice(),
///     &[0, 1, 2, 0, 4, 5, 6, 0, 8, 9, 10, 0, 0, 0, 0, 0]
/// );
/// ```
pub fn rotate<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    angle_degrees: f64,
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
    let center = ((src.cols() / 2) as f64, (src.rows() / 2) as f64);

    parallel::par_iter_rows_indexed(dst, |x, y, dst_pixel| {
        let (sx, sy) = inverse_rotate_point(x as f64, y as f64, center, sin_a, cos_a);
        if let Some(pixel) = bilinear_sample(src, sx, sy) {
            dst_pixel.copy_from_slice(&pixel);
        }
    });

    Ok(())
}

use facewarp_image::{Image, ImageError};

use crate::interpolation::bilinear_sample;
use crate::parallel;

/// Rotated rays at or below this depth are rejected.
///
/// Guards the division in the re-projection and discards rays that end up
/// behind the camera.
pub const MIN_DEPTH: f64 = 0.1;

type Matrix3 = [[f64; 3]; 3];

#[rustfmt::skip]
fn rotation_x(angle: f64) -> Matrix3 {
    let (s, c) = angle.sin_cos();
    [
        [1.0, 0.0, 0.0],
        [0.0,   c,  -s],
        [0.0,   s,   c],
    ]
}

#[rustfmt::skip]
fn rotation_y(angle: f64) -> Matrix3 {
    let (s, c) = angle.sin_cos();
    [
        [  c, 0.0,   s],
        [0.0, 1.0, 0.0],
        [ -s, 0.0,   c],
    ]
}

#[rustfmt::skip]
fn rotation_z(angle: f64) -> Matrix3 {
    let (s, c) = angle.sin_cos();
    [
        [  c,  -s, 0.0],
        [  s,   c, 0.0],
        [0.0, 0.0, 1.0],
    ]
}

fn matmul3(a: &Matrix3, b: &Matrix3) -> Matrix3 {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, val) in row.iter_mut().enumerate() {
            *val = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
        }
    }
    out
}

/// Builds the camera rotation `R = Rz(roll) * Ry(yaw) * Rx(pitch)`.
///
/// # Arguments
///
/// * `pitch` - Rotation about the x axis in degrees.
/// * `yaw` - Rotation about the y axis in degrees.
/// * `roll` - Rotation about the z axis in degrees.
///
/// # Returns
///
/// The row-major 3x3 rotation matrix.
pub fn pose_rotation_matrix(pitch: f64, yaw: f64, roll: f64) -> [[f64; 3]; 3] {
    let rx = rotation_x(pitch.to_radians());
    let ry = rotation_y(yaw.to_radians());
    let rz = rotation_z(roll.to_radians());
    matmul3(&rz, &matmul3(&ry, &rx))
}

/// Simulates viewing the image plane from a rotated camera.
///
/// Uses a pinhole model with focal length `max(cols, rows)` and the principal
/// point at `(cols / 2, rows / 2)`. Each destination pixel is back-projected
/// to a unit-depth ray, rotated, and re-projected into the source. Rays whose
/// rotated depth is not above [`MIN_DEPTH`] leave the destination pixel
/// untouched.
///
/// Tilts are not clamped. Beyond roughly 15 degrees a growing share of the
/// output stays black.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `dst` - The output image, same size as `src`.
/// * `pitch` - Tilt about the x axis in degrees.
/// * `yaw` - Tilt about the y axis in degrees.
/// * `roll` - Tilt about the z axis in degrees.
///
/// # Errors
///
/// Returns an error if `src` and `dst` differ in size.
pub fn perspective_tilt<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    pitch: f64,
    yaw: f64,
    roll: f64,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    let r = pose_rotation_matrix(pitch, yaw, roll);
    let focal = src.cols().max(src.rows()) as f64;
    let (cx, cy) = ((src.cols() / 2) as f64, (src.rows() / 2) as f64);

    parallel::par_iter_rows_indexed(dst, |x, y, dst_pixel| {
        // unit-depth ray through the destination pixel
        let ray_x = (x as f64 - cx) / focal;
        let ray_y = (y as f64 - cy) / focal;

        let rot_x = r[0][0] * ray_x + r[0][1] * ray_y + r[0][2];
        let rot_y = r[1][0] * ray_x + r[1][1] * ray_y + r[1][2];
        let rot_z = r[2][0] * ray_x + r[2][1] * ray_y + r[2][2];

        if rot_z <= MIN_DEPTH {
            return;
        }

        let new_x = rot_x / rot_z * focal + cx;
        let new_y = rot_y / rot_z * focal + cy;

        if let Some(pixel) = bilinear_sample(src, new_x, new_y) {
            dst_pixel.copy_from_slice(&pixel);
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{perspective_tilt, pose_rotation_matrix};
    use crate::warp::rotate;
    use approx::assert_relative_eq;
    use facewarp_image::{Image, ImageError, ImageSize};

    fn gradient(size: ImageSize) -> Result<Image<u8, 1>, ImageError> {
        let data = (0..size.height)
            .flat_map(|y| (0..size.width).map(move |x| (x * 4 + y * 3) as u8))
            .collect();
        Image::new(size, data)
    }

    #[test]
    fn pose_matrix_is_orthonormal() {
        let r = pose_rotation_matrix(12.0, -7.0, 25.0);
        for i in 0..3 {
            for j in 0..3 {
                let dot: f64 = (0..3).map(|k| r[i][k] * r[j][k]).sum();
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(dot, expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn pose_matrix_composition_order() {
        // with pitch only the third row carries the tilt of the y axis
        let r = pose_rotation_matrix(90.0, 0.0, 0.0);
        assert_relative_eq!(r[2][1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(r[1][2], -1.0, epsilon = 1e-12);

        // roll applied last: Rz * Ry with yaw 90 and roll 90
        let r = pose_rotation_matrix(0.0, 90.0, 90.0);
        assert_relative_eq!(r[1][2], 1.0, epsilon = 1e-12);
        assert_relative_eq!(r[2][0], -1.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_tilt_is_identity_inside_window() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 16,
            height: 16,
        };
        let src = gradient(size)?;
        let mut dst = Image::<u8, 1>::from_size_val(size, 0)?;

        perspective_tilt(&src, &mut dst, 0.0, 0.0, 0.0)?;

        for y in 0..16 {
            for x in 0..16 {
                let expected = if x < 15 && y < 15 {
                    src.get_pixel(x, y, 0)?
                } else {
                    0
                };
                assert_eq!(dst.get_pixel(x, y, 0)?, expected, "at ({x}, {y})");
            }
        }
        Ok(())
    }

    #[test]
    fn roll_matches_opposite_in_plane_rotation() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 32,
            height: 32,
        };
        let src = gradient(size)?;

        let mut tilted = Image::<u8, 1>::from_size_val(size, 0)?;
        perspective_tilt(&src, &mut tilted, 0.0, 0.0, 10.0)?;

        let mut rotated = Image::<u8, 1>::from_size_val(size, 0)?;
        rotate(&src, &mut rotated, -10.0)?;

        for (a, b) in tilted.as_slice().iter().zip(rotated.as_slice()) {
            assert!((*a as i32 - *b as i32).abs() <= 1, "{a} vs {b}");
        }
        Ok(())
    }

    #[test]
    fn steep_pitch_blanks_rays_behind_camera() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 32,
            height: 32,
        };
        let src = Image::<u8, 1>::from_size_val(size, 255)?;

        let count_black = |pitch: f64| -> Result<usize, ImageError> {
            let mut dst = Image::<u8, 1>::from_size_val(size, 0)?;
            perspective_tilt(&src, &mut dst, pitch, 0.0, 0.0)?;
            Ok(dst.as_slice().iter().filter(|&&v| v == 0).count())
        };

        let mild = count_black(5.0)?;
        let steep = count_black(80.0)?;
        assert!(steep > mild, "steep {steep} mild {mild}");
        assert!(steep > 32 * 8);
        Ok(())
    }

    #[test]
    fn tilt_preserves_size_ch3() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 20,
            height: 12,
        };
        let src = Image::<u8, 3>::from_size_val(size, 90)?;
        let mut dst = Image::<u8, 3>::from_size_val(size, 0)?;
        perspective_tilt(&src, &mut dst, 10.0, -5.0, 3.0)?;
        assert_eq!(dst.size(), size);
        // truncation may lose one level on a flat image
        assert!(dst.as_slice().iter().any(|&v| v >= 89));
        Ok(())
    }
}

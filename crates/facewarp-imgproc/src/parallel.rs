use rayon::prelude::*;

use facewarp_image::Image;

/// Apply a function to each destination pixel in parallel, one row per task.
///
/// The closure receives the pixel coordinates `(x, y)` and the mutable
/// channels of that pixel.
pub fn par_iter_rows_indexed<T, const C: usize>(
    dst: &mut Image<T, C>,
    f: impl Fn(usize, usize, &mut [T]) + Send + Sync,
) where
    T: Send + Sync,
{
    let cols = dst.cols();
    if cols == 0 || C == 0 {
        return;
    }

    dst.as_slice_mut()
        .par_chunks_exact_mut(C * cols)
        .enumerate()
        .for_each(|(y, dst_row)| {
            dst_row
                .chunks_exact_mut(C)
                .enumerate()
                .for_each(|(x, dst_pixel)| f(x, y, dst_pixel));
        });
}

/// Apply a function to each pair of co-located pixels in parallel.
///
/// `src` and `dst` must have the same size; the caller checks it.
pub fn par_iter_rows_indexed_val<T1, T2, const C: usize>(
    src: &Image<T1, C>,
    dst: &mut Image<T2, C>,
    f: impl Fn(usize, usize, &[T1], &mut [T2]) + Send + Sync,
) where
    T1: Send + Sync,
    T2: Send + Sync,
{
    let cols = src.cols();
    if cols == 0 || C == 0 {
        return;
    }

    src.as_slice()
        .par_chunks_exact(C * cols)
        .zip(dst.as_slice_mut().par_chunks_exact_mut(C * cols))
        .enumerate()
        .for_each(|(y, (src_row, dst_row))| {
            src_row
                .chunks_exact(C)
                .zip(dst_row.chunks_exact_mut(C))
                .enumerate()
                .for_each(|(x, (src_pixel, dst_pixel))| f(x, y, src_pixel, dst_pixel));
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use facewarp_image::{ImageError, ImageSize};

    #[test]
    fn rows_indexed_visits_every_pixel() -> Result<(), ImageError> {
        let mut image = Image::<usize, 2>::from_size_val(
            ImageSize {
                width: 3,
                height: 2,
            },
            0,
        )?;
        par_iter_rows_indexed(&mut image, |x, y, pixel| {
            pixel[0] = x;
            pixel[1] = y;
        });
        assert_eq!(image.as_slice(), &[0, 0, 1, 0, 2, 0, 0, 1, 1, 1, 2, 1]);
        Ok(())
    }

    #[test]
    fn rows_indexed_val_pairs_pixels() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 2,
            height: 2,
        };
        let src = Image::<u8, 1>::new(size, vec![1, 2, 3, 4])?;
        let mut dst = Image::<u8, 1>::from_size_val(size, 0)?;
        par_iter_rows_indexed_val(&src, &mut dst, |x, y, s, d| {
            d[0] = s[0] * 10 + (x + y) as u8;
        });
        assert_eq!(dst.as_slice(), &[10, 21, 31, 42]);
        Ok(())
    }

    #[test]
    fn empty_image_is_noop() -> Result<(), ImageError> {
        let mut image = Image::<u8, 1>::new(
            ImageSize {
                width: 0,
                height: 4,
            },
            vec![],
        )?;
        par_iter_rows_indexed(&mut image, |_, _, _| unreachable!());
        Ok(())
    }
}

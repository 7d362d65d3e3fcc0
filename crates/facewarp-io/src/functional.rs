use std::io::Write;
use std::path::Path;

use facewarp_image::{Image, ImageSize, RasterImage};
use jpeg_encoder::{ColorType, Encoder};

use crate::error::IoError;

/// Swaps the first and third channel of every pixel in place (RGB <-> BGR).
fn swap_red_blue(buf: &mut [u8]) {
    buf.chunks_exact_mut(3).for_each(|px| px.swap(0, 2));
}

/// Reads an image from the given file path.
///
/// The format is guessed from the file contents. Single-channel sources
/// (with or without alpha, any bit depth) become [`RasterImage::Gray8`];
/// everything else is converted to 8-bit and returned as
/// [`RasterImage::Bgr8`] in BGR channel order.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Errors
///
/// Returns [`IoError::FileDoesNotExist`] for a missing file and
/// [`IoError::ImageDecodeError`] for data that cannot be decoded.
pub fn read_image_any(file_path: impl AsRef<Path>) -> Result<RasterImage, IoError> {
    let file_path = file_path.as_ref();

    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    let image = match img.color() {
        image::ColorType::L8
        | image::ColorType::La8
        | image::ColorType::L16
        | image::ColorType::La16 => RasterImage::Gray8(Image::new(size, img.into_luma8().into_raw())?),
        _ => {
            let mut buf = img.into_rgb8().into_raw();
            swap_red_blue(&mut buf);
            RasterImage::Bgr8(Image::new(size, buf)?)
        }
    };

    Ok(image)
}

/// Writes the image to the given file path as JPEG.
///
/// Color images are expected in BGR channel order. The encoded bytes go to a
/// temporary file in the target directory which is then renamed over
/// `file_path`, so a failed write never leaves a partial file behind.
///
/// # Arguments
///
/// * `file_path` - The path to the JPEG image.
/// * `image` - The image to encode.
/// * `quality` - The quality of the JPEG encoding, range from 0 (lowest) to 100 (highest)
pub fn write_image_jpeg(
    file_path: impl AsRef<Path>,
    image: &RasterImage,
    quality: u8,
) -> Result<(), IoError> {
    let size = image.size();
    let (width, height) = match (u16::try_from(size.width), u16::try_from(size.height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => return Err(IoError::ImageTooLarge(size.width, size.height)),
    };

    let color_type = match image {
        RasterImage::Gray8(_) => ColorType::Luma,
        RasterImage::Bgr8(_) => ColorType::Bgr,
    };

    let mut jpeg_data = Vec::new();
    let encoder = Encoder::new(&mut jpeg_data, quality);
    encoder.encode(image.as_slice(), width, height, color_type)?;

    let file_path = file_path.as_ref();
    let dir = match file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(&jpeg_data)?;
    tmp.persist(file_path).map_err(|e| e.error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{read_image_any, write_image_jpeg};
    use crate::error::IoError;
    use facewarp_image::{Image, ImageSize, RasterImage};

    fn close(a: &[u8], b: &[u8], tol: i32) -> bool {
        a.iter().zip(b).all(|(&x, &y)| (x as i32 - y as i32).abs() <= tol)
    }

    #[test]
    fn read_missing_file() {
        let result = read_image_any("does/not/exist_processed.jpg");
        assert!(matches!(result, Err(IoError::FileDoesNotExist(_))));
    }

    #[test]
    fn read_corrupt_file() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("broken_processed.jpg");
        std::fs::write(&file_path, b"definitely not a jpeg")?;

        assert!(read_image_any(&file_path).is_err());
        Ok(())
    }

    #[test]
    fn read_write_jpeg_bgr() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("face.jpg");

        let size = ImageSize {
            width: 16,
            height: 8,
        };
        // pure blue in BGR order
        let data = [255u8, 0, 0].repeat(16 * 8);
        let image = RasterImage::Bgr8(Image::new(size, data.clone())?);

        write_image_jpeg(&file_path, &image, 95)?;
        assert!(file_path.exists(), "File does not exist: {:?}", file_path);

        let back = read_image_any(&file_path)?;
        assert_eq!(back.size(), size);
        assert_eq!(back.num_channels(), 3);
        assert!(close(back.as_slice(), &data, 8));

        Ok(())
    }

    #[test]
    fn read_write_jpeg_gray() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("face.jpg");

        let size = ImageSize {
            width: 8,
            height: 8,
        };
        let image = RasterImage::Gray8(Image::from_size_val(size, 90u8)?);

        write_image_jpeg(&file_path, &image, 95)?;

        let back = read_image_any(&file_path)?;
        assert!(matches!(back, RasterImage::Gray8(_)));
        assert!(close(back.as_slice(), image.as_slice(), 2));

        Ok(())
    }

    #[test]
    fn failed_encode_leaves_no_file() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("empty_augmented.jpg");

        let size = ImageSize {
            width: 0,
            height: 0,
        };
        let image = RasterImage::Bgr8(Image::new(size, Vec::new())?);

        let result = write_image_jpeg(&file_path, &image, 95);
        assert!(matches!(result, Err(IoError::JpegEncodingError(_))));
        assert!(!file_path.exists());
        assert_eq!(std::fs::read_dir(tmp_dir.path())?.count(), 0);

        Ok(())
    }

    #[test]
    fn write_replaces_existing_file() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("face.jpg");
        std::fs::write(&file_path, b"stale")?;

        let size = ImageSize {
            width: 8,
            height: 8,
        };
        let image = RasterImage::Gray8(Image::from_size_val(size, 200u8)?);
        write_image_jpeg(&file_path, &image, 95)?;

        let back = read_image_any(&file_path)?;
        assert_eq!(back.size(), size);
        assert_eq!(std::fs::read_dir(tmp_dir.path())?.count(), 1);

        Ok(())
    }

    #[test]
    fn read_png_rgb_as_bgr() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("face_processed.png");

        let rgb = image::RgbImage::from_pixel(4, 3, image::Rgb([10, 20, 30]));
        rgb.save(&file_path)?;

        let back = read_image_any(&file_path)?;
        assert_eq!(back.size(), ImageSize { width: 4, height: 3 });
        assert_eq!(&back.as_slice()[..3], &[30, 20, 10]);

        Ok(())
    }
}

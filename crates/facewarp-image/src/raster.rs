use crate::image::{Image, ImageSize};

/// An 8-bit image whose channel layout is only known at runtime.
///
/// Color images are always kept in BGR channel order.
#[derive(Clone, Debug, PartialEq)]
pub enum RasterImage {
    /// 8-bit grayscale image
    Gray8(Image<u8, 1>),
    /// 8-bit BGR image
    Bgr8(Image<u8, 3>),
}

impl RasterImage {
    /// The size of the wrapped image in pixels.
    pub fn size(&self) -> ImageSize {
        match self {
            RasterImage::Gray8(image) => image.size(),
            RasterImage::Bgr8(image) => image.size(),
        }
    }

    /// The number of channels of the wrapped image.
    pub fn num_channels(&self) -> usize {
        match self {
            RasterImage::Gray8(image) => image.num_channels(),
            RasterImage::Bgr8(image) => image.num_channels(),
        }
    }

    /// Borrow the raw row-major pixel buffer.
    pub fn as_slice(&self) -> &[u8] {
        match self {
            RasterImage::Gray8(image) => image.as_slice(),
            RasterImage::Bgr8(image) => image.as_slice(),
        }
    }
}

impl From<Image<u8, 1>> for RasterImage {
    fn from(image: Image<u8, 1>) -> Self {
        RasterImage::Gray8(image)
    }
}

impl From<Image<u8, 3>> for RasterImage {
    fn from(image: Image<u8, 3>) -> Self {
        RasterImage::Bgr8(image)
    }
}

#[cfg(test)]
mod tests {
    use super::RasterImage;
    use crate::{Image, ImageError, ImageSize};

    #[test]
    fn raster_reports_layout() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 3,
            height: 2,
        };
        let gray: RasterImage = Image::<u8, 1>::from_size_val(size, 7)?.into();
        let bgr: RasterImage = Image::<u8, 3>::from_size_val(size, 9)?.into();

        assert_eq!(gray.size(), size);
        assert_eq!(gray.num_channels(), 1);
        assert_eq!(gray.as_slice().len(), 6);

        assert_eq!(bgr.size(), size);
        assert_eq!(bgr.num_channels(), 3);
        assert_eq!(bgr.as_slice().len(), 18);

        Ok(())
    }
}

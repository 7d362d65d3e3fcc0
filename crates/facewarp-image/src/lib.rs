#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image representation for the transformation engine.
pub mod image;

/// Error types for the image module.
pub mod error;

/// images whose channel count is only known at runtime.
pub mod raster;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
pub use crate::raster::RasterImage;

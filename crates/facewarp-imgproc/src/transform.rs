//! The closed set of transforms the engine knows how to apply.
//!
//! [`TransformParameters`] carries one fully specified transform and
//! dispatches to the matching kernel. The output always has the size and
//! channel layout of the input.

use facewarp_image::{Image, ImageError, RasterImage};

use crate::distortion::{lens_distortion, DistortionMode};
use crate::lighting::directional_lighting;
use crate::warp::{perspective_tilt, rotate};

/// The four kinds of transform, without parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformKind {
    /// In-plane rotation about the center.
    Rotation,
    /// Simulated head-pose tilt.
    Perspective,
    /// Radial barrel or pincushion warp.
    LensDistortion,
    /// Directional shading.
    Lighting,
}

impl TransformKind {
    /// Every kind, in a fixed order.
    pub const ALL: [TransformKind; 4] = [
        TransformKind::Rotation,
        TransformKind::Perspective,
        TransformKind::LensDistortion,
        TransformKind::Lighting,
    ];

    /// The method name used to select this kind, e.g. `rotation`.
    pub fn name(&self) -> &'static str {
        match self {
            TransformKind::Rotation => "rotation",
            TransformKind::Perspective => "perspective",
            TransformKind::LensDistortion => "distortion",
            TransformKind::Lighting => "lighting",
        }
    }
}

impl std::fmt::Display for TransformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A fully parameterized transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformParameters {
    /// Rotate by `angle_degrees` about the image center.
    Rotation {
        /// Signed angle in degrees.
        angle_degrees: f64,
    },
    /// Re-project through a camera rotated by the given angles in degrees.
    Perspective {
        /// Tilt about the x axis.
        pitch: f64,
        /// Tilt about the y axis.
        yaw: f64,
        /// Tilt about the z axis.
        roll: f64,
    },
    /// Radial lens warp. See [`lens_distortion`] for the strength contract.
    LensDistortion {
        /// Non-negative strength.
        strength: f64,
        /// Barrel or pincushion.
        mode: DistortionMode,
    },
    /// Directional shading.
    Lighting {
        /// Light direction in degrees.
        angle_degrees: f64,
        /// Strength of the directional term.
        intensity: f64,
    },
}

impl TransformParameters {
    /// The kind of this transform.
    pub fn kind(&self) -> TransformKind {
        match self {
            TransformParameters::Rotation { .. } => TransformKind::Rotation,
            TransformParameters::Perspective { .. } => TransformKind::Perspective,
            TransformParameters::LensDistortion { .. } => TransformKind::LensDistortion,
            TransformParameters::Lighting { .. } => TransformKind::Lighting,
        }
    }

    /// Applies the transform from `src` into a pre-allocated `dst`.
    ///
    /// Pixels the transform leaves undefined keep whatever `dst` held.
    ///
    /// # Errors
    ///
    /// Returns an error if `src` and `dst` differ in size.
    pub fn apply_into<const C: usize>(
        &self,
        src: &Image<u8, C>,
        dst: &mut Image<u8, C>,
    ) -> Result<(), ImageError> {
        match *self {
            TransformParameters::Rotation { angle_degrees } => rotate(src, dst, angle_degrees),
            TransformParameters::Perspective { pitch, yaw, roll } => {
                perspective_tilt(src, dst, pitch, yaw, roll)
            }
            TransformParameters::LensDistortion { strength, mode } => {
                lens_distortion(src, dst, strength, mode)
            }
            TransformParameters::Lighting {
                angle_degrees,
                intensity,
            } => directional_lighting(src, dst, angle_degrees, intensity),
        }
    }

    /// Applies the transform into a fresh zero-initialized image.
    pub fn apply_image<const C: usize>(&self, src: &Image<u8, C>) -> Result<Image<u8, C>, ImageError> {
        let mut dst = Image::from_size_val(src.size(), 0u8)?;
        self.apply_into(src, &mut dst)?;
        Ok(dst)
    }

    /// Applies the transform to an image of either channel layout.
    ///
    /// # Example
    ///
    /// ```
    /// use facewarp_image::{Image, ImageSize, RasterImage};
    /// use facewarp_imgproc::transform::TransformParameters;
    ///
    /// let size = ImageSize { width: 8, height: 6 };
    /// let image = RasterImage::Bgr8(Image::from_size_val(size, 50u8).unwrap());
    ///
    /// let params = TransformParameters::Rotation { angle_degrees: 10.0 };
    /// let out = params.apply(&image).unwrap();
    ///
    /// assert_eq!(out.size(), size);
    /// assert_eq!(out.num_channels(), 3);
    /// ```
    pub fn apply(&self, src: &RasterImage) -> Result<RasterImage, ImageError> {
        match src {
            RasterImage::Gray8(image) => Ok(RasterImage::Gray8(self.apply_image(image)?)),
            RasterImage::Bgr8(image) => Ok(RasterImage::Bgr8(self.apply_image(image)?)),
        }
    }
}

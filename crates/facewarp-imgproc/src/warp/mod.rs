//! Geometric image transformations built on inverse mapping.
//!
//! - In-plane rotation about the image center
//! - Head-pose tilt simulated by a pinhole camera re-projection
//!
//! Both keep the output the same size as the input. Destination pixels whose
//! source falls outside the sampling window are left at their initial value.
//!
//! # Examples
//!
//! Rotating an image by 10 degrees:
//!
//! ```
//! use facewarp_image::{Image, ImageSize};
//! use facewarp_imgproc::warp::rotate;
//!
//! let size = ImageSize { width: 8, height: 8 };
//! let src = Image::<u8, 1>::from_size_val(size, 128).unwrap();
//! let mut dst = Image::<u8, 1>::from_size_val(size, 0).unwrap();
//!
//! rotate(&src, &mut dst, 10.0).unwrap();
//! assert_eq!(dst.size(), src.size());
//! ```

mod perspective;
mod rotation;

pub use perspective::{perspective_tilt, pose_rotation_matrix, MIN_DEPTH};
pub use rotation::rotate;

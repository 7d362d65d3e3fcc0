#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! The crate re-exports the workspace members under short module names:
//!
//! - [`image`]: pixel containers and the decoded [`image::RasterImage`].
//! - [`imgproc`]: rotation, perspective tilt, lens distortion and lighting.
//! - [`io`]: decoding of source images and JPEG encoding of results.
//! - [`augment`]: the batch orchestrator over an identity dataset.

#[doc(inline)]
pub use facewarp_image as image;

#[doc(inline)]
pub use facewarp_imgproc as imgproc;

#[doc(inline)]
pub use facewarp_io as io;

#[doc(inline)]
pub use facewarp_augment as augment;

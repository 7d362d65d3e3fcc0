//! Pixel resampling used by every geometric transform.
//!
//! All warps in this crate use inverse mapping: for each destination pixel the
//! source coordinate is computed and then resampled here. A sample that falls
//! outside the valid window is reported as `None` and the caller leaves the
//! destination pixel untouched.

mod bilinear;

pub use bilinear::{bilinear_sample, is_sampleable};

#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// radial lens distortion module.
pub mod distortion;

/// utilities for interpolation.
pub mod interpolation;

/// directional lighting simulation module.
pub mod lighting;

/// module containing parallization utilities.
pub mod parallel;

/// closed set of transforms and their parameters.
pub mod transform;

/// image geometric transformations module.
pub mod warp;

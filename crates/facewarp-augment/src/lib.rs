#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// batch orchestrator over the images of one identity.
pub mod augmentor;

/// configuration of directory layout and file naming.
pub mod config;

/// Error types for the augment module.
pub mod error;

/// persisted per-identity session history.
pub mod metadata;

/// method selection from a name or explicit parameters.
pub mod method;

/// deterministic output file naming.
pub mod naming;

/// fixed parameter catalogs per transform kind.
pub mod presets;

pub use augmentor::{AugmentationJob, AugmentationReport, Augmentor};
pub use config::AugmentConfig;
pub use error::AugmentError;
pub use metadata::{JsonSessionLog, SessionLog, SessionMetadata, SessionRecord};
pub use method::MethodSelector;

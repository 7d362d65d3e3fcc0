use std::path::PathBuf;

/// An error type for the augment module.
///
/// Only batch-level failures surface here. Failures of a single image or
/// variant are logged and counted in the run report instead.
#[derive(thiserror::Error, Debug)]
pub enum AugmentError {
    /// The method name is not one of the known transforms or `random`.
    #[error("Unknown augmentation method: {0}")]
    UnknownMethod(String),

    /// An explicit rotation angle was given together with a method name.
    #[error("A fixed angle cannot be combined with method {0}")]
    ConflictingMethod(String),

    /// The identity directory does not exist.
    #[error("Directory not found: {0}")]
    MissingDirectory(PathBuf),

    /// The identity directory holds no source images.
    #[error("No processed images found in {0}")]
    NoSourceImages(PathBuf),

    /// At least one variant per image must be requested.
    #[error("Variant count must be > 0, got {0}")]
    InvalidVariantCount(usize),

    /// Error to manipulate a file or directory.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to serialize the session metadata.
    #[error("Failed to serialize metadata. {0}")]
    MetadataError(#[from] serde_json::Error),
}

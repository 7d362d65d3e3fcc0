use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Directory layout and naming used by the [`crate::Augmentor`].
///
/// Missing fields take their default when deserialized, so a partial
/// document is enough to override a single setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentConfig {
    /// Root of the dataset.
    pub data_root: PathBuf,
    /// Sub-directory of `data_root` holding one directory per identity.
    pub processed_subdir: String,
    /// Stem suffix that marks a source image, e.g. `_processed`.
    pub source_suffix: String,
    /// Accepted source extensions, compared case-insensitively.
    pub source_extensions: Vec<String>,
    /// Stem suffix appended to every generated file.
    pub output_suffix: String,
    /// Extension of generated files.
    pub output_extension: String,
    /// JPEG quality of generated files, 0 to 100.
    pub jpeg_quality: u8,
    /// File name of the per-identity session metadata.
    pub metadata_file_name: String,
    /// Version string stamped on every session record.
    pub version: String,
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("data"),
            processed_subdir: "processed".to_string(),
            source_suffix: "_processed".to_string(),
            source_extensions: vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
            output_suffix: "_augmented".to_string(),
            output_extension: "jpg".to_string(),
            jpeg_quality: 95,
            metadata_file_name: "augmentation_metadata.json".to_string(),
            version: "1.0".to_string(),
        }
    }
}

impl AugmentConfig {
    /// Creates the default configuration rooted at `data_root`.
    pub fn with_data_root(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            ..Default::default()
        }
    }

    /// The directory holding one sub-directory per identity.
    pub fn processed_root(&self) -> PathBuf {
        self.data_root.join(&self.processed_subdir)
    }

    /// The directory of a single identity.
    pub fn identity_dir(&self, identity: &str) -> PathBuf {
        self.processed_root().join(identity)
    }
}

//! Per-identity session history.
//!
//! The history is a small JSON document next to the identity's images. Every
//! orchestrator run reads the whole document, appends one record, recomputes
//! the totals and rewrites it. The rewrite goes through a temporary file and
//! an atomic rename, so a reader never sees a torn document. Two runs against
//! the same identity at the same time can still lose one of the records;
//! callers must not run them concurrently.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use log::warn;
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::AugmentError;

/// Outcome of one orchestrator run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// When the run finished.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    /// The method name, e.g. `rotation` or `random`.
    pub method: String,
    /// Variants requested per source image.
    pub count_per_image: usize,
    /// Variants written.
    pub images_augmented: usize,
    /// Images or variants that failed.
    pub images_failed: usize,
    /// Engine version.
    pub version: String,
}

/// The persisted history of one identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// The identity the history belongs to.
    pub person_name: String,
    /// Every run, oldest first.
    pub augmentation_sessions: Vec<SessionRecord>,
    /// Sum of `images_augmented` over every run.
    pub total_augmentations: usize,
    /// Timestamp of the latest run.
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Parses an RFC 3339 timestamp, or an ISO-8601 one without offset taken as UTC.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| raw.parse::<NaiveDateTime>().map(|naive| naive.and_utc()))
}

fn deserialize_timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(d)?;
    parse_timestamp(&raw).map_err(de::Error::custom)
}

fn deserialize_optional_timestamp<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    Option::<String>::deserialize(d)?
        .map(|raw| parse_timestamp(&raw))
        .transpose()
        .map_err(de::Error::custom)
}

impl SessionMetadata {
    /// An empty history for `person_name`.
    pub fn new(person_name: impl Into<String>) -> Self {
        Self {
            person_name: person_name.into(),
            augmentation_sessions: Vec::new(),
            total_augmentations: 0,
            last_updated: None,
        }
    }

    /// Appends a record and recomputes the derived fields.
    pub fn push(&mut self, record: SessionRecord) {
        self.augmentation_sessions.push(record);
        self.recompute_totals();
    }

    fn recompute_totals(&mut self) {
        self.total_augmentations = self
            .augmentation_sessions
            .iter()
            .map(|s| s.images_augmented)
            .sum();
        self.last_updated = self.augmentation_sessions.iter().map(|s| s.timestamp).max();
    }
}

/// Storage of session histories, keyed by identity.
pub trait SessionLog {
    /// Returns the stored history, or an empty one if there is none or it is unreadable.
    fn load(&self, identity: &str) -> SessionMetadata;

    /// Appends `record` to the history of `identity` and persists the whole history.
    ///
    /// Returns the history as written.
    fn append(&self, identity: &str, record: SessionRecord) -> Result<SessionMetadata, AugmentError>;
}

/// A [`SessionLog`] storing one pretty-printed JSON file per identity directory.
#[derive(Debug, Clone)]
pub struct JsonSessionLog {
    root: PathBuf,
    file_name: String,
}

impl JsonSessionLog {
    /// Stores histories at `<root>/<identity>/<file_name>`.
    pub fn new(root: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            file_name: file_name.into(),
        }
    }

    /// Path of the history file of `identity`.
    pub fn path(&self, identity: &str) -> PathBuf {
        self.root.join(identity).join(&self.file_name)
    }

    fn write_atomic(path: &Path, metadata: &SessionMetadata) -> Result<(), AugmentError> {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, metadata)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl SessionLog for JsonSessionLog {
    fn load(&self, identity: &str) -> SessionMetadata {
        let path = self.path(identity);

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return SessionMetadata::new(identity);
            }
            Err(e) => {
                warn!("Could not read {}: {e}. Starting a new history.", path.display());
                return SessionMetadata::new(identity);
            }
        };

        match serde_json::from_str(&contents) {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(
                    "Discarding unparsable metadata {}: {e}. Prior history is lost.",
                    path.display()
                );
                SessionMetadata::new(identity)
            }
        }
    }

    fn append(&self, identity: &str, record: SessionRecord) -> Result<SessionMetadata, AugmentError> {
        let mut metadata = self.load(identity);
        metadata.push(record);
        Self::write_atomic(&self.path(identity), &metadata)?;
        Ok(metadata)
    }
}

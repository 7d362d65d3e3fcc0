//! Sequential batch over the source images of one identity.
//!
//! For every source image and every requested variant the orchestrator picks
//! transform parameters, derives the output name, skips targets that already
//! exist unless overwriting, and otherwise transforms and writes the image.
//! A failing image or variant is logged and counted; it never aborts the
//! batch. One session record is appended to the identity's history at the end.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use facewarp_image::{ImageError, RasterImage};
use facewarp_imgproc::transform::TransformParameters;
use facewarp_io::{read_image_any, write_image_jpeg, IoError};
use log::{debug, info, warn};
use rand::Rng;

use crate::config::AugmentConfig;
use crate::error::AugmentError;
use crate::metadata::{JsonSessionLog, SessionLog, SessionRecord};
use crate::method::MethodSelector;
use crate::naming;

/// Failure of a single image or variant. Never leaves the batch loop.
#[derive(thiserror::Error, Debug)]
enum VariantError {
    #[error("unreadable image: {0}")]
    UnreadableImage(IoError),

    #[error("transform failed: {0}")]
    Transform(#[from] ImageError),

    #[error("write failed: {0}")]
    Write(IoError),
}

enum VariantOutcome {
    Written,
    Skipped,
}

/// One batch request against a single identity.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentationJob {
    /// The identity whose directory is processed.
    pub identity: String,
    /// Source images, in processing order.
    pub sources: Vec<PathBuf>,
    /// How each variant's transform is chosen.
    pub method: MethodSelector,
    /// Variants generated per source image.
    pub count_per_image: usize,
    /// Replace outputs that already exist.
    pub overwrite: bool,
}

/// Counters of one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AugmentationReport {
    /// Variants written.
    pub images_augmented: usize,
    /// Unreadable sources plus failed variants.
    pub images_failed: usize,
    /// Variants whose output already existed.
    pub images_skipped: usize,
    /// The run stopped early on request.
    pub cancelled: bool,
}

impl AugmentationReport {
    /// True if at least one variant was written.
    pub fn success(&self) -> bool {
        self.images_augmented > 0
    }
}

/// Generates augmented variants for the identities of a dataset.
///
/// # Example
///
/// ```no_run
/// use facewarp_augment::{AugmentConfig, Augmentor};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let augmentor = Augmentor::new(AugmentConfig::with_data_root("data"));
/// let job = augmentor
///     .prepare_job("alice", "rotation".parse().unwrap(), 2, false)
///     .unwrap();
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let report = augmentor.run(&job, &mut rng).unwrap();
/// println!("created {} variants", report.images_augmented);
/// ```
pub struct Augmentor<L = JsonSessionLog> {
    config: AugmentConfig,
    session_log: L,
    cancel: Option<Arc<AtomicBool>>,
}

impl Augmentor<JsonSessionLog> {
    /// Creates an orchestrator storing session histories as JSON next to the images.
    pub fn new(config: AugmentConfig) -> Self {
        let session_log =
            JsonSessionLog::new(config.processed_root(), config.metadata_file_name.clone());
        Self::with_session_log(config, session_log)
    }
}

impl<L: SessionLog> Augmentor<L> {
    /// Creates an orchestrator with a custom session history store.
    pub fn with_session_log(config: AugmentConfig, session_log: L) -> Self {
        Self {
            config,
            session_log,
            cancel: None,
        }
    }

    /// Stops a running batch between variants once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &AugmentConfig {
        &self.config
    }

    /// The session history store.
    pub fn session_log(&self) -> &L {
        &self.session_log
    }

    /// Names of every identity directory, sorted.
    pub fn list_identities(&self) -> Result<Vec<String>, AugmentError> {
        let root = self.config.processed_root();
        if !root.is_dir() {
            return Err(AugmentError::MissingDirectory(root));
        }

        let mut identities = std::fs::read_dir(&root)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .collect::<Vec<_>>();
        identities.sort();

        Ok(identities)
    }

    /// Source images of `identity`, sorted by path.
    pub fn source_images(&self, identity: &str) -> Result<Vec<PathBuf>, AugmentError> {
        let dir = self.config.identity_dir(identity);
        if !dir.is_dir() {
            return Err(AugmentError::MissingDirectory(dir));
        }

        let mut sources = std::fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && naming::is_source_image(path, &self.config))
            .collect::<Vec<_>>();
        sources.sort();

        Ok(sources)
    }

    /// Validates the batch preconditions and resolves the source images.
    ///
    /// # Errors
    ///
    /// Fails if `count_per_image` is zero, the identity directory is missing,
    /// or it holds no source images.
    pub fn prepare_job(
        &self,
        identity: &str,
        method: MethodSelector,
        count_per_image: usize,
        overwrite: bool,
    ) -> Result<AugmentationJob, AugmentError> {
        if count_per_image == 0 {
            return Err(AugmentError::InvalidVariantCount(count_per_image));
        }

        let sources = self.source_images(identity)?;
        if sources.is_empty() {
            return Err(AugmentError::NoSourceImages(
                self.config.identity_dir(identity),
            ));
        }

        Ok(AugmentationJob {
            identity: identity.to_string(),
            sources,
            method,
            count_per_image,
            overwrite,
        })
    }

    /// Resolves and runs a batch in one call.
    pub fn augment_identity<R: Rng>(
        &self,
        identity: &str,
        method: MethodSelector,
        count_per_image: usize,
        overwrite: bool,
        rng: &mut R,
    ) -> Result<AugmentationReport, AugmentError> {
        let job = self.prepare_job(identity, method, count_per_image, overwrite)?;
        self.run(&job, rng)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Runs a prepared batch.
    ///
    /// Random choices are drawn from `rng`, so a seeded generator reproduces
    /// the same parameters and file names.
    ///
    /// # Errors
    ///
    /// Only batch-level preconditions fail the call. Per-image and
    /// per-variant failures are counted in the report.
    pub fn run<R: Rng>(
        &self,
        job: &AugmentationJob,
        rng: &mut R,
    ) -> Result<AugmentationReport, AugmentError> {
        if job.count_per_image == 0 {
            return Err(AugmentError::InvalidVariantCount(job.count_per_image));
        }

        let dir = self.config.identity_dir(&job.identity);
        if !dir.is_dir() {
            return Err(AugmentError::MissingDirectory(dir));
        }
        if job.sources.is_empty() {
            return Err(AugmentError::NoSourceImages(dir));
        }

        info!(
            "Augmenting {} images of {} with method {} ({} per image)",
            job.sources.len(),
            job.identity,
            job.method.name(),
            job.count_per_image
        );

        let mut report = AugmentationReport::default();

        'sources: for source_path in job.sources.iter() {
            let Some(base) = naming::source_base_name(source_path, &self.config) else {
                warn!("Skipping source with invalid name: {}", source_path.display());
                report.images_failed += 1;
                continue;
            };

            // decoded on first use so fully skipped sources are never read
            let mut source: Option<RasterImage> = None;

            for variant in 1..=job.count_per_image {
                if self.is_cancelled() {
                    report.cancelled = true;
                    break 'sources;
                }

                let params = job.method.pick(rng);
                let index = (job.count_per_image > 1).then_some(variant);
                let output_path =
                    dir.join(naming::output_file_name(&base, &params, index, &self.config));

                let outcome = self.augment_variant(
                    source_path,
                    &mut source,
                    &params,
                    &output_path,
                    job.overwrite,
                );
                match outcome {
                    Ok(VariantOutcome::Written) => {
                        debug!("Created: {}", output_path.display());
                        report.images_augmented += 1;
                    }
                    Ok(VariantOutcome::Skipped) => {
                        debug!("Exists, skipping: {}", output_path.display());
                        report.images_skipped += 1;
                    }
                    Err(VariantError::UnreadableImage(e)) => {
                        warn!("Cannot read {}: {e}", source_path.display());
                        report.images_failed += 1;
                        continue 'sources;
                    }
                    Err(e) => {
                        warn!("Failed to create {}: {e}", output_path.display());
                        report.images_failed += 1;
                    }
                }
            }
        }

        let record = SessionRecord {
            timestamp: Utc::now(),
            method: job.method.name().to_string(),
            count_per_image: job.count_per_image,
            images_augmented: report.images_augmented,
            images_failed: report.images_failed,
            version: self.config.version.clone(),
        };
        match self.session_log.append(&job.identity, record) {
            Ok(metadata) => debug!(
                "{} now has {} augmentations over {} sessions",
                job.identity,
                metadata.total_augmentations,
                metadata.augmentation_sessions.len()
            ),
            Err(e) => warn!("Could not save session metadata for {}: {e}", job.identity),
        }

        info!(
            "Finished {}: {} created, {} skipped, {} failed{}",
            job.identity,
            report.images_augmented,
            report.images_skipped,
            report.images_failed,
            if report.cancelled { " (cancelled)" } else { "" }
        );

        Ok(report)
    }

    fn augment_variant(
        &self,
        source_path: &Path,
        source: &mut Option<RasterImage>,
        params: &TransformParameters,
        output_path: &Path,
        overwrite: bool,
    ) -> Result<VariantOutcome, VariantError> {
        if output_path.exists() && !overwrite {
            return Ok(VariantOutcome::Skipped);
        }

        let image = match source {
            Some(image) => image,
            None => {
                let decoded = read_image_any(source_path).map_err(VariantError::UnreadableImage)?;
                source.insert(decoded)
            }
        };

        let augmented = params.apply(image)?;
        write_image_jpeg(output_path, &augmented, self.config.jpeg_quality)
            .map_err(VariantError::Write)?;

        Ok(VariantOutcome::Written)
    }
}

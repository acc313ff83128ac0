//! Per-image pipeline: label lookup, parsing, policy, redaction.
//!
//! One [`RedactionJob`] correlates a source image with its label file and
//! derived output path, and lives for exactly one run of
//! [`process_image`]. All paths come from an explicit [`PipelineConfig`];
//! there is no ambient state.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::BlackoutError;
use crate::labels::{parse_labels, LABEL_EXTENSION};
use crate::policy::{PolicyDecision, RedactionPolicy, SkipReason};
use crate::redact;

/// The three directories a pipeline instance operates on.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Directory watched for new detection images.
    pub images_dir: PathBuf,

    /// Directory holding `<image_stem>.txt` label files.
    pub labels_dir: PathBuf,

    /// Directory redacted copies are written to.
    pub output_dir: PathBuf,
}

impl PipelineConfig {
    /// Checks that all three directories exist.
    ///
    /// Directory bootstrap is deliberately not performed here; a missing
    /// directory is a configuration error, not something to paper over.
    pub fn validate(&self) -> Result<(), BlackoutError> {
        for dir in [&self.images_dir, &self.labels_dir, &self.output_dir] {
            if !dir.is_dir() {
                return Err(BlackoutError::NotADirectory(dir.clone()));
            }
        }
        Ok(())
    }
}

/// One unit of work: a source image, its expected label file, and the
/// output path a redacted copy would be written to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedactionJob {
    pub image_path: PathBuf,
    pub label_path: PathBuf,
    pub output_path: PathBuf,
}

impl RedactionJob {
    /// Builds the job for an image under the given configuration.
    ///
    /// The label path is derived by stem matching: same base filename with
    /// the label extension, in the labels directory.
    pub fn for_image(config: &PipelineConfig, image_path: &Path) -> Result<Self, BlackoutError> {
        let stem = image_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| BlackoutError::NoFileName(image_path.to_path_buf()))?;

        let label_path = config
            .labels_dir
            .join(format!("{stem}.{LABEL_EXTENSION}"));
        let output_path = redact::output_path(&config.output_dir, image_path)?;

        Ok(Self {
            image_path: image_path.to_path_buf(),
            label_path,
            output_path,
        })
    }
}

/// What happened to one image.
#[derive(Clone, Debug, PartialEq)]
pub enum JobOutcome {
    /// A redacted copy was written.
    Redacted {
        output: PathBuf,
        /// Non-empty regions painted black. Zero means the gates passed but
        /// no redact-class box covered any pixels; the copy is unmodified.
        regions: usize,
    },
    /// The image was passed through without an output file.
    Skipped(SkipReason),
}

/// Runs the full pipeline for one image.
///
/// Returns `Ok(JobOutcome::Skipped(..))` for the expected pass-through
/// cases (missing label file, policy gates); `Err` only for real job
/// failures such as an unreadable image. Either way the watch loop is
/// untouched by the result.
pub fn process_image(
    config: &PipelineConfig,
    policy: &RedactionPolicy,
    image_path: &Path,
) -> Result<JobOutcome, BlackoutError> {
    let job = RedactionJob::for_image(config, image_path)?;

    // A missing label file usually means detection has not finished for
    // this image. Skip without retry; nothing re-queues it later.
    if !job.label_path.is_file() {
        warn!(
            image = %job.image_path.display(),
            label = %job.label_path.display(),
            reason = %SkipReason::NoLabelFile,
            "skipping image"
        );
        return Ok(JobOutcome::Skipped(SkipReason::NoLabelFile));
    }

    let content = fs::read_to_string(&job.label_path)?;
    let parsed = parse_labels(&content, &job.label_path);
    if parsed.skipped_lines > 0 {
        warn!(
            label = %job.label_path.display(),
            skipped = parsed.skipped_lines,
            "label file contained invalid lines"
        );
    }

    let selected = match policy.evaluate(&parsed.detections) {
        PolicyDecision::Skip(reason) => {
            info!(
                image = %job.image_path.display(),
                detections = parsed.detections.len(),
                reason = %reason,
                "skipping image"
            );
            return Ok(JobOutcome::Skipped(reason));
        }
        PolicyDecision::Redact(selected) => selected,
    };

    let regions = redact::redact_image(&job.image_path, &selected, &job.output_path)?;
    info!(
        image = %job.image_path.display(),
        output = %job.output_path.display(),
        regions,
        "redacted image saved"
    );

    Ok(JobOutcome::Redacted {
        output: job.output_path,
        regions,
    })
}

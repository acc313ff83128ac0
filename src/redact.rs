//! Image loading, rectangle fill, and output persistence.
//!
//! The redactor owns the pixel buffer for exactly one job: load, paint the
//! selected regions solid black, save under the marker-prefixed name. A
//! decode failure aborts the job and nothing is written. Output is encoded
//! to a staging file in the output directory and renamed onto the final
//! path, so a failed encode never leaves a partial `redacted_*` file.

use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage};
use tracing::debug;

use crate::error::BlackoutError;
use crate::labels::{resolve_rect, Detection, PixelRect};

/// Prefix carried by every output filename. Files already carrying it are
/// never reprocessed, so overlapping input/output directories cannot loop.
pub const OUTPUT_MARKER: &str = "redacted_";

/// Fill color for redacted regions.
const REDACTION_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// Returns true if a filename already carries the output marker.
pub fn is_redacted_name(file_name: &str) -> bool {
    file_name.contains(OUTPUT_MARKER)
}

/// Derives the output path for a source image: the original filename with
/// the marker prefix, inside `output_dir`.
pub fn output_path(output_dir: &Path, source: &Path) -> Result<PathBuf, BlackoutError> {
    let file_name = source
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| BlackoutError::NoFileName(source.to_path_buf()))?;

    Ok(output_dir.join(format!("{OUTPUT_MARKER}{file_name}")))
}

/// Loads `source`, blacks out each selected detection's resolved rectangle,
/// and writes the result to `output`. Returns the number of non-empty
/// regions painted.
///
/// The source file is never modified. Rectangles are resolved against the
/// actual decoded dimensions, so normalized and absolute-pixel detections
/// both land where the detector saw them. The encoded bytes go to a
/// staging file first and reach `output` via rename, on full success only.
pub fn redact_image(
    source: &Path,
    detections: &[&Detection],
    output: &Path,
) -> Result<usize, BlackoutError> {
    let decoded = image::open(source).map_err(|source_err| BlackoutError::ImageRead {
        path: source.to_path_buf(),
        source: source_err,
    })?;

    let mut buffer = decoded.into_rgb8();
    let (width, height) = buffer.dimensions();

    let mut painted = 0;
    for detection in detections {
        let rect = resolve_rect(detection, width, height);
        debug!(class_id = detection.class_id, ?rect, "painting region");
        if !rect.is_empty() {
            fill_rect(&mut buffer, &rect);
            painted += 1;
        }
    }

    // The format must come from the final path; the staging name carries a
    // .tmp extension the encoder cannot guess from.
    let format =
        ImageFormat::from_path(output).map_err(|source_err| BlackoutError::ImageWrite {
            path: output.to_path_buf(),
            source: source_err,
        })?;

    let staging = staging_path(output)?;
    if let Err(source_err) = buffer.save_with_format(&staging, format) {
        let _ = fs::remove_file(&staging);
        return Err(BlackoutError::ImageWrite {
            path: output.to_path_buf(),
            source: source_err,
        });
    }
    if let Err(io_err) = fs::rename(&staging, output) {
        let _ = fs::remove_file(&staging);
        return Err(BlackoutError::Io(io_err));
    }

    Ok(painted)
}

/// Staging name for an output file: dotted, `.tmp`-suffixed, same directory
/// so the final rename stays on one filesystem.
fn staging_path(output: &Path) -> Result<PathBuf, BlackoutError> {
    let file_name = output
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| BlackoutError::NoFileName(output.to_path_buf()))?;

    Ok(output.with_file_name(format!(".{file_name}.tmp")))
}

/// Overwrites every pixel in `[x1, x2) × [y1, y2)` with the redaction color.
fn fill_rect(buffer: &mut RgbImage, rect: &PixelRect) {
    for y in rect.y1..rect.y2 {
        for x in rect.x1..rect.x2 {
            buffer.put_pixel(x, y, REDACTION_COLOR);
        }
    }
}

//! Label-file parser.
//!
//! Label files are plain text, one detection per line:
//! `class_id x_center y_center width height`, whitespace separated. The
//! coordinates may be normalized fractions or absolute pixels; the parser
//! keeps them verbatim and leaves unit inference to box resolution.
//!
//! A malformed line never aborts the file: it is skipped with a warning so
//! one bad row cannot suppress the redaction of the rows around it.

use std::path::Path;

use tracing::warn;

use super::record::{Detection, DetectionSet};

/// Expected token count per label line.
const TOKENS_PER_LINE: usize = 5;

/// Parse result for one label file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedLabels {
    /// Detections in line order, malformed lines excluded.
    pub detections: DetectionSet,

    /// Number of non-blank lines discarded as malformed.
    pub skipped_lines: usize,
}

/// Parses the full content of one label file.
///
/// `source` is only used in diagnostics. Blank lines are ignored silently;
/// lines with the wrong token count or non-numeric tokens are counted in
/// [`ParsedLabels::skipped_lines`] and reported at `warn`.
pub fn parse_labels(content: &str, source: &Path) -> ParsedLabels {
    let mut parsed = ParsedLabels::default();

    for (line_idx, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match parse_label_line(trimmed) {
            Ok(detection) => parsed.detections.push(detection),
            Err(reason) => {
                parsed.skipped_lines += 1;
                warn!(
                    path = %source.display(),
                    line = line_idx + 1,
                    reason,
                    "skipping invalid label line"
                );
            }
        }
    }

    parsed
}

/// Parses a single non-blank label line into a detection.
///
/// Returns a static description of what was wrong when the line does not
/// hold exactly 5 numeric tokens.
fn parse_label_line(line: &str) -> Result<Detection, &'static str> {
    // Take one token past the limit so extra fields are detected without
    // letting a pathological line allocate unbounded memory.
    let tokens: Vec<&str> = line.split_whitespace().take(TOKENS_PER_LINE + 1).collect();

    if tokens.len() < TOKENS_PER_LINE {
        return Err("expected 5 fields");
    }
    if tokens.len() > TOKENS_PER_LINE {
        return Err("more than 5 fields");
    }

    let class_id = tokens[0]
        .parse::<u32>()
        .map_err(|_| "class id is not a non-negative integer")?;

    let mut coords = [0.0f64; 4];
    for (slot, token) in coords.iter_mut().zip(&tokens[1..]) {
        *slot = token.parse::<f64>().map_err(|_| "non-numeric coordinate")?;
        if !slot.is_finite() {
            return Err("non-finite coordinate");
        }
    }

    Ok(Detection::new(
        class_id, coords[0], coords[1], coords[2], coords[3],
    ))
}

//! Detection records and the label-file contract.
//!
//! This module owns the input side of the pipeline: the [`Detection`] model,
//! the text parser that turns one label file into a [`DetectionSet`], and
//! the resolver that maps a detection onto a clamped pixel rectangle.
//!
//! # Design principles
//!
//! 1. **Permissive parsing**: a malformed line is a skipped line, never a
//!    failed file. The upstream detector is not trusted to write perfect
//!    output.
//!
//! 2. **Per-detection units**: normalized vs. absolute-pixel coordinates are
//!    inferred for each detection individually, so mixed-unit label files
//!    resolve correctly.
//!
//! 3. **Clamped rectangles**: a [`PixelRect`] is always inside the image it
//!    was resolved against, whatever the label said.

mod parse;
mod record;
mod rect;

pub use parse::{parse_labels, ParsedLabels};
pub use record::{Detection, DetectionSet};
pub use rect::{resolve_rect, PixelRect, Units};

/// File extension of label files, without the dot.
pub const LABEL_EXTENSION: &str = "txt";

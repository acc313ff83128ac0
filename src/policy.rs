//! Redaction policy: whether an image is redacted, and which boxes.
//!
//! The policy separates two class families on purpose. *Trigger* classes
//! signal that sensitive content is present somewhere in the image and
//! authorize redaction; *redact* classes name the regions that actually get
//! blacked out. A trigger detection is evidence, not a target, and the two
//! sets must not be conflated.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::BlackoutError;
use crate::labels::{Detection, DetectionSet};

/// Why an image was passed through without redaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// No label file exists for the image (yet).
    NoLabelFile,
    /// Fewer valid detections than the policy minimum.
    TooFewDetections,
    /// No detection carries a trigger class.
    NoTriggerClass,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            SkipReason::NoLabelFile => "no_label_file",
            SkipReason::TooFewDetections => "too_few_detections",
            SkipReason::NoTriggerClass => "no_trigger_class",
        };
        f.write_str(code)
    }
}

/// Outcome of evaluating a detection set against the policy.
#[derive(Clone, Debug, PartialEq)]
pub enum PolicyDecision<'a> {
    /// Redaction proceeds; the listed detections (label-file order) are the
    /// regions to black out. The list may be empty: triggers can be present
    /// with no redact-class box, in which case the output is a plain copy.
    Redact(Vec<&'a Detection>),
    /// Redaction is skipped for the whole image.
    Skip(SkipReason),
}

/// Class-based gating and selection rules for one pipeline instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RedactionPolicy {
    /// Minimum detections (of any class) before redaction is considered.
    pub min_detections: usize,

    /// Class ids whose presence authorizes redaction of the image.
    pub trigger_classes: BTreeSet<u32>,

    /// Class ids whose boxes are blacked out when redaction proceeds.
    pub redact_classes: BTreeSet<u32>,
}

impl Default for RedactionPolicy {
    fn default() -> Self {
        Self {
            min_detections: 2,
            trigger_classes: BTreeSet::from([2, 3]),
            redact_classes: BTreeSet::from([0, 1]),
        }
    }
}

impl RedactionPolicy {
    /// Loads a policy from a TOML file.
    ///
    /// Missing keys fall back to the defaults, so a file may override only
    /// the class sets, or only the minimum count.
    pub fn from_toml_file(path: &Path) -> Result<Self, BlackoutError> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|source| BlackoutError::PolicyParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Evaluates the detections for one image.
    ///
    /// Gate 1: at least [`min_detections`](Self::min_detections) entries.
    /// Gate 2: at least one trigger-class detection. Both gates look at the
    /// full set; the returned selection then keeps only redact-class
    /// detections, original order preserved.
    pub fn evaluate<'a>(&self, detections: &'a DetectionSet) -> PolicyDecision<'a> {
        if detections.len() < self.min_detections {
            return PolicyDecision::Skip(SkipReason::TooFewDetections);
        }

        if !detections.contains_class(&self.trigger_classes) {
            return PolicyDecision::Skip(SkipReason::NoTriggerClass);
        }

        let selected = detections
            .iter()
            .filter(|detection| self.redact_classes.contains(&detection.class_id))
            .collect();

        PolicyDecision::Redact(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::Detection;

    fn set_of(records: &[Detection]) -> DetectionSet {
        records.iter().copied().collect()
    }

    #[test]
    fn too_few_detections_skips_the_image() {
        let policy = RedactionPolicy::default();
        let single = set_of(&[Detection::new(2, 0.5, 0.5, 0.2, 0.2)]);

        assert_eq!(
            policy.evaluate(&single),
            PolicyDecision::Skip(SkipReason::TooFewDetections)
        );
        assert_eq!(
            policy.evaluate(&DetectionSet::new()),
            PolicyDecision::Skip(SkipReason::TooFewDetections)
        );
    }

    #[test]
    fn missing_trigger_class_skips_even_when_count_passes() {
        let policy = RedactionPolicy::default();
        let no_trigger = set_of(&[
            Detection::new(1, 0.5, 0.5, 0.2, 0.2),
            Detection::new(1, 0.3, 0.3, 0.1, 0.1),
        ]);

        assert_eq!(
            policy.evaluate(&no_trigger),
            PolicyDecision::Skip(SkipReason::NoTriggerClass)
        );
    }

    #[test]
    fn selects_only_redact_classes_in_original_order() {
        let policy = RedactionPolicy::default();
        let mixed = set_of(&[
            Detection::new(2, 0.5, 0.5, 0.2, 0.2),
            Detection::new(0, 0.1, 0.1, 0.05, 0.05),
            Detection::new(3, 0.9, 0.9, 0.1, 0.1),
            Detection::new(1, 0.7, 0.7, 0.05, 0.05),
        ]);

        match policy.evaluate(&mixed) {
            PolicyDecision::Redact(selected) => {
                let ids: Vec<u32> = selected.iter().map(|d| d.class_id).collect();
                assert_eq!(ids, vec![0, 1]);
            }
            other => panic!("expected redaction, got {:?}", other),
        }
    }

    #[test]
    fn triggers_without_redact_boxes_yield_empty_selection() {
        let policy = RedactionPolicy::default();
        let triggers_only = set_of(&[
            Detection::new(2, 0.5, 0.5, 0.2, 0.2),
            Detection::new(3, 0.3, 0.3, 0.1, 0.1),
        ]);

        assert_eq!(
            policy.evaluate(&triggers_only),
            PolicyDecision::Redact(vec![])
        );
    }

    #[test]
    fn default_policy_matches_documented_class_families() {
        let policy = RedactionPolicy::default();
        assert_eq!(policy.min_detections, 2);
        assert_eq!(policy.trigger_classes, BTreeSet::from([2, 3]));
        assert_eq!(policy.redact_classes, BTreeSet::from([0, 1]));
    }

    #[test]
    fn policy_file_overrides_merge_with_defaults() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("policy.toml");
        std::fs::write(&path, "min_detections = 1\ntrigger_classes = [7]\n")
            .expect("write policy file");

        let policy = RedactionPolicy::from_toml_file(&path).expect("load policy");
        assert_eq!(policy.min_detections, 1);
        assert_eq!(policy.trigger_classes, BTreeSet::from([7]));
        // Unset key keeps its default.
        assert_eq!(policy.redact_classes, BTreeSet::from([0, 1]));
    }

    #[test]
    fn unknown_policy_keys_are_rejected() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("policy.toml");
        std::fs::write(&path, "min_detection = 1\n").expect("write policy file");

        let err = RedactionPolicy::from_toml_file(&path).unwrap_err();
        assert!(matches!(err, BlackoutError::PolicyParse { .. }));
    }
}

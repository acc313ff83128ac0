//! Core detection records produced by the label parser.

/// One object reported by the upstream detector for a single image.
///
/// The center/size fields keep whatever units the label file used:
/// normalized fractions in `[0, 1]` or absolute pixels. Unit inference
/// happens per detection when the box is resolved to pixel space, so a
/// `Detection` never claims a coordinate convention it cannot prove.
///
/// Note: this type does NOT reject out-of-range values in the constructor.
/// Malformed-but-numeric boxes are allowed to exist; clamping at resolve
/// time keeps them harmless rather than making them unrepresentable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    /// Class id assigned by the detector.
    pub class_id: u32,

    /// Box center, x axis.
    pub x_center: f64,

    /// Box center, y axis.
    pub y_center: f64,

    /// Box width.
    pub width: f64,

    /// Box height.
    pub height: f64,
}

impl Detection {
    /// Creates a new detection record.
    #[inline]
    pub fn new(class_id: u32, x_center: f64, y_center: f64, width: f64, height: f64) -> Self {
        Self {
            class_id,
            x_center,
            y_center,
            width,
            height,
        }
    }
}

/// The ordered detections for one image, in label-file line order.
///
/// Owned transiently by a single pipeline run and discarded afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectionSet {
    records: Vec<Detection>,
}

impl DetectionSet {
    /// Creates an empty detection set.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a detection, preserving insertion order.
    #[inline]
    pub fn push(&mut self, detection: Detection) {
        self.records.push(detection);
    }

    /// Number of detections in the set.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the set holds no detections.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates the detections in line order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Detection> {
        self.records.iter()
    }

    /// The detections as a slice, in line order.
    #[inline]
    pub fn as_slice(&self) -> &[Detection] {
        &self.records
    }

    /// Returns true if any detection carries one of the given class ids.
    pub fn contains_class<'a, I>(&self, classes: I) -> bool
    where
        I: IntoIterator<Item = &'a u32>,
    {
        let classes: Vec<u32> = classes.into_iter().copied().collect();
        self.records
            .iter()
            .any(|record| classes.contains(&record.class_id))
    }
}

impl FromIterator<Detection> for DetectionSet {
    fn from_iter<I: IntoIterator<Item = Detection>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DetectionSet {
    type Item = &'a Detection;
    type IntoIter = std::slice::Iter<'a, Detection>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_preserves_insertion_order() {
        let mut set = DetectionSet::new();
        set.push(Detection::new(2, 0.5, 0.5, 0.2, 0.2));
        set.push(Detection::new(0, 0.1, 0.1, 0.05, 0.05));

        let ids: Vec<u32> = set.iter().map(|d| d.class_id).collect();
        assert_eq!(ids, vec![2, 0]);
    }

    #[test]
    fn contains_class_matches_any_listed_id() {
        let set: DetectionSet = [
            Detection::new(1, 0.5, 0.5, 0.2, 0.2),
            Detection::new(3, 0.4, 0.4, 0.1, 0.1),
        ]
        .into_iter()
        .collect();

        assert!(set.contains_class(&[2, 3]));
        assert!(!set.contains_class(&[5]));
        assert!(!DetectionSet::new().contains_class(&[1]));
    }
}

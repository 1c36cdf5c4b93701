use crate::types::Label;

/// Position of one global row or column inside a partitioned axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coord {
    pub partition: usize,
    pub offset: usize,
}

/// Ordered mapping from global label to (partition, offset) along one axis.
///
/// Built once per repartitioning event from the per-partition lengths and
/// immutable afterward. A selection over an existing frame (reordering,
/// repeating, or narrowing) is itself a frame, built with [`select`].
///
/// [`select`]: CoordinateFrame::select
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateFrame {
    labels: Vec<Label>,
    coords: Vec<Coord>,
}

impl CoordinateFrame {
    /// Build a frame from per-partition lengths.
    ///
    /// Zero-length partitions are dropped; remaining partition `i` of
    /// length `l` contributes the run `(i, 0), .., (i, l - 1)` in partition
    /// order. All-zero lengths produce an empty frame.
    pub fn from_lengths(lengths: &[usize], labels: Vec<Label>) -> Self {
        let coords: Vec<Coord> = lengths
            .iter()
            .filter(|&&l| l > 0)
            .enumerate()
            .flat_map(|(partition, &l)| (0..l).map(move |offset| Coord { partition, offset }))
            .collect();
        if coords.is_empty() {
            return CoordinateFrame::default();
        }
        assert_eq!(
            labels.len(),
            coords.len(),
            "label count must match total partition length"
        );
        CoordinateFrame { labels, coords }
    }

    /// Number of global positions covered by the frame.
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Resolve a global label to its coordinate (first occurrence).
    pub fn get(&self, label: &Label) -> Option<Coord> {
        let pos = self.labels.iter().position(|l| l == label)?;
        Some(self.coords[pos])
    }

    pub fn coord_at(&self, pos: usize) -> Coord {
        self.coords[pos]
    }

    pub fn label_at(&self, pos: usize) -> &Label {
        &self.labels[pos]
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Label, Coord)> {
        self.labels.iter().zip(self.coords.iter().copied())
    }

    /// A new frame over the given labels, in the given order, with
    /// repetitions allowed. `None` if any label is absent.
    pub fn select(&self, labels: &[Label]) -> Option<CoordinateFrame> {
        let coords = labels
            .iter()
            .map(|l| self.get(l))
            .collect::<Option<Vec<_>>>()?;
        Some(CoordinateFrame {
            labels: labels.to_vec(),
            coords,
        })
    }

    /// Largest partition index referenced, if any.
    pub fn max_partition(&self) -> Option<usize> {
        self.coords.iter().map(|c| c.partition).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_lengths_enumerates_runs() {
        let frame = CoordinateFrame::from_lengths(&[2, 0, 3], Label::range(5));
        assert_eq!(frame.len(), 5);
        // The zero-length partition is dropped before enumeration.
        assert_eq!(frame.coord_at(0), Coord { partition: 0, offset: 0 });
        assert_eq!(frame.coord_at(2), Coord { partition: 1, offset: 0 });
        assert_eq!(frame.coord_at(4), Coord { partition: 1, offset: 2 });
    }

    #[test]
    fn all_zero_lengths_is_empty() {
        let frame = CoordinateFrame::from_lengths(&[0, 0], vec![]);
        assert!(frame.is_empty());
    }

    #[test]
    fn lookup_by_label() {
        let frame =
            CoordinateFrame::from_lengths(&[2, 1], vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(frame.get(&"c".into()), Some(Coord { partition: 1, offset: 0 }));
        assert_eq!(frame.get(&"z".into()), None);
    }

    #[test]
    fn select_reorders_and_repeats() {
        let frame =
            CoordinateFrame::from_lengths(&[2, 1], vec!["a".into(), "b".into(), "c".into()]);
        let sel = frame
            .select(&["c".into(), "a".into(), "a".into()])
            .unwrap();
        assert_eq!(sel.len(), 3);
        assert_eq!(sel.coord_at(0), Coord { partition: 1, offset: 0 });
        assert_eq!(sel.coord_at(1), Coord { partition: 0, offset: 0 });
        assert_eq!(sel.coord_at(2), Coord { partition: 0, offset: 0 });
        assert!(frame.select(&["z".into()]).is_none());
    }
}

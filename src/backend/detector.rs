use super::types::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Changed,
    Unchanged,
}

impl Change {
    pub fn is_changed(self) -> bool {
        self == Self::Changed
    }
}

/// Compares a fresh snapshot against the last one seen for the same
/// subscription. Any difference in length, order or content is a change, and
/// so is the first snapshot ever seen. Empty snapshots get no special case.
pub fn detect(new: &Snapshot, last: Option<&Snapshot>) -> Change {
    match last {
        Some(last) if last == new => Change::Unchanged,
        _ => Change::Changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::types::Post;

    fn snapshot(ids: &[u32]) -> Snapshot {
        ids.iter()
            .map(|id| Post::new(format!("post {id}"), format!("https://example.com/{id}")))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn same_snapshot_is_unchanged() {
        for s in [snapshot(&[]), snapshot(&[1]), snapshot(&[1, 2, 3])] {
            assert_eq!(detect(&s, Some(&s.clone())), Change::Unchanged);
        }
    }

    #[test]
    fn first_poll_is_changed() {
        assert_eq!(detect(&snapshot(&[1]), None), Change::Changed);
        assert_eq!(detect(&snapshot(&[]), None), Change::Changed);
    }

    #[test]
    fn differences_are_changed() {
        // length
        assert!(detect(&snapshot(&[1, 2]), Some(&snapshot(&[1]))).is_changed());
        // order
        assert!(detect(&snapshot(&[2, 1]), Some(&snapshot(&[1, 2]))).is_changed());
        // element
        assert!(detect(&snapshot(&[3]), Some(&snapshot(&[1]))).is_changed());
        // emptied
        assert!(detect(&snapshot(&[]), Some(&snapshot(&[1]))).is_changed());
    }

    #[test]
    fn title_edit_is_changed() {
        let last = Snapshot::new(vec![Post::new("a", "https://example.com/1")]);
        let new = Snapshot::new(vec![Post::new("b", "https://example.com/1")]);
        assert!(detect(&new, Some(&last)).is_changed());
    }
}

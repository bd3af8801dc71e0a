use chrono::{DateTime, Utc};

/// Closed time window `[start, end]` with `start < end`.
///
/// Two windows overlap when neither ends strictly before the other begins,
/// so windows that touch at a single instant conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    /// Returns `None` unless `start` is strictly before `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 1, hour, minute, 0).unwrap()
    }

    fn window(from: (u32, u32), to: (u32, u32)) -> Interval {
        Interval::new(at(from.0, from.1), at(to.0, to.1)).unwrap()
    }

    #[test]
    fn rejects_empty_and_inverted_windows() {
        assert!(Interval::new(at(10, 0), at(10, 0)).is_none());
        assert!(Interval::new(at(12, 0), at(10, 0)).is_none());
        assert_eq!(window((10, 0), (12, 30)).duration().num_minutes(), 150);
    }

    #[test]
    fn touching_endpoints_overlap() {
        let feature = window((10, 0), (12, 30));
        assert!(feature.overlaps(&window((12, 30), (13, 0))));
        assert!(window((9, 0), (10, 0)).overlaps(&feature));
    }

    #[test]
    fn disjoint_windows_do_not_overlap() {
        let feature = window((10, 0), (12, 30));
        assert!(!feature.overlaps(&window((12, 31), (13, 0))));
        assert!(!window((8, 0), (9, 59)).overlaps(&feature));
    }

    #[test]
    fn containment_overlaps_both_ways() {
        let outer = window((10, 0), (14, 0));
        let inner = window((11, 0), (12, 0));
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
        assert!(outer.overlaps(&outer));
    }
}

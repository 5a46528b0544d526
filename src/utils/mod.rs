use chrono::NaiveDate;
use std::time::Instant;
use tracing::info;

/// A simple wall-clock timer for logging elapsed time.
pub struct Timer {
    label: String,
    start: Instant,
}

impl Timer {
    pub fn start(label: impl Into<String>) -> Self {
        let label = label.into();
        info!("⏱  Starting: {}", label);
        Self {
            label,
            start: Instant::now(),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        info!(
            "⏱  Finished: {} (took {:.2?})",
            self.label,
            self.start.elapsed()
        );
    }
}

/// Format a large integer with thousands separators.
pub fn fmt_number(n: i64) -> String {
    let s = n.abs().to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    if n < 0 {
        result.push('-');
    }
    result.chars().rev().collect()
}

// ── Date range ────────────────────────────────────────────────────────────────

/// Inclusive range of calendar days, iterated in ascending order.
///
/// `Copy`, so the same range can be walked any number of times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn len(&self) -> usize {
        if self.start > self.end {
            0
        } else {
            self.end.signed_duration_since(self.start).num_days() as usize + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> Days {
        Days {
            next: Some(self.start),
            end: self.end,
        }
    }
}

impl IntoIterator for DateRange {
    type Item = NaiveDate;
    type IntoIter = Days;

    fn into_iter(self) -> Days {
        self.iter()
    }
}

/// Iterator over the days of a [`DateRange`].
#[derive(Debug, Clone)]
pub struct Days {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for Days {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next.filter(|d| *d <= self.end)?;
        self.next = current.succ_opt();
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_fmt_number() {
        assert_eq!(fmt_number(1_234_567), "1,234,567");
        assert_eq!(fmt_number(0), "0");
        assert_eq!(fmt_number(-42_000), "-42,000");
        assert_eq!(fmt_number(999), "999");
    }

    #[test]
    fn test_range_is_inclusive() {
        let range = DateRange::new(d(2024, 2, 1), d(2024, 2, 3));
        let days: Vec<_> = range.iter().collect();
        assert_eq!(days, vec![d(2024, 2, 1), d(2024, 2, 2), d(2024, 2, 3)]);
        assert_eq!(range.len(), 3);
    }

    #[test]
    fn test_single_day_range() {
        let range = DateRange::new(d(2024, 2, 19), d(2024, 2, 19));
        assert_eq!(range.iter().collect::<Vec<_>>(), vec![d(2024, 2, 19)]);
        assert_eq!(range.len(), 1);
    }

    #[test]
    fn test_reversed_range_is_empty() {
        let range = DateRange::new(d(2024, 2, 3), d(2024, 2, 1));
        assert!(range.is_empty());
        assert_eq!(range.iter().count(), 0);
    }

    #[test]
    fn test_range_crosses_leap_day() {
        let days: Vec<_> = DateRange::new(d(2024, 2, 28), d(2024, 3, 1))
            .into_iter()
            .collect();
        assert_eq!(days, vec![d(2024, 2, 28), d(2024, 2, 29), d(2024, 3, 1)]);
    }

    #[test]
    fn test_range_can_be_walked_twice() {
        let range = DateRange::new(d(2024, 2, 1), d(2024, 2, 19));
        assert_eq!(range.iter().count(), 19);
        assert_eq!(range.iter().count(), 19);
        assert_eq!(range.iter().last(), Some(d(2024, 2, 19)));
    }
}

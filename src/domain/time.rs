// Copyright (c) 2025 - Cowboy AI, Inc.
//! Time Value Objects
//!
//! Exam placement is expressed in local calendar dates and wall-clock times;
//! timestamps on events are UTC. Overlap checks treat time intervals as
//! half-open `[start, end)` so back-to-back exams do not conflict.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{DomainError, DomainResult};

/// Inclusive date range of one examination session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ExamPeriod {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> DomainResult<Self> {
        if start_date >= end_date {
            return Err(DomainError::InvalidPeriod(format!(
                "start date {} must be before end date {}",
                start_date, end_date
            )));
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// True when `date` falls within the period, boundaries included
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

impl fmt::Display for ExamPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start_date, self.end_date)
    }
}

/// Date plus half-open `[start, end)` time interval of one exam
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl TimeSlot {
    pub fn new(date: NaiveDate, start_time: NaiveTime, end_time: NaiveTime) -> DomainResult<Self> {
        if start_time >= end_time {
            return Err(DomainError::InvalidTimeSlot(format!(
                "start time {} must be before end time {}",
                start_time, end_time
            )));
        }
        Ok(Self {
            date,
            start_time,
            end_time,
        })
    }

    /// True when both slots are on the same date and their half-open
    /// intervals intersect
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.date == other.date
            && self.start_time < other.end_time
            && other.start_time < self.end_time
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.date,
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_exam_period_validation() {
        assert!(ExamPeriod::new(date(2025, 1, 15), date(2025, 1, 30)).is_ok());
        assert!(ExamPeriod::new(date(2025, 1, 30), date(2025, 1, 15)).is_err());
        assert!(ExamPeriod::new(date(2025, 1, 15), date(2025, 1, 15)).is_err());
    }

    #[test]
    fn test_exam_period_contains_boundaries() {
        let period = ExamPeriod::new(date(2025, 1, 15), date(2025, 1, 30)).unwrap();

        assert!(period.contains(date(2025, 1, 15)));
        assert!(period.contains(date(2025, 1, 30)));
        assert!(period.contains(date(2025, 1, 20)));
        assert!(!period.contains(date(2025, 1, 14)));
        assert!(!period.contains(date(2025, 1, 31)));
        assert_eq!(period.days(), 16);
    }

    #[test]
    fn test_time_slot_validation() {
        assert!(TimeSlot::new(date(2025, 1, 16), time(9, 0), time(11, 0)).is_ok());
        assert!(TimeSlot::new(date(2025, 1, 16), time(11, 0), time(9, 0)).is_err());
        assert!(TimeSlot::new(date(2025, 1, 16), time(9, 0), time(9, 0)).is_err());
    }

    #[test]
    fn test_time_slot_overlap() {
        let a = TimeSlot::new(date(2025, 1, 16), time(9, 0), time(11, 0)).unwrap();
        let b = TimeSlot::new(date(2025, 1, 16), time(9, 30), time(11, 30)).unwrap();
        let c = TimeSlot::new(date(2025, 1, 16), time(11, 0), time(13, 0)).unwrap();
        let d = TimeSlot::new(date(2025, 1, 17), time(9, 0), time(11, 0)).unwrap();

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));

        // Back-to-back slots share a boundary instant but do not overlap
        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&a));

        // Different dates never overlap
        assert!(!a.overlaps(&d));
    }

    #[test]
    fn test_time_slot_duration() {
        let slot = TimeSlot::new(date(2025, 1, 16), time(9, 0), time(11, 30)).unwrap();
        assert_eq!(slot.duration_minutes(), 150);
    }
}

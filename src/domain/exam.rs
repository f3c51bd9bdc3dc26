// Copyright (c) 2025 - Cowboy AI, Inc.
//! Scheduled Exam Entity and Related Value Objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::ids::{CourseId, ProfessorId, RoomId, ScheduledExamId};
use super::time::TimeSlot;

/// Whether a course's exam is mandatory for enrolled students
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MandatoryStatus {
    Mandatory,
    Optional,
}

impl fmt::Display for MandatoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MandatoryStatus::Mandatory => write!(f, "mandatory"),
            MandatoryStatus::Optional => write!(f, "optional"),
        }
    }
}

/// Room assigned to an exam, with its seating capacity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomAssignment {
    pub room_id: RoomId,
    pub room_name: String,
    pub capacity: u32,
}

/// One exam placed inside a schedule
///
/// Professors are kept in an ordered set so analysis over the exam list is
/// deterministic regardless of insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledExam {
    /// Identifier unique within the owning schedule
    pub scheduled_exam_id: ScheduledExamId,

    /// Examined course
    pub course_id: CourseId,

    /// Course display name at placement time
    pub course_name: String,

    /// Date and time of the examination
    pub slot: TimeSlot,

    /// Assigned room, absent until space allocation
    pub room: Option<RoomAssignment>,

    /// Enrolled students expected to sit the exam
    pub student_count: u32,

    /// Whether the exam is mandatory
    pub mandatory_status: MandatoryStatus,

    /// Professors supervising the exam
    pub professor_ids: BTreeSet<ProfessorId>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScheduledExam {
    pub fn is_mandatory(&self) -> bool {
        self.mandatory_status == MandatoryStatus::Mandatory
    }

    /// True when both exams share at least one supervising professor
    pub fn shares_professor_with(&self, other: &ScheduledExam) -> bool {
        self.professor_ids
            .intersection(&other.professor_ids)
            .next()
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, TimeZone};

    fn exam(id: &str, professors: &[&str]) -> ScheduledExam {
        let slot = TimeSlot::new(
            NaiveDate::from_ymd_opt(2025, 1, 16).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
        )
        .unwrap();
        let now = Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap();

        ScheduledExam {
            scheduled_exam_id: ScheduledExamId::new(id).unwrap(),
            course_id: CourseId::new("CS101").unwrap(),
            course_name: "Introduction to Computer Science".to_string(),
            slot,
            room: None,
            student_count: 50,
            mandatory_status: MandatoryStatus::Mandatory,
            professor_ids: professors
                .iter()
                .map(|p| ProfessorId::new(*p).unwrap())
                .collect(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_shares_professor_with() {
        let a = exam("EXAM-1", &["prof-a", "prof-b"]);
        let b = exam("EXAM-2", &["prof-b", "prof-c"]);
        let c = exam("EXAM-3", &["prof-d"]);

        assert!(a.shares_professor_with(&b));
        assert!(!a.shares_professor_with(&c));
    }

    #[test]
    fn test_mandatory_flag() {
        let a = exam("EXAM-1", &["prof-a"]);
        assert!(a.is_mandatory());
    }
}

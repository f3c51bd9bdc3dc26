// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for the Scheduling Core
//!
//! Deterministic builders for the integration suites. All identifiers and
//! timestamps are fixed constants so test runs are reproducible; fixtures
//! are the only place that constructs commands and exams, tests compose
//! them.
#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::collections::BTreeSet;
use uuid::Uuid;

use examsched_core::aggregate::commands::*;
use examsched_core::domain::{
    AcademicYear, AdjustmentId, AdjustmentType, CommentId, CommentType, CourseId, ExamPeriod,
    ExamSession, ExamSessionPeriodId, MandatoryStatus, ProfessorId, RoomAssignment, RoomId,
    ScheduledExam, ScheduledExamId, TimeSlot,
};

pub const CORRELATION_ID: &str = "01943a2b-c001-7000-8000-00000000c001";

/// Fixed command timestamp; handlers never read the clock themselves
pub fn test_timestamp() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-11-01T09:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

pub fn correlation_id() -> Uuid {
    Uuid::parse_str(CORRELATION_ID).unwrap()
}

/// Exam period for the 2026 winter session
pub fn winter_period() -> ExamPeriod {
    ExamPeriod::new(
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        NaiveDate::from_ymd_opt(2026, 2, 15).unwrap(),
    )
    .unwrap()
}

/// A date inside [`winter_period`]
pub fn exam_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 20).unwrap()
}

pub fn slot(date: NaiveDate, start_h: u32, end_h: u32) -> TimeSlot {
    TimeSlot::new(
        date,
        NaiveTime::from_hms_opt(start_h, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(end_h, 0, 0).unwrap(),
    )
    .unwrap()
}

pub fn room(id: &str, capacity: u32) -> RoomAssignment {
    RoomAssignment {
        room_id: RoomId::new(id).unwrap(),
        room_name: format!("Amphitheater {id}"),
        capacity,
    }
}

pub fn create_schedule_command() -> CreateScheduleCommand {
    CreateScheduleCommand {
        exam_session_period_id: ExamSessionPeriodId::new("2025-2026-winter").unwrap(),
        academic_year: AcademicYear::new("2025-2026").unwrap(),
        exam_session: ExamSession::Winter,
        period: winter_period(),
        timestamp: test_timestamp(),
        correlation_id: correlation_id(),
    }
}

pub fn complete_preferences_command(preference_count: u32) -> CompletePreferenceCollectionCommand {
    CompletePreferenceCollectionCommand {
        preference_count,
        timestamp: test_timestamp(),
        correlation_id: correlation_id(),
        causation_id: None,
    }
}

pub fn trigger_generation_command(triggered_by: &str) -> TriggerGenerationCommand {
    TriggerGenerationCommand {
        triggered_by: triggered_by.to_string(),
        timestamp: test_timestamp(),
        correlation_id: correlation_id(),
        causation_id: None,
    }
}

/// An exam builder with sensible defaults
pub fn exam(
    id: &str,
    course: &str,
    date: NaiveDate,
    start_h: u32,
    end_h: u32,
    student_count: u32,
) -> ScheduledExam {
    ScheduledExam {
        scheduled_exam_id: ScheduledExamId::new(id).unwrap(),
        course_id: CourseId::new(course).unwrap(),
        course_name: format!("{course} Lecture Course"),
        slot: slot(date, start_h, end_h),
        room: Some(room("A-101", 200)),
        student_count,
        mandatory_status: MandatoryStatus::Mandatory,
        professor_ids: BTreeSet::from([ProfessorId::new(format!("prof-{course}")).unwrap()]),
        created_at: test_timestamp(),
        updated_at: test_timestamp(),
    }
}

/// CS101, 50 students, 09:00-11:00 on [`exam_date`]
pub fn cs101() -> ScheduledExam {
    exam("exam-cs101", "CS101", exam_date(), 9, 11, 50)
}

/// MATH201, 30 students, 10:00-12:00 on [`exam_date`] — overlaps [`cs101`]
pub fn math201() -> ScheduledExam {
    let mut e = exam("exam-math201", "MATH201", exam_date(), 10, 12, 30);
    e.room = Some(room("B-204", 120));
    e
}

/// PHYS110, 40 students, afternoon slot — conflicts with nothing
pub fn phys110() -> ScheduledExam {
    let mut e = exam("exam-phys110", "PHYS110", exam_date(), 14, 16, 40);
    e.room = Some(room("C-310", 80));
    e
}

pub fn apply_generated_schedule_command(exams: Vec<ScheduledExam>) -> ApplyGeneratedScheduleCommand {
    ApplyGeneratedScheduleCommand {
        exams,
        quality_score: 0.87,
        preference_satisfaction_rate: 0.8,
        room_utilization_rate: 0.65,
        constraint_violations: Vec::new(),
        solver_elapsed_ms: 4_200,
        solver_iterations: 120_000,
        timestamp: test_timestamp(),
        correlation_id: correlation_id(),
        causation_id: None,
    }
}

pub fn generation_failure_command(reason: &str, failed_step: &str) -> HandleGenerationFailureCommand {
    HandleGenerationFailureCommand {
        reason: reason.to_string(),
        failed_step: failed_step.to_string(),
        timestamp: test_timestamp(),
        correlation_id: correlation_id(),
        causation_id: None,
    }
}

pub fn add_exam_command(exam: &ScheduledExam) -> AddExamCommand {
    AddExamCommand {
        scheduled_exam_id: exam.scheduled_exam_id.clone(),
        course_id: exam.course_id.clone(),
        course_name: exam.course_name.clone(),
        slot: exam.slot.clone(),
        room: exam.room.clone(),
        student_count: exam.student_count,
        mandatory_status: exam.mandatory_status,
        professor_ids: exam.professor_ids.clone(),
        timestamp: test_timestamp(),
        correlation_id: correlation_id(),
        causation_id: None,
    }
}

pub fn publish_for_review_command() -> PublishForReviewCommand {
    PublishForReviewCommand {
        timestamp: test_timestamp(),
        correlation_id: correlation_id(),
        causation_id: None,
    }
}

pub fn submit_feedback_command(comment_id: &str, professor: &str) -> SubmitFeedbackCommand {
    SubmitFeedbackCommand {
        comment_id: CommentId::new(comment_id).unwrap(),
        professor_id: ProfessorId::new(professor).unwrap(),
        scheduled_exam_id: Some(ScheduledExamId::new("exam-cs101").unwrap()),
        comment_text: "Please move this exam out of the morning block".to_string(),
        comment_type: CommentType::TimeChangeRequest,
        timestamp: test_timestamp(),
        correlation_id: correlation_id(),
        causation_id: None,
    }
}

pub fn request_adjustment_command(adjustment_id: &str, comment_id: Option<&str>) -> RequestAdjustmentCommand {
    RequestAdjustmentCommand {
        adjustment_id: AdjustmentId::new(adjustment_id).unwrap(),
        comment_id: comment_id.map(|c| CommentId::new(c).unwrap()),
        scheduled_exam_id: Some(ScheduledExamId::new("exam-cs101").unwrap()),
        adjustment_type: AdjustmentType::TimeChange,
        description: "Move CS101 to the afternoon".to_string(),
        requested_by: "planner-1".to_string(),
        reason: Some("professor availability".to_string()),
        old_values: None,
        new_values: None,
        timestamp: test_timestamp(),
        correlation_id: correlation_id(),
        causation_id: None,
    }
}

pub fn approve_adjustment_command(adjustment_id: &str) -> ApproveAdjustmentCommand {
    ApproveAdjustmentCommand {
        adjustment_id: AdjustmentId::new(adjustment_id).unwrap(),
        approved_by: "admin-1".to_string(),
        reason: None,
        timestamp: test_timestamp(),
        correlation_id: correlation_id(),
        causation_id: None,
    }
}

pub fn reject_adjustment_command(adjustment_id: &str) -> RejectAdjustmentCommand {
    RejectAdjustmentCommand {
        adjustment_id: AdjustmentId::new(adjustment_id).unwrap(),
        rejected_by: "admin-1".to_string(),
        reason: "Conflicts with accreditation visit".to_string(),
        timestamp: test_timestamp(),
        correlation_id: correlation_id(),
        causation_id: None,
    }
}

pub fn finalize_command() -> FinalizeCommand {
    FinalizeCommand {
        finalized_by: "planner-1".to_string(),
        timestamp: test_timestamp(),
        correlation_id: correlation_id(),
        causation_id: None,
    }
}

pub fn publish_final_command() -> PublishFinalCommand {
    PublishFinalCommand {
        published_by: "admin-1".to_string(),
        timestamp: test_timestamp(),
        correlation_id: correlation_id(),
        causation_id: None,
    }
}

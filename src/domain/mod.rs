// Copyright (c) 2025 - Cowboy AI, Inc.
//! Exam Scheduling Domain Model
//!
//! Core domain concepts for exam-session scheduling: typed identifiers,
//! validated value objects, and the entities owned by the schedule aggregate.
//!
//! # Value Objects with Invariants
//!
//! - [`ExamPeriod`] - inclusive date range with `start_date < end_date`
//! - [`TimeSlot`] - date plus half-open `[start, end)` time interval
//! - [`AcademicYear`] - consecutive year pair such as `2024-2025`
//! - [`RoomAssignment`] - room reference with seating capacity
//!
//! # Entities Owned by the Aggregate
//!
//! - [`ScheduledExam`] - one placed exam inside a schedule
//! - [`ProfessorComment`] - reviewer feedback with a review lifecycle
//! - [`AdjustmentLog`] - requested change with an approval lifecycle
//!
//! Entities are created and mutated only through aggregate commands; the
//! read side never edits them directly.

pub mod exam;
pub mod ids;
pub mod review;
pub mod session;
pub mod time;

pub use exam::{MandatoryStatus, RoomAssignment, ScheduledExam};
pub use ids::{
    AdjustmentId, CommentId, CourseId, ExamSessionPeriodId, ProfessorId, RoomId, ScheduleId,
    ScheduledExamId,
};
pub use review::{
    AdjustmentLog, AdjustmentStatus, AdjustmentType, CommentStatus, CommentType, ProfessorComment,
};
pub use session::{AcademicYear, ExamSession};
pub use time::{ExamPeriod, TimeSlot};

use thiserror::Error;

/// Error types for domain value objects
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("Invalid exam period: {0}")]
    InvalidPeriod(String),

    #[error("Invalid time slot: {0}")]
    InvalidTimeSlot(String),

    #[error("Invalid academic year: {0}")]
    InvalidAcademicYear(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type DomainResult<T> = std::result::Result<T, DomainError>;

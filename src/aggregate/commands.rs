// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Functional Commands for the Schedule Aggregate
//!
//! Commands express user intent and can fail validation.
//! They contain all data needed for business rule enforcement.
//!
//! # Command Pattern
//!
//! ```text
//! Command → handle_command(State, Command) → Result<Event, Error>
//! ```
//!
//! Commands differ from Events:
//! - Commands express intent (what should happen)
//! - Events express facts (what did happen)
//! - Commands can be rejected by business rules
//! - Events cannot fail (they already happened)
//!
//! # Time Handling
//!
//! All commands include explicit `timestamp` parameter.
//! **NEVER call `Utc::now()` in domain logic**.
//! Time is passed from the application layer.

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::domain::{
    AcademicYear, AdjustmentId, AdjustmentType, CommentId, CommentType, CourseId, ExamPeriod,
    ExamSession, ExamSessionPeriodId, MandatoryStatus, ProfessorId, RoomAssignment, ScheduledExam,
    ScheduledExamId, TimeSlot,
};

/// Command to create a new schedule for an examination session period
///
/// This is the initial command that creates the aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateScheduleCommand {
    /// Business key of the examination session period
    pub exam_session_period_id: ExamSessionPeriodId,

    /// Academic year, e.g. 2024-2025
    pub academic_year: AcademicYear,

    /// Session within the academic year
    pub exam_session: ExamSession,

    /// Date range the schedule covers
    pub period: ExamPeriod,

    /// Timestamp when command was issued (explicit time parameter)
    pub timestamp: DateTime<Utc>,

    /// Correlation ID for distributed tracing
    pub correlation_id: Uuid,
}

/// Command to record that professor preference collection finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletePreferenceCollectionCommand {
    /// Number of preferences gathered during the window
    pub preference_count: u32,

    /// Timestamp when command was issued
    pub timestamp: DateTime<Utc>,

    /// Correlation ID for distributed tracing
    pub correlation_id: Uuid,

    /// Optional causation ID (event that caused this command)
    pub causation_id: Option<Uuid>,
}

/// Command to start the automated generation workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerGenerationCommand {
    /// Who or what started the generation
    pub triggered_by: String,

    /// Timestamp when command was issued
    pub timestamp: DateTime<Utc>,

    /// Correlation ID for distributed tracing
    pub correlation_id: Uuid,

    /// Optional causation ID
    pub causation_id: Option<Uuid>,
}

/// Command carrying the external solver's full result
///
/// Applying replaces the previous exam set. The handler re-validates every
/// placement against the schedule invariants before emitting anything.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyGeneratedScheduleCommand {
    /// Exams placed by the solver, already materialized as entities
    pub exams: Vec<ScheduledExam>,

    /// Solver-reported overall quality in [0, 1]
    pub quality_score: f64,

    /// Solver-reported share of satisfied preferences in [0, 1]
    pub preference_satisfaction_rate: f64,

    /// Solver-reported room utilization in [0, 1]
    pub room_utilization_rate: f64,

    /// Constraint violations the solver reported but accepted
    pub constraint_violations: Vec<String>,

    /// Solver wall-clock time
    pub solver_elapsed_ms: u64,

    /// Solver iteration count
    pub solver_iterations: u64,

    /// Timestamp when command was issued
    pub timestamp: DateTime<Utc>,

    /// Correlation ID for distributed tracing
    pub correlation_id: Uuid,

    /// Optional causation ID
    pub causation_id: Option<Uuid>,
}

/// Command to record a generation workflow failure
///
/// Restores the status held when generation was triggered so a new
/// TriggerGeneration is immediately legal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleGenerationFailureCommand {
    /// Failure reason surfaced to the read side
    pub reason: String,

    /// Workflow step that failed (data_fetch, quality_gate, solver, apply)
    pub failed_step: String,

    /// Timestamp when command was issued
    pub timestamp: DateTime<Utc>,

    /// Correlation ID for distributed tracing
    pub correlation_id: Uuid,

    /// Optional causation ID
    pub causation_id: Option<Uuid>,
}

/// Command to place a single exam manually
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddExamCommand {
    /// Identifier unique within the schedule
    pub scheduled_exam_id: ScheduledExamId,

    /// Examined course
    pub course_id: CourseId,

    /// Course display name
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

    /// Timestamp when command was issued
    pub timestamp: DateTime<Utc>,

    /// Correlation ID for distributed tracing
    pub correlation_id: Uuid,

    /// Optional causation ID
    pub causation_id: Option<Uuid>,
}

/// Command to remove a single exam
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveExamCommand {
    /// Exam to remove
    pub scheduled_exam_id: ScheduledExamId,

    /// Timestamp when command was issued
    pub timestamp: DateTime<Utc>,

    /// Correlation ID for distributed tracing
    pub correlation_id: Uuid,

    /// Optional causation ID
    pub causation_id: Option<Uuid>,
}

/// Command to move an exam to a different date or time interval
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateExamTimeCommand {
    /// Exam to move
    pub scheduled_exam_id: ScheduledExamId,

    /// New date and time interval
    pub new_slot: TimeSlot,

    /// Approved adjustment this change applies, if any
    pub adjustment_id: Option<AdjustmentId>,

    /// Timestamp when command was issued
    pub timestamp: DateTime<Utc>,

    /// Correlation ID for distributed tracing
    pub correlation_id: Uuid,

    /// Optional causation ID
    pub causation_id: Option<Uuid>,
}

/// Command to move an exam to a different room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateExamSpaceCommand {
    /// Exam to move
    pub scheduled_exam_id: ScheduledExamId,

    /// New room assignment
    pub new_room: RoomAssignment,

    /// Approved adjustment this change applies, if any
    pub adjustment_id: Option<AdjustmentId>,

    /// Timestamp when command was issued
    pub timestamp: DateTime<Utc>,

    /// Correlation ID for distributed tracing
    pub correlation_id: Uuid,

    /// Optional causation ID
    pub causation_id: Option<Uuid>,
}

/// Command carrying a professor's feedback on the published schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitFeedbackCommand {
    /// Identifier for the new comment, unique within the schedule
    pub comment_id: CommentId,

    /// Professor submitting the feedback
    pub professor_id: ProfessorId,

    /// Exam the feedback concerns, if any
    pub scheduled_exam_id: Option<ScheduledExamId>,

    /// Free-text body
    pub comment_text: String,

    /// Kind of feedback
    pub comment_type: CommentType,

    /// Timestamp when command was issued
    pub timestamp: DateTime<Utc>,

    /// Correlation ID for distributed tracing
    pub correlation_id: Uuid,

    /// Optional causation ID
    pub causation_id: Option<Uuid>,
}

/// Command to mark a submitted comment as reviewed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewCommentCommand {
    /// Comment to mark
    pub comment_id: CommentId,

    /// Administrator performing the review
    pub reviewed_by: String,

    /// Timestamp when command was issued
    pub timestamp: DateTime<Utc>,

    /// Correlation ID for distributed tracing
    pub correlation_id: Uuid,

    /// Optional causation ID
    pub causation_id: Option<Uuid>,
}

/// Command to request an adjustment to the schedule
#[derive(Debug, Clone, PartialEq)]
pub struct RequestAdjustmentCommand {
    /// Identifier for the new adjustment, unique within the schedule
    pub adjustment_id: AdjustmentId,

    /// Comment that motivated the request, if any
    pub comment_id: Option<CommentId>,

    /// Exam the adjustment targets, if any
    pub scheduled_exam_id: Option<ScheduledExamId>,

    /// Kind of change requested
    pub adjustment_type: AdjustmentType,

    /// What should change
    pub description: String,

    /// Who asked for the change
    pub requested_by: String,

    /// Why the change is needed
    pub reason: Option<String>,

    /// Serialized before-values for auditing
    pub old_values: Option<serde_json::Value>,

    /// Serialized after-values for auditing
    pub new_values: Option<serde_json::Value>,

    /// Timestamp when command was issued
    pub timestamp: DateTime<Utc>,

    /// Correlation ID for distributed tracing
    pub correlation_id: Uuid,

    /// Optional causation ID
    pub causation_id: Option<Uuid>,
}

/// Command to move a requested adjustment into administrative review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartAdjustmentReviewCommand {
    /// Adjustment to review
    pub adjustment_id: AdjustmentId,

    /// Timestamp when command was issued
    pub timestamp: DateTime<Utc>,

    /// Correlation ID for distributed tracing
    pub correlation_id: Uuid,

    /// Optional causation ID
    pub causation_id: Option<Uuid>,
}

/// Command to approve an adjustment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApproveAdjustmentCommand {
    /// Adjustment to approve
    pub adjustment_id: AdjustmentId,

    /// Administrator approving
    pub approved_by: String,

    /// Optional note recorded with the approval
    pub reason: Option<String>,

    /// Timestamp when command was issued
    pub timestamp: DateTime<Utc>,

    /// Correlation ID for distributed tracing
    pub correlation_id: Uuid,

    /// Optional causation ID
    pub causation_id: Option<Uuid>,
}

/// Command to reject an adjustment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectAdjustmentCommand {
    /// Adjustment to reject
    pub adjustment_id: AdjustmentId,

    /// Administrator rejecting
    pub rejected_by: String,

    /// Rejection reason, must be non-blank
    pub reason: String,

    /// Timestamp when command was issued
    pub timestamp: DateTime<Utc>,

    /// Correlation ID for distributed tracing
    pub correlation_id: Uuid,

    /// Optional causation ID
    pub causation_id: Option<Uuid>,
}

/// Command to open the professor review window
///
/// The review deadline is derived from the command timestamp, seven days out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishForReviewCommand {
    /// Timestamp when command was issued
    pub timestamp: DateTime<Utc>,

    /// Correlation ID for distributed tracing
    pub correlation_id: Uuid,

    /// Optional causation ID
    pub causation_id: Option<Uuid>,
}

/// Command to freeze the schedule content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizeCommand {
    /// Planner finalizing the schedule
    pub finalized_by: String,

    /// Timestamp when command was issued
    pub timestamp: DateTime<Utc>,

    /// Correlation ID for distributed tracing
    pub correlation_id: Uuid,

    /// Optional causation ID
    pub causation_id: Option<Uuid>,
}

/// Command to release the finalized schedule to students
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishFinalCommand {
    /// Administrator publishing
    pub published_by: String,

    /// Timestamp when command was issued
    pub timestamp: DateTime<Utc>,

    /// Correlation ID for distributed tracing
    pub correlation_id: Uuid,

    /// Optional causation ID
    pub causation_id: Option<Uuid>,
}

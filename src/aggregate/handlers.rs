// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Functional Command Handlers for the Schedule Aggregate
//!
//! Command handlers are pure functions that:
//! 1. Take current state + command
//! 2. Validate business rules
//! 3. Return Event (success) or Error (validation failure)
//!
//! # Handler Pattern
//!
//! ```text
//! handle_command(State, Command) → Result<Event, CommandError>
//! ```
//!
//! All handlers are **pure functions**:
//! - No side effects (no I/O, no Utc::now(), no mutations)
//! - Deterministic (same inputs → same output)
//! - Referentially transparent
//!
//! # Business Rule Enforcement
//!
//! Handlers enforce aggregate invariants:
//! - Status transitions must follow the lifecycle state machine
//! - Exam ids are unique within a schedule
//! - No two exams overlap in time
//! - Exam dates stay inside the schedule's period
//! - Assigned rooms hold the expected student count
//! - Rejection = zero events, no state change

use chrono::Duration;
use uuid::Uuid;

use crate::aggregate::commands::*;
use crate::aggregate::schedule::ScheduleState;
use crate::analysis::change_impact;
use crate::domain::{
    AdjustmentLog, AdjustmentStatus, CommentStatus, ExamPeriod, ProfessorComment, ScheduleId,
    ScheduledExam,
};
use crate::events::schedule::*;

/// Command validation error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    /// Schedule does not exist yet (no events)
    #[error("Schedule not created")]
    NotCreated,

    /// Schedule already exists (can't create twice)
    #[error("Schedule already created")]
    AlreadyCreated,

    /// Command issued in a status that does not allow it
    #[error("Invalid state transition: {command} requires one of {allowed:?}, schedule is {current:?}")]
    InvalidStateTransition {
        command: &'static str,
        current: ScheduleStatus,
        allowed: Vec<ScheduleStatus>,
    },

    /// Required textual content is blank
    #[error("Field {0} must not be blank")]
    BlankField(&'static str),

    /// Exam id already used within this schedule
    #[error("Exam {0} already scheduled")]
    DuplicateExamId(String),

    /// Comment id already used within this schedule
    #[error("Comment {0} already submitted")]
    DuplicateCommentId(String),

    /// Adjustment id already used within this schedule
    #[error("Adjustment {0} already requested")]
    DuplicateAdjustmentId(String),

    /// Exam date outside the schedule's period
    #[error("Exam {exam} on {date} falls outside the schedule period")]
    ExamOutsidePeriod { exam: String, date: chrono::NaiveDate },

    /// Two exams would overlap in time
    #[error("Exam {first} overlaps in time with exam {second}")]
    ExamTimeOverlap { first: String, second: String },

    /// Assigned room too small for the expected students
    #[error("Exam {exam} places {students} students in a room with capacity {capacity}")]
    RoomCapacityExceeded {
        exam: String,
        students: u32,
        capacity: u32,
    },

    /// Referenced exam does not exist
    #[error("Exam {0} not found")]
    ExamNotFound(String),

    /// Referenced comment does not exist
    #[error("Comment {0} not found")]
    CommentNotFound(String),

    /// Referenced adjustment does not exist
    #[error("Adjustment {0} not found")]
    AdjustmentNotFound(String),

    /// Adjustment is not in a state that allows the decision
    #[error("Adjustment {adjustment} is {status:?} and cannot be decided")]
    AdjustmentNotActionable {
        adjustment: String,
        status: AdjustmentStatus,
    },

    /// Adjustment must be approved before it can be applied
    #[error("Adjustment {adjustment} is {status:?}, only approved adjustments can be applied")]
    AdjustmentNotApproved {
        adjustment: String,
        status: AdjustmentStatus,
    },

    /// Publishing requires at least one scheduled exam
    #[error("Cannot publish an empty schedule for review")]
    EmptySchedule,

    /// Solver result failed re-validation against schedule invariants
    #[error("Generation result invalid: exam {exam} violates rule: {rule}")]
    GenerationResultInvalid { exam: String, rule: String },
}

/// Reject the command unless the schedule is in one of the allowed statuses
fn ensure_status(
    state: &ScheduleState,
    command: &'static str,
    allowed: &[ScheduleStatus],
) -> Result<(), CommandError> {
    if !allowed.contains(&state.status) {
        return Err(CommandError::InvalidStateTransition {
            command,
            current: state.status,
            allowed: allowed.to_vec(),
        });
    }
    Ok(())
}

/// Validate one exam placement against the schedule invariants
///
/// Checks the schedule period (invariant: exam dates stay inside it),
/// pairwise time overlap against `others`, and room capacity.
/// Duplicate-id checks are the caller's responsibility.
fn validate_exam_placement(
    period: &ExamPeriod,
    others: &[&ScheduledExam],
    exam: &ScheduledExam,
) -> Result<(), CommandError> {
    if !period.contains(exam.slot.date) {
        return Err(CommandError::ExamOutsidePeriod {
            exam: exam.scheduled_exam_id.to_string(),
            date: exam.slot.date,
        });
    }

    for other in others {
        if exam.slot.overlaps(&other.slot) {
            return Err(CommandError::ExamTimeOverlap {
                first: exam.scheduled_exam_id.to_string(),
                second: other.scheduled_exam_id.to_string(),
            });
        }
    }

    if let Some(room) = &exam.room {
        if exam.student_count > room.capacity {
            return Err(CommandError::RoomCapacityExceeded {
                exam: exam.scheduled_exam_id.to_string(),
                students: exam.student_count,
                capacity: room.capacity,
            });
        }
    }

    Ok(())
}

/// Handle CreateSchedule command
///
/// # Business Rules
/// - Schedule must not already exist
/// - Period and session-period id validity are enforced by construction
///   of their value objects
///
/// # Returns
/// - Ok(ScheduleCreated) if validation passes
/// - Err(CommandError) if validation fails
pub fn handle_create_schedule(
    state: &ScheduleState,
    command: CreateScheduleCommand,
    schedule_id: ScheduleId,
) -> Result<ScheduleCreated, CommandError> {
    // Business rule: Can't create twice
    if state.is_initialized() {
        return Err(CommandError::AlreadyCreated);
    }

    Ok(ScheduleCreated {
        event_version: ScheduleCreated::CURRENT_VERSION,
        event_id: Uuid::now_v7(),
        schedule_id,
        timestamp: command.timestamp,
        correlation_id: command.correlation_id,
        causation_id: None,
        exam_session_period_id: command.exam_session_period_id,
        academic_year: command.academic_year,
        exam_session: command.exam_session,
        period: command.period,
    })
}

/// Handle CompletePreferenceCollection command
///
/// # Business Rules
/// - Schedule must exist and be in Draft
pub fn handle_complete_preference_collection(
    state: &ScheduleState,
    command: CompletePreferenceCollectionCommand,
) -> Result<PreferencesCollected, CommandError> {
    if !state.is_initialized() {
        return Err(CommandError::NotCreated);
    }
    ensure_status(
        state,
        "CompletePreferenceCollection",
        &[ScheduleStatus::Draft],
    )?;

    Ok(PreferencesCollected {
        event_version: PreferencesCollected::CURRENT_VERSION,
        event_id: Uuid::now_v7(),
        schedule_id: state.id,
        timestamp: command.timestamp,
        correlation_id: command.correlation_id,
        causation_id: command.causation_id,
        preference_count: command.preference_count,
    })
}

/// Handle TriggerGeneration command
///
/// # Business Rules
/// - Schedule must exist and be in Draft or PreferencesCollected
///
/// The event remembers the status held right now so a later failure can
/// restore it.
pub fn handle_trigger_generation(
    state: &ScheduleState,
    command: TriggerGenerationCommand,
) -> Result<GenerationTriggered, CommandError> {
    if !state.is_initialized() {
        return Err(CommandError::NotCreated);
    }
    ensure_status(
        state,
        "TriggerGeneration",
        &[ScheduleStatus::Draft, ScheduleStatus::PreferencesCollected],
    )?;

    Ok(GenerationTriggered {
        event_version: GenerationTriggered::CURRENT_VERSION,
        event_id: Uuid::now_v7(),
        schedule_id: state.id,
        timestamp: command.timestamp,
        correlation_id: command.correlation_id,
        causation_id: command.causation_id,
        triggered_by: command.triggered_by,
        from_status: state.status,
    })
}

/// Handle ApplyGeneratedSchedule command
///
/// Re-validates the solver's placements against every schedule invariant
/// before emitting anything: duplicate ids, period membership, pairwise
/// overlap, and room capacity. A single violation rejects the whole result.
///
/// # Business Rules
/// - Schedule must exist and be in Generating
/// - Every placement must satisfy the schedule invariants
///
/// # Returns
/// The full event sequence: ExamsCleared (when a prior set existed), one
/// ExamAdded per placement, then GenerationCompleted. Causation ids chain
/// through the sequence.
pub fn handle_apply_generated_schedule(
    state: &ScheduleState,
    command: ApplyGeneratedScheduleCommand,
) -> Result<Vec<ScheduleEvent>, CommandError> {
    if !state.is_initialized() {
        return Err(CommandError::NotCreated);
    }
    ensure_status(
        state,
        "ApplyGeneratedSchedule",
        &[ScheduleStatus::Generating],
    )?;

    let period = state.period.as_ref().ok_or(CommandError::NotCreated)?;

    // The prior exam set is cleared first, so placements are validated
    // against the incoming set only
    let mut accepted: Vec<&ScheduledExam> = Vec::new();
    for exam in &command.exams {
        if accepted
            .iter()
            .any(|a| a.scheduled_exam_id == exam.scheduled_exam_id)
        {
            return Err(CommandError::GenerationResultInvalid {
                exam: exam.scheduled_exam_id.to_string(),
                rule: "duplicate scheduled exam id".to_string(),
            });
        }

        validate_exam_placement(period, &accepted, exam).map_err(|violation| {
            CommandError::GenerationResultInvalid {
                exam: exam.scheduled_exam_id.to_string(),
                rule: violation.to_string(),
            }
        })?;

        accepted.push(exam);
    }

    let mut events = Vec::with_capacity(command.exams.len() + 2);
    let mut causation_id = command.causation_id;

    if !state.exams.is_empty() {
        let cleared = ExamsCleared {
            event_version: ExamsCleared::CURRENT_VERSION,
            event_id: Uuid::now_v7(),
            schedule_id: state.id,
            timestamp: command.timestamp,
            correlation_id: command.correlation_id,
            causation_id,
            cleared_count: state.exams.len() as u32,
        };
        causation_id = Some(cleared.event_id);
        events.push(ScheduleEvent::ExamsCleared(cleared));
    }

    for exam in command.exams {
        let added = ExamAdded {
            event_version: ExamAdded::CURRENT_VERSION,
            event_id: Uuid::now_v7(),
            schedule_id: state.id,
            timestamp: command.timestamp,
            correlation_id: command.correlation_id,
            causation_id,
            exam,
        };
        causation_id = Some(added.event_id);
        events.push(ScheduleEvent::ExamAdded(added));
    }

    events.push(ScheduleEvent::GenerationCompleted(GenerationCompleted {
        event_version: GenerationCompleted::CURRENT_VERSION,
        event_id: Uuid::now_v7(),
        schedule_id: state.id,
        timestamp: command.timestamp,
        correlation_id: command.correlation_id,
        causation_id,
        exams_placed: events
            .iter()
            .filter(|e| matches!(e, ScheduleEvent::ExamAdded(_)))
            .count() as u32,
        quality_score: command.quality_score,
        preference_satisfaction_rate: command.preference_satisfaction_rate,
        room_utilization_rate: command.room_utilization_rate,
        constraint_violations: command.constraint_violations,
        solver_elapsed_ms: command.solver_elapsed_ms,
        solver_iterations: command.solver_iterations,
    }));

    Ok(events)
}

/// Handle HandleGenerationFailure command
///
/// # Business Rules
/// - Schedule must exist and be in Generating
///
/// Restores the status recorded when generation was triggered, so a new
/// TriggerGeneration is immediately legal.
pub fn handle_generation_failure(
    state: &ScheduleState,
    command: HandleGenerationFailureCommand,
) -> Result<GenerationFailed, CommandError> {
    if !state.is_initialized() {
        return Err(CommandError::NotCreated);
    }
    ensure_status(
        state,
        "HandleGenerationFailure",
        &[ScheduleStatus::Generating],
    )?;

    let restored_status = state
        .status_when_generation_triggered
        .unwrap_or(ScheduleStatus::Draft);

    Ok(GenerationFailed {
        event_version: GenerationFailed::CURRENT_VERSION,
        event_id: Uuid::now_v7(),
        schedule_id: state.id,
        timestamp: command.timestamp,
        correlation_id: command.correlation_id,
        causation_id: command.causation_id,
        reason: command.reason,
        failed_step: command.failed_step,
        restored_status,
    })
}

/// Handle AddExam command
///
/// # Business Rules
/// - Schedule must exist and be in Draft, Generated, or UnderReview
/// - Exam id must be unique within the schedule
/// - Exam date must fall inside the schedule period
/// - Exam must not overlap any existing exam in time
/// - Assigned room must hold the expected student count
pub fn handle_add_exam(
    state: &ScheduleState,
    command: AddExamCommand,
) -> Result<ExamAdded, CommandError> {
    if !state.is_initialized() {
        return Err(CommandError::NotCreated);
    }
    ensure_status(
        state,
        "AddExam",
        &[
            ScheduleStatus::Draft,
            ScheduleStatus::Generated,
            ScheduleStatus::UnderReview,
        ],
    )?;

    if state.exams.contains_key(&command.scheduled_exam_id) {
        return Err(CommandError::DuplicateExamId(
            command.scheduled_exam_id.to_string(),
        ));
    }

    let exam = ScheduledExam {
        scheduled_exam_id: command.scheduled_exam_id,
        course_id: command.course_id,
        course_name: command.course_name,
        slot: command.slot,
        room: command.room,
        student_count: command.student_count,
        mandatory_status: command.mandatory_status,
        professor_ids: command.professor_ids,
        created_at: command.timestamp,
        updated_at: command.timestamp,
    };

    let period = state.period.as_ref().ok_or(CommandError::NotCreated)?;
    let others: Vec<&ScheduledExam> = state.exams.values().collect();
    validate_exam_placement(period, &others, &exam)?;

    Ok(ExamAdded {
        event_version: ExamAdded::CURRENT_VERSION,
        event_id: Uuid::now_v7(),
        schedule_id: state.id,
        timestamp: command.timestamp,
        correlation_id: command.correlation_id,
        causation_id: command.causation_id,
        exam,
    })
}

/// Handle RemoveExam command
///
/// # Business Rules
/// - Schedule must exist and be in Draft, Generated, or UnderReview
/// - Exam must exist
pub fn handle_remove_exam(
    state: &ScheduleState,
    command: RemoveExamCommand,
) -> Result<ExamRemoved, CommandError> {
    if !state.is_initialized() {
        return Err(CommandError::NotCreated);
    }
    ensure_status(
        state,
        "RemoveExam",
        &[
            ScheduleStatus::Draft,
            ScheduleStatus::Generated,
            ScheduleStatus::UnderReview,
        ],
    )?;

    if !state.exams.contains_key(&command.scheduled_exam_id) {
        return Err(CommandError::ExamNotFound(
            command.scheduled_exam_id.to_string(),
        ));
    }

    Ok(ExamRemoved {
        event_version: ExamRemoved::CURRENT_VERSION,
        event_id: Uuid::now_v7(),
        schedule_id: state.id,
        timestamp: command.timestamp,
        correlation_id: command.correlation_id,
        causation_id: command.causation_id,
        scheduled_exam_id: command.scheduled_exam_id,
    })
}

/// Check that a linked adjustment exists and has been approved
fn ensure_adjustment_approved(
    state: &ScheduleState,
    adjustment_id: &crate::domain::AdjustmentId,
) -> Result<(), CommandError> {
    let adjustment = state
        .adjustments
        .get(adjustment_id)
        .ok_or_else(|| CommandError::AdjustmentNotFound(adjustment_id.to_string()))?;

    if adjustment.status != AdjustmentStatus::Approved {
        return Err(CommandError::AdjustmentNotApproved {
            adjustment: adjustment_id.to_string(),
            status: adjustment.status,
        });
    }
    Ok(())
}

/// Handle UpdateExamTime command
///
/// # Business Rules
/// - Schedule must exist and be in Draft, Generated, or UnderReview
/// - Exam must exist
/// - New slot must satisfy period and overlap invariants
/// - A linked adjustment must exist and be approved
///
/// The emitted event carries a best-effort impact summary computed over the
/// schedule's own exam set.
pub fn handle_update_exam_time(
    state: &ScheduleState,
    command: UpdateExamTimeCommand,
) -> Result<ExamTimeChanged, CommandError> {
    if !state.is_initialized() {
        return Err(CommandError::NotCreated);
    }
    ensure_status(
        state,
        "UpdateExamTime",
        &[
            ScheduleStatus::Draft,
            ScheduleStatus::Generated,
            ScheduleStatus::UnderReview,
        ],
    )?;

    let exam = state
        .exam(&command.scheduled_exam_id)
        .ok_or_else(|| CommandError::ExamNotFound(command.scheduled_exam_id.to_string()))?;

    if let Some(adjustment_id) = &command.adjustment_id {
        ensure_adjustment_approved(state, adjustment_id)?;
    }

    let mut updated = exam.clone();
    updated.slot = command.new_slot;

    let period = state.period.as_ref().ok_or(CommandError::NotCreated)?;
    let others: Vec<&ScheduledExam> = state
        .exams
        .values()
        .filter(|e| e.scheduled_exam_id != command.scheduled_exam_id)
        .collect();
    validate_exam_placement(period, &others, &updated)?;

    let before: Vec<ScheduledExam> = state.exams.values().cloned().collect();
    let after: Vec<ScheduledExam> = others
        .iter()
        .map(|e| (*e).clone())
        .chain(std::iter::once(updated))
        .collect();
    let impact = change_impact(&before, &after, exam.student_count);

    Ok(ExamTimeChanged {
        event_version: ExamTimeChanged::CURRENT_VERSION,
        event_id: Uuid::now_v7(),
        schedule_id: state.id,
        timestamp: command.timestamp,
        correlation_id: command.correlation_id,
        causation_id: command.causation_id,
        scheduled_exam_id: command.scheduled_exam_id,
        old_slot: exam.slot,
        new_slot: command.new_slot,
        impact,
        adjustment_id: command.adjustment_id,
    })
}

/// Handle UpdateExamSpace command
///
/// # Business Rules
/// - Schedule must exist and be in Draft, Generated, or UnderReview
/// - Exam must exist
/// - New room must hold the expected student count
/// - A linked adjustment must exist and be approved
pub fn handle_update_exam_space(
    state: &ScheduleState,
    command: UpdateExamSpaceCommand,
) -> Result<ExamSpaceChanged, CommandError> {
    if !state.is_initialized() {
        return Err(CommandError::NotCreated);
    }
    ensure_status(
        state,
        "UpdateExamSpace",
        &[
            ScheduleStatus::Draft,
            ScheduleStatus::Generated,
            ScheduleStatus::UnderReview,
        ],
    )?;

    let exam = state
        .exam(&command.scheduled_exam_id)
        .ok_or_else(|| CommandError::ExamNotFound(command.scheduled_exam_id.to_string()))?;

    if let Some(adjustment_id) = &command.adjustment_id {
        ensure_adjustment_approved(state, adjustment_id)?;
    }

    if exam.student_count > command.new_room.capacity {
        return Err(CommandError::RoomCapacityExceeded {
            exam: exam.scheduled_exam_id.to_string(),
            students: exam.student_count,
            capacity: command.new_room.capacity,
        });
    }

    let mut updated = exam.clone();
    updated.room = Some(command.new_room.clone());

    let before: Vec<ScheduledExam> = state.exams.values().cloned().collect();
    let after: Vec<ScheduledExam> = state
        .exams
        .values()
        .filter(|e| e.scheduled_exam_id != command.scheduled_exam_id)
        .cloned()
        .chain(std::iter::once(updated))
        .collect();
    let impact = change_impact(&before, &after, exam.student_count);

    Ok(ExamSpaceChanged {
        event_version: ExamSpaceChanged::CURRENT_VERSION,
        event_id: Uuid::now_v7(),
        schedule_id: state.id,
        timestamp: command.timestamp,
        correlation_id: command.correlation_id,
        causation_id: command.causation_id,
        scheduled_exam_id: command.scheduled_exam_id,
        old_room: exam.room.clone(),
        new_room: command.new_room,
        impact,
        adjustment_id: command.adjustment_id,
    })
}

/// Handle SubmitFeedback command
///
/// # Business Rules
/// - Schedule must exist and be in PublishedForReview or UnderReview
/// - Comment text must not be blank
/// - Comment id must be unique within the schedule
/// - A referenced exam must exist
///
/// Status advancement (first feedback opens the review) happens in apply.
pub fn handle_submit_feedback(
    state: &ScheduleState,
    command: SubmitFeedbackCommand,
) -> Result<FeedbackSubmitted, CommandError> {
    if !state.is_initialized() {
        return Err(CommandError::NotCreated);
    }
    ensure_status(
        state,
        "SubmitFeedback",
        &[
            ScheduleStatus::PublishedForReview,
            ScheduleStatus::UnderReview,
        ],
    )?;

    if command.comment_text.trim().is_empty() {
        return Err(CommandError::BlankField("comment_text"));
    }
    if state.comments.contains_key(&command.comment_id) {
        return Err(CommandError::DuplicateCommentId(
            command.comment_id.to_string(),
        ));
    }
    if let Some(exam_id) = &command.scheduled_exam_id {
        if !state.exams.contains_key(exam_id) {
            return Err(CommandError::ExamNotFound(exam_id.to_string()));
        }
    }

    let comment = ProfessorComment {
        comment_id: command.comment_id,
        professor_id: command.professor_id,
        scheduled_exam_id: command.scheduled_exam_id,
        comment_text: command.comment_text,
        comment_type: command.comment_type,
        status: CommentStatus::Submitted,
        submitted_at: command.timestamp,
        reviewed_at: None,
        reviewed_by: None,
    };

    Ok(FeedbackSubmitted {
        event_version: FeedbackSubmitted::CURRENT_VERSION,
        event_id: Uuid::now_v7(),
        schedule_id: state.id,
        timestamp: command.timestamp,
        correlation_id: command.correlation_id,
        causation_id: command.causation_id,
        comment,
    })
}

/// Handle ReviewComment command
///
/// # Business Rules
/// - Schedule must exist and be in UnderReview
/// - Comment must exist
pub fn handle_review_comment(
    state: &ScheduleState,
    command: ReviewCommentCommand,
) -> Result<CommentReviewed, CommandError> {
    if !state.is_initialized() {
        return Err(CommandError::NotCreated);
    }
    ensure_status(state, "ReviewComment", &[ScheduleStatus::UnderReview])?;

    if !state.comments.contains_key(&command.comment_id) {
        return Err(CommandError::CommentNotFound(command.comment_id.to_string()));
    }

    Ok(CommentReviewed {
        event_version: CommentReviewed::CURRENT_VERSION,
        event_id: Uuid::now_v7(),
        schedule_id: state.id,
        timestamp: command.timestamp,
        correlation_id: command.correlation_id,
        causation_id: command.causation_id,
        comment_id: command.comment_id,
        reviewed_by: command.reviewed_by,
    })
}

/// Handle RequestAdjustment command
///
/// # Business Rules
/// - Schedule must exist and be in UnderReview
/// - Adjustment id must be unique within the schedule
/// - A referenced comment or exam must exist
pub fn handle_request_adjustment(
    state: &ScheduleState,
    command: RequestAdjustmentCommand,
) -> Result<AdjustmentRequested, CommandError> {
    if !state.is_initialized() {
        return Err(CommandError::NotCreated);
    }
    ensure_status(state, "RequestAdjustment", &[ScheduleStatus::UnderReview])?;

    if state.adjustments.contains_key(&command.adjustment_id) {
        return Err(CommandError::DuplicateAdjustmentId(
            command.adjustment_id.to_string(),
        ));
    }
    if let Some(comment_id) = &command.comment_id {
        if !state.comments.contains_key(comment_id) {
            return Err(CommandError::CommentNotFound(comment_id.to_string()));
        }
    }
    if let Some(exam_id) = &command.scheduled_exam_id {
        if !state.exams.contains_key(exam_id) {
            return Err(CommandError::ExamNotFound(exam_id.to_string()));
        }
    }

    let adjustment = AdjustmentLog {
        adjustment_id: command.adjustment_id,
        comment_id: command.comment_id,
        scheduled_exam_id: command.scheduled_exam_id,
        adjustment_type: command.adjustment_type,
        description: command.description,
        requested_by: command.requested_by,
        requested_at: command.timestamp,
        reason: command.reason,
        status: AdjustmentStatus::Requested,
        old_values: command.old_values,
        new_values: command.new_values,
    };

    Ok(AdjustmentRequested {
        event_version: AdjustmentRequested::CURRENT_VERSION,
        event_id: Uuid::now_v7(),
        schedule_id: state.id,
        timestamp: command.timestamp,
        correlation_id: command.correlation_id,
        causation_id: command.causation_id,
        adjustment,
    })
}

/// Look up an adjustment that is still open for a decision
fn actionable_adjustment<'a>(
    state: &'a ScheduleState,
    adjustment_id: &crate::domain::AdjustmentId,
) -> Result<&'a AdjustmentLog, CommandError> {
    let adjustment = state
        .adjustments
        .get(adjustment_id)
        .ok_or_else(|| CommandError::AdjustmentNotFound(adjustment_id.to_string()))?;

    if !adjustment.status.is_actionable() {
        return Err(CommandError::AdjustmentNotActionable {
            adjustment: adjustment_id.to_string(),
            status: adjustment.status,
        });
    }
    Ok(adjustment)
}

/// Handle StartAdjustmentReview command
///
/// # Business Rules
/// - Schedule must exist and be in UnderReview
/// - Adjustment must exist and still be in Requested
pub fn handle_start_adjustment_review(
    state: &ScheduleState,
    command: StartAdjustmentReviewCommand,
) -> Result<AdjustmentReviewStarted, CommandError> {
    if !state.is_initialized() {
        return Err(CommandError::NotCreated);
    }
    ensure_status(
        state,
        "StartAdjustmentReview",
        &[ScheduleStatus::UnderReview],
    )?;

    let adjustment = state
        .adjustments
        .get(&command.adjustment_id)
        .ok_or_else(|| CommandError::AdjustmentNotFound(command.adjustment_id.to_string()))?;

    if adjustment.status != AdjustmentStatus::Requested {
        return Err(CommandError::AdjustmentNotActionable {
            adjustment: command.adjustment_id.to_string(),
            status: adjustment.status,
        });
    }

    Ok(AdjustmentReviewStarted {
        event_version: AdjustmentReviewStarted::CURRENT_VERSION,
        event_id: Uuid::now_v7(),
        schedule_id: state.id,
        timestamp: command.timestamp,
        correlation_id: command.correlation_id,
        causation_id: command.causation_id,
        adjustment_id: command.adjustment_id,
    })
}

/// Handle ApproveAdjustment command
///
/// # Business Rules
/// - Schedule must exist and be in UnderReview
/// - Adjustment must exist and be in Requested or UnderReview
pub fn handle_approve_adjustment(
    state: &ScheduleState,
    command: ApproveAdjustmentCommand,
) -> Result<AdjustmentApproved, CommandError> {
    if !state.is_initialized() {
        return Err(CommandError::NotCreated);
    }
    ensure_status(state, "ApproveAdjustment", &[ScheduleStatus::UnderReview])?;

    actionable_adjustment(state, &command.adjustment_id)?;

    Ok(AdjustmentApproved {
        event_version: AdjustmentApproved::CURRENT_VERSION,
        event_id: Uuid::now_v7(),
        schedule_id: state.id,
        timestamp: command.timestamp,
        correlation_id: command.correlation_id,
        causation_id: command.causation_id,
        adjustment_id: command.adjustment_id,
        approved_by: command.approved_by,
        reason: command.reason,
    })
}

/// Handle RejectAdjustment command
///
/// # Business Rules
/// - Schedule must exist and be in UnderReview
/// - Adjustment must exist and be in Requested or UnderReview
/// - Rejection reason must not be blank
pub fn handle_reject_adjustment(
    state: &ScheduleState,
    command: RejectAdjustmentCommand,
) -> Result<AdjustmentRejected, CommandError> {
    if !state.is_initialized() {
        return Err(CommandError::NotCreated);
    }
    ensure_status(state, "RejectAdjustment", &[ScheduleStatus::UnderReview])?;

    if command.reason.trim().is_empty() {
        return Err(CommandError::BlankField("reason"));
    }

    actionable_adjustment(state, &command.adjustment_id)?;

    Ok(AdjustmentRejected {
        event_version: AdjustmentRejected::CURRENT_VERSION,
        event_id: Uuid::now_v7(),
        schedule_id: state.id,
        timestamp: command.timestamp,
        correlation_id: command.correlation_id,
        causation_id: command.causation_id,
        adjustment_id: command.adjustment_id,
        rejected_by: command.rejected_by,
        reason: command.reason,
    })
}

/// Handle PublishForReview command
///
/// # Business Rules
/// - Schedule must exist and be in Generated
/// - Schedule must contain at least one exam
///
/// The review deadline is seven days after the command timestamp.
pub fn handle_publish_for_review(
    state: &ScheduleState,
    command: PublishForReviewCommand,
) -> Result<PublishedForReview, CommandError> {
    if !state.is_initialized() {
        return Err(CommandError::NotCreated);
    }
    ensure_status(state, "PublishForReview", &[ScheduleStatus::Generated])?;

    if state.exams.is_empty() {
        return Err(CommandError::EmptySchedule);
    }

    Ok(PublishedForReview {
        event_version: PublishedForReview::CURRENT_VERSION,
        event_id: Uuid::now_v7(),
        schedule_id: state.id,
        timestamp: command.timestamp,
        correlation_id: command.correlation_id,
        causation_id: command.causation_id,
        review_deadline: command.timestamp + Duration::days(7),
        exam_count: state.exams.len() as u32,
    })
}

/// Handle Finalize command
///
/// # Business Rules
/// - Schedule must exist and be in UnderReview
///
/// The event snapshots the solver-reported quality score held in state;
/// that snapshot is permanent.
pub fn handle_finalize(
    state: &ScheduleState,
    command: FinalizeCommand,
) -> Result<ScheduleFinalized, CommandError> {
    if !state.is_initialized() {
        return Err(CommandError::NotCreated);
    }
    ensure_status(state, "Finalize", &[ScheduleStatus::UnderReview])?;

    Ok(ScheduleFinalized {
        event_version: ScheduleFinalized::CURRENT_VERSION,
        event_id: Uuid::now_v7(),
        schedule_id: state.id,
        timestamp: command.timestamp,
        correlation_id: command.correlation_id,
        causation_id: command.causation_id,
        final_quality_score: state.quality_score,
        finalized_by: command.finalized_by,
    })
}

/// Handle PublishFinal command
///
/// # Business Rules
/// - Schedule must exist and be in Finalized
pub fn handle_publish_final(
    state: &ScheduleState,
    command: PublishFinalCommand,
) -> Result<FinalPublished, CommandError> {
    if !state.is_initialized() {
        return Err(CommandError::NotCreated);
    }
    ensure_status(state, "PublishFinal", &[ScheduleStatus::Finalized])?;

    Ok(FinalPublished {
        event_version: FinalPublished::CURRENT_VERSION,
        event_id: Uuid::now_v7(),
        schedule_id: state.id,
        timestamp: command.timestamp,
        correlation_id: command.correlation_id,
        causation_id: command.causation_id,
        published_by: command.published_by,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::schedule::apply_event;
    use crate::domain::{
        AcademicYear, AdjustmentId, AdjustmentType, CommentId, CommentType, CourseId, ExamSession,
        ExamSessionPeriodId, MandatoryStatus, ProfessorId, RoomAssignment, RoomId, ScheduledExamId,
        TimeSlot,
    };
    use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
    use std::collections::BTreeSet;

    fn test_timestamp() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-10T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn test_schedule_id() -> ScheduleId {
        ScheduleId::from_uuid(Uuid::parse_str("01943a2b-1000-7000-8000-000000001000").unwrap())
    }

    fn created_state() -> ScheduleState {
        let command = CreateScheduleCommand {
            exam_session_period_id: ExamSessionPeriodId::new("2024-2025-winter").unwrap(),
            academic_year: AcademicYear::new("2024-2025").unwrap(),
            exam_session: ExamSession::Winter,
            period: ExamPeriod::new(
                NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 30).unwrap(),
            )
            .unwrap(),
            timestamp: test_timestamp(),
            correlation_id: Uuid::now_v7(),
        };
        let state = ScheduleState::default_for(test_schedule_id());
        let event = handle_create_schedule(&state, command, test_schedule_id()).unwrap();
        apply_event(state, &ScheduleEvent::ScheduleCreated(event))
    }

    fn add_exam_command(id: &str, date: NaiveDate, start_h: u32, end_h: u32) -> AddExamCommand {
        AddExamCommand {
            scheduled_exam_id: ScheduledExamId::new(id).unwrap(),
            course_id: CourseId::new("CS101").unwrap(),
            course_name: "Introduction to Computer Science".to_string(),
            slot: TimeSlot::new(
                date,
                NaiveTime::from_hms_opt(start_h, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(end_h, 0, 0).unwrap(),
            )
            .unwrap(),
            room: Some(RoomAssignment {
                room_id: RoomId::new("A-101").unwrap(),
                room_name: "Amphitheater A-101".to_string(),
                capacity: 60,
            }),
            student_count: 50,
            mandatory_status: MandatoryStatus::Mandatory,
            professor_ids: BTreeSet::from([ProfessorId::new("prof-a").unwrap()]),
            timestamp: test_timestamp(),
            correlation_id: Uuid::now_v7(),
            causation_id: None,
        }
    }

    fn state_with_exam(id: &str) -> ScheduleState {
        let state = created_state();
        let event = handle_add_exam(
            &state,
            add_exam_command(id, NaiveDate::from_ymd_opt(2025, 1, 16).unwrap(), 9, 11),
        )
        .unwrap();
        apply_event(state, &ScheduleEvent::ExamAdded(event))
    }

    #[test]
    fn test_handle_create_schedule_success() {
        // Arrange
        let state = ScheduleState::default_for(test_schedule_id());
        let command = CreateScheduleCommand {
            exam_session_period_id: ExamSessionPeriodId::new("2024-2025-winter").unwrap(),
            academic_year: AcademicYear::new("2024-2025").unwrap(),
            exam_session: ExamSession::Winter,
            period: ExamPeriod::new(
                NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 30).unwrap(),
            )
            .unwrap(),
            timestamp: test_timestamp(),
            correlation_id: Uuid::now_v7(),
        };

        // Act
        let result = handle_create_schedule(&state, command, test_schedule_id());

        // Assert
        assert!(result.is_ok());
        let event = result.unwrap();
        assert_eq!(event.exam_session, ExamSession::Winter);
        assert_eq!(event.schedule_id, test_schedule_id());
    }

    #[test]
    fn test_handle_create_schedule_already_created() {
        // Arrange
        let state = created_state();
        let command = CreateScheduleCommand {
            exam_session_period_id: ExamSessionPeriodId::new("2024-2025-winter").unwrap(),
            academic_year: AcademicYear::new("2024-2025").unwrap(),
            exam_session: ExamSession::Winter,
            period: ExamPeriod::new(
                NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 30).unwrap(),
            )
            .unwrap(),
            timestamp: test_timestamp(),
            correlation_id: Uuid::now_v7(),
        };

        // Act
        let result = handle_create_schedule(&state, command, test_schedule_id());

        // Assert
        assert_eq!(result.unwrap_err(), CommandError::AlreadyCreated);
    }

    #[test]
    fn test_handle_trigger_generation_records_from_status() {
        // Arrange
        let state = created_state();
        let command = TriggerGenerationCommand {
            triggered_by: "scheduler-ui".to_string(),
            timestamp: test_timestamp(),
            correlation_id: Uuid::now_v7(),
            causation_id: None,
        };

        // Act
        let event = handle_trigger_generation(&state, command).unwrap();

        // Assert
        assert_eq!(event.from_status, ScheduleStatus::Draft);
    }

    #[test]
    fn test_handle_trigger_generation_wrong_state() {
        // Arrange - already generating
        let mut state = created_state();
        state.status = ScheduleStatus::Generating;

        let command = TriggerGenerationCommand {
            triggered_by: "scheduler-ui".to_string(),
            timestamp: test_timestamp(),
            correlation_id: Uuid::now_v7(),
            causation_id: None,
        };

        // Act
        let result = handle_trigger_generation(&state, command);

        // Assert
        assert!(matches!(
            result.unwrap_err(),
            CommandError::InvalidStateTransition { .. }
        ));
    }

    #[test]
    fn test_handle_add_exam_overlap_rejected() {
        // Arrange - CS101 on 2025-01-16 09:00-11:00 already placed
        let state = state_with_exam("EXAM-1");

        // Act - MATH201 on the same date 09:30-11:30
        let mut command =
            add_exam_command("EXAM-2", NaiveDate::from_ymd_opt(2025, 1, 16).unwrap(), 9, 11);
        command.slot = TimeSlot::new(
            NaiveDate::from_ymd_opt(2025, 1, 16).unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            NaiveTime::from_hms_opt(11, 30, 0).unwrap(),
        )
        .unwrap();
        let result = handle_add_exam(&state, command);

        // Assert
        assert!(matches!(
            result.unwrap_err(),
            CommandError::ExamTimeOverlap { .. }
        ));
    }

    #[test]
    fn test_handle_add_exam_outside_period_rejected() {
        // Arrange
        let state = created_state();

        // Act - date beyond the period end
        let command =
            add_exam_command("EXAM-1", NaiveDate::from_ymd_opt(2025, 2, 10).unwrap(), 9, 11);
        let result = handle_add_exam(&state, command);

        // Assert
        assert!(matches!(
            result.unwrap_err(),
            CommandError::ExamOutsidePeriod { .. }
        ));
    }

    #[test]
    fn test_handle_add_exam_room_too_small() {
        // Arrange
        let state = created_state();

        // Act - 50 students into a room of 40
        let mut command =
            add_exam_command("EXAM-1", NaiveDate::from_ymd_opt(2025, 1, 16).unwrap(), 9, 11);
        command.room = Some(RoomAssignment {
            room_id: RoomId::new("B-204").unwrap(),
            room_name: "Room B-204".to_string(),
            capacity: 40,
        });
        let result = handle_add_exam(&state, command);

        // Assert
        assert!(matches!(
            result.unwrap_err(),
            CommandError::RoomCapacityExceeded { .. }
        ));
    }

    #[test]
    fn test_handle_add_exam_duplicate_id() {
        // Arrange
        let state = state_with_exam("EXAM-1");

        // Act - same id on a free day
        let command =
            add_exam_command("EXAM-1", NaiveDate::from_ymd_opt(2025, 1, 20).unwrap(), 9, 11);
        let result = handle_add_exam(&state, command);

        // Assert
        assert!(matches!(
            result.unwrap_err(),
            CommandError::DuplicateExamId(_)
        ));
    }

    #[test]
    fn test_handle_apply_generated_schedule_rejects_out_of_period_exam() {
        // Arrange - generating schedule, solver placed an exam on 2099-01-01
        let mut state = created_state();
        state.status = ScheduleStatus::Generating;
        state.status_when_generation_triggered = Some(ScheduleStatus::Draft);

        let far_future = NaiveDate::from_ymd_opt(2099, 1, 1).unwrap();
        let exam = ScheduledExam {
            scheduled_exam_id: ScheduledExamId::new("EXAM-X").unwrap(),
            course_id: CourseId::new("CS101").unwrap(),
            course_name: "Introduction to Computer Science".to_string(),
            slot: TimeSlot::new(
                far_future,
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            )
            .unwrap(),
            room: None,
            student_count: 50,
            mandatory_status: MandatoryStatus::Mandatory,
            professor_ids: BTreeSet::new(),
            created_at: test_timestamp(),
            updated_at: test_timestamp(),
        };

        let command = ApplyGeneratedScheduleCommand {
            exams: vec![exam],
            quality_score: 0.9,
            preference_satisfaction_rate: 0.8,
            room_utilization_rate: 0.7,
            constraint_violations: vec![],
            solver_elapsed_ms: 1200,
            solver_iterations: 40_000,
            timestamp: test_timestamp(),
            correlation_id: Uuid::now_v7(),
            causation_id: None,
        };

        // Act
        let result = handle_apply_generated_schedule(&state, command);

        // Assert - re-validation rejects the whole result
        assert!(matches!(
            result.unwrap_err(),
            CommandError::GenerationResultInvalid { .. }
        ));
    }

    #[test]
    fn test_handle_apply_generated_schedule_emits_full_sequence() {
        // Arrange - generating schedule with one prior exam to clear
        let mut state = state_with_exam("OLD-EXAM");
        state.status = ScheduleStatus::Generating;
        state.status_when_generation_triggered = Some(ScheduleStatus::Draft);

        let exam = |id: &str, day: u32| ScheduledExam {
            scheduled_exam_id: ScheduledExamId::new(id).unwrap(),
            course_id: CourseId::new("CS101").unwrap(),
            course_name: "Introduction to Computer Science".to_string(),
            slot: TimeSlot::new(
                NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            )
            .unwrap(),
            room: None,
            student_count: 50,
            mandatory_status: MandatoryStatus::Optional,
            professor_ids: BTreeSet::new(),
            created_at: test_timestamp(),
            updated_at: test_timestamp(),
        };

        let command = ApplyGeneratedScheduleCommand {
            exams: vec![exam("EXAM-1", 16), exam("EXAM-2", 17)],
            quality_score: 0.9,
            preference_satisfaction_rate: 0.8,
            room_utilization_rate: 0.7,
            constraint_violations: vec!["soft: friday afternoon slot used".to_string()],
            solver_elapsed_ms: 1200,
            solver_iterations: 40_000,
            timestamp: test_timestamp(),
            correlation_id: Uuid::now_v7(),
            causation_id: None,
        };

        // Act
        let events = handle_apply_generated_schedule(&state, command).unwrap();

        // Assert - ExamsCleared, two ExamAdded, GenerationCompleted
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], ScheduleEvent::ExamsCleared(_)));
        assert!(matches!(events[1], ScheduleEvent::ExamAdded(_)));
        assert!(matches!(events[2], ScheduleEvent::ExamAdded(_)));
        match &events[3] {
            ScheduleEvent::GenerationCompleted(e) => {
                assert_eq!(e.exams_placed, 2);
                assert_eq!(e.quality_score, 0.9);
            }
            other => panic!("Expected GenerationCompleted, got {other:?}"),
        }

        // Causation chains through the sequence
        assert_eq!(
            events[1].causation_id(),
            Some(events[0].event_id()),
        );

        // Folding the events lands the schedule in Generated with the new set
        let folded = events.iter().fold(state, apply_event);
        assert_eq!(folded.status, ScheduleStatus::Generated);
        assert_eq!(folded.exams.len(), 2);
        assert!(!folded
            .exams
            .contains_key(&ScheduledExamId::new("OLD-EXAM").unwrap()));
    }

    #[test]
    fn test_handle_generation_failure_restores_trigger_status() {
        // Arrange
        let mut state = created_state();
        state.status = ScheduleStatus::Generating;
        state.status_when_generation_triggered = Some(ScheduleStatus::PreferencesCollected);

        let command = HandleGenerationFailureCommand {
            reason: "enrollment service unavailable".to_string(),
            failed_step: "data_fetch".to_string(),
            timestamp: test_timestamp(),
            correlation_id: Uuid::now_v7(),
            causation_id: None,
        };

        // Act
        let event = handle_generation_failure(&state, command).unwrap();

        // Assert
        assert_eq!(event.restored_status, ScheduleStatus::PreferencesCollected);
        assert_eq!(event.failed_step, "data_fetch");
    }

    #[test]
    fn test_handle_publish_for_review_empty_schedule() {
        // Arrange - generated schedule without exams
        let mut state = created_state();
        state.status = ScheduleStatus::Generated;

        let command = PublishForReviewCommand {
            timestamp: test_timestamp(),
            correlation_id: Uuid::now_v7(),
            causation_id: None,
        };

        // Act
        let result = handle_publish_for_review(&state, command);

        // Assert - error names the empty schedule
        let err = result.unwrap_err();
        assert_eq!(err, CommandError::EmptySchedule);
        assert!(err.to_string().contains("empty schedule"));
    }

    #[test]
    fn test_handle_publish_for_review_sets_seven_day_deadline() {
        // Arrange
        let mut state = state_with_exam("EXAM-1");
        state.status = ScheduleStatus::Generated;

        let command = PublishForReviewCommand {
            timestamp: test_timestamp(),
            correlation_id: Uuid::now_v7(),
            causation_id: None,
        };

        // Act
        let event = handle_publish_for_review(&state, command).unwrap();

        // Assert
        assert_eq!(event.review_deadline, test_timestamp() + Duration::days(7));
        assert_eq!(event.exam_count, 1);
    }

    #[test]
    fn test_handle_submit_feedback_blank_text_rejected() {
        // Arrange
        let mut state = state_with_exam("EXAM-1");
        state.status = ScheduleStatus::PublishedForReview;

        let command = SubmitFeedbackCommand {
            comment_id: CommentId::new("CMT-1").unwrap(),
            professor_id: ProfessorId::new("prof-a").unwrap(),
            scheduled_exam_id: None,
            comment_text: "   ".to_string(),
            comment_type: CommentType::General,
            timestamp: test_timestamp(),
            correlation_id: Uuid::now_v7(),
            causation_id: None,
        };

        // Act
        let result = handle_submit_feedback(&state, command);

        // Assert
        assert_eq!(result.unwrap_err(), CommandError::BlankField("comment_text"));
    }

    #[test]
    fn test_handle_reject_adjustment_blank_reason_rejected() {
        // Arrange - under review with a requested adjustment
        let mut state = state_with_exam("EXAM-1");
        state.status = ScheduleStatus::UnderReview;

        let request = RequestAdjustmentCommand {
            adjustment_id: AdjustmentId::new("ADJ-1").unwrap(),
            comment_id: None,
            scheduled_exam_id: None,
            adjustment_type: AdjustmentType::TimeChange,
            description: "Move CS101 to the afternoon".to_string(),
            requested_by: "prof-a".to_string(),
            reason: None,
            old_values: None,
            new_values: None,
            timestamp: test_timestamp(),
            correlation_id: Uuid::now_v7(),
            causation_id: None,
        };
        let event = handle_request_adjustment(&state, request).unwrap();
        let state = apply_event(state, &ScheduleEvent::AdjustmentRequested(event));

        let command = RejectAdjustmentCommand {
            adjustment_id: AdjustmentId::new("ADJ-1").unwrap(),
            rejected_by: "planner".to_string(),
            reason: "".to_string(),
            timestamp: test_timestamp(),
            correlation_id: Uuid::now_v7(),
            causation_id: None,
        };

        // Act
        let result = handle_reject_adjustment(&state, command);

        // Assert
        assert_eq!(result.unwrap_err(), CommandError::BlankField("reason"));
    }

    #[test]
    fn test_handle_update_exam_time_requires_approved_adjustment() {
        // Arrange - adjustment exists but is still Requested
        let mut state = state_with_exam("EXAM-1");
        state.status = ScheduleStatus::UnderReview;

        let request = RequestAdjustmentCommand {
            adjustment_id: AdjustmentId::new("ADJ-1").unwrap(),
            comment_id: None,
            scheduled_exam_id: Some(ScheduledExamId::new("EXAM-1").unwrap()),
            adjustment_type: AdjustmentType::TimeChange,
            description: "Move CS101 to the afternoon".to_string(),
            requested_by: "prof-a".to_string(),
            reason: None,
            old_values: None,
            new_values: None,
            timestamp: test_timestamp(),
            correlation_id: Uuid::now_v7(),
            causation_id: None,
        };
        let event = handle_request_adjustment(&state, request).unwrap();
        let state = apply_event(state, &ScheduleEvent::AdjustmentRequested(event));

        let command = UpdateExamTimeCommand {
            scheduled_exam_id: ScheduledExamId::new("EXAM-1").unwrap(),
            new_slot: TimeSlot::new(
                NaiveDate::from_ymd_opt(2025, 1, 16).unwrap(),
                NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            )
            .unwrap(),
            adjustment_id: Some(AdjustmentId::new("ADJ-1").unwrap()),
            timestamp: test_timestamp(),
            correlation_id: Uuid::now_v7(),
            causation_id: None,
        };

        // Act
        let result = handle_update_exam_time(&state, command);

        // Assert
        assert!(matches!(
            result.unwrap_err(),
            CommandError::AdjustmentNotApproved { .. }
        ));
    }

    #[test]
    fn test_handle_update_exam_time_computes_impact() {
        // Arrange - two exams on the same day, 09:00-11:00 and 09:30-11:30
        let state = state_with_exam("EXAM-1");
        let mut second =
            add_exam_command("EXAM-2", NaiveDate::from_ymd_opt(2025, 1, 17).unwrap(), 9, 11);
        second.room = None;
        let event = handle_add_exam(&state, second).unwrap();
        let state = apply_event(state, &ScheduleEvent::ExamAdded(event));

        // Act - move EXAM-2 to a free afternoon slot on the 17th
        let command = UpdateExamTimeCommand {
            scheduled_exam_id: ScheduledExamId::new("EXAM-2").unwrap(),
            new_slot: TimeSlot::new(
                NaiveDate::from_ymd_opt(2025, 1, 17).unwrap(),
                NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            )
            .unwrap(),
            adjustment_id: None,
            timestamp: test_timestamp(),
            correlation_id: Uuid::now_v7(),
            causation_id: None,
        };
        let event = handle_update_exam_time(&state, command).unwrap();

        // Assert - impact covers the moved exam's students, no conflicts touched
        assert_eq!(event.impact.impacted_students, 50);
        assert_eq!(event.impact.conflicts_resolved, 0);
        assert_eq!(event.impact.conflicts_created, 0);
        assert_eq!(event.old_slot.date, NaiveDate::from_ymd_opt(2025, 1, 17).unwrap());
    }

    #[test]
    fn test_handle_finalize_snapshots_quality_score() {
        // Arrange
        let mut state = state_with_exam("EXAM-1");
        state.status = ScheduleStatus::UnderReview;
        state.quality_score = Some(0.87);

        let command = FinalizeCommand {
            finalized_by: "planner".to_string(),
            timestamp: test_timestamp(),
            correlation_id: Uuid::now_v7(),
            causation_id: None,
        };

        // Act
        let event = handle_finalize(&state, command).unwrap();

        // Assert
        assert_eq!(event.final_quality_score, Some(0.87));
    }

    #[test]
    fn test_rejected_command_leaves_state_unchanged() {
        // Arrange
        let state = created_state();
        let before = state.clone();

        let command = PublishForReviewCommand {
            timestamp: test_timestamp(),
            correlation_id: Uuid::now_v7(),
            causation_id: None,
        };

        // Act - wrong status, command rejected
        let result = handle_publish_for_review(&state, command);

        // Assert - zero events, state untouched
        assert!(result.is_err());
        assert_eq!(state, before);
    }
}

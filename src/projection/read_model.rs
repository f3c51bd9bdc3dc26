// Copyright (c) 2025 - Cowboy AI, Inc.
//! Read Models for the Schedule Query Side
//!
//! One [`ScheduleReadModel`] per schedule aggregate, built incrementally
//! from stored events and persisted whole to a NATS KV bucket. Views are
//! denormalized for queries; nothing here is consulted by the write side.
//!
//! The model records `last_event_sequence` so redelivered events (the
//! transport is at-least-once) are recognized and skipped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::analysis::{
    ConflictSeverity, ConflictStatus, ConflictType, QualityScore, TrendDirection,
};
use crate::domain::{
    AdjustmentId, AdjustmentStatus, AdjustmentType, CommentId, CommentStatus, CommentType,
    CourseId, ExamPeriod, ExamSession, MandatoryStatus, ProfessorId, RoomAssignment, ScheduleId,
    ScheduledExam, ScheduledExamId, TimeSlot,
};
use crate::events::ScheduleStatus;

/// Header view of one schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleView {
    pub schedule_id: ScheduleId,
    pub exam_session_period_id: String,
    pub academic_year: String,
    pub exam_session: ExamSession,
    pub period: ExamPeriod,
    pub status: ScheduleStatus,
    pub preference_count: u32,
    pub quality_score: Option<f64>,
    pub preference_satisfaction_rate: Option<f64>,
    pub constraint_violations: Vec<String>,
    pub final_quality_score: Option<f64>,
    pub review_deadline: Option<DateTime<Utc>>,
    pub last_failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

/// Read model for one placed exam
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamView {
    pub scheduled_exam_id: ScheduledExamId,
    pub course_id: CourseId,
    pub course_name: String,
    pub slot: TimeSlot,
    pub room: Option<RoomAssignment>,
    pub student_count: u32,
    pub mandatory_status: MandatoryStatus,
    pub professor_ids: BTreeSet<ProfessorId>,
    pub placed_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl ExamView {
    pub fn from_exam(exam: &ScheduledExam) -> Self {
        Self {
            scheduled_exam_id: exam.scheduled_exam_id.clone(),
            course_id: exam.course_id.clone(),
            course_name: exam.course_name.clone(),
            slot: exam.slot,
            room: exam.room.clone(),
            student_count: exam.student_count,
            mandatory_status: exam.mandatory_status,
            professor_ids: exam.professor_ids.clone(),
            placed_at: exam.created_at,
            last_updated: exam.updated_at,
        }
    }

    /// Materialize the view back into a domain entity for analysis
    pub fn to_exam(&self) -> ScheduledExam {
        ScheduledExam {
            scheduled_exam_id: self.scheduled_exam_id.clone(),
            course_id: self.course_id.clone(),
            course_name: self.course_name.clone(),
            slot: self.slot,
            room: self.room.clone(),
            student_count: self.student_count,
            mandatory_status: self.mandatory_status,
            professor_ids: self.professor_ids.clone(),
            created_at: self.placed_at,
            updated_at: self.last_updated,
        }
    }
}

/// Read model for one professor comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentView {
    pub comment_id: CommentId,
    pub professor_id: ProfessorId,
    pub scheduled_exam_id: Option<ScheduledExamId>,
    pub comment_type: CommentType,
    pub comment_text: String,
    pub status: CommentStatus,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_by: Option<String>,
    pub last_updated: DateTime<Utc>,
}

/// Read model for one adjustment request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentView {
    pub adjustment_id: AdjustmentId,
    pub comment_id: Option<CommentId>,
    pub scheduled_exam_id: Option<ScheduledExamId>,
    pub adjustment_type: AdjustmentType,
    pub description: String,
    pub requested_by: String,
    pub status: AdjustmentStatus,
    pub reason: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

/// Read model for one detected conflict
///
/// Conflicts that disappear after a schedule change are marked
/// [`ConflictStatus::Resolved`] rather than deleted, preserving the audit
/// trail of what the analyzer found over time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictView {
    pub conflict_id: String,
    pub conflict_type: ConflictType,
    pub severity: ConflictSeverity,
    pub description: String,
    pub affected_exam_ids: Vec<ScheduledExamId>,
    pub affected_students: u32,
    pub suggested_resolution: String,
    pub status: ConflictStatus,
    pub detected_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

/// Point-in-time quality metrics snapshot
///
/// Captured when the analyzers re-run over the materialized exam set,
/// which happens on `generation_completed` and `schedule_finalized`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsView {
    /// Event type that triggered the capture
    pub trigger: String,
    pub event_sequence: u64,
    pub captured_at: DateTime<Utc>,
    pub quality: QualityScore,
    pub open_conflicts: u32,
    pub critical_conflicts: u32,
    /// Last capture vs the mean of earlier captures
    pub trend: TrendDirection,
}

/// Kind of schedule version snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleVersionType {
    /// Prior exam set captured before regeneration replaced it
    Backup,
    /// Freshly generated draft
    Draft,
    /// Snapshot published for professor review
    Review,
    /// Frozen final content
    Final,
}

/// Versioned snapshot row of the schedule's exam set over its lifecycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionView {
    pub version_type: ScheduleVersionType,
    pub event_sequence: u64,
    pub captured_at: DateTime<Utc>,
    pub exam_count: u32,
    pub quality_score: Option<f64>,
}

/// Full query-side model of one schedule
///
/// Collections are ordered maps so serialized models and analyzer input
/// order are deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleReadModel {
    pub schedule: Option<ScheduleView>,
    pub exams: BTreeMap<ScheduledExamId, ExamView>,
    pub comments: BTreeMap<CommentId, CommentView>,
    pub adjustments: BTreeMap<AdjustmentId, AdjustmentView>,
    pub conflicts: BTreeMap<String, ConflictView>,
    pub metrics_history: Vec<MetricsView>,
    pub versions: Vec<VersionView>,
    /// Overall scores in capture order, input to trend derivation
    pub score_history: Vec<f64>,
    /// Sequence of the last applied event; applying at or below it is a no-op
    pub last_event_sequence: u64,
}

impl ScheduleReadModel {
    pub fn new() -> Self {
        Self {
            schedule: None,
            exams: BTreeMap::new(),
            comments: BTreeMap::new(),
            adjustments: BTreeMap::new(),
            conflicts: BTreeMap::new(),
            metrics_history: Vec::new(),
            versions: Vec::new(),
            score_history: Vec::new(),
            last_event_sequence: 0,
        }
    }

    /// Materialized exam entities in id order, for the analyzers
    pub fn exam_entities(&self) -> Vec<ScheduledExam> {
        self.exams.values().map(ExamView::to_exam).collect()
    }

    /// Conflicts still in `Detected` status
    pub fn open_conflicts(&self) -> Vec<&ConflictView> {
        self.conflicts
            .values()
            .filter(|c| c.status == ConflictStatus::Detected)
            .collect()
    }

    /// Latest metrics snapshot, if the analyzers have run
    pub fn latest_metrics(&self) -> Option<&MetricsView> {
        self.metrics_history.last()
    }
}

impl Default for ScheduleReadModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, TimeZone};
    use pretty_assertions::assert_eq;

    fn exam(id: &str) -> ScheduledExam {
        let now = Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap();
        ScheduledExam {
            scheduled_exam_id: ScheduledExamId::new(id).unwrap(),
            course_id: CourseId::new("CS101").unwrap(),
            course_name: "Introduction to Computer Science".to_string(),
            slot: TimeSlot::new(
                NaiveDate::from_ymd_opt(2025, 1, 16).unwrap(),
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            )
            .unwrap(),
            room: None,
            student_count: 50,
            mandatory_status: MandatoryStatus::Mandatory,
            professor_ids: [ProfessorId::new("prof-a").unwrap()].into_iter().collect(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_exam_view_round_trips_to_entity() {
        let original = exam("EXAM-1");
        let view = ExamView::from_exam(&original);
        assert_eq!(view.to_exam(), original);
    }

    #[test]
    fn test_exam_entities_are_id_ordered() {
        let mut model = ScheduleReadModel::new();
        for id in ["EXAM-3", "EXAM-1", "EXAM-2"] {
            let e = exam(id);
            model
                .exams
                .insert(e.scheduled_exam_id.clone(), ExamView::from_exam(&e));
        }

        let ids: Vec<String> = model
            .exam_entities()
            .iter()
            .map(|e| e.scheduled_exam_id.to_string())
            .collect();
        assert_eq!(ids, vec!["EXAM-1", "EXAM-2", "EXAM-3"]);
    }
}

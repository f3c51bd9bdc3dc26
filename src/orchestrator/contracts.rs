// Copyright (c) 2025 - Cowboy AI, Inc.
//! Collaborator Contracts
//!
//! Typed interfaces to the external systems the generation workflow
//! depends on: the reference-data provider (enrollments, courses,
//! professor preferences) and the scheduling solver. Both are opaque
//! remote services; this module only fixes the request/response shapes
//! and the async traits the orchestrator calls through.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::domain::{
    AcademicYear, CourseId, ExamPeriod, ExamSession, ExamSessionPeriodId, MandatoryStatus,
    ProfessorId, RoomAssignment, ScheduledExam,
};

/// Collaborator call failure, as reported by the remote side or transport
#[derive(Debug, Error)]
#[error("{0}")]
pub struct CollaboratorError(pub String);

/// Lookup key shared by all reference-data fetches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceDataKey {
    pub exam_session_period_id: ExamSessionPeriodId,
    pub academic_year: AcademicYear,
    pub exam_session: ExamSession,
}

/// Freshness indicator attached to every reference-data response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataFreshness {
    /// Served from the source of record
    Fresh,
    /// Served from a cache past its refresh window
    Stale,
}

/// Quality indicator the provider attaches to a response
///
/// Providers may return partial or stale data without erroring; the
/// orchestrator gates on this indicator instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataQuality {
    /// Fraction of requested records the provider could supply, in [0, 1]
    pub completeness: f64,

    /// Whether the data came from the source of record or a stale cache
    pub freshness: DataFreshness,
}

impl DataQuality {
    /// Check the response against the configured acceptance gate
    pub fn meets(&self, completeness_threshold: f64, allow_stale: bool) -> bool {
        self.completeness >= completeness_threshold
            && (allow_stale || self.freshness == DataFreshness::Fresh)
    }
}

/// Records plus the quality indicator they arrived with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData<T> {
    pub records: Vec<T>,
    pub quality: DataQuality,
}

/// Enrollment counts per course for the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    pub course_id: CourseId,
    pub student_count: u32,
}

/// Course and accreditation data relevant to exam placement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub course_id: CourseId,
    pub course_name: String,
    pub professor_ids: BTreeSet<ProfessorId>,
    pub exam_duration_minutes: u32,
    pub mandatory_status: MandatoryStatus,
}

/// A professor's date preferences for one course's exam
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    pub professor_id: ProfessorId,
    pub course_id: CourseId,
    pub preferred_dates: Vec<NaiveDate>,
    pub excluded_dates: Vec<NaiveDate>,
}

/// Reference-data provider contract
///
/// Each fetch is keyed by the same session-period / academic-year /
/// session triple and returns records plus a [`DataQuality`] indicator.
#[async_trait]
pub trait ReferenceDataProvider: Send + Sync {
    async fn fetch_enrollments(
        &self,
        key: &ReferenceDataKey,
    ) -> Result<ReferenceData<EnrollmentRecord>, CollaboratorError>;

    async fn fetch_courses(
        &self,
        key: &ReferenceDataKey,
    ) -> Result<ReferenceData<CourseRecord>, CollaboratorError>;

    async fn fetch_preferences(
        &self,
        key: &ReferenceDataKey,
    ) -> Result<ReferenceData<PreferenceRecord>, CollaboratorError>;
}

/// Request contract for the external scheduling solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverRequest {
    /// Date range every placed exam must fall inside
    pub period: ExamPeriod,

    /// Courses to place, with enrollment/professor/duration info
    pub courses: Vec<CourseRecord>,

    /// Enrollment counts per course
    pub enrollments: Vec<EnrollmentRecord>,

    /// Professor date preferences
    pub preferences: Vec<PreferenceRecord>,

    /// Static room catalog available for assignment
    pub rooms: Vec<RoomAssignment>,

    /// Institutional constraints, as solver-understood rule names
    pub constraints: Vec<String>,
}

/// Response contract of the external scheduling solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverResponse {
    /// Placed exams, one per course the solver could fit
    pub exams: Vec<ScheduledExam>,

    /// Constraints the solver could not satisfy
    pub constraint_violations: Vec<String>,

    /// Solver-reported overall quality in [0, 1]
    pub quality_score: f64,

    /// Fraction of professor preferences the placement honors
    pub preference_satisfaction_rate: f64,

    /// Fraction of room capacity-hours in use
    pub room_utilization_rate: f64,

    /// Solver wall-clock time
    pub elapsed_ms: u64,

    /// Search iterations performed
    pub iterations: u64,
}

/// External scheduling solver contract
///
/// Opaque and possibly slow (seconds to minutes); synchronous from the
/// caller's point of view. The orchestrator bounds it with a timeout.
#[async_trait]
pub trait SolverClient: Send + Sync {
    async fn solve(&self, request: SolverRequest) -> Result<SolverResponse, CollaboratorError>;
}

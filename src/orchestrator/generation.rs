// Copyright (c) 2025 - Cowboy AI, Inc.
//! Generation Workflow
//!
//! Drives the multi-step workflow that produces a draft schedule:
//!
//! ```text
//! TriggerGeneration
//!     ↓
//! fetch enrollments ─┐
//! fetch courses     ─┼─ parallel, each behind the resilience stack
//! fetch preferences ─┘
//!     ↓
//! data quality gate
//!     ↓
//! SolverClient::solve (bounded)
//!     ↓
//! ApplyGeneratedSchedule (aggregate re-validates every placed exam)
//! ```
//!
//! Any failure after the trigger — collaborator error, quality gate,
//! solver error, or the aggregate rejecting the solver's result — issues
//! `HandleGenerationFailure` and resolves to
//! [`GenerationOutcome::Failed`]. The workflow itself is never retried;
//! re-running generation is an explicit new trigger by the caller.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::aggregate::commands::{
    ApplyGeneratedScheduleCommand, HandleGenerationFailureCommand, TriggerGenerationCommand,
};
use crate::aggregate::CommandError;
use crate::domain::{RoomAssignment, ScheduleId};
use crate::resilience::ResilienceError;
use crate::service::{ScheduleCommandService, ServiceError, ServiceResult};

use super::collaborators::{ResilientDataProvider, ResilientSolver};
use super::contracts::{DataQuality, ReferenceDataKey, SolverRequest, SolverResponse};

/// Why a generation run failed, before translation into an event
#[derive(Debug, Error)]
pub enum GenerationError {
    /// A reference-data response fell below the acceptance gate
    #[error("{source_name} data rejected by quality gate: {detail}")]
    DataQualityBelowThreshold {
        source_name: &'static str,
        detail: String,
    },

    /// A reference-data collaborator could not be reached
    #[error("collaborator unavailable: {0}")]
    CollaboratorUnavailable(ResilienceError),

    /// The solver call failed or timed out
    #[error("solver failed: {0}")]
    SolverFailed(ResilienceError),

    /// The aggregate rejected the solver's result
    #[error("solver result rejected: {0}")]
    ResultRejected(CommandError),

    /// The apply command could not be persisted
    #[error("applying solver result failed: {0}")]
    ApplyFailed(String),
}

impl GenerationError {
    /// Workflow step name recorded on the failure event
    pub fn failed_step(&self) -> &'static str {
        match self {
            Self::CollaboratorUnavailable(_) => "data_fetch",
            Self::DataQualityBelowThreshold { .. } => "quality_gate",
            Self::SolverFailed(_) => "solver",
            Self::ResultRejected(_) | Self::ApplyFailed(_) => "apply",
        }
    }
}

/// Outcome of one generation run
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// The solver result was applied to the schedule
    Completed { exams_placed: u32, quality_score: f64 },

    /// The workflow aborted; a `GenerationFailed` event records why
    Failed { reason: String },
}

/// Static configuration for the generation workflow
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Minimum acceptable reference-data completeness, in [0, 1]
    pub completeness_threshold: f64,

    /// Whether stale reference data passes the quality gate
    pub allow_stale: bool,

    /// Room catalog handed to the solver
    pub room_catalog: Vec<RoomAssignment>,

    /// Institutional constraints, as solver-understood rule names
    pub constraints: Vec<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            completeness_threshold: 0.9,
            allow_stale: false,
            room_catalog: Vec::new(),
            constraints: Vec::new(),
        }
    }
}

/// Coordinates collaborators and feeds the result back as one command
///
/// Sits above the command service: it owns failure translation but no
/// schedule state of its own.
pub struct GenerationOrchestrator {
    service: Arc<dyn ScheduleCommandService>,
    provider: ResilientDataProvider,
    solver: ResilientSolver,
    config: GenerationConfig,
}

impl GenerationOrchestrator {
    pub fn new(
        service: Arc<dyn ScheduleCommandService>,
        provider: ResilientDataProvider,
        solver: ResilientSolver,
        config: GenerationConfig,
    ) -> Self {
        Self {
            service,
            provider,
            solver,
            config,
        }
    }

    /// Run one generation workflow for a schedule
    ///
    /// Returns `Err` only when `TriggerGeneration` itself is rejected or
    /// cannot be appended — nothing has started at that point and the
    /// caller sees the original error. Once generation is underway, every
    /// failure is absorbed into `HandleGenerationFailure` and reported as
    /// [`GenerationOutcome::Failed`].
    pub async fn generate(
        &self,
        schedule_id: ScheduleId,
        triggered_by: impl Into<String>,
    ) -> ServiceResult<GenerationOutcome> {
        let correlation_id = Uuid::now_v7();

        let state = self.service.get_schedule(schedule_id).await?;
        let key = ReferenceDataKey {
            exam_session_period_id: state
                .exam_session_period_id
                .clone()
                .ok_or(ServiceError::CommandError(CommandError::NotCreated))?,
            academic_year: state
                .academic_year
                .clone()
                .ok_or(ServiceError::CommandError(CommandError::NotCreated))?,
            exam_session: state
                .exam_session
                .ok_or(ServiceError::CommandError(CommandError::NotCreated))?,
        };
        let period = state
            .period
            .ok_or(ServiceError::CommandError(CommandError::NotCreated))?;

        self.service
            .trigger_generation(
                schedule_id,
                TriggerGenerationCommand {
                    triggered_by: triggered_by.into(),
                    timestamp: Utc::now(),
                    correlation_id,
                    causation_id: None,
                },
            )
            .await?;

        info!(schedule_id = %schedule_id, %correlation_id, "Generation workflow started");

        match self.run_workflow(schedule_id, &key, period, correlation_id).await {
            Ok(response) => {
                let exams_placed = response.exams.len() as u32;
                let quality_score = response.quality_score;
                info!(
                    schedule_id = %schedule_id,
                    exams_placed,
                    quality_score,
                    "Generation workflow completed"
                );
                Ok(GenerationOutcome::Completed {
                    exams_placed,
                    quality_score,
                })
            }
            Err(e) => Ok(self.record_failure(schedule_id, e, correlation_id).await),
        }
    }

    /// Steps 2-5: fetch, gate, solve, apply
    async fn run_workflow(
        &self,
        schedule_id: ScheduleId,
        key: &ReferenceDataKey,
        period: crate::domain::ExamPeriod,
        correlation_id: Uuid,
    ) -> Result<SolverResponse, GenerationError> {
        let (enrollments, courses, preferences) = tokio::join!(
            self.provider.fetch_enrollments(key),
            self.provider.fetch_courses(key),
            self.provider.fetch_preferences(key),
        );

        let enrollments = enrollments.map_err(GenerationError::CollaboratorUnavailable)?;
        let courses = courses.map_err(GenerationError::CollaboratorUnavailable)?;
        let preferences = preferences.map_err(GenerationError::CollaboratorUnavailable)?;

        self.gate("enrollment", enrollments.quality)?;
        self.gate("course", courses.quality)?;
        self.gate("preference", preferences.quality)?;

        let request = SolverRequest {
            period,
            courses: courses.records,
            enrollments: enrollments.records,
            preferences: preferences.records,
            rooms: self.config.room_catalog.clone(),
            constraints: self.config.constraints.clone(),
        };

        let response = self
            .solver
            .solve(request)
            .await
            .map_err(GenerationError::SolverFailed)?;

        let command = ApplyGeneratedScheduleCommand {
            exams: response.exams.clone(),
            quality_score: response.quality_score,
            preference_satisfaction_rate: response.preference_satisfaction_rate,
            room_utilization_rate: response.room_utilization_rate,
            constraint_violations: response.constraint_violations.clone(),
            solver_elapsed_ms: response.elapsed_ms,
            solver_iterations: response.iterations,
            timestamp: Utc::now(),
            correlation_id,
            causation_id: None,
        };

        match self
            .service
            .apply_generated_schedule(schedule_id, command)
            .await
        {
            Ok(_) => Ok(response),
            Err(ServiceError::CommandError(e)) => Err(GenerationError::ResultRejected(e)),
            Err(e) => Err(GenerationError::ApplyFailed(e.to_string())),
        }
    }

    /// Check one reference-data response against the quality gate
    fn gate(&self, source_name: &'static str, quality: DataQuality) -> Result<(), GenerationError> {
        if quality.meets(self.config.completeness_threshold, self.config.allow_stale) {
            return Ok(());
        }

        Err(GenerationError::DataQualityBelowThreshold {
            source_name,
            detail: format!(
                "completeness {:.2} (threshold {:.2}), freshness {:?}",
                quality.completeness, self.config.completeness_threshold, quality.freshness
            ),
        })
    }

    /// Translate a workflow failure into a `HandleGenerationFailure` command
    ///
    /// A failure recording the failure is logged and swallowed: the
    /// schedule stays in GENERATING until someone records the failure, but
    /// the caller still gets the real reason.
    async fn record_failure(
        &self,
        schedule_id: ScheduleId,
        error: GenerationError,
        correlation_id: Uuid,
    ) -> GenerationOutcome {
        let reason = error.to_string();
        warn!(
            schedule_id = %schedule_id,
            failed_step = error.failed_step(),
            reason = %reason,
            "Generation workflow failed"
        );

        let command = HandleGenerationFailureCommand {
            reason: reason.clone(),
            failed_step: error.failed_step().to_string(),
            timestamp: Utc::now(),
            correlation_id,
            causation_id: None,
        };

        if let Err(e) = self
            .service
            .handle_generation_failure(schedule_id, command)
            .await
        {
            error!(
                schedule_id = %schedule_id,
                error = %e,
                "Could not record generation failure"
            );
        }

        GenerationOutcome::Failed { reason }
    }
}

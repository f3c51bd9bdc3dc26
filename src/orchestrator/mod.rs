// Copyright (c) 2025 - Cowboy AI, Inc.
//! Generation Orchestrator
//!
//! Coordinates the external collaborators that produce a draft schedule
//! and feeds their combined result back into the aggregate as a single
//! command. The aggregate remains the only writer; the orchestrator owns
//! workflow sequencing and failure translation.
//!
//! # Modules
//!
//! - [`contracts`] - collaborator request/response shapes and async traits
//! - [`collaborators`] - the contracts behind the resilience guard stack
//! - [`generation`] - the workflow itself and its outcome/error types
//!
//! No fallback data is ever substituted for a failed collaborator call:
//! fabricated inputs would corrupt the schedule's quality guarantees, so
//! a failed fetch always ends the run with a recorded failure.

pub mod collaborators;
pub mod contracts;
pub mod generation;

pub use collaborators::{ResilientDataProvider, ResilientSolver};
pub use contracts::{
    CollaboratorError, CourseRecord, DataFreshness, DataQuality, EnrollmentRecord,
    PreferenceRecord, ReferenceData, ReferenceDataKey, ReferenceDataProvider, SolverClient,
    SolverRequest, SolverResponse,
};
pub use generation::{
    GenerationConfig, GenerationError, GenerationOrchestrator, GenerationOutcome,
};

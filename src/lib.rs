// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event-sourced exam session scheduling core
//!
//! This crate implements the write and read sides of an exam-session
//! schedule: an event-sourced aggregate with pure command handlers, a
//! CQRS projection maintaining query-side read models, independent
//! conflict/quality analysis, and an orchestrated generation workflow
//! over external collaborators.
//!
//! # Architecture
//!
//! ```text
//! Caller ──command──> ScheduleCommandService
//!                          ↓
//!              pure handler → event(s)
//!                          ↓
//!              EventStore (NATS JetStream, optimistic concurrency)
//!                          ↓ (event subjects)
//!              ProjectionSynchronizer ──> read models + integration events
//!
//! GenerationOrchestrator ──fetch──> reference data / solver
//!         │                              (resilience guard stack)
//!         └──ApplyGeneratedSchedule──> ScheduleCommandService
//! ```
//!
//! The aggregate's event history is the source of truth; read models are
//! derived and rebuildable at any time.

pub mod aggregate;
pub mod analysis;
pub mod domain;
pub mod errors;
pub mod event_store;
pub mod events;
pub mod jetstream;
pub mod nats;
pub mod orchestrator;
pub mod projection;
pub mod resilience;
pub mod service;
pub mod state_machine;
pub mod subjects;

// Re-export commonly used types
pub use aggregate::{apply_event, ScheduleState};
pub use domain::ScheduleId;
pub use errors::{SchedulingError, SchedulingResult};
pub use event_store::{EventStore, EventStoreError, InMemoryEventStore, NatsEventStore};
pub use events::{IntegrationEvent, ScheduleEvent, ScheduleStatus};
pub use nats::{MessageHandler, NatsClient, NatsConfig};
pub use projection::{ProjectionSynchronizer, ScheduleReadModel};
pub use service::{
    CommandAck, EventSourcedScheduleService, ScheduleCommandService, ServiceError,
};

// Copyright (c) 2025 - Cowboy AI, Inc.
//! Query-Side Projections
//!
//! CQRS read side of the scheduling core. Stored events flow through a pure
//! projection step into per-schedule read models; side effects come back as
//! data and are executed separately.
//!
//! ```text
//! Event Stream (NATS)          Pure Step                 Executor
//! ───────────────────          ─────────                 ────────
//!
//! StoredEvent ───────> project_schedule_event ──┬──> ScheduleReadModel
//!                                               │
//!                                               └──> Vec<SideEffect> ──> publish / log
//! ```
//!
//! - [`pure`] - projection step type, fold/replay helpers, side effect data
//! - [`read_model`] - the denormalized schedule views
//! - [`executor`] - side effect interpreters (NATS, logging, collecting)
//! - [`synchronizer`] - the pure step for schedule events and the async
//!   manager that owns models, persistence, and the live subscription

pub mod executor;
pub mod pure;
pub mod read_model;
pub mod synchronizer;

pub use executor::{
    CollectingExecutor, ExecutorError, LoggingExecutor, NatsSideEffectExecutor,
    SideEffectExecutor,
};
pub use pure::{
    fold_projection, replay_projection, LogLevel, ProjectionError, ProjectionResult,
    PureProjection, SideEffect,
};
pub use read_model::{
    AdjustmentView, CommentView, ConflictView, ExamView, MetricsView, ScheduleReadModel,
    ScheduleVersionType, ScheduleView, VersionView,
};
pub use synchronizer::{
    project_schedule_event, ProjectionSynchronizer, DEFAULT_READ_MODEL_BUCKET,
};

// Copyright (c) 2025 - Cowboy AI, Inc.
//! Service Layer for Schedule Management
//!
//! This module provides the application service layer that coordinates
//! domain logic, event sourcing, and infrastructure concerns on the
//! write side.
//!
//! # Architecture
//!
//! ```text
//! Client Request
//!     ↓
//! Service Layer (this module)
//!     ↓
//! Command Handler → Aggregate → Events
//!     ↓
//! Event Store (NATS JetStream)
//!     ↓
//! Event Subjects (envelope publication)
//!     ↓
//! Projection Synchronizer (read models)
//! ```
//!
//! # Service Pattern
//!
//! Services coordinate between:
//! - **Command Handlers**: Pure domain logic
//! - **Event Store**: Persistence layer with optimistic concurrency
//! - **Snapshot Store**: Fast state loads for long streams
//! - **Query Side**: Read models maintained by the projection synchronizer
//!
//! # Design Principles
//!
//! 1. **Transaction Boundaries**: One command, one append
//! 2. **Single Writer**: Per-schedule async lock across load → append
//! 3. **Pure Domain Logic**: Services call pure handler functions
//! 4. **Async by Default**: All I/O is asynchronous
//!
//! # Example
//!
//! ```rust,ignore
//! use examsched_core::service::{EventSourcedScheduleService, ScheduleCommandService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = EventSourcedScheduleService::new(event_store, snapshot_store);
//!
//!     // Execute command
//!     let ack = service.create_schedule(command).await?;
//!
//!     // Query current write-side state
//!     let state = service.get_schedule(ack.schedule_id).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod schedule_service;

pub use schedule_service::{
    CommandAck, EventSourcedScheduleService, ScheduleCommandService, ServiceError, ServiceResult,
};

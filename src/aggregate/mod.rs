// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Functional Schedule Aggregate
//!
//! This module provides the functional aggregate pattern for event sourcing:
//! - Aggregates are pure functions: State → Command → Result<Event, Error>
//! - State reconstruction via event folding: [Event] → State
//! - No mutations, no side effects
//! - All state changes represented as events
//!
//! # Event Sourcing Pattern
//!
//! ```text
//! Command → Aggregate → Events → Event Store
//!    ↓          ↓          ↓
//! Intent   Validation  Facts
//! ```
//!
//! # Pure Functions
//!
//! All aggregate functions follow these principles:
//! 1. **Referential Transparency**: Same input → Same output
//! 2. **No Side Effects**: No I/O, no mutation, no time
//! 3. **Explicit Dependencies**: All inputs passed as parameters
//! 4. **Immutable State**: State is immutable, return new state
//!
//! # Fold Pattern
//!
//! State is reconstructed by folding events:
//!
//! ```rust,ignore
//! let initial = ScheduleState::default_for(schedule_id);
//! let state = events.iter().fold(initial, |state, event| {
//!     apply_event(state, event)
//! });
//! ```
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use examsched_core::aggregate::*;
//!
//! // Load events from event store
//! let events = event_store.read_events(schedule_id).await?;
//!
//! // Reconstruct current state
//! let state = ScheduleState::from_events(&events);
//!
//! // Handle command (pure function)
//! let command = PublishForReviewCommand {
//!     timestamp,
//!     correlation_id,
//!     causation_id: None,
//! };
//!
//! match handle_publish_for_review(&state, command) {
//!     Ok(event) => {
//!         // Apply event to get new state
//!         let new_state = apply_event(state, &event.clone().into());
//!         // Persist event
//!         event_store.append(schedule_id, vec![event.into()], None).await?;
//!     }
//!     Err(err) => {
//!         // Handle business rule violation
//!     }
//! }
//! ```
//!
//! # Design Principles
//!
//! ## 1. Command-Event Separation
//! - Commands express intent (what should happen)
//! - Events express facts (what did happen)
//! - Commands can fail, events cannot
//!
//! ## 2. Pure Event Application
//! - `apply_event(State, Event) → State`
//! - No validation in event application (already happened)
//! - Deterministic reconstruction from events
//!
//! ## 3. Command Handlers
//! - `handle_command(State, Command) → Result<Event, Error>`
//! - All validation happens here
//! - Business rules and schedule invariants enforced
//! - Rejection emits nothing and changes nothing
//!
//! ## 4. Time as Parameter
//! - Never call `Utc::now()` in domain logic
//! - Timestamp passed explicitly in commands
//! - Enables deterministic testing
//! - Time travel for debugging
//!
//! # References
//!
//! - Greg Young: Event Sourcing
//! - Functional Event Sourcing Decider Pattern
//! - F# Domain Modeling Made Functional

pub mod commands;
pub mod handlers;
pub mod schedule;

pub use commands::*;
pub use handlers::*;
pub use schedule::{apply_event, ScheduleState};

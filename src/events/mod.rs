// Copyright (c) 2025 - Cowboy AI, Inc.
//! Schedule Domain Events
//!
//! This module defines all domain events for the exam scheduling bounded context.
//! Events are immutable facts representing state changes that have occurred.
//!
//! # Event Sourcing Principles
//!
//! 1. **Events are immutable**: Once created, events never change
//! 2. **Events are past tense**: Named for what happened (ExamAdded, not AddExam)
//! 3. **Events include metadata**: correlation_id, causation_id, timestamp
//! 4. **Events are versioned**: event_version field for schema evolution
//! 5. **Events are facts**: Represent what happened, not commands
//!
//! # Event Flow
//!
//! ```text
//! Command → Aggregate → Event → EventStore → Projections
//!   (what to do)  (validate)  (what happened)  (persist)  (update views)
//! ```
//!
//! # Correlation and Causation
//!
//! - **correlation_id**: Groups related events across a request flow (a whole
//!   generation run shares one correlation id)
//! - **causation_id**: Direct parent event that caused this event
//!
//! Example:
//! ```text
//! TriggerGeneration request
//!   correlation_id: req-123
//!   ↓
//! GenerationTriggered
//!   correlation_id: req-123
//!   causation_id: None (first event)
//!   event_id: evt-1
//!   ↓
//! ExamAdded
//!   correlation_id: req-123
//!   causation_id: evt-1
//!   event_id: evt-2
//!   ↓
//! GenerationCompleted
//!   correlation_id: req-123
//!   causation_id: evt-2
//!   event_id: evt-3
//! ```
//!
//! # Module Organization
//!
//! - [`schedule`] - Schedule aggregate events and lifecycle status
//! - [`integration`] - Notifications published for downstream consumers
//! - [`versioning`] - Event schema migration infrastructure

pub mod integration;
pub mod schedule;
pub mod versioning;

// Re-export commonly used types
pub use integration::IntegrationEvent;
pub use schedule::{
    AdjustmentApproved, AdjustmentRejected, AdjustmentRequested, AdjustmentReviewStarted,
    ChangeImpact, CommentReviewed, ExamAdded, ExamRemoved, ExamSpaceChanged, ExamTimeChanged,
    ExamsCleared, FeedbackSubmitted, FinalPublished, GenerationCompleted, GenerationFailed,
    GenerationTriggered, PreferencesCollected, PublishedForReview, ScheduleCreated, ScheduleEvent,
    ScheduleFinalized, ScheduleStatus,
};
pub use versioning::{Upcaster, UpcasterChain, UpcasterRegistry, UpcastError};

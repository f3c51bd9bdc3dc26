// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Projection System
//!
//! Projections are pure Mealy steps: `(ReadModel, Event) → (ReadModel,
//! Effects)`. Side effects are returned as data, never performed inline, so
//! replay is a plain fold and the read-model logic tests without I/O.
//!
//! # Architecture
//!
//! ```text
//! Pure Projection Step               Side Effect Executor
//! ─────────────────────────          ──────────────────────
//!
//! (ReadModel, StoredEvent)           Effects
//!      │                                  │
//!      ▼                                  ▼
//! ┌──────────────┐                  ┌──────────────┐
//! │   project()  │     Effects      │   execute()  │
//! │  pure func   │ ──────────────>  │  async I/O   │
//! └──────────────┘                  └──────────────┘
//!      │                                  │
//!      ▼                                  ▼
//! (New ReadModel, Effects)          NATS Publish / Log
//! ```
//!
//! The only effects a schedule projection produces are integration-event
//! publishes and log lines; database persistence is the synchronizer's
//! concern (read models are saved whole to a KV bucket).

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::events::IntegrationEvent;

/// Side effects produced by projections, returned as data
///
/// An executor interprets these and performs the actual I/O.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SideEffect {
    /// Publish an integration notification on its canonical subject
    Publish(IntegrationEvent),

    /// Log a message
    Log {
        /// Log level
        level: LogLevel,
        /// Message
        message: String,
    },
}

/// Log levels for logging side effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    /// Debug level
    Debug,
    /// Info level
    Info,
    /// Warning level
    Warn,
    /// Error level
    Error,
}

/// Pure projection step type
///
/// Takes the current read model and an event, returns the new read model
/// and side effects. No I/O inside.
pub type PureProjection<S, E> = fn(S, &E) -> (S, Vec<SideEffect>);

/// Fold a sequence of events through a pure projection
///
/// The fundamental operation for projections: given an initial read model
/// and a sequence of events, fold them through the step function to produce
/// the final model and all accumulated side effects.
pub fn fold_projection<S, E>(
    projection: PureProjection<S, E>,
    initial_state: S,
    events: &[E],
) -> (S, Vec<SideEffect>)
where
    S: Clone,
{
    events.iter().fold(
        (initial_state, Vec::new()),
        |(state, mut all_effects), event| {
            let (new_state, mut effects) = projection(state, event);
            all_effects.append(&mut effects);
            (new_state, all_effects)
        },
    )
}

/// Replay events through a projection to rebuild a read model
///
/// Identical to [`fold_projection`] under a name that emphasizes the
/// rebuild use case. During a replay the accumulated effects are normally
/// discarded so downstream consumers are not re-notified.
pub fn replay_projection<S, E>(
    projection: PureProjection<S, E>,
    initial_state: S,
    events: &[E],
) -> (S, Vec<SideEffect>)
where
    S: Clone,
{
    fold_projection(projection, initial_state, events)
}

/// Errors surfaced by the projection layer
///
/// Projection failures are logged and skipped, never propagated to the
/// write side; the read side lags rather than blocks.
#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    /// NATS transport error
    #[error("NATS error: {0}")]
    Nats(String),

    /// KV store error
    #[error("KV store error: {0}")]
    KvStore(String),

    /// Event store error during a rebuild
    #[error("Event store error: {0}")]
    Store(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for projection operations
pub type ProjectionResult<T> = Result<T, ProjectionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct CounterModel {
        count: i32,
        events_processed: usize,
    }

    #[derive(Clone, Debug)]
    enum CounterEvent {
        Increment,
        Reset,
    }

    fn counter_projection(
        state: CounterModel,
        event: &CounterEvent,
    ) -> (CounterModel, Vec<SideEffect>) {
        let mut effects = Vec::new();

        let new_state = match event {
            CounterEvent::Increment => {
                effects.push(SideEffect::Log {
                    level: LogLevel::Debug,
                    message: format!("incrementing from {}", state.count),
                });
                CounterModel {
                    count: state.count + 1,
                    events_processed: state.events_processed + 1,
                }
            }
            CounterEvent::Reset => {
                effects.push(SideEffect::Log {
                    level: LogLevel::Info,
                    message: "resetting counter".to_string(),
                });
                CounterModel {
                    count: 0,
                    events_processed: state.events_processed + 1,
                }
            }
        };

        (new_state, effects)
    }

    #[test]
    fn test_fold_projection_accumulates_state_and_effects() {
        let events = vec![
            CounterEvent::Increment,
            CounterEvent::Increment,
            CounterEvent::Reset,
            CounterEvent::Increment,
        ];

        let (final_state, effects) =
            fold_projection(counter_projection, CounterModel::default(), &events);

        assert_eq!(final_state.count, 1);
        assert_eq!(final_state.events_processed, 4);
        assert_eq!(effects.len(), 4);
    }

    #[test]
    fn test_projection_is_pure() {
        let initial = CounterModel::default();
        let event = CounterEvent::Increment;

        let (state1, _) = counter_projection(initial.clone(), &event);
        let (state2, _) = counter_projection(initial, &event);

        assert_eq!(state1, state2);
    }

    #[test]
    fn test_projection_composition() {
        // Folding in two batches equals folding all at once
        let first = vec![CounterEvent::Increment, CounterEvent::Increment];
        let second = vec![CounterEvent::Reset, CounterEvent::Increment];

        let (mid, _) = fold_projection(counter_projection, CounterModel::default(), &first);
        let (split_state, _) = fold_projection(counter_projection, mid, &second);

        let all: Vec<CounterEvent> = first.into_iter().chain(second).collect();
        let (whole_state, _) =
            fold_projection(counter_projection, CounterModel::default(), &all);

        assert_eq!(split_state, whole_state);
    }
}

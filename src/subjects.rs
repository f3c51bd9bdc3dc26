// Copyright (c) 2025 - Cowboy AI, Inc.

//! NATS subject hierarchy for schedule events
//!
//! Defines the semantic subject patterns used for schedule event routing.
//!
//! # Subject Pattern
//!
//! Domain events follow the hierarchical pattern:
//!
//! ```text
//! examsched.schedule.{schedule_id}.{event_type}
//! ```
//!
//! Integration notifications use their own branch:
//!
//! ```text
//! examsched.integration.{notification_type}
//! ```
//!
//! This allows for:
//! - Precise subscriptions (`examsched.schedule.<id>.exam_added`)
//! - Per-schedule wildcards (`examsched.schedule.<id>.>`)
//! - Global subscriptions (`examsched.>`)
//!
//! # Examples
//!
//! ```rust
//! use examsched_core::domain::ScheduleId;
//! use examsched_core::subjects::{schedule_event, schedule_wildcard};
//!
//! let id = ScheduleId::new();
//!
//! let subject = schedule_event(&id, "exam_added");
//! assert_eq!(subject, format!("examsched.schedule.{id}.exam_added"));
//!
//! let wildcard = schedule_wildcard(&id);
//! assert_eq!(wildcard, format!("examsched.schedule.{id}.>"));
//! ```

use std::fmt;

use uuid::Uuid;

use crate::domain::ScheduleId;

/// Root namespace for all schedule subjects
pub const EXAMSCHED_ROOT: &str = "examsched";

/// Second-level token for aggregate event subjects
pub const SCHEDULE_BRANCH: &str = "schedule";

/// Second-level token for integration notification subjects
pub const INTEGRATION_BRANCH: &str = "integration";

/// Parsed schedule event subject
///
/// The typed form of `examsched.schedule.{schedule_id}.{event_type}`,
/// convertible both ways.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSubject {
    pub schedule_id: ScheduleId,
    pub event_type: String,
}

impl ScheduleSubject {
    pub fn new(schedule_id: ScheduleId, event_type: impl Into<String>) -> Self {
        Self {
            schedule_id,
            event_type: event_type.into(),
        }
    }

    /// Parse a subject string back into its typed form
    ///
    /// Returns None for subjects outside the schedule branch, wildcards, or
    /// malformed schedule ids.
    pub fn parse(subject: &str) -> Option<Self> {
        let mut tokens = subject.split('.');
        if tokens.next() != Some(EXAMSCHED_ROOT) {
            return None;
        }
        if tokens.next() != Some(SCHEDULE_BRANCH) {
            return None;
        }
        let id_token = tokens.next()?;
        let event_type = tokens.next()?;
        if tokens.next().is_some() {
            return None;
        }

        let uuid = Uuid::parse_str(id_token).ok()?;
        Some(Self {
            schedule_id: ScheduleId::from_uuid(uuid),
            event_type: event_type.to_string(),
        })
    }
}

impl fmt::Display for ScheduleSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            EXAMSCHED_ROOT, SCHEDULE_BRANCH, self.schedule_id, self.event_type
        )
    }
}

/// Subject for one domain event of one schedule
pub fn schedule_event(schedule_id: &ScheduleId, event_type: &str) -> String {
    format!("{EXAMSCHED_ROOT}.{SCHEDULE_BRANCH}.{schedule_id}.{event_type}")
}

/// Wildcard covering every event of one schedule
pub fn schedule_wildcard(schedule_id: &ScheduleId) -> String {
    format!("{EXAMSCHED_ROOT}.{SCHEDULE_BRANCH}.{schedule_id}.>")
}

/// Wildcard covering every schedule's events
pub fn all_schedule_events() -> String {
    format!("{EXAMSCHED_ROOT}.{SCHEDULE_BRANCH}.>")
}

/// Subject for one integration notification type
pub fn integration_event(notification_type: &str) -> String {
    format!("{EXAMSCHED_ROOT}.{INTEGRATION_BRANCH}.{notification_type}")
}

/// Wildcard covering every integration notification
pub fn all_integration_events() -> String {
    format!("{EXAMSCHED_ROOT}.{INTEGRATION_BRANCH}.>")
}

/// Wildcard covering everything under the root
pub fn all_events() -> String {
    format!("{EXAMSCHED_ROOT}.>")
}

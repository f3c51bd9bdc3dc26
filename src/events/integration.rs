// Copyright (c) 2025 - Cowboy AI, Inc.
//! Integration Events for Downstream Consumers
//!
//! One notification per significant schedule transition, carrying the
//! schedule id and a minimal payload. They are published on
//! `examsched.integration.<notification_type>` subjects by the projection
//! synchronizer, with at-least-once delivery; consumers must tolerate
//! duplicates.
//!
//! Integration events are deliberately smaller than domain events: they are
//! a public contract and do not expose aggregate internals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AdjustmentId, CommentId, ProfessorId, ScheduleId};

/// Notification published for downstream consumers after a significant
/// schedule state transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "notification", rename_all = "snake_case")]
pub enum IntegrationEvent {
    /// A schedule now exists for the session period
    ScheduleCreated {
        schedule_id: ScheduleId,
        exam_session_period_id: String,
        academic_year: String,
    },

    /// Generation finished and a draft exam set is available
    ScheduleGenerated {
        schedule_id: ScheduleId,
        exams_placed: u32,
        quality_score: f64,
    },

    /// Generation failed; callers may re-trigger
    GenerationFailed {
        schedule_id: ScheduleId,
        reason: String,
    },

    /// Schedule is open for professor review until the deadline
    PublishedForReview {
        schedule_id: ScheduleId,
        review_deadline: DateTime<Utc>,
    },

    /// A professor submitted feedback
    FeedbackReceived {
        schedule_id: ScheduleId,
        comment_id: CommentId,
        professor_id: ProfessorId,
    },

    /// An adjustment request was approved
    AdjustmentApproved {
        schedule_id: ScheduleId,
        adjustment_id: AdjustmentId,
    },

    /// Schedule content is frozen
    ScheduleFinalized {
        schedule_id: ScheduleId,
        final_quality_score: Option<f64>,
    },

    /// Final schedule is visible to students
    SchedulePublished { schedule_id: ScheduleId },
}

impl IntegrationEvent {
    /// Stable notification name used as the subject suffix
    pub fn notification_type(&self) -> &'static str {
        use IntegrationEvent::*;

        match self {
            ScheduleCreated { .. } => "schedule_created",
            ScheduleGenerated { .. } => "schedule_generated",
            GenerationFailed { .. } => "generation_failed",
            PublishedForReview { .. } => "published_for_review",
            FeedbackReceived { .. } => "feedback_received",
            AdjustmentApproved { .. } => "adjustment_approved",
            ScheduleFinalized { .. } => "schedule_finalized",
            SchedulePublished { .. } => "schedule_published",
        }
    }

    /// Schedule the notification refers to
    pub fn schedule_id(&self) -> ScheduleId {
        use IntegrationEvent::*;

        match self {
            ScheduleCreated { schedule_id, .. } => *schedule_id,
            ScheduleGenerated { schedule_id, .. } => *schedule_id,
            GenerationFailed { schedule_id, .. } => *schedule_id,
            PublishedForReview { schedule_id, .. } => *schedule_id,
            FeedbackReceived { schedule_id, .. } => *schedule_id,
            AdjustmentApproved { schedule_id, .. } => *schedule_id,
            ScheduleFinalized { schedule_id, .. } => *schedule_id,
            SchedulePublished { schedule_id } => *schedule_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_serialization() {
        let id = ScheduleId::new();
        let event = IntegrationEvent::GenerationFailed {
            schedule_id: id,
            reason: "solver timed out".to_string(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["notification"], "generation_failed");
        assert_eq!(json["reason"], "solver timed out");
        assert_eq!(event.notification_type(), "generation_failed");
        assert_eq!(event.schedule_id(), id);
    }
}

// Copyright (c) 2025 - Cowboy AI, Inc.
//! Review Entities: Professor Comments and Adjustment Requests
//!
//! Both entities carry their own status lifecycle inside the aggregate.
//! Comments move SUBMITTED -> REVIEWED -> RESOLVED; adjustments move
//! REQUESTED -> UNDER_REVIEW -> APPROVED/REJECTED and approved ones become
//! APPLIED when the corresponding exam change is made.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AdjustmentId, CommentId, ProfessorId, ScheduledExamId};

/// Category of a professor comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentType {
    General,
    TimeChangeRequest,
    RoomChangeRequest,
    ConflictReport,
}

/// Review lifecycle status of a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentStatus {
    Submitted,
    Reviewed,
    Resolved,
}

impl fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommentStatus::Submitted => write!(f, "submitted"),
            CommentStatus::Reviewed => write!(f, "reviewed"),
            CommentStatus::Resolved => write!(f, "resolved"),
        }
    }
}

/// Feedback submitted by a professor during the review window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessorComment {
    /// Identifier unique within the owning schedule
    pub comment_id: CommentId,

    /// Author of the feedback
    pub professor_id: ProfessorId,

    /// Exam the feedback refers to, when exam specific
    pub scheduled_exam_id: Option<ScheduledExamId>,

    pub comment_text: String,
    pub comment_type: CommentType,
    pub status: CommentStatus,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<String>,
}

/// Category of an adjustment request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentType {
    TimeChange,
    RoomChange,
    Other,
}

/// Approval lifecycle status of an adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentStatus {
    Requested,
    UnderReview,
    Approved,
    Rejected,
    Applied,
}

impl AdjustmentStatus {
    /// True while the adjustment can still be approved or rejected
    pub fn is_actionable(&self) -> bool {
        matches!(self, AdjustmentStatus::Requested | AdjustmentStatus::UnderReview)
    }
}

impl fmt::Display for AdjustmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdjustmentStatus::Requested => write!(f, "requested"),
            AdjustmentStatus::UnderReview => write!(f, "under_review"),
            AdjustmentStatus::Approved => write!(f, "approved"),
            AdjustmentStatus::Rejected => write!(f, "rejected"),
            AdjustmentStatus::Applied => write!(f, "applied"),
        }
    }
}

/// Audit record of one requested schedule change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentLog {
    /// Identifier unique within the owning schedule
    pub adjustment_id: AdjustmentId,

    /// Comment that motivated the adjustment, if any
    pub comment_id: Option<CommentId>,

    /// Exam the adjustment targets, if exam specific
    pub scheduled_exam_id: Option<ScheduledExamId>,

    pub adjustment_type: AdjustmentType,
    pub description: String,
    pub requested_by: String,
    pub requested_at: DateTime<Utc>,

    /// Reason given on approval or rejection
    pub reason: Option<String>,

    pub status: AdjustmentStatus,

    /// Opaque before/after snapshots for auditing
    pub old_values: Option<serde_json::Value>,
    pub new_values: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjustment_actionability() {
        assert!(AdjustmentStatus::Requested.is_actionable());
        assert!(AdjustmentStatus::UnderReview.is_actionable());
        assert!(!AdjustmentStatus::Approved.is_actionable());
        assert!(!AdjustmentStatus::Rejected.is_actionable());
        assert!(!AdjustmentStatus::Applied.is_actionable());
    }
}

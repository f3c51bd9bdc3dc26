// Copyright (c) 2025 - Cowboy AI, Inc.
//! Conflict Analyzer
//!
//! Detects conflicts within one schedule's exam set. Three conflict types:
//!
//! | Type | Condition |
//! |------|-----------|
//! | Time | two exams overlap in date and time |
//! | Space | overlapping exams share a room whose capacity is exceeded |
//! | Professor | overlapping exams share at least one professor |
//!
//! Exams are bucketed by date first, then compared pairwise within each
//! bucket, so the O(n²) comparison only runs over same-day exams.
//!
//! The analysis is pure and idempotent: identical exam sets always yield
//! identical conflict lists, including conflict ids (deterministic natural
//! keys, not random), so two runs can be diffed set-wise.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{MandatoryStatus, ScheduledExam, ScheduledExamId};
use crate::events::schedule::ChangeImpact;

/// Kind of conflict between two exams
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    /// Two exams overlap in date and time
    Time,
    /// Overlapping exams share a room beyond its capacity
    Space,
    /// One professor is assigned to two overlapping exams
    Professor,
}

impl ConflictType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictType::Time => "time",
            ConflictType::Space => "space",
            ConflictType::Professor => "professor",
        }
    }
}

impl std::fmt::Display for ConflictType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity grade derived from affected students and mandatory involvement
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ConflictSeverity {
    /// Base severity from the total affected student count
    fn from_affected_students(affected: u32) -> Self {
        if affected >= 150 {
            ConflictSeverity::Critical
        } else if affected >= 75 {
            ConflictSeverity::High
        } else if affected >= 25 {
            ConflictSeverity::Medium
        } else {
            ConflictSeverity::Low
        }
    }

    /// One level up, saturating at Critical
    fn escalate(self) -> Self {
        match self {
            ConflictSeverity::Low => ConflictSeverity::Medium,
            ConflictSeverity::Medium => ConflictSeverity::High,
            ConflictSeverity::High | ConflictSeverity::Critical => ConflictSeverity::Critical,
        }
    }
}

/// Whether a detected conflict is still present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictStatus {
    Detected,
    Resolved,
}

/// One detected conflict between a pair of exams
///
/// `conflict_id` is a deterministic natural key built from the conflict
/// type and the sorted pair of exam ids, so re-running the analysis over
/// the same exam set reproduces the same ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConflict {
    pub conflict_id: String,
    pub conflict_type: ConflictType,
    pub severity: ConflictSeverity,
    pub description: String,
    pub affected_exam_ids: Vec<ScheduledExamId>,
    pub affected_students: u32,
    pub suggested_resolution: String,
    pub status: ConflictStatus,
}

/// Severity for a pair: base level from affected students, escalated one
/// level when either exam is mandatory
fn pair_severity(affected: u32, a: &ScheduledExam, b: &ScheduledExam) -> ConflictSeverity {
    let base = ConflictSeverity::from_affected_students(affected);
    if a.mandatory_status == MandatoryStatus::Mandatory
        || b.mandatory_status == MandatoryStatus::Mandatory
    {
        base.escalate()
    } else {
        base
    }
}

/// Natural key for a conflict: type plus the sorted exam id pair
fn conflict_key(conflict_type: ConflictType, a: &ScheduledExamId, b: &ScheduledExamId) -> String {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    format!("{conflict_type}:{first}:{second}")
}

fn conflicts_for_pair(a: &ScheduledExam, b: &ScheduledExam, date: NaiveDate) -> Vec<ScheduleConflict> {
    if !a.slot.overlaps(&b.slot) {
        return Vec::new();
    }

    let mut conflicts = Vec::new();
    let combined_students = a.student_count + b.student_count;
    let affected_ids = vec![a.scheduled_exam_id.clone(), b.scheduled_exam_id.clone()];

    // Any overlap is a time conflict for the students sitting both exams' cohorts
    conflicts.push(ScheduleConflict {
        conflict_id: conflict_key(ConflictType::Time, &a.scheduled_exam_id, &b.scheduled_exam_id),
        conflict_type: ConflictType::Time,
        severity: pair_severity(combined_students, a, b),
        description: format!(
            "{} and {} overlap in time on {}",
            a.course_id, b.course_id, date
        ),
        affected_exam_ids: affected_ids.clone(),
        affected_students: combined_students,
        suggested_resolution: "Move one exam to a different time slot or day".to_string(),
        status: ConflictStatus::Detected,
    });

    if let (Some(room_a), Some(room_b)) = (&a.room, &b.room) {
        if room_a.room_id == room_b.room_id && combined_students > room_a.capacity {
            conflicts.push(ScheduleConflict {
                conflict_id: conflict_key(
                    ConflictType::Space,
                    &a.scheduled_exam_id,
                    &b.scheduled_exam_id,
                ),
                conflict_type: ConflictType::Space,
                severity: pair_severity(combined_students, a, b),
                description: format!(
                    "{} and {} are both assigned room {} on {}, {} students for {} seats",
                    a.course_id, b.course_id, room_a.room_id, date, combined_students, room_a.capacity
                ),
                affected_exam_ids: affected_ids.clone(),
                affected_students: combined_students,
                suggested_resolution: "Assign one exam to a different or larger room".to_string(),
                status: ConflictStatus::Detected,
            });
        }
    }

    if a.shares_professor_with(b) {
        conflicts.push(ScheduleConflict {
            conflict_id: conflict_key(
                ConflictType::Professor,
                &a.scheduled_exam_id,
                &b.scheduled_exam_id,
            ),
            conflict_type: ConflictType::Professor,
            severity: pair_severity(combined_students, a, b),
            description: format!(
                "A professor is assigned to both {} and {} in overlapping slots on {}",
                a.course_id, b.course_id, date
            ),
            affected_exam_ids: affected_ids,
            affected_students: combined_students,
            suggested_resolution:
                "Reassign the professor or move one exam to a non-overlapping slot".to_string(),
            status: ConflictStatus::Detected,
        });
    }

    conflicts
}

/// Detect all conflicts within one schedule's exam set
///
/// Buckets exams by date, sorts each bucket by exam id, then compares each
/// same-day pair once. Output order is deterministic: ascending date, then
/// ascending exam id pair, then Time before Space before Professor.
pub fn analyze_conflicts(exams: &[ScheduledExam]) -> Vec<ScheduleConflict> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&ScheduledExam>> = BTreeMap::new();
    for exam in exams {
        by_date.entry(exam.slot.date).or_default().push(exam);
    }

    let mut conflicts = Vec::new();
    for (date, mut bucket) in by_date {
        bucket.sort_by(|a, b| a.scheduled_exam_id.cmp(&b.scheduled_exam_id));
        for i in 0..bucket.len() {
            for j in (i + 1)..bucket.len() {
                conflicts.extend(conflicts_for_pair(bucket[i], bucket[j], date));
            }
        }
    }
    conflicts
}

/// Impact of a tentative exam change, measured over the local exam set
///
/// Compares the conflict sets before and after the change. Conflict ids are
/// natural keys, so set difference gives exact resolved/created counts.
/// This is a best-effort local measure, not a global re-solve.
pub fn change_impact(
    before: &[ScheduledExam],
    after: &[ScheduledExam],
    impacted_students: u32,
) -> ChangeImpact {
    let before_keys: BTreeSet<String> = analyze_conflicts(before)
        .into_iter()
        .map(|c| c.conflict_id)
        .collect();
    let after_keys: BTreeSet<String> = analyze_conflicts(after)
        .into_iter()
        .map(|c| c.conflict_id)
        .collect();

    ChangeImpact {
        impacted_students,
        conflicts_resolved: before_keys.difference(&after_keys).count() as u32,
        conflicts_created: after_keys.difference(&before_keys).count() as u32,
    }
}

// Copyright (c) 2025 - Cowboy AI, Inc.
//! Schedule Analysis
//!
//! Pure functions over a schedule's materialized exam set:
//!
//! - [`conflict`] - detects time, space, and professor conflicts with
//!   severity grading and suggested resolutions
//! - [`quality`] - scores a schedule across five weighted dimensions and
//!   derives score trends
//!
//! Both analyses are deterministic and side-effect free. They are re-run
//! on demand (queries, projection updates) rather than incrementally
//! maintained, since exam mutations are rare relative to reads.
//!
//! ```text
//! Exam Set ──> analyze_conflicts() ──> Vec<ScheduleConflict>
//!     │
//!     └─────> SchedulingMetricsInput ──> score_schedule() ──> QualityScore
//! ```
//!
//! Nothing here touches aggregate state: the aggregate enforces its own
//! invariants at command time, and these functions grade whatever exam set
//! they are given.

pub mod conflict;
pub mod quality;

pub use conflict::{
    analyze_conflicts, change_impact, ConflictSeverity, ConflictStatus, ConflictType,
    ScheduleConflict,
};
pub use quality::{
    score_schedule, trend_direction, DimensionScores, QualityScore, QualityWeights,
    QualityWeightsError, ScoreBreakdown, SchedulingMetricsInput, TrendDirection,
};

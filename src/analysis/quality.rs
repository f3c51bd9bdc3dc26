// Copyright (c) 2025 - Cowboy AI, Inc.
//! Quality Scorer
//!
//! Scores a schedule across five weighted dimensions:
//!
//! | Dimension | Measures |
//! |-----------|----------|
//! | Preference satisfaction | honored professor preferences / total |
//! | Conflict minimization | conflict load relative to exam count |
//! | Resource utilization | seated students / assigned room capacity |
//! | Workload balance | lightest vs heaviest student exam day |
//! | Policy compliance | passed institutional policy checks / total |
//!
//! The scorer is a pure, deterministic function of its input and weights.
//! Per-day loads use a `BTreeMap` so floating-point summation order is
//! fixed: identical inputs and weights yield bit-identical scores, which
//! keeps historical comparison and version diffing well-defined.
//!
//! A schedule's final quality score is a snapshot taken once at
//! finalization and never recomputed, even if later metrics change. That
//! permanence is the read model's rule; this module only computes.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analysis::conflict::{ConflictSeverity, ScheduleConflict};
use crate::domain::ScheduledExam;

/// Score change considered noise when comparing against history
const TREND_EPSILON: f64 = 0.02;

/// Tolerance for the weight-sum check
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Dimension scores below this threshold produce a recommendation
const RECOMMENDATION_THRESHOLD: f64 = 0.5;

/// Invalid weight configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QualityWeightsError {
    #[error("Weight {dimension} is {value}, must be within [0, 1]")]
    WeightOutOfRange { dimension: &'static str, value: f64 },

    #[error("Weights sum to {sum}, must sum to 1.0")]
    WeightsDoNotSumToOne { sum: f64 },
}

/// Weight vector across the five quality dimensions
///
/// Weights must each lie in [0, 1] and sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityWeights {
    pub preference_satisfaction: f64,
    pub conflict_minimization: f64,
    pub resource_utilization: f64,
    pub workload_balance: f64,
    pub policy_compliance: f64,
}

impl Default for QualityWeights {
    fn default() -> Self {
        Self {
            preference_satisfaction: 0.30,
            conflict_minimization: 0.25,
            resource_utilization: 0.15,
            workload_balance: 0.15,
            policy_compliance: 0.15,
        }
    }
}

impl QualityWeights {
    /// Check every weight is within [0, 1] and the sum is 1.0
    pub fn validate(&self) -> Result<(), QualityWeightsError> {
        let named = [
            ("preference_satisfaction", self.preference_satisfaction),
            ("conflict_minimization", self.conflict_minimization),
            ("resource_utilization", self.resource_utilization),
            ("workload_balance", self.workload_balance),
            ("policy_compliance", self.policy_compliance),
        ];
        for (dimension, value) in named {
            if !(0.0..=1.0).contains(&value) {
                return Err(QualityWeightsError::WeightOutOfRange { dimension, value });
            }
        }

        let sum: f64 = named.iter().map(|(_, v)| v).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(QualityWeightsError::WeightsDoNotSumToOne { sum });
        }
        Ok(())
    }
}

/// Raw scheduling metrics the scorer consumes
///
/// Per-day loads are keyed by date in a `BTreeMap` so iteration order is
/// deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SchedulingMetricsInput {
    pub total_preferences: u32,
    pub satisfied_preferences: u32,
    pub total_conflicts: u32,
    pub critical_conflicts: u32,
    pub total_exams: u32,
    /// Students seated in assigned rooms
    pub seated_students: u32,
    /// Sum of assigned room capacities
    pub assigned_capacity: u32,
    /// Students sitting exams per day
    pub daily_student_load: BTreeMap<NaiveDate, u32>,
    pub policy_checks: u32,
    pub policy_violations: u32,
}

impl SchedulingMetricsInput {
    /// Derive metrics from an exam set and its detected conflicts
    ///
    /// Preference and policy totals come from the caller; everything
    /// measurable from the exam set is computed here.
    pub fn from_exams(
        exams: &[ScheduledExam],
        conflicts: &[ScheduleConflict],
        total_preferences: u32,
        satisfied_preferences: u32,
        policy_checks: u32,
        policy_violations: u32,
    ) -> Self {
        let mut daily_student_load: BTreeMap<NaiveDate, u32> = BTreeMap::new();
        let mut seated_students = 0;
        let mut assigned_capacity = 0;

        for exam in exams {
            *daily_student_load.entry(exam.slot.date).or_insert(0) += exam.student_count;
            if let Some(room) = &exam.room {
                seated_students += exam.student_count;
                assigned_capacity += room.capacity;
            }
        }

        Self {
            total_preferences,
            satisfied_preferences,
            total_conflicts: conflicts.len() as u32,
            critical_conflicts: conflicts
                .iter()
                .filter(|c| c.severity == ConflictSeverity::Critical)
                .count() as u32,
            total_exams: exams.len() as u32,
            seated_students,
            assigned_capacity,
            daily_student_load,
            policy_checks,
            policy_violations,
        }
    }
}

/// Per-dimension sub-scores, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionScores {
    pub preference_satisfaction: f64,
    pub conflict_minimization: f64,
    pub resource_utilization: f64,
    pub workload_balance: f64,
    pub policy_compliance: f64,
}

/// Supporting totals and recommendations behind a score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub total_preferences: u32,
    pub satisfied_preferences: u32,
    pub total_conflicts: u32,
    pub critical_conflicts: u32,
    pub total_exams: u32,
    /// One deterministic recommendation per dimension scoring under 0.5
    pub recommendations: Vec<String>,
}

/// Weighted overall score with its dimensions and breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityScore {
    /// Weighted overall score in [0, 1]
    pub overall: f64,
    pub dimensions: DimensionScores,
    pub breakdown: ScoreBreakdown,
}

/// Direction of a schedule's score history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
}

fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Ratio with a vacuous-truth default when the denominator is zero
fn ratio_or(numerator: u32, denominator: u32, when_empty: f64) -> f64 {
    if denominator == 0 {
        when_empty
    } else {
        f64::from(numerator) / f64::from(denominator)
    }
}

/// Score a schedule from its metrics and a weight configuration
///
/// Dimension formulas:
/// - preference satisfaction: satisfied / total (1.0 when none recorded)
/// - conflict minimization: 1 - (conflicts + critical conflicts) / exams,
///   critical conflicts counting double (1.0 when no exams)
/// - resource utilization: seated / capacity (0.0 when no rooms assigned)
/// - workload balance: lightest day / heaviest day (1.0 for one day or none)
/// - policy compliance: 1 - violations / checks (1.0 when no checks)
///
/// All dimension scores and the weighted overall are clamped to [0, 1].
pub fn score_schedule(input: &SchedulingMetricsInput, weights: &QualityWeights) -> QualityScore {
    let preference_satisfaction = clamp_unit(ratio_or(
        input.satisfied_preferences,
        input.total_preferences,
        1.0,
    ));

    let conflict_minimization = if input.total_exams == 0 {
        1.0
    } else {
        let penalty = f64::from(input.total_conflicts + input.critical_conflicts)
            / f64::from(input.total_exams);
        clamp_unit(1.0 - penalty)
    };

    let resource_utilization = clamp_unit(ratio_or(
        input.seated_students,
        input.assigned_capacity,
        0.0,
    ));

    let workload_balance = match (
        input.daily_student_load.values().min(),
        input.daily_student_load.values().max(),
    ) {
        (Some(&min), Some(&max)) if max > 0 && input.daily_student_load.len() > 1 => {
            clamp_unit(f64::from(min) / f64::from(max))
        }
        _ => 1.0,
    };

    let policy_compliance = clamp_unit(1.0 - ratio_or(input.policy_violations, input.policy_checks, 0.0));

    let dimensions = DimensionScores {
        preference_satisfaction,
        conflict_minimization,
        resource_utilization,
        workload_balance,
        policy_compliance,
    };

    let overall = clamp_unit(
        weights.preference_satisfaction * preference_satisfaction
            + weights.conflict_minimization * conflict_minimization
            + weights.resource_utilization * resource_utilization
            + weights.workload_balance * workload_balance
            + weights.policy_compliance * policy_compliance,
    );

    let mut recommendations = Vec::new();
    if preference_satisfaction < RECOMMENDATION_THRESHOLD {
        recommendations.push(
            "Preference satisfaction is low, review professor preference coverage".to_string(),
        );
    }
    if conflict_minimization < RECOMMENDATION_THRESHOLD {
        recommendations
            .push("Unresolved conflicts weigh heavily, adjust the affected exams".to_string());
    }
    if resource_utilization < RECOMMENDATION_THRESHOLD {
        recommendations
            .push("Room utilization is low, consolidate exams into fewer rooms".to_string());
    }
    if workload_balance < RECOMMENDATION_THRESHOLD {
        recommendations.push(
            "Student exam load is uneven, spread exams more evenly across the period".to_string(),
        );
    }
    if policy_compliance < RECOMMENDATION_THRESHOLD {
        recommendations
            .push("Policy violations detected, resolve them before finalizing".to_string());
    }

    QualityScore {
        overall,
        dimensions,
        breakdown: ScoreBreakdown {
            total_preferences: input.total_preferences,
            satisfied_preferences: input.satisfied_preferences,
            total_conflicts: input.total_conflicts,
            critical_conflicts: input.critical_conflicts,
            total_exams: input.total_exams,
            recommendations,
        },
    }
}

/// Trend of a recorded score history: the latest score against the mean of
/// everything before it, with changes under 0.02 treated as stable
///
/// Fewer than two recorded scores is always Stable.
pub fn trend_direction(scores: &[f64]) -> TrendDirection {
    if scores.len() < 2 {
        return TrendDirection::Stable;
    }

    let (prior, last) = scores.split_at(scores.len() - 1);
    let prior_mean: f64 = prior.iter().sum::<f64>() / prior.len() as f64;
    let delta = last[0] - prior_mean;

    if delta > TREND_EPSILON {
        TrendDirection::Improving
    } else if delta < -TREND_EPSILON {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> SchedulingMetricsInput {
        SchedulingMetricsInput {
            total_preferences: 10,
            satisfied_preferences: 8,
            total_conflicts: 0,
            critical_conflicts: 0,
            total_exams: 4,
            seated_students: 180,
            assigned_capacity: 200,
            daily_student_load: BTreeMap::from([
                (NaiveDate::from_ymd_opt(2025, 1, 16).unwrap(), 90),
                (NaiveDate::from_ymd_opt(2025, 1, 17).unwrap(), 90),
            ]),
            policy_checks: 5,
            policy_violations: 0,
        }
    }

    #[test]
    fn test_default_weights_are_valid() {
        assert!(QualityWeights::default().validate().is_ok());
    }

    #[test]
    fn test_weight_out_of_range_rejected() {
        let weights = QualityWeights {
            preference_satisfaction: 1.2,
            conflict_minimization: -0.2,
            resource_utilization: 0.0,
            workload_balance: 0.0,
            policy_compliance: 0.0,
        };

        assert!(matches!(
            weights.validate().unwrap_err(),
            QualityWeightsError::WeightOutOfRange { .. }
        ));
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let weights = QualityWeights {
            preference_satisfaction: 0.5,
            conflict_minimization: 0.5,
            resource_utilization: 0.5,
            workload_balance: 0.0,
            policy_compliance: 0.0,
        };

        assert!(matches!(
            weights.validate().unwrap_err(),
            QualityWeightsError::WeightsDoNotSumToOne { .. }
        ));
    }

    #[test]
    fn test_clean_schedule_scores_high() {
        // Arrange
        let input = metrics();

        // Act
        let score = score_schedule(&input, &QualityWeights::default());

        // Assert
        assert!((score.dimensions.preference_satisfaction - 0.8).abs() < 1e-10);
        assert!((score.dimensions.conflict_minimization - 1.0).abs() < 1e-10);
        assert!((score.dimensions.resource_utilization - 0.9).abs() < 1e-10);
        assert!((score.dimensions.workload_balance - 1.0).abs() < 1e-10);
        assert!((score.dimensions.policy_compliance - 1.0).abs() < 1e-10);
        // 0.30*0.8 + 0.25*1.0 + 0.15*0.9 + 0.15*1.0 + 0.15*1.0
        assert!((score.overall - 0.925).abs() < 1e-10);
        assert!(score.breakdown.recommendations.is_empty());
    }

    #[test]
    fn test_critical_conflicts_count_double() {
        // Arrange - 4 exams, 2 conflicts of which 1 critical
        let mut input = metrics();
        input.total_conflicts = 2;
        input.critical_conflicts = 1;

        // Act
        let score = score_schedule(&input, &QualityWeights::default());

        // Assert - penalty (2 + 1) / 4
        assert!((score.dimensions.conflict_minimization - 0.25).abs() < 1e-10);
    }

    #[test]
    fn test_low_dimensions_produce_recommendations() {
        // Arrange - conflicts everywhere, nothing satisfied
        let mut input = metrics();
        input.satisfied_preferences = 1;
        input.total_conflicts = 4;
        input.critical_conflicts = 2;
        input.policy_violations = 4;

        // Act
        let score = score_schedule(&input, &QualityWeights::default());

        // Assert - preference, conflict, and policy dimensions fall under 0.5
        assert_eq!(score.breakdown.recommendations.len(), 3);
    }

    #[test]
    fn test_empty_schedule_scores_vacuously() {
        // Arrange
        let input = SchedulingMetricsInput::default();

        // Act
        let score = score_schedule(&input, &QualityWeights::default());

        // Assert - rates default to 1.0, utilization to 0.0
        assert!((score.dimensions.preference_satisfaction - 1.0).abs() < 1e-10);
        assert!((score.dimensions.conflict_minimization - 1.0).abs() < 1e-10);
        assert!((score.dimensions.resource_utilization - 0.0).abs() < 1e-10);
        assert!((score.dimensions.workload_balance - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let input = metrics();
        let weights = QualityWeights::default();

        let first = score_schedule(&input, &weights);
        let second = score_schedule(&input, &weights);

        // Bit-identical, not approximately equal
        assert_eq!(first.overall.to_bits(), second.overall.to_bits());
        assert_eq!(first, second);
    }

    #[test]
    fn test_trend_improving() {
        assert_eq!(
            trend_direction(&[0.6, 0.62, 0.8]),
            TrendDirection::Improving
        );
    }

    #[test]
    fn test_trend_declining() {
        assert_eq!(
            trend_direction(&[0.8, 0.82, 0.6]),
            TrendDirection::Declining
        );
    }

    #[test]
    fn test_trend_stable_within_epsilon() {
        assert_eq!(
            trend_direction(&[0.80, 0.80, 0.81]),
            TrendDirection::Stable
        );
    }

    #[test]
    fn test_trend_needs_two_scores() {
        assert_eq!(trend_direction(&[]), TrendDirection::Stable);
        assert_eq!(trend_direction(&[0.9]), TrendDirection::Stable);
    }
}

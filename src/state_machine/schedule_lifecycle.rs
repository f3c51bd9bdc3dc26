// Copyright (c) 2025 - Cowboy AI, Inc.
//! Schedule Lifecycle State Machine
//!
//! Formal FSM implementation for the exam schedule lifecycle.
//! Uses the generic StateMachine trait from parent module.
//!
//! # State Machine Type
//!
//! This is a **Mealy Machine**: outputs depend on both state and input.
//!
//! # States
//!
//! - Draft: Initial shell, exams may be placed manually
//! - PreferencesCollected: Professor preferences gathered
//! - Generating: Automated generation in flight
//! - Generated: Draft timetable produced
//! - PublishedForReview: Visible to professors, review window open
//! - UnderReview: Feedback received, adjustments in progress
//! - Finalized: Content frozen by the planner
//! - Published: Visible to students (terminal)
//!
//! # Inputs (Lifecycle Commands)
//!
//! - CollectPreferences: Draft → PreferencesCollected
//! - BeginGeneration: Draft | PreferencesCollected → Generating
//! - CompleteGeneration: Generating → Generated
//! - FailGeneration: Generating → pre-trigger status
//! - PublishForReview: Generated → PublishedForReview
//! - ReceiveFeedback: PublishedForReview → UnderReview (later feedback keeps UnderReview)
//! - Finalize: UnderReview → Finalized
//! - PublishFinal: Finalized → Published
//!
//! # Outputs
//!
//! - Warnings for state-specific constraints
//! - Metadata about transition

use super::{StateMachine, TransitionError, TransitionResult};
use crate::events::ScheduleStatus;

/// Lifecycle command (FSM input)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleLifecycleCommand {
    /// Record that professor preferences are in
    CollectPreferences,

    /// Start automated schedule generation
    BeginGeneration,

    /// Generation produced a timetable
    CompleteGeneration,

    /// Generation failed, fall back to the status held before triggering
    FailGeneration { restore_to: ScheduleStatus },

    /// Open the professor review window
    PublishForReview,

    /// Professor feedback arrived
    ReceiveFeedback,

    /// Planner freezes the schedule content
    Finalize,

    /// Release the finalized schedule to students
    PublishFinal,

    /// Stay in current state (idempotent update)
    Touch,
}

impl ScheduleLifecycleCommand {
    /// Human-readable target description, used in error messages
    fn target_name(&self) -> &'static str {
        use ScheduleLifecycleCommand::*;

        match self {
            CollectPreferences => "preferences_collected",
            BeginGeneration => "generating",
            CompleteGeneration => "generated",
            FailGeneration { .. } => "pre-generation status",
            PublishForReview => "published_for_review",
            ReceiveFeedback => "under_review",
            Finalize => "finalized",
            PublishFinal => "published",
            Touch => "current state",
        }
    }
}

/// Transition output with metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionOutput {
    /// Warnings generated during transition
    pub warnings: Vec<String>,

    /// Whether this is a critical transition
    pub is_critical: bool,
}

impl TransitionOutput {
    /// Create output with no warnings
    pub fn ok() -> Self {
        Self {
            warnings: Vec::new(),
            is_critical: false,
        }
    }

    /// Create output with warnings
    pub fn with_warnings(warnings: Vec<String>) -> Self {
        Self {
            warnings,
            is_critical: false,
        }
    }

    /// Create output for critical transition
    pub fn critical(warnings: Vec<String>) -> Self {
        Self {
            warnings,
            is_critical: true,
        }
    }
}

impl StateMachine for ScheduleStatus {
    type Input = ScheduleLifecycleCommand;
    type Output = TransitionOutput;

    fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)> {
        use ScheduleLifecycleCommand::*;
        use ScheduleStatus::*;

        // Idempotent no-op is valid from every state
        if matches!(input, Touch) {
            return Ok((*self, TransitionOutput::ok()));
        }

        match (self, input) {
            // Draft transitions
            (Draft, CollectPreferences) => Ok((PreferencesCollected, TransitionOutput::ok())),
            (Draft, BeginGeneration) => Ok((
                Generating,
                TransitionOutput::with_warnings(vec![
                    "Generating without collected professor preferences".to_string(),
                ]),
            )),

            // PreferencesCollected transitions
            (PreferencesCollected, BeginGeneration) => Ok((Generating, TransitionOutput::ok())),
            (PreferencesCollected, CollectPreferences) => Err(
                TransitionError::BusinessRuleViolation("Preferences already collected".to_string()),
            ),

            // Generating transitions
            (Generating, CompleteGeneration) => Ok((Generated, TransitionOutput::ok())),
            (Generating, FailGeneration { restore_to }) => match restore_to {
                Draft | PreferencesCollected => Ok((
                    *restore_to,
                    TransitionOutput::critical(vec![format!(
                        "Generation failed, schedule restored to {}",
                        restore_to
                    )]),
                )),
                other => Err(TransitionError::BusinessRuleViolation(format!(
                    "Generation failure cannot restore to {}",
                    other
                ))),
            },
            (Generating, BeginGeneration) => Err(TransitionError::BusinessRuleViolation(
                "Generation already in progress".to_string(),
            )),

            // Generated transitions
            (Generated, PublishForReview) => Ok((PublishedForReview, TransitionOutput::ok())),

            // Review transitions
            (PublishedForReview, ReceiveFeedback) => Ok((UnderReview, TransitionOutput::ok())),
            (UnderReview, ReceiveFeedback) => Ok((UnderReview, TransitionOutput::ok())),
            (UnderReview, Finalize) => Ok((Finalized, TransitionOutput::ok())),

            // Finalized transitions
            (Finalized, PublishFinal) => Ok((
                Published,
                TransitionOutput::critical(vec![
                    "Published schedules are immutable".to_string(),
                ]),
            )),

            // Published is terminal
            (Published, _) => Err(TransitionError::InvalidTransition {
                from: "published".to_string(),
                to: "any state".to_string(),
            }),

            // Everything else is an invalid edge
            (state, input) => Err(TransitionError::InvalidTransition {
                from: state.to_string(),
                to: input.target_name().to_string(),
            }),
        }
    }

    fn valid_inputs(&self) -> Vec<Self::Input> {
        use ScheduleLifecycleCommand::*;
        use ScheduleStatus::*;

        match self {
            Draft => vec![CollectPreferences, BeginGeneration, Touch],
            PreferencesCollected => vec![BeginGeneration, Touch],
            Generating => vec![
                CompleteGeneration,
                FailGeneration { restore_to: Draft },
                FailGeneration {
                    restore_to: PreferencesCollected,
                },
                Touch,
            ],
            Generated => vec![PublishForReview, Touch],
            PublishedForReview => vec![ReceiveFeedback, Touch],
            UnderReview => vec![ReceiveFeedback, Finalize, Touch],
            Finalized => vec![PublishFinal, Touch],
            Published => vec![Touch],
        }
    }
}

/// Helper to check if transition is allowed
pub fn is_valid_schedule_transition(from: ScheduleStatus, to: ScheduleStatus) -> bool {
    from.can_transition_to(&to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::StateMachineWithHistory;
    use chrono::Utc;

    #[test]
    fn test_draft_to_preferences_collected() {
        let state = ScheduleStatus::Draft;
        let (new_state, output) = state
            .transition(&ScheduleLifecycleCommand::CollectPreferences)
            .expect("Transition should succeed");

        assert_eq!(new_state, ScheduleStatus::PreferencesCollected);
        assert!(!output.is_critical);
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_draft_generation_warns_about_missing_preferences() {
        let state = ScheduleStatus::Draft;
        let (new_state, output) = state
            .transition(&ScheduleLifecycleCommand::BeginGeneration)
            .expect("Transition should succeed");

        assert_eq!(new_state, ScheduleStatus::Generating);
        assert!(!output.is_critical);
        assert!(!output.warnings.is_empty());
    }

    #[test]
    fn test_generation_failure_restores_pre_trigger_status() {
        let state = ScheduleStatus::Generating;

        for restore_to in [
            ScheduleStatus::Draft,
            ScheduleStatus::PreferencesCollected,
        ] {
            let (new_state, output) = state
                .transition(&ScheduleLifecycleCommand::FailGeneration { restore_to })
                .expect("Transition should succeed");

            assert_eq!(new_state, restore_to);
            assert!(output.is_critical);
            assert!(!output.warnings.is_empty());
        }
    }

    #[test]
    fn test_generation_failure_rejects_forward_restore() {
        let state = ScheduleStatus::Generating;
        let result = state.transition(&ScheduleLifecycleCommand::FailGeneration {
            restore_to: ScheduleStatus::Generated,
        });

        assert!(matches!(
            result.unwrap_err(),
            TransitionError::BusinessRuleViolation(_)
        ));
    }

    #[test]
    fn test_feedback_is_idempotent_under_review() {
        let state = ScheduleStatus::PublishedForReview;
        let (state, _) = state
            .transition(&ScheduleLifecycleCommand::ReceiveFeedback)
            .expect("First feedback should open the review");
        assert_eq!(state, ScheduleStatus::UnderReview);

        // Later feedback does not move the status any further
        let (state, _) = state
            .transition(&ScheduleLifecycleCommand::ReceiveFeedback)
            .expect("Later feedback should be accepted");
        assert_eq!(state, ScheduleStatus::UnderReview);
    }

    #[test]
    fn test_published_is_terminal() {
        let state = ScheduleStatus::Published;

        let result = state.transition(&ScheduleLifecycleCommand::BeginGeneration);
        assert!(result.is_err());

        let result = state.transition(&ScheduleLifecycleCommand::Finalize);
        assert!(result.is_err());

        // Idempotent update still allowed
        let (new_state, _) = state
            .transition(&ScheduleLifecycleCommand::Touch)
            .expect("Touch should always succeed");
        assert_eq!(new_state, ScheduleStatus::Published);
    }

    #[test]
    fn test_publishing_final_is_critical() {
        let state = ScheduleStatus::Finalized;
        let (new_state, output) = state
            .transition(&ScheduleLifecycleCommand::PublishFinal)
            .expect("Transition should succeed");

        assert_eq!(new_state, ScheduleStatus::Published);
        assert!(output.is_critical);
    }

    #[test]
    fn test_touch_is_idempotent_everywhere() {
        let states = vec![
            ScheduleStatus::Draft,
            ScheduleStatus::PreferencesCollected,
            ScheduleStatus::Generating,
            ScheduleStatus::Generated,
            ScheduleStatus::PublishedForReview,
            ScheduleStatus::UnderReview,
            ScheduleStatus::Finalized,
            ScheduleStatus::Published,
        ];

        for state in states {
            let (new_state, _) = state
                .transition(&ScheduleLifecycleCommand::Touch)
                .expect("Touch should always succeed");
            assert_eq!(new_state, state);
        }
    }

    #[test]
    fn test_invalid_draft_to_finalized() {
        let state = ScheduleStatus::Draft;
        let result = state.transition(&ScheduleLifecycleCommand::Finalize);

        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            TransitionError::InvalidTransition { .. }
        ));
    }

    #[test]
    fn test_valid_inputs() {
        // Draft allows both collection and direct generation
        let inputs = ScheduleStatus::Draft.valid_inputs();
        assert!(inputs.len() > 2);

        // Published has only Touch
        let inputs = ScheduleStatus::Published.valid_inputs();
        assert_eq!(inputs, vec![ScheduleLifecycleCommand::Touch]);
    }

    #[test]
    fn test_fsm_agrees_with_transition_matrix() {
        // Every successful FSM edge must be accepted by can_transition_to
        let states = [
            ScheduleStatus::Draft,
            ScheduleStatus::PreferencesCollected,
            ScheduleStatus::Generating,
            ScheduleStatus::Generated,
            ScheduleStatus::PublishedForReview,
            ScheduleStatus::UnderReview,
            ScheduleStatus::Finalized,
            ScheduleStatus::Published,
        ];

        for state in states {
            for input in state.valid_inputs() {
                let (target, _) = state
                    .transition(&input)
                    .expect("valid_inputs must only list accepted inputs");
                assert!(
                    is_valid_schedule_transition(state, target),
                    "{} -> {} accepted by FSM but rejected by matrix",
                    state,
                    target
                );
            }
        }
    }

    #[test]
    fn test_full_lifecycle_with_history() {
        let mut fsm = StateMachineWithHistory::new(ScheduleStatus::Draft);

        let path = vec![
            ScheduleLifecycleCommand::CollectPreferences,
            ScheduleLifecycleCommand::BeginGeneration,
            ScheduleLifecycleCommand::CompleteGeneration,
            ScheduleLifecycleCommand::PublishForReview,
            ScheduleLifecycleCommand::ReceiveFeedback,
            ScheduleLifecycleCommand::Finalize,
            ScheduleLifecycleCommand::PublishFinal,
        ];

        for input in path {
            fsm.transition_with_history(input, Utc::now())
                .expect("Happy path transition should succeed");
        }

        assert_eq!(*fsm.current_state(), ScheduleStatus::Published);
        assert_eq!(fsm.get_history().len(), 7);
        assert_eq!(fsm.get_history()[0].from, ScheduleStatus::Draft);
    }
}

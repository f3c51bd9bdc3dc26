// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests
//!
//! Uses proptest to verify the algebraic properties the event-sourced
//! core relies on: fold/replay equivalence, snapshot+tail equivalence,
//! rejection without state change, scorer determinism, and projection
//! idempotence under redelivery.

mod fixtures;

use proptest::prelude::*;

use examsched_core::aggregate::CommandError;
use examsched_core::aggregate::handlers::*;
use examsched_core::aggregate::{apply_event, ScheduleState};
use examsched_core::analysis::{analyze_conflicts, score_schedule, QualityWeights, SchedulingMetricsInput};
use examsched_core::events::{ScheduleEvent, ScheduleStatus};
use examsched_core::jetstream::StoredEvent;
use examsched_core::projection::{project_schedule_event, ScheduleReadModel};

use fixtures::*;

/// Wrap a domain event in the stored envelope at the given sequence
fn stored(event: ScheduleEvent, sequence: u64) -> StoredEvent<ScheduleEvent> {
    StoredEvent {
        event_id: event.event_id(),
        schedule_id: event.schedule_id(),
        sequence,
        timestamp: event.timestamp(),
        correlation_id: event.correlation_id(),
        causation_id: event.causation_id(),
        event_type: event.event_type().to_string(),
        event_version: event.event_version(),
        data: event,
        metadata: None,
    }
}

/// Freshly created schedule state plus its creation event
fn created() -> (ScheduleState, Vec<ScheduleEvent>) {
    let initial = ScheduleState::default_for(examsched_core::ScheduleId::new());
    let event = handle_create_schedule(&initial, create_schedule_command(), initial.id).unwrap();
    let event = ScheduleEvent::ScheduleCreated(event);
    let state = apply_event(initial, &event);
    (state, vec![event])
}

/// Apply a coded command if the current state admits it
///
/// Codes cycle through the lifecycle so random sequences exercise both
/// accepted and rejected paths. Rejections contribute no events.
fn step(state: ScheduleState, code: u8, value: u32) -> (ScheduleState, Vec<ScheduleEvent>) {
    let produced: Result<Vec<ScheduleEvent>, CommandError> = match code % 6 {
        0 => handle_complete_preference_collection(&state, complete_preferences_command(value))
            .map(|e| vec![ScheduleEvent::PreferencesCollected(e)]),
        1 => handle_trigger_generation(&state, trigger_generation_command("planner-1"))
            .map(|e| vec![ScheduleEvent::GenerationTriggered(e)]),
        2 => handle_apply_generated_schedule(
            &state,
            apply_generated_schedule_command(vec![cs101(), phys110()]),
        ),
        3 => handle_publish_for_review(&state, publish_for_review_command())
            .map(|e| vec![ScheduleEvent::PublishedForReview(e)]),
        4 => handle_submit_feedback(
            &state,
            submit_feedback_command(&format!("comment-{value}"), "prof-CS101"),
        )
        .map(|e| vec![ScheduleEvent::FeedbackSubmitted(e)]),
        _ => handle_finalize(&state, finalize_command())
            .map(|e| vec![ScheduleEvent::ScheduleFinalized(e)]),
    };

    match produced {
        Ok(events) => {
            let state = events.iter().fold(state, apply_event);
            (state, events)
        }
        Err(_) => (state, Vec::new()),
    }
}

const ALL_STATUSES: [ScheduleStatus; 8] = [
    ScheduleStatus::Draft,
    ScheduleStatus::PreferencesCollected,
    ScheduleStatus::Generating,
    ScheduleStatus::Generated,
    ScheduleStatus::PublishedForReview,
    ScheduleStatus::UnderReview,
    ScheduleStatus::Finalized,
    ScheduleStatus::Published,
];

proptest! {
    /// `from_events` always equals the incrementally maintained state,
    /// and the version equals the number of applied events.
    #[test]
    fn prop_replay_matches_incremental_fold(
        codes in prop::collection::vec((0u8..6, 1u32..100), 0..12)
    ) {
        let (mut state, mut events) = created();

        for (code, value) in codes {
            let (next, produced) = step(state, code, value);
            state = next;
            events.extend(produced);
        }

        let replayed = ScheduleState::from_events(&events);
        prop_assert_eq!(&replayed, &state);
        prop_assert_eq!(state.version, events.len() as u64);
    }

    /// Snapshot + tail replay loads the same state as a full replay,
    /// wherever the stream is cut.
    #[test]
    fn prop_snapshot_tail_equals_full_replay(
        codes in prop::collection::vec((0u8..6, 1u32..100), 1..12),
        cut_seed in 0usize..64
    ) {
        let (mut state, mut events) = created();
        for (code, value) in codes {
            let (next, produced) = step(state, code, value);
            state = next;
            events.extend(produced);
        }

        let cut = 1 + cut_seed % events.len();
        let (head, tail) = events.split_at(cut);

        let snapshot = ScheduleState::from_events(head);
        let resumed = ScheduleState::from_snapshot(snapshot, tail);

        prop_assert_eq!(resumed, ScheduleState::from_events(&events));
    }

    /// TriggerGeneration outside its allowed states is rejected with a
    /// transition error naming the current state, and produces nothing.
    #[test]
    fn prop_trigger_rejected_outside_allowed_states(status_seed in 0usize..8) {
        let (mut state, _) = created();
        let status = ALL_STATUSES[status_seed];
        state.status = status;

        let before = state.clone();
        let result = handle_trigger_generation(&state, trigger_generation_command("planner-1"));

        let allowed = [ScheduleStatus::Draft, ScheduleStatus::PreferencesCollected];
        if allowed.contains(&status) {
            prop_assert!(result.is_ok());
        } else {
            match result {
                Err(CommandError::InvalidStateTransition { current, allowed, .. }) => {
                    prop_assert_eq!(current, status);
                    prop_assert!(allowed.contains(&ScheduleStatus::Draft));
                }
                other => prop_assert!(false, "expected transition error, got {:?}", other),
            }
        }

        // Handlers never mutate the state they validate against
        prop_assert_eq!(state, before);
    }

    /// Adjustments accept a decision only while still Requested or
    /// UnderReview; decided or applied adjustments reject both verdicts.
    #[test]
    fn prop_adjustment_decision_requires_actionable_status(
        status_seed in 0usize..5,
        approve in proptest::bool::ANY
    ) {
        use examsched_core::domain::AdjustmentStatus;

        let adjustment_status = [
            AdjustmentStatus::Requested,
            AdjustmentStatus::UnderReview,
            AdjustmentStatus::Approved,
            AdjustmentStatus::Rejected,
            AdjustmentStatus::Applied,
        ][status_seed];

        // Drive the schedule into review with one open adjustment
        let (mut state, _) = created();
        for code in [0u8, 1, 2, 3, 4] {
            let (next, _) = step(state, code, 1);
            state = next;
        }
        let event = handle_request_adjustment(
            &state,
            request_adjustment_command("adj-1", None),
        ).unwrap();
        let mut state = apply_event(state, &ScheduleEvent::AdjustmentRequested(event));

        let adjustment_id = examsched_core::domain::AdjustmentId::new("adj-1").unwrap();
        state
            .adjustments
            .get_mut(&adjustment_id)
            .unwrap()
            .status = adjustment_status;

        let before = state.clone();
        let result = if approve {
            handle_approve_adjustment(&state, approve_adjustment_command("adj-1")).map(|_| ())
        } else {
            handle_reject_adjustment(&state, reject_adjustment_command("adj-1")).map(|_| ())
        };

        if adjustment_status.is_actionable() {
            prop_assert!(result.is_ok());
        } else {
            prop_assert!(
                matches!(result, Err(CommandError::AdjustmentNotActionable { .. })),
                "expected AdjustmentNotActionable, got {:?}",
                result
            );
        }
        prop_assert_eq!(state, before);
    }

    /// Two overlapping exams on the same date can never coexist.
    #[test]
    fn prop_overlapping_add_exam_rejected(
        start_a in 8u32..16, len_a in 1u32..4,
        offset in 0u32..3
    ) {
        let (state, _) = created();
        let date = exam_date();

        let first = exam("exam-a", "CS101", date, start_a, start_a + len_a, 40);
        let event = handle_add_exam(&state, add_exam_command(&first)).unwrap();
        let state = apply_event(state, &ScheduleEvent::ExamAdded(event));

        // Second exam starts inside the first one's interval
        let start_b = start_a + offset.min(len_a - 1);
        let second = exam("exam-b", "MATH201", date, start_b, start_b + 2, 30);

        match handle_add_exam(&state, add_exam_command(&second)) {
            Err(CommandError::ExamTimeOverlap { .. }) => {}
            other => prop_assert!(false, "expected overlap rejection, got {:?}", other),
        }
    }

    /// Identical inputs and weights always produce bit-identical scores.
    #[test]
    fn prop_scorer_is_bit_deterministic(
        total_prefs in 0u32..500,
        satisfied_seed in 0u32..500,
        policy_checks in 0u32..100,
        violations_seed in 0u32..100,
        student_counts in prop::collection::vec(1u32..300, 0..6)
    ) {
        let exams: Vec<_> = student_counts
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                exam(
                    &format!("exam-{i}"),
                    &format!("C{i}"),
                    exam_date() + chrono::Duration::days(i as i64),
                    9,
                    11,
                    count,
                )
            })
            .collect();
        let conflicts = analyze_conflicts(&exams);

        let input = SchedulingMetricsInput::from_exams(
            &exams,
            &conflicts,
            total_prefs,
            satisfied_seed.min(total_prefs),
            policy_checks,
            violations_seed.min(policy_checks),
        );

        let weights = QualityWeights::default();
        let first = score_schedule(&input, &weights);
        let second = score_schedule(&input, &weights);

        prop_assert_eq!(first.overall.to_bits(), second.overall.to_bits());
        prop_assert_eq!(
            first.dimensions.preference_satisfaction.to_bits(),
            second.dimensions.preference_satisfaction.to_bits()
        );
        prop_assert_eq!(first, second);
    }

    /// Redelivering any already-applied event leaves the read model
    /// unchanged and produces no side effects.
    #[test]
    fn prop_projection_redelivery_is_noop(
        codes in prop::collection::vec((0u8..6, 1u32..100), 0..12),
        redeliver_seed in 0usize..64
    ) {
        let (mut state, mut events) = created();
        for (code, value) in codes {
            let (next, produced) = step(state, code, value);
            state = next;
            events.extend(produced);
        }

        let stored_events: Vec<_> = events
            .into_iter()
            .enumerate()
            .map(|(i, e)| stored(e, i as u64 + 1))
            .collect();

        let mut model = ScheduleReadModel::new();
        for event in &stored_events {
            let (next, _effects) = project_schedule_event(model, event);
            model = next;
        }

        let replayed = &stored_events[redeliver_seed % stored_events.len()];
        let (after, effects) = project_schedule_event(model.clone(), replayed);

        prop_assert_eq!(after, model);
        prop_assert!(effects.is_empty());
    }
}

//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across arbitrary event sequences.

use super::*;
use crate::db::{Client, ClientId, ServiceType};
use crate::flow::{node, FlowKind, Input, Rejection, StepId};
use chrono::Utc;
use proptest::prelude::*;
use std::collections::HashSet;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_clients() -> Vec<Client> {
    [(1, "Muller", "Anna"), (2, "Rossi", "Luca")]
        .into_iter()
        .map(|(id, last, first)| Client {
            id: ClientId(id),
            last_name: last.to_string(),
            first_name: first.to_string(),
            phone: "+41 791234567".to_string(),
            email: format!("{}@example.com", first.to_lowercase()),
            created_at: Utc::now(),
        })
        .collect()
}

/// A valid answer for any step, given the test clients
fn valid_event(step: StepId) -> Event {
    let text = |s: &str| Event::Text(s.to_string());
    match step {
        StepId::LastName => text("Muller"),
        StepId::FirstName => text("Anna"),
        StepId::Phone => text("+41 791234567"),
        StepId::Email => text("anna@example.com"),
        StepId::ChooseClient => Event::button("client_1"),
        StepId::ChooseType => Event::button("type_restaurant"),
        StepId::RestaurantName => text("Le Sommet"),
        StepId::TransferDeparture => text("Gare de Sion"),
        StepId::TransferArrival => text("Hôtel Alpina"),
        StepId::RestaurantPeople
        | StepId::TransferPeople
        | StepId::InstructorCount
        | StepId::InstructorPeople => text("2"),
        StepId::InstructorLanguage => Event::button("lang_fr"),
        StepId::InstructorSport => Event::button("sport_ski"),
        StepId::InstructorStart | StepId::InstructorEnd | StepId::Date => text("25.12.24"),
        StepId::MassageType => Event::button("massage_relaxing"),
        StepId::MassageDuration => Event::button("duration_60"),
        StepId::SkiServiceDetails => text("fartage"),
        StepId::Time => text("09h00"),
        StepId::ChooseClientToRemove => Event::button("remove_2"),
    }
}

fn visited(session: &Session) -> HashSet<StepId> {
    session
        .history
        .iter()
        .copied()
        .chain([session.current_step])
        .collect()
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_flow() -> impl Strategy<Value = FlowKind> {
    prop_oneof![
        Just(FlowKind::ClientIntake),
        Just(FlowKind::Reservation),
        Just(FlowKind::ClientRemoval),
    ]
}

fn arb_service() -> impl Strategy<Value = ServiceType> {
    prop_oneof![
        Just(ServiceType::Restaurant),
        Just(ServiceType::Transfer),
        Just(ServiceType::Instructor),
        Just(ServiceType::Massage),
        Just(ServiceType::SkiService),
    ]
}

fn arb_text() -> impl Strategy<Value = Event> {
    prop_oneof![
        Just("Le Sommet"),
        Just("4"),
        Just("abc"),
        Just("0"),
        Just("-2"),
        Just("   "),
        Just("25.12.24"),
        Just("31.02.99"),
        Just("2024-12-25"),
        Just("09h00"),
        Just("9:00"),
    ]
    .prop_map(|s| Event::Text(s.to_string()))
}

fn arb_button() -> impl Strategy<Value = Event> {
    prop_oneof![
        Just("client_1"),
        Just("client_2"),
        Just("client_99"),
        Just("type_restaurant"),
        Just("type_transfer"),
        Just("type_instructor"),
        Just("type_massage"),
        Just("type_ski_service"),
        Just("type_spa"),
        Just("lang_de"),
        Just("sport_snowboard"),
        Just("massage_deep_tissue"),
        Just("duration_90"),
        Just("duration_45"),
        Just("remove_1"),
        Just("nonsense"),
    ]
    .prop_map(Event::button)
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        4 => arb_text(),
        4 => arb_button(),
        2 => Just(Event::Back),
    ]
}

/// Drives a random walk, stopping at the first commit
fn walk(
    flow: FlowKind,
    events: Vec<Event>,
) -> Vec<(Session, Event, Result<TransitionResult, Rejection>)> {
    let mut session = Session::new(flow, test_clients());
    let mut steps = Vec::new();
    for event in events {
        let result = transition(&session, event.clone());
        let committed = matches!(
            result,
            Ok(TransitionResult {
                effect: Effect::Commit(_),
                ..
            })
        );
        let next = match &result {
            Ok(r) => r.new_session.clone(),
            Err(_) => session.clone(),
        };
        steps.push((session, event, result));
        session = next;
        if committed {
            break;
        }
    }
    steps
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // History grows by one per accepted answer and shrinks by one per back
    #[test]
    fn prop_history_counts_forward_minus_back(
        flow in arb_flow(),
        events in proptest::collection::vec(arb_event(), 0..40)
    ) {
        let mut forward = 0usize;
        let mut backs = 0usize;
        for (before, event, result) in walk(flow, events) {
            let Ok(result) = result else { continue };
            if result.effect != Effect::Prompt {
                continue;
            }
            match event {
                Event::Back if before.is_at_entry() => {}
                Event::Back => backs += 1,
                _ => forward += 1,
            }
            prop_assert_eq!(result.new_session.history.len(), forward - backs);
        }
    }

    // Only steps on the current path ever hold an answer
    #[test]
    fn prop_collected_only_for_visited_steps(
        flow in arb_flow(),
        events in proptest::collection::vec(arb_event(), 0..40)
    ) {
        for (_, _, result) in walk(flow, events) {
            let Ok(result) = result else { continue };
            if result.effect != Effect::Prompt {
                continue;
            }
            let session = result.new_session;
            let path = visited(&session);
            for step in session.collected.keys() {
                prop_assert!(path.contains(step), "{:?} collected but not on path {:?}", step, session.history);
            }
        }
    }

    // The event type a step expects decides the mismatch rejection
    #[test]
    fn prop_wrong_input_kind_is_protocol_mismatch(
        flow in arb_flow(),
        events in proptest::collection::vec(arb_event(), 0..40)
    ) {
        for (before, event, result) in walk(flow, events) {
            let Err(rejection) = result else { continue };
            match (node(before.current_step).input, &event) {
                (Input::Text(_), Event::Button(_)) => prop_assert_eq!(rejection, Rejection::ExpectedText),
                (Input::Choice { .. }, Event::Text(_)) => prop_assert_eq!(rejection, Rejection::ExpectedChoice),
                _ => prop_assert!(!matches!(
                    rejection,
                    Rejection::ExpectedText | Rejection::ExpectedChoice
                )),
            }
        }
    }

    // Back at the entry step never changes the session
    #[test]
    fn prop_back_at_entry_is_idempotent(flow in arb_flow(), repeats in 1usize..5) {
        let session = Session::new(flow, test_clients());
        let mut current = session.clone();
        for _ in 0..repeats {
            let result = transition(&current, Event::Back).unwrap();
            prop_assert_eq!(result.effect, Effect::Prompt);
            current = result.new_session;
        }
        prop_assert_eq!(current, session);
    }

    // Exploring other branches first never leaks their fields into the payload
    #[test]
    fn prop_commit_payload_matches_final_branch(
        detours in proptest::collection::vec(arb_service(), 0..4),
        last in arb_service()
    ) {
        let mut session = Session::new(FlowKind::Reservation, test_clients());
        session = transition(&session, Event::button("client_1")).unwrap().new_session;

        for service in detours {
            session = transition(&session, Event::button(format!("type_{service}"))).unwrap().new_session;
            for step in StepId::branch(service) {
                prop_assert_eq!(session.current_step, *step);
                session = transition(&session, valid_event(*step)).unwrap().new_session;
            }
            prop_assert_eq!(session.current_step, StepId::Date);
            while session.current_step != StepId::ChooseType {
                session = transition(&session, Event::Back).unwrap().new_session;
            }
        }

        session = transition(&session, Event::button(format!("type_{last}"))).unwrap().new_session;
        loop {
            let result = transition(&session, valid_event(session.current_step)).unwrap();
            match result.effect {
                Effect::Prompt => session = result.new_session,
                Effect::Commit(Draft::Reservation { reservation, client }) => {
                    prop_assert_eq!(reservation.details.service_type(), last);
                    prop_assert_eq!(client.id, ClientId(1));

                    let allowed: HashSet<StepId> = StepId::branch(last).iter().copied().collect();
                    for service in ServiceType::ALL {
                        for step in StepId::branch(service) {
                            if !allowed.contains(step) {
                                prop_assert!(!result.new_session.collected.contains_key(step));
                            }
                        }
                    }
                    break;
                }
                Effect::Commit(other) => prop_assert!(false, "unexpected draft {:?}", other),
            }
        }
    }
}

//! Pure state transition function

use super::{Draft, Effect, Event, Session};
use crate::db::{NewClient, NewReservation, ServiceDetails, ServiceType};
use crate::flow::{node, Next, Rejection, StepId};

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_session: Session,
    pub effect: Effect,
}

impl TransitionResult {
    fn prompt(session: Session) -> Self {
        Self {
            new_session: session,
            effect: Effect::Prompt,
        }
    }
}

/// Pure transition function
///
/// Given the same session and event it always produces the same result, with
/// no I/O. A rejection means the caller keeps the session as it was.
pub fn transition(session: &Session, event: Event) -> Result<TransitionResult, Rejection> {
    let step = session.current_step;
    let current = node(step);

    let answer = match event {
        Event::Back => return go_back(session),
        Event::Text(raw) => current.input.accept_text(&raw)?,
        Event::Button(token) => current.input.accept_choice(&token, session)?,
    };

    let mut next = session.clone();
    next.record(step, answer);

    match current.next(&next).ok_or(Rejection::Inconsistent)? {
        Next::Step(following) => {
            next.history.push(step);
            next.current_step = following;
            Ok(TransitionResult::prompt(next))
        }
        Next::Commit => {
            let draft = build_draft(&next)?;
            Ok(TransitionResult {
                new_session: next,
                effect: Effect::Commit(draft),
            })
        }
    }
}

fn go_back(session: &Session) -> Result<TransitionResult, Rejection> {
    if session.is_at_entry() {
        return Ok(TransitionResult::prompt(session.clone()));
    }

    let previous = node(session.current_step)
        .previous(session)
        .ok_or(Rejection::Inconsistent)?;
    let position = session
        .history
        .iter()
        .rposition(|s| *s == previous)
        .ok_or(Rejection::Inconsistent)?;

    let mut next = session.clone();
    next.forget(session.current_step);
    next.history.truncate(position);
    next.current_step = previous;
    Ok(TransitionResult::prompt(next))
}

// ============================================================================
// Draft assembly
// ============================================================================

fn required_text(session: &Session, step: StepId) -> Result<String, Rejection> {
    session
        .text(step)
        .map(str::to_string)
        .ok_or(Rejection::Inconsistent)
}

fn required_count(session: &Session, step: StepId) -> Result<u32, Rejection> {
    session.count(step).ok_or(Rejection::Inconsistent)
}

fn required_choice(session: &Session, step: StepId) -> Result<String, Rejection> {
    session
        .choice(step)
        .map(str::to_string)
        .ok_or(Rejection::Inconsistent)
}

fn build_draft(session: &Session) -> Result<Draft, Rejection> {
    use crate::flow::FlowKind;

    match session.flow {
        FlowKind::ClientIntake => Ok(Draft::Client(NewClient {
            last_name: required_text(session, StepId::LastName)?,
            first_name: required_text(session, StepId::FirstName)?,
            phone: required_text(session, StepId::Phone)?,
            email: required_text(session, StepId::Email)?,
        })),
        FlowKind::Reservation => {
            let client = session
                .selected_client
                .clone()
                .ok_or(Rejection::Inconsistent)?;
            let service = session.service_type.ok_or(Rejection::Inconsistent)?;
            let reservation = NewReservation {
                client_id: client.id,
                details: service_details(session, service)?,
                date: required_text(session, StepId::Date)?,
                time: required_text(session, StepId::Time)?,
            };
            Ok(Draft::Reservation {
                reservation,
                client,
            })
        }
        FlowKind::ClientRemoval => session
            .selected_client
            .clone()
            .map(Draft::RemoveClient)
            .ok_or(Rejection::Inconsistent),
    }
}

/// Payload built only from the steps of the selected branch
fn service_details(session: &Session, service: ServiceType) -> Result<ServiceDetails, Rejection> {
    let details = match service {
        ServiceType::Restaurant => ServiceDetails::Restaurant {
            restaurant_name: required_text(session, StepId::RestaurantName)?,
            num_people: required_count(session, StepId::RestaurantPeople)?,
        },
        ServiceType::Transfer => ServiceDetails::Transfer {
            departure: required_text(session, StepId::TransferDeparture)?,
            arrival: required_text(session, StepId::TransferArrival)?,
            num_people: required_count(session, StepId::TransferPeople)?,
        },
        ServiceType::Instructor => ServiceDetails::Instructor {
            language: required_choice(session, StepId::InstructorLanguage)?,
            sport: required_choice(session, StepId::InstructorSport)?,
            start_date: required_text(session, StepId::InstructorStart)?,
            end_date: required_text(session, StepId::InstructorEnd)?,
            num_instructors: required_count(session, StepId::InstructorCount)?,
            num_people: required_count(session, StepId::InstructorPeople)?,
        },
        ServiceType::Massage => ServiceDetails::Massage {
            massage_type: required_choice(session, StepId::MassageType)?,
            duration_minutes: required_choice(session, StepId::MassageDuration)?
                .parse()
                .map_err(|_| Rejection::Inconsistent)?,
        },
        ServiceType::SkiService => ServiceDetails::SkiService {
            details: required_text(session, StepId::SkiServiceDetails)?,
        },
    };
    Ok(details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Client, ClientId};
    use crate::flow::FlowKind;
    use chrono::Utc;

    fn clients() -> Vec<Client> {
        vec![Client {
            id: ClientId(1),
            last_name: "Muller".to_string(),
            first_name: "Anna".to_string(),
            phone: "+41 791234567".to_string(),
            email: "anna@example.com".to_string(),
            created_at: Utc::now(),
        }]
    }

    fn apply(session: Session, event: Event) -> Session {
        transition(&session, event).unwrap().new_session
    }

    fn text(s: &str) -> Event {
        Event::Text(s.to_string())
    }

    #[test]
    fn client_intake_commits_a_new_client() {
        let mut session = Session::new(FlowKind::ClientIntake, vec![]);
        for answer in ["Muller", "Anna", "+41 791234567"] {
            session = apply(session, text(answer));
        }
        assert_eq!(session.current_step, StepId::Email);
        assert_eq!(session.history.len(), 3);

        let result = transition(&session, text("anna@example.com")).unwrap();
        match result.effect {
            Effect::Commit(Draft::Client(client)) => {
                assert_eq!(client.last_name, "Muller");
                assert_eq!(client.email, "anna@example.com");
            }
            other => panic!("expected client commit, got {other:?}"),
        }
    }

    #[test]
    fn restaurant_flow_builds_reservation_draft() {
        let mut session = Session::new(FlowKind::Reservation, clients());
        session = apply(session, Event::button("client_1"));
        session = apply(session, Event::button("type_restaurant"));
        assert_eq!(session.current_step, StepId::RestaurantName);
        for answer in ["Le Sommet", "4", "25.12.24"] {
            session = apply(session, text(answer));
        }

        let result = transition(&session, text("09h00")).unwrap();
        let Effect::Commit(Draft::Reservation {
            reservation,
            client,
        }) = result.effect
        else {
            panic!("expected reservation commit");
        };
        assert_eq!(client.id, ClientId(1));
        assert_eq!(reservation.client_id, ClientId(1));
        assert_eq!(
            reservation.details,
            ServiceDetails::Restaurant {
                restaurant_name: "Le Sommet".to_string(),
                num_people: 4,
            }
        );
        assert_eq!(reservation.date, "25.12.24");
        assert_eq!(reservation.time, "09h00");
    }

    #[test]
    fn text_at_choice_step_is_protocol_mismatch() {
        let session = Session::new(FlowKind::Reservation, clients());
        let err = transition(&session, text("Muller")).unwrap_err();
        assert_eq!(err, Rejection::ExpectedChoice);
        assert!(err.is_protocol_mismatch());
    }

    #[test]
    fn button_at_text_step_is_protocol_mismatch() {
        let session = Session::new(FlowKind::ClientIntake, vec![]);
        let err = transition(&session, Event::button("client_1")).unwrap_err();
        assert_eq!(err, Rejection::ExpectedText);
    }

    #[test]
    fn unknown_client_id_is_rejected() {
        let session = Session::new(FlowKind::Reservation, clients());
        let err = transition(&session, Event::button("client_99")).unwrap_err();
        assert_eq!(err, Rejection::UnknownOption);
    }

    #[test]
    fn back_from_date_returns_to_branch_tail() {
        let mut session = Session::new(FlowKind::Reservation, clients());
        session = apply(session, Event::button("client_1"));
        session = apply(session, Event::button("type_massage"));
        session = apply(session, Event::button("massage_relaxing"));
        session = apply(session, Event::button("duration_30"));
        assert_eq!(session.current_step, StepId::Date);

        session = apply(session, Event::Back);
        assert_eq!(session.current_step, StepId::MassageDuration);
        assert_eq!(session.history.len(), 3);
        // The step returned to keeps its answer until re-answered
        assert_eq!(session.choice(StepId::MassageDuration), Some("30"));
    }

    #[test]
    fn back_discards_the_field_being_left() {
        let mut session = Session::new(FlowKind::ClientIntake, vec![]);
        session = apply(session, text("Muller"));
        session = apply(session, text("Anna"));
        session = apply(session, Event::Back);
        session = apply(session, Event::Back);
        assert_eq!(session.current_step, StepId::LastName);
        assert!(session.answer(StepId::FirstName).is_none());
        assert!(session.history.is_empty());
    }

    #[test]
    fn back_at_entry_is_unchanged() {
        let session = Session::new(FlowKind::ClientIntake, vec![]);
        let result = transition(&session, Event::Back).unwrap();
        assert_eq!(result.new_session, session);
        assert_eq!(result.effect, Effect::Prompt);
    }

    #[test]
    fn removal_commits_selected_client() {
        let session = Session::new(FlowKind::ClientRemoval, clients());
        let result = transition(&session, Event::button("remove_1")).unwrap();
        assert!(matches!(
            result.effect,
            Effect::Commit(Draft::RemoveClient(ref c)) if c.id == ClientId(1)
        ));
    }
}

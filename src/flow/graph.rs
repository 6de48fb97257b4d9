//! Step definitions: input expectation, successor and predecessor per node

use super::step::{Answer, StepId};
use super::validate::{self, Rejection};
use crate::db::ServiceType;
use crate::state_machine::Session;

/// Pure parser from raw text to an answer
pub type Validator = fn(&str) -> Result<Answer, Rejection>;

/// Selection values offered at a choice step
#[derive(Debug, Clone, Copy)]
pub enum Options {
    /// Static `(value, label)` pairs
    Fixed(&'static [(&'static str, &'static str)]),
    /// The client list snapshotted when the session started
    Clients,
}

/// What a step expects from the user
#[derive(Debug, Clone, Copy)]
pub enum Input {
    Text(Validator),
    Choice {
        /// Token prefix, e.g. `type` for `type_massage`
        namespace: &'static str,
        options: Options,
    },
}

/// Where a step leads once answered
#[derive(Debug, Clone, Copy)]
pub enum Successor {
    Fixed(StepId),
    /// Chosen from collected fields (service-type fan-out)
    Branch(fn(&Session) -> Option<StepId>),
    /// Last step: persist the collected record
    Commit,
}

/// Where "back" returns to
#[derive(Debug, Clone, Copy)]
pub enum Predecessor {
    /// Entry step
    None,
    Fixed(StepId),
    Branch(fn(&Session) -> Option<StepId>),
}

/// Resolved successor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    Step(StepId),
    Commit,
}

/// One node of a flow graph
#[derive(Debug, Clone, Copy)]
pub struct Node {
    pub input: Input,
    pub successor: Successor,
    pub predecessor: Predecessor,
}

const SERVICE_OPTIONS: &[(&str, &str)] = &[
    ("restaurant", "🍽️ Restaurant"),
    ("transfer", "🚗 Transfert"),
    ("instructor", "⛷️ Moniteur"),
    ("massage", "💆 Massage"),
    ("ski_service", "🎿 Ski Service"),
];

const LANGUAGE_OPTIONS: &[(&str, &str)] = &[
    ("fr", "🇫🇷 Français"),
    ("en", "🇬🇧 Anglais"),
    ("de", "🇩🇪 Allemand"),
    ("it", "🇮🇹 Italien"),
];

const SPORT_OPTIONS: &[(&str, &str)] = &[("ski", "Ski"), ("snowboard", "Snowboard")];

const MASSAGE_OPTIONS: &[(&str, &str)] = &[
    ("relaxing", "Relaxant"),
    ("sports", "Sportif"),
    ("deep_tissue", "Deep Tissue"),
];

const DURATION_OPTIONS: &[(&str, &str)] = &[
    ("30", "30 minutes"),
    ("60", "60 minutes"),
    ("90", "90 minutes"),
];

fn text(successor: Successor, predecessor: Predecessor, validator: Validator) -> Node {
    Node {
        input: Input::Text(validator),
        successor,
        predecessor,
    }
}

fn choice(
    namespace: &'static str,
    options: Options,
    successor: Successor,
    predecessor: Predecessor,
) -> Node {
    Node {
        input: Input::Choice { namespace, options },
        successor,
        predecessor,
    }
}

fn branch_entry(session: &Session) -> Option<StepId> {
    session
        .service_type
        .and_then(|service| StepId::branch(service).first().copied())
}

fn branch_exit(session: &Session) -> Option<StepId> {
    session
        .service_type
        .and_then(|service| StepId::branch(service).last().copied())
}

/// The node definition for a step
#[allow(clippy::enum_glob_use)]
pub fn node(step: StepId) -> Node {
    use Predecessor as P;
    use StepId::*;
    use Successor as S;

    match step {
        // Client intake
        LastName => text(S::Fixed(FirstName), P::None, validate::text),
        FirstName => text(S::Fixed(Phone), P::Fixed(LastName), validate::text),
        Phone => text(S::Fixed(Email), P::Fixed(FirstName), validate::text),
        Email => text(S::Commit, P::Fixed(Phone), validate::text),

        // Reservation entry and fan-out
        ChooseClient => choice("client", Options::Clients, S::Fixed(ChooseType), P::None),
        ChooseType => choice(
            "type",
            Options::Fixed(SERVICE_OPTIONS),
            S::Branch(branch_entry),
            P::Fixed(ChooseClient),
        ),

        // Restaurant
        RestaurantName => text(S::Fixed(RestaurantPeople), P::Fixed(ChooseType), validate::text),
        RestaurantPeople => text(
            S::Fixed(Date),
            P::Fixed(RestaurantName),
            validate::positive_integer,
        ),

        // Transfer
        TransferDeparture => text(S::Fixed(TransferArrival), P::Fixed(ChooseType), validate::text),
        TransferArrival => text(
            S::Fixed(TransferPeople),
            P::Fixed(TransferDeparture),
            validate::text,
        ),
        TransferPeople => text(
            S::Fixed(Date),
            P::Fixed(TransferArrival),
            validate::positive_integer,
        ),

        // Instructor
        InstructorLanguage => choice(
            "lang",
            Options::Fixed(LANGUAGE_OPTIONS),
            S::Fixed(InstructorSport),
            P::Fixed(ChooseType),
        ),
        InstructorSport => choice(
            "sport",
            Options::Fixed(SPORT_OPTIONS),
            S::Fixed(InstructorStart),
            P::Fixed(InstructorLanguage),
        ),
        InstructorStart => text(
            S::Fixed(InstructorEnd),
            P::Fixed(InstructorSport),
            validate::date_token,
        ),
        InstructorEnd => text(
            S::Fixed(InstructorCount),
            P::Fixed(InstructorStart),
            validate::date_token,
        ),
        InstructorCount => text(
            S::Fixed(InstructorPeople),
            P::Fixed(InstructorEnd),
            validate::positive_integer,
        ),
        InstructorPeople => text(
            S::Fixed(Date),
            P::Fixed(InstructorCount),
            validate::positive_integer,
        ),

        // Massage
        MassageType => choice(
            "massage",
            Options::Fixed(MASSAGE_OPTIONS),
            S::Fixed(MassageDuration),
            P::Fixed(ChooseType),
        ),
        MassageDuration => choice(
            "duration",
            Options::Fixed(DURATION_OPTIONS),
            S::Fixed(Date),
            P::Fixed(MassageType),
        ),

        // Ski service
        SkiServiceDetails => text(S::Fixed(Date), P::Fixed(ChooseType), validate::text),

        // Shared tail
        Date => text(S::Fixed(Time), P::Branch(branch_exit), validate::date_token),
        Time => text(S::Commit, P::Fixed(Date), validate::time_token),

        // Client removal
        ChooseClientToRemove => choice("remove", Options::Clients, S::Commit, P::None),
    }
}

impl Node {
    /// Resolve the successor against the session (after the answer is recorded)
    pub fn next(&self, session: &Session) -> Option<Next> {
        match self.successor {
            Successor::Fixed(step) => Some(Next::Step(step)),
            Successor::Branch(pick) => pick(session).map(Next::Step),
            Successor::Commit => Some(Next::Commit),
        }
    }

    /// Resolve the predecessor; `None` at an entry step
    pub fn previous(&self, session: &Session) -> Option<StepId> {
        match self.predecessor {
            Predecessor::None => None,
            Predecessor::Fixed(step) => Some(step),
            Predecessor::Branch(pick) => pick(session),
        }
    }
}

impl Input {
    /// Validate free text against this input
    pub fn accept_text(&self, raw: &str) -> Result<Answer, Rejection> {
        match self {
            Input::Text(validator) => validator(raw),
            Input::Choice { .. } => Err(Rejection::ExpectedChoice),
        }
    }

    /// Validate a selection token against the current option set
    pub fn accept_choice(&self, token: &str, session: &Session) -> Result<Answer, Rejection> {
        let Input::Choice { namespace, options } = self else {
            return Err(Rejection::ExpectedText);
        };

        let (prefix, value) = token.split_once('_').ok_or(Rejection::UnknownOption)?;
        if prefix != *namespace {
            return Err(Rejection::UnknownOption);
        }

        let offered = match options {
            Options::Fixed(list) => list.iter().any(|(v, _)| *v == value),
            Options::Clients => value
                .parse::<i64>()
                .is_ok_and(|id| session.client_choices.iter().any(|c| c.id.0 == id)),
        };
        if !offered {
            return Err(Rejection::UnknownOption);
        }
        Ok(Answer::Choice(value.to_string()))
    }

    /// `(label, token)` pairs for the buttons of this input
    pub fn buttons(&self, session: &Session) -> Vec<(String, String)> {
        match self {
            Input::Text(_) => Vec::new(),
            Input::Choice {
                namespace,
                options: Options::Fixed(list),
            } => list
                .iter()
                .map(|(value, label)| ((*label).to_string(), format!("{namespace}_{value}")))
                .collect(),
            Input::Choice {
                namespace,
                options: Options::Clients,
            } => session
                .client_choices
                .iter()
                .map(|c| (c.display_name(), format!("{namespace}_{}", c.id)))
                .collect(),
        }
    }
}

/// Map a collected service-type choice back to the enum
pub fn service_from_choice(value: &str) -> Option<ServiceType> {
    value.parse().ok()
}

/// Display label of a fixed option value at a choice step
pub fn option_label(step: StepId, value: &str) -> Option<&'static str> {
    match node(step).input {
        Input::Choice {
            options: Options::Fixed(list),
            ..
        } => list.iter().find(|(v, _)| *v == value).map(|(_, label)| *label),
        _ => None,
    }
}

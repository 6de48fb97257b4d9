//! Step identifiers and collected answers

use crate::db::ServiceType;
use serde::{Deserialize, Serialize};

/// A node in one of the flow graphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    // Client intake
    LastName,
    FirstName,
    Phone,
    Email,

    // Reservation: entry and fan-out
    ChooseClient,
    ChooseType,

    // Restaurant
    RestaurantName,
    RestaurantPeople,

    // Transfer
    TransferDeparture,
    TransferArrival,
    TransferPeople,

    // Instructor
    InstructorLanguage,
    InstructorSport,
    InstructorStart,
    InstructorEnd,
    InstructorCount,
    InstructorPeople,

    // Massage
    MassageType,
    MassageDuration,

    // Ski service
    SkiServiceDetails,

    // Shared reservation tail
    Date,
    Time,

    // Client removal
    ChooseClientToRemove,
}

impl StepId {
    /// Name of the field this step collects
    pub fn field_name(self) -> &'static str {
        match self {
            StepId::LastName => "last_name",
            StepId::FirstName => "first_name",
            StepId::Phone => "phone",
            StepId::Email => "email",
            StepId::ChooseClient | StepId::ChooseClientToRemove => "client_id",
            StepId::ChooseType => "service_type",
            StepId::RestaurantName => "restaurant_name",
            StepId::RestaurantPeople | StepId::TransferPeople | StepId::InstructorPeople => {
                "num_people"
            }
            StepId::TransferDeparture => "departure",
            StepId::TransferArrival => "arrival",
            StepId::InstructorLanguage => "language",
            StepId::InstructorSport => "sport",
            StepId::InstructorStart => "start_date",
            StepId::InstructorEnd => "end_date",
            StepId::InstructorCount => "num_instructors",
            StepId::MassageType => "massage_type",
            StepId::MassageDuration => "duration_minutes",
            StepId::SkiServiceDetails => "details",
            StepId::Date => "date",
            StepId::Time => "time",
        }
    }

    /// Steps of a service branch, in order
    pub fn branch(service: ServiceType) -> &'static [StepId] {
        match service {
            ServiceType::Restaurant => &[StepId::RestaurantName, StepId::RestaurantPeople],
            ServiceType::Transfer => &[
                StepId::TransferDeparture,
                StepId::TransferArrival,
                StepId::TransferPeople,
            ],
            ServiceType::Instructor => &[
                StepId::InstructorLanguage,
                StepId::InstructorSport,
                StepId::InstructorStart,
                StepId::InstructorEnd,
                StepId::InstructorCount,
                StepId::InstructorPeople,
            ],
            ServiceType::Massage => &[StepId::MassageType, StepId::MassageDuration],
            ServiceType::SkiService => &[StepId::SkiServiceDetails],
        }
    }
}

/// A validated answer to one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Answer {
    /// Free text, trimmed
    Text(String),
    /// Positive integer
    Count(u32),
    /// Value part of a selection token (`type_massage` → `massage`)
    Choice(String),
}

impl Answer {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Answer::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_count(&self) -> Option<u32> {
        match self {
            Answer::Count(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_choice(&self) -> Option<&str> {
        match self {
            Answer::Choice(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branches_are_disjoint() {
        let mut seen = std::collections::HashSet::new();
        for service in ServiceType::ALL {
            for step in StepId::branch(service) {
                assert!(seen.insert(*step), "{step:?} appears in two branches");
            }
        }
    }

    #[test]
    fn answer_accessors_match_variant() {
        assert_eq!(Answer::Count(4).as_count(), Some(4));
        assert_eq!(Answer::Count(4).as_text(), None);
        assert_eq!(Answer::Choice("fr".into()).as_choice(), Some("fr"));
    }
}

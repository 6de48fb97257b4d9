//! Confirmation texts shown after a successful commit

use super::graph::option_label;
use super::step::StepId;
use crate::db::{Client, Reservation, ServiceDetails};
use std::fmt::Write;

fn label(step: StepId, value: &str) -> &str {
    option_label(step, value).unwrap_or(value)
}

/// Recap of a stored reservation
pub fn reservation_summary(reservation: &Reservation, client: &Client) -> String {
    let mut out = String::from("✅ Réservation confirmée !\n\n");

    // Writing to a String cannot fail
    let _ = match &reservation.details {
        ServiceDetails::Restaurant {
            restaurant_name,
            num_people,
        } => write!(
            out,
            "Restaurant: {restaurant_name}\nNombre de personnes: {num_people}\n"
        ),
        ServiceDetails::Transfer {
            departure,
            arrival,
            num_people,
        } => write!(
            out,
            "Départ: {departure}\nArrivée: {arrival}\nNombre de personnes: {num_people}\n"
        ),
        ServiceDetails::Instructor {
            language,
            sport,
            start_date,
            end_date,
            num_instructors,
            num_people,
        } => write!(
            out,
            "Langue: {}\nSport: {}\nDate début: {start_date}\nDate fin: {end_date}\n\
             Nombre de moniteurs: {num_instructors}\nNombre d'élèves: {num_people}\n",
            label(StepId::InstructorLanguage, language),
            label(StepId::InstructorSport, sport),
        ),
        ServiceDetails::Massage {
            massage_type,
            duration_minutes,
        } => write!(
            out,
            "Type: {}\nDurée: {duration_minutes} minutes\n",
            label(StepId::MassageType, massage_type),
        ),
        ServiceDetails::SkiService { details } => writeln!(out, "Détails: {details}"),
    };

    let _ = write!(
        out,
        "\nDate: {}\nHeure: {}\n\nClient: {}\nEmail: {}\nTéléphone: {}",
        reservation.date,
        reservation.time,
        client.display_name(),
        client.email,
        client.phone,
    );
    out
}

/// Recap of a newly created client
pub fn client_summary(client: &Client) -> String {
    format!(
        "✅ Client ajouté avec succès !\n\nNom: {}\nPrénom: {}\nTéléphone: {}\nEmail: {}",
        client.last_name, client.first_name, client.phone, client.email
    )
}

/// Confirmation of a client deletion
pub fn removal_summary(client: &Client) -> String {
    format!(
        "Le client {} a été supprimé avec succès.",
        client.display_name()
    )
}

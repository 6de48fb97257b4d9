//! Prompt rendering for the current step

use super::graph::{node, option_label};
use super::step::StepId;
use crate::state_machine::Session;
use serde::Serialize;

/// Token carried by the "back" button on every non-entry step
pub const BACK_TOKEN: &str = "back";

const BACK_LABEL: &str = "⬅️ Retour";

const DATE_HINT: &str = "Format: DD.MM.YY (exemple: 25.12.24)";
const TIME_HINT: &str = "Format: HHhMM (exemple: 09h00)";

/// One selectable button
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceOption {
    pub label: String,
    pub token: String,
}

/// What the user is asked next
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    pub text: String,
    pub options: Vec<ChoiceOption>,
}

#[cfg(test)]
impl Prompt {
    /// Whether the prompt offers a given token
    pub fn offers(&self, token: &str) -> bool {
        self.options.iter().any(|o| o.token == token)
    }
}

/// Render the prompt for the session's current step
pub fn prompt_for(session: &Session) -> Prompt {
    let step = session.current_step;
    let mut options: Vec<ChoiceOption> = node(step)
        .input
        .buttons(session)
        .into_iter()
        .map(|(label, token)| ChoiceOption { label, token })
        .collect();

    if !session.is_at_entry() {
        options.push(ChoiceOption {
            label: BACK_LABEL.to_string(),
            token: BACK_TOKEN.to_string(),
        });
    }

    Prompt {
        text: prompt_text(session, step),
        options,
    }
}

fn prompt_text(session: &Session, step: StepId) -> String {
    match step {
        StepId::LastName => "Entrez le nom du client :".to_string(),
        StepId::FirstName => "Entrez le prénom du client :".to_string(),
        StepId::Phone => "Entrez le numéro de téléphone du client :".to_string(),
        StepId::Email => "Entrez l'email du client :".to_string(),

        StepId::ChooseClient => "Sélectionnez un client pour la réservation :".to_string(),
        StepId::ChooseType => match &session.selected_client {
            Some(client) => format!(
                "Client sélectionné : {}\nChoisissez le type de réservation :",
                client.display_name()
            ),
            None => "Choisissez le type de réservation :".to_string(),
        },

        StepId::RestaurantName => "Entrez le nom du restaurant :".to_string(),
        StepId::RestaurantPeople | StepId::TransferPeople => "Nombre de personnes :".to_string(),

        StepId::TransferDeparture => "Entrez le lieu de départ :".to_string(),
        StepId::TransferArrival => "Lieu d'arrivée :".to_string(),

        StepId::InstructorLanguage => "Choisissez la langue du moniteur :".to_string(),
        StepId::InstructorSport => "Choisissez le type de sport :".to_string(),
        StepId::InstructorStart => format!("Date de début des cours :\n{DATE_HINT}"),
        StepId::InstructorEnd => {
            "Date de fin des cours :\nFormat: DD.MM.YY (exemple: 30.12.24)".to_string()
        }
        StepId::InstructorCount => "Nombre de moniteurs souhaité :".to_string(),
        StepId::InstructorPeople => "Nombre d'élèves :".to_string(),

        StepId::MassageType => "Choisissez le type de massage :".to_string(),
        StepId::MassageDuration => {
            let kind = session
                .choice(StepId::MassageType)
                .map(|value| option_label(StepId::MassageType, value).unwrap_or(value))
                .unwrap_or_default();
            format!(
                "📝 Formulaire de réservation Massage\nType: {kind}\n\nChoisissez la durée du massage :"
            )
        }

        StepId::SkiServiceDetails => {
            "Décrivez les services souhaités\n(ex: affûtage des carres, fartage, etc.)".to_string()
        }

        StepId::Date => format!("Entrez la date souhaitée :\n{DATE_HINT}"),
        StepId::Time => format!("Entrez l'heure souhaitée :\n{TIME_HINT}"),

        StepId::ChooseClientToRemove => "Sélectionnez un client à supprimer :".to_string(),
    }
}

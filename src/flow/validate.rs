//! Input validators
//!
//! Validators are pure: raw input in, parsed answer or rejection out. Date and
//! time checks are deliberately shallow; the tokens are stored as typed.

use super::step::Answer;
use serde::Serialize;
use std::num::IntErrorKind;
use thiserror::Error;

/// Why an input was not accepted at the current step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    #[error("La réponse ne peut pas être vide.")]
    Empty,
    #[error("Veuillez entrer un nombre valide.")]
    NotANumber,
    #[error("Veuillez entrer un nombre supérieur à zéro.")]
    NotPositive,
    #[error("Ce nombre est trop grand.")]
    TooLarge,
    #[error("Format de date invalide.\nVeuillez utiliser le format: DD.MM.YY (exemple: 25.12.24)")]
    DateFormat,
    #[error("Format d'heure invalide.\nVeuillez utiliser le format: HHhMM (exemple: 09h00)")]
    TimeFormat,
    #[error("Ce choix n'est pas disponible.")]
    UnknownOption,
    #[error("Veuillez choisir une des options proposées.")]
    ExpectedChoice,
    #[error("Veuillez répondre par un message.")]
    ExpectedText,
    #[error("Réponse inattendue à cette étape, veuillez réessayer.")]
    Inconsistent,
}

impl Rejection {
    /// Error kind reported to the transport
    pub fn kind(self) -> &'static str {
        if self.is_protocol_mismatch() {
            "protocol_mismatch"
        } else {
            "validation"
        }
    }

    /// The event type did not match what the step expects
    pub fn is_protocol_mismatch(self) -> bool {
        matches!(
            self,
            Rejection::ExpectedChoice | Rejection::ExpectedText | Rejection::Inconsistent
        )
    }
}

/// Any non-blank text
pub fn text(raw: &str) -> Result<Answer, Rejection> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Rejection::Empty);
    }
    Ok(Answer::Text(trimmed.to_string()))
}

/// A strictly positive integer
pub fn positive_integer(raw: &str) -> Result<Answer, Rejection> {
    let trimmed = raw.trim();
    match trimmed.parse::<u32>() {
        Ok(0) => Err(Rejection::NotPositive),
        Ok(n) => Ok(Answer::Count(n)),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Err(Rejection::TooLarge),
        Err(_) if is_negative_integer(trimmed) => Err(Rejection::NotPositive),
        Err(_) => Err(Rejection::NotANumber),
    }
}

fn is_negative_integer(s: &str) -> bool {
    s.strip_prefix('-')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// `DD.MM.YY`: exactly three dot-separated components, no calendar check
pub fn date_token(raw: &str) -> Result<Answer, Rejection> {
    let trimmed = raw.trim();
    if trimmed.split('.').count() != 3 {
        return Err(Rejection::DateFormat);
    }
    Ok(Answer::Text(trimmed.to_string()))
}

/// `HHhMM`: must contain the hour marker, no range check
pub fn time_token(raw: &str) -> Result<Answer, Rejection> {
    let trimmed = raw.trim();
    if !trimmed.contains('h') {
        return Err(Rejection::TimeFormat);
    }
    Ok(Answer::Text(trimmed.to_string()))
}

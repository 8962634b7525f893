//! Confirmation message variant selection.
//!
//! Which message a guest receives is a business rule and therefore lives
//! here, as a pure function of the accepted submission and the guest's
//! profile. Composing and delivering the message is the dispatcher
//! adapter's job.

use super::guest::Guest;
use super::rsvp::RsvpSubmission;

/// The distinct confirmation messages the service can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageVariant {
    /// The party declined.
    Decline,
    /// An evening party confirmed.
    EveningConfirmed,
    /// A one-person day party confirmed, with their menu choices.
    SingleDayConfirmed,
    /// A two-person day party confirmed, with per-person menu choices.
    DoubleDayConfirmed,
    /// A three-person day party confirmed, with per-person menu choices.
    TripleDayConfirmed,
}

/// Select the message variant for an accepted submission.
///
/// Driven by the overall attendance flag, the day/evening flag, and the
/// party size. Parties are capped at three names by directory validation,
/// so every reachable combination has a variant.
///
/// # Examples
/// ```
/// use rsvp_backend::domain::{Guest, MessageVariant, RsvpSubmission, select_variant};
///
/// let guest = Guest::new("CODE", vec!["Robin".into()], false);
/// let submission = RsvpSubmission {
///     attending: Some(false),
///     message: None,
///     guests: vec![],
///     email: None,
/// };
/// assert_eq!(select_variant(&guest, &submission), MessageVariant::Decline);
/// ```
#[must_use]
pub fn select_variant(guest: &Guest, submission: &RsvpSubmission) -> MessageVariant {
    if !submission.is_attending() {
        return MessageVariant::Decline;
    }
    if !guest.is_day_guest() {
        return MessageVariant::EveningConfirmed;
    }
    match guest.party_size() {
        1 => MessageVariant::SingleDayConfirmed,
        2 => MessageVariant::DoubleDayConfirmed,
        _ => MessageVariant::TripleDayConfirmed,
    }
}

/// Join names the way they read in a message: "A", "A and B", or
/// "A, B, and C".
#[must_use]
pub fn format_names(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} and {second}"),
        [rest @ .., last] => format!("{}, and {last}", rest.join(", ")),
    }
}

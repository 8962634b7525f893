//! Business-rule validation of submitted RSVPs.
//!
//! Validation is a pure function over the authenticated guest's profile,
//! the menu vocabulary, and the payload. Rules run in a fixed order and
//! short-circuit on the first failure; the submission is accepted whole or
//! rejected whole, never partially.

use super::error::{MenuCourse, ValidationError};
use super::guest::{Guest, MenuVocabulary};
use super::rsvp::{GuestEntry, RsvpSubmission};

/// Check a submission against the guest's profile and the menu.
///
/// Rule order:
///
/// 1. Overall attendance must be stated.
/// 2. Evening parties must not submit per-person entries at all.
/// 3. An attending day party must submit exactly one entry per invited
///    name. A declining day party may omit entries; entries it does submit
///    are held to the same rules.
/// 4. A two-person party must not submit two entries for the same name.
/// 5. Every entry must name someone on the invitation.
/// 6. Every entry must state its own attendance.
/// 7. Attending members of a day party must pick a starter and a main from
///    the vocabulary; declining members are exempt.
///
/// # Errors
///
/// Returns the first violated rule as a [`ValidationError`].
pub fn validate(
    guest: &Guest,
    menu: &MenuVocabulary,
    submission: &RsvpSubmission,
) -> Result<(), ValidationError> {
    let Some(attending) = submission.attending else {
        return Err(ValidationError::MissingAttendance);
    };

    if !guest.is_day_guest() && !submission.guests.is_empty() {
        return Err(ValidationError::MenuNotAllowedForGuestType);
    }

    if guest.is_day_guest() {
        let expected = guest.party_size();
        let actual = submission.guests.len();
        // A declining party need not enumerate its members.
        let entries_required = attending || actual > 0;
        if entries_required && actual != expected {
            return Err(ValidationError::WrongPartySize { expected, actual });
        }
    }

    check_duplicate_names(guest, &submission.guests)?;

    for entry in &submission.guests {
        if !guest.names().iter().any(|name| *name == entry.name) {
            return Err(ValidationError::UnrecognisedName {
                name: entry.name.clone(),
            });
        }
    }

    for entry in &submission.guests {
        if entry.attending.is_none() {
            return Err(ValidationError::MissingAttendance);
        }
    }

    if guest.is_day_guest() {
        for entry in &submission.guests {
            if entry.is_attending() {
                check_menu_choices(menu, entry)?;
            }
        }
    }

    Ok(())
}

/// Guards the two-person case where one member's entry is pasted twice
/// instead of naming both people.
fn check_duplicate_names(guest: &Guest, entries: &[GuestEntry]) -> Result<(), ValidationError> {
    if guest.party_size() == 2
        && let [first, second] = entries
        && first.name == second.name
    {
        return Err(ValidationError::DuplicateName {
            name: first.name.clone(),
        });
    }
    Ok(())
}

fn check_menu_choices(menu: &MenuVocabulary, entry: &GuestEntry) -> Result<(), ValidationError> {
    let starter = entry.starter.as_deref().unwrap_or_default();
    if !menu.offers_starter(starter) {
        return Err(ValidationError::InvalidMenuChoice {
            course: MenuCourse::Starter,
            choice: starter.to_owned(),
        });
    }
    let main = entry.main.as_deref().unwrap_or_default();
    if !menu.offers_main(main) {
        return Err(ValidationError::InvalidMenuChoice {
            course: MenuCourse::Main,
            choice: main.to_owned(),
        });
    }
    Ok(())
}

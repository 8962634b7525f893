//! RSVP wire and storage types.
//!
//! [`RsvpSubmission`] is the incoming payload; [`RsvpRecord`] is the
//! accepted, persisted form, stamped with the guest's registered names and
//! day flag so stored rows stay meaningful without re-consulting the
//! directory.

use serde::{Deserialize, Serialize};

use super::guest::Guest;

/// One invited person's reply inside a submission.
///
/// `attending` is deliberately `Option<bool>`: an omitted answer is not the
/// same as an explicit "no", and the validator insists on an explicit one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestEntry {
    /// Name as printed on the invitation.
    pub name: String,
    /// Explicit attendance answer for this person.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attending: Option<bool>,
    /// Chosen starter; only meaningful for attending day guests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starter: Option<String>,
    /// Chosen main; only meaningful for attending day guests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
}

impl GuestEntry {
    /// Whether this person answered "attending".
    #[must_use]
    pub fn is_attending(&self) -> bool {
        self.attending == Some(true)
    }
}

/// The structured response a guest submits, at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpSubmission {
    /// Overall attendance intent for the party.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attending: Option<bool>,
    /// Optional free-text message to the hosts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Per-person replies; required for attending day parties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub guests: Vec<GuestEntry>,
    /// Contact address for the confirmation message, if wanted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl RsvpSubmission {
    /// Whether the party stated it will attend.
    #[must_use]
    pub fn is_attending(&self) -> bool {
        self.attending == Some(true)
    }

    /// The contact email, if one was supplied and is non-blank.
    #[must_use]
    pub fn contact_email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }
}

/// An accepted submission as persisted, keyed externally by guest code.
///
/// At most one record ever exists per code; records are never updated or
/// deleted once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpRecord {
    /// The accepted submission, verbatim.
    #[serde(flatten)]
    pub submission: RsvpSubmission,
    /// Registered names, stamped at commit time.
    pub names: Vec<String>,
    /// Day-guest flag, stamped at commit time.
    pub day: bool,
}

impl RsvpRecord {
    /// Stamp an accepted submission with the authenticated guest's
    /// registered identity.
    #[must_use]
    pub fn accepted(guest: &Guest, submission: RsvpSubmission) -> Self {
        Self {
            submission,
            names: guest.names().to_vec(),
            day: guest.is_day_guest(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn omitted_attendance_deserialises_to_none() {
        let submission: RsvpSubmission =
            serde_json::from_str(r#"{"guests":[{"name":"Alex"}]}"#).expect("valid JSON");
        assert_eq!(submission.attending, None);
        assert_eq!(submission.guests[0].attending, None);
    }

    #[rstest]
    fn explicit_false_is_not_absent() {
        let submission: RsvpSubmission =
            serde_json::from_str(r#"{"attending":false}"#).expect("valid JSON");
        assert_eq!(submission.attending, Some(false));
        assert!(!submission.is_attending());
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("   "), None)]
    #[case(Some("alex@example.com"), Some("alex@example.com"))]
    #[case(Some(" alex@example.com "), Some("alex@example.com"))]
    fn blank_contact_emails_count_as_absent(
        #[case] email: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let submission = RsvpSubmission {
            attending: Some(true),
            message: None,
            guests: vec![],
            email: email.map(str::to_owned),
        };
        assert_eq!(submission.contact_email(), expected);
    }

    #[rstest]
    fn record_round_trips_through_json() {
        let guest = Guest::new("CODE", vec!["Alex".into()], true);
        let record = RsvpRecord::accepted(
            &guest,
            RsvpSubmission {
                attending: Some(true),
                message: Some("see you there".into()),
                guests: vec![GuestEntry {
                    name: "Alex".into(),
                    attending: Some(true),
                    starter: Some("Soup".into()),
                    main: Some("Beef".into()),
                }],
                email: None,
            },
        );
        let json = serde_json::to_string(&record).expect("record serialises");
        let reloaded: RsvpRecord = serde_json::from_str(&json).expect("record reloads");
        assert_eq!(reloaded, record);
    }

    #[rstest]
    fn record_stamps_identity_from_the_guest() {
        let guest = Guest::new("CODE", vec!["Sam".into(), "Jo".into()], false);
        let record = RsvpRecord::accepted(
            &guest,
            RsvpSubmission {
                attending: Some(false),
                message: None,
                guests: vec![],
                email: None,
            },
        );
        assert_eq!(record.names, vec!["Sam".to_owned(), "Jo".to_owned()]);
        assert!(!record.day);
    }
}

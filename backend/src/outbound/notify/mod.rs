//! Outbound confirmation mail adapter.
//!
//! Posts templated messages to the mail provider's HTTP API. The domain
//! decides which variant a guest receives; this adapter owns template
//! identifiers, substitution assembly, and the wire call. Provider-side
//! rendering and retry policy are the provider's business.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::domain::{
    DeliveryError, Guest, MessageVariant, NotificationDispatcher, RsvpSubmission, format_names,
    select_variant,
};

/// Placeholder starter/main shown for a party member who declined.
const NOT_ATTENDING_STARTER: &str = "Not attending";
const NOT_ATTENDING_MAIN: &str = "No food please!";

fn default_endpoint() -> String {
    "https://api.sendgrid.com".to_owned()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Provider template identifiers, one per message variant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailTemplates {
    /// The party declined.
    pub decline: String,
    /// One-person day party confirmed.
    pub single_day: String,
    /// Two-person day party confirmed.
    pub double_day: String,
    /// Three-person day party confirmed.
    pub triple_day: String,
    /// Evening party confirmed.
    pub evening: String,
}

impl MailTemplates {
    /// The template identifier for a selected variant.
    #[must_use]
    pub fn for_variant(&self, variant: MessageVariant) -> &str {
        match variant {
            MessageVariant::Decline => &self.decline,
            MessageVariant::SingleDayConfirmed => &self.single_day,
            MessageVariant::DoubleDayConfirmed => &self.double_day,
            MessageVariant::TripleDayConfirmed => &self.triple_day,
            MessageVariant::EveningConfirmed => &self.evening,
        }
    }
}

/// Mail provider settings, loaded with the service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailSettings {
    /// Provider API key.
    pub api_key: String,
    /// Sender address.
    pub from_email: String,
    /// Sender display name.
    pub from_name: String,
    /// Optional blind-copy address so the hosts see every confirmation.
    #[serde(default)]
    pub bcc: Option<String>,
    /// Provider API base URL; overridable for testing.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Template identifiers per variant.
    pub templates: MailTemplates,
}

/// [`NotificationDispatcher`] speaking the provider's templated-mail API.
#[derive(Debug, Clone)]
pub struct HttpNotificationDispatcher {
    client: reqwest::Client,
    settings: MailSettings,
}

impl HttpNotificationDispatcher {
    /// Build the dispatcher and its HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::SendFailed`] when the HTTP client cannot be
    /// constructed, which only happens when the TLS backend is unusable.
    pub fn new(settings: MailSettings) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|err| DeliveryError::SendFailed {
                message: format!("could not construct mail client: {err}"),
            })?;
        Ok(Self { client, settings })
    }
}

/// Assemble the template substitutions for a guest's confirmation.
///
/// `{{name}}` always carries the formatted party names. Multi-person day
/// confirmations additionally carry `{{guestN}}`, `{{guestN_starter}}` and
/// `{{guestN_main}}` per member, with placeholder courses for members who
/// declined; the single-person template only needs the courses.
#[must_use]
pub fn substitutions(guest: &Guest, submission: &RsvpSubmission) -> HashMap<String, String> {
    let mut subs = HashMap::new();
    subs.insert("{{name}}".to_owned(), format_names(guest.names()));

    if !guest.is_day_guest() || !submission.is_attending() {
        return subs;
    }

    for (index, entry) in submission.guests.iter().enumerate() {
        let n = index + 1;
        let (starter, main) = if entry.is_attending() {
            (
                entry.starter.clone().unwrap_or_default(),
                entry.main.clone().unwrap_or_default(),
            )
        } else {
            (NOT_ATTENDING_STARTER.to_owned(), NOT_ATTENDING_MAIN.to_owned())
        };
        if guest.party_size() > 1 {
            subs.insert(format!("{{{{guest{n}}}}}"), entry.name.clone());
        }
        subs.insert(format!("{{{{guest{n}_starter}}}}"), starter);
        subs.insert(format!("{{{{guest{n}_main}}}}"), main);
    }

    subs
}

#[async_trait]
impl NotificationDispatcher for HttpNotificationDispatcher {
    async fn dispatch(
        &self,
        guest: &Guest,
        submission: &RsvpSubmission,
    ) -> Result<(), DeliveryError> {
        let Some(email) = submission.contact_email() else {
            return Ok(());
        };

        let variant = select_variant(guest, submission);
        let template = self.settings.templates.for_variant(variant);

        let mut personalization = json!({
            // Addresses must not carry commas in the display name.
            "to": [{
                "email": email,
                "name": format_names(guest.names()).replace(',', ""),
            }],
            "substitutions": substitutions(guest, submission),
        });
        if let Some(bcc) = &self.settings.bcc {
            personalization["bcc"] = json!([{ "email": bcc }]);
        }

        let body = json!({
            "personalizations": [personalization],
            "from": {
                "email": self.settings.from_email,
                "name": self.settings.from_name,
            },
            "template_id": template,
        });

        let response = self
            .client
            .post(format!("{}/v3/mail/send", self.settings.endpoint))
            .bearer_auth(&self.settings.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| DeliveryError::SendFailed {
                message: format!("mail provider unreachable: {err}"),
            })?;

        if !response.status().is_success() {
            return Err(DeliveryError::SendFailed {
                message: format!("mail provider returned {}", response.status()),
            });
        }

        info!(code = %guest.code(), ?variant, "confirmation dispatched");
        Ok(())
    }
}

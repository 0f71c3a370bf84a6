//! Identity-provider user lifecycle events.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::domain::{Error, User, UserDraft, UserId};

/// Envelope of a delivered event; `data` is decoded per event type.
#[derive(Debug, Deserialize)]
pub struct EventEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

/// Decoded lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserEvent {
    Upserted(User),
    Deleted(UserId),
    Ignored(String),
}

#[derive(Debug, Deserialize)]
struct EmailAddress {
    id: String,
    email_address: String,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    id: String,
    #[serde(default)]
    email_addresses: Vec<EmailAddress>,
    primary_email_address_id: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    image_url: Option<String>,
    created_at: i64,
    updated_at: i64,
}

#[derive(Debug, Deserialize)]
struct DeletedPayload {
    id: Option<String>,
}

fn malformed(kind: &str, reason: impl std::fmt::Display) -> Error {
    Error::invalid_request(format!("malformed {kind} event: {reason}"))
}

fn timestamp(kind: &str, millis: i64) -> Result<DateTime<Utc>, Error> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| malformed(kind, format!("timestamp {millis} out of range")))
}

impl UserPayload {
    fn into_user(self, kind: &str) -> Result<User, Error> {
        let primary = self.primary_email_address_id.as_deref();
        let email = self
            .email_addresses
            .into_iter()
            .find(|address| Some(address.id.as_str()) == primary)
            .map(|address| address.email_address)
            .ok_or_else(|| {
                Error::invalid_request("No primary email found")
                    .with_details(json!({ "userId": self.id }))
            })?;
        let name = format!(
            "{} {}",
            self.first_name.unwrap_or_default(),
            self.last_name.unwrap_or_default()
        );
        let id = UserId::new(&self.id).map_err(|err| malformed(kind, err))?;
        User::new(UserDraft {
            id,
            email,
            name: Some(name),
            image_url: self.image_url.filter(|url| !url.is_empty()),
            created_at: timestamp(kind, self.created_at)?,
            updated_at: timestamp(kind, self.updated_at)?,
        })
        .map_err(|err| malformed(kind, err))
    }
}

impl TryFrom<EventEnvelope> for UserEvent {
    type Error = Error;

    fn try_from(envelope: EventEnvelope) -> Result<Self, Self::Error> {
        let EventEnvelope { kind, data } = envelope;
        match kind.as_str() {
            "user.created" | "user.updated" => {
                let payload: UserPayload =
                    serde_json::from_value(data).map_err(|err| malformed(&kind, err))?;
                Ok(Self::Upserted(payload.into_user(&kind)?))
            }
            "user.deleted" => {
                let payload: DeletedPayload =
                    serde_json::from_value(data).map_err(|err| malformed(&kind, err))?;
                let id = payload
                    .id
                    .ok_or_else(|| Error::invalid_request("No user ID found"))?;
                let id = UserId::new(&id).map_err(|err| malformed(&kind, err))?;
                Ok(Self::Deleted(id))
            }
            _ => Ok(Self::Ignored(kind)),
        }
    }
}

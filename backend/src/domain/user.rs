//! User data model.
//!
//! Users are created and removed by the identity provider; this service only
//! mirrors their profile so job contexts have an owner row to join through.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maximum length accepted for identity-provider user ids.
pub const USER_ID_MAX: usize = 255;

/// Fallback display name when the identity provider omits both name parts.
pub const DEFAULT_USER_NAME: &str = "User";

/// Validation errors returned by [`UserId::new`] and [`User::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    IdTooLong { max: usize },
    EmptyEmail,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must not contain whitespace"),
            Self::IdTooLong { max } => write!(f, "user id must be at most {max} characters"),
            Self::EmptyEmail => write!(f, "user email must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Opaque user identifier issued by the identity provider (e.g. `user_2abc`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "user_2NNEqL2nrIRdJ194ndJqAHwEfxC")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidId);
        }
        if id.chars().count() > USER_ID_MAX {
            return Err(UserValidationError::IdTooLong { max: USER_ID_MAX });
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Mirrored identity-provider profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    #[schema(example = "ada@example.com")]
    email: String,
    #[schema(example = "Ada Lovelace")]
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Input for [`User::new`].
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Validate a draft, substituting [`DEFAULT_USER_NAME`] for a blank name.
    pub fn new(draft: UserDraft) -> Result<Self, UserValidationError> {
        let UserDraft {
            id,
            email,
            name,
            image_url,
            created_at,
            updated_at,
        } = draft;
        if email.trim().is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        let name = name
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_USER_NAME.to_owned());
        Ok(Self {
            id,
            email,
            name,
            image_url,
            created_at,
            updated_at,
        })
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    //! Validation coverage for user identifiers and profiles.

    use super::*;
    use rstest::rstest;

    fn draft(name: Option<&str>, email: &str) -> UserDraft {
        let now = Utc::now();
        UserDraft {
            id: UserId::new("user_123").expect("valid id"),
            email: email.to_owned(),
            name: name.map(str::to_owned),
            image_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    #[case("", UserValidationError::EmptyId)]
    #[case("user 1", UserValidationError::InvalidId)]
    #[case(" user_1", UserValidationError::InvalidId)]
    fn user_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(UserId::new(raw), Err(expected));
    }

    #[test]
    fn user_id_rejects_overlong_input() {
        let raw = "u".repeat(USER_ID_MAX + 1);
        assert_eq!(
            UserId::new(raw),
            Err(UserValidationError::IdTooLong { max: USER_ID_MAX })
        );
    }

    #[test]
    fn user_id_round_trips_through_serde() {
        let id = UserId::new("user_2abc").expect("valid id");
        let json = serde_json::to_string(&id).expect("serialise");
        assert_eq!(json, "\"user_2abc\"");
        let back: UserId = serde_json::from_str(&json).expect("deserialise");
        assert_eq!(back, id);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("   "))]
    fn blank_names_fall_back_to_default(#[case] name: Option<&str>) {
        let user = User::new(draft(name, "ada@example.com")).expect("valid user");
        assert_eq!(user.name(), DEFAULT_USER_NAME);
    }

    #[test]
    fn names_are_trimmed() {
        let user = User::new(draft(Some(" Ada Lovelace "), "ada@example.com")).expect("valid user");
        assert_eq!(user.name(), "Ada Lovelace");
    }

    #[test]
    fn empty_email_is_rejected() {
        assert_eq!(
            User::new(draft(Some("Ada"), " ")),
            Err(UserValidationError::EmptyEmail)
        );
    }
}

//! Job context aggregate: the target role a user is rehearsing for.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{JobInfoId, UserId};

/// Maximum length of the job context name and title.
pub const JOB_INFO_TEXT_MAX: usize = 255;

/// Seniority of the rehearsed role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ExperienceLevel {
    Junior,
    MidLevel,
    Senior,
}

impl ExperienceLevel {
    /// Stable storage and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Junior => "junior",
            Self::MidLevel => "mid-level",
            Self::Senior => "senior",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExperienceLevel {
    type Err = JobInfoValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "junior" => Ok(Self::Junior),
            "mid-level" => Ok(Self::MidLevel),
            "senior" => Ok(Self::Senior),
            other => Err(JobInfoValidationError::UnknownExperienceLevel {
                value: other.to_owned(),
            }),
        }
    }
}

/// Validation errors raised when building a [`JobInfo`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobInfoValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("unknown experience level: {value}")]
    UnknownExperienceLevel { value: String },
}

impl JobInfoValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::TitleTooLong { .. } => "title",
            Self::EmptyDescription => "description",
            Self::UnknownExperienceLevel { .. } => "experienceLevel",
        }
    }
}

/// Editable job context fields supplied by the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobInfoFields {
    pub name: String,
    pub title: Option<String>,
    pub description: String,
    pub experience_level: ExperienceLevel,
}

impl JobInfoFields {
    /// Trim and validate the editable fields.
    pub fn validate(self) -> Result<Self, JobInfoValidationError> {
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            return Err(JobInfoValidationError::EmptyName);
        }
        if name.chars().count() > JOB_INFO_TEXT_MAX {
            return Err(JobInfoValidationError::NameTooLong {
                max: JOB_INFO_TEXT_MAX,
            });
        }
        let title = self
            .title
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        if title
            .as_deref()
            .is_some_and(|value| value.chars().count() > JOB_INFO_TEXT_MAX)
        {
            return Err(JobInfoValidationError::TitleTooLong {
                max: JOB_INFO_TEXT_MAX,
            });
        }
        let description = self.description.trim().to_owned();
        if description.is_empty() {
            return Err(JobInfoValidationError::EmptyDescription);
        }
        Ok(Self {
            name,
            title,
            description,
            experience_level: self.experience_level,
        })
    }
}

/// A user's target role, owning questions and interviews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobInfo {
    id: JobInfoId,
    user_id: UserId,
    #[schema(example = "Acme backend role")]
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Senior Rust Engineer")]
    title: Option<String>,
    description: String,
    experience_level: ExperienceLevel,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl JobInfo {
    /// Create a new job context owned by `user_id`.
    pub fn create(
        user_id: UserId,
        fields: JobInfoFields,
        now: DateTime<Utc>,
    ) -> Result<Self, JobInfoValidationError> {
        Self::restore(JobInfoId::random(), user_id, fields, now, now)
    }

    /// Rebuild a persisted job context, re-validating its fields.
    pub fn restore(
        id: JobInfoId,
        user_id: UserId,
        fields: JobInfoFields,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, JobInfoValidationError> {
        let JobInfoFields {
            name,
            title,
            description,
            experience_level,
        } = fields.validate()?;
        Ok(Self {
            id,
            user_id,
            name,
            title,
            description,
            experience_level,
            created_at,
            updated_at,
        })
    }

    /// Return a copy with new editable fields and a bumped update time.
    pub fn revise(
        &self,
        fields: JobInfoFields,
        now: DateTime<Utc>,
    ) -> Result<Self, JobInfoValidationError> {
        Self::restore(self.id, self.user_id.clone(), fields, self.created_at, now)
    }

    pub fn id(&self) -> JobInfoId {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Whether `user_id` owns this job context.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    pub fn experience_level(&self) -> ExperienceLevel {
        self.experience_level
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

//! Authenticated principal passed explicitly into every use-case.
//!
//! The identity adapter resolves a principal once per request; services never
//! read "the current user" from ambient state.

use super::UserId;

/// Raw feature names attached to a principal by the identity provider.
///
/// Names are kept verbatim; mapping onto [`crate::domain::Grant`] happens in
/// the entitlement adapter so unknown or renamed features simply fail to match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureClaims(Vec<String>);

impl FeatureClaims {
    /// Build claims from an iterator of feature names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// Parse the identity provider's compact `fea` claim.
    ///
    /// The claim is comma-separated; each entry may carry a `u:` (user) or
    /// `o:` (organisation) scope prefix which is stripped.
    ///
    /// # Examples
    /// ```
    /// use darasa::domain::FeatureClaims;
    ///
    /// let claims = FeatureClaims::parse_compact("u:1_interview, o:5_questions");
    /// assert!(claims.contains("1_interview"));
    /// assert!(claims.contains("5_questions"));
    /// ```
    pub fn parse_compact(raw: &str) -> Self {
        Self(
            raw.split(',')
                .map(str::trim)
                .map(|entry| {
                    entry
                        .strip_prefix("u:")
                        .or_else(|| entry.strip_prefix("o:"))
                        .unwrap_or(entry)
                })
                .filter(|entry| !entry.is_empty())
                .map(str::to_owned)
                .collect(),
        )
    }

    /// Whether the exact feature name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|entry| entry == name)
    }

    /// Iterate over the raw feature names.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Authenticated identity making a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    user_id: UserId,
    features: FeatureClaims,
}

impl Principal {
    pub fn new(user_id: UserId, features: FeatureClaims) -> Self {
        Self { user_id, features }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn features(&self) -> &FeatureClaims {
        &self.features
    }
}

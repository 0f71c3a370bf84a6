//! Entitlement resolution: which grants a principal holds and the tier they
//! imply.
//!
//! Grant names are a closed set. Legacy spellings are folded into their
//! canonical grant once, at the boundary, by [`Grant::from_feature_name`].
//! Individual grant checks never fail the caller: an erroring check counts as
//! "not granted" and the remaining checks still run.

use std::fmt;
use std::sync::Arc;

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use super::Principal;
use super::ports::EntitlementService;

/// Named boolean entitlement granted by the subscription plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grant {
    UnlimitedInterviews,
    UnlimitedQuestions,
    UnlimitedResumeAnalysis,
    OneInterview,
    FiveQuestions,
}

/// Alternate feature names accepted for a canonical grant.
const GRANT_ALIASES: &[(&str, Grant)] = &[("unlimited_interview", Grant::UnlimitedInterviews)];

impl Grant {
    /// Every grant, in resolution order.
    pub const ALL: [Self; 5] = [
        Self::UnlimitedInterviews,
        Self::UnlimitedQuestions,
        Self::UnlimitedResumeAnalysis,
        Self::OneInterview,
        Self::FiveQuestions,
    ];

    /// Canonical feature name.
    pub const fn feature_name(self) -> &'static str {
        match self {
            Self::UnlimitedInterviews => "unlimited_interviews",
            Self::UnlimitedQuestions => "unlimited_questions",
            Self::UnlimitedResumeAnalysis => "unlimited_resume_analysis",
            Self::OneInterview => "1_interview",
            Self::FiveQuestions => "5_questions",
        }
    }

    /// Resolve a provider feature name, including aliases.
    ///
    /// Unknown names resolve to `None` and therefore never grant anything.
    ///
    /// # Examples
    /// ```
    /// use darasa::domain::Grant;
    ///
    /// assert_eq!(
    ///     Grant::from_feature_name("unlimited_interview"),
    ///     Some(Grant::UnlimitedInterviews)
    /// );
    /// assert_eq!(Grant::from_feature_name("free_lunch"), None);
    /// ```
    pub fn from_feature_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|grant| grant.feature_name() == name)
            .or_else(|| {
                GRANT_ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == name)
                    .map(|(_, grant)| *grant)
            })
    }
}

impl fmt::Display for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.feature_name())
    }
}

/// Subscription tier derived from grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Free,
    Pro,
    Max,
}

/// Grants held by a principal at the time of resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntitlementFacts {
    pub unlimited_interviews: bool,
    pub unlimited_questions: bool,
    pub unlimited_resume_analysis: bool,
    pub one_interview: bool,
    pub five_questions: bool,
}

impl EntitlementFacts {
    /// Whether the facts include `grant`.
    pub const fn holds(&self, grant: Grant) -> bool {
        match grant {
            Grant::UnlimitedInterviews => self.unlimited_interviews,
            Grant::UnlimitedQuestions => self.unlimited_questions,
            Grant::UnlimitedResumeAnalysis => self.unlimited_resume_analysis,
            Grant::OneInterview => self.one_interview,
            Grant::FiveQuestions => self.five_questions,
        }
    }

    fn set(&mut self, grant: Grant, value: bool) {
        match grant {
            Grant::UnlimitedInterviews => self.unlimited_interviews = value,
            Grant::UnlimitedQuestions => self.unlimited_questions = value,
            Grant::UnlimitedResumeAnalysis => self.unlimited_resume_analysis = value,
            Grant::OneInterview => self.one_interview = value,
            Grant::FiveQuestions => self.five_questions = value,
        }
    }

    /// `max` needs unlimited interviews and unlimited resume analysis; any
    /// single unlimited grant is `pro`; everything else is `free`.
    pub const fn tier(&self) -> Tier {
        if self.unlimited_interviews && self.unlimited_resume_analysis {
            Tier::Max
        } else if self.unlimited_interviews
            || self.unlimited_resume_analysis
            || self.unlimited_questions
        {
            Tier::Pro
        } else {
            Tier::Free
        }
    }
}

/// Resolves a principal's grants against the entitlement service.
#[derive(Clone)]
pub struct EntitlementResolver {
    entitlements: Arc<dyn EntitlementService>,
}

impl EntitlementResolver {
    pub fn new(entitlements: Arc<dyn EntitlementService>) -> Self {
        Self { entitlements }
    }

    /// Check every grant independently and collect the results.
    pub async fn resolve(&self, principal: &Principal) -> EntitlementFacts {
        self.resolve_grants(principal, &Grant::ALL).await
    }

    /// Check only `grants`; unchecked grants stay `false`.
    pub async fn resolve_grants(&self, principal: &Principal, grants: &[Grant]) -> EntitlementFacts {
        let checks = grants.iter().map(|grant| async move {
            let held = match self.entitlements.has_grant(principal, *grant).await {
                Ok(held) => held,
                Err(err) => {
                    warn!(
                        user_id = %principal.user_id(),
                        grant = %grant,
                        error = %err,
                        "entitlement check failed; treating as not granted"
                    );
                    false
                }
            };
            (*grant, held)
        });

        let mut facts = EntitlementFacts::default();
        for (grant, held) in join_all(checks).await {
            facts.set(grant, held);
        }
        facts
    }
}

#[cfg(test)]
mod tests {
    //! Grant aliasing, tier formula, and fault tolerance of the resolver.

    use super::*;
    use crate::domain::ports::{EntitlementError, MockEntitlementService};
    use crate::domain::{FeatureClaims, UserId};
    use rstest::rstest;

    fn principal() -> Principal {
        Principal::new(
            UserId::new("user_1").expect("id"),
            FeatureClaims::default(),
        )
    }

    fn facts(grants: &[Grant]) -> EntitlementFacts {
        let mut facts = EntitlementFacts::default();
        for grant in grants {
            facts.set(*grant, true);
        }
        facts
    }

    #[rstest]
    #[case("unlimited_interviews", Some(Grant::UnlimitedInterviews))]
    #[case("unlimited_interview", Some(Grant::UnlimitedInterviews))]
    #[case("unlimited_questions", Some(Grant::UnlimitedQuestions))]
    #[case("unlimited_resume_analysis", Some(Grant::UnlimitedResumeAnalysis))]
    #[case("1_interview", Some(Grant::OneInterview))]
    #[case("5_questions", Some(Grant::FiveQuestions))]
    #[case("unlimited_everything", None)]
    #[case("", None)]
    fn feature_names_resolve_through_alias_table(
        #[case] name: &str,
        #[case] expected: Option<Grant>,
    ) {
        assert_eq!(Grant::from_feature_name(name), expected);
    }

    #[rstest]
    #[case(&[], Tier::Free)]
    #[case(&[Grant::OneInterview, Grant::FiveQuestions], Tier::Free)]
    #[case(&[Grant::UnlimitedQuestions], Tier::Pro)]
    #[case(&[Grant::UnlimitedInterviews], Tier::Pro)]
    #[case(&[Grant::UnlimitedResumeAnalysis], Tier::Pro)]
    #[case(&[Grant::UnlimitedInterviews, Grant::UnlimitedQuestions], Tier::Pro)]
    #[case(&[Grant::UnlimitedInterviews, Grant::UnlimitedResumeAnalysis], Tier::Max)]
    fn tier_follows_unlimited_grants(#[case] grants: &[Grant], #[case] expected: Tier) {
        assert_eq!(facts(grants).tier(), expected);
    }

    #[tokio::test]
    async fn failing_check_degrades_to_false_without_blocking_others() {
        let mut service = MockEntitlementService::new();
        service
            .expect_has_grant()
            .times(Grant::ALL.len())
            .returning(|_, grant| match grant {
                Grant::UnlimitedInterviews => Err(EntitlementError::unavailable("timeout")),
                Grant::UnlimitedResumeAnalysis | Grant::OneInterview => Ok(true),
                _ => Ok(false),
            });

        let resolved = EntitlementResolver::new(Arc::new(service))
            .resolve(&principal())
            .await;

        assert!(!resolved.unlimited_interviews);
        assert!(resolved.unlimited_resume_analysis);
        assert!(resolved.one_interview);
        assert_eq!(resolved.tier(), Tier::Pro);
    }

    #[tokio::test]
    async fn resolve_grants_checks_only_requested_grants() {
        let mut service = MockEntitlementService::new();
        service
            .expect_has_grant()
            .withf(|_, grant| *grant == Grant::FiveQuestions)
            .times(1)
            .returning(|_, _| Ok(true));

        let resolved = EntitlementResolver::new(Arc::new(service))
            .resolve_grants(&principal(), &[Grant::FiveQuestions])
            .await;

        assert_eq!(resolved, facts(&[Grant::FiveQuestions]));
    }
}

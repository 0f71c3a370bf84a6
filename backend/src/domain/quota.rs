//! Quota evaluation: may this principal perform this action now?
//!
//! Each action is permitted by an unlimited grant, or by a fixed-quantity
//! grant while the principal's own record count is below the allowance.
//! Entitlement check failures degrade to "not granted"; a failing count query
//! denies the action outright.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use super::entitlements::{EntitlementFacts, EntitlementResolver, Grant};
use super::ports::{UsageCountError, UsageCounter};
use super::{Error, Principal, UserId};

/// User-facing message returned when a plan limit blocks an action.
pub const PLAN_LIMIT_MESSAGE: &str = "You have reached your plan limit. Upgrade to continue.";

/// Completed interviews allowed under the `1_interview` grant.
pub const INTERVIEW_ALLOWANCE: u64 = 1;

/// Questions allowed under the `5_questions` grant.
pub const QUESTION_ALLOWANCE: u64 = 5;

/// Feedback generations allowed under the `5_questions` grant, counted against questions.
pub const FEEDBACK_ALLOWANCE: u64 = 5;

/// Actions gated by the subscription plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuotaAction {
    CreateInterview,
    CreateQuestion,
    CreateFeedback,
    AnalyzeResume,
}

impl QuotaAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateInterview => "create_interview",
            Self::CreateQuestion => "create_question",
            Self::CreateFeedback => "create_feedback",
            Self::AnalyzeResume => "analyze_resume",
        }
    }

    const fn rule(self) -> QuotaRule {
        match self {
            Self::CreateInterview => QuotaRule {
                unlimited: Grant::UnlimitedInterviews,
                limited: Some((Grant::OneInterview, INTERVIEW_ALLOWANCE)),
            },
            Self::CreateQuestion => QuotaRule {
                unlimited: Grant::UnlimitedQuestions,
                limited: Some((Grant::FiveQuestions, QUESTION_ALLOWANCE)),
            },
            Self::CreateFeedback => QuotaRule {
                unlimited: Grant::UnlimitedQuestions,
                limited: Some((Grant::FiveQuestions, FEEDBACK_ALLOWANCE)),
            },
            Self::AnalyzeResume => QuotaRule {
                unlimited: Grant::UnlimitedResumeAnalysis,
                limited: None,
            },
        }
    }
}

struct QuotaRule {
    unlimited: Grant,
    limited: Option<(Grant, u64)>,
}

/// Why a decision came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaBasis {
    /// An unlimited grant covers the action.
    UnlimitedGrant,
    /// The fixed-quantity grant applies and usage is below the limit.
    WithinAllowance { used: u64, limit: u64 },
    /// The fixed-quantity grant applies but usage reached the limit.
    AllowanceExhausted { used: u64, limit: u64 },
    /// Neither an unlimited nor a fixed-quantity grant is held.
    NoGrant,
    /// Usage could not be counted, so the action is denied.
    CountUnavailable,
}

/// Outcome of a quota check. Recomputed per request and never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaDecision {
    pub action: QuotaAction,
    pub basis: QuotaBasis,
}

impl QuotaDecision {
    pub const fn is_permitted(&self) -> bool {
        matches!(
            self.basis,
            QuotaBasis::UnlimitedGrant | QuotaBasis::WithinAllowance { .. }
        )
    }
}

/// Combines resolved grants with usage counts per action.
#[derive(Clone)]
pub struct QuotaEvaluator {
    resolver: EntitlementResolver,
    usage: Arc<dyn UsageCounter>,
}

impl QuotaEvaluator {
    pub fn new(resolver: EntitlementResolver, usage: Arc<dyn UsageCounter>) -> Self {
        Self { resolver, usage }
    }

    /// The resolver used for grant checks.
    pub fn resolver(&self) -> &EntitlementResolver {
        &self.resolver
    }

    /// Decide whether `principal` may perform `action`.
    pub async fn can_perform(&self, action: QuotaAction, principal: &Principal) -> QuotaDecision {
        let rule = action.rule();
        let mut grants = vec![rule.unlimited];
        if let Some((grant, _)) = rule.limited {
            grants.push(grant);
        }
        let facts = self.resolver.resolve_grants(principal, &grants).await;
        self.decide(action, principal, &facts).await
    }

    /// Like [`Self::can_perform`], but a denial becomes a `forbidden` error
    /// carrying [`PLAN_LIMIT_MESSAGE`].
    pub async fn authorize(
        &self,
        action: QuotaAction,
        principal: &Principal,
    ) -> Result<QuotaDecision, Error> {
        let decision = self.can_perform(action, principal).await;
        if decision.is_permitted() {
            return Ok(decision);
        }
        Err(Error::forbidden(PLAN_LIMIT_MESSAGE).with_details(json!({
            "action": action.as_str(),
            "code": "plan_limit",
        })))
    }

    /// Decide against already-resolved grants.
    pub async fn decide(
        &self,
        action: QuotaAction,
        principal: &Principal,
        facts: &EntitlementFacts,
    ) -> QuotaDecision {
        let rule = action.rule();
        let basis = if facts.holds(rule.unlimited) {
            QuotaBasis::UnlimitedGrant
        } else {
            match rule.limited {
                Some((grant, limit)) if facts.holds(grant) => {
                    match self.count(action, principal.user_id()).await {
                        Ok(used) if used < limit => QuotaBasis::WithinAllowance { used, limit },
                        Ok(used) => QuotaBasis::AllowanceExhausted { used, limit },
                        Err(err) => {
                            warn!(
                                user_id = %principal.user_id(),
                                action = action.as_str(),
                                error = %err,
                                "usage count failed; denying action"
                            );
                            QuotaBasis::CountUnavailable
                        }
                    }
                }
                _ => QuotaBasis::NoGrant,
            }
        };
        debug!(
            user_id = %principal.user_id(),
            action = action.as_str(),
            ?basis,
            "quota evaluated"
        );
        QuotaDecision { action, basis }
    }

    async fn count(&self, action: QuotaAction, user_id: &UserId) -> Result<u64, UsageCountError> {
        match action {
            QuotaAction::CreateInterview => self.usage.count_completed_interviews(user_id).await,
            QuotaAction::CreateQuestion | QuotaAction::CreateFeedback => {
                self.usage.count_questions(user_id).await
            }
            QuotaAction::AnalyzeResume => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests;

//! Plan summary: tier plus the live permission for each gated action.

use async_trait::async_trait;

use super::ports::{PlanPermissions, PlanQuery, PlanSummary};
use super::{Principal, QuotaAction, QuotaEvaluator, Tier};

/// Plan service implementing [`PlanQuery`].
#[derive(Clone)]
pub struct PlanService {
    quota: QuotaEvaluator,
}

impl PlanService {
    pub fn new(quota: QuotaEvaluator) -> Self {
        Self { quota }
    }
}

#[async_trait]
impl PlanQuery for PlanService {
    async fn summarize(&self, principal: &Principal) -> PlanSummary {
        let facts = self.quota.resolver().resolve(principal).await;
        let permitted = |action| async move {
            self.quota
                .decide(action, principal, &facts)
                .await
                .is_permitted()
        };
        let permissions = PlanPermissions {
            create_interview: permitted(QuotaAction::CreateInterview).await,
            create_question: permitted(QuotaAction::CreateQuestion).await,
            create_feedback: permitted(QuotaAction::CreateFeedback).await,
            analyze_resume: permitted(QuotaAction::AnalyzeResume).await,
        };
        let tier = facts.tier();
        PlanSummary {
            tier,
            is_pro_or_max: matches!(tier, Tier::Pro | Tier::Max),
            permissions,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::ports::{MockEntitlementService, MockUsageCounter};
    use crate::domain::{EntitlementResolver, FeatureClaims, Grant, UserId};

    async fn summarize_with(granted: &'static [Grant], used: u64) -> PlanSummary {
        let mut entitlements = MockEntitlementService::new();
        entitlements
            .expect_has_grant()
            .times(Grant::ALL.len())
            .returning(move |_, grant| Ok(granted.contains(&grant)));
        let mut usage = MockUsageCounter::new();
        usage
            .expect_count_completed_interviews()
            .returning(move |_| Ok(used));
        usage.expect_count_questions().returning(move |_| Ok(used));
        let service = PlanService::new(QuotaEvaluator::new(
            EntitlementResolver::new(Arc::new(entitlements)),
            Arc::new(usage),
        ));
        let principal = Principal::new(UserId::new("user_plan").expect("id"), FeatureClaims::default());

        service.summarize(&principal).await
    }

    #[tokio::test]
    async fn free_plan_with_fresh_allowances() {
        let summary = summarize_with(&[Grant::OneInterview, Grant::FiveQuestions], 0).await;

        assert_eq!(summary.tier, Tier::Free);
        assert!(!summary.is_pro_or_max);
        assert_eq!(
            summary.permissions,
            PlanPermissions {
                create_interview: true,
                create_question: true,
                create_feedback: true,
                analyze_resume: false,
            }
        );
    }

    #[tokio::test]
    async fn max_plan_without_question_grant_cannot_create_questions() {
        let summary = summarize_with(
            &[Grant::UnlimitedInterviews, Grant::UnlimitedResumeAnalysis],
            50,
        )
        .await;

        assert_eq!(summary.tier, Tier::Max);
        assert!(summary.is_pro_or_max);
        assert!(summary.permissions.create_interview);
        assert!(summary.permissions.analyze_resume);
        assert!(!summary.permissions.create_question);
    }

    #[tokio::test]
    async fn summary_serializes_in_camel_case() {
        let summary = summarize_with(&[Grant::UnlimitedQuestions], 0).await;

        let value = serde_json::to_value(summary).expect("serialize");

        assert_eq!(value["tier"], "pro");
        assert_eq!(value["isProOrMax"], true);
        assert_eq!(value["permissions"]["createQuestion"], true);
    }
}

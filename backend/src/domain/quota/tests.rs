//! Quota decisions across grants, counts, and dependency failures.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{
    EntitlementError, MockEntitlementService, MockUsageCounter, UsageCountError,
};
use crate::domain::{FeatureClaims, Principal, UserId};

fn principal() -> Principal {
    Principal::new(UserId::new("user_quota").expect("id"), FeatureClaims::default())
}

fn entitlements(granted: &'static [Grant]) -> MockEntitlementService {
    let mut service = MockEntitlementService::new();
    service
        .expect_has_grant()
        .returning(move |_, grant| Ok(granted.contains(&grant)));
    service
}

fn counter_returning(count: u64) -> MockUsageCounter {
    let mut counter = MockUsageCounter::new();
    counter
        .expect_count_completed_interviews()
        .returning(move |_| Ok(count));
    counter.expect_count_questions().returning(move |_| Ok(count));
    counter
}

fn evaluator(service: MockEntitlementService, counter: MockUsageCounter) -> QuotaEvaluator {
    QuotaEvaluator::new(
        EntitlementResolver::new(Arc::new(service)),
        Arc::new(counter),
    )
}

#[rstest]
#[case(QuotaAction::CreateInterview, &[Grant::UnlimitedInterviews])]
#[case(QuotaAction::CreateQuestion, &[Grant::UnlimitedQuestions])]
#[case(QuotaAction::CreateFeedback, &[Grant::UnlimitedQuestions])]
#[case(QuotaAction::AnalyzeResume, &[Grant::UnlimitedResumeAnalysis])]
#[tokio::test]
async fn unlimited_grant_permits_regardless_of_usage(
    #[case] action: QuotaAction,
    #[case] granted: &'static [Grant],
) {
    let mut counter = MockUsageCounter::new();
    counter.expect_count_completed_interviews().never();
    counter.expect_count_questions().never();

    let decision = evaluator(entitlements(granted), counter)
        .can_perform(action, &principal())
        .await;

    assert_eq!(decision.basis, QuotaBasis::UnlimitedGrant);
    assert!(decision.is_permitted());
}

#[rstest]
#[case(QuotaAction::CreateInterview)]
#[case(QuotaAction::CreateQuestion)]
#[case(QuotaAction::CreateFeedback)]
#[case(QuotaAction::AnalyzeResume)]
#[tokio::test]
async fn no_grant_denies_regardless_of_usage(#[case] action: QuotaAction) {
    let decision = evaluator(entitlements(&[]), counter_returning(0))
        .can_perform(action, &principal())
        .await;

    assert_eq!(decision.basis, QuotaBasis::NoGrant);
    assert!(!decision.is_permitted());
}

#[rstest]
#[case(QuotaAction::CreateInterview, &[Grant::OneInterview], 0, true)]
#[case(QuotaAction::CreateInterview, &[Grant::OneInterview], 1, false)]
#[case(QuotaAction::CreateInterview, &[Grant::OneInterview], 2, false)]
#[case(QuotaAction::CreateQuestion, &[Grant::FiveQuestions], 4, true)]
#[case(QuotaAction::CreateQuestion, &[Grant::FiveQuestions], 5, false)]
#[case(QuotaAction::CreateFeedback, &[Grant::FiveQuestions], 4, true)]
#[case(QuotaAction::CreateFeedback, &[Grant::FiveQuestions], 5, false)]
#[tokio::test]
async fn fixed_grant_permits_only_below_allowance(
    #[case] action: QuotaAction,
    #[case] granted: &'static [Grant],
    #[case] used: u64,
    #[case] permitted: bool,
) {
    let decision = evaluator(entitlements(granted), counter_returning(used))
        .can_perform(action, &principal())
        .await;

    assert_eq!(decision.is_permitted(), permitted);
    if permitted {
        assert!(matches!(decision.basis, QuotaBasis::WithinAllowance { used: u, .. } if u == used));
    } else {
        assert!(
            matches!(decision.basis, QuotaBasis::AllowanceExhausted { used: u, .. } if u == used)
        );
    }
}

#[tokio::test]
async fn completed_interview_exhausts_single_interview_allowance() {
    let first = evaluator(entitlements(&[Grant::OneInterview]), counter_returning(0))
        .can_perform(QuotaAction::CreateInterview, &principal())
        .await;
    let second = evaluator(entitlements(&[Grant::OneInterview]), counter_returning(1))
        .can_perform(QuotaAction::CreateInterview, &principal())
        .await;

    assert!(first.is_permitted());
    assert_eq!(
        second.basis,
        QuotaBasis::AllowanceExhausted {
            used: 1,
            limit: INTERVIEW_ALLOWANCE
        }
    );
}

#[tokio::test]
async fn count_failure_denies() {
    let mut counter = MockUsageCounter::new();
    counter
        .expect_count_questions()
        .times(1)
        .returning(|_| Err(UsageCountError::connection("pool exhausted")));

    let decision = evaluator(entitlements(&[Grant::FiveQuestions]), counter)
        .can_perform(QuotaAction::CreateQuestion, &principal())
        .await;

    assert_eq!(decision.basis, QuotaBasis::CountUnavailable);
    assert!(!decision.is_permitted());
}

#[tokio::test]
async fn failing_unlimited_check_falls_back_to_allowance() {
    let mut service = MockEntitlementService::new();
    service.expect_has_grant().returning(|_, grant| match grant {
        Grant::UnlimitedQuestions => Err(EntitlementError::unavailable("timeout")),
        Grant::FiveQuestions => Ok(true),
        _ => Ok(false),
    });

    let decision = evaluator(service, counter_returning(2))
        .can_perform(QuotaAction::CreateQuestion, &principal())
        .await;

    assert_eq!(
        decision.basis,
        QuotaBasis::WithinAllowance {
            used: 2,
            limit: QUESTION_ALLOWANCE
        }
    );
}

#[tokio::test]
async fn counts_are_scoped_to_the_requesting_principal() {
    let mut counter = MockUsageCounter::new();
    counter
        .expect_count_questions()
        .withf(|user_id| user_id.as_ref() == "user_quota")
        .times(1)
        .returning(|_| Ok(0));

    let decision = evaluator(entitlements(&[Grant::FiveQuestions]), counter)
        .can_perform(QuotaAction::CreateFeedback, &principal())
        .await;

    assert!(decision.is_permitted());
}

#[tokio::test]
async fn feedback_is_denied_once_question_allowance_is_used() {
    let mut counter = MockUsageCounter::new();
    counter
        .expect_count_questions()
        .times(1)
        .returning(|_| Ok(QUESTION_ALLOWANCE));

    let decision = evaluator(entitlements(&[Grant::FiveQuestions]), counter)
        .can_perform(QuotaAction::CreateFeedback, &principal())
        .await;

    assert_eq!(
        decision.basis,
        QuotaBasis::AllowanceExhausted {
            used: QUESTION_ALLOWANCE,
            limit: FEEDBACK_ALLOWANCE
        }
    );
    assert!(!decision.is_permitted());
}

#[tokio::test]
async fn authorize_maps_denial_to_upgrade_message() {
    let err = evaluator(entitlements(&[Grant::FiveQuestions]), counter_returning(5))
        .authorize(QuotaAction::CreateQuestion, &principal())
        .await
        .expect_err("allowance exhausted");

    assert_eq!(err.code(), crate::domain::ErrorCode::Forbidden);
    assert_eq!(err.message(), PLAN_LIMIT_MESSAGE);
    assert_eq!(
        err.details().and_then(|details| details.get("action")),
        Some(&serde_json::json!("create_question"))
    );
}

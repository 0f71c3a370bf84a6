//! Driving port summarising the principal's plan.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Principal, Tier};

/// Whether each gated action is currently permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanPermissions {
    pub create_interview: bool,
    pub create_question: bool,
    pub create_feedback: bool,
    pub analyze_resume: bool,
}

/// Tier plus live permissions for the principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub tier: Tier,
    pub is_pro_or_max: bool,
    pub permissions: PlanPermissions,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlanQuery: Send + Sync {
    /// Resolve grants once and evaluate every gated action against them.
    async fn summarize(&self, principal: &Principal) -> PlanSummary;
}

//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    GenerationCommand, IdentityProvider, InterviewCommand, InterviewQuery, JobInfoCommand,
    JobInfoQuery, PlanQuery, UserAccountCommand, UserAccountQuery,
};

use super::webhooks::WebhookVerifier;

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub identity: Arc<dyn IdentityProvider>,
    pub job_infos: Arc<dyn JobInfoCommand>,
    pub job_infos_query: Arc<dyn JobInfoQuery>,
    pub generation: Arc<dyn GenerationCommand>,
    pub interviews: Arc<dyn InterviewCommand>,
    pub interviews_query: Arc<dyn InterviewQuery>,
    pub plan: Arc<dyn PlanQuery>,
    pub accounts: Arc<dyn UserAccountCommand>,
    pub accounts_query: Arc<dyn UserAccountQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub identity: Arc<dyn IdentityProvider>,
    pub job_infos: Arc<dyn JobInfoCommand>,
    pub job_infos_query: Arc<dyn JobInfoQuery>,
    pub generation: Arc<dyn GenerationCommand>,
    pub interviews: Arc<dyn InterviewCommand>,
    pub interviews_query: Arc<dyn InterviewQuery>,
    pub plan: Arc<dyn PlanQuery>,
    pub accounts: Arc<dyn UserAccountCommand>,
    pub accounts_query: Arc<dyn UserAccountQuery>,
    /// Verifier for identity-provider webhooks; `None` rejects deliveries.
    pub webhook_verifier: Option<Arc<WebhookVerifier>>,
}

impl HttpState {
    /// Construct state from a ports bundle with webhooks disabled.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            identity,
            job_infos,
            job_infos_query,
            generation,
            interviews,
            interviews_query,
            plan,
            accounts,
            accounts_query,
        } = ports;
        Self {
            identity,
            job_infos,
            job_infos_query,
            generation,
            interviews,
            interviews_query,
            plan,
            accounts,
            accounts_query,
            webhook_verifier: None,
        }
    }

    /// Enable webhook deliveries verified by `verifier`.
    pub fn with_webhook_verifier(mut self, verifier: WebhookVerifier) -> Self {
        self.webhook_verifier = Some(Arc::new(verifier));
        self
    }
}

//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::{
    MockGenerationCommand, MockIdentityProvider, MockInterviewCommand, MockInterviewQuery,
    MockJobInfoCommand, MockJobInfoQuery, MockPlanQuery, MockUserAccountCommand,
    MockUserAccountQuery,
};
use crate::domain::{FeatureClaims, Principal, UserId};

use super::state::{HttpState, HttpStatePorts};

/// Build a principal with no feature claims.
pub fn principal(id: &str) -> Principal {
    Principal::new(UserId::new(id).expect("valid user id"), FeatureClaims::default())
}

/// Mocked driving ports; configure expectations, then call [`Self::into_state`].
#[derive(Default)]
pub struct TestPorts {
    pub identity: MockIdentityProvider,
    pub job_infos: MockJobInfoCommand,
    pub job_infos_query: MockJobInfoQuery,
    pub generation: MockGenerationCommand,
    pub interviews: MockInterviewCommand,
    pub interviews_query: MockInterviewQuery,
    pub plan: MockPlanQuery,
    pub accounts: MockUserAccountCommand,
    pub accounts_query: MockUserAccountQuery,
}

impl TestPorts {
    /// Ports whose identity provider treats any bearer token as the user id.
    pub fn authenticating() -> Self {
        let mut ports = Self::default();
        ports
            .identity
            .expect_authenticate()
            .returning(|token| Ok(principal(token)));
        ports
    }

    pub fn into_http_state(self) -> HttpState {
        HttpState::new(HttpStatePorts {
            identity: Arc::new(self.identity),
            job_infos: Arc::new(self.job_infos),
            job_infos_query: Arc::new(self.job_infos_query),
            generation: Arc::new(self.generation),
            interviews: Arc::new(self.interviews),
            interviews_query: Arc::new(self.interviews_query),
            plan: Arc::new(self.plan),
            accounts: Arc::new(self.accounts),
            accounts_query: Arc::new(self.accounts_query),
        })
    }

    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(self.into_http_state())
    }
}

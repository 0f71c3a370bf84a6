//! Builders wiring adapters into the domain services behind `HttpState`.

use std::sync::Arc;

use actix_web::web;
use tracing::warn;

use darasa::domain::ports::{
    ContentCache, FeedbackRepository, FixtureFeedbackRepository, FixtureIdentityProvider,
    FixtureInterviewRepository, FixtureJobInfoRepository, FixtureQuestionRepository,
    FixtureTextGenerator, FixtureUsageCounter, FixtureUserRepository, GenerationMetrics,
    IdentityProvider, InterviewRepository, JobInfoRepository, QuestionRepository, TextGenerator,
    UsageCounter, UserRepository,
};
use darasa::domain::{
    EntitlementResolver, GenerationOrchestrator, GenerationPorts, InterviewService,
    JobInfoService, PlanService, QuotaEvaluator, UserAccountService,
};
use darasa::inbound::http::state::{HttpState, HttpStatePorts};
use darasa::outbound::cache::TaggedContentCache;
use darasa::outbound::identity::ClaimsEntitlementService;
use darasa::outbound::persistence::{
    DbPool, DieselFeedbackRepository, DieselInterviewRepository, DieselJobInfoRepository,
    DieselQuestionRepository, DieselUsageCounter, DieselUserRepository,
};

use super::ServerConfig;

/// Driven persistence ports shared by the services.
pub(crate) struct Repositories {
    pub(crate) job_infos: Arc<dyn JobInfoRepository>,
    pub(crate) questions: Arc<dyn QuestionRepository>,
    pub(crate) feedback: Arc<dyn FeedbackRepository>,
    pub(crate) interviews: Arc<dyn InterviewRepository>,
    pub(crate) users: Arc<dyn UserRepository>,
    pub(crate) usage: Arc<dyn UsageCounter>,
}

impl Repositories {
    fn from_pool(pool: &DbPool) -> Self {
        Self {
            job_infos: Arc::new(DieselJobInfoRepository::new(pool.clone())),
            questions: Arc::new(DieselQuestionRepository::new(pool.clone())),
            feedback: Arc::new(DieselFeedbackRepository::new(pool.clone())),
            interviews: Arc::new(DieselInterviewRepository::new(pool.clone())),
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            usage: Arc::new(DieselUsageCounter::new(pool.clone())),
        }
    }

    fn fixtures() -> Self {
        Self {
            job_infos: Arc::new(FixtureJobInfoRepository),
            questions: Arc::new(FixtureQuestionRepository),
            feedback: Arc::new(FixtureFeedbackRepository),
            interviews: Arc::new(FixtureInterviewRepository),
            users: Arc::new(FixtureUserRepository),
            usage: Arc::new(FixtureUsageCounter),
        }
    }
}

fn build_repositories(config: &ServerConfig) -> Repositories {
    match &config.db_pool {
        Some(pool) => Repositories::from_pool(pool),
        None => {
            warn!("no database configured; serving fixture repositories");
            Repositories::fixtures()
        }
    }
}

fn build_identity(config: &ServerConfig) -> Arc<dyn IdentityProvider> {
    config.identity.clone().unwrap_or_else(|| {
        warn!("no session verification key configured; every request is anonymous");
        Arc::new(FixtureIdentityProvider)
    })
}

fn build_generator(config: &ServerConfig) -> Arc<dyn TextGenerator> {
    config.generator.clone().unwrap_or_else(|| {
        warn!("no generation API key configured; generation requests will fail");
        Arc::new(FixtureTextGenerator)
    })
}

/// Assemble the HTTP handler state from configured adapters.
pub(crate) fn build_http_state(
    config: &ServerConfig,
    metrics: Arc<dyn GenerationMetrics>,
) -> web::Data<HttpState> {
    let Repositories {
        job_infos,
        questions,
        feedback,
        interviews,
        users,
        usage,
    } = build_repositories(config);
    let cache: Arc<dyn ContentCache> = Arc::new(TaggedContentCache::new(config.cache));
    let quota = QuotaEvaluator::new(
        EntitlementResolver::new(Arc::new(ClaimsEntitlementService)),
        usage,
    );

    let job_info_service = Arc::new(JobInfoService::new(
        job_infos.clone(),
        questions.clone(),
        cache.clone(),
    ));
    let interview_service = Arc::new(InterviewService::new(
        job_infos.clone(),
        interviews,
        quota.clone(),
        cache.clone(),
    ));
    let accounts = Arc::new(UserAccountService::new(users, cache.clone()));
    let generation = Arc::new(GenerationOrchestrator::new(GenerationPorts {
        job_infos,
        questions,
        feedback,
        generator: build_generator(config),
        quota: quota.clone(),
        cache,
        metrics,
    }));

    let mut state = HttpState::new(HttpStatePorts {
        identity: build_identity(config),
        job_infos: job_info_service.clone(),
        job_infos_query: job_info_service,
        generation,
        interviews: interview_service.clone(),
        interviews_query: interview_service,
        plan: Arc::new(PlanService::new(quota)),
        accounts: accounts.clone(),
        accounts_query: accounts,
    });
    match config.webhook_verifier.clone() {
        Some(verifier) => state = state.with_webhook_verifier(verifier),
        None => warn!("no webhook signing secret configured; identity webhooks are refused"),
    }
    web::Data::new(state)
}

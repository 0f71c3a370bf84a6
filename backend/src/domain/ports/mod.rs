//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod content_cache;
mod entitlement_service;
mod feedback_repository;
mod generation_command;
mod generation_metrics;
mod identity_provider;
mod interview_command;
mod interview_query;
mod interview_repository;
mod job_info_command;
mod job_info_query;
mod job_info_repository;
mod plan_query;
mod question_repository;
mod text_generator;
mod usage_counter;
mod user_account_command;
mod user_account_query;
mod user_repository;

#[cfg(test)]
pub use content_cache::MockContentCache;
pub use content_cache::{ContentCache, NoOpContentCache};
#[cfg(test)]
pub use entitlement_service::MockEntitlementService;
pub use entitlement_service::{EntitlementError, EntitlementService, FixtureEntitlementService};
#[cfg(test)]
pub use feedback_repository::MockFeedbackRepository;
pub use feedback_repository::{
    FeedbackRepository, FeedbackRepositoryError, FixtureFeedbackRepository,
};
#[cfg(test)]
pub use generation_command::MockGenerationCommand;
pub use generation_command::{
    GenerateFeedbackRequest, GenerateQuestionRequest, GenerationChunks, GenerationCommand,
    GenerationStream, GenerationStreamError,
};
#[cfg(test)]
pub use generation_metrics::MockGenerationMetrics;
pub use generation_metrics::{
    GeneratedContent, GenerationMetrics, GenerationMetricsError, NoOpGenerationMetrics,
};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{FixtureIdentityProvider, IdentityError, IdentityProvider};
#[cfg(test)]
pub use interview_command::MockInterviewCommand;
pub use interview_command::{CompleteInterviewRequest, InterviewCommand};
#[cfg(test)]
pub use interview_query::MockInterviewQuery;
pub use interview_query::InterviewQuery;
#[cfg(test)]
pub use interview_repository::MockInterviewRepository;
pub use interview_repository::{
    FixtureInterviewRepository, InterviewCompletion, InterviewRepository,
    InterviewRepositoryError,
};
#[cfg(test)]
pub use job_info_command::MockJobInfoCommand;
pub use job_info_command::JobInfoCommand;
#[cfg(test)]
pub use job_info_query::MockJobInfoQuery;
pub use job_info_query::JobInfoQuery;
#[cfg(test)]
pub use job_info_repository::MockJobInfoRepository;
pub use job_info_repository::{FixtureJobInfoRepository, JobInfoRepository, JobInfoRepositoryError};
#[cfg(test)]
pub use plan_query::MockPlanQuery;
pub use plan_query::{PlanPermissions, PlanQuery, PlanSummary};
#[cfg(test)]
pub use question_repository::MockQuestionRepository;
pub use question_repository::{
    FixtureQuestionRepository, QuestionRepository, QuestionRepositoryError,
};
#[cfg(test)]
pub use text_generator::MockTextGenerator;
pub use text_generator::{
    FixtureTextGenerator, GenerationPrompt, PromptRole, PromptTurn, TextChunkStream,
    TextGenerationError, TextGenerator,
};
#[cfg(test)]
pub use usage_counter::MockUsageCounter;
pub use usage_counter::{FixtureUsageCounter, UsageCountError, UsageCounter};
#[cfg(test)]
pub use user_account_command::MockUserAccountCommand;
pub use user_account_command::UserAccountCommand;
#[cfg(test)]
pub use user_account_query::MockUserAccountQuery;
pub use user_account_query::UserAccountQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserRepository, UserRepositoryError};

//! Domain primitives, use-cases, and ports.
//!
//! Purpose: keep the rehearsal workflow (entitlements, quotas, streamed
//! generation, and the cache ledger) independent of HTTP, PostgreSQL, and the
//! model vendor. Inbound adapters call the driving ports in [`ports`];
//! outbound adapters implement the driven ones.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifier.
//! - Principal / UserId / User: the caller and their mirrored record.
//! - JobInfo / Question / Feedback / Interview: owned content.
//! - EntitlementResolver / QuotaEvaluator: plan gating.
//! - GenerationOrchestrator: placeholder, stream, then finalize by id.

pub mod access;
pub mod cache;
pub mod content;
pub mod entitlements;
pub mod error;
pub(crate) mod error_mapping;
pub mod generation;
pub mod ids;
pub mod interview_service;
pub mod job_info;
pub mod job_info_service;
pub mod plan_service;
pub mod ports;
pub mod principal;
pub mod quota;
pub mod trace_id;
pub mod user;
pub mod user_account_service;

pub use self::access::{NO_PERMISSION_MESSAGE, NOT_LOGGED_IN_MESSAGE, require_principal};
pub use self::cache::{
    CacheKey, CacheTag, TagSnapshot, cached_read, feedback_write_tags, interview_write_tags,
    job_info_write_tags, question_write_tags,
};
pub use self::content::{
    DURATION_MAX, Feedback, Interview, InterviewValidationError, PLACEHOLDER_TEXT, Question,
    QuestionDifficulty, UnknownDifficulty, validate_duration, validate_external_session_id,
};
pub use self::entitlements::{EntitlementFacts, EntitlementResolver, Grant, Tier};
pub use self::error::{Error, ErrorCode};
pub use self::generation::{GenerationOrchestrator, GenerationPorts};
pub use self::ids::{FeedbackId, InterviewId, JobInfoId, QuestionId};
pub use self::interview_service::InterviewService;
pub use self::job_info::{
    ExperienceLevel, JOB_INFO_TEXT_MAX, JobInfo, JobInfoFields, JobInfoValidationError,
};
pub use self::job_info_service::JobInfoService;
pub use self::plan_service::PlanService;
pub use self::principal::{FeatureClaims, Principal};
pub use self::quota::{
    FEEDBACK_ALLOWANCE, INTERVIEW_ALLOWANCE, PLAN_LIMIT_MESSAGE, QUESTION_ALLOWANCE, QuotaAction,
    QuotaBasis, QuotaDecision, QuotaEvaluator,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{DEFAULT_USER_NAME, USER_ID_MAX, User, UserDraft, UserId, UserValidationError};
pub use self::user_account_service::UserAccountService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use darasa::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
///
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;

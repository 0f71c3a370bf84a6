//! Cache invalidation ledger vocabulary.
//!
//! Reads that list or fetch content are cached under deterministic keys and
//! tagged with the scopes they depend on. Writes invalidate the tags for the
//! record itself, the list under its owning job context, and (for job
//! contexts) the owner's list. Invalidation completes before the write
//! returns to its caller.

use std::fmt;
use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::ports::ContentCache;
use super::{FeedbackId, InterviewId, JobInfoId, QuestionId, UserId};

/// Invalidation scope attached to cached reads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheTag {
    /// A single mirrored user.
    User(UserId),
    /// The list of job contexts owned by a user.
    UserJobInfos(UserId),
    /// A single job context.
    JobInfo(JobInfoId),
    /// The question list of a job context.
    JobInfoQuestions(JobInfoId),
    /// A single question.
    Question(QuestionId),
    /// The feedback list of a question.
    QuestionFeedback(QuestionId),
    /// A single feedback record.
    Feedback(FeedbackId),
    /// The interview list of a job context.
    JobInfoInterviews(JobInfoId),
    /// A single interview.
    Interview(InterviewId),
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(f, "user:{id}"),
            Self::UserJobInfos(id) => write!(f, "user:{id}:job-infos"),
            Self::JobInfo(id) => write!(f, "job-info:{id}"),
            Self::JobInfoQuestions(id) => write!(f, "job-info:{id}:questions"),
            Self::Question(id) => write!(f, "question:{id}"),
            Self::QuestionFeedback(id) => write!(f, "question:{id}:feedback"),
            Self::Feedback(id) => write!(f, "feedback:{id}"),
            Self::JobInfoInterviews(id) => write!(f, "job-info:{id}:interviews"),
            Self::Interview(id) => write!(f, "interview:{id}"),
        }
    }
}

/// Tags touched by a write to a job context.
pub fn job_info_write_tags(owner: &UserId, id: JobInfoId) -> Vec<CacheTag> {
    vec![CacheTag::JobInfo(id), CacheTag::UserJobInfos(owner.clone())]
}

/// Tags touched by a write to a question.
pub fn question_write_tags(job_info_id: JobInfoId, id: QuestionId) -> Vec<CacheTag> {
    vec![
        CacheTag::Question(id),
        CacheTag::JobInfoQuestions(job_info_id),
    ]
}

/// Tags touched by a write to feedback on a question.
pub fn feedback_write_tags(question_id: QuestionId, id: FeedbackId) -> Vec<CacheTag> {
    vec![
        CacheTag::Feedback(id),
        CacheTag::QuestionFeedback(question_id),
    ]
}

/// Tags touched by a write to an interview.
pub fn interview_write_tags(job_info_id: JobInfoId, id: InterviewId) -> Vec<CacheTag> {
    vec![
        CacheTag::Interview(id),
        CacheTag::JobInfoInterviews(job_info_id),
    ]
}

/// Deterministic key of a cached read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn user(id: &UserId) -> Self {
        Self(format!("user/{id}"))
    }

    pub fn job_info_list(owner: &UserId) -> Self {
        Self(format!("job-infos/by-user/{owner}"))
    }

    pub fn job_info(id: JobInfoId) -> Self {
        Self(format!("job-infos/{id}"))
    }

    pub fn question_list(job_info_id: JobInfoId) -> Self {
        Self(format!("questions/by-job-info/{job_info_id}"))
    }

    pub fn interview_list(job_info_id: JobInfoId) -> Self {
        Self(format!("interviews/completed/by-job-info/{job_info_id}"))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag stamps observed before a cached value was loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSnapshot(Vec<(CacheTag, u64)>);

impl TagSnapshot {
    pub fn new(stamps: Vec<(CacheTag, u64)>) -> Self {
        Self(stamps)
    }

    /// Iterate over `(tag, generation)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = &(CacheTag, u64)> {
        self.0.iter()
    }
}

/// Serve `key` from the cache, or load it and cache the result under `tags`.
///
/// Undecodable cache entries are treated as misses. Loader errors are
/// returned unchanged and never cached.
pub async fn cached_read<T, E, F, Fut>(
    cache: &dyn ContentCache,
    key: CacheKey,
    tags: &[CacheTag],
    load: F,
) -> Result<T, E>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    if let Some(value) = cache.get(&key).await {
        match serde_json::from_value(value) {
            Ok(hit) => return Ok(hit),
            Err(err) => debug!(key = %key, error = %err, "discarding undecodable cache entry"),
        }
    }

    let snapshot = cache.snapshot(tags);
    let loaded = load().await?;
    match serde_json::to_value(&loaded) {
        Ok(value) => cache.put(key, value, snapshot).await,
        Err(err) => warn!(key = %key, error = %err, "failed to encode value for cache"),
    }
    Ok(loaded)
}

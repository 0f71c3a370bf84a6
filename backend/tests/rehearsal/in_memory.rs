//! In-memory driven adapters for end-to-end rehearsal tests.
//!
//! One shared store backs every repository so usage counts can join across
//! tables the way the SQL adapter does.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::{StreamExt, stream};

use darasa::domain::ports::{
    FeedbackRepository, FeedbackRepositoryError, GenerationPrompt, IdentityError,
    IdentityProvider, InterviewCompletion, InterviewRepository, InterviewRepositoryError,
    JobInfoRepository, JobInfoRepositoryError, QuestionRepository, QuestionRepositoryError,
    TextChunkStream, TextGenerationError, TextGenerator, UsageCountError, UsageCounter,
    UserRepository, UserRepositoryError,
};
use darasa::domain::{
    FeatureClaims, Feedback, FeedbackId, Interview, InterviewId, JobInfo, JobInfoId, Principal,
    Question, QuestionId, User, UserId,
};

#[derive(Default)]
struct Tables {
    job_infos: Vec<JobInfo>,
    questions: Vec<Question>,
    feedback: Vec<Feedback>,
    interviews: Vec<Interview>,
    users: Vec<User>,
}

impl Tables {
    fn owned_job_info_ids(&self, user_id: &UserId) -> Vec<JobInfoId> {
        self.job_infos
            .iter()
            .filter(|job_info| job_info.is_owned_by(user_id))
            .map(JobInfo::id)
            .collect()
    }

    fn owned_question_ids(&self, user_id: &UserId) -> Vec<QuestionId> {
        let job_infos = self.owned_job_info_ids(user_id);
        self.questions
            .iter()
            .filter(|question| job_infos.contains(&question.job_info_id))
            .map(|question| question.id)
            .collect()
    }
}

#[derive(Clone, Default)]
pub(crate) struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().expect("store lock")
    }

    pub(crate) fn seed_finalized_questions(&self, job_info_id: JobInfoId, count: usize) {
        let mut tables = self.tables();
        for index in 0..count {
            let mut question = Question::placeholder(
                job_info_id,
                darasa::domain::QuestionDifficulty::Easy,
                Utc::now(),
            );
            question.text = format!("Seeded question {index}");
            tables.questions.push(question);
        }
    }

    pub(crate) fn question(&self, id: QuestionId) -> Option<Question> {
        self.tables()
            .questions
            .iter()
            .find(|question| question.id == id)
            .cloned()
    }

    pub(crate) fn feedback_for(&self, question_id: QuestionId) -> Vec<Feedback> {
        self.tables()
            .feedback
            .iter()
            .filter(|feedback| feedback.question_id == question_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl JobInfoRepository for InMemoryStore {
    async fn insert(&self, job_info: &JobInfo) -> Result<(), JobInfoRepositoryError> {
        self.tables().job_infos.push(job_info.clone());
        Ok(())
    }

    async fn update(&self, job_info: &JobInfo) -> Result<bool, JobInfoRepositoryError> {
        let mut tables = self.tables();
        match tables
            .job_infos
            .iter_mut()
            .find(|existing| existing.id() == job_info.id())
        {
            Some(existing) => {
                *existing = job_info.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_by_id(&self, id: JobInfoId) -> Result<Option<JobInfo>, JobInfoRepositoryError> {
        Ok(self
            .tables()
            .job_infos
            .iter()
            .find(|job_info| job_info.id() == id)
            .cloned())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<JobInfo>, JobInfoRepositoryError> {
        Ok(self
            .tables()
            .job_infos
            .iter()
            .filter(|job_info| job_info.is_owned_by(user_id))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: JobInfoId) -> Result<bool, JobInfoRepositoryError> {
        let mut tables = self.tables();
        let before = tables.job_infos.len();
        tables.job_infos.retain(|job_info| job_info.id() != id);
        Ok(tables.job_infos.len() != before)
    }
}

#[async_trait]
impl QuestionRepository for InMemoryStore {
    async fn insert(&self, question: &Question) -> Result<(), QuestionRepositoryError> {
        self.tables().questions.push(question.clone());
        Ok(())
    }

    async fn finalize(
        &self,
        id: QuestionId,
        text: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, QuestionRepositoryError> {
        let mut tables = self.tables();
        match tables.questions.iter_mut().find(|question| question.id == id) {
            Some(question) => {
                question.text = text.to_owned();
                question.updated_at = updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_by_id(&self, id: QuestionId) -> Result<Option<Question>, QuestionRepositoryError> {
        Ok(self.question(id))
    }

    async fn list_for_job_info(
        &self,
        job_info_id: JobInfoId,
    ) -> Result<Vec<Question>, QuestionRepositoryError> {
        Ok(self
            .tables()
            .questions
            .iter()
            .filter(|question| question.job_info_id == job_info_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryStore {
    async fn insert(&self, feedback: &Feedback) -> Result<(), FeedbackRepositoryError> {
        self.tables().feedback.push(feedback.clone());
        Ok(())
    }

    async fn finalize(
        &self,
        id: FeedbackId,
        text: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, FeedbackRepositoryError> {
        let mut tables = self.tables();
        match tables.feedback.iter_mut().find(|feedback| feedback.id == id) {
            Some(feedback) => {
                feedback.text = text.to_owned();
                feedback.updated_at = updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_for_question(
        &self,
        question_id: QuestionId,
    ) -> Result<Vec<Feedback>, FeedbackRepositoryError> {
        Ok(self.feedback_for(question_id))
    }
}

#[async_trait]
impl InterviewRepository for InMemoryStore {
    async fn insert(&self, interview: &Interview) -> Result<(), InterviewRepositoryError> {
        self.tables().interviews.push(interview.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: InterviewId,
    ) -> Result<Option<Interview>, InterviewRepositoryError> {
        Ok(self
            .tables()
            .interviews
            .iter()
            .find(|interview| interview.id == id)
            .cloned())
    }

    async fn record_completion(
        &self,
        id: InterviewId,
        completion: &InterviewCompletion,
    ) -> Result<bool, InterviewRepositoryError> {
        let mut tables = self.tables();
        match tables.interviews.iter_mut().find(|interview| interview.id == id) {
            Some(interview) => {
                interview.external_session_id = Some(completion.external_session_id.clone());
                interview.duration = completion.duration.clone();
                interview.updated_at = completion.updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_completed_for_job_info(
        &self,
        job_info_id: JobInfoId,
    ) -> Result<Vec<Interview>, InterviewRepositoryError> {
        Ok(self
            .tables()
            .interviews
            .iter()
            .filter(|interview| interview.job_info_id == job_info_id && interview.is_completed())
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn upsert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut tables = self.tables();
        tables.users.retain(|existing| existing.id() != user.id());
        tables.users.push(user.clone());
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError> {
        let mut tables = self.tables();
        let before = tables.users.len();
        tables.users.retain(|user| user.id() != id);
        Ok(tables.users.len() != before)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|user| user.id() == id)
            .cloned())
    }
}

#[async_trait]
impl UsageCounter for InMemoryStore {
    async fn count_completed_interviews(&self, user_id: &UserId) -> Result<u64, UsageCountError> {
        let tables = self.tables();
        let job_infos = tables.owned_job_info_ids(user_id);
        let count = tables
            .interviews
            .iter()
            .filter(|interview| {
                interview.is_completed() && job_infos.contains(&interview.job_info_id)
            })
            .count();
        Ok(count as u64)
    }

    async fn count_questions(&self, user_id: &UserId) -> Result<u64, UsageCountError> {
        Ok(self.tables().owned_question_ids(user_id).len() as u64)
    }

}

/// Reads `user_id;feature,feature` bearer tokens.
#[derive(Clone, Copy, Default)]
pub(crate) struct TokenIdentity;

#[async_trait]
impl IdentityProvider for TokenIdentity {
    async fn authenticate(&self, token: &str) -> Result<Principal, IdentityError> {
        let (user, features) = token.split_once(';').unwrap_or((token, ""));
        let user_id =
            UserId::new(user).map_err(|err| IdentityError::invalid_token(err.to_string()))?;
        Ok(Principal::new(user_id, FeatureClaims::parse_compact(features)))
    }
}

/// Streams a fixed script regardless of the prompt.
#[derive(Clone)]
pub(crate) struct ScriptedGenerator {
    chunks: Vec<&'static str>,
}

impl ScriptedGenerator {
    pub(crate) fn new(chunks: Vec<&'static str>) -> Self {
        Self { chunks }
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn stream(
        &self,
        _prompt: GenerationPrompt,
    ) -> Result<TextChunkStream, TextGenerationError> {
        let chunks: Vec<Result<String, TextGenerationError>> = self
            .chunks
            .iter()
            .map(|chunk| Ok((*chunk).to_owned()))
            .collect();
        Ok(stream::iter(chunks).boxed())
    }
}

//! Quota-gated generation of questions and feedback.
//!
//! Each request runs `validate -> authorize -> placeholder -> stream ->
//! finalize`. The placeholder row is durable before the model is contacted,
//! so the id returned to the caller always names a real record. Streaming and
//! finalization run on a detached task: the record is finalized by id even if
//! the client disconnects, and the body stream closes only after that write
//! (and its cache invalidation) has completed.

mod prompts;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use futures_util::future::BoxFuture;
use futures_util::{FutureExt, StreamExt};
use futures_util::stream;
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

pub use self::prompts::{feedback_prompt, question_prompt};

use super::access::{load_owned_job_info, require_principal};
use super::cache::{CacheKey, CacheTag, cached_read, feedback_write_tags, question_write_tags};
use super::error_mapping::{map_feedback_error, map_question_error};
use super::ports::{
    ContentCache, FeedbackRepository, GenerateFeedbackRequest, GenerateQuestionRequest,
    GeneratedContent, GenerationCommand, GenerationMetrics, GenerationPrompt, GenerationStream,
    GenerationStreamError, JobInfoRepository, QuestionRepository, TextGenerator,
};
use super::{Error, Feedback, JobInfoId, Principal, Question, QuotaAction, QuotaEvaluator, TraceId};

/// Chunks buffered between the generation task and a slow client.
const CHUNK_BUFFER: usize = 32;

type ChunkSender = mpsc::Sender<Result<String, GenerationStreamError>>;
type Finalizer = Box<dyn FnOnce(String) -> BoxFuture<'static, Result<(), Error>> + Send>;

/// Collaborators of the orchestrator.
pub struct GenerationPorts<J: ?Sized, Q: ?Sized, F: ?Sized, G: ?Sized> {
    pub job_infos: Arc<J>,
    pub questions: Arc<Q>,
    pub feedback: Arc<F>,
    pub generator: Arc<G>,
    pub quota: QuotaEvaluator,
    pub cache: Arc<dyn ContentCache>,
    pub metrics: Arc<dyn GenerationMetrics>,
}

/// Generation use-cases implementing [`GenerationCommand`].
pub struct GenerationOrchestrator<J: ?Sized, Q: ?Sized, F: ?Sized, G: ?Sized> {
    job_infos: Arc<J>,
    questions: Arc<Q>,
    feedback: Arc<F>,
    generator: Arc<G>,
    quota: QuotaEvaluator,
    cache: Arc<dyn ContentCache>,
    metrics: Arc<dyn GenerationMetrics>,
}

impl<J: ?Sized, Q: ?Sized, F: ?Sized, G: ?Sized> GenerationOrchestrator<J, Q, F, G> {
    pub fn new(ports: GenerationPorts<J, Q, F, G>) -> Self {
        let GenerationPorts {
            job_infos,
            questions,
            feedback,
            generator,
            quota,
            cache,
            metrics,
        } = ports;
        Self {
            job_infos,
            questions,
            feedback,
            generator,
            quota,
            cache,
            metrics,
        }
    }
}

impl<J, Q, F, G> GenerationOrchestrator<J, Q, F, G>
where
    J: JobInfoRepository + ?Sized,
    Q: QuestionRepository + ?Sized + 'static,
    F: FeedbackRepository + ?Sized + 'static,
    G: TextGenerator + ?Sized + 'static,
{
    async fn previous_questions(&self, job_info_id: JobInfoId) -> Result<Vec<Question>, Error> {
        cached_read(
            self.cache.as_ref(),
            CacheKey::question_list(job_info_id),
            &[CacheTag::JobInfoQuestions(job_info_id)],
            || async {
                self.questions
                    .list_for_job_info(job_info_id)
                    .await
                    .map_err(map_question_error)
            },
        )
        .await
    }

    fn spawn_generation(
        &self,
        record_id: Uuid,
        kind: GeneratedContent,
        prompt: GenerationPrompt,
        finalize: Finalizer,
    ) -> GenerationStream {
        let (tx, rx) = mpsc::channel(CHUNK_BUFFER);
        let task = run_generation(
            Arc::clone(&self.generator),
            Arc::clone(&self.metrics),
            GenerationJob {
                record_id,
                kind,
                prompt,
                finalize,
            },
            tx,
        );
        tokio::spawn(TraceId::propagate(task));

        let chunks = stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        })
        .boxed();
        GenerationStream { record_id, chunks }
    }
}

#[async_trait]
impl<J, Q, F, G> GenerationCommand for GenerationOrchestrator<J, Q, F, G>
where
    J: JobInfoRepository + ?Sized,
    Q: QuestionRepository + ?Sized + 'static,
    F: FeedbackRepository + ?Sized + 'static,
    G: TextGenerator + ?Sized + 'static,
{
    async fn generate_question(
        &self,
        principal: Option<Principal>,
        request: GenerateQuestionRequest,
    ) -> Result<GenerationStream, Error> {
        let principal = require_principal(principal.as_ref())?;
        self.quota
            .authorize(QuotaAction::CreateQuestion, principal)
            .await?;
        let job_info = load_owned_job_info(
            self.job_infos.as_ref(),
            self.cache.as_ref(),
            principal,
            request.job_info_id,
        )
        .await?;
        let previous = self.previous_questions(job_info.id()).await?;

        let placeholder = Question::placeholder(job_info.id(), request.difficulty, Utc::now());
        self.questions
            .insert(&placeholder)
            .await
            .map_err(map_question_error)?;
        let job_info_id = job_info.id();
        let question_id = placeholder.id;
        self.cache
            .invalidate(&question_write_tags(job_info_id, question_id))
            .await;
        info!(
            %question_id,
            %job_info_id,
            difficulty = request.difficulty.as_str(),
            "question placeholder written"
        );

        let questions = Arc::clone(&self.questions);
        let cache = Arc::clone(&self.cache);
        let finalize: Finalizer = Box::new(move |text: String| {
            async move {
                let updated = questions
                    .finalize(question_id, &text, Utc::now())
                    .await
                    .map_err(map_question_error);
                cache
                    .invalidate(&question_write_tags(job_info_id, question_id))
                    .await;
                if updated? {
                    Ok(())
                } else {
                    Err(Error::not_found(format!(
                        "question {question_id} no longer exists"
                    )))
                }
            }
            .boxed()
        });

        let prompt = question_prompt(&job_info, &previous, request.difficulty);
        Ok(self.spawn_generation(
            *question_id.as_uuid(),
            GeneratedContent::Question,
            prompt,
            finalize,
        ))
    }

    async fn generate_feedback(
        &self,
        principal: Option<Principal>,
        request: GenerateFeedbackRequest,
    ) -> Result<GenerationStream, Error> {
        let answer = request.answer.trim();
        if answer.is_empty() {
            return Err(Error::invalid_request("answer must not be empty")
                .with_details(json!({ "field": "prompt", "code": "missing_field" })));
        }
        let principal = require_principal(principal.as_ref())?;
        self.quota
            .authorize(QuotaAction::CreateFeedback, principal)
            .await?;

        let question = self
            .questions
            .find_by_id(request.question_id)
            .await
            .map_err(map_question_error)?
            .ok_or_else(|| {
                Error::not_found("question not found")
                    .with_details(json!({ "questionId": request.question_id }))
            })?;
        let job_info = load_owned_job_info(
            self.job_infos.as_ref(),
            self.cache.as_ref(),
            principal,
            question.job_info_id,
        )
        .await?;
        if question.is_placeholder() {
            return Err(Error::conflict("question has not finished generating"));
        }

        let placeholder = Feedback::placeholder(question.id, answer.to_owned(), Utc::now());
        self.feedback
            .insert(&placeholder)
            .await
            .map_err(map_feedback_error)?;
        let question_id = question.id;
        let feedback_id = placeholder.id;
        self.cache.invalidate(&feedback_write_tags(question_id, feedback_id)).await;
        info!(%feedback_id, %question_id, "feedback placeholder written");

        let feedback = Arc::clone(&self.feedback);
        let cache = Arc::clone(&self.cache);
        let finalize: Finalizer = Box::new(move |text: String| {
            async move {
                let updated = feedback
                    .finalize(feedback_id, &text, Utc::now())
                    .await
                    .map_err(map_feedback_error);
                cache.invalidate(&feedback_write_tags(question_id, feedback_id)).await;
                if updated? {
                    Ok(())
                } else {
                    Err(Error::not_found(format!(
                        "feedback {feedback_id} no longer exists"
                    )))
                }
            }
            .boxed()
        });

        let prompt = feedback_prompt(&job_info, &question, answer);
        Ok(self.spawn_generation(
            *feedback_id.as_uuid(),
            GeneratedContent::Feedback,
            prompt,
            finalize,
        ))
    }
}

struct GenerationJob {
    record_id: Uuid,
    kind: GeneratedContent,
    prompt: GenerationPrompt,
    finalize: Finalizer,
}

async fn run_generation<G>(
    generator: Arc<G>,
    metrics: Arc<dyn GenerationMetrics>,
    job: GenerationJob,
    tx: ChunkSender,
) where
    G: TextGenerator + ?Sized,
{
    let GenerationJob {
        record_id,
        kind,
        prompt,
        finalize,
    } = job;

    let outcome = match stream_to_completion(generator.as_ref(), prompt, &tx).await {
        Ok(text) => finalize(text)
            .await
            .map_err(|err| GenerationStreamError::Finalize {
                message: err.message().to_owned(),
            }),
        Err(err) => Err(err),
    };

    match outcome {
        Ok(()) => {
            info!(%record_id, kind = kind.as_str(), "generated content finalized");
            if let Err(err) = metrics.record_finalized(kind).await {
                warn!(error = %err, "failed to record finalized generation");
            }
        }
        Err(err) => {
            error!(
                %record_id,
                kind = kind.as_str(),
                error = %err,
                "generation failed; placeholder left unresolved"
            );
            if let Err(metrics_err) = metrics.record_abandoned(kind).await {
                warn!(error = %metrics_err, "failed to record abandoned generation");
            }
            if tx.send(Err(err)).await.is_err() {
                debug!(%record_id, "client gone before generation error was delivered");
            }
        }
    }
}

/// Forward chunks to the client while accumulating the final text.
///
/// A departed client does not stop generation.
async fn stream_to_completion<G>(
    generator: &G,
    prompt: GenerationPrompt,
    tx: &ChunkSender,
) -> Result<String, GenerationStreamError>
where
    G: TextGenerator + ?Sized,
{
    let mut chunks = generator.stream(prompt).await?;
    let mut text = String::new();
    let mut client_connected = true;
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;
        text.push_str(&chunk);
        if client_connected && tx.send(Ok(chunk)).await.is_err() {
            client_connected = false;
            debug!("client disconnected; generation continues to finalize");
        }
    }
    if text.trim().is_empty() {
        return Err(GenerationStreamError::EmptyOutput);
    }
    Ok(text)
}

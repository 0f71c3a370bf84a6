//! Server harness for end-to-end rehearsal scenarios.
//!
//! Real domain services run over the in-memory store. The harness owns a
//! single-threaded Tokio runtime plus a `LocalSet` because Actix uses
//! `spawn_local` internally; dropping the world stops the server.

use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::ServerHandle;
use actix_web::http::{Method, header};
use actix_web::{App, HttpServer, web};
use awc::Client;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

use darasa::Trace;
use darasa::domain::ports::{ContentCache, NoOpGenerationMetrics, UsageCounter};
use darasa::domain::{
    EntitlementResolver, GenerationOrchestrator, GenerationPorts, InterviewService,
    JobInfoService, PlanService, QuotaEvaluator, UserAccountService,
};
use darasa::inbound::http::generation::{generate_feedback, generate_question};
use darasa::inbound::http::interviews::{complete_interview, list_interviews, start_interview};
use darasa::inbound::http::job_infos::{
    create_job_info, delete_job_info, get_job_info, list_job_infos, list_questions,
    update_job_info,
};
use darasa::inbound::http::json_error_handler;
use darasa::inbound::http::state::{HttpState, HttpStatePorts};
use darasa::inbound::http::users::{current_plan, current_user};
use darasa::inbound::http::webhooks::{WebhookVerifier, receive_identity_event};
use darasa::outbound::cache::TaggedContentCache;
use darasa::outbound::identity::ClaimsEntitlementService;

use crate::in_memory::{InMemoryStore, ScriptedGenerator, TokenIdentity};

pub(crate) const WEBHOOK_SECRET: &str = "whsec_ZGFyYXNhLXdlYmhvb2stdGVzdC1rZXk=";
pub(crate) const SCRIPT: [&str; 3] = ["Describe a time ", "you scaled ", "a service."];
pub(crate) const SCRIPTED_TEXT: &str = "Describe a time you scaled a service.";

pub(crate) struct CapturedResponse {
    pub(crate) status: u16,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) body: String,
}

impl CapturedResponse {
    pub(crate) fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub(crate) fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("json body")
    }
}

pub(crate) struct Request<'a> {
    pub(crate) method: Method,
    pub(crate) path: &'a str,
    pub(crate) token: Option<&'a str>,
    pub(crate) body: Option<String>,
    pub(crate) headers: Vec<(&'static str, String)>,
}

impl<'a> Request<'a> {
    pub(crate) fn new(method: Method, path: &'a str) -> Self {
        Self {
            method,
            path,
            token: None,
            body: None,
            headers: Vec::new(),
        }
    }

    pub(crate) fn token(mut self, token: Option<&'a str>) -> Self {
        self.token = token;
        self
    }

    pub(crate) fn json(mut self, body: &serde_json::Value) -> Self {
        self.body = Some(body.to_string());
        self
    }
}

pub(crate) struct RehearsalWorld {
    runtime: Runtime,
    local: LocalSet,
    base_url: String,
    server: ServerHandle,
    pub(crate) store: InMemoryStore,
    pub(crate) verifier: WebhookVerifier,
    pub(crate) token: Option<String>,
    pub(crate) job_info_id: Option<String>,
    pub(crate) question_id: Option<String>,
    pub(crate) last: Option<CapturedResponse>,
}

impl Drop for RehearsalWorld {
    fn drop(&mut self) {
        let server = self.server.clone();
        self.local.block_on(&self.runtime, async move {
            server.stop(true).await;
        });
    }
}

impl RehearsalWorld {
    pub(crate) fn send(&mut self, request: Request<'_>) -> &CapturedResponse {
        let base_url = self.base_url.clone();
        let captured = self.local.block_on(&self.runtime, async move {
            let mut builder = Client::default()
                .request(request.method, format!("{base_url}{}", request.path));
            if let Some(token) = request.token {
                builder = builder.insert_header((header::AUTHORIZATION, format!("Bearer {token}")));
            }
            for (name, value) in request.headers {
                builder = builder.insert_header((name, value));
            }
            let mut response = match request.body {
                Some(body) => {
                    builder
                        .insert_header((header::CONTENT_TYPE, "application/json"))
                        .send_body(body)
                        .await
                }
                None => builder.send().await,
            }
            .expect("request sent");
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|value| (name.as_str().to_owned(), value.to_owned()))
                })
                .collect();
            let body = response.body().await.expect("response body");
            CapturedResponse {
                status: response.status().as_u16(),
                headers,
                body: String::from_utf8(body.to_vec()).expect("utf-8 body"),
            }
        });
        self.last.insert(captured)
    }

    pub(crate) fn last(&self) -> &CapturedResponse {
        self.last.as_ref().expect("a response was captured")
    }
}

fn build_state(store: &InMemoryStore, verifier: WebhookVerifier) -> HttpState {
    let store = Arc::new(store.clone());
    let usage: Arc<dyn UsageCounter> = store.clone();
    let cache: Arc<dyn ContentCache> = Arc::new(TaggedContentCache::default());
    let quota = QuotaEvaluator::new(
        EntitlementResolver::new(Arc::new(ClaimsEntitlementService)),
        usage,
    );
    let job_infos = Arc::new(JobInfoService::new(store.clone(), store.clone(), cache.clone()));
    let interviews = Arc::new(InterviewService::new(
        store.clone(),
        store.clone(),
        quota.clone(),
        cache.clone(),
    ));
    let accounts = Arc::new(UserAccountService::new(store.clone(), cache.clone()));
    let generation = Arc::new(GenerationOrchestrator::new(GenerationPorts {
        job_infos: store.clone(),
        questions: store.clone(),
        feedback: store,
        generator: Arc::new(ScriptedGenerator::new(SCRIPT.to_vec())),
        quota: quota.clone(),
        cache,
        metrics: Arc::new(NoOpGenerationMetrics),
    }));

    HttpState::new(HttpStatePorts {
        identity: Arc::new(TokenIdentity),
        job_infos: job_infos.clone(),
        job_infos_query: job_infos,
        generation,
        interviews: interviews.clone(),
        interviews_query: interviews,
        plan: Arc::new(PlanService::new(quota)),
        accounts: accounts.clone(),
        accounts_query: accounts,
    })
    .with_webhook_verifier(verifier)
}

async fn spawn_server(state: HttpState) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;
    let data = web::Data::new(state);

    let server = HttpServer::new(move || {
        let api = web::scope("/api/v1")
            .service(create_job_info)
            .service(list_job_infos)
            .service(get_job_info)
            .service(update_job_info)
            .service(delete_job_info)
            .service(list_questions)
            .service(start_interview)
            .service(complete_interview)
            .service(list_interviews)
            .service(generate_question)
            .service(generate_feedback)
            .service(current_user)
            .service(current_plan)
            .service(receive_identity_event);

        App::new()
            .app_data(data.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .wrap(Trace)
            .service(api)
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);
    Ok((format!("http://{addr}"), handle))
}

pub(crate) fn world() -> RehearsalWorld {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();
    let store = InMemoryStore::default();
    let verifier = WebhookVerifier::new(WEBHOOK_SECRET).expect("webhook secret");
    let state = build_state(&store, verifier.clone());
    let (base_url, server) = local
        .block_on(&runtime, spawn_server(state))
        .expect("server started");

    RehearsalWorld {
        runtime,
        local,
        base_url,
        server,
        store,
        verifier,
        token: None,
        job_info_id: None,
        question_id: None,
        last: None,
    }
}

//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod state_builders;

pub use config::ServerConfig;

#[cfg(feature = "metrics")]
use metrics::{MetricsLayer, build_generation_metrics};
use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use darasa::Trace;
#[cfg(debug_assertions)]
use darasa::doc::ApiDoc;
#[cfg(not(feature = "metrics"))]
use darasa::domain::ports::NoOpGenerationMetrics;
use darasa::inbound::http::generation::{generate_feedback, generate_question};
use darasa::inbound::http::health::{HealthState, live, ready};
use darasa::inbound::http::interviews::{complete_interview, list_interviews, start_interview};
use darasa::inbound::http::job_infos::{
    create_job_info, delete_job_info, get_job_info, list_job_infos, list_questions,
    update_job_info,
};
use darasa::inbound::http::json_error_handler;
use darasa::inbound::http::state::HttpState;
use darasa::inbound::http::users::{current_plan, current_user};
use darasa::inbound::http::webhooks::{identity_webhook_reachable, receive_identity_event};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(not(feature = "metrics"))]
use std::sync::Arc;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

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
        .service(receive_identity_event)
        .service(identity_webhook_reachable);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] with the adapters to serve.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when metric registration, binding the
/// socket, or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();

    #[cfg(feature = "metrics")]
    let generation_metrics = build_generation_metrics(config.prometheus.as_ref())?;
    #[cfg(not(feature = "metrics"))]
    let generation_metrics: Arc<dyn darasa::domain::ports::GenerationMetrics> =
        Arc::new(NoOpGenerationMetrics);

    let http_state = build_http_state(&config, generation_metrics);
    let bind_addr = config.bind_addr();

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from_option(config.prometheus);

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

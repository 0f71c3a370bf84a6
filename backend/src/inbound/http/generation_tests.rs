//! Handler tests for the streaming generation endpoints.

use actix_web::http::StatusCode;
use actix_web::http::header::{AUTHORIZATION, CONTENT_TYPE};
use actix_web::{App, test};
use futures_util::stream;
use rstest::rstest;
use serde_json::json;
use uuid::Uuid;

use super::*;
use crate::domain::ports::{GenerationStreamError, TextGenerationError};
use crate::domain::{NOT_LOGGED_IN_MESSAGE, PLAN_LIMIT_MESSAGE};
use crate::inbound::http::test_utils::TestPorts;

fn stream_of(record_id: Uuid, chunks: Vec<Result<String, GenerationStreamError>>) -> GenerationStream {
    GenerationStream {
        record_id,
        chunks: stream::iter(chunks).boxed(),
    }
}

macro_rules! app {
    ($ports:expr) => {
        test::init_service(
            App::new().app_data($ports.into_state()).service(
                web::scope("/api/v1")
                    .service(generate_question)
                    .service(generate_feedback),
            ),
        )
        .await
    };
}

#[actix_web::test]
async fn question_text_streams_with_record_header() {
    let record_id = Uuid::new_v4();
    let job_info_id = JobInfoId::random();
    let mut ports = TestPorts::authenticating();
    ports
        .generation
        .expect_generate_question()
        .withf(move |principal, request| {
            principal
                .as_ref()
                .is_some_and(|p| p.user_id().as_ref() == "user_a")
                && request.job_info_id == job_info_id
                && request.difficulty == QuestionDifficulty::Hard
        })
        .times(1)
        .returning(move |_, _| {
            Ok(stream_of(
                record_id,
                vec![Ok("Explain ".to_owned()), Ok("ownership.".to_owned())],
            ))
        });
    let app = app!(ports);

    let request = test::TestRequest::post()
        .uri("/api/v1/ai/questions/generate-question")
        .insert_header((AUTHORIZATION, "Bearer user_a"))
        .set_json(json!({ "prompt": "hard", "jobInfoId": job_info_id.to_string() }))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let header = response
        .headers()
        .get(QUESTION_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    assert_eq!(header, Some(record_id.to_string()));
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    assert!(content_type.starts_with("text/plain"));
    let body = test::read_body(response).await;
    assert_eq!(body.as_ref(), b"Explain ownership.");
}

#[rstest]
#[case(json!({ "prompt": "extreme", "jobInfoId": Uuid::new_v4().to_string() }))]
#[case(json!({ "prompt": "easy", "jobInfoId": "not-a-uuid" }))]
#[case(json!({ "jobInfoId": Uuid::new_v4().to_string() }))]
#[case(json!({ "prompt": "easy" }))]
#[case(json!(["easy"]))]
#[actix_web::test]
async fn malformed_question_request_is_plain_bad_request(#[case] body: serde_json::Value) {
    let mut ports = TestPorts::authenticating();
    ports.generation.expect_generate_question().never();
    let app = app!(ports);

    let request = test::TestRequest::post()
        .uri("/api/v1/ai/questions/generate-question")
        .insert_header((AUTHORIZATION, "Bearer user_a"))
        .set_json(body)
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = test::read_body(response).await;
    assert_eq!(body.as_ref(), QUESTION_ERROR_MESSAGE.as_bytes());
}

#[actix_web::test]
async fn anonymous_request_reaches_the_orchestrator_without_principal() {
    let mut ports = TestPorts::default();
    ports
        .generation
        .expect_generate_question()
        .withf(|principal, _| principal.is_none())
        .times(1)
        .returning(|_, _| Err(Error::unauthorized(NOT_LOGGED_IN_MESSAGE)));
    let app = app!(ports);

    let request = test::TestRequest::post()
        .uri("/api/v1/ai/questions/generate-question")
        .set_json(json!({ "prompt": "easy", "jobInfoId": Uuid::new_v4().to_string() }))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = test::read_body(response).await;
    assert_eq!(body.as_ref(), NOT_LOGGED_IN_MESSAGE.as_bytes());
}

#[actix_web::test]
async fn quota_denial_is_plain_forbidden() {
    let mut ports = TestPorts::authenticating();
    ports
        .generation
        .expect_generate_question()
        .times(1)
        .returning(|_, _| Err(Error::forbidden(PLAN_LIMIT_MESSAGE)));
    let app = app!(ports);

    let request = test::TestRequest::post()
        .uri("/api/v1/ai/questions/generate-question")
        .insert_header((AUTHORIZATION, "Bearer user_a"))
        .set_json(json!({ "prompt": "easy", "jobInfoId": Uuid::new_v4().to_string() }))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = test::read_body(response).await;
    assert_eq!(body.as_ref(), PLAN_LIMIT_MESSAGE.as_bytes());
}

#[actix_web::test]
async fn identity_outage_is_plain_service_unavailable() {
    let mut ports = TestPorts::default();
    ports
        .identity
        .expect_authenticate()
        .returning(|_| Err(crate::domain::ports::IdentityError::unavailable("jwks down")));
    ports.generation.expect_generate_question().never();
    let app = app!(ports);

    let request = test::TestRequest::post()
        .uri("/api/v1/ai/questions/generate-question")
        .insert_header((AUTHORIZATION, "Bearer user_a"))
        .set_json(json!({ "prompt": "easy", "jobInfoId": Uuid::new_v4().to_string() }))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn feedback_streams_with_record_header() {
    let record_id = Uuid::new_v4();
    let question_id = QuestionId::random();
    let mut ports = TestPorts::authenticating();
    ports
        .generation
        .expect_generate_feedback()
        .withf(move |_, request| {
            request.question_id == question_id && request.answer == "Borrow checker"
        })
        .times(1)
        .returning(move |_, _| Ok(stream_of(record_id, vec![Ok("Good answer".to_owned())])));
    let app = app!(ports);

    let request = test::TestRequest::post()
        .uri("/api/v1/ai/questions/generate-feedback")
        .insert_header((AUTHORIZATION, "Bearer user_a"))
        .set_json(json!({ "prompt": "Borrow checker", "questionId": question_id.to_string() }))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(FEEDBACK_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
        Some(record_id.to_string().as_str())
    );
    let body = test::read_body(response).await;
    assert_eq!(body.as_ref(), b"Good answer");
}

#[actix_web::test]
async fn malformed_feedback_request_is_plain_bad_request() {
    let mut ports = TestPorts::authenticating();
    ports.generation.expect_generate_feedback().never();
    let app = app!(ports);

    let request = test::TestRequest::post()
        .uri("/api/v1/ai/questions/generate-feedback")
        .insert_header((AUTHORIZATION, "Bearer user_a"))
        .set_json(json!({ "prompt": "an answer", "questionId": 42 }))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = test::read_body(response).await;
    assert_eq!(body.as_ref(), FEEDBACK_ERROR_MESSAGE.as_bytes());
}

#[rstest]

#[::core::prelude::v1::test]
fn question_body_parses_into_request() {
    let job_info_id = JobInfoId::random();
    let raw = serde_json::to_vec(&json!({ "prompt": "medium", "jobInfoId": job_info_id.to_string() }))
        .expect("encode body");

    let request = GenerateQuestionRequest::try_from(raw.as_slice()).expect("valid body");

    assert_eq!(request.job_info_id, job_info_id);
    assert_eq!(request.difficulty, QuestionDifficulty::Medium);
}

#[rstest]

#[::core::prelude::v1::test]
fn stream_errors_keep_their_message() {
    let err = GenerationStreamError::from(TextGenerationError::status(502_u16, "bad gateway"));
    assert!(err.to_string().contains("bad gateway"));
}

//! Handler tests for the job context endpoints.

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test};
use chrono::Utc;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::{NO_PERMISSION_MESSAGE, UserId};
use crate::inbound::http::test_utils::TestPorts;

fn job_info(owner: &str) -> JobInfo {
    JobInfo::create(
        UserId::new(owner).expect("id"),
        JobInfoFields {
            name: "Acme".to_owned(),
            title: None,
            description: "Rust services".to_owned(),
            experience_level: ExperienceLevel::Senior,
        },
        Utc::now(),
    )
    .expect("valid job info")
}

macro_rules! app {
    ($ports:expr) => {
        test::init_service(
            App::new().app_data($ports.into_state()).service(
                web::scope("/api/v1")
                    .service(create_job_info)
                    .service(list_job_infos)
                    .service(get_job_info)
                    .service(update_job_info)
                    .service(delete_job_info)
                    .service(list_questions),
            ),
        )
        .await
    };
}

#[actix_web::test]
async fn anonymous_list_is_unauthorized() {
    let app = app!(TestPorts::default());

    let response = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/job-infos").to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "You are not logged in");
}

#[actix_web::test]
async fn create_returns_created_job_info() {
    let mut ports = TestPorts::authenticating();
    ports
        .job_infos
        .expect_create()
        .withf(|principal, fields| {
            principal.user_id().as_ref() == "user_a"
                && fields.experience_level == ExperienceLevel::MidLevel
                && fields.title.as_deref() == Some("Engineer")
        })
        .times(1)
        .returning(|_, _| Ok(job_info("user_a")));
    let app = app!(ports);

    let request = test::TestRequest::post()
        .uri("/api/v1/job-infos")
        .insert_header((AUTHORIZATION, "Bearer user_a"))
        .set_json(json!({
            "name": "Acme",
            "title": "Engineer",
            "description": "Rust services",
            "experienceLevel": "mid-level",
        }))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["userId"], "user_a");
    assert_eq!(body["experienceLevel"], "senior");
}

#[rstest]
#[case(json!({"description": "d", "experienceLevel": "junior"}), "name", "missing_field")]
#[case(json!({"name": "n", "experienceLevel": "junior"}), "description", "missing_field")]
#[case(json!({"name": "n", "description": "d"}), "experienceLevel", "missing_field")]
#[case(
    json!({"name": "n", "description": "d", "experienceLevel": "principal"}),
    "experienceLevel",
    "invalid_value"
)]
#[actix_web::test]
async fn invalid_bodies_are_rejected_before_the_service(
    #[case] body: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let mut ports = TestPorts::authenticating();
    ports.job_infos.expect_create().never();
    let app = app!(ports);

    let request = test::TestRequest::post()
        .uri("/api/v1/job-infos")
        .insert_header((AUTHORIZATION, "Bearer user_a"))
        .set_json(body)
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
}

#[actix_web::test]
async fn malformed_id_is_bad_request() {
    let mut ports = TestPorts::authenticating();
    ports.job_infos_query.expect_get().never();
    let app = app!(ports);

    let request = test::TestRequest::get()
        .uri("/api/v1/job-infos/not-a-uuid")
        .insert_header((AUTHORIZATION, "Bearer user_a"))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn foreign_job_info_is_forbidden() {
    let mut ports = TestPorts::authenticating();
    ports
        .job_infos_query
        .expect_get()
        .times(1)
        .returning(|_, _| Err(Error::forbidden(NO_PERMISSION_MESSAGE)));
    let app = app!(ports);

    let request = test::TestRequest::get()
        .uri(&format!("/api/v1/job-infos/{}", JobInfoId::random()))
        .insert_header((AUTHORIZATION, "Bearer user_b"))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn delete_answers_no_content() {
    let id = JobInfoId::random();
    let mut ports = TestPorts::authenticating();
    ports
        .job_infos
        .expect_delete()
        .withf(move |_, requested| *requested == id)
        .times(1)
        .returning(|_, _| Ok(()));
    let app = app!(ports);

    let request = test::TestRequest::delete()
        .uri(&format!("/api/v1/job-infos/{id}"))
        .insert_header((AUTHORIZATION, "Bearer user_a"))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn questions_are_listed_for_owner() {
    let mut ports = TestPorts::authenticating();
    ports
        .job_infos_query
        .expect_list_questions()
        .times(1)
        .returning(|_, _| Ok(Vec::new()));
    let app = app!(ports);

    let request = test::TestRequest::get()
        .uri(&format!("/api/v1/job-infos/{}/questions", JobInfoId::random()))
        .insert_header((AUTHORIZATION, "Bearer user_a"))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body, json!([]));
}

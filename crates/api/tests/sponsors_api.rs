//! Tests for the job-owner endpoints: form creation, submission listing,
//! and the review workflow.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use gradlink_core::forms::AUTH_TOKEN_FIELD_LABEL;
use gradlink_db::models::form::CreateForm;
use gradlink_db::models::submission::CreateSubmission;
use gradlink_db::repositories::{FormRepo, SubmissionRepo, WebhookRepo};

use common::{
    access_token, body_json, build_test_app, build_test_app_with_provider, get_auth,
    post_json_auth, put_json_auth, StubProvider,
};

const OWNER_ID: i64 = 42;

async fn seed_job(pool: &PgPool) -> i64 {
    sqlx::query_scalar("INSERT INTO jobs (owner_id, title) VALUES ($1, $2) RETURNING id")
        .bind(OWNER_ID)
        .bind("Backend Intern")
        .fetch_one(pool)
        .await
        .expect("job insert should succeed")
}

fn create_form_body() -> serde_json::Value {
    json!({
        "title": "Backend Intern Application",
        "blocks": [
            { "uuid": "b-1", "type": "FORM_TITLE", "payload": { "title": "Backend Intern" } },
            { "uuid": "b-2", "type": "TEXTAREA", "payload": { "label": "Why this role?" } },
        ],
    })
}

async fn seed_submission(pool: &PgPool, form_id: i64, tally_id: &str, email: &str) -> i64 {
    SubmissionRepo::create_if_absent(
        pool,
        &CreateSubmission {
            form_id,
            tally_submission_id: tally_id.to_string(),
            applicant_id: 7,
            applicant_role: "member".to_string(),
            applicant_email: email.to_string(),
            applicant_name: "Sam Lee".to_string(),
            payload: json!({"fields": []}),
        },
    )
    .await
    .expect("insert should succeed")
    .expect("row should be created")
    .id
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_form_registers_provider_form_and_webhook(pool: PgPool) {
    let job_id = seed_job(&pool).await;
    let provider = Arc::new(StubProvider::default());
    let app = build_test_app_with_provider(pool.clone(), provider.clone());
    let token = access_token(OWNER_ID, "sponsor");

    let response = post_json_auth(
        app,
        &format!("/api/v1/sponsors/jobs/{job_id}/form"),
        create_form_body(),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["job_id"], json!(job_id));
    assert_eq!(body["tally_form_id"], json!("stub-form-1"));
    assert_eq!(body["is_active"], json!(true));

    // The provider saw the hidden token field, right after the title block.
    let forms = provider.created_forms.lock().unwrap();
    let blocks = &forms[0];
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[1]["type"], json!("HIDDEN_FIELDS"));
    assert_eq!(blocks[1]["payload"]["name"], json!(AUTH_TOKEN_FIELD_LABEL));

    // The webhook registration landed with a generated secret and the
    // ingestion callback, and the same secret went to the provider.
    let form_id = body["id"].as_i64().unwrap();
    let webhook = WebhookRepo::find_active_by_form(&pool, form_id)
        .await
        .unwrap()
        .expect("registration should exist");
    assert!(webhook.signing_secret.starts_with("whsec_"));
    assert!(webhook.callback_url.ends_with("/api/v1/applications"));
    let hooks = provider.created_webhooks.lock().unwrap();
    assert_eq!(hooks[0].0, "stub-form-1");
    assert_eq!(hooks[0].2, webhook.signing_secret);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn second_active_form_conflicts(pool: PgPool) {
    let job_id = seed_job(&pool).await;
    FormRepo::create(
        &pool,
        &CreateForm {
            job_id,
            tally_form_id: "tf-existing".to_string(),
            title: "Existing".to_string(),
        },
    )
    .await
    .unwrap();
    let token = access_token(OWNER_ID, "sponsor");

    let response = post_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/sponsors/jobs/{job_id}/form"),
        create_form_body(),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn strangers_cannot_create_forms(pool: PgPool) {
    let job_id = seed_job(&pool).await;
    let token = access_token(OWNER_ID + 1, "sponsor");

    let response = post_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/sponsors/jobs/{job_id}/form"),
        create_form_body(),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admins_can_create_forms_for_any_job(pool: PgPool) {
    let job_id = seed_job(&pool).await;
    let token = access_token(1, "admin");

    let response = post_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/sponsors/jobs/{job_id}/form"),
        create_form_body(),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn empty_title_is_rejected(pool: PgPool) {
    let job_id = seed_job(&pool).await;
    let token = access_token(OWNER_ID, "sponsor");

    let response = post_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/sponsors/jobs/{job_id}/form"),
        json!({ "title": "", "blocks": [] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn owner_lists_submissions_newest_first(pool: PgPool) {
    let job_id = seed_job(&pool).await;
    let form = FormRepo::create(
        &pool,
        &CreateForm {
            job_id,
            tally_form_id: "tf-list-1".to_string(),
            title: "Application".to_string(),
        },
    )
    .await
    .unwrap();
    let first = seed_submission(&pool, form.id, "sub-l1", "a@example.edu").await;
    let second = seed_submission(&pool, form.id, "sub-l2", "b@example.edu").await;
    // Separate the timestamps so the ordering assertion cannot tie.
    sqlx::query("UPDATE submissions SET submitted_at = submitted_at + interval '1 minute' WHERE id = $1")
        .bind(second)
        .execute(&pool)
        .await
        .unwrap();

    let token = access_token(OWNER_ID, "sponsor");
    let response = get_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/sponsors/forms/{}/submissions", form.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"], json!(second));
    assert_eq!(rows[1]["id"], json!(first));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn strangers_cannot_list_submissions(pool: PgPool) {
    let job_id = seed_job(&pool).await;
    let form = FormRepo::create(
        &pool,
        &CreateForm {
            job_id,
            tally_form_id: "tf-list-2".to_string(),
            title: "Application".to_string(),
        },
    )
    .await
    .unwrap();

    let token = access_token(OWNER_ID + 1, "sponsor");
    let response = get_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/sponsors/forms/{}/submissions", form.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_form_listing_is_not_found(pool: PgPool) {
    let token = access_token(OWNER_ID, "sponsor");
    let response = get_auth(
        build_test_app(pool.clone()),
        "/api/v1/sponsors/forms/9999/submissions",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn review_stamps_reviewer_on_first_transition(pool: PgPool) {
    let job_id = seed_job(&pool).await;
    let form = FormRepo::create(
        &pool,
        &CreateForm {
            job_id,
            tally_form_id: "tf-review-1".to_string(),
            title: "Application".to_string(),
        },
    )
    .await
    .unwrap();
    let submission_id = seed_submission(&pool, form.id, "sub-r1", "a@example.edu").await;
    let token = access_token(OWNER_ID, "sponsor");

    let response = put_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/sponsors/submissions/{submission_id}"),
        json!({ "status": "shortlisted", "notes": "Strong systems background" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], json!("shortlisted"));
    assert_eq!(body["reviewed_by"], json!(OWNER_ID));
    assert!(body["reviewed_at"].is_string());
    assert_eq!(body["notes"], json!("Strong systems background"));

    // A later transition by an admin keeps the original reviewer stamp.
    let admin_token = access_token(1, "admin");
    let response = put_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/sponsors/submissions/{submission_id}"),
        json!({ "status": "rejected" }),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], json!("rejected"));
    assert_eq!(body["reviewed_by"], json!(OWNER_ID));
    // Absent notes leave the stored notes untouched.
    assert_eq!(body["notes"], json!("Strong systems background"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_review_status_is_rejected(pool: PgPool) {
    let job_id = seed_job(&pool).await;
    let form = FormRepo::create(
        &pool,
        &CreateForm {
            job_id,
            tally_form_id: "tf-review-2".to_string(),
            title: "Application".to_string(),
        },
    )
    .await
    .unwrap();
    let submission_id = seed_submission(&pool, form.id, "sub-r2", "a@example.edu").await;
    let token = access_token(OWNER_ID, "sponsor");

    let response = put_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/sponsors/submissions/{submission_id}"),
        json!({ "status": "archived" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn strangers_cannot_review(pool: PgPool) {
    let job_id = seed_job(&pool).await;
    let form = FormRepo::create(
        &pool,
        &CreateForm {
            job_id,
            tally_form_id: "tf-review-3".to_string(),
            title: "Application".to_string(),
        },
    )
    .await
    .unwrap();
    let submission_id = seed_submission(&pool, form.id, "sub-r3", "a@example.edu").await;
    let token = access_token(OWNER_ID + 1, "sponsor");

    let response = put_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/sponsors/submissions/{submission_id}"),
        json!({ "status": "reviewed" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

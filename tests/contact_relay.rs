mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use common::{
    app_with, post_json, send, CountingWebhook, RecordingMailer, RejectingMailer, UnreachableMailer,
};
use serde_json::json;

const ENDPOINT: &str = "/api/send-email";

fn recording_app() -> (axum::Router, Arc<RecordingMailer>) {
    let mailer = Arc::new(RecordingMailer::default());
    let app = app_with(
        Some(mailer.clone()),
        None,
        Arc::new(CountingWebhook::default()),
    );
    (app, mailer)
}

#[tokio::test]
async fn valid_submission_is_sent_with_reply_to() {
    let (app, mailer) = recording_app();

    let (status, body) = post_json(
        app,
        ENDPOINT,
        json!({ "name": "Ada", "email": "ada@example.com", "message": "Hello there, testing." }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Email sent successfully" }));

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    let raw = String::from_utf8(sent[0].formatted()).unwrap();
    let reply_to = raw
        .lines()
        .find(|line| line.starts_with("Reply-To:"))
        .expect("Reply-To header");
    assert!(reply_to.contains("ada@example.com"));
    assert_eq!(
        sent[0].envelope().to().iter().map(|a| a.to_string()).collect::<Vec<_>>(),
        vec!["owner@example.com".to_string()]
    );
}

#[tokio::test]
async fn missing_fields_are_rejected_without_sending() {
    let cases = [
        (json!({ "email": "ada@example.com", "message": "Hello" }), "Name is required"),
        (json!({ "name": "Ada", "message": "Hello" }), "Email is required"),
        (json!({ "name": "Ada", "email": "ada@example.com" }), "Message is required"),
        (
            json!({ "name": "  ", "email": "ada@example.com", "message": "Hello" }),
            "Name is required",
        ),
    ];

    for (payload, expected) in cases {
        let (app, mailer) = recording_app();
        let (status, body) = post_json(app, ENDPOINT, payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], expected);
        assert_eq!(mailer.count(), 0);
    }
}

#[tokio::test]
async fn malformed_email_is_rejected_without_sending() {
    for email in [
        "ada",
        "ada@example",
        "ada example@mail.com",
        "@example.com",
        " ada@example.com",
    ] {
        let (app, mailer) = recording_app();
        let (status, body) = post_json(
            app,
            ENDPOINT,
            json!({ "name": "Ada", "email": email, "message": "Hello there" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{email}");
        assert_eq!(body["error"], "Invalid email format");
        assert_eq!(mailer.count(), 0);
    }
}

#[tokio::test]
async fn phone_is_optional_and_passed_through() {
    let (app, mailer) = recording_app();
    let (status, _) = post_json(
        app,
        ENDPOINT,
        json!({
            "name": "Ada",
            "email": "ada@example.com",
            "phone": "",
            "message": "Hello there, testing."
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mailer.count(), 1);
}

#[tokio::test]
async fn invalid_json_is_a_client_error() {
    let (app, mailer) = recording_app();
    let (status, body) = send(app, Method::POST, ENDPOINT, Some("{not json".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
    assert_eq!(mailer.count(), 0);
}

#[tokio::test]
async fn missing_credentials_surface_as_server_error() {
    let app = app_with(None, None, Arc::new(CountingWebhook::default()));
    let (status, body) = post_json(
        app,
        ENDPOINT,
        json!({ "name": "Ada", "email": "ada@example.com", "message": "Hello there, testing." }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to send email");
    let details = body["details"].as_str().unwrap();
    assert!(!details.contains("EMAIL_USER"));
    assert!(!details.contains("EMAIL_PASS"));
}

#[tokio::test]
async fn dispatch_failure_is_a_generic_server_error() {
    let app = app_with(
        Some(Arc::new(RejectingMailer)),
        None,
        Arc::new(CountingWebhook::default()),
    );
    let (status, body) = post_json(
        app,
        ENDPOINT,
        json!({ "name": "Ada", "email": "ada@example.com", "message": "Hello there, testing." }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "error": "Failed to send email", "details": "The mail service rejected the message" })
    );
}

#[tokio::test]
async fn unreachable_mail_server_is_reported_without_internals() {
    let app = app_with(
        Some(Arc::new(UnreachableMailer)),
        None,
        Arc::new(CountingWebhook::default()),
    );
    let (status, body) = post_json(
        app,
        ENDPOINT,
        json!({ "name": "Ada", "email": "ada@example.com", "message": "Hello there, testing." }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "error": "Failed to send email", "details": "The mail service is unreachable" })
    );
    assert!(!body.to_string().contains("smtp.gmail.com"));
}

#[tokio::test]
async fn only_post_is_accepted() {
    let (app, mailer) = recording_app();
    let (status, body) = send(app, Method::GET, ENDPOINT, None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({ "error": "Method not allowed" }));
    assert_eq!(mailer.count(), 0);
}

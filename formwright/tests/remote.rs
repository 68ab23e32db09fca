//! Remote gateway against a mock HTTP server

use formwright::{
    Answers, ClientConfig, Credentials, FormDocument, FormGateway, GatewayError, QuestionType,
    RemoteGateway, SequentialIds, Session,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn gateway() -> (MockServer, RemoteGateway) {
    let server = MockServer::start().await;
    let gateway = RemoteGateway::new(ClientConfig::new(format!("{}/api", server.uri()))).unwrap();
    (server, gateway)
}

fn survey() -> FormDocument {
    let ids = SequentialIds::new("q");
    let mut form = FormDocument::new("Survey");
    form.add_question(&ids, QuestionType::TextInput);
    form
}

#[tokio::test]
async fn test_login_yields_bearer_session() {
    let (server, gateway) = gateway().await;
    Mock::given(method("POST"))
        .and(path("/api/login/"))
        .and(body_json(json!({ "username": "ada", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "t0k" })))
        .expect(1)
        .mount(&server)
        .await;

    let session = gateway.login(&Credentials::new("ada", "pw")).await.unwrap();

    assert_eq!(session.token(), Some("t0k"));
}

#[tokio::test]
async fn test_rejected_login_is_auth_error() {
    let (server, gateway) = gateway().await;
    Mock::given(method("POST"))
        .and(path("/api/login/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "nope" })))
        .mount(&server)
        .await;

    let err = gateway.login(&Credentials::new("ada", "bad")).await.unwrap_err();

    assert!(err.is_auth());
}

#[tokio::test]
async fn test_register_returns_server_reply() {
    let (server, gateway) = gateway().await;
    Mock::given(method("POST"))
        .and(path("/api/register/"))
        .and(body_json(json!({
            "username": "ada",
            "email": "ada@example.com",
            "password": "pw"
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "message": "User registered" })),
        )
        .mount(&server)
        .await;

    let reply = gateway
        .register(&Credentials::new("ada", "pw").with_email("ada@example.com"))
        .await
        .unwrap();

    assert_eq!(reply["message"], "User registered");
}

#[tokio::test]
async fn test_create_sends_bearer_and_reads_legacy_id() {
    let (server, gateway) = gateway().await;
    Mock::given(method("POST"))
        .and(path("/api/forms/"))
        .and(header("authorization", "Bearer t0k"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "message": "Form created successfully", "form_id": 12 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let id = gateway
        .save(&Session::bearer("t0k"), &survey())
        .await
        .unwrap();

    assert_eq!(id.as_str(), "12");
}

#[tokio::test]
async fn test_update_puts_full_document() {
    let (server, gateway) = gateway().await;
    let mut form = survey();
    form.assign_id("12".into());
    Mock::given(method("PUT"))
        .and(path("/api/forms/12/"))
        .and(body_json(serde_json::to_value(&form).unwrap()))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let id = gateway.save(&Session::bearer("t0k"), &form).await.unwrap();

    assert_eq!(id.as_str(), "12");
}

#[tokio::test]
async fn test_missing_token_is_not_sent() {
    let (server, gateway) = gateway().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let err = gateway
        .save(&Session::anonymous(), &survey())
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Auth { operation: "save form" }));
}

#[tokio::test]
async fn test_load_maps_missing_form_to_not_found() {
    let (server, gateway) = gateway().await;
    Mock::given(method("GET"))
        .and(path("/api/forms/99/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = gateway
        .load(&Session::anonymous(), &"99".into())
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.operation(), Some("load form"));
}

#[tokio::test]
async fn test_load_keeps_unknown_question_types() {
    let (server, gateway) = gateway().await;
    Mock::given(method("GET"))
        .and(path("/api/forms/3/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "title": "Mixed",
            "questions": [
                { "id": "a", "type": "text", "label": "Name" },
                { "id": "b", "type": "rating", "label": "Stars" }
            ]
        })))
        .mount(&server)
        .await;

    let form = gateway
        .load(&Session::anonymous(), &"3".into())
        .await
        .unwrap();

    assert_eq!(form.id().map(|id| id.as_str()), Some("3"));
    assert_eq!(form.questions()[0].kind().type_name(), "text_input");
    assert!(!form.questions()[1].kind().is_supported());
}

#[tokio::test]
async fn test_list_builds_summaries() {
    let (server, gateway) = gateway().await;
    Mock::given(method("GET"))
        .and(path("/api/forms/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "title": "One", "questions": [] },
            { "id": 2, "title": "Two", "description": "2nd", "questions": [
                { "id": "x", "type": "paragraph", "label": "Story" }
            ] }
        ])))
        .mount(&server)
        .await;

    let listed = gateway.list(&Session::bearer("t0k")).await.unwrap();

    assert_eq!(listed.len(), 2);
    assert_eq!(listed[1].title, "Two");
    assert_eq!(listed[1].question_count, 1);
}

#[tokio::test]
async fn test_remove_tolerates_missing_form() {
    let (server, gateway) = gateway().await;
    Mock::given(method("DELETE"))
        .and(path("/api/forms/5/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    gateway
        .remove(&Session::bearer("t0k"), &"5".into())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_server_error_keeps_status() {
    let (server, gateway) = gateway().await;
    Mock::given(method("GET"))
        .and(path("/api/forms/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>boom</html>"))
        .mount(&server)
        .await;

    let err = gateway.list(&Session::bearer("t0k")).await.unwrap_err();

    assert!(matches!(
        err,
        GatewayError::Status {
            operation: "list forms",
            status: 500
        }
    ));
}

#[tokio::test]
async fn test_submit_and_list_responses() {
    let (server, gateway) = gateway().await;
    let answers = Answers::new().with("q1", "Ada");
    Mock::given(method("POST"))
        .and(path("/api/forms/7/responses/"))
        .and(body_json(json!({ "answers": { "q1": { "kind": "text", "value": "Ada" } } })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "message": "Response submitted" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/forms/7/responses/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "user__username": "ada", "answers": { "q1": { "kind": "text", "value": "Ada" } } }
        ])))
        .mount(&server)
        .await;
    let session = Session::bearer("t0k");

    let record = gateway
        .submit_response(&session, &"7".into(), &answers)
        .await
        .unwrap();
    let listed = gateway
        .list_responses(&session, &"7".into())
        .await
        .unwrap();

    assert_eq!(record.form_id.as_str(), "7");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].form_id.as_str(), "7");
    assert_eq!(listed[0].respondent.as_deref(), Some("ada"));
    assert_eq!(listed[0].answers, answers);
}

#[tokio::test]
async fn test_unreachable_server_is_persistence_error() {
    let gateway = RemoteGateway::new(ClientConfig::new("http://127.0.0.1:1/api")).unwrap();

    let err = gateway
        .load(&Session::anonymous(), &"1".into())
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Persistence { .. }));
}

//! Gateway realization over a JSON HTTP API.
//!
//! Endpoints, relative to [`ClientConfig::base_url`]:
//!
//! | Call              | Request                          |
//! |-------------------|----------------------------------|
//! | register          | `POST /register/`                |
//! | login             | `POST /login/`                   |
//! | save (new)        | `POST /forms/`                   |
//! | save (existing)   | `PUT /forms/{id}/`               |
//! | list              | `GET /forms/`                    |
//! | load              | `GET /forms/{id}/`               |
//! | remove            | `DELETE /forms/{id}/`            |
//! | submit_response   | `POST /forms/{id}/responses/`    |
//! | list_responses    | `GET /forms/{id}/responses/`     |

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Method, RequestBuilder, Response, StatusCode, header};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use formwright_types::{Answers, FormDocument, FormId, FormSummary, RecordId, ResponseRecord};

use crate::{ClientConfig, ConfigError, FormGateway, GatewayError, Session};

/// Username and password sent to `register` and `login`.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: None,
            password: password.into(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Whether a call must carry the session's bearer token.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Bearer {
    Required,
    Optional,
}

#[derive(Deserialize)]
struct Created {
    #[serde(alias = "form_id")]
    id: FormId,
}

#[derive(Deserialize)]
struct LoggedIn {
    #[serde(default)]
    token: Option<String>,
}

#[derive(Deserialize, Default)]
struct Submitted {
    #[serde(default)]
    id: Option<RecordId>,
}

/// A response as listed by the server, which may leave out the form.
#[derive(Deserialize)]
struct ListedResponse {
    #[serde(default)]
    id: Option<RecordId>,
    #[serde(default, alias = "user__username")]
    respondent: Option<String>,
    answers: Answers,
    #[serde(default, alias = "submitted_at")]
    created_at: Option<DateTime<Utc>>,
}

/// Talks to a remote form service with a bearer token.
#[derive(Debug, Clone)]
pub struct RemoteGateway {
    http: reqwest::Client,
    config: ClientConfig,
}

impl RemoteGateway {
    /// Build an HTTP client honouring the configured timeout.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Create an account. The server's reply is returned as-is.
    pub async fn register(&self, credentials: &Credentials) -> Result<serde_json::Value, GatewayError> {
        const OP: &str = "register";
        let request = self.http.post(self.config.url("/register/")).json(credentials);
        let response = self.send(OP, request).await?;
        decode(OP, response).await
    }

    /// Exchange credentials for a session carrying a bearer token.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, GatewayError> {
        const OP: &str = "login";
        let request = self.http.post(self.config.url("/login/")).json(credentials);
        let response = self.send(OP, request).await?;
        let body: LoggedIn = decode(OP, response).await?;
        match body.token {
            Some(token) => {
                tracing::info!(username = %credentials.username, "logged in");
                Ok(Session::bearer(token))
            }
            None => Err(GatewayError::persistence(
                OP,
                anyhow::anyhow!("login reply carried no token"),
            )),
        }
    }

    fn request(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        session: &Session,
        bearer: Bearer,
    ) -> Result<RequestBuilder, GatewayError> {
        let request = self.http.request(method, self.config.url(path));
        match (session.token(), bearer) {
            (Some(token), _) => Ok(request.bearer_auth(token)),
            (None, Bearer::Optional) => Ok(request),
            (None, Bearer::Required) => {
                tracing::debug!(operation, "no credential, request not sent");
                Err(GatewayError::Auth { operation })
            }
        }
    }

    async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<Response, GatewayError> {
        let response = request
            .send()
            .await
            .map_err(|err| GatewayError::persistence(operation, err))?;
        let status = response.status();
        tracing::debug!(operation, status = status.as_u16(), url = %response.url(), "round trip");

        if status.is_success() {
            return Ok(response);
        }
        tracing::warn!(operation, status = status.as_u16(), "request rejected");
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Auth { operation },
            _ => GatewayError::Status {
                operation,
                status: status.as_u16(),
            },
        })
    }
}

async fn decode<T: DeserializeOwned>(
    operation: &'static str,
    response: Response,
) -> Result<T, GatewayError> {
    response
        .json()
        .await
        .map_err(|err| GatewayError::persistence(operation, err))
}

/// Turn a 404 on a call addressing one form into [`GatewayError::NotFound`].
fn form_not_found(err: GatewayError, id: &FormId) -> GatewayError {
    match err {
        GatewayError::Status {
            operation,
            status: 404,
        } => GatewayError::not_found(operation, "form", id),
        other => other,
    }
}

fn form_path(id: &FormId) -> String {
    format!("/forms/{id}/")
}

fn responses_path(id: &FormId) -> String {
    format!("/forms/{id}/responses/")
}

#[async_trait]
impl FormGateway for RemoteGateway {
    async fn save(&self, session: &Session, form: &FormDocument) -> Result<FormId, GatewayError> {
        const OP: &str = "save form";
        form.validate()?;

        match form.id() {
            None => {
                let request = self
                    .request(OP, Method::POST, "/forms/", session, Bearer::Required)?
                    .json(form);
                let response = self.send(OP, request).await?;
                let created: Created = decode(OP, response).await?;
                tracing::info!(form = %created.id, title = %form.title, "created form");
                Ok(created.id)
            }
            Some(id) => {
                let request = self
                    .request(OP, Method::PUT, &form_path(id), session, Bearer::Required)?
                    .json(form);
                self.send(OP, request)
                    .await
                    .map_err(|err| form_not_found(err, id))?;
                Ok(id.clone())
            }
        }
    }

    async fn load(&self, session: &Session, id: &FormId) -> Result<FormDocument, GatewayError> {
        const OP: &str = "load form";
        let request = self.request(OP, Method::GET, &form_path(id), session, Bearer::Optional)?;
        let response = self
            .send(OP, request)
            .await
            .map_err(|err| form_not_found(err, id))?;
        let mut form: FormDocument = decode(OP, response).await?;
        if !form.is_saved() {
            form.assign_id(id.clone());
        }
        Ok(form)
    }

    async fn list(&self, session: &Session) -> Result<Vec<FormSummary>, GatewayError> {
        const OP: &str = "list forms";
        let request = self.request(OP, Method::GET, "/forms/", session, Bearer::Required)?;
        let response = self.send(OP, request).await?;
        let forms: Vec<FormDocument> = decode(OP, response).await?;
        Ok(forms.iter().filter_map(FormDocument::summary).collect())
    }

    async fn remove(&self, session: &Session, id: &FormId) -> Result<(), GatewayError> {
        const OP: &str = "remove form";
        let request = self.request(OP, Method::DELETE, &form_path(id), session, Bearer::Required)?;
        match self.send(OP, request).await {
            Ok(_) | Err(GatewayError::Status { status: 404, .. }) => Ok(()),
            Err(err) => Err(err),
        }
    }

    async fn submit_response(
        &self,
        session: &Session,
        form: &FormId,
        answers: &Answers,
    ) -> Result<ResponseRecord, GatewayError> {
        const OP: &str = "submit response";
        let request = self
            .request(OP, Method::POST, &responses_path(form), session, Bearer::Optional)?
            .json(&serde_json::json!({ "answers": answers }));
        let response = self
            .send(OP, request)
            .await
            .map_err(|err| form_not_found(err, form))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|err| GatewayError::persistence(OP, err))?;
        let submitted: Submitted = if bytes.is_empty() {
            Submitted::default()
        } else {
            serde_json::from_slice(&bytes).map_err(|err| GatewayError::persistence(OP, err))?
        };

        tracing::info!(form = %form, "submitted response");
        Ok(ResponseRecord {
            id: submitted.id,
            form_id: form.clone(),
            respondent: None,
            answers: answers.clone(),
            created_at: None,
        })
    }

    async fn list_responses(
        &self,
        session: &Session,
        form: &FormId,
    ) -> Result<Vec<ResponseRecord>, GatewayError> {
        const OP: &str = "list responses";
        let request =
            self.request(OP, Method::GET, &responses_path(form), session, Bearer::Required)?;
        let response = self
            .send(OP, request)
            .await
            .map_err(|err| form_not_found(err, form))?;
        let listed: Vec<ListedResponse> = decode(OP, response).await?;

        Ok(listed
            .into_iter()
            .map(|entry| ResponseRecord {
                id: entry.id,
                form_id: form.clone(),
                respondent: entry.respondent,
                answers: entry.answers,
                created_at: entry.created_at,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials::new("ada", "hunter2").with_email("ada@example.com");
        let shown = format!("{creds:?}");
        assert!(shown.contains("ada@example.com"));
        assert!(!shown.contains("hunter2"));
    }

    #[test]
    fn credentials_skip_missing_email() {
        let json = serde_json::to_value(Credentials::new("ada", "pw")).unwrap();
        assert_eq!(json, serde_json::json!({ "username": "ada", "password": "pw" }));
    }

    #[test]
    fn created_accepts_either_id_field() {
        let a: Created = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        let b: Created = serde_json::from_str(r#"{"message": "ok", "form_id": 7}"#).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(a.id.as_str(), "7");
    }

    #[test]
    fn missing_token_is_rejected_before_sending() {
        let gateway = RemoteGateway::new(ClientConfig::new("http://127.0.0.1:9")).unwrap();
        let err = gateway
            .request("list forms", Method::GET, "/forms/", &Session::anonymous(), Bearer::Required)
            .unwrap_err();
        assert!(err.is_auth());
    }
}

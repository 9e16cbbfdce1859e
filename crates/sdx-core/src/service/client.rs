use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{Diagnosis, ServiceError, ServiceResult, ServiceStatus, SymptomService};
use crate::config::Config;

/// Standard User-Agent header for sdx requests.
pub const USER_AGENT: &str = concat!("sdx/", env!("CARGO_PKG_VERSION"));

const SYMPTOMS_PATH: &str = "/api/symptoms";
const DIAGNOSE_PATH: &str = "/api/diagnose";
const STATUS_PATH: &str = "/";

/// HTTP client for the symptom service.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct DiagnoseRequest<'a> {
    symptoms: &'a [String],
}

impl ApiClient {
    /// Creates a client for `base_url` with an optional request timeout.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        let base_url: String = base_url.into();
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a client from config, honoring the `--service-url` override.
    ///
    /// # Errors
    /// Returns an error if the resolved URL is invalid or the client cannot be built.
    pub fn from_config(config: &Config, service_url_override: Option<&str>) -> Result<Self> {
        let base_url = config.resolve_service_url(service_url_override)?;
        Self::new(base_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the symptom catalog from `GET /api/symptoms`.
    ///
    /// # Errors
    /// Returns a `Parse` error unless the body is a JSON array of strings.
    pub async fn fetch_symptoms(&self) -> ServiceResult<Vec<String>> {
        let body = self.get_text(SYMPTOMS_PATH).await?;
        let symptoms = parse_symptom_list(&body)?;
        tracing::debug!(count = symptoms.len(), "Loaded symptom catalog");
        Ok(symptoms)
    }

    /// Requests a diagnosis from `POST /api/diagnose`.
    ///
    /// # Errors
    /// Returns a `Parse` error unless the body carries a string `diagnosis`.
    pub async fn request_diagnosis(&self, symptoms: &[String]) -> ServiceResult<Diagnosis> {
        let request = DiagnoseRequest { symptoms };
        let diagnosis: Diagnosis = self.post_json(DIAGNOSE_PATH, &request).await?;
        tracing::debug!(diagnosis = %diagnosis.diagnosis, "Received diagnosis");
        Ok(diagnosis)
    }

    /// Probes `GET /`.
    ///
    /// # Errors
    /// Returns an error if the service is unreachable or answers unexpectedly.
    pub async fn status(&self) -> ServiceResult<ServiceStatus> {
        let body = self.get_text(STATUS_PATH).await?;
        serde_json::from_str(&body)
            .map_err(|e| ServiceError::parse(format!("Invalid status response: {e}"), &body))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_text(&self, path: &str) -> ServiceResult<String> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| log_failure(&url, ServiceError::from_reqwest(&e)))?;
        read_success_body(&url, response).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ServiceResult<T> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| log_failure(&url, ServiceError::from_reqwest(&e)))?;
        let text = read_success_body(&url, response).await?;
        serde_json::from_str(&text).map_err(|e| {
            log_failure(
                &url,
                ServiceError::parse(format!("Invalid response from server: {e}"), &text),
            )
        })
    }
}

impl SymptomService for ApiClient {
    async fn list_symptoms(&self) -> ServiceResult<Vec<String>> {
        self.fetch_symptoms().await
    }

    async fn diagnose(&self, symptoms: &[String]) -> ServiceResult<Diagnosis> {
        self.request_diagnosis(symptoms).await
    }
}

/// Reads the body of a response, turning non-2xx statuses into errors.
async fn read_success_body(url: &str, response: reqwest::Response) -> ServiceResult<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| log_failure(url, ServiceError::from_reqwest(&e)))?;

    if !status.is_success() {
        return Err(log_failure(
            url,
            ServiceError::http_status(status.as_u16(), &body),
        ));
    }
    Ok(body)
}

fn log_failure(url: &str, err: ServiceError) -> ServiceError {
    tracing::warn!(%url, kind = %err.kind, error = %err.message, "Service request failed");
    err
}

/// Validates that `body` is a JSON array whose items are all strings.
fn parse_symptom_list(body: &str) -> ServiceResult<Vec<String>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ServiceError::parse(format!("Invalid JSON: {e}"), body))?;

    let Value::Array(items) = value else {
        return Err(ServiceError::parse("Expected a list of symptoms", body));
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            _ => Err(ServiceError::parse("Expected every symptom to be a string", body)),
        })
        .collect()
}

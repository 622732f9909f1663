//! Outbound delivery of quote requests.

use std::time::Duration;

use async_trait::async_trait;
use quote_core::{SubmissionPayload, SubmissionTransport, TransportError};
use reqwest::Client;
use tracing::{debug, info};

use crate::config::SubmissionConfig;

/// Upper bound on how much of a rejection body is kept for the error.
const MAX_BODY_CHARS: usize = 512;

/// POSTs the payload as JSON. Any non-2xx status is a rejection.
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn classify(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(error.to_string())
    }
}

#[async_trait]
impl SubmissionTransport for HttpTransport {
    async fn send(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<(), TransportError> {
        debug!(endpoint = %self.endpoint, "posting quote request");
        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if status.is_success() {
            info!(status = status.as_u16(), "quote request accepted");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(TransportError::Rejected {
            status: status.as_u16(),
            body: body.chars().take(MAX_BODY_CHARS).collect(),
        })
    }
}

/// Logs the payload instead of sending it. Used when no endpoint is set.
pub struct DryRunTransport;

#[async_trait]
impl SubmissionTransport for DryRunTransport {
    async fn send(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<(), TransportError> {
        let json = payload
            .to_json()
            .map_err(|e| TransportError::Network(format!("cannot encode payload: {e}")))?;
        info!(payload = %json, "dry run, quote request not sent");
        Ok(())
    }
}

pub fn build_transport(config: &SubmissionConfig) -> Result<Box<dyn SubmissionTransport>, TransportError> {
    match config.endpoint.as_deref().map(str::trim) {
        Some(endpoint) if !endpoint.is_empty() => {
            let transport =
                HttpTransport::new(endpoint, Duration::from_secs(config.timeout_secs.max(1)))?;
            info!(endpoint, "submissions go to http endpoint");
            Ok(Box::new(transport))
        }
        _ => {
            info!("no submission endpoint configured, using dry run");
            Ok(Box::new(DryRunTransport))
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;
    use quote_core::models::{
        Answers, ContactPreferences, PROJECT_TYPE, PersonalField, PersonalFields,
    };
    use serde_json::json;

    use super::*;

    fn payload() -> SubmissionPayload {
        let mut answers = Answers::new();
        answers.insert(PROJECT_TYPE.to_string(), "design".to_string());
        let mut personal = PersonalFields::default();
        personal.set(PersonalField::Email, "ada@example.org");
        SubmissionPayload::new(
            &answers,
            &personal,
            ContactPreferences::default(),
            Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap(),
            None,
        )
    }

    #[tokio::test]
    async fn posts_payload_as_json() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/quote")
                    .header("content-type", "application/json")
                    .json_body_partial(r#"{"projectType": "design", "email": "ada@example.org"}"#);
                then.status(201);
            })
            .await;

        let transport = HttpTransport::new(server.url("/quote"), Duration::from_secs(5)).unwrap();

        assert_eq!(transport.send(&payload()).await, Ok(()));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_a_rejection() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/quote");
                then.status(422).body("email already used");
            })
            .await;

        let transport = HttpTransport::new(server.url("/quote"), Duration::from_secs(5)).unwrap();

        assert_eq!(
            transport.send(&payload()).await,
            Err(TransportError::Rejected {
                status: 422,
                body: "email already used".to_string()
            })
        );
    }

    #[tokio::test]
    async fn slow_endpoint_times_out() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/quote");
                then.status(200).delay(Duration::from_millis(1500));
            })
            .await;

        let transport =
            HttpTransport::new(server.url("/quote"), Duration::from_millis(200)).unwrap();

        assert_eq!(transport.send(&payload()).await, Err(TransportError::Timeout));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_network_error() {
        let transport =
            HttpTransport::new("http://127.0.0.1:9/quote", Duration::from_secs(2)).unwrap();

        let result = transport.send(&payload()).await;

        assert!(matches!(
            result,
            Err(TransportError::Network(_)) | Err(TransportError::Timeout)
        ));
    }

    #[tokio::test]
    async fn dry_run_always_succeeds() {
        assert_eq!(DryRunTransport.send(&payload()).await, Ok(()));
    }

    #[test]
    fn payload_shape_matches_what_the_endpoint_receives() {
        let value: serde_json::Value = serde_json::to_value(payload()).unwrap();

        assert_eq!(value["projectType"], json!("design"));
        assert_eq!(value["newsletter"], json!(false));
        assert_eq!(value["estimate"], json!(null));
    }

    #[test]
    fn blank_endpoint_falls_back_to_dry_run() {
        let config = SubmissionConfig {
            endpoint: Some("   ".to_string()),
            timeout_secs: 10,
        };

        assert!(build_transport(&config).is_ok());
    }
}

use crate::app::config::Config;
use crate::models::payment::{IntentPayload, PaymentIntent, PaymentRecord, RefundPayload};
use crate::services::auth::TokenProvider;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("gateway rejected request ({status}): {body}")]
    Rejected { status: StatusCode, body: String },
}

/// The slice of the backend the confirmation flow depends on. Production code
/// uses [`GatewayClient`]; tests inject their own implementations.
#[async_trait]
pub trait PaymentsApi: Send + Sync {
    async fn create_intent(
        &self,
        service_id: i64,
        phone_number: &str,
    ) -> Result<PaymentIntent, GatewayError>;

    async fn list_payments(&self) -> Result<Vec<PaymentRecord>, GatewayError>;
}

#[derive(Debug, Deserialize)]
struct CreateIntentResponse {
    id: i64,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
}

pub struct GatewayClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl GatewayClient {
    pub fn new(config: &Config, tokens: Arc<dyn TokenProvider>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens,
        }
    }

    /// Starts a mobile-money payment for a service. The gateway pushes a
    /// payment prompt to the payer's device out of band; the returned intent
    /// id is the only way to observe the outcome, via polling.
    ///
    /// The phone number must already be validated by the caller
    /// (see `utils::phone`).
    pub async fn create_intent(
        &self,
        service_id: i64,
        phone_number: &str,
    ) -> Result<PaymentIntent, GatewayError> {
        let payload = IntentPayload {
            service_id,
            phone_number: phone_number.to_string(),
        };

        let request = self
            .client
            .post(format!("{}/mpesa/create/", self.base_url))
            .json(&payload);
        let response = self.execute(request).await?;
        let created: CreateIntentResponse = response.json().await?;

        info!(
            "Payment intent {} created for service {}",
            created.id, service_id
        );

        Ok(PaymentIntent {
            id: created.id,
            service_id,
            phone_number: payload.phone_number,
            created_at: created.created_at.unwrap_or_else(Utc::now),
        })
    }

    pub async fn list_payments(&self) -> Result<Vec<PaymentRecord>, GatewayError> {
        let request = self.client.get(format!("{}/payments/", self.base_url));
        let response = self.execute(request).await?;
        Ok(response.json().await?)
    }

    pub async fn refund_payment(
        &self,
        payment_id: i64,
        refund_amount: u64,
        phone_number: &str,
    ) -> Result<(), GatewayError> {
        let payload = RefundPayload {
            payment_id,
            refund_amount,
            phone_number: phone_number.to_string(),
        };

        let request = self
            .client
            .post(format!("{}/refund/", self.base_url))
            .json(&payload);
        self.execute(request).await?;

        info!("Refund requested for payment {}", payment_id);
        Ok(())
    }

    // Attaches the bearer token and replays the request once after a 401 if
    // the session can be refreshed. A second 401 propagates as-is.
    async fn execute(&self, request: RequestBuilder) -> Result<Response, GatewayError> {
        let retry = request.try_clone();

        let request = match self.tokens.access_token().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            if let Some(retry) = retry {
                if let Some(access) = self.refresh_session().await {
                    let response = retry.bearer_auth(access).send().await?;
                    return check_status(response).await;
                }
            }
        }

        check_status(response).await
    }

    async fn refresh_session(&self) -> Option<String> {
        let refresh = self.tokens.refresh_token().await?;

        let response = self
            .client
            .post(format!("{}/token/refresh/", self.base_url))
            .json(&serde_json::json!({ "refresh": refresh }))
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            warn!("Token refresh rejected with status {}", response.status());
            self.tokens.clear().await;
            return None;
        }

        match response.json::<RefreshResponse>().await {
            Ok(body) => {
                self.tokens.store_access_token(body.access.clone()).await;
                Some(body.access)
            }
            Err(e) => {
                warn!("Token refresh returned malformed body: {}", e);
                self.tokens.clear().await;
                None
            }
        }
    }
}

#[async_trait]
impl PaymentsApi for GatewayClient {
    async fn create_intent(
        &self,
        service_id: i64,
        phone_number: &str,
    ) -> Result<PaymentIntent, GatewayError> {
        GatewayClient::create_intent(self, service_id, phone_number).await
    }

    async fn list_payments(&self) -> Result<Vec<PaymentRecord>, GatewayError> {
        GatewayClient::list_payments(self).await
    }
}

async fn check_status(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    // Keep the gateway body verbatim; it carries the human-readable reason
    // (e.g. insufficient funds) the caller may want to show.
    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::Rejected { status, body })
}

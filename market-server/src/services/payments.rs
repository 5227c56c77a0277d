//! Payment Gateway integration via REST API (no SDK dependency)
//!
//! Creates payment intents for checkout and re-fetches them before an
//! order is recorded, so an order can only be appended for a confirmation
//! id the gateway reports as succeeded.

use crate::utils::{AppError, ErrorCode};

/// A payment intent as reported by the gateway
#[derive(Debug, Clone)]
pub struct PaymentIntent {
    pub id: String,
    /// Secret handed to the client to complete the payment
    pub client_secret: Option<String>,
    pub status: String,
    /// Amount in the currency's minor unit
    pub amount: i64,
    pub currency: String,
}

impl PaymentIntent {
    pub fn is_succeeded(&self) -> bool {
        self.status == "succeeded"
    }
}

/// Client for the external payment gateway
#[derive(Debug, Clone)]
pub struct PaymentGateway {
    http: reqwest::Client,
    api_base: String,
    secret_key: String,
}

impl PaymentGateway {
    pub fn new(api_base: String, secret_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base,
            secret_key,
        }
    }

    fn parse_intent(resp: &serde_json::Value) -> Result<PaymentIntent, AppError> {
        let id = resp["id"].as_str().ok_or_else(|| {
            AppError::dependency(
                ErrorCode::PaymentProviderError,
                format!("Payment gateway response missing id: {resp}"),
            )
        })?;

        Ok(PaymentIntent {
            id: id.to_string(),
            client_secret: resp["client_secret"].as_str().map(String::from),
            status: resp["status"].as_str().unwrap_or_default().to_string(),
            amount: resp["amount"].as_i64().unwrap_or_default(),
            currency: resp["currency"].as_str().unwrap_or_default().to_string(),
        })
    }

    /// Create a payment intent for the given amount (minor units)
    pub async fn create_payment_intent(
        &self,
        amount: i64,
        currency: &str,
    ) -> Result<PaymentIntent, AppError> {
        let resp: serde_json::Value = self
            .http
            .post(format!("{}/payment_intents", self.api_base))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&[
                ("amount", amount.to_string()),
                ("currency", currency.to_string()),
                ("automatic_payment_methods[enabled]", "true".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::dependency(
                    ErrorCode::PaymentProviderError,
                    format!("Payment gateway request failed: {e}"),
                )
            })?
            .json()
            .await
            .map_err(|e| {
                AppError::dependency(
                    ErrorCode::PaymentProviderError,
                    format!("Payment gateway returned an unreadable response: {e}"),
                )
            })?;

        Self::parse_intent(&resp)
    }

    /// Fetch an existing payment intent by id
    pub async fn retrieve_payment_intent(&self, id: &str) -> Result<PaymentIntent, AppError> {
        let resp = self
            .http
            .get(format!("{}/payment_intents/{}", self.api_base, id))
            .basic_auth(&self.secret_key, None::<&str>)
            .send()
            .await
            .map_err(|e| {
                AppError::dependency(
                    ErrorCode::PaymentProviderError,
                    format!("Payment gateway request failed: {e}"),
                )
            })?;

        if resp.status() == http::StatusCode::NOT_FOUND {
            return Err(AppError::with_message(
                ErrorCode::PaymentNotConfirmed,
                format!("Unknown payment confirmation id: {id}"),
            ));
        }

        let body: serde_json::Value = resp.json().await.map_err(|e| {
            AppError::dependency(
                ErrorCode::PaymentProviderError,
                format!("Payment gateway returned an unreadable response: {e}"),
            )
        })?;

        Self::parse_intent(&body)
    }
}

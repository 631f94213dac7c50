// Minimal Stripe API client for Payment Intents and webhook verification.
//
// Only the endpoints this platform actually calls are implemented; the
// official API reference is https://docs.stripe.com/api/payment_intents.

use std::collections::HashMap;

pub mod models;
pub mod webhook;

use reqwest::Client;
use thiserror::Error;

use crate::models::{ApiErrorResponse, PaymentIntent};
pub use crate::models::WebhookEvent;

const API_BASE: &str = "https://api.stripe.com/v1";

#[derive(Error, Debug)]
pub enum StripeError {
    #[error("Stripe request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Stripe returned an error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse Stripe response: {0}")]
    Parse(String),

    #[error("Webhook signature verification failed: {0}")]
    Signature(String),
}

#[derive(Debug, Clone)]
pub struct StripeOptions {
    pub secret_key: String,
}

/// Parameters for creating a Payment Intent.
///
/// All amounts are in minor units (cents).
#[derive(Debug, Clone, Default)]
pub struct CreatePaymentIntentParams {
    pub amount: i64,
    pub currency: String,
    pub receipt_email: Option<String>,
    pub description: Option<String>,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct StripeService {
    options: StripeOptions,
    client: Client,
}

impl StripeService {
    pub fn new(options: StripeOptions) -> Self {
        Self {
            options,
            client: Client::new(),
        }
    }

    /// Create a Payment Intent with automatic payment methods enabled.
    pub async fn create_payment_intent(
        &self,
        params: CreatePaymentIntentParams,
    ) -> Result<PaymentIntent, StripeError> {
        let url = format!("{}/payment_intents", API_BASE);

        // The Stripe API takes form-encoded bodies with bracketed nesting
        // for maps (metadata[key]=value).
        let mut form: Vec<(String, String)> = vec![
            ("amount".to_string(), params.amount.to_string()),
            ("currency".to_string(), params.currency.clone()),
            (
                "automatic_payment_methods[enabled]".to_string(),
                "true".to_string(),
            ),
        ];

        if let Some(email) = &params.receipt_email {
            form.push(("receipt_email".to_string(), email.clone()));
        }
        if let Some(description) = &params.description {
            form.push(("description".to_string(), description.clone()));
        }
        for (key, value) in &params.metadata {
            form.push((format!("metadata[{}]", key), value.clone()));
        }

        let response = self
            .client
            .post(url)
            .basic_auth(&self.options.secret_key, None::<&str>)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ApiErrorResponse>().await {
                Ok(body) => body.error.message.unwrap_or_else(|| "unknown".to_string()),
                Err(_) => "unknown".to_string(),
            };
            return Err(StripeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<PaymentIntent>()
            .await
            .map_err(|e| StripeError::Parse(e.to_string()))
    }
}

use serde::{Deserialize, Serialize};

/// A Stripe Payment Intent (the fields this platform reads).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    /// Secret handed to the frontend to complete payment with Elements.
    pub client_secret: Option<String>,
    pub status: String,
    pub amount: i64,
}

/// Error envelope returned by the Stripe API on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub code: Option<String>,
    pub message: Option<String>,
}

/// A webhook event delivered by Stripe.
///
/// `data.object` is kept as raw JSON; each event type carries a different
/// object and callers only need a couple of fields from it.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEventData {
    pub object: serde_json::Value,
}

impl WebhookEvent {
    /// The `id` of the object the event is about (e.g. the Payment Intent id
    /// for `payment_intent.*` events).
    pub fn object_id(&self) -> Option<&str> {
        self.data.object.get("id").and_then(|v| v.as_str())
    }
}

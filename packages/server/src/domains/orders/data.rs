// Request/response DTOs for the public checkout and registration routes.
// Field names are wire compatibility; do not rename.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{ServiceError, ServiceResult};
use crate::domains::orders::checkout::PaymentIntentResult;

/// Body of POST /api/checkout and POST /api/register.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub event_id: i64,
    pub ticket_type: String,
    pub quantity: i32,
    pub purchaser_name: String,
    pub purchaser_email: String,
}

impl CheckoutRequest {
    /// Boundary validation of untrusted input. Domain rules (capacity,
    /// sale windows) are the services' job.
    pub fn validate(&self) -> ServiceResult<()> {
        if self.event_id < 1 {
            return Err(ServiceError::Validation("eventId must be positive".into()));
        }
        if self.ticket_type.is_empty() {
            return Err(ServiceError::Validation("ticketType is required".into()));
        }
        if !(1..=20).contains(&self.quantity) {
            return Err(ServiceError::Validation(
                "quantity must be between 1 and 20".into(),
            ));
        }
        if self.purchaser_name.is_empty() || self.purchaser_name.len() > 200 {
            return Err(ServiceError::Validation(
                "purchaserName must be 1-200 characters".into(),
            ));
        }
        if !self.purchaser_email.contains('@') || self.purchaser_email.len() > 200 {
            return Err(ServiceError::Validation(
                "purchaserEmail must be a valid email".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub client_secret: String,
    pub payment_intent_id: String,
    pub base_amount: i64,
    pub service_fee_amount: i64,
    pub tax_amount: i64,
    pub tax_name: String,
    pub total_amount: i64,
}

impl From<PaymentIntentResult> for CheckoutResponse {
    fn from(result: PaymentIntentResult) -> Self {
        Self {
            client_secret: result.client_secret,
            payment_intent_id: result.payment_intent_id,
            base_amount: result.base_amount,
            service_fee_amount: result.service_fee_amount,
            tax_amount: result.tax_amount,
            tax_name: result.tax_name,
            total_amount: result.total_amount,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub order_id: Uuid,
    pub qr_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CheckoutRequest {
        CheckoutRequest {
            event_id: 1,
            ticket_type: "General Admission".to_string(),
            quantity: 2,
            purchaser_name: "Jordan Wells".to_string(),
            purchaser_email: "jordan@example.com".to_string(),
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn quantity_bounds_are_enforced() {
        let mut req = valid_request();
        req.quantity = 0;
        assert!(req.validate().is_err());
        req.quantity = 21;
        assert!(req.validate().is_err());
        req.quantity = 20;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn email_must_look_like_an_email() {
        let mut req = valid_request();
        req.purchaser_email = "not-an-email".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn request_parses_wire_field_names() {
        let body = serde_json::json!({
            "eventId": 7,
            "ticketType": "GA",
            "quantity": 1,
            "purchaserName": "A",
            "purchaserEmail": "a@b.c"
        });
        let req: CheckoutRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.event_id, 7);
    }
}

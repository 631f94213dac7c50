use axum::{extract::Extension, Json};

use crate::common::ServiceError;
use crate::domains::orders::checkout::{create_payment_intent, CreatePaymentIntentInput};
use crate::domains::orders::data::{CheckoutRequest, CheckoutResponse};
use crate::server::app::AppState;

/// POST /api/checkout
///
/// Creates a Payment Intent plus a pending order for a paid ticket. The
/// response carries the client secret the frontend needs to collect payment.
pub async fn checkout_handler(
    Extension(state): Extension<AppState>,
    Json(body): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ServiceError> {
    body.validate()?;

    let result = create_payment_intent(
        CreatePaymentIntentInput {
            event_id: body.event_id,
            ticket_type: body.ticket_type,
            quantity: body.quantity,
            purchaser_name: body.purchaser_name,
            purchaser_email: body.purchaser_email,
            contact_id: None,
        },
        &state.deps,
    )
    .await?;

    Ok(Json(result.into()))
}

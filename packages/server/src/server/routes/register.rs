use axum::{extract::Extension, Json};

use crate::common::ServiceError;
use crate::domains::orders::data::{CheckoutRequest, RegisterResponse};
use crate::domains::orders::free_registration::{
    create_free_registration, CreateFreeRegistrationInput,
};
use crate::server::app::AppState;

/// POST /api/register
///
/// Creates a confirmed order for a free ticket. Accepts the same body as
/// checkout; paid tickets are rejected with a pointer to the checkout flow.
pub async fn register_handler(
    Extension(state): Extension<AppState>,
    Json(body): Json<CheckoutRequest>,
) -> Result<Json<RegisterResponse>, ServiceError> {
    body.validate()?;

    let result = create_free_registration(
        CreateFreeRegistrationInput {
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

    Ok(Json(RegisterResponse {
        order_id: result.order_id,
        qr_token: result.qr_token,
    }))
}

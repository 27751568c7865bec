// src/handlers/payments.rs

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        response::{self, ApiResponse},
    },
    config::AppState,
    models::payment::{PaymentDto, PaymentNotifyPayload},
};

// Rota pública: o convidado declara ter pago (mobile money ou espèces).
#[utoipa::path(
    post,
    path = "/api/payment/notify",
    tag = "Payments",
    request_body = PaymentNotifyPayload,
    responses(
        (status = 201, description = "Paiement notifié", body = PaymentDto),
        (status = 404, description = "Demande introuvable"),
        (status = 409, description = "Paiement déjà notifié"),
        (status = 422, description = "Demande non validée ou canal incohérent")
    )
)]
pub async fn notify(
    State(app_state): State<AppState>,
    Json(payload): Json<PaymentNotifyPayload>,
) -> Result<(StatusCode, Json<ApiResponse<PaymentDto>>), AppError> {
    payload.validate()?;

    let payment = app_state.payment_service.notify(&payload).await?;
    Ok(response::created(
        payment,
        "Votre paiement a bien été notifié. Il sera vérifié sous peu.",
    ))
}

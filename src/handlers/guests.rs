// src/handlers/guests.rs

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{DoorAccess, RequireRole},
    models::demand::Guest,
    services::guest_service::TicketOutcome,
};

// A validação de ticket tem envelope próprio: o scanner lê `success` e `data`
// primeiro e só depois consulta `reason`. Um ticket já utilizado é uma leitura
// bem-sucedida (success = true, data presente) distinguida pelo `reason`;
// só o ticket desconhecido/não quitado derruba o `success`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuestValidationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub data: Option<Guest>,
    pub message: String,
}

impl GuestValidationResponse {
    pub fn from_outcome(outcome: TicketOutcome) -> Self {
        match outcome {
            TicketOutcome::Valid(guest) => Self {
                success: true,
                reason: None,
                data: Some(guest),
                message: "Ticket valide".to_string(),
            },
            TicketOutcome::AlreadyUsed(guest) => Self {
                success: true,
                reason: Some("ALREADY_USED".to_string()),
                data: Some(guest),
                message: "Ticket déjà utilisé".to_string(),
            },
            TicketOutcome::Invalid => Self {
                success: false,
                reason: None,
                data: None,
                message: "Ticket non valide".to_string(),
            },
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/guest/{slug}",
    tag = "Guests",
    params(("slug" = String, Path, description = "Slug du ticket (ou contenu brut du QR)")),
    responses(
        (status = 200, description = "Résultat du scan", body = GuestValidationResponse)
    ),
    security(("api_jwt" = []))
)]
pub async fn validate(
    State(app_state): State<AppState>,
    _role: RequireRole<DoorAccess>,
    Path(slug): Path<String>,
) -> Result<(StatusCode, Json<GuestValidationResponse>), AppError> {
    let outcome = app_state.guest_service.validate_ticket(&slug).await?;

    // Sempre 200: os três resultados são respostas normais do scanner.
    Ok((StatusCode::OK, Json(GuestValidationResponse::from_outcome(outcome))))
}

#[utoipa::path(
    get,
    path = "/api/guest/{slug}/qr",
    tag = "Guests",
    params(("slug" = String, Path, description = "Slug du ticket")),
    responses(
        (status = 200, description = "QR code du ticket (PNG)", content_type = "image/png"),
        (status = 404, description = "Ticket introuvable")
    ),
    security(("api_jwt" = []))
)]
pub async fn qr_code(
    State(app_state): State<AppState>,
    _role: RequireRole<DoorAccess>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let png = app_state.guest_service.qr_png(&slug).await?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn guest() -> Guest {
        Guest {
            id: Uuid::new_v4(),
            demand_id: Uuid::new_v4(),
            slug: "g1".to_string(),
            first_name: "Awa".to_string(),
            last_name: "Diop".to_string(),
            email: "awa@example.com".to_string(),
            phone_number: "770000000".to_string(),
            age: 30,
            is_main_guest: true,
            state: true,
        }
    }

    // O scanner descarta a resposta inteira quando success = false ou data
    // está ausente, antes de olhar o reason. Por isso o ticket já utilizado
    // precisa sair com success = true e data preenchido.
    #[test]
    fn ticket_ja_utilizado_sai_com_success_e_data() {
        let resp = GuestValidationResponse::from_outcome(TicketOutcome::AlreadyUsed(guest()));
        assert!(resp.success);
        assert!(resp.data.is_some());
        assert_eq!(resp.reason.as_deref(), Some("ALREADY_USED"));
        assert_eq!(resp.message, "Ticket déjà utilisé");
    }

    #[test]
    fn ticket_valido_sai_sem_reason() {
        let resp = GuestValidationResponse::from_outcome(TicketOutcome::Valid(guest()));
        assert!(resp.success);
        assert!(resp.data.is_some());
        assert_eq!(resp.reason, None);
        assert_eq!(resp.message, "Ticket valide");
    }

    #[test]
    fn ticket_desconhecido_derruba_o_success() {
        let resp = GuestValidationResponse::from_outcome(TicketOutcome::Invalid);
        assert!(!resp.success);
        assert!(resp.data.is_none());
        assert_eq!(resp.reason, None);
        assert_eq!(resp.message, "Ticket non valide");
    }
}

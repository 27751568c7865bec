// src/models/demand.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::event::{EventDto, EventTable};
use crate::models::payment::PaymentDto;

// --- Enums ---

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "demand_status", rename_all = "SCREAMING_SNAKE_CASE")] // Banco
#[serde(rename_all = "SCREAMING_SNAKE_CASE")] // JSON
pub enum DemandStatus {
    Soumise,          // estado inicial
    Validee,
    Refusee,
    PaiementNotifie,  // alcançável apenas via notificação de pagamento
    Payee,            // terminal do fluxo normal
    Offert,           // cortesia, terminal
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "demand_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DemandType {
    Unique,
    Group,
}

// --- Linhas do banco ---

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Demand {
    pub id: Uuid,
    pub slug: String,
    pub event_id: Uuid,
    pub status: DemandStatus,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub demand_type: DemandType,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: Uuid,
    #[schema(ignore)]
    #[serde(skip_serializing)]
    pub demand_id: Uuid,
    pub slug: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub age: i32,
    pub is_main_guest: bool,
    // TRUE quando o ticket já foi usado na entrada
    pub state: bool,
}

// Linha de seleção de table já com os dados da table (JOIN)
#[derive(Debug, Clone, FromRow)]
pub struct TableItemRow {
    pub id: Uuid,
    pub quantity: i32,
    pub table_id: Uuid,
    pub table_name: String,
    pub table_amount: rust_decimal::Decimal,
    pub table_capacity: i32,
}

// --- DTOs devolvidos ao portal ---

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableItemDto {
    pub id: Uuid,
    pub table: EventTable,
    pub quantity: i32,
}

impl From<TableItemRow> for TableItemDto {
    fn from(row: TableItemRow) -> Self {
        Self {
            id: row.id,
            table: EventTable {
                id: row.table_id,
                event_id: Uuid::nil(),
                name: row.table_name,
                amount: row.table_amount,
                capacity: row.table_capacity,
            },
            quantity: row.quantity,
        }
    }
}

// Detalhe completo (payload de GET /demand/{slug})
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DemandDetail {
    pub id: Uuid,
    pub slug: String,
    pub status: DemandStatus,
    #[serde(rename = "type")]
    pub demand_type: DemandType,
    pub created_at: DateTime<Utc>,
    pub guests: Vec<Guest>,
    pub table_items: Vec<TableItemDto>,
    pub payment: Option<PaymentDto>,
    pub event: EventDto,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MainGuestDto {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub age: i32,
}

// Resumo de lista (GET /demand/by-event/{slug})
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DemandSummary {
    pub id: Uuid,
    pub slug: String,
    pub status: DemandStatus,
    #[serde(rename = "type")]
    pub demand_type: DemandType,
    pub number_of_guests: i64,
    pub created_at: DateTime<Utc>,
    pub guests: Vec<Guest>,
    pub main_guest: MainGuestDto,
}

// Estatística por statut; o backend só devolve os statuts presentes,
// o portal completa os zeros.
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DemandStatsEntry {
    pub status: DemandStatus,
    pub total_demands: i64,
    pub total_participants: i64,
}

// --- Payloads ---

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuestPayload {
    #[validate(length(min = 1, message = "Le prénom est requis."))]
    pub first_name: String,

    #[validate(length(min = 1, message = "Le nom est requis."))]
    pub last_name: String,

    #[validate(email(message = "L'e-mail fourni est invalide."))]
    pub email: String,

    #[validate(length(min = 1, message = "Le numéro de téléphone est requis."))]
    pub phone_number: String,

    #[validate(range(min = 0, message = "L'âge doit être positif."))]
    pub age: i32,

    #[serde(default)]
    pub is_main_guest: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TableSelectionPayload {
    pub table_id: Uuid,

    #[validate(range(min = 1, message = "La quantité doit être d'au moins 1."))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDemandPayload {
    #[validate(length(min = 1, message = "Le slug de l'évènement est requis."))]
    pub event_slug: String,

    #[validate(length(min = 1, message = "Au moins un participant est requis."), nested)]
    pub guests: Vec<GuestPayload>,

    #[validate(nested)]
    #[serde(default)]
    pub table_selections: Vec<TableSelectionPayload>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusPayload {
    pub status: DemandStatus,
}

// Filtres de GET /demand/by-event/{slug}?status=&type=
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandFilter {
    pub status: Option<DemandStatus>,
    #[serde(rename = "type")]
    pub demand_type: Option<DemandType>,
}

// src/models/event.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// ---
// Validação customizada (montantes nunca negativos)
// ---
pub fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("Le montant ne peut pas être négatif.".into());
        return Err(err);
    }
    Ok(())
}

// --- 1. Linhas do banco ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    // Dia de calendário, sem hora nem fuso
    pub date: NaiveDate,
    pub location: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Um palier de preço pertence a exatamente um evento; `position` preserva a
// ordem da lista (a regra de adjacência depende dela).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub id: Uuid,
    #[schema(ignore)]
    #[serde(skip_serializing)]
    pub event_id: Uuid,
    pub name: String,
    pub amount: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub position: i32,
}

// "Table" no sentido da billetterie: lote de lugares com preço próprio.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventTable {
    pub id: Uuid,
    #[schema(ignore)]
    #[serde(skip_serializing)]
    pub event_id: Uuid,
    pub name: String,
    pub amount: Decimal,
    pub capacity: i32,
}

// --- 2. DTO completo devolvido ao portal ---

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventDto {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub date: NaiveDate,
    pub location: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub prices: Vec<Price>,
    pub tables: Vec<EventTable>,
}

impl EventDto {
    pub fn assemble(event: Event, prices: Vec<Price>, tables: Vec<EventTable>) -> Self {
        Self {
            id: event.id,
            slug: event.slug,
            name: event.name,
            date: event.date,
            location: event.location,
            description: event.description,
            cover_image: event.cover_image,
            prices,
            tables,
        }
    }
}

// --- 3. Payloads de criação/edição ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PricePayload {
    #[validate(length(min = 1, message = "Le nom du tarif est requis."))]
    pub name: String,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub amount: Decimal,

    // As datas ausentes são responsabilidade destes validadores; as regras de
    // cobertura/adjacência curto-circuitam quando falta uma data.
    #[validate(required(message = "La date de début du tarif est requise."))]
    pub start_date: Option<NaiveDate>,

    #[validate(required(message = "La date de fin du tarif est requise."))]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TablePayload {
    #[validate(length(min = 1, message = "Le nom de la table est requis."))]
    pub name: String,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub amount: Decimal,

    #[validate(range(min = 1, message = "La capacité doit être d'au moins 1."))]
    pub capacity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveEventPayload {
    #[validate(length(min = 3, message = "Le nom doit contenir au moins 3 caractères."))]
    pub name: String,

    // A ausência da data é tratada pelo validador de tarifas, em prioridade
    // máxima (mensagem dedicada do portal).
    pub date: Option<NaiveDate>,

    #[validate(length(min = 3, message = "Le lieu doit contenir au moins 3 caractères."))]
    pub location: String,

    pub description: Option<String>,
    pub cover_image: Option<String>,

    #[validate(nested)]
    #[serde(default)]
    pub prices: Vec<PricePayload>,

    #[validate(nested)]
    #[serde(default)]
    pub tables: Vec<TablePayload>,
}

// src/models/payment.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "payment_canal", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentCanal {
    Wave,
    OrangeMoney,
    Cash,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub demand_id: Uuid,
    pub amount: Decimal,
    pub canal: PaymentCanal,
    pub phone_number: Option<String>,
    pub payment_place: Option<String>,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDto {
    pub id: Uuid,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub phone_number: Option<String>,
    pub payment_canal: PaymentCanal,
    pub payment_place: Option<String>,
}

impl From<Payment> for PaymentDto {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id,
            amount: p.amount,
            date: p.date,
            phone_number: p.phone_number,
            payment_canal: p.canal,
            payment_place: p.payment_place,
        }
    }
}

// Notificação de pagamento enviada pelo convidado ou pela console admin.
// O `amount` do cliente é ignorado: o servidor recalcula sozinho (anti-fraude).
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentNotifyPayload {
    #[validate(length(min = 1, message = "Le slug de la demande est requis."))]
    pub demand_slug: String,

    #[serde(default)]
    pub amount: Decimal,

    pub payment_canal: PaymentCanal,

    // Requis sauf pour CASH
    pub phone_number: Option<String>,

    // Requis uniquement pour CASH
    pub payment_place: Option<String>,
}

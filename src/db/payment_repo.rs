// src/db/payment_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::payment::{Payment, PaymentCanal},
};

#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_demand(&self, demand_id: Uuid) -> Result<Option<Payment>, AppError> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, demand_id, amount, canal, phone_number, payment_place, date
            FROM payments
            WHERE demand_id = $1
            "#,
        )
        .bind(demand_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(payment)
    }

    // UNIQUE(demand_id) garante um pagamento por demande.
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        demand_id: Uuid,
        amount: Decimal,
        canal: PaymentCanal,
        phone_number: Option<&str>,
        payment_place: Option<&str>,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (demand_id, amount, canal, phone_number, payment_place)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, demand_id, amount, canal, phone_number, payment_place, date
            "#,
        )
        .bind(demand_id)
        .bind(amount)
        .bind(canal)
        .bind(phone_number)
        .bind(payment_place)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::Conflict(
                        "Un paiement a déjà été notifié pour cette demande.".to_string(),
                    );
                }
            }
            e.into()
        })?;
        Ok(payment)
    }
}

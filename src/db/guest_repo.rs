// src/db/guest_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::demand::{DemandStatus, Guest},
};

// Linha de ticket: o convidado mais o statut da demande dona.
#[derive(Debug, sqlx::FromRow)]
pub struct TicketRow {
    pub id: Uuid,
    pub demand_id: Uuid,
    pub slug: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub age: i32,
    pub is_main_guest: bool,
    pub state: bool,
    pub demand_status: DemandStatus,
}

impl TicketRow {
    pub fn into_guest(self) -> Guest {
        Guest {
            id: self.id,
            demand_id: self.demand_id,
            slug: self.slug,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone_number: self.phone_number,
            age: self.age,
            is_main_guest: self.is_main_guest,
            state: self.state,
        }
    }
}

#[derive(Clone)]
pub struct GuestRepository {
    pool: PgPool,
}

impl GuestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_ticket(&self, slug: &str) -> Result<Option<TicketRow>, AppError> {
        let row = sqlx::query_as::<_, TicketRow>(
            r#"
            SELECT g.id, g.demand_id, g.slug, g.first_name, g.last_name,
                   g.email, g.phone_number, g.age, g.is_main_guest, g.state,
                   d.status AS demand_status
            FROM guests g
            JOIN demands d ON d.id = g.demand_id
            WHERE g.slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    // Marcação atômica: só vence quem encontrar state = FALSE. Quem chegar
    // depois recebe 0 linhas afetadas e o ticket conta como já utilizado.
    pub async fn mark_used<'e, E>(&self, executor: E, guest_id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE guests SET state = TRUE WHERE id = $1 AND state = FALSE",
        )
        .bind(guest_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

// src/db/demand_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::demand::{Demand, DemandStatsEntry, DemandStatus, DemandType, Guest, TableItemRow},
};

#[derive(Clone)]
pub struct DemandRepository {
    pool: PgPool,
}

impl DemandRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // --- Leituras ---

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Demand>, AppError> {
        let demand = sqlx::query_as::<_, Demand>(
            r#"
            SELECT id, slug, event_id, status, type, created_at
            FROM demands
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(demand)
    }

    // Filtros opcionais: NULL significa "todos" (mesma semântica do portal).
    pub async fn list_by_event(
        &self,
        event_id: Uuid,
        status: Option<DemandStatus>,
        demand_type: Option<DemandType>,
    ) -> Result<Vec<Demand>, AppError> {
        let demands = sqlx::query_as::<_, Demand>(
            r#"
            SELECT id, slug, event_id, status, type, created_at
            FROM demands
            WHERE event_id = $1
              AND ($2::demand_status IS NULL OR status = $2)
              AND ($3::demand_type IS NULL OR type = $3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(event_id)
        .bind(status)
        .bind(demand_type)
        .fetch_all(&self.pool)
        .await?;
        Ok(demands)
    }

    pub async fn guests_for_demand(&self, demand_id: Uuid) -> Result<Vec<Guest>, AppError> {
        let guests = sqlx::query_as::<_, Guest>(
            r#"
            SELECT id, demand_id, slug, first_name, last_name, email,
                   phone_number, age, is_main_guest, state
            FROM guests
            WHERE demand_id = $1
            ORDER BY is_main_guest DESC, last_name ASC
            "#,
        )
        .bind(demand_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(guests)
    }

    pub async fn guests_for_demands(&self, demand_ids: &[Uuid]) -> Result<Vec<Guest>, AppError> {
        let guests = sqlx::query_as::<_, Guest>(
            r#"
            SELECT id, demand_id, slug, first_name, last_name, email,
                   phone_number, age, is_main_guest, state
            FROM guests
            WHERE demand_id = ANY($1)
            ORDER BY is_main_guest DESC, last_name ASC
            "#,
        )
        .bind(demand_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(guests)
    }

    pub async fn table_items_for_demand(
        &self,
        demand_id: Uuid,
    ) -> Result<Vec<TableItemRow>, AppError> {
        let items = sqlx::query_as::<_, TableItemRow>(
            r#"
            SELECT dt.id, dt.quantity,
                   t.id AS table_id, t.name AS table_name,
                   t.amount AS table_amount, t.capacity AS table_capacity
            FROM demand_tables dt
            JOIN event_tables t ON t.id = dt.table_id
            WHERE dt.demand_id = $1
            ORDER BY t.name ASC
            "#,
        )
        .bind(demand_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    // Agrupamento por statut; statuts sem demande não aparecem no resultado.
    pub async fn stats_by_event(&self, event_id: Uuid) -> Result<Vec<DemandStatsEntry>, AppError> {
        let stats = sqlx::query_as::<_, DemandStatsEntry>(
            r#"
            SELECT d.status AS status,
                   COUNT(DISTINCT d.id) AS total_demands,
                   COUNT(g.id) AS total_participants
            FROM demands d
            LEFT JOIN guests g ON g.demand_id = d.id
            WHERE d.event_id = $1
            GROUP BY d.status
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(stats)
    }

    // --- Escritas ---

    pub async fn insert_demand<'e, E>(
        &self,
        executor: E,
        slug: &str,
        event_id: Uuid,
        demand_type: DemandType,
    ) -> Result<Demand, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let demand = sqlx::query_as::<_, Demand>(
            r#"
            INSERT INTO demands (slug, event_id, type)
            VALUES ($1, $2, $3)
            RETURNING id, slug, event_id, status, type, created_at
            "#,
        )
        .bind(slug)
        .bind(event_id)
        .bind(demand_type)
        .fetch_one(executor)
        .await?;
        Ok(demand)
    }

    pub async fn insert_guest<'e, E>(
        &self,
        executor: E,
        demand_id: Uuid,
        slug: &str,
        first_name: &str,
        last_name: &str,
        email: &str,
        phone_number: &str,
        age: i32,
        is_main_guest: bool,
    ) -> Result<Guest, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let guest = sqlx::query_as::<_, Guest>(
            r#"
            INSERT INTO guests
                (demand_id, slug, first_name, last_name, email, phone_number,
                 age, is_main_guest)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, demand_id, slug, first_name, last_name, email,
                      phone_number, age, is_main_guest, state
            "#,
        )
        .bind(demand_id)
        .bind(slug)
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(phone_number)
        .bind(age)
        .bind(is_main_guest)
        .fetch_one(executor)
        .await?;
        Ok(guest)
    }

    pub async fn insert_table_item<'e, E>(
        &self,
        executor: E,
        demand_id: Uuid,
        table_id: Uuid,
        quantity: i32,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO demand_tables (demand_id, table_id, quantity)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(demand_id)
        .bind(table_id)
        .bind(quantity)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        demand_id: Uuid,
        status: DemandStatus,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("UPDATE demands SET status = $2 WHERE id = $1")
            .bind(demand_id)
            .bind(status)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_by_slug(&self, slug: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM demands WHERE slug = $1")
            .bind(slug)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

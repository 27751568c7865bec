// src/db/event_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::event::{Event, EventTable, Price},
};

#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // --- Leituras ---

    pub async fn list(&self) -> Result<Vec<Event>, AppError> {
        let events = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, slug, name, date, location, description, cover_image,
                   created_at, updated_at
            FROM events
            ORDER BY date ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>, AppError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, slug, name, date, location, description, cover_image,
                   created_at, updated_at
            FROM events
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(event)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, AppError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, slug, name, date, location, description, cover_image,
                   created_at, updated_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(event)
    }

    // Paliers de preço na ordem da lista de origem
    pub async fn prices_for_event(&self, event_id: Uuid) -> Result<Vec<Price>, AppError> {
        let prices = sqlx::query_as::<_, Price>(
            r#"
            SELECT id, event_id, name, amount, start_date, end_date, position
            FROM prices
            WHERE event_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(prices)
    }

    pub async fn prices_for_events(&self, event_ids: &[Uuid]) -> Result<Vec<Price>, AppError> {
        let prices = sqlx::query_as::<_, Price>(
            r#"
            SELECT id, event_id, name, amount, start_date, end_date, position
            FROM prices
            WHERE event_id = ANY($1)
            ORDER BY event_id, position ASC
            "#,
        )
        .bind(event_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(prices)
    }

    pub async fn tables_for_event(&self, event_id: Uuid) -> Result<Vec<EventTable>, AppError> {
        let tables = sqlx::query_as::<_, EventTable>(
            r#"
            SELECT id, event_id, name, amount, capacity
            FROM event_tables
            WHERE event_id = $1
            ORDER BY name ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tables)
    }

    pub async fn tables_for_events(
        &self,
        event_ids: &[Uuid],
    ) -> Result<Vec<EventTable>, AppError> {
        let tables = sqlx::query_as::<_, EventTable>(
            r#"
            SELECT id, event_id, name, amount, capacity
            FROM event_tables
            WHERE event_id = ANY($1)
            ORDER BY event_id, name ASC
            "#,
        )
        .bind(event_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(tables)
    }

    // --- Escritas (sempre dentro da transação do serviço) ---

    pub async fn insert_event<'e, E>(
        &self,
        executor: E,
        slug: &str,
        name: &str,
        date: NaiveDate,
        location: &str,
        description: Option<&str>,
        cover_image: Option<&str>,
    ) -> Result<Event, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (slug, name, date, location, description, cover_image)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, slug, name, date, location, description, cover_image,
                      created_at, updated_at
            "#,
        )
        .bind(slug)
        .bind(name)
        .bind(date)
        .bind(location)
        .bind(description)
        .bind(cover_image)
        .fetch_one(executor)
        .await?;
        Ok(event)
    }

    pub async fn update_event<'e, E>(
        &self,
        executor: E,
        event_id: Uuid,
        name: &str,
        date: NaiveDate,
        location: &str,
        description: Option<&str>,
        cover_image: Option<&str>,
    ) -> Result<Event, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let event = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET name = $2, date = $3, location = $4, description = $5,
                cover_image = $6, updated_at = now()
            WHERE id = $1
            RETURNING id, slug, name, date, location, description, cover_image,
                      created_at, updated_at
            "#,
        )
        .bind(event_id)
        .bind(name)
        .bind(date)
        .bind(location)
        .bind(description)
        .bind(cover_image)
        .fetch_one(executor)
        .await?;
        Ok(event)
    }

    pub async fn insert_price<'e, E>(
        &self,
        executor: E,
        event_id: Uuid,
        name: &str,
        amount: Decimal,
        start_date: NaiveDate,
        end_date: NaiveDate,
        position: i32,
    ) -> Result<Price, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let price = sqlx::query_as::<_, Price>(
            r#"
            INSERT INTO prices (event_id, name, amount, start_date, end_date, position)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, event_id, name, amount, start_date, end_date, position
            "#,
        )
        .bind(event_id)
        .bind(name)
        .bind(amount)
        .bind(start_date)
        .bind(end_date)
        .bind(position)
        .fetch_one(executor)
        .await?;
        Ok(price)
    }

    pub async fn insert_table<'e, E>(
        &self,
        executor: E,
        event_id: Uuid,
        name: &str,
        amount: Decimal,
        capacity: i32,
    ) -> Result<EventTable, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let table = sqlx::query_as::<_, EventTable>(
            r#"
            INSERT INTO event_tables (event_id, name, amount, capacity)
            VALUES ($1, $2, $3, $4)
            RETURNING id, event_id, name, amount, capacity
            "#,
        )
        .bind(event_id)
        .bind(name)
        .bind(amount)
        .bind(capacity)
        .fetch_one(executor)
        .await?;
        Ok(table)
    }

    // A edição substitui paliers e tables por inteiro (delete + reinsert).
    pub async fn delete_prices<'e, E>(&self, executor: E, event_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM prices WHERE event_id = $1")
            .bind(event_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn delete_tables<'e, E>(&self, executor: E, event_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM event_tables WHERE event_id = $1")
            .bind(event_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn delete_by_slug(&self, slug: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM events WHERE slug = $1")
            .bind(slug)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

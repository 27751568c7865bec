// src/config.rs

use anyhow::Context;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{
        DemandRepository, EventRepository, GuestRepository, PaymentRepository, UserRepository,
    },
    services::{
        auth::AuthService, demand_service::DemandService, event_service::EventService,
        guest_service::GuestService, payment_service::PaymentService,
    },
};

// Variável obrigatória: a ausência vira um Err com o nome da variável,
// propagado até o main (que aí sim decide abortar).
fn required_env(name: &str) -> anyhow::Result<String> {
    env::var(name).with_context(|| format!("{name} deve ser definida"))
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub public_base_url: String,
    pub upload_dir: String,
    pub auth_service: AuthService,
    pub event_service: EventService,
    pub demand_service: DemandService,
    pub payment_service: PaymentService,
    pub guest_service: GuestService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = required_env("DATABASE_URL")?;
        let jwt_secret = required_env("JWT_SECRET")?;
        let public_base_url =
            env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        tokio::fs::create_dir_all(&upload_dir).await?;

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let event_repo = EventRepository::new(db_pool.clone());
        let demand_repo = DemandRepository::new(db_pool.clone());
        let payment_repo = PaymentRepository::new(db_pool.clone());
        let guest_repo = GuestRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, jwt_secret);
        let event_service = EventService::new(event_repo.clone(), db_pool.clone());
        let demand_service = DemandService::new(
            demand_repo.clone(),
            event_repo.clone(),
            payment_repo.clone(),
            db_pool.clone(),
        );
        let payment_service =
            PaymentService::new(payment_repo, demand_repo, event_repo, db_pool.clone());
        let guest_service =
            GuestService::new(guest_repo, db_pool.clone(), public_base_url.clone());

        Ok(Self {
            db_pool,
            public_base_url,
            upload_dir,
            auth_service,
            event_service,
            demand_service,
            payment_service,
            guest_service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variavel_ausente_vira_err_com_o_nome() {
        let err = required_env("BILLETTERIE_VAR_INEXISTENTE").unwrap_err();
        assert!(err.to_string().contains("BILLETTERIE_VAR_INEXISTENTE"));
    }
}

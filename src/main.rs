//src/main.rs

use axum::{
    Json, Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Primeira subida: semeia o admin a partir de ADMIN_EMAIL/ADMIN_PASSWORD
    app_state
        .auth_service
        .ensure_admin_user()
        .await
        .expect("Falha ao semear o usuário administrador.");

    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    // Eventos e demandes misturam leitura pública e escrita protegida no
    // mesmo path; a proteção fica no extrator RequireRole de cada handler.
    let event_routes = Router::new()
        .route(
            "/",
            get(handlers::events::list).post(handlers::events::create),
        )
        .route(
            "/{slug}",
            get(handlers::events::get_by_slug)
                .put(handlers::events::update)
                .delete(handlers::events::delete),
        );

    let demand_routes = Router::new()
        .route("/", post(handlers::demands::create))
        .route(
            "/{slug}",
            get(handlers::demands::get_by_slug).delete(handlers::demands::delete),
        )
        .route("/{slug}/status", axum::routing::patch(handlers::demands::update_status))
        .route("/by-event/{slug}", get(handlers::demands::list_by_event))
        .route("/stats/{slug}", get(handlers::demands::stats_by_event));

    let payment_routes = Router::new().route("/notify", post(handlers::payments::notify));

    // Subárvores 100% protegidas passam pelo auth_guard.
    let guest_routes = Router::new()
        .route("/{slug}", post(handlers::guests::validate))
        .route("/{slug}/qr", get(handlers::guests::qr_code))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let user_routes = Router::new()
        .route(
            "/",
            get(handlers::users::list).post(handlers::users::create),
        )
        .route("/{id}", axum::routing::delete(handlers::users::delete))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let file_routes = Router::new()
        .route("/", post(handlers::files::upload))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let upload_dir = app_state.upload_dir.clone();

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route(
            "/api/docs/openapi.json",
            get(|| async { Json(docs::ApiDoc::openapi()) }),
        )
        .nest("/api/auth", auth_routes)
        .nest("/api/event", event_routes)
        .nest("/api/demand", demand_routes)
        .nest("/api/payment", payment_routes)
        .nest("/api/guest", guest_routes)
        .nest("/api/user", user_routes)
        .nest("/api/file-upload", file_routes)
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}

// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_SECURITY: &str = "SECURITY";

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    // ADMIN ou SECURITY; o gating de rota espelha o que o portal faz
    pub role: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "L'e-mail fourni est invalide."))]
    pub email: String,
    #[validate(length(min = 6, message = "Le mot de passe doit contenir au moins 6 caractères."))]
    pub password: String,
}

// Dados para criação de usuário (somente ADMIN)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserPayload {
    #[validate(email(message = "L'e-mail fourni est invalide."))]
    pub email: String,
    #[validate(length(min = 6, message = "Le mot de passe doit contenir au moins 6 caractères."))]
    pub password: String,
    #[validate(length(min = 1, message = "Le rôle est requis."))]
    pub role: String,
}

// Corpo de `data` na resposta de login, como o portal espera
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginData {
    pub access_token: String,
    pub role: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,   // ID do usuário
    pub role: String,
    pub exp: usize,  // quando o token expira
    pub iat: usize,  // quando o token foi criado
}

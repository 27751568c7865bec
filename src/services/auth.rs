// src/services/auth.rs

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, CreateUserPayload, LoginData, ROLE_ADMIN, ROLE_SECURITY, User},
};

const TOKEN_VALIDITY_DAYS: i64 = 7;

#[derive(Clone)]
pub struct AuthService {
    repo: UserRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(repo: UserRepository, jwt_secret: String) -> Self {
        Self { repo, jwt_secret }
    }

    // Mesma mensagem para e-mail desconhecido e senha errada: não vazamos
    // quais e-mails existem.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginData, AppError> {
        let user = self
            .repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        // bcrypt é caro de propósito; fora do executor async.
        let password = password.to_string();
        let hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(e.into()))??;

        if !matches {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.create_token(&user)?;
        tracing::info!("🔐 Connexion de {} ({})", user.email, user.role);
        Ok(LoginData {
            access_token: token,
            role: user.role,
        })
    }

    fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            role: user.role.clone(),
            iat: now.timestamp() as usize,
            exp: (now + chrono::Duration::days(TOKEN_VALIDITY_DAYS)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;
        Ok(token)
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;
        Ok(data.claims)
    }

    // Token válido mas usuário apagado entre a emissão e agora = recusado.
    pub async fn authenticate(&self, token: &str) -> Result<User, AppError> {
        let claims = self.validate_token(token)?;
        self.repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    pub async fn create_user(&self, payload: &CreateUserPayload) -> Result<User, AppError> {
        if payload.role != ROLE_ADMIN && payload.role != ROLE_SECURITY {
            return Err(AppError::BusinessRule(
                "Le rôle doit être ADMIN ou SECURITY.".to_string(),
            ));
        }

        let password = payload.password.clone();
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(&password, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| AppError::Internal(e.into()))??;

        let user = self.repo.create_user(&payload.email, &hash, &payload.role).await?;
        tracing::info!("👤 Compte {} créé ({})", user.email, user.role);
        Ok(user)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.repo.list().await
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<(), AppError> {
        let deleted = self.repo.delete(id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound("Utilisateur introuvable.".to_string()));
        }
        Ok(())
    }

    // Bootstrap: com a tabela vazia, semeia o admin a partir do ambiente.
    // Sem isso ninguém conseguiria entrar na console na primeira subida.
    pub async fn ensure_admin_user(&self) -> Result<(), AppError> {
        if self.repo.count().await? > 0 {
            return Ok(());
        }
        let (Ok(email), Ok(password)) = (
            std::env::var("ADMIN_EMAIL"),
            std::env::var("ADMIN_PASSWORD"),
        ) else {
            tracing::warn!(
                "⚠️ Aucun utilisateur en base et ADMIN_EMAIL/ADMIN_PASSWORD absents; la console restera inaccessible"
            );
            return Ok(());
        };

        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(&password, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| AppError::Internal(e.into()))??;
        self.repo.create_user(&email, &hash, ROLE_ADMIN).await?;
        tracing::info!("🌱 Administrateur initial {} créé", email);
        Ok(())
    }
}

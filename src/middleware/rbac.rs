// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{ROLE_ADMIN, ROLE_SECURITY, User},
};

/// 1. O Trait que define um requisito de rôle
pub trait RoleDef: Send + Sync + 'static {
    fn allowed() -> &'static [&'static str];
}

// A decisão em si é uma função pura, testável sem HTTP.
pub fn role_allowed(role: &str, allowed: &[&str]) -> bool {
    allowed.contains(&role)
}

/// 2. O Extractor (Guardião)
pub struct RequireRole<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts
//
// Algumas rotas misturam método público e método protegido no mesmo path;
// nesses casos não há auth_guard na frente, então o guardião sabe
// autenticar sozinho a partir do header Authorization.

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // A. Se o auth_guard já rodou, o usuário está nos extensions.
        let user = match parts.extensions.get::<User>() {
            Some(user) => user.clone(),
            None => {
                let app_state = AppState::from_ref(state);
                let token = parts
                    .headers
                    .get("Authorization")
                    .and_then(|value| value.to_str().ok())
                    .and_then(|header| header.strip_prefix("Bearer "))
                    .ok_or(AppError::InvalidToken)?;
                let user = app_state.auth_service.authenticate(token).await?;
                parts.extensions.insert(user.clone());
                user
            }
        };

        // B. Verifica o rôle
        if !role_allowed(&user.role, T::allowed()) {
            return Err(AppError::Forbidden(
                "Vous n'avez pas les droits nécessaires pour cette action.".to_string(),
            ));
        }

        Ok(RequireRole(PhantomData))
    }
}

// ---
// DEFINIÇÃO DOS REQUISITOS (TIPOS)
// ---

// Console admin: gestão de eventos, demandes, comptes.
pub struct AdminOnly;
impl RoleDef for AdminOnly {
    fn allowed() -> &'static [&'static str] {
        &[ROLE_ADMIN]
    }
}

// Portaria: validação de tickets (o admin também pode).
pub struct DoorAccess;
impl RoleDef for DoorAccess {
    fn allowed() -> &'static [&'static str] {
        &[ROLE_ADMIN, ROLE_SECURITY]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn papeis_sao_comparados_literalmente() {
        assert!(role_allowed("ADMIN", AdminOnly::allowed()));
        assert!(!role_allowed("SECURITY", AdminOnly::allowed()));
        assert!(role_allowed("SECURITY", DoorAccess::allowed()));
        assert!(role_allowed("ADMIN", DoorAccess::allowed()));
        // Sem normalização de caixa
        assert!(!role_allowed("admin", AdminOnly::allowed()));
        assert!(!role_allowed("", DoorAccess::allowed()));
    }
}

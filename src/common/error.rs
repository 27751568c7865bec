use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// As mensagens exibidas ao usuário final ficam em francês (idioma do portal);
// o Display serve para os logs.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("erro de validação")]
    Validation(#[from] validator::ValidationErrors),

    // Regra de negócio violada (tarifas, transições de statut, canal de
    // pagamento...). A mensagem já vem pronta para exibição.
    #[error("regra de negócio violada: {0}")]
    BusinessRule(String),

    #[error("recurso não encontrado: {0}")]
    NotFound(String),

    #[error("conflito: {0}")]
    Conflict(String),

    #[error("credenciais inválidas")]
    InvalidCredentials,

    #[error("token inválido")]
    InvalidToken,

    #[error("acesso negado: {0}")]
    Forbidden(String),

    // Variante para erros de banco de dados
    #[error("erro de banco de dados")]
    Database(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("erro interno do servidor")]
    Internal(#[from] anyhow::Error),

    #[error("erro de Bcrypt: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("erro de JWT: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo por campo.
            AppError::Validation(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "success": false,
                    "error": {
                        "message": "Un ou plusieurs champs sont invalides.",
                        "details": details,
                    }
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::BusinessRule(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "E-mail ou mot de passe invalide.".to_string(),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Jeton d'authentification invalide ou absent.".to_string(),
            ),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),

            // Todos os outros (Database, Internal, Bcrypt, Jwt) viram 500.
            // O `tracing` loga a mensagem detalhada que o `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro interno do servidor: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Une erreur inattendue s'est produite.".to_string(),
                )
            }
        };

        // Resposta padrão: o portal lê `error.message` para exibir.
        let body = Json(json!({
            "success": false,
            "error": { "message": error_message }
        }));
        (status, body).into_response()
    }
}

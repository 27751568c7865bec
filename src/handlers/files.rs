// src/handlers/files.rs

use axum::{Json, extract::Multipart, extract::State, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        response::{self, ApiResponse},
    },
    config::AppState,
    middleware::rbac::{AdminOnly, RequireRole},
};

// O portal guarda os dois: `url` para exibir, `publicId` para referenciar.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadData {
    pub url: String,
    pub public_id: String,
}

#[utoipa::path(
    post,
    path = "/api/file-upload",
    tag = "Files",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Fichier enregistré", body = UploadData),
        (status = 422, description = "Champ 'file' absent")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload(
    State(app_state): State<AppState>,
    _role: RequireRole<AdminOnly>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<UploadData>>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("multipart: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        // A extensão original é preservada; o nome não (anti-colisão).
        let extension = field
            .file_name()
            .and_then(|n| n.rsplit_once('.').map(|(_, ext)| ext.to_lowercase()));
        let public_id = match extension {
            Some(ext) => format!("{}.{}", Uuid::new_v4().simple(), ext),
            None => Uuid::new_v4().simple().to_string(),
        };

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("multipart: {e}")))?;

        let dest = std::path::Path::new(&app_state.upload_dir).join(&public_id);
        tokio::fs::write(&dest, &bytes)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("écriture du fichier: {e}")))?;

        let url = format!(
            "{}/uploads/{}",
            app_state.public_base_url.trim_end_matches('/'),
            public_id
        );
        tracing::info!("🖼️ Fichier {} enregistré ({} octets)", public_id, bytes.len());
        return Ok(response::created(
            UploadData { url, public_id },
            "Fichier enregistré.",
        ));
    }

    Err(AppError::BusinessRule(
        "Le champ 'file' est requis.".to_string(),
    ))
}

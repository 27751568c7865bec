use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;

// Envelope uniforme consumido pelo portal: { success, data, message }.
// Os erros seguem outro formato (ver common/error.rs).
#[derive(Debug, Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

pub fn ok<T>(data: T, message: impl Into<String>) -> (StatusCode, Json<ApiResponse<T>>)
where
    T: Serialize,
{
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }),
    )
}

pub fn created<T>(data: T, message: impl Into<String>) -> (StatusCode, Json<ApiResponse<T>>)
where
    T: Serialize,
{
    (
        StatusCode::CREATED,
        Json(ApiResponse {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }),
    )
}

// Sucesso sem payload (deleções, patchs de statut...).
pub fn no_data(message: impl Into<String>) -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data: None,
            message: Some(message.into()),
        }),
    )
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Erros internos da aplicação (camada de serviço / repositório)
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Cabeçalho x-store-id ausente")]
    MissingStoreHeader,

    #[error("Cabeçalho x-store-id inválido")]
    InvalidStoreHeader,

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

// O erro que efetivamente vira resposta HTTP
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
}

impl AppError {
    pub fn to_api_error(&self) -> ApiError {
        let (status, message) = match self {
            AppError::MissingStoreHeader => {
                (StatusCode::BAD_REQUEST, "O cabeçalho x-store-id é obrigatório.")
            }
            AppError::InvalidStoreHeader => (
                StatusCode::BAD_REQUEST,
                "Cabeçalho x-store-id inválido (não é um UUID).",
            ),
            // Banco e internos viram 500; o detalhe vai só para o log.
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        ApiError {
            status,
            error: message.to_string(),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        err.to_api_error()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.error }));
        (self.status, body).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error().into_response()
    }
}

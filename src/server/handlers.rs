use super::types::{ChatRequest, ChatResponse, ErrorResponse, HppRequest, ResultResponse};
use crate::{
    llm::{ModelClient, Part},
    prompts,
};
use axum::{
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Multipart field carrying the receipt image.
pub const OCR_FILE_FIELD: &str = "file";

const GENERATION_FAILED: &str = "Failed to generate a response";

pub type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn ModelClient>,
}

impl AppState {
    pub fn new(model: Arc<dyn ModelClient>) -> Self {
        Self { model }
    }

    async fn generate(&self, route: &str, parts: Vec<Part>) -> Result<String, ApiError> {
        match self.model.generate(parts).await {
            Ok(text) => {
                info!(route, reply_len = text.len(), "Model call succeeded");
                Ok(text.trim().to_string())
            }
            Err(e) => {
                error!(route, "Model call failed: {}", e);
                Err(api_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    GENERATION_FAILED,
                ))
            }
        }
    }
}

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn multipart_error(e: MultipartError) -> ApiError {
    warn!("Failed to read multipart body: {}", e);
    api_error(e.status(), format!("Invalid multipart body: {}", e.body_text()))
}

pub async fn ocr(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ResultResponse>, ApiError> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(OCR_FILE_FIELD) {
            continue;
        }

        let media_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        if !prompts::is_image_media_type(&media_type) {
            warn!(media_type = %media_type, "Rejected non-image upload");
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                "Only image files are accepted",
            ));
        }

        let data = field.bytes().await.map_err(multipart_error)?;
        upload = Some((media_type, data));
        break;
    }

    let Some((media_type, data)) = upload else {
        return Err(api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("Missing multipart field: {}", OCR_FILE_FIELD),
        ));
    };

    info!(media_type = %media_type, size = data.len(), "Received OCR request");

    let result = state
        .generate("/ocr", prompts::ocr_parts(media_type, data.to_vec()))
        .await?;
    Ok(Json(ResultResponse { result }))
}

pub async fn chatbot(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    info!(message_len = request.message.len(), "Received chat request");

    let reply = state
        .generate("/chatbot", prompts::chat_parts(request.message))
        .await?;
    Ok(Json(ChatResponse { reply }))
}

pub async fn hpp(
    State(state): State<AppState>,
    Json(request): Json<HppRequest>,
) -> Result<Json<ResultResponse>, ApiError> {
    info!(input_len = request.user_input.len(), "Received HPP request");

    let result = state
        .generate("/hpp", prompts::hpp_parts(request.user_input))
        .await?;
    Ok(Json(ResultResponse { result }))
}

pub async fn not_found() -> ApiError {
    api_error(StatusCode::NOT_FOUND, "Not found")
}

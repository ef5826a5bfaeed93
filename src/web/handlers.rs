use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, Json},
};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use super::responses::{
    ApiError, MessageResponse, ALREADY_TRACKING, MISSING_FIELDS, RETRIEVAL_FAILED, TRACKING_FAILED,
};
use super::AppState;
use crate::models::SHORT_TITLE_CHARS;
use crate::product_manager::TrackOutcome;
use crate::utils::truncate_chars;
use crate::AppError;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TrackRequest {
    #[validate(url)]
    pub product_url: Option<String>,
    #[validate(email)]
    pub user_email: Option<String>,
}

impl TrackRequest {
    pub fn new(product_url: &str, user_email: &str) -> Self {
        Self {
            product_url: Some(product_url.to_string()),
            user_email: Some(user_email.to_string()),
        }
    }

    /// Both fields, trimmed, when present and non-blank.
    fn fields(&self) -> Option<(&str, &str)> {
        let url = self.product_url.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let email = self.user_email.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        Some((url, email))
    }
}

pub async fn index_page() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now(),
        "version": env!("CARGO_PKG_VERSION"),
        "service": "dealrelay"
    }))
}

pub async fn track_product(
    State(state): State<AppState>,
    payload: Result<Json<TrackRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!("Rejected track body: {}", rejection);
            return Err(ApiError::bad_request(MISSING_FIELDS));
        }
    };

    let Some((product_url, user_email)) = request.fields() else {
        return Err(ApiError::bad_request(MISSING_FIELDS));
    };

    TrackRequest::new(product_url, user_email)
        .validate()
        .map_err(|e| ApiError::bad_request(validation_message(&e)))?;
    if !is_http_url(product_url) {
        return Err(ApiError::bad_request("Invalid product_url."));
    }

    tracing::info!("Received tracking request for {} from {}", product_url, user_email);

    match state.product_manager.track(product_url, user_email).await {
        Ok(TrackOutcome::Created { product }) => {
            let message = format!(
                "Success! Tracking has been set up for \"{}...\"",
                truncate_chars(&product.title, SHORT_TITLE_CHARS)
            );
            Ok((StatusCode::CREATED, Json(MessageResponse::new(message))))
        }
        Ok(TrackOutcome::AlreadyTracking { .. }) => {
            Ok((StatusCode::OK, Json(MessageResponse::new(ALREADY_TRACKING))))
        }
        Err(e @ (AppError::Http(_) | AppError::Extraction(_))) => {
            tracing::warn!("Could not read product page {}: {}", product_url, e);
            Err(ApiError::bad_request(RETRIEVAL_FAILED))
        }
        Err(e) => {
            tracing::error!("Failed to create tracking request for {}: {}", product_url, e);
            Err(ApiError::internal(TRACKING_FAILED))
        }
    }
}

fn is_http_url(raw: &str) -> bool {
    url::Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}

fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<String> = errors.field_errors().keys().map(|field| field.to_string()).collect();
    fields.sort();
    format!("Invalid {}.", fields.join(", "))
}

//! Quote generation and delivery routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use cotiza_core::QuoteError;
use cotiza_core::quote::{CreateQuoteInput, GeneratedQuote, StoredQuote};

use crate::AppState;

/// Creates the quote routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/quotes", get(list_quotes))
        .route("/quotes/generate", post(generate_quote))
        .route("/quotes/preview", post(preview_quote))
        .route("/quotes/next-number", get(next_number))
        .route("/quotes/send-email", post(send_email))
        .route(
            "/quotes/{document_number}",
            get(get_summary).delete(delete_quote),
        )
        .route("/quotes/{document_number}/data", get(get_data))
        .route("/quotes/{document_number}/exists", get(quote_exists))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for sending a quote by email.
#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    /// Recipient email address.
    pub to_email: String,
    /// Document number of the stored quote.
    pub document_number: String,
    /// Whether to attach the rendered PDF.
    #[serde(default = "default_attach_pdf")]
    pub attach_pdf: bool,
}

const fn default_attach_pdf() -> bool {
    true
}

/// Summary of a stored quote for list views.
#[derive(Debug, Serialize)]
pub struct QuoteSummaryResponse {
    /// Document number.
    pub document_number: String,
    /// Client name.
    pub client_name: Option<String>,
    /// Currency code.
    pub currency: String,
    /// Grand total (display only; totals are recomputed when they matter).
    pub total: String,
    /// Number of line items.
    pub item_count: i32,
    /// First item description, truncated.
    pub first_item_description: Option<String>,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
}

impl From<StoredQuote> for QuoteSummaryResponse {
    fn from(stored: StoredQuote) -> Self {
        Self {
            document_number: stored.document_number,
            client_name: stored.client_name,
            currency: stored.currency.to_string(),
            total: stored.total.to_string(),
            item_count: stored.item_count,
            first_item_description: stored.first_item_description,
            created_at: stored.created_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn error_response(e: &QuoteError) -> Response {
    let status = StatusCode::from_u16(e.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() {
        error!(error = %e, code = e.error_code(), "Quote operation failed");
    }

    (
        status,
        Json(json!({
            "error": e.error_code(),
            "message": e.to_string()
        })),
    )
        .into_response()
}

fn pdf_response(generated: GeneratedQuote, disposition: &str) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!(
                    "{disposition}; filename=\"COT-{}.pdf\"",
                    generated.quote.document_number
                ),
            ),
        ],
        generated.pdf,
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST `/quotes/generate` - Price, render, and persist a quote.
async fn generate_quote(
    State(state): State<AppState>,
    Json(payload): Json<CreateQuoteInput>,
) -> impl IntoResponse {
    match state.quotes.generate(&payload).await {
        Ok(generated) => pdf_response(generated, "attachment"),
        Err(e) => error_response(&e),
    }
}

/// POST `/quotes/preview` - Price and render without persisting.
async fn preview_quote(
    State(state): State<AppState>,
    Json(payload): Json<CreateQuoteInput>,
) -> impl IntoResponse {
    match state.quotes.preview(&payload).await {
        Ok(generated) => pdf_response(generated, "inline"),
        Err(e) => error_response(&e),
    }
}

/// GET `/quotes` - List stored quote summaries, most recent first.
async fn list_quotes(State(state): State<AppState>) -> impl IntoResponse {
    match state.quotes.list().await {
        Ok(quotes) => {
            let items: Vec<QuoteSummaryResponse> =
                quotes.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(json!({ "quotes": items }))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// GET `/quotes/next-number` - Peek at the next document number.
///
/// Purely informational: the number is not reserved and a concurrent
/// generate may take it first.
async fn next_number(State(state): State<AppState>) -> impl IntoResponse {
    match state.quotes.next_number().await {
        Ok(number) => {
            (StatusCode::OK, Json(json!({ "document_number": number }))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// GET `/quotes/{document_number}` - Stored summary for one quote.
async fn get_summary(
    State(state): State<AppState>,
    Path(document_number): Path<String>,
) -> impl IntoResponse {
    match state.quotes.summary(&document_number).await {
        Ok(Some(stored)) => {
            let summary = QuoteSummaryResponse::from(stored);
            (StatusCode::OK, Json(json!({ "quote": summary }))).into_response()
        }
        Ok(None) => error_response(&QuoteError::NotFound(document_number)),
        Err(e) => error_response(&e),
    }
}

/// GET `/quotes/{document_number}/data` - The stored raw request.
async fn get_data(
    State(state): State<AppState>,
    Path(document_number): Path<String>,
) -> impl IntoResponse {
    match state.quotes.data(&document_number).await {
        Ok(Some(input)) => (StatusCode::OK, Json(input)).into_response(),
        Ok(None) => error_response(&QuoteError::NotFound(document_number)),
        Err(e) => error_response(&e),
    }
}

/// GET `/quotes/{document_number}/exists` - Existence check.
async fn quote_exists(
    State(state): State<AppState>,
    Path(document_number): Path<String>,
) -> impl IntoResponse {
    match state.quotes.exists(&document_number).await {
        Ok(exists) => (StatusCode::OK, Json(json!({ "exists": exists }))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// DELETE `/quotes/{document_number}` - Remove a stored quote.
async fn delete_quote(
    State(state): State<AppState>,
    Path(document_number): Path<String>,
) -> impl IntoResponse {
    match state.quotes.delete(&document_number).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => error_response(&QuoteError::NotFound(document_number)),
        Err(e) => error_response(&e),
    }
}

/// POST `/quotes/send-email` - Email a stored quote.
async fn send_email(
    State(state): State<AppState>,
    Json(payload): Json<SendEmailRequest>,
) -> impl IntoResponse {
    match state
        .quotes
        .send_email(&payload.to_email, &payload.document_number, payload.attach_pdf)
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "sent": true,
                "document_number": payload.document_number
            })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_send_email_request_defaults_attachment() {
        let request: SendEmailRequest = serde_json::from_value(json!({
            "to_email": "client@example.com",
            "document_number": "00001"
        }))
        .unwrap();
        assert!(request.attach_pdf);
    }

    #[test]
    fn test_summary_response_from_stored() {
        let now = chrono::Utc::now();
        let stored = StoredQuote {
            document_number: "00042".to_string(),
            request: json!({"items": []}),
            client_name: Some("ACME SAC".to_string()),
            currency: cotiza_shared::types::Currency::Usd,
            total: dec!(29.51),
            item_count: 2,
            first_item_description: Some("Gate valve".to_string()),
            created_at: now,
            updated_at: now,
        };

        let summary = QuoteSummaryResponse::from(stored);
        assert_eq!(summary.document_number, "00042");
        assert_eq!(summary.currency, "USD");
        assert_eq!(summary.total, "29.51");
    }

    #[test]
    fn test_error_response_shape() {
        let body = json!({
            "error": QuoteError::EmptyItemList.error_code(),
            "message": QuoteError::EmptyItemList.to_string()
        });
        assert_eq!(body["error"], "EMPTY_ITEM_LIST");
    }
}

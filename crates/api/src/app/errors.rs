use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use sabqcha_jobs::{DispatchError, LedgerError};
use sabqcha_lectures::StoreError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        StoreError::Storage(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg)
        }
    }
}

pub fn dispatch_error_to_response(err: DispatchError) -> axum::response::Response {
    match err {
        DispatchError::Identifier(e) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_identifier", e.to_string())
        }
        // NotFound after a claim conflict means the ledger broke its own
        // invariant; surface it loudly.
        DispatchError::Ledger(LedgerError::NotFound) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "ledger_inconsistent",
            "job record missing after claim conflict",
        ),
        DispatchError::Ledger(e) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "ledger_error", e.to_string())
        }
    }
}

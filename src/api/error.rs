use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error shape shared by every handler: a status code plus the JSON body.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn bad_request(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

pub fn not_found(message: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

pub fn internal_error(message: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_carry_the_expected_status() {
        assert_eq!(bad_request("x").0, StatusCode::BAD_REQUEST);
        assert_eq!(not_found("x").0, StatusCode::NOT_FOUND);
        assert_eq!(internal_error("x").0, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn body_is_a_bare_error_field() {
        let (_, Json(body)) = not_found("Station not found");
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value, serde_json::json!({ "error": "Station not found" }));
    }
}

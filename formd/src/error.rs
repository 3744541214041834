use axum::{
    Json,
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use form::{ErrorCode, ErrorResponse};

/// Why a form-backed request was turned away.
#[derive(Debug)]
pub enum FormRejection {
    /// Field report, unparsable body or broken schema.
    Report(ErrorResponse),
    /// The body could not be read at all (over the size limit, I/O error).
    Body(BytesRejection),
}

impl FormRejection {
    pub fn to_status_code(&self) -> StatusCode {
        match self {
            Self::Report(report) => match report.code {
                ErrorCode::Einvalid | ErrorCode::Ebadrequest => StatusCode::BAD_REQUEST,
                ErrorCode::Einternal => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Body(rejection) => rejection.status(),
        }
    }

    pub fn render_json(self) -> Response {
        let status = self.to_status_code();
        match self {
            Self::Report(report) => (
                status,
                Json(json!({
                    "message": report.message,
                    "fields": report.fields
                })),
            )
                .into_response(),
            Self::Body(rejection) => rejection.into_response(),
        }
    }
}

impl From<ErrorResponse> for FormRejection {
    fn from(e: ErrorResponse) -> Self {
        Self::Report(e)
    }
}

impl From<BytesRejection> for FormRejection {
    fn from(e: BytesRejection) -> Self {
        Self::Body(e)
    }
}

impl std::fmt::Display for FormRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Report(report) => std::fmt::Display::fmt(report, f),
            Self::Body(rejection) => std::fmt::Display::fmt(rejection, f),
        }
    }
}

impl std::error::Error for FormRejection {}

impl IntoResponse for FormRejection {
    fn into_response(self) -> Response {
        self.render_json()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use form::{FieldErrors, Violation};

    #[test]
    fn test_form_rejection_status_codes() {
        assert_eq!(
            FormRejection::from(ErrorResponse::invalid(FieldErrors::new())).to_status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            FormRejection::from(ErrorResponse::unparsable()).to_status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            FormRejection::from(ErrorResponse::invalid_schema()).to_status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_form_rejection_body() {
        let mut report = ErrorResponse::invalid(FieldErrors::new());
        report.add_field("name", Violation::Required);

        let response = FormRejection::from(report).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json,
            json!({"message": "Unvalid Form Data", "fields": {"name": "required"}})
        );
    }

    #[test]
    fn test_form_rejection_display() {
        let rejection = FormRejection::from(ErrorResponse::unparsable());
        assert_eq!(rejection.to_string(), "Unparsable Form Data");
    }
}

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::errors::AuthError;
use crate::domain::invitation::models::InvitationTokenFilter;
use crate::domain::invitation::models::Paging;

pub mod generate_token;
pub mod list_tokens;
pub mod login;
pub mod login_with_invitation;
pub mod register;
pub mod update_token;
pub mod validate_token;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }

    /// Success body for a listing, echoing the page and filter that produced it.
    pub fn page(
        status: StatusCode,
        data: T,
        paging: &Paging,
        filter: &InvitationTokenFilter,
    ) -> Self {
        let mut body = ApiResponseBody::new(status, data);
        body.paging = Some(PagingData {
            page: paging.page(),
            limit: paging.limit(),
        });
        body.filter = Some(FilterData {
            status: filter.status.map(|status| status.as_i64()),
        });
        ApiSuccess(status, Json(body))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Error response with a stable machine-readable key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    error_key: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error_key: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            error_key,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "ErrInvalidRequest", message)
    }

    pub fn too_many_requests() -> Self {
        Self::new(
            StatusCode::TOO_MANY_REQUESTS,
            "ErrTooManyRequests",
            "Too many requests, slow down",
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn error_key(&self) -> &'static str {
        self.error_key
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ApiResponseBody::new_error(
                self.status,
                self.message,
                self.error_key,
            )),
        )
            .into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let message = err.to_string();
        match err {
            AuthError::InvalidInput(_) => Self::invalid_request(message),
            AuthError::InvalidCredentials => {
                Self::new(StatusCode::UNAUTHORIZED, "ErrInvalidCredentials", message)
            }
            AuthError::EntityAlreadyExists(_) => {
                Self::new(StatusCode::CONFLICT, "ErrEntityExisted", message)
            }
            AuthError::RecordNotFound(_) => {
                Self::new(StatusCode::NOT_FOUND, "ErrRecordNotFound", message)
            }
            AuthError::TokenNotFound => {
                Self::new(StatusCode::NOT_FOUND, "ErrTokenNotFound", message)
            }
            AuthError::TokenExpired => Self::new(StatusCode::GONE, "ErrTokenExpired", message),
            AuthError::TokenAlreadyUsed => {
                Self::new(StatusCode::CONFLICT, "ErrTokenAlreadyUsed", message)
            }
            AuthError::InvalidSignature => {
                Self::new(StatusCode::UNAUTHORIZED, "ErrInvalidSignature", message)
            }
            AuthError::SessionExpired => {
                Self::new(StatusCode::UNAUTHORIZED, "ErrSessionExpired", message)
            }
            AuthError::Unauthorized(_) => {
                Self::new(StatusCode::UNAUTHORIZED, "ErrUnauthorized", message)
            }
            AuthError::Forbidden(_) => Self::new(StatusCode::FORBIDDEN, "ErrForbidden", message),
            AuthError::DatabaseError(_) => {
                tracing::error!(error = %message, "Account directory failure");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "ErrDB",
                    "Database operation failed",
                )
            }
            AuthError::StoreError(_) => {
                tracing::error!(error = %message, "Invitation store failure");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "ErrStore",
                    "Invitation store operation failed",
                )
            }
            AuthError::Timeout(_) => {
                tracing::error!(error = %message, "Backend deadline exceeded");
                Self::new(
                    StatusCode::GATEWAY_TIMEOUT,
                    "ErrTimeout",
                    "Backend did not answer in time",
                )
            }
            AuthError::Internal(_) => {
                tracing::error!(error = %message, "Internal failure");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "ErrInternal",
                    "Internal server error",
                )
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    paging: Option<PagingData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<FilterData>,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
            paging: None,
            filter: None,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String, error_key: &str) -> Self {
        Self::new(
            status_code,
            ApiErrorData {
                message,
                error_key: error_key.to_string(),
            },
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
    pub error_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagingData {
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterData {
    pub status: Option<i64>,
}

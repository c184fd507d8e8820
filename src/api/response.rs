//! JSON envelope shared by every endpoint:
//! `{"data": ..., "error": {"code", "message"} | null, "meta": ... | null}`.

use actix_web::http::StatusCode;
use actix_web::error::InternalError;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::scheduling::SchedulingError;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "shift_overlap")]
    pub code: String,
    #[schema(example = "conflict: shift window overlaps shift 1")]
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListMeta {
    #[schema(example = 2)]
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize, M: Serialize> {
    pub data: Option<T>,
    pub error: Option<ErrorBody>,
    pub meta: Option<M>,
}

pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::<T, ()> {
        data: Some(data),
        error: None,
        meta: None,
    })
}

pub fn created<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Created().json(ApiResponse::<T, ()> {
        data: Some(data),
        error: None,
        meta: None,
    })
}

pub fn list<T: Serialize>(items: Vec<T>) -> HttpResponse {
    let count = items.len();
    HttpResponse::Ok().json(ApiResponse {
        data: Some(items),
        error: None,
        meta: Some(ListMeta { count }),
    })
}

pub fn failure(status: StatusCode, code: &str, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse::<(), ()> {
        data: None,
        error: Some(ErrorBody {
            code: code.to_string(),
            message: message.into(),
        }),
        meta: None,
    })
}

/// An `actix_web::Error` that renders as an envelope.
pub fn reject(status: StatusCode, code: &str, message: impl Into<String>) -> actix_web::Error {
    let message = message.into();
    let response = failure(status, code, message.clone());
    InternalError::from_response(message, response).into()
}

impl ResponseError for SchedulingError {
    fn status_code(&self) -> StatusCode {
        match self {
            SchedulingError::Validation(_) => StatusCode::BAD_REQUEST,
            SchedulingError::NotFound(_) => StatusCode::NOT_FOUND,
            SchedulingError::Conflict(_) => StatusCode::CONFLICT,
            SchedulingError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            SchedulingError::Storage(e) => {
                error!(error = %e, "Storage failure");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        failure(self.status_code(), self.code(), message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::{ConflictKind, NotFoundKind};
    use crate::store::StoreError;
    use actix_web::body::to_bytes;

    async fn body_of(resp: HttpResponse) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn errors_map_to_statuses_and_codes() {
        let cases = [
            (
                SchedulingError::Validation("bad".into()),
                StatusCode::BAD_REQUEST,
                "validation_error",
            ),
            (
                SchedulingError::NotFound(NotFoundKind::Shift(1)),
                StatusCode::NOT_FOUND,
                "not_found",
            ),
            (
                SchedulingError::Conflict(ConflictKind::AlreadyClockedIn),
                StatusCode::CONFLICT,
                "already_clocked_in",
            ),
        ];

        for (err, status, code) in cases {
            let resp = err.error_response();
            assert_eq!(resp.status(), status);
            let body = body_of(resp).await;
            assert_eq!(body["error"]["code"], code);
            assert!(body["data"].is_null());
        }
    }

    #[actix_web::test]
    async fn storage_details_are_not_leaked() {
        let err = SchedulingError::Storage(StoreError::Backend("secret dsn".into()));
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_of(resp).await;
        assert_eq!(body["error"]["code"], "storage_error");
        assert!(!body["error"]["message"].as_str().unwrap().contains("secret"));
    }

    #[actix_web::test]
    async fn list_carries_count_meta() {
        let body = body_of(list(vec![1, 2, 3])).await;
        assert_eq!(body["meta"]["count"], 3);
        assert!(body["error"].is_null());
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

use crate::models::Instrument;
use crate::store::StoreError;

/// Response body for a failing request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub name: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

/// Everything a request against the room or reservation surface can fail
/// with. The first five are client-state conflicts and are never retried;
/// `Store` covers persistence-layer connectivity failures.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("The room {0} was not found")]
    RoomNotFound(String),

    #[error("The room {0} already exists")]
    RoomAlreadyExists(String),

    #[error("The instrument {0} was not found")]
    InstrumentNotFound(String),

    #[error("The instrument {0} has already been reserved")]
    InstrumentNotAvailable(Instrument),

    #[error("The instrument {0} has not yet been reserved")]
    InstrumentNotReserved(Instrument),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn name(&self) -> &'static str {
        match self {
            ApiError::RoomNotFound(_) => "RoomNotFound",
            ApiError::RoomAlreadyExists(_) => "RoomAlreadyExists",
            ApiError::InstrumentNotFound(_) => "InstrumentNotFound",
            ApiError::InstrumentNotAvailable(_) => "InstrumentNotAvailable",
            ApiError::InstrumentNotReserved(_) => "InstrumentNotReserved",
            ApiError::Store(_) => "InternalError",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::RoomNotFound(_) | ApiError::InstrumentNotFound(_) => 404,
            // Nonstandard, kept for compatibility with existing clients
            ApiError::RoomAlreadyExists(_) => 419,
            ApiError::InstrumentNotAvailable(_) | ApiError::InstrumentNotReserved(_) => 412,
            ApiError::Store(_) => 500,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Store(ref e) = self {
            error!("storage failure: {e}");
        }
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody {
            name: self.name().to_string(),
            message: self.to_string(),
            status_code: self.status_code(),
        };
        (status, Json(body)).into_response()
    }
}

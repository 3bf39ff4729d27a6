use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response for the health check
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub message: String,
}

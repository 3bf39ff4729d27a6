use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Runtime counters and system stats for the diagnostics endpoint
#[derive(Serialize, Deserialize, ToSchema)]
pub struct DiagnosticsResponse {
    /// Rooms with an open broadcast channel
    pub n_rooms: u32,
    /// Connections currently joined to any room channel
    pub n_connections: u32,
    pub cpu_usage: f32,
    pub memory_alloc: u64,
    pub memory_total: u64,
    pub memory_free: u64,
}

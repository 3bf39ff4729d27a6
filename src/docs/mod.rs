use utoipa::OpenApi;

use crate::models::*;

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
#[allow(dead_code)]
pub async fn health_check_doc() {}

/// List rooms
#[utoipa::path(
    get,
    path = "/rooms",
    responses(
        (status = 200, description = "Room names in creation order", body = [String])
    )
)]
#[allow(dead_code)]
pub async fn list_rooms_doc() {}

/// Create a room
#[utoipa::path(
    post,
    path = "/rooms/{name}",
    params(("name" = String, Path, description = "Room name")),
    responses(
        (status = 204, description = "Room created"),
        (status = 419, description = "Room already exists", body = ErrorBody)
    )
)]
#[allow(dead_code)]
pub async fn create_room_doc() {}

/// Delete a room
#[utoipa::path(
    delete,
    path = "/rooms/{name}",
    params(("name" = String, Path, description = "Room name")),
    responses(
        (status = 204, description = "Room deleted"),
        (status = 404, description = "Room not found", body = ErrorBody)
    )
)]
#[allow(dead_code)]
pub async fn delete_room_doc() {}

/// List a room's instruments
#[utoipa::path(
    get,
    path = "/rooms/{name}/instruments",
    params(("name" = String, Path, description = "Room name")),
    responses(
        (status = 200, description = "Reservation state per instrument", body = InstrumentStates),
        (status = 404, description = "Room not found", body = ErrorBody)
    )
)]
#[allow(dead_code)]
pub async fn list_instruments_doc() {}

/// Reserve an instrument
#[utoipa::path(
    post,
    path = "/rooms/{name}/instruments/{instrument}",
    params(
        ("name" = String, Path, description = "Room name"),
        ("instrument" = String, Path, description = "One of drums, bass, lead, rhythm")
    ),
    responses(
        (status = 204, description = "Instrument reserved"),
        (status = 404, description = "Room or instrument not found", body = ErrorBody),
        (status = 412, description = "Instrument already reserved", body = ErrorBody)
    )
)]
#[allow(dead_code)]
pub async fn reserve_instrument_doc() {}

/// Release an instrument
#[utoipa::path(
    delete,
    path = "/rooms/{name}/instruments/{instrument}",
    params(
        ("name" = String, Path, description = "Room name"),
        ("instrument" = String, Path, description = "One of drums, bass, lead, rhythm")
    ),
    responses(
        (status = 204, description = "Instrument released"),
        (status = 404, description = "Room or instrument not found", body = ErrorBody),
        (status = 412, description = "Instrument not reserved", body = ErrorBody)
    )
)]
#[allow(dead_code)]
pub async fn release_instrument_doc() {}

/// Flush all state
#[utoipa::path(
    get,
    path = "/flush",
    responses(
        (status = 204, description = "All rooms, maps and channels dropped")
    )
)]
#[allow(dead_code)]
pub async fn flush_doc() {}

/// Diagnostics
#[utoipa::path(
    get,
    path = "/diagnostics",
    responses(
        (status = 200, description = "Runtime counters and system stats", body = DiagnosticsResponse)
    )
)]
#[allow(dead_code)]
pub async fn diagnostics_doc() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check_doc,
        list_rooms_doc,
        create_room_doc,
        delete_room_doc,
        list_instruments_doc,
        reserve_instrument_doc,
        release_instrument_doc,
        flush_doc,
        diagnostics_doc,
    ),
    components(
        schemas(HealthResponse, InstrumentStates, ErrorBody, DiagnosticsResponse)
    ),
    tags(
        (name = "jamroom", description = "Rehearsal room reservation API")
    )
)]
pub struct ApiDoc;

//! Shared helpers for the integration suites.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::StatusCode;
use axum::Router;
use http::{Method, Request};
use serde_json::Value;
use tower::ServiceExt;

use jamroom::routes::api::create_api_routes;
use jamroom::state::AppState;
use jamroom::store::{MemoryStore, RoomStore};
use jamroom::ws::channels::ChannelRegistry;

/// Router backed by a fresh in-memory store.
pub fn test_app() -> Router {
    let state = Arc::new(AppState {
        store: RoomStore::Memory(MemoryStore::new()),
        channels: ChannelRegistry::new(),
    });
    create_api_routes(state)
}

/// Drive one request through the router and decode the JSON body, if any.
pub async fn request(app: &Router, method: Method, path: &str) -> (StatusCode, Option<Value>) {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        None
    } else {
        Some(serde_json::from_slice(&body).unwrap())
    };

    (status, json)
}

/// Serve the app on an ephemeral port for clients that need a real socket.
pub async fn spawn_server() -> SocketAddr {
    let app = test_app();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

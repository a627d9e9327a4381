//! HTTP front end: an axum router over the [`Dispatcher`].

use crate::consts::SERVER_NAME;
use crate::dispatch::{DispatchRequest, DispatchResponse, Dispatcher};
use axum::extract::{Path, RawQuery, State};
use axum::http::header::{ACCEPT, CONTENT_TYPE, HOST, SERVER};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use log::{error, info};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

const STYLESHEET: &str = include_str!("../assets/style.css");

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/assets/style.css", get(stylesheet))
        .route("/{dataset}", get(dataset))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(SetResponseHeaderLayer::overriding(
            SERVER,
            HeaderValue::from_static(SERVER_NAME),
        ))
}

/// Serve until Ctrl-C, then close every dataset.
pub async fn serve(dispatcher: Arc<Dispatcher>, bind: &str) -> anyhow::Result<()> {
    let addr = SocketAddr::from_str(bind)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    let app = create_router(AppState {
        dispatcher: dispatcher.clone(),
    });
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    dispatcher.shutdown();
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down"),
        Err(e) => {
            error!("cannot listen for Ctrl-C: {e}");
            std::future::pending::<()>().await
        }
    }
}

fn header(headers: &HeaderMap, name: axum::http::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

async fn index(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    dispatch(state, None, query, &headers).await
}

async fn dataset(
    State(state): State<AppState>,
    Path(name): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    dispatch(state, Some(name), query, &headers).await
}

async fn dispatch(
    state: AppState,
    dataset: Option<String>,
    query: Option<String>,
    headers: &HeaderMap,
) -> Response {
    let request = DispatchRequest {
        dataset,
        query,
        host: header(headers, HOST),
        accept: header(headers, ACCEPT),
    };
    let dispatcher = state.dispatcher;
    match tokio::task::spawn_blocking(move || dispatcher.handle(&request)).await {
        Ok(DispatchResponse {
            status,
            content_type,
            body,
        }) => (status, [(CONTENT_TYPE, content_type)], body).into_response(),
        Err(e) => {
            error!("request task failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal server error\n").into_response()
        }
    }
}

async fn stylesheet() -> impl IntoResponse {
    ([(CONTENT_TYPE, "text/css; charset=utf-8")], STYLESHEET)
}

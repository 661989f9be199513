//! Host/IP allowlist enforcement, applied ahead of every route (spec.md §6).

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn enforce_access_control(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(host) = req
        .headers()
        .get(axum::http::header::HOST)
        .and_then(|v| v.to_str().ok())
    {
        let host_only = host.split(':').next().unwrap_or(host);
        if !state.access.host_allowed(host_only) {
            return Err(ApiError::forbidden("host not permitted"));
        }
    }

    if !state.access.ip_allowed(addr.ip()) {
        return Err(ApiError::forbidden("client ip not permitted"));
    }

    Ok(next.run(req).await)
}

//! Custom Axum extractors.
//!
//! - `CorrelationId`: the request's correlation ID
//! - `ClientIp`: client IP address from proxy headers or the connection
//!
//! # Examples
//!
//! ```ignore
//! use magic_link_web::extractors::{ClientIp, CorrelationId};
//!
//! async fn handler(
//!     correlation_id: CorrelationId,
//!     client_ip: ClientIp,
//! ) -> &'static str {
//!     tracing::info!(
//!         correlation_id = %correlation_id.0,
//!         client_ip = %client_ip.0,
//!         "Processing request"
//!     );
//!     "ok"
//! }
//! ```

use crate::middleware::incoming_correlation_id;
use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use uuid::Uuid;

/// Correlation ID for request tracing.
///
/// Uses the ID stored by the correlation middleware when it is installed,
/// so handler logs and the response header agree. Otherwise reads the
/// `X-Correlation-ID` header, or generates a new UUID v4.
#[derive(Debug, Clone, Copy)]
pub struct CorrelationId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .extensions
            .get::<Uuid>()
            .copied()
            .or_else(|| incoming_correlation_id(&parts.headers))
            .unwrap_or_else(Uuid::new_v4);

        Ok(Self(id))
    }
}

/// Client IP address.
///
/// # Priority
///
/// 1. `X-Forwarded-For` (first IP in the list)
/// 2. `X-Real-IP`
/// 3. Connection IP, when the server was started with connect info
/// 4. `127.0.0.1`
#[derive(Debug, Clone, Copy)]
pub struct ClientIp(pub IpAddr);

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip = extract_client_ip(&parts.headers, parts.extensions.get());

        Ok(Self(ip))
    }
}

fn extract_client_ip(
    headers: &HeaderMap,
    connect_info: Option<&ConnectInfo<SocketAddr>>,
) -> IpAddr {
    let forwarded = headers
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok());

    let real_ip = || {
        headers
            .get("X-Real-IP")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
    };

    forwarded
        .or_else(real_ip)
        .or_else(|| connect_info.map(|ConnectInfo(addr)| addr.ip()))
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

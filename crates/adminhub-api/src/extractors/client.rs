//! `ClientDevice` extractor: client IP and user agent shaped into
//! [`DeviceInfo`].

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::header::USER_AGENT;
use axum::http::request::Parts;

use adminhub_auth::device::DeviceInfo;

use crate::state::AppState;

/// Device metadata of the calling client.
#[derive(Debug, Clone)]
pub struct ClientDevice(pub DeviceInfo);

impl FromRequestParts<AppState> for ClientDevice {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip());
        let ip = client_ip(
            peer,
            &parts.headers,
            &state.config.server.trusted_proxies,
        );

        let user_agent = parts
            .headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok());

        Ok(ClientDevice(DeviceInfo::from_request(
            ip,
            user_agent,
            state.region_resolver.as_ref(),
        )))
    }
}

/// Address to record for the caller.
///
/// Forwarding headers are only believed when the direct peer is a trusted
/// proxy; otherwise the peer address stands.
pub fn client_ip(
    peer: Option<IpAddr>,
    headers: &HeaderMap,
    trusted_proxies: &[IpAddr],
) -> Option<IpAddr> {
    match peer {
        Some(peer) if trusted_proxies.contains(&peer) => forwarded_ip(headers).or(Some(peer)),
        _ => peer,
    }
}

/// First hop of `x-forwarded-for`, falling back to `x-real-ip`.
pub fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse().ok());

    forwarded.or_else(|| {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    })
}

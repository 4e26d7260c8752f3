use std::net::IpAddr;

use axum::http::HeaderMap;

pub const UNKNOWN_CLIENT: &str = "unknown";

/// Identity hints a transport can offer about the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientHints {
    pub forwarded_for: Option<String>,
    pub real_ip: Option<String>,
    pub peer: Option<IpAddr>,
}

impl ClientHints {
    pub fn from_headers(headers: &HeaderMap, peer: Option<IpAddr>) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };

        Self {
            forwarded_for: header("x-forwarded-for"),
            real_ip: header("x-real-ip"),
            peer,
        }
    }

    /// First forwarded hop, then the real-ip header, then the socket peer.
    pub fn client_key(&self) -> String {
        let forwarded = self
            .forwarded_for
            .as_deref()
            .and_then(|chain| chain.split(',').next())
            .map(str::trim)
            .filter(|hop| !hop.is_empty());

        let real_ip = self
            .real_ip
            .as_deref()
            .map(str::trim)
            .filter(|ip| !ip.is_empty());

        forwarded
            .or(real_ip)
            .map(str::to_string)
            .or_else(|| self.peer.map(|ip| ip.to_string()))
            .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
    }
}

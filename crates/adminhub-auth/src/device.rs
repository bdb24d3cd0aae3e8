//! Request metadata shaping: client IP, user agent, and derived fields.
//!
//! Everything here is a pure function of the request; nothing touches the
//! session store.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// Placeholder for fields that cannot be derived.
pub const UNKNOWN: &str = "Unknown";

/// Client metadata captured into a session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    /// Client IP address as text.
    pub client_ip: String,
    /// Coarse geographic label for the IP.
    pub geo_region: String,
    /// Raw user agent header.
    pub user_agent: String,
    /// Operating system derived from the user agent.
    pub os: String,
    /// Browser derived from the user agent.
    pub browser: String,
    /// Device class derived from the user agent.
    pub device: String,
}

impl DeviceInfo {
    /// Builds device info from the peer address and user agent header.
    pub fn from_request(
        ip: Option<IpAddr>,
        user_agent: Option<&str>,
        regions: &dyn RegionResolver,
    ) -> Self {
        let user_agent = user_agent.unwrap_or_default().trim();
        let summary = UserAgentSummary::parse(user_agent);

        Self {
            client_ip: ip.map(|ip| ip.to_string()).unwrap_or_else(|| UNKNOWN.to_string()),
            geo_region: ip
                .map(|ip| regions.resolve(ip))
                .unwrap_or_else(|| UNKNOWN.to_string()),
            user_agent: user_agent.to_string(),
            os: summary.os,
            browser: summary.browser,
            device: summary.device,
        }
    }

    /// Device info for callers that have no request context.
    pub fn unknown() -> Self {
        Self {
            client_ip: UNKNOWN.to_string(),
            geo_region: UNKNOWN.to_string(),
            user_agent: String::new(),
            os: UNKNOWN.to_string(),
            browser: UNKNOWN.to_string(),
            device: UNKNOWN.to_string(),
        }
    }
}

/// Maps an IP address to a coarse region label.
pub trait RegionResolver: Send + Sync + std::fmt::Debug {
    /// Region label for `ip`.
    fn resolve(&self, ip: IpAddr) -> String;
}

/// Resolver that only distinguishes internal from external addresses.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalRegionResolver;

impl RegionResolver for LocalRegionResolver {
    fn resolve(&self, ip: IpAddr) -> String {
        let internal = match ip {
            IpAddr::V4(v4) => v4.is_private() || v4.is_loopback() || v4.is_link_local(),
            IpAddr::V6(v6) => {
                v6.is_loopback()
                    // fc00::/7 unique local
                    || (v6.segments()[0] & 0xfe00) == 0xfc00
            }
        };

        if internal {
            "Intranet".to_string()
        } else {
            UNKNOWN.to_string()
        }
    }
}

/// OS, browser and device class parsed from a user agent string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgentSummary {
    /// Operating system.
    pub os: String,
    /// Browser with major version when known.
    pub browser: String,
    /// `Desktop`, `Mobile`, `Tablet`, `Bot` or `Unknown`.
    pub device: String,
}

impl UserAgentSummary {
    /// Heuristic parse; order of checks matters because most browsers claim
    /// to be several others.
    pub fn parse(ua: &str) -> Self {
        if ua.is_empty() {
            return Self {
                os: UNKNOWN.to_string(),
                browser: UNKNOWN.to_string(),
                device: UNKNOWN.to_string(),
            };
        }

        Self {
            os: parse_os(ua),
            browser: parse_browser(ua),
            device: parse_device(ua),
        }
    }
}

fn parse_os(ua: &str) -> String {
    let os = if ua.contains("Windows NT 10.0") {
        "Windows 10"
    } else if ua.contains("Windows NT 6.3") {
        "Windows 8.1"
    } else if ua.contains("Windows NT 6.1") {
        "Windows 7"
    } else if ua.contains("Windows") {
        "Windows"
    } else if ua.contains("iPhone") || ua.contains("iPad") {
        "iOS"
    } else if ua.contains("Mac OS X") {
        "macOS"
    } else if ua.contains("Android") {
        "Android"
    } else if ua.contains("CrOS") {
        "Chrome OS"
    } else if ua.contains("Linux") {
        "Linux"
    } else {
        UNKNOWN
    };
    os.to_string()
}

fn parse_browser(ua: &str) -> String {
    const MARKERS: &[(&str, &str)] = &[
        ("Edg/", "Edge"),
        ("OPR/", "Opera"),
        ("Firefox/", "Firefox"),
        ("Chrome/", "Chrome"),
        ("Version/", "Safari"),
        ("curl/", "curl"),
    ];

    for (marker, name) in MARKERS {
        if let Some(version) = major_version_after(ua, marker) {
            if *name == "Safari" && !ua.contains("Safari/") {
                continue;
            }
            return format!("{name} {version}");
        }
    }
    UNKNOWN.to_string()
}

fn parse_device(ua: &str) -> String {
    let lower = ua.to_ascii_lowercase();
    let device = if ["bot", "spider", "crawler"].iter().any(|m| lower.contains(m)) {
        "Bot"
    } else if lower.contains("ipad") || lower.contains("tablet") {
        "Tablet"
    } else if lower.contains("mobile") || lower.contains("iphone") {
        "Mobile"
    } else if lower.contains("android") {
        "Tablet"
    } else {
        "Desktop"
    };
    device.to_string()
}

/// Digits following `marker` up to the first `.`, if any.
fn major_version_after<'a>(ua: &'a str, marker: &str) -> Option<&'a str> {
    let start = ua.find(marker)? + marker.len();
    let rest = &ua[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    (end > 0).then(|| &rest[..end])
}

/// Strips `prefix` from an authorization header value.
///
/// Returns `None` when the prefix is missing or the credential is empty.
pub fn extract_bearer<'a>(header_value: &'a str, prefix: &str) -> Option<&'a str> {
    let token = header_value.strip_prefix(prefix)?.trim();
    (!token.is_empty()).then_some(token)
}

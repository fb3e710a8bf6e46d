use tracing::warn;

/// Sentinel base URL marking "route this call through the rewrite".
///
/// Never resolved directly; a call that reaches the network with this
/// host has deliberately been passed through so it fails loudly there.
pub const GATEWAY_BASE_URL: &str = "https://gateway.ai.internal";

/// Headers meaningful only to the emulated hosted gateway.
///
/// Removed before the call leaves the process; the real upstream
/// credential (e.g. `authorization`, `x-api-key`) is never touched.
pub const STRIPPED_HEADERS: [&str; 3] = [
    "cf-aig-authorization",
    "cf-aig-metadata",
    "cf-aig-cache-ttl",
];

/// Fixed routing table. The provider set is closed; there is no dynamic
/// registration.
pub fn upstream_base(provider: &str) -> Option<&'static str> {
    match provider {
        "anthropic" => Some("https://api.anthropic.com"),
        "openai" => Some("https://api.openai.com"),
        "gemini" => Some("https://generativelanguage.googleapis.com"),
        _ => None,
    }
}

/// Outcome of matching a URL against the sentinel.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Decision {
    /// Not gateway traffic; delegate untouched.
    Bypass,
    /// Gateway traffic we cannot route; delegate the sentinel URL
    /// untouched so it fails at the network layer instead of being
    /// silently misrouted.
    Passthrough,
    /// Rewrite to this upstream URL.
    Route(String),
}

pub(crate) fn decide(url: &str) -> Decision {
    let Some(suffix) = url.strip_prefix(GATEWAY_BASE_URL) else {
        return Decision::Bypass;
    };
    // Guard against prefix-only matches like gateway.ai.internal.evil.com.
    if !suffix.is_empty() && !suffix.starts_with('/') {
        return Decision::Bypass;
    }

    let path = suffix.trim_start_matches('/');
    let (provider, rest) = match path.find(['/', '?']) {
        Some(i) => (&path[..i], &path[i..]),
        None => (path, ""),
    };
    if provider.is_empty() {
        warn!(url, "gateway url has no provider segment, passing through");
        return Decision::Passthrough;
    }

    match upstream_base(provider) {
        Some(base) => Decision::Route(format!("{base}{rest}")),
        None => {
            warn!(url, provider, "unknown gateway provider, passing through");
            Decision::Passthrough
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_sentinel_url_bypasses() {
        assert_eq!(decide("https://example.com/v1/messages"), Decision::Bypass);
    }

    #[test]
    fn lookalike_host_bypasses() {
        assert_eq!(
            decide("https://gateway.ai.internal.evil.com/anthropic/x"),
            Decision::Bypass
        );
    }

    #[test]
    fn known_provider_routes_with_rest_and_query() {
        assert_eq!(
            decide("https://gateway.ai.internal/anthropic/v1/messages"),
            Decision::Route("https://api.anthropic.com/v1/messages".to_string())
        );
        assert_eq!(
            decide("https://gateway.ai.internal/gemini/v1beta/models?key=abc"),
            Decision::Route(
                "https://generativelanguage.googleapis.com/v1beta/models?key=abc".to_string()
            )
        );
    }

    #[test]
    fn provider_without_rest_routes_to_base() {
        assert_eq!(
            decide("https://gateway.ai.internal/openai"),
            Decision::Route("https://api.openai.com".to_string())
        );
    }

    #[test]
    fn unknown_provider_passes_through() {
        assert_eq!(
            decide("https://gateway.ai.internal/unknown-provider/x"),
            Decision::Passthrough
        );
    }

    #[test]
    fn bare_sentinel_passes_through() {
        assert_eq!(decide("https://gateway.ai.internal/"), Decision::Passthrough);
    }
}

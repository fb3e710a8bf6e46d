use reqwest::{Client, Method, Request, Response, Url};
use tracing::{debug, warn};

use crate::routes::{Decision, STRIPPED_HEADERS, decide};

/// Injectable rewrite service.
///
/// Wraps one `reqwest::Client` and applies the sentinel rewrite to every
/// request before delegating. Holds no per-call mutable state, so one
/// instance is safe under unbounded concurrent use.
#[derive(Clone, Default)]
pub struct GatewayClient {
    inner: Client,
}

impl GatewayClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build on an existing client (connection pool, proxy settings).
    pub fn with_client(inner: Client) -> Self {
        Self { inner }
    }

    /// Execute `req`, rewriting it first when it targets the sentinel.
    ///
    /// The response, including a streamed body, is returned unchanged.
    pub async fn fetch(&self, req: Request) -> reqwest::Result<Response> {
        self.inner.execute(rewrite(req)).await
    }

    /// Execute `req` without applying the rewrite.
    pub(crate) async fn fetch_raw(&self, req: Request) -> reqwest::Result<Response> {
        self.inner.execute(req).await
    }
}

/// Apply the rewrite rule to one request.
///
/// Returns the original request untouched for non-sentinel targets and
/// for sentinel URLs that cannot be routed (those fail loudly at the
/// network layer instead of being silently misrouted).
pub(crate) fn rewrite(mut req: Request) -> Request {
    let target = match decide(req.url().as_str()) {
        Decision::Bypass | Decision::Passthrough => return req,
        Decision::Route(target) => target,
    };

    let url = match Url::parse(&target) {
        Ok(url) => url,
        Err(e) => {
            warn!(target, error = %e, "rewritten gateway url is invalid, passing through");
            return req;
        }
    };
    debug!(from = %req.url(), to = %url, "rewriting gateway call");

    let mut out = Request::new(req.method().clone(), url);
    // Only the URL and the gateway-only headers change; everything else
    // the caller set on the request rides along.
    *out.timeout_mut() = req.timeout().copied();
    *out.version_mut() = req.version();
    let headers = out.headers_mut();
    *headers = req.headers().clone();
    for name in STRIPPED_HEADERS {
        headers.remove(name);
    }

    // The body is moved, not copied: a streaming upload stays a stream
    // end-to-end. GET/HEAD carry no body by contract.
    if !matches!(*req.method(), Method::GET | Method::HEAD) {
        *out.body_mut() = req.body_mut().take();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue};

    use crate::routes::GATEWAY_BASE_URL;

    fn gateway_request(method: Method, suffix: &str) -> Request {
        let url = Url::parse(&format!("{GATEWAY_BASE_URL}{suffix}")).unwrap();
        Request::new(method, url)
    }

    #[test]
    fn rewrites_url_method_and_body() {
        let mut req = gateway_request(Method::POST, "/anthropic/v1/messages");
        *req.body_mut() = Some(reqwest::Body::from(r#"{"model":"x"}"#));

        let out = rewrite(req);
        assert_eq!(out.url().as_str(), "https://api.anthropic.com/v1/messages");
        assert_eq!(*out.method(), Method::POST);
        assert_eq!(
            out.body().and_then(|b| b.as_bytes()),
            Some(r#"{"model":"x"}"#.as_bytes())
        );
    }

    #[test]
    fn strips_gateway_headers_and_keeps_the_rest() {
        let mut req = gateway_request(Method::POST, "/anthropic/v1/messages");
        let mut headers = HeaderMap::new();
        headers.insert("cf-aig-authorization", HeaderValue::from_static("internal"));
        headers.insert("cf-aig-metadata", HeaderValue::from_static("{}"));
        headers.insert("x-api-key", HeaderValue::from_static("upstream-secret"));
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        *req.headers_mut() = headers;

        let out = rewrite(req);
        assert!(out.headers().get("cf-aig-authorization").is_none());
        assert!(out.headers().get("cf-aig-metadata").is_none());
        assert_eq!(
            out.headers().get("x-api-key").unwrap(),
            &HeaderValue::from_static("upstream-secret")
        );
        assert_eq!(
            out.headers().get("content-type").unwrap(),
            &HeaderValue::from_static("application/json")
        );
    }

    #[test]
    fn caller_timeout_and_version_survive_the_rewrite() {
        let mut req = gateway_request(Method::POST, "/anthropic/v1/messages");
        *req.timeout_mut() = Some(std::time::Duration::from_secs(7));
        *req.version_mut() = reqwest::Version::HTTP_2;

        let out = rewrite(req);
        assert_eq!(out.timeout(), Some(&std::time::Duration::from_secs(7)));
        assert_eq!(out.version(), reqwest::Version::HTTP_2);
    }

    #[test]
    fn get_request_carries_no_body() {
        let req = gateway_request(Method::GET, "/openai/v1/models");
        let out = rewrite(req);
        assert_eq!(out.url().as_str(), "https://api.openai.com/v1/models");
        assert!(out.body().is_none());
    }

    #[test]
    fn unknown_provider_is_untouched() {
        let req = gateway_request(Method::POST, "/unknown-provider/x");
        let url_before = req.url().clone();
        let out = rewrite(req);
        assert_eq!(*out.url(), url_before);
    }

    #[test]
    fn non_sentinel_request_is_untouched() {
        let req = Request::new(
            Method::POST,
            Url::parse("https://api.example.com/v1/messages").unwrap(),
        );
        let out = rewrite(req);
        assert_eq!(out.url().as_str(), "https://api.example.com/v1/messages");
    }
}

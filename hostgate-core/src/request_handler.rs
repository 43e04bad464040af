//! HTTP request handling and proxying.
//!
//! This module contains the core request handling logic for the proxy: the
//! admission stages that decide whether a request may be forwarded, and the
//! forwarding machinery that carries it upstream and streams the response
//! back.
//!
//! # Architecture
//!
//! Each request runs through a strictly linear pipeline with early exit:
//! 1. Rate limit check for the client
//! 2. Target host extraction from the first path segment
//! 3. Hostname syntax validation
//! 4. Whitelist match against the compiled patterns
//! 5. Request header sanitization
//! 6. Timeout-bounded forward to the target over HTTPS
//! 7. Response header sanitization, body streamed through unbuffered
//!
//! The first failing stage produces the terminal response; later stages do
//! not run.
//!
//! # Connection Pooling
//!
//! The module accepts a shared [`reqwest::Client`] for HTTP connection
//! pooling, built once at startup by [`build_http_client`]. The per-request
//! timeout is armed here around each forward, not on the client, so one
//! slow upstream cannot change the budget of other requests.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use futures_util::TryStreamExt;
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Full, StreamBody};
use hyper::body::Frame;
use hyper::header::{CONTENT_LENGTH, HOST, HeaderMap, TRANSFER_ENCODING, USER_AGENT};
use hyper::{Method, Request, Response, StatusCode, Uri};
use tokio::time::timeout;
use tracing::{debug, error, warn};

use crate::defaults;
use crate::error::HostGateError;
use crate::headers::{sanitize_request_headers, sanitize_response_headers};
use crate::hostname::is_valid_hostname;
use crate::rate_limiter::check_rate_limit;
use crate::types::{ProxySettings, RateLimiter};
use crate::whitelist::Whitelist;

/// Response body type: a buffered error message or the streamed upstream body.
pub type ProxyBody = UnsyncBoxBody<Bytes, Box<dyn std::error::Error + Send + Sync>>;

/// 429 body text.
pub const RATE_LIMITED_MESSAGE: &str = "Too Many Requests";

/// 400 body text when no path segment names a target host.
pub const EMPTY_PATH_MESSAGE: &str = "first path segment must be the target host";

/// 400 body text when the first segment is not a valid hostname.
pub const INVALID_HOST_MESSAGE: &str = "Invalid host format provided";

/// Outcome of the admission stages for one request.
#[derive(Debug)]
pub enum Decision {
    /// The client is over its rate limit window.
    RateLimited,
    /// The path names no target host, or names a malformed one.
    BadRequest(&'static str),
    /// The hostname is valid but matches no whitelist pattern.
    Forbidden(String),
    /// The request is admitted and ready to forward.
    Forward(ForwardPlan),
}

/// Everything the forwarding stage needs for an admitted request.
#[derive(Debug)]
pub struct ForwardPlan {
    /// Validated and whitelisted target host.
    pub target_host: String,
    /// Complete upstream URL: forced `https`, no port, reassembled path.
    pub target_url: String,
    /// Sanitized headers to send upstream.
    pub headers: HeaderMap,
}

/// Handles an incoming HTTP request through the proxy pipeline.
///
/// This is the main entry point for request processing. It performs:
/// - Per-client rate limiting
/// - Target host extraction from the first path segment
/// - Hostname syntax validation and whitelist matching
/// - Header sanitization in both directions
/// - Timeout-bounded forwarding over HTTPS, response streamed back
///
/// # Arguments
///
/// * `req` - The incoming HTTP request
/// * `client_id` - Client identifier (the peer IP address)
/// * `whitelist` - Compiled allowed host patterns
/// * `limiter` - The shared rate limiter instance
/// * `settings` - Pipeline settings, fixed at startup
/// * `http_client` - HTTP client for forwarding requests (with connection pooling)
///
/// # Returns
///
/// Always returns `Ok` with either:
/// - The upstream response, header-sanitized, body streamed through
/// - An error response (400, 403, 429, 502, 504)
pub async fn handle_request<B>(
    req: Request<B>,
    client_id: String,
    whitelist: Arc<Whitelist>,
    limiter: RateLimiter,
    settings: ProxySettings,
    http_client: reqwest::Client,
) -> Result<Response<ProxyBody>, Infallible>
where
    B: hyper::body::Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (parts, body) = req.into_parts();

    let decision = admit(
        &client_id,
        &parts.uri,
        &parts.headers,
        "http",
        &whitelist,
        &limiter,
        &settings,
    )
    .await;

    let plan = match decision {
        Decision::RateLimited => {
            return Ok(create_error_response(
                StatusCode::TOO_MANY_REQUESTS,
                RATE_LIMITED_MESSAGE,
            ));
        }
        Decision::BadRequest(message) => {
            return Ok(create_error_response(StatusCode::BAD_REQUEST, message));
        }
        Decision::Forbidden(message) => {
            return Ok(create_error_response(StatusCode::FORBIDDEN, &message));
        }
        Decision::Forward(plan) => plan,
    };

    // Attach the inbound body only when the request actually carries one,
    // so bodyless methods don't go upstream as chunked transfers.
    let body = has_request_body(&parts.headers).then_some(body);

    match forward_upstream(
        &http_client,
        parts.method,
        &plan.target_host,
        &plan.target_url,
        plan.headers,
        body,
        settings.upstream.timeout,
    )
    .await
    {
        Ok(upstream) => {
            debug!(
                client = %client_id,
                target = %plan.target_host,
                status = %upstream.status(),
                "request forwarded"
            );
            Ok(stream_response(upstream))
        }
        Err(err) => {
            error!(
                client = %client_id,
                target = %plan.target_host,
                error = %err,
                "upstream request failed"
            );
            Ok(create_error_response(err.status_code(), &err.user_message()))
        }
    }
}

/// Runs a request through the admission stages.
///
/// Stages run in order with early exit: rate limit, target extraction,
/// hostname validation, whitelist match, header sanitization. Every
/// rejection is logged here at warning level with the client identifier
/// and, once known, the target host and user agent.
///
/// # Arguments
///
/// * `client_id` - Client identifier (the peer IP address)
/// * `uri` - Request URI; the first non-empty path segment names the target
/// * `headers` - Inbound request headers
/// * `scheme` - Scheme the client connected with, for `x-forwarded-proto`
/// * `whitelist` - Compiled allowed host patterns
/// * `limiter` - The shared rate limiter instance
/// * `settings` - Pipeline settings, fixed at startup
///
/// # Returns
///
/// A [`Decision`]: a terminal rejection, or a [`ForwardPlan`] carrying the
/// target host, upstream URL, and sanitized headers.
pub async fn admit(
    client_id: &str,
    uri: &Uri,
    headers: &HeaderMap,
    scheme: &'static str,
    whitelist: &Whitelist,
    limiter: &RateLimiter,
    settings: &ProxySettings,
) -> Decision {
    if !check_rate_limit(limiter, client_id, epoch_ms(), &settings.rate_limit).await {
        warn!(client = %client_id, "rate limit exceeded");
        return Decision::RateLimited;
    }

    // Empty segments are dropped, so leading, trailing, and duplicate
    // slashes are all tolerated.
    let segments: Vec<&str> = uri.path().split('/').filter(|s| !s.is_empty()).collect();
    let Some((&candidate, rest)) = segments.split_first() else {
        warn!(client = %client_id, "request path names no target host");
        return Decision::BadRequest(EMPTY_PATH_MESSAGE);
    };

    if !is_valid_hostname(candidate) {
        warn!(
            client = %client_id,
            target = %candidate,
            user_agent = %user_agent(headers),
            "malformed target hostname"
        );
        return Decision::BadRequest(INVALID_HOST_MESSAGE);
    }

    if !whitelist.is_allowed(candidate) {
        warn!(
            client = %client_id,
            target = %candidate,
            user_agent = %user_agent(headers),
            "target host not whitelisted"
        );
        return Decision::Forbidden(format!("Host '{candidate}' is not in the allowed list"));
    }

    Decision::Forward(ForwardPlan {
        target_host: candidate.to_string(),
        target_url: build_target_url(candidate, rest, uri.query()),
        headers: sanitize_request_headers(headers, headers.get(HOST), scheme),
    })
}

/// Builds the upstream URL for an admitted request.
///
/// The scheme is forced to `https` and no port is ever attached, so a
/// whitelisted host cannot be steered to an alternate service on another
/// port. The remaining path segments are rejoined in order, exactly as
/// received, and the original query string is carried over untouched.
///
/// # Example
///
/// ```
/// use hostgate_core::request_handler::build_target_url;
///
/// let url = build_target_url("api.github.com", &["repos", "rust-lang", "rust"], Some("per_page=5"));
/// assert_eq!(url, "https://api.github.com/repos/rust-lang/rust?per_page=5");
/// ```
pub fn build_target_url(host: &str, segments: &[&str], query: Option<&str>) -> String {
    let mut url = String::with_capacity(host.len() + 16);
    url.push_str("https://");
    url.push_str(host);
    url.push('/');
    url.push_str(&segments.join("/"));
    if let Some(query) = query {
        url.push('?');
        url.push_str(query);
    }
    url
}

/// Sends an admitted request upstream, bounded by the configured timeout.
///
/// The timer is armed before the call starts and covers connection setup
/// through response headers; dropping the call on expiry aborts it, so no
/// connection outlives its budget. Redirect following is the client's
/// policy. There are no retries: the first failure is surfaced.
///
/// # Arguments
///
/// * `http_client` - Shared pooled HTTP client
/// * `method` - Original request method, passed through
/// * `target_host` - Validated target host, for error reporting
/// * `target_url` - Complete upstream URL from [`build_target_url`]
/// * `headers` - Sanitized headers to send
/// * `body` - Inbound body stream, when the request carries one
/// * `timeout_budget` - Per-request upstream timeout
///
/// # Returns
///
/// The upstream response, or [`HostGateError::UpstreamTimeout`] /
/// [`HostGateError::UpstreamFailed`] for the 504/502 paths.
pub async fn forward_upstream<B>(
    http_client: &reqwest::Client,
    method: Method,
    target_host: &str,
    target_url: &str,
    headers: HeaderMap,
    body: Option<B>,
    timeout_budget: Duration,
) -> Result<reqwest::Response, HostGateError>
where
    B: hyper::body::Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let mut builder = http_client.request(method, target_url).headers(headers);
    if let Some(body) = body {
        builder = builder.body(reqwest::Body::wrap_stream(body.into_data_stream()));
    }

    match timeout(timeout_budget, builder.send()).await {
        Ok(Ok(response)) => Ok(response),
        Ok(Err(source)) => Err(HostGateError::UpstreamFailed {
            host: target_host.to_string(),
            source,
        }),
        Err(_) => Err(HostGateError::UpstreamTimeout {
            host: target_host.to_string(),
            timeout_ms: timeout_budget.as_millis() as u64,
        }),
    }
}

/// Converts an upstream response into the client response.
///
/// The status code passes through exactly, headers go through
/// [`sanitize_response_headers`], and the body is streamed chunk by chunk
/// rather than buffered.
pub fn stream_response(upstream: reqwest::Response) -> Response<ProxyBody> {
    let status = upstream.status();
    let headers = sanitize_response_headers(upstream.headers());

    let stream = upstream
        .bytes_stream()
        .map_ok(Frame::data)
        .map_err(|source| Box::new(source) as Box<dyn std::error::Error + Send + Sync>);

    let mut response = Response::new(StreamBody::new(stream).boxed_unsync());
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// Builds the shared upstream HTTP client.
///
/// Pooled connections are reused across requests. Redirects are followed
/// up to [`defaults::MAX_REDIRECTS`] hops. No client-wide timeout is set;
/// each forward arms its own timer with the configured budget.
pub fn build_http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::limited(defaults::MAX_REDIRECTS))
        .build()
}

/// Creates a standardized error response.
///
/// Builds an HTTP response with the given status code and plain text message.
/// Falls back to a minimal 500 response if building fails (should never happen
/// with valid StatusCode).
///
/// # Arguments
///
/// * `status` - The HTTP status code for the response
/// * `message` - The plain text error message body
///
/// # Returns
///
/// An HTTP response with `content-type: text/plain` header.
///
/// # Example
///
/// ```
/// use hostgate_core::request_handler::create_error_response;
/// use hyper::StatusCode;
///
/// let response = create_error_response(StatusCode::FORBIDDEN, "Host 'x' is not in the allowed list");
/// assert_eq!(response.status(), StatusCode::FORBIDDEN);
/// ```
pub fn create_error_response(status: StatusCode, message: &str) -> Response<ProxyBody> {
    Response::builder()
        .status(status)
        .header("content-type", "text/plain")
        .body(full_body(message.to_string()))
        .unwrap_or_else(|_| {
            // Fallback response if builder fails (extremely unlikely)
            Response::new(full_body("Internal Server Error"))
        })
}

/// Buffers a fixed message into a [`ProxyBody`].
fn full_body(message: impl Into<Bytes>) -> ProxyBody {
    Full::new(message.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// True when the inbound request carries a body worth forwarding.
fn has_request_body(headers: &HeaderMap) -> bool {
    if headers.contains_key(TRANSFER_ENCODING) {
        return true;
    }
    headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|text| text.parse::<u64>().ok())
        .is_some_and(|length| length > 0)
}

/// User agent string for log records, `-` when absent or non-UTF-8.
fn user_agent(headers: &HeaderMap) -> &str {
    headers
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
}

/// Current wall-clock time in milliseconds since the Unix epoch.
fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as u64)
}

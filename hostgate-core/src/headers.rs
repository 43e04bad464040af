//! Header sanitization for both directions of the proxy.
//!
//! Requests lose their hop-by-hop headers plus anything that would leak or
//! contradict the rewritten target: `host` and `content-length` are derived
//! again from the target URL and the attached body, and client-supplied
//! `x-forwarded-*` values are dropped before the proxy attaches its own.
//!
//! Responses lose hop-by-hop headers and the upstream's identity headers,
//! and gain a single `x-proxied-by` marker.
//!
//! Copying uses `append` so repeated headers (`set-cookie` aside, which is
//! stripped anyway) keep their multiplicity and order.

use hyper::header::{HeaderMap, HeaderValue};
use hyper::http::HeaderName;

use crate::defaults::PROXIED_BY;

/// Connection-scoped headers that must never cross the proxy (RFC 9110 §7.6.1).
fn is_hop_by_hop(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailers"
            | "transfer-encoding"
            | "upgrade"
    )
}

/// Request headers the proxy re-derives or refuses to relay.
fn is_blocked_request_header(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "host" | "content-length" | "x-forwarded-for" | "x-forwarded-host" | "x-forwarded-proto"
    )
}

/// Response headers that reveal upstream identity or set client state.
fn is_blocked_response_header(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "set-cookie" | "proxy-authenticate" | "www-authenticate" | "server" | "x-powered-by"
    )
}

/// Builds the header map to send upstream from the inbound request headers.
///
/// End-to-end headers (including `authorization` and any custom headers)
/// pass through untouched. `x-forwarded-host` carries the inbound `Host`
/// value when one was present, and `x-forwarded-proto` carries the scheme
/// the client used to reach the proxy.
///
/// # Arguments
///
/// * `headers` - Headers of the inbound client request
/// * `inbound_host` - The client's `Host` header value, if it sent one
/// * `scheme` - Scheme the client connected with (`"http"` or `"https"`)
///
/// # Returns
///
/// A fresh header map safe to attach to the upstream request.
pub fn sanitize_request_headers(
    headers: &HeaderMap,
    inbound_host: Option<&HeaderValue>,
    scheme: &'static str,
) -> HeaderMap {
    let mut sanitized = HeaderMap::with_capacity(headers.len() + 2);

    for (name, value) in headers {
        if is_hop_by_hop(name) || is_blocked_request_header(name) {
            continue;
        }
        sanitized.append(name.clone(), value.clone());
    }

    if let Some(host) = inbound_host {
        sanitized.insert("x-forwarded-host", host.clone());
    }
    sanitized.insert("x-forwarded-proto", HeaderValue::from_static(scheme));

    sanitized
}

/// Builds the header map to return to the client from the upstream response.
///
/// Content negotiation headers (`content-type`, `content-length`,
/// `cache-control`, ...) pass through untouched so the client sees the
/// upstream payload exactly as sent.
///
/// # Arguments
///
/// * `headers` - Headers of the upstream response
///
/// # Returns
///
/// A fresh header map safe to return to the client, branded with
/// `x-proxied-by`.
pub fn sanitize_response_headers(headers: &HeaderMap) -> HeaderMap {
    let mut sanitized = HeaderMap::with_capacity(headers.len() + 1);

    for (name, value) in headers {
        if is_hop_by_hop(name) || is_blocked_response_header(name) {
            continue;
        }
        sanitized.append(name.clone(), value.clone());
    }

    sanitized.insert("x-proxied-by", HeaderValue::from_static(PROXIED_BY));

    sanitized
}

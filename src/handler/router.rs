//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for route lookup,
//! handler invocation, and access logging.

use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::routing::{RequestContext, RouteLookup, RouteTable};
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(ToString::to_string);
    let http_version = http_version_label(req.version());
    let referer = header_value(&req, "referer");
    let user_agent = header_value(&req, "user-agent");

    let response = match check_body_size(&req, state.config.http.max_body_size) {
        Some(resp) => resp,
        None => dispatch(&method, &path, &state.routes),
    };

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(remote_addr.ip().to_string(), method.to_string(), path);
        entry.query = query;
        entry.http_version = http_version;
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.referer = referer;
        entry.user_agent = user_agent;
        entry.request_time_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Resolve a (method, path) pair against the route table and run the handler
///
/// Unmatched paths get 404; paths that only match under other methods get 405
/// with an `Allow` header.
pub fn dispatch(method: &Method, path: &str, routes: &RouteTable) -> Response<Full<Bytes>> {
    match routes.lookup(method, path) {
        RouteLookup::Found { handler, params } => {
            let ctx = RequestContext { params };
            handler(&ctx)
        }
        RouteLookup::MethodMismatch { allowed } => http::build_405_response(&allowed),
        RouteLookup::NotFound => http::build_404_response(),
    }
}

/// Validate Content-Length header and return 413 if exceeded
///
/// Handlers never read the body, but an oversized declared body is still
/// rejected up front.
fn check_body_size(
    req: &Request<hyper::body::Incoming>,
    max_body_size: u64,
) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    let Ok(size_str) = content_length.to_str() else {
        logger::log_warning("Content-Length header contains non-ASCII characters");
        return None;
    };

    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_error(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(http::build_413_response())
        }
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            None
        }
        _ => None,
    }
}

/// Extract a request header as an owned string, if present and valid UTF-8
fn header_value(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Version label for access logs: "HTTP/1.1" -> "1.1"
fn http_version_label(version: hyper::Version) -> String {
    format!("{version:?}")
        .trim_start_matches("HTTP/")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::endpoints;
    use http_body_util::BodyExt;

    async fn body_string(response: Response<Full<Bytes>>) -> String {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        String::from_utf8(bytes.to_vec()).expect("utf-8 body")
    }

    #[tokio::test]
    async fn test_all_declared_endpoints_respond() {
        let routes = endpoints::routes().unwrap();
        let cases = [
            (Method::POST, "/api/v1/user/signup", "signup"),
            (Method::POST, "/api/v1/user/signin", "signin"),
            (Method::POST, "/api/v1/blog", "blog add"),
            (Method::PUT, "/api/v1/blog", "blog update"),
            (Method::GET, "/api/v1/blog/42", "blog get"),
            (Method::GET, "/api/v1/blog/bulk", "blog bulk get"),
        ];

        for (method, path, expected) in cases {
            let response = dispatch(&method, path, &routes);
            assert_eq!(response.status(), 200, "{method} {path}");
            assert_eq!(
                response.headers().get("Content-Type").unwrap(),
                "text/plain; charset=utf-8"
            );
            assert_eq!(body_string(response).await, expected, "{method} {path}");
        }
    }

    #[tokio::test]
    async fn test_bulk_is_not_captured_by_id_route() {
        let routes = endpoints::routes().unwrap();
        let response = dispatch(&Method::GET, "/api/v1/blog/bulk", &routes);
        assert_eq!(body_string(response).await, "blog bulk get");
    }

    #[tokio::test]
    async fn test_any_other_token_reaches_get_by_id() {
        let routes = endpoints::routes().unwrap();
        for token in ["1", "abc", "bulky", "bul"] {
            let response = dispatch(&Method::GET, &format!("/api/v1/blog/{token}"), &routes);
            assert_eq!(body_string(response).await, "blog get", "token {token}");
        }
    }

    #[test]
    fn test_unregistered_path_is_404() {
        let routes = endpoints::routes().unwrap();
        let response = dispatch(&Method::GET, "/api/v1/unknown", &routes);
        assert_eq!(response.status(), 404);
    }

    #[test]
    fn test_wrong_method_is_405_with_allow() {
        let routes = endpoints::routes().unwrap();
        let response = dispatch(&Method::DELETE, "/api/v1/blog", &routes);
        assert_eq!(response.status(), 405);
        let allow = response.headers().get("Allow").unwrap().to_str().unwrap();
        assert!(allow.contains("POST"));
        assert!(allow.contains("PUT"));
    }

    #[test]
    fn test_wrong_method_on_param_route_is_405() {
        let routes = endpoints::routes().unwrap();
        let response = dispatch(&Method::DELETE, "/api/v1/blog/42", &routes);
        assert_eq!(response.status(), 405);
    }

    #[tokio::test]
    async fn test_dispatch_is_idempotent() {
        let routes = endpoints::routes().unwrap();
        for _ in 0..3 {
            let response = dispatch(&Method::GET, "/api/v1/blog/bulk", &routes);
            assert_eq!(response.status(), 200);
            assert_eq!(body_string(response).await, "blog bulk get");
        }
    }
}

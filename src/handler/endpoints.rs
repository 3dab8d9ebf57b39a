//! API endpoint handlers
//!
//! Each handler is a placeholder that returns a fixed plain-text body. The
//! real signup/signin/blog logic does not exist yet; only the routing surface
//! is declared.

use crate::http;
use crate::routing::{RequestContext, RouteTable};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response};

/// Build the application route table
///
/// Routes are declared once at startup; the table is immutable afterwards.
pub fn routes() -> Result<RouteTable, String> {
    let mut table = RouteTable::new();
    table.register(Method::POST, "/api/v1/user/signup", user_signup)?;
    table.register(Method::POST, "/api/v1/user/signin", user_signin)?;
    table.register(Method::POST, "/api/v1/blog", blog_add)?;
    table.register(Method::PUT, "/api/v1/blog", blog_update)?;
    table.register(Method::GET, "/api/v1/blog/:id", blog_get)?;
    table.register(Method::GET, "/api/v1/blog/bulk", blog_bulk_get)?;
    Ok(table)
}

fn user_signup(_ctx: &RequestContext) -> Response<Full<Bytes>> {
    http::build_text_response("signup")
}

fn user_signin(_ctx: &RequestContext) -> Response<Full<Bytes>> {
    http::build_text_response("signin")
}

fn blog_add(_ctx: &RequestContext) -> Response<Full<Bytes>> {
    http::build_text_response("blog add")
}

fn blog_update(_ctx: &RequestContext) -> Response<Full<Bytes>> {
    http::build_text_response("blog update")
}

/// Fetch a single post. The bound `:id` has nowhere to be looked up yet, so
/// the body stays a placeholder.
fn blog_get(ctx: &RequestContext) -> Response<Full<Bytes>> {
    if ctx.params.get("id").is_none() {
        // The pattern binds id on every match, so this only trips if the
        // route is ever re-registered without the parameter
        return http::build_404_response();
    }
    http::build_text_response("blog get")
}

fn blog_bulk_get(_ctx: &RequestContext) -> Response<Full<Bytes>> {
    http::build_text_response("blog bulk get")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_build_without_conflicts() {
        let table = routes().unwrap();
        assert_eq!(table.len(), 6);
    }
}

//! Route table
//!
//! Holds the (method, pattern, handler) triples declared at startup and
//! resolves incoming requests to a handler. The table is kept sorted by match
//! precedence at registration time, so lookup is a first-match scan and the
//! result never depends on registration order.

use super::pattern::{PathParams, PathPattern};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response};

/// View of the request passed to a handler
pub struct RequestContext {
    /// Parameters captured by the matched pattern
    pub params: PathParams,
}

/// A route handler: takes the request context, returns a complete response
pub type Handler = fn(&RequestContext) -> Response<Full<Bytes>>;

/// One registered route
struct Route {
    method: Method,
    pattern: PathPattern,
    handler: Handler,
}

/// Result of resolving a (method, path) pair against the table
pub enum RouteLookup {
    /// A route matched; invoke the handler with the captured params
    Found {
        handler: Handler,
        params: PathParams,
    },
    /// Some route matched the path, but none with this method
    MethodMismatch { allowed: Vec<Method> },
    /// No route matched the path at all
    NotFound,
}

/// Ordered collection of routes, immutable after startup
#[derive(Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route, keeping the table in precedence order
    ///
    /// Rejects patterns that fail to compile and duplicate (method, pattern)
    /// pairs, which would make matching ambiguous.
    pub fn register(&mut self, method: Method, pattern: &str, handler: Handler) -> Result<(), String> {
        let pattern = PathPattern::parse(pattern)?;

        if self
            .routes
            .iter()
            .any(|r| r.method == method && r.pattern.raw() == pattern.raw())
        {
            return Err(format!("duplicate route: {method} {}", pattern.raw()));
        }

        let position = self
            .routes
            .partition_point(|r| r.pattern.precedence_cmp(&pattern) != std::cmp::Ordering::Greater);
        self.routes.insert(
            position,
            Route {
                method,
                pattern,
                handler,
            },
        );
        Ok(())
    }

    /// Resolve a request to a handler
    ///
    /// Scans routes in precedence order (literal segments before parameters).
    /// A path match with the wrong method keeps scanning; if nothing with the
    /// right method matches, the methods seen along the way are reported for
    /// the `Allow` header.
    pub fn lookup(&self, method: &Method, path: &str) -> RouteLookup {
        let mut allowed: Vec<Method> = Vec::new();

        for route in &self.routes {
            if let Some(params) = route.pattern.matches(path) {
                if route.method == *method {
                    return RouteLookup::Found {
                        handler: route.handler,
                        params,
                    };
                }
                if !allowed.contains(&route.method) {
                    allowed.push(route.method.clone());
                }
            }
        }

        if allowed.is_empty() {
            RouteLookup::NotFound
        } else {
            RouteLookup::MethodMismatch { allowed }
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub(_ctx: &RequestContext) -> Response<Full<Bytes>> {
        Response::new(Full::new(Bytes::from("stub")))
    }

    fn other(_ctx: &RequestContext) -> Response<Full<Bytes>> {
        Response::new(Full::new(Bytes::from("other")))
    }

    #[test]
    fn test_register_rejects_duplicate() {
        let mut table = RouteTable::new();
        table.register(Method::GET, "/api/v1/blog/:id", stub).unwrap();
        let err = table.register(Method::GET, "/api/v1/blog/:id", other);
        assert!(err.is_err());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_same_pattern_different_methods_allowed() {
        let mut table = RouteTable::new();
        table.register(Method::POST, "/api/v1/blog", stub).unwrap();
        table.register(Method::PUT, "/api/v1/blog", other).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_lookup_found_binds_params() {
        let mut table = RouteTable::new();
        table.register(Method::GET, "/api/v1/blog/:id", stub).unwrap();

        match table.lookup(&Method::GET, "/api/v1/blog/123") {
            RouteLookup::Found { params, .. } => {
                assert_eq!(params.get("id"), Some("123"));
            }
            _ => panic!("expected a match"),
        }
    }

    #[test]
    fn test_lookup_not_found() {
        let mut table = RouteTable::new();
        table.register(Method::GET, "/api/v1/blog/:id", stub).unwrap();

        assert!(matches!(
            table.lookup(&Method::GET, "/api/v1/unknown"),
            RouteLookup::NotFound
        ));
    }

    #[test]
    fn test_lookup_method_mismatch_reports_allowed() {
        let mut table = RouteTable::new();
        table.register(Method::POST, "/api/v1/blog", stub).unwrap();
        table.register(Method::PUT, "/api/v1/blog", other).unwrap();

        match table.lookup(&Method::DELETE, "/api/v1/blog") {
            RouteLookup::MethodMismatch { allowed } => {
                assert!(allowed.contains(&Method::POST));
                assert!(allowed.contains(&Method::PUT));
            }
            _ => panic!("expected method mismatch"),
        }
    }

    #[test]
    fn test_literal_beats_param_regardless_of_registration_order() {
        // Param route registered first must not capture the literal path
        let mut table = RouteTable::new();
        table.register(Method::GET, "/api/v1/blog/:id", stub).unwrap();
        table.register(Method::GET, "/api/v1/blog/bulk", other).unwrap();

        match table.lookup(&Method::GET, "/api/v1/blog/bulk") {
            RouteLookup::Found { params, .. } => {
                assert!(params.get("id").is_none(), "bulk must not bind id");
            }
            _ => panic!("expected a match"),
        }

        // Any other token still reaches the param route
        match table.lookup(&Method::GET, "/api/v1/blog/bulky") {
            RouteLookup::Found { params, .. } => {
                assert_eq!(params.get("id"), Some("bulky"));
            }
            _ => panic!("expected a match"),
        }
    }
}

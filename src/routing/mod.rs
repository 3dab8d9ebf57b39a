//! Routing module
//!
//! Provides declarative route-to-handler dispatch:
//! - Path patterns compiled from `/api/v1/blog/:id`-style strings
//! - Named parameter capture
//! - Literal-over-parameter match precedence

mod pattern;
mod table;

pub use pattern::{PathParams, PathPattern};
pub use table::{Handler, RequestContext, RouteLookup, RouteTable};

//! Path pattern compilation and matching
//!
//! A route path like `/api/v1/blog/:id` is compiled once at registration time
//! into a sequence of segments. Literal segments must match exactly; a `:name`
//! segment matches any single non-empty path segment and binds its value.

use std::cmp::Ordering;

/// One compiled segment of a route path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must match the path segment exactly
    Literal(String),
    /// Matches any non-empty path segment and binds it under the given name
    Param(String),
}

/// A compiled route path pattern
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

/// Parameter bindings captured by a successful match
#[derive(Debug, Clone, Default)]
pub struct PathParams(Vec<(String, String)>);

impl PathParams {
    /// Look up a captured parameter by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

impl PathPattern {
    /// Compile a route path string into a pattern
    ///
    /// The pattern must start with `/`. Segments starting with `:` declare a
    /// named parameter; everything else is a literal. Empty segments and
    /// unnamed parameters (`:` alone) are rejected.
    pub fn parse(pattern: &str) -> Result<Self, String> {
        let Some(rest) = pattern.strip_prefix('/') else {
            return Err(format!("route pattern must start with '/': {pattern:?}"));
        };

        let mut segments = Vec::new();
        if !rest.is_empty() {
            for part in rest.split('/') {
                if part.is_empty() {
                    return Err(format!("route pattern contains empty segment: {pattern:?}"));
                }
                if let Some(name) = part.strip_prefix(':') {
                    if name.is_empty() {
                        return Err(format!(
                            "route pattern contains unnamed parameter: {pattern:?}"
                        ));
                    }
                    segments.push(Segment::Param(name.to_string()));
                } else {
                    segments.push(Segment::Literal(part.to_string()));
                }
            }
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    /// The original pattern string this was compiled from
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Match a request path against this pattern
    ///
    /// Returns the captured parameters on success. Segment counts must be
    /// equal; a parameter never matches an empty segment, so trailing-slash
    /// paths do not bind.
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let parts = split_path(path)?;
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = Vec::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) => {
                    if literal != part {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    params.push((name.clone(), part.to_string()));
                }
            }
        }

        Some(PathParams(params))
    }

    /// Ordering used to keep a route table sorted by match precedence
    ///
    /// Compared segment by segment: a literal sorts before a parameter at the
    /// same position, so `/blog/bulk` is always tried before `/blog/:id`
    /// regardless of registration order. Ties are broken lexically to keep
    /// the order deterministic.
    pub(crate) fn precedence_cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.segments.iter().zip(&other.segments) {
            match (a, b) {
                (Segment::Literal(_), Segment::Param(_)) => return Ordering::Less,
                (Segment::Param(_), Segment::Literal(_)) => return Ordering::Greater,
                (Segment::Literal(x), Segment::Literal(y)) => {
                    if x != y {
                        return x.cmp(y);
                    }
                }
                (Segment::Param(_), Segment::Param(_)) => {}
            }
        }
        self.segments.len().cmp(&other.segments.len())
    }
}

/// Split a request path into segments, rejecting paths without a leading `/`
fn split_path(path: &str) -> Option<Vec<&str>> {
    let rest = path.strip_prefix('/')?;
    if rest.is_empty() {
        Some(Vec::new())
    } else {
        Some(rest.split('/').collect())
    }
}

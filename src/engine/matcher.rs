//! Route matching logic.
//!
//! # Responsibilities
//! - Normalize request paths (strip query suffix, strip trailing slash)
//! - Resolve the first structurally matching route (insertion order)
//! - Extract `:name` path parameters and query-string pairs
//!
//! # Design Decisions
//! - Per-segment string comparison, no regex; `:`-prefixed pattern segments
//!   match any non-empty path segment, so patterns may carry any number of
//!   parameters
//! - Duplicate query keys: last occurrence wins

use std::collections::HashMap;

use axum::http::Method;

use crate::engine::registry::{Route, RouteRegistry};

/// Strip the query suffix and a single trailing slash (unless the path is
/// just `/`).
pub fn normalize_path(raw: &str) -> &str {
    let path = raw.split('?').next().unwrap_or(raw);
    if path.len() > 1 && path.ends_with('/') {
        &path[..path.len() - 1]
    } else {
        path
    }
}

/// Segment-wise comparison of a pattern against an already-normalized path.
///
/// Succeeds when segment counts are equal and every literal pattern segment
/// equals its path segment; parameter segments match any non-empty value.
pub fn structural_match(pattern: &str, path: &str) -> bool {
    let pattern_segments: Vec<&str> = pattern.split('/').collect();
    let path_segments: Vec<&str> = path.split('/').collect();

    if pattern_segments.len() != path_segments.len() {
        return false;
    }

    pattern_segments
        .iter()
        .zip(path_segments.iter())
        .all(|(pattern_segment, path_segment)| {
            if pattern_segment.starts_with(':') {
                !path_segment.is_empty()
            } else {
                pattern_segment == path_segment
            }
        })
}

/// Resolve the first route matching the method and path, or `None` (the
/// caller emits 404).
pub fn resolve<'a>(registry: &'a RouteRegistry, method: &Method, raw_path: &str) -> Option<&'a Route> {
    let path = normalize_path(raw_path);
    registry.routes().iter().find(|route| {
        route.method == *method && (route.pattern == path || structural_match(&route.pattern, path))
    })
}

/// Bind every `:name` pattern segment to the corresponding path segment.
///
/// Returns an empty map when the pattern captures nothing.
pub fn extract_params(pattern: &str, raw_path: &str) -> HashMap<String, String> {
    if !pattern.contains(':') {
        return HashMap::new();
    }

    let path = normalize_path(raw_path);
    pattern
        .split('/')
        .zip(path.split('/'))
        .filter_map(|(pattern_segment, path_segment)| {
            let name = pattern_segment.strip_prefix(':')?;
            if name.is_empty() || path_segment.is_empty() {
                return None;
            }
            Some((name.to_string(), path_segment.to_string()))
        })
        .collect()
}

/// Split the query suffix into key/value pairs; later duplicates overwrite
/// earlier ones, a bare key maps to the empty string.
pub fn extract_query(raw_path: &str) -> HashMap<String, String> {
    let Some((_, query)) = raw_path.split_once('?') else {
        return HashMap::new();
    };

    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

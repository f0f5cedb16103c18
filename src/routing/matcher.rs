//! Path matching logic.
//!
//! # Responsibilities
//! - Split a request path into segments
//! - Compare segments against a `PathPattern` in lockstep
//! - Bind named parameters for the matched request
//!
//! # Design Decisions
//! - Pure function: no allocation beyond the returned `Params`
//! - Path matching is case-sensitive, no percent-decoding
//! - `**` is greedy and terminal (matches zero or more trailing segments)
//! - No regex to guarantee O(n) matching

use std::collections::HashMap;

use super::pattern::{PathPattern, Segment};

/// Parameters bound by a successful match, keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: HashMap<String, String>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a parameter value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn bind(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_string(), value.to_string());
    }
}

impl From<Params> for HashMap<String, String> {
    fn from(params: Params) -> Self {
        params.values
    }
}

/// Non-empty segments of an absolute request path.
///
/// Empty segments are dropped, so trailing and repeated slashes collapse:
/// `/users/` splits like `/users`, and `/users//42` like `/users/42`.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

/// Match `path` against `pattern`.
///
/// Returns the bound parameters, or `None` if the path does not match.
pub fn match_path(path: &str, pattern: &PathPattern) -> Option<Params> {
    let request = split_path(path);
    let mut params = Params::new();

    for (index, segment) in pattern.segments().iter().enumerate() {
        let actual = match segment {
            Segment::MultiWildcard => return Some(params),
            _ => request.get(index)?,
        };

        match segment {
            Segment::Literal(_) => {
                if segment.literal_text() != Some(*actual) {
                    return None;
                }
            }
            Segment::Param(name) => params.bind(name, actual),
            Segment::Wildcard | Segment::MultiWildcard => {}
        }
    }

    // Pattern exhausted without `**`: the request must be exhausted too.
    (request.len() == pattern.len()).then_some(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(tokens: &[&str]) -> PathPattern {
        PathPattern::new(tokens).unwrap()
    }

    #[test]
    fn test_param_binding() {
        let params = match_path("/users/42", &pattern(&["/users", ":id"])).unwrap();
        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_missing_segment() {
        assert!(match_path("/users", &pattern(&["/users", ":id"])).is_none());
    }

    #[test]
    fn test_extra_segment() {
        assert!(match_path("/users/42/posts", &pattern(&["/users", ":id"])).is_none());
    }

    #[test]
    fn test_multi_wildcard_any_depth() {
        let files = pattern(&["/files", "**"]);
        for path in ["/files", "/files/a", "/files/a/b/c"] {
            let params = match_path(path, &files).unwrap();
            assert!(params.is_empty(), "{path} should bind nothing");
        }
        assert!(match_path("/other/a", &files).is_none());
    }

    #[test]
    fn test_multi_wildcard_keeps_earlier_params() {
        let params = match_path("/u/7/x/y", &pattern(&["/u", ":id", "**"])).unwrap();
        assert_eq!(params.get("id"), Some("7"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_single_wildcard() {
        let p = pattern(&["/a", "*", "/b"]);
        assert!(match_path("/a/x/b", &p).is_some());
        assert!(match_path("/a/x/y", &p).is_none());
        assert!(match_path("/a/b", &p).is_none());
    }

    #[test]
    fn test_literal_is_case_sensitive() {
        assert!(match_path("/Users", &pattern(&["/users"])).is_none());
    }

    #[test]
    fn test_no_percent_decoding() {
        let params = match_path("/tags/a%20b", &pattern(&["/tags", ":tag"])).unwrap();
        assert_eq!(params.get("tag"), Some("a%20b"));
    }

    #[test]
    fn test_empty_pattern_matches_root_only() {
        let root = PathPattern::root();
        assert!(match_path("/", &root).is_some());
        assert!(match_path("", &root).is_some());
        assert!(match_path("/a", &root).is_none());
    }

    #[test]
    fn test_bare_multi_wildcard_matches_everything() {
        let all = pattern(&["**"]);
        assert!(match_path("/", &all).is_some());
        assert!(match_path("/a/b", &all).is_some());
    }

    #[test]
    fn test_empty_segments_are_skipped() {
        let p = pattern(&["/users", ":id"]);
        assert_eq!(match_path("/users//42/", &p).unwrap().get("id"), Some("42"));
    }

    #[test]
    fn test_trailing_slash_collapses() {
        assert_eq!(split_path("/users/"), vec!["users"]);
        assert!(match_path("/users/", &pattern(&["/users"])).is_some());
    }
}

//! Resource identifiers and URI routing.
//!
//! Format: `<scheme>://<authority>/<segment>/<segment>...`
//!
//! Examples:
//! - `content://com.example.android.inventory/inventory`
//! - `content://com.example.android.inventory/inventory/42`
//!
//! [`UriMatcher`] is an immutable routing table. It is assembled once with
//! [`UriMatcher::builder`] and classifies every incoming identifier into a
//! [`Dispatch`] code.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A parsed resource identifier.
///
/// Empty path segments are dropped while parsing, so
/// `content://a/inventory/` and `content://a/inventory` are the same URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentUri {
    scheme: String,
    authority: String,
    segments: Vec<String>,
}

impl ContentUri {
    /// Build a URI from its parts.
    pub fn new<I, S>(scheme: impl Into<String>, authority: impl Into<String>, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scheme: scheme.into(),
            authority: authority.into(),
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a URI string.
    ///
    /// # Errors
    ///
    /// Returns `UnrecognizedResource` when the string has no `scheme://`
    /// prefix or an empty authority.
    pub fn parse(uri: &str) -> Result<Self> {
        let unrecognized = || Error::UnrecognizedResource {
            uri: uri.to_string(),
        };

        let (scheme, rest) = uri.split_once("://").ok_or_else(unrecognized)?;
        if scheme.is_empty() {
            return Err(unrecognized());
        }

        let (authority, path) = rest.split_once('/').unwrap_or((rest, ""));
        if authority.is_empty() {
            return Err(unrecognized());
        }

        Ok(Self::new(
            scheme,
            authority,
            path.split('/').filter(|s| !s.is_empty()),
        ))
    }

    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    #[must_use]
    pub fn authority(&self) -> &str {
        &self.authority
    }

    #[must_use]
    pub fn path_segments(&self) -> &[String] {
        &self.segments
    }

    /// Append a numeric id as a new trailing path segment.
    #[must_use]
    pub fn with_appended_id(&self, id: i64) -> Self {
        let mut uri = self.clone();
        uri.segments.push(id.to_string());
        uri
    }

    /// The trailing segment parsed as a non-negative id, if it is one.
    #[must_use]
    pub fn last_id(&self) -> Option<i64> {
        self.segments.last().and_then(|s| parse_id_segment(s))
    }

    /// True when `other` lives strictly underneath this URI.
    ///
    /// `content://a/inventory` is an ancestor of `content://a/inventory/3`,
    /// but not of itself and not of `content://a/inventory2`.
    #[must_use]
    pub fn is_ancestor_of(&self, other: &ContentUri) -> bool {
        self.scheme == other.scheme
            && self.authority == other.authority
            && self.segments.len() < other.segments.len()
            && other.segments.starts_with(&self.segments)
    }
}

impl fmt::Display for ContentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.authority)?;
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for ContentUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for ContentUri {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ContentUri {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ContentUri::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Digits only, so `-1` or `+1` never match.
fn parse_id_segment(segment: &str) -> Option<i64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

// ── Routing ──────────────────────────────────────────────────

/// Code a route is registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteCode {
    Collection,
    SingleItem,
}

/// Classification of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Operate over all items.
    Collection,
    /// Operate over exactly the item with this id.
    SingleItem(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `#`: a non-negative integer.
    Number,
    /// `*`: any single segment.
    Text,
}

#[derive(Debug, Clone)]
struct Route {
    authority: String,
    pattern: Vec<Segment>,
    code: RouteCode,
}

impl Route {
    /// Returns the first `#` capture (or `None` when the pattern has none)
    /// on a match.
    fn matches(&self, uri: &ContentUri) -> Option<Option<i64>> {
        if self.authority != uri.authority() || self.pattern.len() != uri.path_segments().len() {
            return None;
        }

        let mut captured = None;
        for (segment, actual) in self.pattern.iter().zip(uri.path_segments()) {
            match segment {
                Segment::Literal(expected) if expected == actual => {}
                Segment::Literal(_) => return None,
                Segment::Number => {
                    let id = parse_id_segment(actual)?;
                    captured.get_or_insert(id);
                }
                Segment::Text => {}
            }
        }
        Some(captured)
    }
}

/// Builder for an immutable [`UriMatcher`].
#[derive(Debug)]
pub struct UriMatcherBuilder {
    scheme: String,
    routes: Vec<Route>,
}

impl UriMatcherBuilder {
    /// Register `pattern` (e.g. `"inventory"` or `"inventory/#"`) under `authority`.
    #[must_use]
    pub fn route(mut self, authority: &str, pattern: &str, code: RouteCode) -> Self {
        let pattern = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s {
                "#" => Segment::Number,
                "*" => Segment::Text,
                literal => Segment::Literal(literal.to_string()),
            })
            .collect();

        self.routes.push(Route {
            authority: authority.to_string(),
            pattern,
            code,
        });
        self
    }

    #[must_use]
    pub fn build(self) -> UriMatcher {
        UriMatcher {
            scheme: self.scheme,
            routes: self.routes,
        }
    }
}

/// Immutable URI routing table.
///
/// Routes are tried in registration order; the first match wins.
#[derive(Debug, Clone)]
pub struct UriMatcher {
    scheme: String,
    routes: Vec<Route>,
}

impl UriMatcher {
    /// Start a routing table accepting URIs with the given scheme.
    #[must_use]
    pub fn builder(scheme: &str) -> UriMatcherBuilder {
        UriMatcherBuilder {
            scheme: scheme.to_string(),
            routes: Vec::new(),
        }
    }

    /// Classify a parsed URI.
    ///
    /// # Errors
    ///
    /// Returns `UnrecognizedResource` when no route matches, or when a
    /// single-item route matched without capturing an id.
    pub fn match_uri(&self, uri: &ContentUri) -> Result<Dispatch> {
        let unrecognized = || Error::UnrecognizedResource {
            uri: uri.to_string(),
        };

        if uri.scheme() != self.scheme {
            return Err(unrecognized());
        }

        let (code, captured) = self
            .routes
            .iter()
            .find_map(|route| route.matches(uri).map(|captured| (route.code, captured)))
            .ok_or_else(unrecognized)?;

        match code {
            RouteCode::Collection => Ok(Dispatch::Collection),
            RouteCode::SingleItem => captured.map(Dispatch::SingleItem).ok_or_else(unrecognized),
        }
    }

    /// Parse and classify a raw URI string.
    ///
    /// # Errors
    ///
    /// Returns `UnrecognizedResource` if parsing or matching fails.
    pub fn classify(&self, uri: &str) -> Result<Dispatch> {
        self.match_uri(&ContentUri::parse(uri)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUTH: &str = "com.example.android.inventory";

    fn matcher() -> UriMatcher {
        UriMatcher::builder("content")
            .route(AUTH, "inventory", RouteCode::Collection)
            .route(AUTH, "inventory/#", RouteCode::SingleItem)
            .build()
    }

    #[test]
    fn test_uri_roundtrip() {
        let uri = ContentUri::parse("content://com.example.android.inventory/inventory/7").unwrap();
        assert_eq!(uri.scheme(), "content");
        assert_eq!(uri.authority(), AUTH);
        assert_eq!(uri.path_segments(), ["inventory", "7"]);
        assert_eq!(uri.last_id(), Some(7));
        assert_eq!(uri.to_string(), "content://com.example.android.inventory/inventory/7");
    }

    #[test]
    fn test_invalid_uri() {
        assert!(ContentUri::parse("inventory").is_err());
        assert!(ContentUri::parse("://auth/inventory").is_err());
        assert!(ContentUri::parse("content:///inventory").is_err());
    }

    #[test]
    fn test_collection_and_single_item() {
        let m = matcher();
        assert_eq!(
            m.classify("content://com.example.android.inventory/inventory").unwrap(),
            Dispatch::Collection
        );
        for n in [0_i64, 1, 42, 9_007_199_254_740_993] {
            let uri = format!("content://com.example.android.inventory/inventory/{n}");
            assert_eq!(m.classify(&uri).unwrap(), Dispatch::SingleItem(n));
        }
    }

    #[test]
    fn test_other_shapes_are_unrecognized() {
        let m = matcher();
        let bad = [
            "content://com.example.android.inventory",
            "content://com.example.android.inventory/stock",
            "content://com.example.android.inventory/inventory/abc",
            "content://com.example.android.inventory/inventory/-1",
            "content://com.example.android.inventory/inventory/+1",
            "content://com.example.android.inventory/inventory/1/2",
            "content://com.example.android.inventory/inventory/99999999999999999999",
            "content://other.authority/inventory",
            "http://com.example.android.inventory/inventory",
            "not a uri",
        ];
        for uri in bad {
            let err = m.classify(uri).unwrap_err();
            assert!(
                matches!(err, Error::UnrecognizedResource { .. }),
                "{uri} should be unrecognized"
            );
        }
    }

    #[test]
    fn test_first_registered_route_wins() {
        let m = UriMatcher::builder("content")
            .route(AUTH, "inventory/*", RouteCode::Collection)
            .route(AUTH, "inventory/#", RouteCode::SingleItem)
            .build();
        assert_eq!(
            m.classify("content://com.example.android.inventory/inventory/3").unwrap(),
            Dispatch::Collection
        );
    }

    #[test]
    fn test_ancestry() {
        let collection = ContentUri::parse("content://a/inventory").unwrap();
        let item = collection.with_appended_id(3);
        let lookalike = ContentUri::parse("content://a/inventory2/3").unwrap();

        assert!(collection.is_ancestor_of(&item));
        assert!(!item.is_ancestor_of(&collection));
        assert!(!collection.is_ancestor_of(&collection));
        assert!(!collection.is_ancestor_of(&lookalike));
    }

    #[test]
    fn test_serde_as_string() {
        let uri = ContentUri::parse("content://a/inventory/5").unwrap();
        let json = serde_json::to_string(&uri).unwrap();
        assert_eq!(json, "\"content://a/inventory/5\"");
        let back: ContentUri = serde_json::from_str(&json).unwrap();
        assert_eq!(back, uri);
    }
}

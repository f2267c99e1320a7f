//! A single compiled route pattern.
//!
//! Patterns are plain strings with `:name` segments, e.g.
//! `":controller/:action/:id"`. Each segment becomes a named capture group
//! (`s0`, `s1`, ...) in an anchored regex; the same pattern is used in
//! reverse to build URLs from a parameter set.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, trace};

use super::core::RouteError;
use super::params::Params;

/// Match source used for a segment without a condition.
///
/// Includes the comma so a single segment can carry an id list (`1,2,3`).
pub const DEFAULT_SEGMENT_PATTERN: &str = "[a-zA-Z0-9_,]+";

/// Maximum number of segments before the segment list spills to the heap.
pub const MAX_INLINE_SEGMENTS: usize = 8;

/// Segment names as written in the pattern, colon included (`":id"`).
pub type SegmentVec = SmallVec<[Arc<str>; MAX_INLINE_SEGMENTS]>;

#[allow(clippy::expect_used)]
static SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":([A-Za-z0-9_]+)").expect("segment regex is valid"));

/// Registration-time options for a route.
///
/// `conditions` restricts what a segment may match (keys carry the colon,
/// `":id"`); everything in `statics` is merged into every match and must
/// agree with URL generation requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteOptions {
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub conditions: HashMap<String, String>,
    #[serde(default, flatten)]
    pub statics: BTreeMap<String, String>,
}

impl RouteOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a static option (`controller`, `action`, ...).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.statics.insert(key.into(), value.to_string());
        self
    }

    /// Restrict a segment. A missing leading colon is added.
    #[must_use]
    pub fn condition(mut self, segment: &str, pattern: impl Into<String>) -> Self {
        self.conditions.insert(colon_prefixed(segment), pattern.into());
        self
    }

    /// Overlay `other` on top of `self`: its statics and conditions win.
    #[must_use]
    pub fn merged(mut self, other: &RouteOptions) -> Self {
        for (k, v) in &other.statics {
            self.statics.insert(k.clone(), v.clone());
        }
        for (k, v) in &other.conditions {
            self.conditions.insert(k.clone(), v.clone());
        }
        self
    }
}

/// One URL pattern compiled into a matcher and a URL generator.
///
/// Routes are immutable once built; the router only ever appends new ones.
#[derive(Debug, Clone)]
pub struct Route {
    pattern: String,
    static_options: BTreeMap<String, String>,
    segment_names: SegmentVec,
    conditions: HashMap<String, String>,
    /// Segment names plus one `":key"` per static option, sorted.
    param_keys: Vec<String>,
    matcher: Regex,
}

impl Route {
    /// Compile `pattern` with the given options.
    ///
    /// # Errors
    ///
    /// [`RouteError::InvalidPattern`] when a condition (or the pattern's own
    /// literal text) does not form a valid regex.
    pub fn new(pattern: impl Into<String>, options: RouteOptions) -> Result<Self, RouteError> {
        let pattern = pattern.into();
        let RouteOptions {
            conditions,
            statics: static_options,
        } = options;

        let segment_names: SegmentVec = SEGMENT_RE
            .find_iter(&pattern)
            .map(|m| Arc::<str>::from(m.as_str()))
            .collect();

        let mut param_keys: Vec<String> = segment_names
            .iter()
            .map(|s| s.to_string())
            .chain(static_options.keys().map(|k| colon_prefixed(k)))
            .collect();
        param_keys.sort();

        let source = Self::matcher_source(&pattern, &conditions);
        let matcher = Regex::new(&source).map_err(|e| RouteError::InvalidPattern {
            pattern: pattern.clone(),
            source: e,
        })?;

        debug!(
            pattern = %pattern,
            matcher = %matcher.as_str(),
            segments = ?segment_names,
            statics = ?static_options,
            "Route compiled"
        );

        Ok(Self {
            pattern,
            static_options,
            segment_names,
            conditions,
            param_keys,
            matcher,
        })
    }

    /// Build the anchored regex source for `pattern`.
    ///
    /// The `i`th `:name` occurrence is replaced in place by
    /// `(?P<s{i}><condition or default>)`; the surrounding text is kept as
    /// regex source. Groups inside a condition therefore never shift which
    /// capture belongs to which segment.
    pub(crate) fn matcher_source(pattern: &str, conditions: &HashMap<String, String>) -> String {
        let mut source = String::with_capacity(pattern.len() + 16);
        source.push('^');
        let mut last = 0;
        for (index, m) in SEGMENT_RE.find_iter(pattern).enumerate() {
            source.push_str(&pattern[last..m.start()]);
            let condition = conditions
                .get(m.as_str())
                .map(String::as_str)
                .unwrap_or(DEFAULT_SEGMENT_PATTERN);
            source.push_str(&format!("(?P<{}>", group_name(index)));
            source.push_str(condition);
            source.push(')');
            last = m.end();
        }
        source.push_str(&pattern[last..]);
        source.push('$');
        source
    }

    /// The raw pattern string.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Options fixed at registration time.
    #[must_use]
    pub fn static_options(&self) -> &BTreeMap<String, String> {
        &self.static_options
    }

    /// Segment names in order of appearance, without the colon.
    #[must_use]
    pub fn segment_names(&self) -> Vec<&str> {
        self.segment_names.iter().map(|s| strip_colon(s)).collect()
    }

    /// Per-segment conditions, keyed with the colon (`":id"`).
    #[must_use]
    pub fn conditions(&self) -> &HashMap<String, String> {
        &self.conditions
    }

    /// The compiled, anchored matcher.
    #[must_use]
    pub fn matcher(&self) -> &Regex {
        &self.matcher
    }

    /// True when the whole of `url` matches this route.
    #[must_use]
    pub fn recognises(&self, url: &str) -> bool {
        self.matcher.is_match(url)
    }

    /// Parameters for `url`, or `None` if the route does not recognise it.
    ///
    /// Each segment reads its own named group; static options are applied
    /// afterwards and therefore win over a captured value of the same name.
    /// A repeated segment name keeps its last occurrence.
    #[must_use]
    pub fn matches_for(&self, url: &str) -> Option<Params> {
        let caps = self.matcher.captures(url)?;
        let mut params = Params::new();
        for (index, name) in self.segment_names.iter().enumerate() {
            if let Some(value) = caps.name(&group_name(index)) {
                params.insert(strip_colon(name).to_string(), value.as_str().to_string());
            }
        }
        for (k, v) in &self.static_options {
            params.insert(k.clone(), v.clone());
        }
        trace!(pattern = %self.pattern, url = %url, params = ?params, "Route matched");
        Some(params)
    }

    /// Build a URL from exactly this route's key set.
    ///
    /// Returns `None` when a supplied value contradicts a static option, or
    /// when the supplied keys are not exactly the route's segments plus its
    /// static option keys (no more, no fewer).
    #[must_use]
    pub fn url_for(&self, options: &Params) -> Option<String> {
        for (k, v) in &self.static_options {
            if let Some(given) = options.get(k) {
                if given != v {
                    return None;
                }
            }
        }

        let mut keys: Vec<String> = options.keys().map(|k| colon_prefixed(k)).collect();
        keys.sort();
        if keys != self.param_keys {
            return None;
        }

        Some(self.substitute(options))
    }

    /// Like [`url_for`](Self::url_for), but static options missing from
    /// `options` are filled in first, so named routes may omit what the route
    /// already fixes.
    #[must_use]
    pub fn url_for_named(&self, options: &Params) -> Option<String> {
        let mut filled = options.clone();
        for (k, v) in &self.static_options {
            filled.entry(k.clone()).or_insert_with(|| v.clone());
        }
        self.url_for(&filled)
    }

    fn substitute(&self, options: &Params) -> String {
        SEGMENT_RE
            .replace_all(&self.pattern, |caps: &regex::Captures<'_>| {
                let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                match options.get(name) {
                    Some(value) => value.clone(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

fn group_name(index: usize) -> String {
    format!("s{index}")
}

pub(crate) fn colon_prefixed(name: &str) -> String {
    if name.starts_with(':') {
        name.to_string()
    } else {
        format!(":{name}")
    }
}

fn strip_colon(name: &str) -> &str {
    name.strip_prefix(':').unwrap_or(name)
}

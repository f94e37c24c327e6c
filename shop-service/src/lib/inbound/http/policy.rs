//! Path-based access rules.
//!
//! Patterns use a small ant-style syntax: literal segments, `*` for exactly
//! one segment, and a trailing `/**` matching the prefix itself or anything
//! below it. Rules are checked in order and the first match decides. A path
//! no rule matches requires an authenticated caller.

/// Access requirement for a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessClass {
    Public,
    RequiresAuthenticated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Wildcard,
}

/// A single `pattern -> class` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRule {
    pattern: String,
    segments: Vec<Segment>,
    recursive: bool,
    class: AccessClass,
}

impl AccessRule {
    pub fn new(pattern: &str, class: AccessClass) -> Self {
        let (body, recursive) = match pattern.strip_suffix("/**") {
            Some(prefix) => (prefix, true),
            None => (pattern, false),
        };

        let segments = split(body)
            .map(|segment| match segment {
                "*" => Segment::Wildcard,
                literal => Segment::Literal(literal.to_string()),
            })
            .collect();

        Self {
            pattern: pattern.to_string(),
            segments,
            recursive,
            class,
        }
    }

    pub fn public(pattern: &str) -> Self {
        Self::new(pattern, AccessClass::Public)
    }

    pub fn authenticated(pattern: &str) -> Self {
        Self::new(pattern, AccessClass::RequiresAuthenticated)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn class(&self) -> AccessClass {
        self.class
    }

    pub fn matches(&self, path: &str) -> bool {
        let path: Vec<&str> = split(path).collect();

        let length_ok = if self.recursive {
            path.len() >= self.segments.len()
        } else {
            path.len() == self.segments.len()
        };

        length_ok
            && self
                .segments
                .iter()
                .zip(&path)
                .all(|(segment, actual)| match segment {
                    Segment::Wildcard => true,
                    Segment::Literal(literal) => literal == actual,
                })
    }
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// Ordered rule table consulted for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    rules: Vec<AccessRule>,
}

impl AccessPolicy {
    pub fn new(rules: Vec<AccessRule>) -> Self {
        Self { rules }
    }

    /// Route table of the shop API.
    pub fn default_rules() -> Vec<AccessRule> {
        vec![
            AccessRule::public("/api/auth/**"),
            AccessRule::public("/api/products/**"),
            AccessRule::authenticated("/api/user/me"),
        ]
    }

    /// Class of the first rule matching `path`, or `RequiresAuthenticated`.
    pub fn classify(&self, path: &str) -> AccessClass {
        self.rules
            .iter()
            .find(|rule| rule.matches(path))
            .map(AccessRule::class)
            .unwrap_or(AccessClass::RequiresAuthenticated)
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::new(Self::default_rules())
    }
}

//! Cache key construction.
//!
//! Keys are built from a namespace (the query shape) plus entity ids and
//! named parameters. Every segment is length-prefixed, so no parameter value
//! can be mistaken for a separator and two distinct queries never collide.
//!
//! Layout: `<ns-len>:<ns>` followed by `e<len>:<id>` for each entity, then
//! `p<len>:<name><len>:<value>` for each named parameter sorted by name.

use std::collections::BTreeMap;
use std::fmt;

// == Namespaces ==
/// A single user record.
pub const NS_USER: &str = "user";
/// A single chat session record.
pub const NS_SESSION: &str = "session";
/// One page of a user's sessions.
pub const NS_USER_SESSIONS: &str = "user-sessions";
/// One page of a user's sessions filtered by title search.
pub const NS_SESSION_SEARCH: &str = "session-search";
/// One page of a session's messages.
pub const NS_SESSION_MESSAGES: &str = "session-messages";

// == Cache Key ==
/// An encoded, collision-free cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Starts a key for the given query shape.
    pub fn builder(namespace: &str) -> CacheKeyBuilder {
        CacheKeyBuilder {
            namespace: namespace.to_string(),
            entities: Vec::new(),
            params: BTreeMap::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Decodes a raw key produced by [`CacheKeyBuilder::build`].
    ///
    /// Returns `None` for anything the builder could not have produced.
    pub fn parse(raw: &str) -> Option<KeyParts<'_>> {
        let mut rest = raw;
        let namespace = take_segment(&mut rest)?;
        let mut entities = Vec::new();
        let mut params = Vec::new();

        while !rest.is_empty() {
            let tag = rest.as_bytes()[0];
            if tag != b'e' && tag != b'p' {
                return None;
            }
            rest = &rest[1..];
            match tag {
                b'e' => entities.push(take_segment(&mut rest)?),
                _ => {
                    let name = take_segment(&mut rest)?;
                    let value = take_segment(&mut rest)?;
                    params.push((name, value));
                }
            }
        }

        Some(KeyParts {
            namespace,
            entities,
            params,
        })
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The decoded pieces of a cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyParts<'a> {
    pub namespace: &'a str,
    pub entities: Vec<&'a str>,
    pub params: Vec<(&'a str, &'a str)>,
}

impl KeyParts<'_> {
    /// Whether `id` appears among the entity segments.
    pub fn references(&self, id: &str) -> bool {
        self.entities.iter().any(|entity| *entity == id)
    }
}

// == Builder ==
/// Accumulates the parts of a [`CacheKey`].
#[derive(Debug, Clone)]
pub struct CacheKeyBuilder {
    namespace: String,
    entities: Vec<String>,
    params: BTreeMap<String, String>,
}

impl CacheKeyBuilder {
    /// Tags the key with an entity id so invalidating that entity drops it.
    ///
    /// Entity order is part of the key.
    pub fn entity(mut self, id: impl ToString) -> Self {
        self.entities.push(id.to_string());
        self
    }

    /// Adds a named parameter. Names are sorted, so call order is irrelevant.
    pub fn param(mut self, name: &str, value: impl ToString) -> Self {
        self.params.insert(name.to_string(), value.to_string());
        self
    }

    /// Adds a parameter that distinguishes "absent" from every present value.
    pub fn opt_param<T: ToString>(self, name: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.param(name, format!("+{}", value.to_string())),
            None => self.param(name, "-"),
        }
    }

    pub fn flag(self, name: &str, value: bool) -> Self {
        self.param(name, if value { "1" } else { "0" })
    }

    pub fn build(self) -> CacheKey {
        let mut raw = String::new();
        push_segment(&mut raw, &self.namespace);

        for id in &self.entities {
            raw.push('e');
            push_segment(&mut raw, id);
        }

        for (name, value) in &self.params {
            raw.push('p');
            push_segment(&mut raw, name);
            push_segment(&mut raw, value);
        }

        CacheKey(raw)
    }
}

// == Segment Encoding ==
fn push_segment(out: &mut String, value: &str) {
    out.push_str(&value.len().to_string());
    out.push(':');
    out.push_str(value);
}

fn take_segment<'a>(rest: &mut &'a str) -> Option<&'a str> {
    let colon = rest.find(':')?;
    let len: usize = rest[..colon].parse().ok()?;
    let start = colon + 1;
    let end = start.checked_add(len)?;
    let value = rest.get(start..end)?;
    *rest = &rest[end..];
    Some(value)
}

//! Header maps and header mutations
//!
//! A [`Headers`] value keeps the proxy's ordering and duplicates exactly as
//! received. Lookups are linear and return the first match; we only ever ask
//! for a couple of headers per stream.

use crate::pb;
use crate::pb::header_value_option::HeaderAppendAction;
use regex::Regex;
use std::sync::OnceLock;

/// Pseudo-header carrying the request path
pub const PATH_HEADER: &str = ":path";
pub const CONTENT_TYPE_HEADER: &str = "content-type";
pub const CONTENT_LENGTH_HEADER: &str = "content-length";

/// Ordered list of (key, value) pairs. Keys are compared case-sensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the first header named `name`, or `""` if there is none.
    pub fn get(&self, name: &str) -> &str {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<pb::HeaderMap> for Headers {
    fn from(map: pb::HeaderMap) -> Self {
        map.headers
            .into_iter()
            .map(|header| {
                // Newer proxies only fill in raw_value
                let value = if header.value.is_empty() && !header.raw_value.is_empty() {
                    String::from_utf8_lossy(&header.raw_value).into_owned()
                } else {
                    header.value
                };
                (header.key, value)
            })
            .collect()
    }
}

impl From<Option<pb::HeaderMap>> for Headers {
    fn from(map: Option<pb::HeaderMap>) -> Self {
        map.map(Headers::from).unwrap_or_default()
    }
}

impl From<&Headers> for pb::HeaderMap {
    fn from(headers: &Headers) -> Self {
        pb::HeaderMap {
            headers: headers
                .iter()
                .map(|(key, value)| pb::HeaderValue {
                    key: key.to_string(),
                    value: value.to_string(),
                    raw_value: Vec::new(),
                })
                .collect(),
        }
    }
}

/// Set, append and remove instructions applied by the proxy to a header map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMutation {
    set: Vec<(String, String)>,
    append: Vec<(String, String)>,
    remove: Vec<String>,
}

impl HeaderMutation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite `key` (or add it if missing).
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set.push((key.into(), value.into()));
        self
    }

    /// Add another `key` entry, keeping existing ones.
    pub fn append(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.append.push((key.into(), value.into()));
        self
    }

    pub fn remove(mut self, key: impl Into<String>) -> Self {
        self.remove.push(key.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.append.is_empty() && self.remove.is_empty()
    }

    pub fn set_headers(&self) -> &[(String, String)] {
        &self.set
    }

    pub fn removed_headers(&self) -> &[String] {
        &self.remove
    }

    /// Wire form, or `None` when there is nothing to change.
    pub fn into_pb(self) -> Option<pb::HeaderMutation> {
        if self.is_empty() {
            return None;
        }

        let set = self
            .set
            .into_iter()
            .map(|(k, v)| header_option(k, v, HeaderAppendAction::OverwriteIfExistsOrAdd));
        let append = self
            .append
            .into_iter()
            .map(|(k, v)| header_option(k, v, HeaderAppendAction::AppendIfExistsOrAdd));

        Some(pb::HeaderMutation {
            set_headers: set.chain(append).collect(),
            remove_headers: self.remove,
        })
    }
}

fn header_option(key: String, value: String, action: HeaderAppendAction) -> pb::HeaderValueOption {
    pb::HeaderValueOption {
        header: Some(pb::HeaderValue {
            key,
            value,
            raw_value: Vec::new(),
        }),
        append: None,
        append_action: action as i32,
        keep_empty_value: false,
    }
}

fn json_content_type() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(application|text)/json(;.*)?$").expect("content-type pattern is valid")
    })
}

/// Whether a content-type value names JSON, parameters allowed.
///
/// The match is anchored at both ends and case-sensitive, so
/// `application/jsonx` is rejected and `application/json; charset=utf-8`
/// is accepted.
pub fn is_json_content_type(content_type: &str) -> bool {
    json_content_type().is_match(content_type)
}

//! Plain-data HTTP types crossing the core boundary.
//!
//! # Design
//! The core never touches the network: handlers consume a `HandlerRequest`
//! built from the inbound event and write into the response buffer, while
//! the transport executes the actual invocation around them. All fields are
//! owned (`String` / `Vec`) so values move freely between the core and its
//! callers. `Headers` preserves insertion order and first-seen name casing
//! because the export step flattens to the first value per name.

/// A multi-valued header mapping with case-insensitive names.
///
/// Standard HTTP header semantics: a name may carry several values, value
/// order per name is the order they were added, and lookups ignore ASCII
/// case. The casing of the first occurrence of a name is the one retained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, Vec<String>)>,
}

impl Headers {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append `value` under `name`, creating the entry on first use.
    pub fn add(&mut self, name: &str, value: &str) {
        match self.entry_mut(name) {
            Some(values) => values.push(value.to_string()),
            None => self.entries.push((name.to_string(), vec![value.to_string()])),
        }
    }

    /// Replace every value under `name` with the single `value`.
    pub fn set(&mut self, name: &str, value: &str) {
        match self.entry_mut(name) {
            Some(values) => {
                values.clear();
                values.push(value.to_string());
            }
            None => self.entries.push((name.to_string(), vec![value.to_string()])),
        }
    }

    /// Drop `name` and all its values.
    pub fn remove(&mut self, name: &str) {
        self.entries.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
    }

    /// First value under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entry(name).and_then(|values| values.first()).map(String::as_str)
    }

    /// Every value under `name`, in the order added.
    pub fn get_all(&self, name: &str) -> Option<&[String]> {
        self.entry(name).map(Vec::as_slice)
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(name, values)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    fn entry(&self, name: &str) -> Option<&Vec<String>> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    fn entry_mut(&mut self, name: &str) -> Option<&mut Vec<String>> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }
}

/// An invocation request as seen by a handler: method, path with the query
/// string already appended, merged headers, and the decoded body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerRequest {
    pub method: String,
    pub path: String,
    pub headers: Headers,
    pub body: Vec<u8>,
}

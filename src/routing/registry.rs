//! Ordered pattern-to-service table.

use std::sync::Arc;

use http::Method;
use regex::{Regex, RegexBuilder};

/// A registered request handler.
///
/// `handle` receives the request method, the raw request body, and the
/// pattern's capture groups in left-to-right order, and returns the
/// response body.
pub trait Service: Send + Sync {
    fn handle(&self, method: &Method, content: &[u8], captures: &[String]) -> String;
}

struct ServiceEntry {
    pattern: Regex,
    service: Arc<dyn Service>,
}

/// Ordered list of `(compiled pattern, service)` pairs. The first pattern
/// that matches a path wins; registration order is the priority order.
#[derive(Default)]
pub struct ServiceRegistry {
    entries: Vec<ServiceEntry>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `pattern` case-insensitively and append it. A malformed
    /// pattern returns false and leaves the registry unchanged.
    pub fn add_service(&mut self, service: Arc<dyn Service>, pattern: &str) -> bool {
        // Match the whole path, not a substring; the non-capturing wrapper
        // keeps group numbering stable.
        let anchored = format!(r"\A(?:{pattern})\z");
        match RegexBuilder::new(&anchored).case_insensitive(true).build() {
            Ok(compiled) => {
                self.entries.push(ServiceEntry {
                    pattern: compiled,
                    service,
                });
                true
            }
            Err(error) => {
                tracing::warn!(pattern, error = %error, "rejecting malformed service pattern");
                false
            }
        }
    }

    /// Find the first registered pattern matching `path` in full.
    ///
    /// Returns the service and the captured substrings of groups 1..N
    /// (the whole-match group is never included; an unmatched optional
    /// group yields an empty string). No match is a normal `None`.
    pub fn find(&self, path: &str) -> Option<(Arc<dyn Service>, Vec<String>)> {
        for entry in &self.entries {
            if let Some(captures) = entry.pattern.captures(path) {
                let groups = captures
                    .iter()
                    .skip(1)
                    .map(|group| group.map(|m| m.as_str().to_string()).unwrap_or_default())
                    .collect();
                return Some((Arc::clone(&entry.service), groups));
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

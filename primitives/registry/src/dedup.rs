//! Identifier deduplication.

use std::collections::HashSet;

/// A namespace of taken identifiers.
///
/// [`DedupSet::resolve`] returns the proposed name if it is free and a
/// numbered variant otherwise, reserving whichever it returns. The first
/// claimant always keeps the bare name; later claimants get the smallest free
/// suffix, so the outcome depends only on the order of calls.
#[derive(Debug, Clone, Default)]
pub struct DedupSet {
    taken: HashSet<String>,
}

impl DedupSet {
    /// Create an empty namespace.
    pub fn new() -> Self { Self::default() }

    /// Create a namespace with `names` already taken.
    pub fn with_reserved<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { taken: names.into_iter().map(Into::into).collect() }
    }

    /// Mark `name` as taken. Returns false if it already was.
    pub fn reserve(&mut self, name: impl Into<String>) -> bool { self.taken.insert(name.into()) }

    /// Whether `name` is taken.
    pub fn contains(&self, name: &str) -> bool { self.taken.contains(name) }

    /// Number of taken names.
    pub fn len(&self) -> usize { self.taken.len() }

    /// Whether nothing is taken.
    pub fn is_empty(&self) -> bool { self.taken.is_empty() }

    /// Claim `base`, or the first free numbered variant of it.
    pub fn resolve(&mut self, base: &str) -> String {
        if self.taken.insert(base.to_string()) {
            return base.to_string();
        }

        // "x1" + 1 would read as "x11"; separate the counter instead.
        let separator = if base.ends_with(|c: char| c.is_ascii_digit()) { "_" } else { "" };
        let mut n = 1usize;
        loop {
            let candidate = format!("{}{}{}", base, separator, n);
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

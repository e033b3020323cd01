//! Type text.
//!
//! Signatures keep their types as printed text, except for identifiers that
//! name foreign packages. Those are stored as occurrences in an
//! [`OccurrenceArena`]; import finalization rewrites each occurrence once the
//! package aliases are known, and rendering reads the rewritten spelling.

/// Handle to one rewritable identifier occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OccurrenceId(usize);

/// Storage for occurrence spellings.
#[derive(Debug, Clone, Default)]
pub struct OccurrenceArena {
    spellings: Vec<String>,
}

impl OccurrenceArena {
    /// Create an empty arena.
    pub fn new() -> Self { Self::default() }

    /// Record a new occurrence with its current spelling.
    pub fn alloc(&mut self, spelling: impl Into<String>) -> OccurrenceId {
        self.spellings.push(spelling.into());
        OccurrenceId(self.spellings.len() - 1)
    }

    /// Current spelling of an occurrence.
    pub fn get(&self, id: OccurrenceId) -> &str {
        self.spellings.get(id.0).map(String::as_str).unwrap_or_default()
    }

    /// Replace the spelling of an occurrence.
    pub fn rewrite(&mut self, id: OccurrenceId, spelling: impl Into<String>) {
        if let Some(slot) = self.spellings.get_mut(id.0) {
            *slot = spelling.into();
        }
    }

    /// Number of recorded occurrences.
    pub fn len(&self) -> usize { self.spellings.len() }

    /// Whether no occurrence was recorded.
    pub fn is_empty(&self) -> bool { self.spellings.is_empty() }
}

/// A piece of type text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text
    Text(String),
    /// A rewritable identifier
    Occurrence(OccurrenceId),
}

/// Printed type expression with rewritable identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeText {
    segments: Vec<Segment>,
}

impl TypeText {
    /// Create empty text.
    pub fn new() -> Self { Self::default() }

    /// Text with a single literal segment.
    pub fn literal(text: impl Into<String>) -> Self {
        let mut t = Self::new();
        t.push_str(&text.into());
        t
    }

    /// Append literal text, merging with a trailing literal segment.
    pub fn push_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.segments.last_mut() {
            Some(Segment::Text(last)) => last.push_str(text),
            _ => self.segments.push(Segment::Text(text.to_string())),
        }
    }

    /// Append an occurrence.
    pub fn push_occurrence(&mut self, id: OccurrenceId) { self.segments.push(Segment::Occurrence(id)); }

    /// The segments in order.
    pub fn segments(&self) -> &[Segment] { &self.segments }

    /// Render with the current occurrence spellings.
    pub fn render(&self, arena: &OccurrenceArena) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(t) => out.push_str(t),
                Segment::Occurrence(id) => out.push_str(arena.get(*id)),
            }
        }
        out
    }
}

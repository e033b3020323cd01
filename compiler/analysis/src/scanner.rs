//! Annotation scanning.
//!
//! A marker is `@evon(flags)` anywhere inside a comment. Each comment group
//! may hold at most one. Comment groups are visited through a
//! [`CommentCursor`], which walks a unit's groups strictly forward so every
//! group is scanned exactly once.

use ir::{CommentGroup, SourceUnit};
use regex::Regex;
use types::{Annotation, Flag, FlagError, FlagSet};

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};

/// Message for markers that do not belong to a func or interface type declaration.
pub const MISPLACED: &str = "Evon annotations apply only to func or interface type declarations";

const MARKER: &str = r"@evon\(\s*(.*?)\s*\)";

/// Finds and validates markers in comment groups.
#[derive(Debug, Clone)]
pub struct AnnotationScanner {
    marker: Regex,
}

impl AnnotationScanner {
    /// Create a scanner.
    pub fn new() -> Result<Self, regex::Error> { Ok(Self { marker: Regex::new(MARKER)? }) }

    /// Scan one comment group of `unit`.
    ///
    /// Returns the group's annotation if it has one. Only the first problem of
    /// a group is reported.
    pub fn scan(
        &self,
        unit: &SourceUnit,
        group: &CommentGroup,
    ) -> Result<Option<Annotation>, Diagnostic> {
        let mut found: Option<(ir::Position, &str)> = None;

        for comment in &group.comments {
            for caps in self.marker.captures_iter(&comment.text) {
                let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                let at = comment.pos_at(whole.start());

                if let Some((first, _)) = &found {
                    return Err(Diagnostic::new(
                        DiagnosticKind::MalformedAnnotation,
                        first.clone(),
                        format!("Redundant annotation at {}", at),
                    ));
                }
                found = Some((unit.position(at), body.as_str()));
            }
        }

        let Some((position, body)) = found else {
            return Ok(None);
        };

        let mut flags = FlagSet::new();
        for token in body.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let flag: Flag = token.parse().map_err(|message: String| {
                Diagnostic::new(DiagnosticKind::InvalidFlag, position.clone(), message)
            })?;
            flags.insert(flag);
        }

        if let Err(err) = flags.validate() {
            let kind = match err {
                FlagError::Conflict(..) => DiagnosticKind::FlagConflict,
                FlagError::Dependency(..) => DiagnosticKind::FlagDependency,
            };
            return Err(Diagnostic::new(kind, position, err.to_string()));
        }

        Ok(Some(Annotation { position, flags }))
    }
}

/// Forward-only cursor over the comment groups of one unit.
pub struct CommentCursor<'u> {
    unit: &'u SourceUnit,
    next: usize,
}

impl<'u> CommentCursor<'u> {
    /// Create a cursor at the first comment group of `unit`.
    pub fn new(unit: &'u SourceUnit) -> Self { Self { unit, next: 0 } }

    /// Index of the next group to be scanned.
    pub fn position(&self) -> usize { self.next }

    /// Scan forward up to and including the group at index `doc`, returning its
    /// annotation.
    ///
    /// Annotations found in groups passed on the way are misplaced. A missing
    /// doc leaves the cursor where it is.
    pub fn advance_to(
        &mut self,
        scanner: &AnnotationScanner,
        doc: Option<usize>,
        diagnostics: &mut Diagnostics,
    ) -> Option<Annotation> {
        let doc = doc?;
        while self.next < self.unit.comments.len() {
            let index = self.next;
            let annotation = self.step(scanner, diagnostics);
            if index == doc {
                return annotation;
            }
            if let Some(ann) = annotation {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::MisplacedAnnotation,
                    ann.position,
                    MISPLACED,
                ));
            }
        }
        None
    }

    /// Scan all remaining groups. Any annotation found is misplaced.
    pub fn drain(&mut self, scanner: &AnnotationScanner, diagnostics: &mut Diagnostics) {
        while self.next < self.unit.comments.len() {
            if let Some(ann) = self.step(scanner, diagnostics) {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::MisplacedAnnotation,
                    ann.position,
                    MISPLACED,
                ));
            }
        }
    }

    fn step(
        &mut self,
        scanner: &AnnotationScanner,
        diagnostics: &mut Diagnostics,
    ) -> Option<Annotation> {
        let group = &self.unit.comments[self.next];
        self.next += 1;
        match scanner.scan(self.unit, group) {
            Ok(annotation) => annotation,
            Err(diagnostic) => {
                diagnostics.push(diagnostic);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ir::test_utils::{doc, unit};

    fn scan(text: &str) -> Result<Option<Annotation>, Diagnostic> {
        let scanner = AnnotationScanner::new().expect("marker pattern compiles");
        let unit = unit("a.go", vec![doc(4, text)], vec![]);
        scanner.scan(&unit, &unit.comments[0])
    }

    #[test]
    fn test_marker_whitespace_and_empty_tokens() {
        let ann = scan("fires on login @evon( lock ,, spawn,  )").expect("valid").expect("present");
        assert_eq!(ann.flags.to_string(), "(lock, spawn)");
        // "// " precedes the text, so the marker starts at column 19
        assert_eq!(ann.position.to_string(), "a.go:4:19");
    }

    #[test]
    fn test_no_marker() {
        assert_eq!(scan("evon(lock) is not a marker"), Ok(None));
        assert_eq!(scan("@evon()").expect("valid").map(|a| a.flags.is_empty()), Some(true));
    }

    #[test]
    fn test_flags_are_case_sensitive() {
        let err = scan("@evon(Lock)").expect_err("invalid");
        assert_eq!(err.kind, DiagnosticKind::InvalidFlag);
        assert_eq!(err.to_string(), "a.go:4:4: Invalid flag \"Lock\"");
    }
}

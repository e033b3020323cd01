//! Declaration binding.
//!
//! Walks the type declarations of each unit in source order, attaches the
//! effective annotation to every spec, checks the handler naming rule and
//! extracts the event shape. A spec's own annotation replaces the one on its
//! `type ( ... )` group; specs sharing the group annotation end up in one
//! [`DeclarationRecord`].

use ir::{Decl, Program, SourceUnit, TypeSpec};
use semantics::{SemanticError, ShapeExtractor};
use types::{Annotation, DeclarationRecord};

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::scanner::{AnnotationScanner, CommentCursor, MISPLACED};
use crate::Naming;

/// Everything a finished binding pass produced.
pub struct Bound<'p> {
    /// Records in source order
    pub records: Vec<DeclarationRecord>,
    /// Problems found
    pub diagnostics: Diagnostics,
    /// Whether any bound annotation needs the sync package
    pub need_sync: bool,
    /// The extractor, holding the recorded foreign references
    pub extractor: ShapeExtractor<'p>,
}

/// Binds annotations to type declarations, one unit at a time.
pub struct Binder<'a, 'p> {
    scanner: &'a AnnotationScanner,
    naming: &'a Naming,
    extractor: ShapeExtractor<'p>,
    records: Vec<DeclarationRecord>,
    diagnostics: Diagnostics,
    need_sync: bool,
}

impl<'a, 'p> Binder<'a, 'p> {
    /// Create a binder for the root package of `program`.
    pub fn new(program: &'p Program, naming: &'a Naming, scanner: &'a AnnotationScanner) -> Self {
        Self {
            scanner,
            naming,
            extractor: ShapeExtractor::new(program),
            records: Vec::new(),
            diagnostics: Diagnostics::new(),
            need_sync: false,
        }
    }

    /// Bind all type declarations of `unit`.
    pub fn bind_unit(&mut self, unit: &'p SourceUnit) {
        let mut cursor = CommentCursor::new(unit);

        for decl in &unit.decls {
            let Decl::Type(type_decl) = decl else {
                continue;
            };

            let group = cursor.advance_to(self.scanner, type_decl.doc, &mut self.diagnostics);
            let mut group_record: Option<usize> = None;

            for spec in &type_decl.specs {
                let own = cursor.advance_to(self.scanner, spec.doc, &mut self.diagnostics);
                let (annotation, shared) = match (own, &group) {
                    (Some(own), _) => (own, false),
                    (None, Some(group)) => (group.clone(), true),
                    (None, None) => continue,
                };

                self.check_name(unit, spec);

                let event = match self.extractor.extract(unit, spec) {
                    Ok(event) => event,
                    Err(err) => {
                        self.report(unit, spec, &annotation, err);
                        continue;
                    }
                };
                logging::trace(
                    "binder",
                    &format!("bound {} {} at {}", spec.name.name, annotation.flags, annotation.position),
                );

                self.need_sync |= annotation.needs_sync();
                match group_record {
                    Some(index) if shared => self.records[index].events.push(event),
                    _ => {
                        self.records.push(DeclarationRecord { annotation, events: vec![event] });
                        if shared {
                            group_record = Some(self.records.len() - 1);
                        }
                    }
                }
            }
        }

        cursor.drain(self.scanner, &mut self.diagnostics);
    }

    /// Finish the pass.
    pub fn finish(self) -> Bound<'p> {
        Bound {
            records: self.records,
            diagnostics: self.diagnostics,
            need_sync: self.need_sync,
            extractor: self.extractor,
        }
    }

    fn check_name(&mut self, unit: &SourceUnit, spec: &TypeSpec) {
        let name = &spec.name.name;
        let suffix = &self.naming.handler_suffix;
        if !self.naming.is_handler_name(name) {
            self.diagnostics.push(Diagnostic::new(
                DiagnosticKind::NamingViolation,
                unit.position(spec.name.pos),
                format!(
                    "Handler type \"{}\" name must have suffix \"{}\" (and be longer than that)",
                    name, suffix
                ),
            ));
        }
    }

    fn report(&mut self, unit: &SourceUnit, spec: &TypeSpec, annotation: &Annotation, err: SemanticError) {
        logging::trace("binder", &format!("{}: {}", spec.name.name, err));

        let name = &spec.name.name;
        let at = unit.position(spec.name.pos);
        let diagnostic = match err {
            SemanticError::Unresolved(_) | SemanticError::Cycle(_) => Diagnostic::new(
                DiagnosticKind::UnresolvedType,
                at,
                format!("Cannot resolve type \"{}\" due to compilation errors", name),
            ),
            SemanticError::NotInterface { name: embedded, kind } => Diagnostic::new(
                DiagnosticKind::UnresolvableEmbedding,
                at,
                format!("Interface type \"{}\" embeds \"{}\", which is a {}, not an interface", name, embedded, kind),
            ),
            SemanticError::Unsupported { .. } => Diagnostic::new(
                DiagnosticKind::UnsupportedShape,
                annotation.position.clone(),
                MISPLACED,
            ),
            SemanticError::EmptyInterface(_) => Diagnostic::new(
                DiagnosticKind::EmptyInterface,
                at,
                format!("Interface type \"{}\" has no usable methods", name),
            ),
        };
        self.diagnostics.push(diagnostic);
    }
}

//! Shape extraction.
//!
//! Turns an annotated type spec into an [`EventShape`]. Signature types are
//! printed into [`TypeText`]; every identifier that refers to a foreign
//! package is stored as an occurrence and reported to the [`ImportRegistry`].

use ir::{Binding, ChanDir, Field, FuncType, Ident, Program, SourceUnit, TypeExpr, TypeSpec};
use registry::ImportRegistry;
use types::{EventShape, OccurrenceArena, ParamGroup, ResultGroup, ShapeKind, Signature, TypeText};

use crate::flatten::Flattener;
use crate::resolver::{DeclKey, Terminal, TypeResolver};
use crate::{Result, SemanticError};

/// Extracts event shapes for the root package of a program.
pub struct ShapeExtractor<'p> {
    program: &'p Program,
    root: &'p str,
    resolver: TypeResolver<'p>,
    arena: OccurrenceArena,
    imports: ImportRegistry,
}

impl<'p> ShapeExtractor<'p> {
    /// Create an extractor for `program`'s root package.
    pub fn new(program: &'p Program) -> Self {
        Self {
            program,
            root: program.root.as_str(),
            resolver: TypeResolver::new(program),
            arena: OccurrenceArena::new(),
            imports: ImportRegistry::new(),
        }
    }

    /// Import path of the root package.
    pub fn root(&self) -> &'p str { self.root }

    /// The registry of foreign references recorded so far.
    pub fn imports(&self) -> &ImportRegistry { &self.imports }

    /// Mutable access to the registry, to add internally required packages.
    pub fn imports_mut(&mut self) -> &mut ImportRegistry { &mut self.imports }

    /// The occurrence arena shared by all extracted type text.
    pub fn arena(&self) -> &OccurrenceArena { &self.arena }

    /// Give up the arena and registry for finalization.
    pub fn into_parts(self) -> (OccurrenceArena, ImportRegistry) { (self.arena, self.imports) }

    /// Resolve `spec`, declared in `unit` of the root package, to an event shape.
    ///
    /// Nothing is recorded in the registry unless extraction succeeds.
    pub fn extract(&mut self, unit: &SourceUnit, spec: &'p TypeSpec) -> Result<EventShape> {
        let owner = DeclKey { module: self.root, name: spec.name.name.as_str() };
        let resolved = self.resolver.resolve(self.root, &spec.ty)?;

        let (kind, methods) = match resolved.terminal {
            Terminal::Func(func) => (ShapeKind::Func, vec![(resolved.module, "", func)]),
            Terminal::Interface(iface) => {
                let decl = resolved.decl.or(Some(owner));
                let flat = Flattener::new(&mut self.resolver, self.root).flatten(
                    resolved.module,
                    decl,
                    iface,
                )?;
                if flat.is_empty() {
                    return Err(SemanticError::EmptyInterface(spec.name.name.clone()));
                }
                (ShapeKind::Interface, flat.into_iter().map(|m| (m.module, m.name, m.sig)).collect())
            }
            Terminal::Other(ty) => {
                return Err(SemanticError::Unsupported {
                    name: spec.name.name.clone(),
                    kind: ty.kind_name(),
                })
            }
        };

        let signatures =
            methods.into_iter().map(|(module, name, sig)| self.signature(module, name, sig)).collect();

        logging::trace(
            "extract",
            &format!("{} resolved to {} in {}", spec.name.name, kind.tag(), display_module(resolved.module)),
        );

        Ok(EventShape {
            name: spec.name.name.clone(),
            position: unit.position(spec.name.pos),
            kind,
            signatures,
        })
    }

    fn signature(&mut self, module: &str, name: &str, sig: &FuncType) -> Signature {
        let params = sig
            .params
            .iter()
            .map(|field| {
                let (ty, variadic) = match &field.ty {
                    TypeExpr::Ellipsis { elem } => (self.print(module, elem), true),
                    other => (self.print(module, other), false),
                };
                ParamGroup { names: field_names(field), ty, variadic }
            })
            .collect();

        let results = sig
            .results
            .iter()
            .map(|field| ResultGroup { names: field_names(field), ty: self.print(module, &field.ty) })
            .collect();

        Signature { name: name.to_string(), params, results }
    }

    /// Print `ty`, written in `module`, recording foreign references.
    pub fn print(&mut self, module: &str, ty: &TypeExpr) -> TypeText {
        let mut out = TypeText::new();
        self.write_type(module, ty, &mut out);
        out
    }

    fn write_type(&mut self, module: &str, ty: &TypeExpr, out: &mut TypeText) {
        match ty {
            TypeExpr::Ident(ident) => self.write_ident(ident, out),
            TypeExpr::Selector { package, name } => {
                self.write_ident(package, out);
                out.push_str(".");
                out.push_str(&name.name);
            }
            TypeExpr::Paren { inner } => {
                out.push_str("(");
                self.write_type(module, inner, out);
                out.push_str(")");
            }
            TypeExpr::Func(func) => {
                out.push_str("func");
                self.write_func(module, func, out);
            }
            TypeExpr::Interface(iface) => {
                if iface.methods.is_empty() {
                    out.push_str("interface{}");
                    return;
                }
                out.push_str("interface{ ");
                for (i, entry) in iface.methods.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    match entry {
                        ir::InterfaceEntry::Method { name, sig } => {
                            out.push_str(&name.name);
                            self.write_func(module, sig, out);
                        }
                        ir::InterfaceEntry::Embedded { ty } => self.write_type(module, ty, out),
                    }
                }
                out.push_str(" }");
            }
            TypeExpr::Pointer { elem } => {
                out.push_str("*");
                self.write_type(module, elem, out);
            }
            TypeExpr::Slice { elem } => {
                out.push_str("[]");
                self.write_type(module, elem, out);
            }
            TypeExpr::Array { len, elem } => {
                out.push_str(&format!("[{}]", len));
                self.write_type(module, elem, out);
            }
            TypeExpr::Map { key, value } => {
                out.push_str("map[");
                self.write_type(module, key, out);
                out.push_str("]");
                self.write_type(module, value, out);
            }
            TypeExpr::Chan { dir, elem } => {
                out.push_str(match dir {
                    ChanDir::Both => "chan ",
                    ChanDir::Send => "chan<- ",
                    ChanDir::Recv => "<-chan ",
                });
                self.write_type(module, elem, out);
            }
            TypeExpr::Ellipsis { elem } => {
                out.push_str("...");
                self.write_type(module, elem, out);
            }
            TypeExpr::Struct { fields } => {
                if fields.is_empty() {
                    out.push_str("struct{}");
                    return;
                }
                out.push_str("struct{ ");
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    self.write_field(module, field, out);
                }
                out.push_str(" }");
            }
            TypeExpr::Generic { base, args } => {
                self.write_type(module, base, out);
                out.push_str("[");
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_type(module, arg, out);
                }
                out.push_str("]");
            }
            TypeExpr::Other { text } => out.push_str(text),
        }
    }

    fn write_func(&mut self, module: &str, func: &FuncType, out: &mut TypeText) {
        out.push_str("(");
        self.write_fields(module, &func.params, out);
        out.push_str(")");

        match func.results.as_slice() {
            [] => {}
            [single] if single.names.is_empty() => {
                out.push_str(" ");
                self.write_type(module, &single.ty, out);
            }
            results => {
                out.push_str(" (");
                self.write_fields(module, results, out);
                out.push_str(")");
            }
        }
    }

    fn write_fields(&mut self, module: &str, fields: &[Field], out: &mut TypeText) {
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_field(module, field, out);
        }
    }

    fn write_field(&mut self, module: &str, field: &Field, out: &mut TypeText) {
        if !field.names.is_empty() {
            out.push_str(&field_names(field).join(", "));
            out.push_str(" ");
        }
        self.write_type(module, &field.ty, out);
    }

    /// Identifiers naming a package, or a type owned by a package other than
    /// the root, become occurrences. The selected name of a qualified
    /// reference never reaches here.
    fn write_ident(&mut self, ident: &Ident, out: &mut TypeText) {
        match &ident.binding {
            Some(Binding::Package { path }) => {
                let name = self.program.package_name(path);
                let id = self.arena.alloc(ident.name.clone());
                self.imports.add_package_occurrence(path, &name, id);
                out.push_occurrence(id);
            }
            Some(Binding::Type { package }) if package != self.root => {
                let name = self.program.package_name(package);
                let id = self.arena.alloc(ident.name.clone());
                self.imports.add_type_occurrence(package, &name, id);
                out.push_occurrence(id);
            }
            _ => out.push_str(&ident.name),
        }
    }
}

fn field_names(field: &Field) -> Vec<String> { field.names.iter().map(|n| n.name.clone()).collect() }

fn display_module(module: &str) -> &str {
    if module.is_empty() {
        "<universe>"
    } else {
        module
    }
}

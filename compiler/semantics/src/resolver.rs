//! Type resolution.
//!
//! [`TypeResolver`] follows identifiers, qualified references and parentheses
//! until it reaches a type literal. Both aliases (`type A = B`) and
//! definitions (`type A B`) are followed, since either way the handler shares
//! the underlying shape.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use ir::{Binding, FuncType, Ident, InterfaceEntry, InterfaceType, Pos, Program, TypeExpr, TypeSpec};

use crate::{Result, SemanticError};

/// Module path used for predeclared types.
pub const UNIVERSE: &str = "";

/// A named type declaration: owning module plus name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclKey<'p> {
    /// Import path of the declaring package
    pub module: &'p str,
    /// Declared name
    pub name: &'p str,
}

/// The type literal a reference ends at.
#[derive(Debug, Clone, Copy)]
pub enum Terminal<'p> {
    /// A func type
    Func(&'p FuncType),
    /// An interface type
    Interface(&'p InterfaceType),
    /// Anything else
    Other(&'p TypeExpr),
}

impl Terminal<'_> {
    /// Short description of the terminal kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Terminal::Func(_) => "func type",
            Terminal::Interface(_) => "interface type",
            Terminal::Other(ty) => ty.kind_name(),
        }
    }
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'p> {
    /// Module the terminal literal was written in
    pub module: &'p str,
    /// Last named declaration passed through, if any
    pub decl: Option<DeclKey<'p>>,
    /// The terminal literal
    pub terminal: Terminal<'p>,
}

/// The predeclared `error` interface: `interface { Error() string }`.
pub fn error_interface() -> &'static InterfaceType {
    static ERROR: OnceLock<InterfaceType> = OnceLock::new();
    ERROR.get_or_init(|| InterfaceType {
        methods: vec![InterfaceEntry::Method {
            name: Ident::bound("Error", Pos::default(), Binding::Universe),
            sig: FuncType {
                params: vec![],
                results: vec![ir::Field {
                    names: vec![],
                    ty: TypeExpr::Ident(Ident::bound("string", Pos::default(), Binding::Universe)),
                }],
            },
        }],
    })
}

/// Resolves type references against a loaded program.
///
/// Each package's top-level type declarations are indexed the first time the
/// package is entered and kept for the lifetime of the resolver.
pub struct TypeResolver<'p> {
    program: &'p Program,
    tables: HashMap<&'p str, HashMap<&'p str, &'p TypeSpec>>,
}

impl<'p> TypeResolver<'p> {
    /// Create a resolver for `program`.
    pub fn new(program: &'p Program) -> Self { Self { program, tables: HashMap::new() } }

    /// Number of packages indexed so far.
    pub fn indexed_packages(&self) -> usize { self.tables.len() }

    /// Resolve `ty`, written in `module`, to its terminal literal.
    pub fn resolve(&mut self, module: &'p str, ty: &'p TypeExpr) -> Result<Resolved<'p>> {
        let mut visiting = HashSet::new();
        self.resolve_expr(module, ty, None, &mut visiting)
    }

    fn resolve_expr(
        &mut self,
        module: &'p str,
        ty: &'p TypeExpr,
        decl: Option<DeclKey<'p>>,
        visiting: &mut HashSet<DeclKey<'p>>,
    ) -> Result<Resolved<'p>> {
        match ty {
            TypeExpr::Ident(ident) => self.resolve_ident(module, ty, ident, visiting),
            TypeExpr::Selector { name, .. } => self.resolve_ident(module, ty, name, visiting),
            TypeExpr::Paren { inner } => self.resolve_expr(module, inner, decl, visiting),
            TypeExpr::Func(func) => Ok(Resolved { module, decl, terminal: Terminal::Func(func) }),
            TypeExpr::Interface(iface) => {
                Ok(Resolved { module, decl, terminal: Terminal::Interface(iface) })
            }
            _ => Ok(Resolved { module, decl, terminal: Terminal::Other(ty) }),
        }
    }

    fn resolve_ident(
        &mut self,
        module: &'p str,
        expr: &'p TypeExpr,
        ident: &'p Ident,
        visiting: &mut HashSet<DeclKey<'p>>,
    ) -> Result<Resolved<'p>> {
        match &ident.binding {
            Some(Binding::Type { package }) => {
                let owner = package.as_str();
                let spec = self
                    .lookup(owner, &ident.name, owner == module)
                    .ok_or_else(|| SemanticError::Unresolved(ident.name.clone()))?;

                let key = DeclKey { module: owner, name: spec.name.name.as_str() };
                if !visiting.insert(key) {
                    return Err(SemanticError::Cycle(ident.name.clone()));
                }
                logging::trace("resolver", &format!("{} -> {}.{}", ident.name, owner, key.name));
                self.resolve_expr(owner, &spec.ty, Some(key), visiting)
            }
            Some(Binding::Universe) if ident.name == "error" => Ok(Resolved {
                module: UNIVERSE,
                decl: None,
                terminal: Terminal::Interface(error_interface()),
            }),
            Some(Binding::Universe) => {
                Ok(Resolved { module: UNIVERSE, decl: None, terminal: Terminal::Other(expr) })
            }
            _ => Err(SemanticError::Unresolved(ident.name.clone())),
        }
    }

    /// Find a top-level type declaration of `module`.
    ///
    /// Unexported names are only visible from inside the module itself.
    fn lookup(&mut self, module: &'p str, name: &str, local: bool) -> Option<&'p TypeSpec> {
        if !local && !ir::is_exported(name) {
            return None;
        }
        self.table(module)?.get(name).copied()
    }

    fn table(&mut self, module: &'p str) -> Option<&HashMap<&'p str, &'p TypeSpec>> {
        if !self.tables.contains_key(module) {
            let package = self.program.package(module)?;
            let table: HashMap<&'p str, &'p TypeSpec> =
                package.type_specs().map(|(_, spec)| (spec.name.name.as_str(), spec)).collect();
            logging::trace(
                "resolver",
                &format!("indexed {} type declarations of {}", table.len(), module),
            );
            self.tables.insert(module, table);
        }
        self.tables.get(module)
    }
}

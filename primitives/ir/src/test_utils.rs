//! Builders for hand-written program graphs in tests.
//!
//! Positions are synthesized from the line numbers passed in; columns are fixed
//! unless a helper takes one explicitly.

use crate::{
    Binding, Comment, CommentGroup, Decl, Field, FuncDecl, FuncType, Ident, InterfaceEntry,
    InterfaceType, Package, Pos, SourceUnit, TypeDecl, TypeExpr, TypeSpec,
};

/// A position on `line`, column 1.
pub fn line(line: u32) -> Pos { Pos::new(line, 1) }

/// A comment group holding a single `//` comment on `line`.
pub fn doc(line: u32, text: &str) -> CommentGroup {
    CommentGroup { comments: vec![Comment { pos: Pos::new(line, 1), text: format!("// {}", text) }] }
}

/// A comment group holding one `//` comment per line, starting at `first_line`.
pub fn doc_lines(first_line: u32, lines: &[&str]) -> CommentGroup {
    CommentGroup {
        comments: lines
            .iter()
            .zip(first_line..)
            .map(|(text, l)| Comment { pos: Pos::new(l, 1), text: format!("// {}", text) })
            .collect(),
    }
}

/// A type identifier declared at the top level of `package`.
pub fn named(name: &str, package: &str) -> TypeExpr {
    TypeExpr::Ident(Ident::bound(name, Pos::default(), Binding::Type { package: package.into() }))
}

/// A predeclared type identifier (`int`, `string`, `error`, ...).
pub fn universe(name: &str) -> TypeExpr {
    TypeExpr::Ident(Ident::bound(name, Pos::default(), Binding::Universe))
}

/// An identifier without type information.
pub fn unbound(name: &str) -> TypeExpr { TypeExpr::Ident(Ident::new(name, Pos::default())) }

/// A qualified reference `pkg_name.name` to a type of the package at `pkg_path`.
pub fn qualified(pkg_name: &str, pkg_path: &str, name: &str) -> TypeExpr {
    TypeExpr::Selector {
        package: Ident::bound(pkg_name, Pos::default(), Binding::Package { path: pkg_path.into() }),
        name: Ident::bound(name, Pos::default(), Binding::Type { package: pkg_path.into() }),
    }
}

/// `(inner)`
pub fn paren(inner: TypeExpr) -> TypeExpr { TypeExpr::Paren { inner: Box::new(inner) } }

/// `*elem`
pub fn pointer(elem: TypeExpr) -> TypeExpr { TypeExpr::Pointer { elem: Box::new(elem) } }

/// `[]elem`
pub fn slice(elem: TypeExpr) -> TypeExpr { TypeExpr::Slice { elem: Box::new(elem) } }

/// `...elem`
pub fn ellipsis(elem: TypeExpr) -> TypeExpr { TypeExpr::Ellipsis { elem: Box::new(elem) } }

/// A parameter or result group.
pub fn field(names: &[&str], ty: TypeExpr) -> Field {
    Field { names: names.iter().map(|n| Ident::new(*n, Pos::default())).collect(), ty }
}

/// A function signature.
pub fn sig(params: Vec<Field>, results: Vec<Field>) -> FuncType { FuncType { params, results } }

/// A function type expression.
pub fn func(params: Vec<Field>, results: Vec<Field>) -> TypeExpr {
    TypeExpr::Func(sig(params, results))
}

/// A named interface method.
pub fn method(name: &str, params: Vec<Field>, results: Vec<Field>) -> InterfaceEntry {
    InterfaceEntry::Method { name: Ident::new(name, Pos::default()), sig: sig(params, results) }
}

/// An embedded interface entry.
pub fn embed(ty: TypeExpr) -> InterfaceEntry { InterfaceEntry::Embedded { ty } }

/// An interface type expression.
pub fn interface(methods: Vec<InterfaceEntry>) -> TypeExpr {
    TypeExpr::Interface(InterfaceType { methods })
}

/// A type spec named `name` declared on `line`, column 6 (after `type `).
pub fn spec(name: &str, line: u32, ty: TypeExpr) -> TypeSpec {
    TypeSpec { name: Ident::new(name, Pos::new(line, 6)), doc: None, assign: false, ty }
}

/// A type spec with its own doc comment.
pub fn spec_doc(name: &str, line: u32, doc: usize, ty: TypeExpr) -> TypeSpec {
    TypeSpec { doc: Some(doc), ..spec(name, line, ty) }
}

/// A single-spec `type` declaration.
pub fn type_decl(doc: Option<usize>, spec: TypeSpec) -> Decl {
    Decl::Type(TypeDecl { doc, specs: vec![spec] })
}

/// A grouped `type ( ... )` declaration.
pub fn type_group(doc: Option<usize>, specs: Vec<TypeSpec>) -> Decl {
    Decl::Type(TypeDecl { doc, specs })
}

/// A function declaration.
pub fn func_decl(name: &str, line: u32, doc: Option<usize>) -> Decl {
    Decl::Func(FuncDecl { name: Ident::new(name, Pos::new(line, 6)), doc })
}

/// A source unit.
pub fn unit(file: &str, comments: Vec<CommentGroup>, decls: Vec<Decl>) -> SourceUnit {
    SourceUnit { file: file.into(), comments, decls }
}

/// A package with a single unit.
pub fn package(path: &str, name: &str, unit: SourceUnit) -> Package {
    Package::new(path, name, vec![unit])
}

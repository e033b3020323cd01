//! Interface flattening.

use std::collections::HashSet;

use ir::{FuncType, InterfaceEntry, InterfaceType, TypeExpr};

use crate::resolver::{DeclKey, Terminal, TypeResolver};
use crate::{Result, SemanticError};

/// A method surviving flattening.
#[derive(Debug, Clone, Copy)]
pub struct FlatMethod<'p> {
    /// Module the method was declared in
    pub module: &'p str,
    /// Method name
    pub name: &'p str,
    /// Method signature
    pub sig: &'p FuncType,
}

/// Expands an interface and everything it embeds into one method list.
///
/// Methods come out in depth-first declaration order. A method name seen once
/// is skipped afterwards, so shared embeddings (diamonds) contribute their
/// methods a single time. Unexported methods are kept only while flattening
/// inside the root module.
pub struct Flattener<'r, 'p> {
    resolver: &'r mut TypeResolver<'p>,
    root: &'p str,
    seen: HashSet<&'p str>,
    in_progress: HashSet<DeclKey<'p>>,
}

impl<'r, 'p> Flattener<'r, 'p> {
    /// Create a flattener for interfaces reachable from `root`.
    pub fn new(resolver: &'r mut TypeResolver<'p>, root: &'p str) -> Self {
        Self { resolver, root, seen: HashSet::new(), in_progress: HashSet::new() }
    }

    /// Flatten `iface`, declared in `module` under the name `owner`.
    ///
    /// Fails as a whole if any embedding cannot be resolved to an interface.
    pub fn flatten(
        mut self,
        module: &'p str,
        owner: Option<DeclKey<'p>>,
        iface: &'p InterfaceType,
    ) -> Result<Vec<FlatMethod<'p>>> {
        let mut out = Vec::new();
        self.visit(module, owner, iface, &mut out)?;
        Ok(out)
    }

    fn visit(
        &mut self,
        module: &'p str,
        owner: Option<DeclKey<'p>>,
        iface: &'p InterfaceType,
        out: &mut Vec<FlatMethod<'p>>,
    ) -> Result<()> {
        if let Some(key) = owner {
            if !self.in_progress.insert(key) {
                return Err(SemanticError::Cycle(key.name.to_string()));
            }
        }

        for entry in &iface.methods {
            match entry {
                InterfaceEntry::Method { name, sig } => {
                    if !(name.is_exported() || module == self.root) {
                        continue;
                    }
                    if self.seen.insert(name.name.as_str()) {
                        out.push(FlatMethod { module, name: &name.name, sig });
                    }
                }
                InterfaceEntry::Embedded { ty } => {
                    let resolved = self.resolver.resolve(module, ty)?;
                    match resolved.terminal {
                        Terminal::Interface(inner) => {
                            self.visit(resolved.module, resolved.decl, inner, out)?
                        }
                        other => {
                            return Err(SemanticError::NotInterface {
                                name: embedded_name(ty),
                                kind: other.kind_name(),
                            })
                        }
                    }
                }
            }
        }

        if let Some(key) = owner {
            self.in_progress.remove(&key);
        }
        Ok(())
    }
}

/// Printable name of an embedded type expression.
fn embedded_name(ty: &TypeExpr) -> String {
    match ty {
        TypeExpr::Ident(ident) => ident.name.clone(),
        TypeExpr::Selector { package, name } => format!("{}.{}", package.name, name.name),
        TypeExpr::Paren { inner } => embedded_name(inner),
        other => other.kind_name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ir::test_utils::{named, qualified};

    #[test]
    fn test_embedded_name() {
        assert_eq!(embedded_name(&named("Reader", "io")), "Reader");
        assert_eq!(embedded_name(&qualified("io", "io", "Closer")), "io.Closer");
        assert_eq!(embedded_name(&TypeExpr::Other { text: "~int".into() }), "type");
    }
}

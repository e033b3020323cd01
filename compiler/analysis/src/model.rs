//! The render-ready model.
//!
//! Built once analysis succeeded and imports are finalized. All type text is
//! rendered to strings here, so the emitter never sees occurrences.

use std::collections::BTreeMap;

use ir::Position;
use registry::{DedupSet, ImportTable};
use types::{DeclarationRecord, FlagSet, OccurrenceArena, Policy, ShapeKind, Signature};

use crate::Naming;

/// Import path of the synchronization package.
pub const SYNC_PATH: &str = "sync";

/// Identifiers the emitter introduces inside dispatch bodies.
pub const HELPER_IDENTS: [&str; 3] = ["ev", "s", "wg"];

/// Everything the emitter needs.
#[derive(Debug, Clone)]
pub struct Model {
    /// Name of the root package
    pub package: String,
    /// Bound declarations in source order
    pub decls: Vec<DeclarationRecord>,
    /// Finalized imports
    pub imports: ImportTable,
    /// Occurrence spellings after alias rewriting
    pub occurrences: OccurrenceArena,
    /// Whether the sync package is required
    pub need_sync: bool,
    /// Whether a parameter shadows the sync package alias
    pub rename_sync_types: bool,
    /// One entry per event, in declaration order
    pub events: Vec<EventModel>,
}

/// One dispatcher to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventModel {
    /// Generated type name (e.g. `LoginEvent`)
    pub name: String,
    /// Generated subscriber record type name (e.g. `evonLoginEventSub`)
    pub sub: String,
    /// Handler type name (e.g. `LoginHandler`)
    pub handler: String,
    /// Func or interface
    pub kind: ShapeKind,
    /// Position of the handler type name
    pub position: Position,
    /// Flags of the annotation
    pub flags: FlagSet,
    /// Dispatch policy
    pub policy: Policy,
    /// One dispatch method per signature
    pub methods: Vec<MethodModel>,
    /// Helper identifier -> identifier safe to use in this event's methods
    pub helpers: BTreeMap<String, String>,
}

impl EventModel {
    /// The deduplicated spelling of a helper identifier.
    pub fn helper<'a>(&'a self, name: &'a str) -> &'a str {
        self.helpers.get(name).map(String::as_str).unwrap_or(name)
    }
}

/// A rendered signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodModel {
    /// Method name, empty for a func handler
    pub name: String,
    /// Parameter list, every parameter named
    pub params: String,
    /// Argument list forwarding the parameters
    pub args: String,
    /// Result list with blank names, empty when there are no results
    pub returns: String,
}

impl Model {
    /// Build the model from bound records and finalized imports.
    pub fn build(
        package: String,
        decls: Vec<DeclarationRecord>,
        occurrences: OccurrenceArena,
        imports: ImportTable,
        need_sync: bool,
        naming: &Naming,
    ) -> Self {
        let sync_alias = imports.alias_of(SYNC_PATH).unwrap_or(SYNC_PATH).to_string();
        let mut rename_sync_types = false;
        let mut events = Vec::new();

        for decl in &decls {
            for shape in &decl.events {
                let mut all = DedupSet::new();
                let methods = shape
                    .signatures
                    .iter()
                    .map(|sig| {
                        let (params, args) = params_args(sig, &occurrences, &mut all);
                        MethodModel {
                            name: sig.name.clone(),
                            params,
                            args,
                            returns: returns(sig, &occurrences),
                        }
                    })
                    .collect();

                // Parameter names are in `all` at this point.
                if all.contains(&sync_alias) {
                    rename_sync_types = true;
                }

                let helpers =
                    HELPER_IDENTS.iter().map(|h| (h.to_string(), all.resolve(h))).collect();

                let name = naming.event_name(&shape.name);
                events.push(EventModel {
                    sub: naming.sub_name(&name),
                    name,
                    handler: shape.name.clone(),
                    kind: shape.kind,
                    position: shape.position.clone(),
                    flags: decl.annotation.flags.clone(),
                    policy: decl.annotation.policy(),
                    methods,
                    helpers,
                });
            }
        }

        Self { package, decls, imports, occurrences, need_sync, rename_sync_types, events }
    }

    /// Whether no handler type was found.
    pub fn is_empty(&self) -> bool { self.decls.is_empty() }
}

/// Render parameters with every name filled in, plus the forwarding arguments.
///
/// Unnamed and blank parameters get `_1`, `_2`, ... avoiding the explicit
/// names of the same signature. Every final name is reserved in `all`.
fn params_args(sig: &Signature, arena: &OccurrenceArena, all: &mut DedupSet) -> (String, String) {
    let mut local = DedupSet::with_reserved(["_"]);
    for group in &sig.params {
        for name in group.names.iter().filter(|n| n.as_str() != "_") {
            local.reserve(name.clone());
        }
    }

    let mut params = Vec::with_capacity(sig.params.len());
    let mut args = Vec::new();
    for group in &sig.params {
        let names: Vec<String> = if group.names.is_empty() {
            vec![local.resolve("_")]
        } else {
            group
                .names
                .iter()
                .map(|n| if n == "_" { local.resolve("_") } else { n.clone() })
                .collect()
        };

        for name in &names {
            all.reserve(name.clone());
        }
        args.extend(names.iter().cloned());

        let dots = if group.variadic { "..." } else { "" };
        params.push(format!("{} {}{}", names.join(", "), dots, group.ty.render(arena)));
    }

    let mut args = args.join(", ");
    if sig.is_variadic() {
        args.push_str("...");
    }
    (params.join(", "), args)
}

/// Render results with blank names: `_ T` or `_, _ T` per group.
fn returns(sig: &Signature, arena: &OccurrenceArena) -> String {
    sig.results
        .iter()
        .map(|group| {
            let blanks = vec!["_"; group.names.len().max(1)].join(", ");
            format!("{} {}", blanks, group.ty.render(arena))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{ParamGroup, ResultGroup, TypeText};

    fn group(names: &[&str], ty: &str) -> ParamGroup {
        ParamGroup {
            names: names.iter().map(|n| n.to_string()).collect(),
            ty: TypeText::literal(ty),
            variadic: false,
        }
    }

    #[test]
    fn test_blank_params_are_numbered() {
        let sig = Signature {
            name: String::new(),
            params: vec![group(&[], "int"), group(&["_", "_1"], "string"), group(&["_"], "bool")],
            results: vec![],
        };
        let mut all = DedupSet::new();
        let (params, args) = params_args(&sig, &OccurrenceArena::new(), &mut all);

        assert_eq!(params, "_2 int, _3, _1 string, _4 bool");
        assert_eq!(args, "_2, _3, _1, _4");
        assert!(all.contains("_4"));
    }

    #[test]
    fn test_variadic_args_are_spread() {
        let mut tail = group(&["rest"], "interface{}");
        tail.variadic = true;
        let sig = Signature { name: "Log".into(), params: vec![group(&["f"], "string"), tail], results: vec![] };
        let (params, args) = params_args(&sig, &OccurrenceArena::new(), &mut DedupSet::new());

        assert_eq!(params, "f string, rest ...interface{}");
        assert_eq!(args, "f, rest...");
    }

    #[test]
    fn test_returns_are_blank() {
        let sig = Signature {
            name: String::new(),
            params: vec![],
            results: vec![
                ResultGroup { names: vec![], ty: TypeText::literal("int") },
                ResultGroup { names: vec!["a".into(), "b".into()], ty: TypeText::literal("error") },
            ],
        };
        assert_eq!(returns(&sig, &OccurrenceArena::new()), "_ int, _, _ error");
    }
}

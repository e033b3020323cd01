use evon_semantics::{SemanticError, ShapeExtractor};
use ir::test_utils::*;
use ir::{ChanDir, Program, TypeExpr, TypeSpec};
use registry::DedupSet;
use types::{EventShape, ShapeKind, Signature};

const APP: &str = "example.com/app";
const EVENTS: &str = "example.com/events";
const UTIL: &str = "example.com/a/util";
const OTHER_UTIL: &str = "example.com/x/util";

fn app_only(app: Vec<TypeSpec>) -> Program { program(app, vec![]) }

fn program(app: Vec<TypeSpec>, events: Vec<TypeSpec>) -> Program {
    let decls = |specs: Vec<TypeSpec>| specs.into_iter().map(|s| type_decl(None, s)).collect();
    Program::new(
        APP,
        vec![
            package(APP, "app", unit("app.go", vec![], decls(app))),
            package(EVENTS, "events", unit("events.go", vec![], decls(events))),
            package(UTIL, "util", unit("util.go", vec![], vec![])),
            package(OTHER_UTIL, "util", unit("util.go", vec![], vec![])),
        ],
    )
}

/// Extract `name` from the root package, finalize imports and render every
/// signature as `Name(params) (results)`.
fn extract(program: &Program, name: &str) -> Result<(EventShape, Vec<String>), SemanticError> {
    let (unit, spec) = program
        .root_package()
        .expect("root package")
        .type_specs()
        .find(|(_, s)| s.name.name == name)
        .expect("spec present");

    let mut extractor = ShapeExtractor::new(program);
    let shape = extractor.extract(unit, spec)?;
    let (mut arena, imports) = extractor.into_parts();
    imports.finalize(&mut arena, DedupSet::new());

    let rendered = shape
        .signatures
        .iter()
        .map(|sig| render(sig, &arena))
        .collect::<Vec<_>>();
    Ok((shape, rendered))
}

fn render(sig: &Signature, arena: &types::OccurrenceArena) -> String {
    let params: Vec<String> = sig
        .params
        .iter()
        .map(|p| {
            let dots = if p.variadic { "..." } else { "" };
            format!("{} {}{}", p.names.join(", "), dots, p.ty.render(arena)).trim().to_string()
        })
        .collect();
    let results: Vec<String> = sig
        .results
        .iter()
        .map(|r| format!("{} {}", r.names.join(", "), r.ty.render(arena)).trim().to_string())
        .collect();
    format!("{}({}) ({})", sig.name, params.join(", "), results.join(", "))
}

#[test]
fn test_plain_func_handler() {
    let program = app_only(vec![spec(
        "LoginHandler",
        3,
        func(vec![field(&["uid"], universe("int")), field(&["addr"], universe("string"))], vec![]),
    )]);

    let (shape, rendered) = extract(&program, "LoginHandler").expect("extracts");
    assert_eq!(shape.kind, ShapeKind::Func);
    assert_eq!(shape.signatures.len(), 1);
    assert!(shape.signatures[0].is_func());
    assert_eq!(rendered, vec!["(uid int, addr string) ()"]);
    assert_eq!(shape.position.to_string(), "app.go:3:6");
}

#[test]
fn test_diamond_embedding_yields_method_once() {
    let program = app_only(vec![
        spec("CHandler", 1, interface(vec![embed(named("A", APP)), embed(named("B", APP))])),
        spec("A", 2, interface(vec![embed(named("D", APP)), method("Fa", vec![], vec![])])),
        spec("B", 3, interface(vec![embed(named("D", APP)), method("Fb", vec![], vec![])])),
        spec("D", 4, interface(vec![method("M", vec![field(&["n"], universe("int"))], vec![])])),
    ]);

    let (shape, rendered) = extract(&program, "CHandler").expect("extracts");
    assert_eq!(shape.kind, ShapeKind::Interface);
    assert_eq!(rendered, vec!["M(n int) ()", "Fa() ()", "Fb() ()"]);
}

#[test]
fn test_foreign_unexported_methods_are_dropped() {
    let program = program(
        vec![
            spec("ListenHandler", 1, interface(vec![embed(qualified("events", EVENTS, "Listener"))])),
            spec("LocalHandler", 2, interface(vec![method("start", vec![], vec![]), method("Stop", vec![], vec![])])),
        ],
        vec![spec(
            "Listener",
            1,
            interface(vec![method("OnEvent", vec![], vec![]), method("reset", vec![], vec![])]),
        )],
    );

    let (_, rendered) = extract(&program, "ListenHandler").expect("extracts");
    assert_eq!(rendered, vec!["OnEvent() ()"]);

    let (_, rendered) = extract(&program, "LocalHandler").expect("extracts");
    assert_eq!(rendered, vec!["start() ()", "Stop() ()"]);
}

#[test]
fn test_only_invisible_methods_is_empty() {
    let program = program(
        vec![
            spec("HiddenHandler", 1, interface(vec![embed(qualified("events", EVENTS, "Internal"))])),
            spec("NothingHandler", 2, interface(vec![])),
        ],
        vec![spec("Internal", 1, interface(vec![method("flush", vec![], vec![])]))],
    );

    for name in ["HiddenHandler", "NothingHandler"] {
        let err = extract(&program, name).expect_err("no methods");
        assert_eq!(err, SemanticError::EmptyInterface(name.to_string()));
    }
}

#[test]
fn test_error_embedding() {
    let program = app_only(vec![spec(
        "FailHandler",
        1,
        interface(vec![embed(universe("error")), method("Code", vec![], vec![field(&[], universe("int"))])]),
    )]);

    let (_, rendered) = extract(&program, "FailHandler").expect("extracts");
    assert_eq!(rendered, vec!["Error() (string)", "Code() (int)"]);
}

#[test]
fn test_embedding_cycle_is_reported() {
    let program = app_only(vec![
        spec("XHandler", 1, interface(vec![embed(named("A", APP))])),
        spec("A", 2, interface(vec![method("Ping", vec![], vec![]), embed(named("B", APP))])),
        spec("B", 3, interface(vec![embed(named("A", APP))])),
    ]);

    let err = extract(&program, "XHandler").expect_err("cycle");
    assert!(matches!(err, SemanticError::Cycle(_)));
}

#[test]
fn test_self_embedding_is_reported() {
    let program = app_only(vec![spec("SelfHandler", 1, interface(vec![embed(named("SelfHandler", APP))]))]);

    let err = extract(&program, "SelfHandler").expect_err("cycle");
    assert!(matches!(err, SemanticError::Cycle(_)));
}

#[test]
fn test_embedding_non_interface_fails_whole_call() {
    let program = app_only(vec![
        spec("XHandler", 1, interface(vec![method("Ok", vec![], vec![]), embed(named("Fn", APP))])),
        spec("Fn", 2, func(vec![], vec![])),
        spec("YHandler", 3, interface(vec![embed(unbound("Gone"))])),
    ]);

    let err = extract(&program, "XHandler").expect_err("not an interface");
    assert_eq!(err, SemanticError::NotInterface { name: "Fn".into(), kind: "func type" });

    let err = extract(&program, "YHandler").expect_err("unresolved");
    assert_eq!(err, SemanticError::Unresolved("Gone".into()));
}

#[test]
fn test_unsupported_shapes() {
    let program = app_only(vec![
        spec("SHandler", 1, TypeExpr::Struct { fields: vec![] }),
        spec("IHandler", 2, universe("int")),
    ]);

    assert_eq!(
        extract(&program, "SHandler").expect_err("struct"),
        SemanticError::Unsupported { name: "SHandler".into(), kind: "struct type" }
    );
    assert!(matches!(
        extract(&program, "IHandler").expect_err("int"),
        SemanticError::Unsupported { .. }
    ));
}

#[test]
fn test_variadic_and_composite_printing() {
    let callback = func(vec![field(&[], universe("int"))], vec![field(&[], universe("error"))]);
    let chan = TypeExpr::Chan {
        dir: ChanDir::Recv,
        elem: Box::new(slice(pointer(qualified("util", UTIL, "Item")))),
    };
    let map = TypeExpr::Map {
        key: Box::new(universe("string")),
        value: Box::new(TypeExpr::Array { len: "2".into(), elem: Box::new(universe("int")) }),
    };

    let program = app_only(vec![spec(
        "LogHandler",
        1,
        func(
            vec![
                field(&["cb"], callback),
                field(&["ch"], chan),
                field(&["m"], map),
                field(&["args"], ellipsis(interface(vec![]))),
            ],
            vec![field(&["n", "m2"], universe("int"))],
        ),
    )]);

    let (shape, rendered) = extract(&program, "LogHandler").expect("extracts");
    assert!(shape.signatures[0].is_variadic());
    assert_eq!(
        rendered,
        vec![
            "(cb func(int) error, ch <-chan []*util.Item, m map[string][2]int, args ...interface{}) \
             (n, m2 int)"
        ]
    );
}

#[test]
fn test_colliding_package_names_are_aliased() {
    let program = program(
        vec![spec(
            "SyncHandler",
            1,
            func(
                vec![
                    field(&["a"], qualified("util", UTIL, "A")),
                    field(&["b"], qualified("u2", OTHER_UTIL, "B")),
                ],
                vec![],
            ),
        )],
        vec![],
    );

    let (_, rendered) = extract(&program, "SyncHandler").expect("extracts");
    assert_eq!(rendered, vec!["(a util.A, b util1.B) ()"]);
}

#[test]
fn test_foreign_unqualified_types_are_qualified() {
    let program = program(
        vec![spec("NotifyHandler", 1, qualified("events", EVENTS, "Notify"))],
        vec![
            spec("Notify", 1, func(vec![field(&["p"], pointer(named("Payload", EVENTS)))], vec![])),
            spec("Payload", 2, TypeExpr::Struct { fields: vec![] }),
        ],
    );

    let (_, rendered) = extract(&program, "NotifyHandler").expect("extracts");
    assert_eq!(rendered, vec!["(p *events.Payload) ()"]);
}

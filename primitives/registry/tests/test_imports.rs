use registry::{DedupSet, ImportRegistry, ImportTier};
use types::{OccurrenceArena, TypeText};

fn two_utils(arena: &mut OccurrenceArena) -> (ImportRegistry, TypeText, TypeText) {
    let mut registry = ImportRegistry::new();

    // `util.Config` from github.com/acme/util
    let mut first = TypeText::new();
    let pkg = arena.alloc("util");
    first.push_occurrence(pkg);
    first.push_str(".Config");
    registry.add_package_occurrence("github.com/acme/util", "util", pkg);

    // unqualified `Options` declared inside github.com/other/util
    let mut second = TypeText::literal("*");
    let ty = arena.alloc("Options");
    second.push_occurrence(ty);
    registry.add_type_occurrence("github.com/other/util", "util", ty);

    (registry, first, second)
}

#[test]
fn test_colliding_names_get_distinct_aliases() {
    let mut arena = OccurrenceArena::new();
    let (registry, first, second) = two_utils(&mut arena);
    let table = registry.finalize(&mut arena, DedupSet::new());

    assert_eq!(table.alias_of("github.com/acme/util"), Some("util"));
    assert_eq!(table.alias_of("github.com/other/util"), Some("util1"));
    assert_eq!(first.render(&arena), "util.Config");
    assert_eq!(second.render(&arena), "*util1.Options");

    let explicit: Vec<Option<&str>> = table.entries().iter().map(|e| e.explicit_alias()).collect();
    assert_eq!(explicit, vec![None, Some("util1")]);
}

#[test]
fn test_alias_assignment_is_stable() {
    let run = || {
        let mut arena = OccurrenceArena::new();
        let (registry, first, second) = two_utils(&mut arena);
        let table = registry.finalize(&mut arena, DedupSet::new());
        (table, first.render(&arena), second.render(&arena))
    };

    let (a, a1, a2) = run();
    for _ in 0..8 {
        let (b, b1, b2) = run();
        assert_eq!(a, b);
        assert_eq!(a1, b1);
        assert_eq!(a2, b2);
    }
}

#[test]
fn test_tier_ordering() {
    let mut arena = OccurrenceArena::new();
    let mut registry = ImportRegistry::new();
    registry.add_package_occurrence("github.com/acme/zeta", "zeta", arena.alloc("zeta"));
    registry.add_package_occurrence("time", "time", arena.alloc("time"));
    registry.add_package_occurrence("context", "context", arena.alloc("context"));
    registry.require("sync", "sync");
    assert_eq!(registry.len(), 4);

    let table = registry.finalize(&mut arena, DedupSet::new());
    let paths: Vec<&str> = table.entries().iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["sync", "context", "time", "github.com/acme/zeta"]);
    assert_eq!(table.entries()[0].tier, ImportTier::Internal);
    assert_eq!(table.entries()[3].tier, ImportTier::Dependency);
}

#[test]
fn test_required_package_keeps_internal_tier() {
    let mut arena = OccurrenceArena::new();
    let mut registry = ImportRegistry::new();
    let id = arena.alloc("sync");
    registry.add_package_occurrence("sync", "sync", id);
    registry.require("sync", "sync");

    let table = registry.finalize(&mut arena, DedupSet::new());
    assert_eq!(table.entries().len(), 1);
    assert_eq!(table.entries()[0].tier, ImportTier::Internal);
    assert_eq!(arena.get(id), "sync");
}

#[test]
fn test_reserved_alias_is_skipped() {
    let mut arena = OccurrenceArena::new();
    let mut registry = ImportRegistry::new();
    let id = arena.alloc("Reader");
    registry.add_type_occurrence("io", "io", id);

    let table = registry.finalize(&mut arena, DedupSet::with_reserved(["io"]));
    assert_eq!(table.alias_of("io"), Some("io1"));
    assert_eq!(arena.get(id), "io1.Reader");
    assert!(table.alias_of("os").is_none());
}

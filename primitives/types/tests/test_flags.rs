use ir::Position;
use types::{Annotation, DeliveryMode, Flag, FlagError, FlagSet, OccurrenceArena, Policy, TypeText};

fn flags(list: &[Flag]) -> FlagSet { list.iter().copied().collect() }

#[test]
fn test_validate_every_subset() {
    for mask in 0u32..(1 << Flag::ALL.len()) {
        let set: FlagSet =
            Flag::ALL.iter().enumerate().filter(|(i, _)| mask & (1 << i) != 0).map(|(_, f)| *f).collect();

        let spawn = set.contains(Flag::Spawn);
        let queue = set.contains(Flag::Queue);
        let wait = set.contains(Flag::Wait);
        let expected = !(spawn && queue) && !(wait && !spawn && !queue);

        assert_eq!(set.validate().is_ok(), expected, "unexpected verdict for {}", set);
    }
}

#[test]
fn test_validate_errors() {
    assert_eq!(
        flags(&[Flag::Spawn, Flag::Queue]).validate(),
        Err(FlagError::Conflict(Flag::Spawn, Flag::Queue))
    );
    assert_eq!(
        flags(&[Flag::Wait, Flag::Lock]).validate(),
        Err(FlagError::Dependency(Flag::Wait, Flag::Spawn, Flag::Queue))
    );
    assert_eq!(
        FlagError::Conflict(Flag::Spawn, Flag::Queue).to_string(),
        "Flag \"spawn\" cannot coexist with \"queue\""
    );
    assert_eq!(
        FlagError::Dependency(Flag::Wait, Flag::Spawn, Flag::Queue).to_string(),
        "Flag \"wait\" can only be used together with \"spawn\" or \"queue\""
    );
}

#[test]
fn test_display_sorted() {
    let set = flags(&[Flag::Wait, Flag::Queue, Flag::Catch]);
    assert_eq!(set.to_string(), "(catch, queue, wait)");
    assert_eq!(FlagSet::new().to_string(), "()");
}

#[test]
fn test_default_policy() {
    let policy = Policy::from_flags(&FlagSet::new());
    assert_eq!(policy.delivery, DeliveryMode::Synchronous);
    assert!(!policy.wait && !policy.lock && !policy.pause && !policy.unsub && !policy.catch);
    assert_eq!(policy, Policy::default());
}

#[test]
fn test_queue_wait_catch_policy() {
    let set = flags(&[Flag::Queue, Flag::Wait, Flag::Catch]);
    assert!(set.validate().is_ok());

    let policy = Policy::from_flags(&set);
    assert_eq!(policy.delivery, DeliveryMode::Queue);
    assert!(policy.wait);
    assert!(policy.catch);
    assert!(!policy.lock);
    assert!(policy.needs_wait_group());

    let mut with_spawn = set.clone();
    with_spawn.insert(Flag::Spawn);
    assert!(with_spawn.validate().is_err());
}

#[test]
fn test_annotation_needs_sync() {
    let position = Position::default();
    let lock = Annotation { position: position.clone(), flags: flags(&[Flag::Lock]) };
    let wait = Annotation { position: position.clone(), flags: flags(&[Flag::Spawn, Flag::Wait]) };
    let spawn = Annotation { position, flags: flags(&[Flag::Spawn, Flag::Catch]) };
    assert!(lock.needs_sync());
    assert!(wait.needs_sync());
    assert!(!spawn.needs_sync());
    assert_eq!(spawn.policy().delivery, DeliveryMode::Spawn);
}

#[test]
fn test_type_text_rewrite() {
    let mut arena = OccurrenceArena::new();
    let mut text = TypeText::literal("map[string]");
    let id = arena.alloc("Config");
    text.push_occurrence(id);

    assert_eq!(text.render(&arena), "map[string]Config");
    arena.rewrite(id, "util1.Config");
    assert_eq!(text.render(&arena), "map[string]util1.Config");
    assert_eq!(arena.len(), 1);
}

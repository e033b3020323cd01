//! Annotation flags.
//!
//! The vocabulary is fixed. A [`FlagSet`] keeps flags sorted, so formatting is
//! stable no matter in which order the annotation listed them.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use ir::Position;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A recognized annotation flag.
///
/// Variants are declared in alphabetical order; the derived `Ord` is relied on
/// for sorted output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    /// Recover handler panics
    Catch,
    /// Serialize dispatch with a mutex
    Lock,
    /// Allow pausing and resuming dispatch
    Pause,
    /// Deliver through a per-subscriber queue
    Queue,
    /// Deliver each call on its own goroutine
    Spawn,
    /// Return an unsubscribe function from `Sub`
    Unsub,
    /// Wait for asynchronous deliveries to complete
    Wait,
}

impl Flag {
    /// Every flag, in sorted order.
    pub const ALL: [Flag; 7] =
        [Flag::Catch, Flag::Lock, Flag::Pause, Flag::Queue, Flag::Spawn, Flag::Unsub, Flag::Wait];

    /// Get the string representation of the flag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Flag::Catch => "catch",
            Flag::Lock => "lock",
            Flag::Pause => "pause",
            Flag::Queue => "queue",
            Flag::Spawn => "spawn",
            Flag::Unsub => "unsub",
            Flag::Wait => "wait",
        }
    }
}

impl FromStr for Flag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Flag::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("Invalid flag \"{}\"", s))
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str()) }
}

/// Violations of the flag combination rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagError {
    /// Two mutually exclusive flags are present
    #[error("Flag \"{0}\" cannot coexist with \"{1}\"")]
    Conflict(Flag, Flag),
    /// A flag is present without any of the flags it depends on
    #[error("Flag \"{0}\" can only be used together with \"{1}\" or \"{2}\"")]
    Dependency(Flag, Flag, Flag),
}

/// A sorted set of flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlagSet(BTreeSet<Flag>);

impl FlagSet {
    /// Create an empty set.
    pub fn new() -> Self { Self::default() }

    /// Add a flag. Returns false if it was already present.
    pub fn insert(&mut self, flag: Flag) -> bool { self.0.insert(flag) }

    /// Whether `flag` is present.
    pub fn contains(&self, flag: Flag) -> bool { self.0.contains(&flag) }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Number of flags.
    pub fn len(&self) -> usize { self.0.len() }

    /// Flags in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = Flag> + '_ { self.0.iter().copied() }

    /// Check the combination rules: `spawn` excludes `queue`, and `wait` needs
    /// one of them.
    pub fn validate(&self) -> Result<(), FlagError> {
        if self.contains(Flag::Spawn) && self.contains(Flag::Queue) {
            return Err(FlagError::Conflict(Flag::Spawn, Flag::Queue));
        }
        if self.contains(Flag::Wait) && !(self.contains(Flag::Spawn) || self.contains(Flag::Queue))
        {
            return Err(FlagError::Dependency(Flag::Wait, Flag::Spawn, Flag::Queue));
        }
        Ok(())
    }
}

impl FromIterator<Flag> for FlagSet {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self { Self(iter.into_iter().collect()) }
}

/// Formats as `(a, b, c)`, sorted.
impl fmt::Display for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|fl| fl.as_str()).collect();
        write!(f, "({})", names.join(", "))
    }
}

/// A validated `@evon(...)` annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Position of the `@` of the marker
    pub position: Position,
    /// Validated flags
    pub flags: FlagSet,
}

impl Annotation {
    /// Whether dispatchers for this annotation need the sync package.
    pub fn needs_sync(&self) -> bool {
        self.flags.contains(Flag::Lock) || self.flags.contains(Flag::Wait)
    }

    /// The dispatch policy selected by the flags.
    pub fn policy(&self) -> Policy { Policy::from_flags(&self.flags) }
}

/// How calls reach subscribers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Handlers run on the emitting goroutine, one after another
    #[default]
    Synchronous,
    /// Every handler call runs on a fresh goroutine
    Spawn,
    /// Every subscriber owns a queue drained by its own goroutine
    Queue,
}

/// The full dispatch contract handed to the emitter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Policy {
    /// Delivery mode
    pub delivery: DeliveryMode,
    /// Wait for asynchronous deliveries before returning
    pub wait: bool,
    /// Hold a mutex while subscribing and dispatching
    pub lock: bool,
    /// Support pausing
    pub pause: bool,
    /// Return an unsubscribe function from `Sub`
    pub unsub: bool,
    /// Recover handler panics
    pub catch: bool,
}

impl Policy {
    /// Map a validated flag set to its policy.
    pub fn from_flags(flags: &FlagSet) -> Self {
        let delivery = if flags.contains(Flag::Spawn) {
            DeliveryMode::Spawn
        } else if flags.contains(Flag::Queue) {
            DeliveryMode::Queue
        } else {
            DeliveryMode::Synchronous
        };

        Self {
            delivery,
            wait: flags.contains(Flag::Wait),
            lock: flags.contains(Flag::Lock),
            pause: flags.contains(Flag::Pause),
            unsub: flags.contains(Flag::Unsub),
            catch: flags.contains(Flag::Catch),
        }
    }

    /// Whether the generated code needs a wait group.
    pub fn needs_wait_group(&self) -> bool {
        self.wait && self.delivery != DeliveryMode::Synchronous
    }
}

//! Import registry.
//!
//! Shape extraction records every identifier that refers to a foreign package,
//! either the package name itself (`util` in `util.Config`) or an unqualified
//! type owned by a foreign package (`Config` when the signature was declared
//! inside `util`). Once analysis is done, [`ImportRegistry::finalize`] assigns
//! aliases and rewrites every recorded occurrence.

use std::collections::HashMap;

use types::{OccurrenceArena, OccurrenceId};

use crate::dedup::DedupSet;

/// Ordering tier of an import. Lower tiers are listed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ImportTier {
    /// Required by the generated code itself (e.g. `sync`)
    Internal,
    /// Referenced by user types, standard library path
    Standard,
    /// Referenced by user types, third-party path
    Dependency,
}

impl ImportTier {
    /// Tier for a package referenced from user types.
    ///
    /// Standard library paths have no dot in them.
    pub fn for_path(path: &str) -> Self {
        if path.contains('.') {
            ImportTier::Dependency
        } else {
            ImportTier::Standard
        }
    }
}

/// Everything recorded about one imported package.
#[derive(Debug, Clone)]
pub struct ImportRecord {
    /// Import path
    pub path: String,
    /// Declared package name, the default alias
    pub name: String,
    /// Ordering tier
    pub tier: ImportTier,
    /// Occurrences spelling the package name itself
    pub package_occurrences: Vec<OccurrenceId>,
    /// Occurrences spelling an unqualified type owned by the package
    pub type_occurrences: Vec<OccurrenceId>,
}

/// Collects import records by path.
#[derive(Debug, Default)]
pub struct ImportRegistry {
    records: HashMap<String, ImportRecord>,
}

impl ImportRegistry {
    /// Create an empty registry.
    pub fn new() -> Self { Self::default() }

    /// Get or create the record for `path`, raising its tier to `tier` if that
    /// ranks higher.
    pub fn record(&mut self, path: &str, name: &str, tier: ImportTier) -> &mut ImportRecord {
        let rec = self.records.entry(path.to_string()).or_insert_with(|| ImportRecord {
            path: path.to_string(),
            name: name.to_string(),
            tier,
            package_occurrences: Vec::new(),
            type_occurrences: Vec::new(),
        });
        rec.tier = rec.tier.min(tier);
        rec
    }

    /// Require a package for the generated code's own use.
    pub fn require(&mut self, path: &str, name: &str) {
        self.record(path, name, ImportTier::Internal);
    }

    /// Record an occurrence of the package name of `path`.
    pub fn add_package_occurrence(&mut self, path: &str, name: &str, id: OccurrenceId) {
        self.record(path, name, ImportTier::for_path(path)).package_occurrences.push(id);
    }

    /// Record an unqualified occurrence of a type owned by `path`.
    pub fn add_type_occurrence(&mut self, path: &str, name: &str, id: OccurrenceId) {
        self.record(path, name, ImportTier::for_path(path)).type_occurrences.push(id);
    }

    /// Whether `path` has been recorded.
    pub fn contains(&self, path: &str) -> bool { self.records.contains_key(path) }

    /// Number of recorded packages.
    pub fn len(&self) -> usize { self.records.len() }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    /// Assign aliases in `(tier, path)` order and rewrite all occurrences.
    ///
    /// `aliases` is the package-name namespace; it may be pre-seeded with names
    /// that must not be used as aliases.
    pub fn finalize(self, arena: &mut OccurrenceArena, mut aliases: DedupSet) -> ImportTable {
        let mut records: Vec<ImportRecord> = self.records.into_values().collect();
        records.sort_by(|a, b| (a.tier, &a.path).cmp(&(b.tier, &b.path)));

        let mut entries = Vec::with_capacity(records.len());
        for rec in records {
            let alias = aliases.resolve(&rec.name);
            if alias != rec.name {
                logging::trace(
                    "imports",
                    &format!("aliasing {} as {} (name {} taken)", rec.path, alias, rec.name),
                );
            }

            for id in &rec.type_occurrences {
                let qualified = format!("{}.{}", alias, arena.get(*id));
                arena.rewrite(*id, qualified);
            }
            for id in &rec.package_occurrences {
                arena.rewrite(*id, alias.clone());
            }

            entries.push(ImportEntry { path: rec.path, name: rec.name, alias, tier: rec.tier });
        }

        ImportTable { entries }
    }
}

/// A finalized import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    /// Import path
    pub path: String,
    /// Declared package name
    pub name: String,
    /// Assigned alias
    pub alias: String,
    /// Ordering tier
    pub tier: ImportTier,
}

impl ImportEntry {
    /// The alias if it must be spelled out in the import declaration.
    pub fn explicit_alias(&self) -> Option<&str> {
        (self.alias != self.name).then_some(self.alias.as_str())
    }
}

/// Finalized imports in `(tier, path)` order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportTable {
    entries: Vec<ImportEntry>,
}

impl ImportTable {
    /// The entries in order.
    pub fn entries(&self) -> &[ImportEntry] { &self.entries }

    /// Alias assigned to `path`.
    pub fn alias_of(&self, path: &str) -> Option<&str> {
        self.entries.iter().find(|e| e.path == path).map(|e| e.alias.as_str())
    }

    /// Whether there are no imports.
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

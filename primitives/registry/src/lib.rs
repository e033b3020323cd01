#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Name registries for collision-free identifier allocation.
//!
//! This crate provides the in-memory namespaces used while preparing a model
//! for rendering: [`DedupSet`] hands out unique identifiers from proposed base
//! names, and [`ImportRegistry`] collects foreign package references and assigns
//! each package a stable, unique alias.

pub mod dedup;
pub mod imports;

pub use dedup::DedupSet;
pub use imports::{ImportEntry, ImportRecord, ImportRegistry, ImportTable, ImportTier};

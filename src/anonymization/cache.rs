//! Mapping cache: per-table normalized original -> replacement

use std::collections::{HashMap, HashSet};
use std::fmt;

use super::pools::PoolKind;

/// One consistency table; repeated originals in the same table get the same replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheTable {
    Identifier,
    Telecom,
    EntityName,
    /// Character-class scrambles, keyed by the kind of value scrambled
    LikeChars(LikeCharKind),
    Pool(PoolKind),
}

/// Kinds of value that receive character-class scrambles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LikeCharKind {
    HouseNumber,
    NumberSuffix,
    UnitId,
    PostBox,
    PostalCode,
    TelecomNumber,
    /// Short or numeric values that fell back from a pool lookup
    ShortValue,
    /// Address tokens the parser could not label
    Unlabeled,
}

impl fmt::Display for CacheTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheTable::Identifier => f.write_str("identifier"),
            CacheTable::Telecom => f.write_str("telecom"),
            CacheTable::EntityName => f.write_str("entity_name"),
            CacheTable::LikeChars(kind) => write!(f, "like_chars:{kind:?}"),
            CacheTable::Pool(kind) => write!(f, "pool:{kind}"),
        }
    }
}

#[derive(Debug, Default, Clone)]
struct Table {
    forward: HashMap<String, String>,
    used: HashSet<String>,
}

/// Consistency store owned by one anonymizer for its whole lifetime
#[derive(Debug, Default, Clone)]
pub struct MappingCache {
    tables: HashMap<CacheTable, Table>,
}

impl MappingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, table: CacheTable, key: &str) -> Option<&str> {
        self.tables
            .get(&table)
            .and_then(|t| t.forward.get(key))
            .map(String::as_str)
    }

    /// Whether a replacement has already been handed out for another original
    pub fn is_used(&self, table: CacheTable, replacement: &str) -> bool {
        self.tables
            .get(&table)
            .is_some_and(|t| t.used.contains(replacement))
    }

    /// Records a mapping; an existing mapping for the key is kept
    pub fn insert(&mut self, table: CacheTable, key: String, replacement: String) -> &str {
        let entry = self.tables.entry(table).or_default();
        entry.used.insert(replacement.clone());
        entry.forward.entry(key).or_insert(replacement)
    }

    /// Number of distinct originals in one table
    pub fn table_len(&self, table: CacheTable) -> usize {
        self.tables.get(&table).map_or(0, |t| t.forward.len())
    }

    /// Number of distinct originals across all tables
    pub fn len(&self) -> usize {
        self.tables.values().map(|t| t.forward.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

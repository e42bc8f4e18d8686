//! Term tables: keyword → semantic attributes.
//!
//! A [`TermTable`] is built once by merging one or more tabular sources and
//! is read-only afterwards. All lookups are lowercase exact-string matches
//! that try the literal keyword first and then its `replace` form. A miss at
//! both stages means "no attribute", never a guess.
//!
//! ## Source format
//!
//! CSV with a header row. Recognised columns:
//!
//! - `keyword` (or `pattern`) - the surface keyword, required
//! - `label` - term class of the keyword (`dispersal_term`, ...)
//! - `type` - canonical type
//! - `replace` - normalized form
//! - `core_fruit_type` - core fruit type implied by the keyword
//! - one 0/1 column per dispersal trait name
//!
//! Sources are merged in declared order. When two sources define the same
//! keyword, fields present in the later source overwrite the earlier ones.

mod tagger;

pub use tagger::TermTagger;

use std::collections::{BTreeSet, HashMap};
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::vocabulary::{correct_column, is_trait_name};
use crate::{FloraError, FloraResult, TermClass};

/// Attributes attached to one keyword.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermEntry {
    /// Term class used when tagging tokens
    pub term_class: Option<TermClass>,
    /// Canonical type (`type` column)
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Normalized form (`replace` column)
    pub replace: Option<String>,
    pub core_fruit_type: Option<String>,
    /// Trait names flagged 1 for this keyword
    pub traits: Vec<String>,
}

impl TermEntry {
    pub fn new(term_class: Option<TermClass>) -> Self {
        Self {
            term_class,
            ..Self::default()
        }
    }

    pub fn with_type(mut self, kind: &str) -> Self {
        self.kind = Some(kind.to_string());
        self
    }

    pub fn with_replace(mut self, replace: &str) -> Self {
        self.replace = Some(replace.to_lowercase());
        self
    }

    pub fn with_core_fruit_type(mut self, core: &str) -> Self {
        self.core_fruit_type = Some(core.to_lowercase());
        self
    }

    pub fn with_traits(mut self, traits: &[&str]) -> Self {
        self.traits = traits.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Overwrite fields that `later` defines. Returns true if a defined
    /// field changed value.
    fn merge_from(&mut self, later: TermEntry) -> bool {
        fn take<T: PartialEq>(slot: &mut Option<T>, later: Option<T>) -> bool {
            match later {
                Some(value) => {
                    let changed = slot.as_ref().map_or(false, |old| *old != value);
                    *slot = Some(value);
                    changed
                }
                None => false,
            }
        }

        let mut changed = take(&mut self.term_class, later.term_class);
        changed |= take(&mut self.kind, later.kind);
        changed |= take(&mut self.replace, later.replace);
        changed |= take(&mut self.core_fruit_type, later.core_fruit_type);
        if !later.traits.is_empty() {
            changed |= !self.traits.is_empty() && self.traits != later.traits;
            self.traits = later.traits;
        }
        changed
    }
}

/// One tabular source of terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermSource {
    pub path: PathBuf,
    /// Class given to rows that have no `label` column value
    #[serde(default)]
    pub term_class: Option<TermClass>,
}

impl TermSource {
    pub fn new(path: impl Into<PathBuf>, term_class: Option<TermClass>) -> Self {
        Self {
            path: path.into(),
            term_class,
        }
    }
}

/// Immutable keyword lookup built from one or more sources.
#[derive(Debug, Clone, Default)]
pub struct TermTable {
    entries: HashMap<String, TermEntry>,
}

impl TermTable {
    /// A table where every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load and merge sources in order.
    ///
    /// A missing source file is logged and skipped; an unreadable one is an
    /// error.
    pub fn load(sources: &[TermSource]) -> FloraResult<Self> {
        let mut table = Self::empty();
        for source in sources {
            table.load_source(source)?;
        }
        tracing::debug!(keywords = table.len(), "term table loaded");
        Ok(table)
    }

    fn load_source(&mut self, source: &TermSource) -> FloraResult<()> {
        let name = source.path.display().to_string();
        if !source.path.exists() {
            tracing::warn!(path = %name, "term table not found, skipping");
            return Ok(());
        }
        let file = std::fs::File::open(&source.path).map_err(|e| FloraError::TermTable {
            path: name.clone(),
            message: e.to_string(),
        })?;
        self.merge_csv(file, source.term_class, &name)
    }

    /// Merge CSV rows read from `reader` into the table.
    pub fn merge_csv<R: io::Read>(
        &mut self,
        reader: R,
        default_class: Option<TermClass>,
        name: &str,
    ) -> FloraResult<()> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        let csv_error = |e: csv::Error| FloraError::TermTable {
            path: name.to_string(),
            message: e.to_string(),
        };

        let headers: Vec<String> = reader
            .headers()
            .map_err(&csv_error)?
            .iter()
            .map(|h| correct_column(&h.trim().to_lowercase()).to_string())
            .collect();
        let column = |wanted: &str| headers.iter().position(|h| h == wanted);

        let keyword_col = column("keyword")
            .or_else(|| column("pattern"))
            .ok_or_else(|| FloraError::MissingKeywordColumn {
                path: name.to_string(),
            })?;
        let label_col = column("label");
        let type_col = column("type");
        let replace_col = column("replace");
        let core_col = column("core_fruit_type");
        let trait_cols: Vec<(usize, &str)> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| is_trait_name(h))
            .map(|(i, h)| (i, h.as_str()))
            .collect();

        for record in reader.records() {
            let record = record.map_err(&csv_error)?;
            let field = |col: Option<usize>| {
                col.and_then(|i| record.get(i))
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
            };

            let keyword = match field(Some(keyword_col)) {
                Some(keyword) => keyword.to_lowercase(),
                None => continue,
            };
            let term_class = match field(label_col) {
                Some(label) => {
                    let class = TermClass::from_label(label);
                    if class.is_none() {
                        tracing::debug!(%keyword, %label, source = name, "unknown term label");
                    }
                    class.or(default_class)
                }
                None => default_class,
            };
            let entry = TermEntry {
                term_class,
                kind: field(type_col).map(str::to_string),
                replace: field(replace_col).map(str::to_lowercase),
                core_fruit_type: field(core_col).map(str::to_lowercase),
                traits: trait_cols
                    .iter()
                    .filter(|(i, _)| is_flag_set(record.get(*i)))
                    .map(|(_, name)| name.to_string())
                    .collect(),
            };
            self.insert(&keyword, entry);
        }
        Ok(())
    }

    /// Insert or merge one keyword. Later values win per field.
    pub fn insert(&mut self, keyword: &str, entry: TermEntry) {
        let keyword = keyword.trim().to_lowercase();
        match self.entries.get_mut(&keyword) {
            Some(existing) => {
                if existing.merge_from(entry) {
                    tracing::debug!(%keyword, "term collision, last loaded wins");
                }
            }
            None => {
                self.entries.insert(keyword, entry);
            }
        }
    }

    pub fn with(mut self, keyword: &str, entry: TermEntry) -> Self {
        self.insert(keyword, entry);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, keyword: &str) -> Option<&TermEntry> {
        self.entries.get(&keyword.trim().to_lowercase())
    }

    /// Every keyword with its entry, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TermEntry)> + '_ {
        self.entries.iter().map(|(keyword, entry)| (keyword.as_str(), entry))
    }

    /// Look a field up on the literal key, then on its replacement.
    fn lookup_with<'a, T: ?Sized>(
        &'a self,
        key: &str,
        field: impl Fn(&'a TermEntry) -> Option<&'a T>,
    ) -> Option<&'a T> {
        let key = key.trim().to_lowercase();
        let literal = self.entries.get(&key)?;
        if let Some(found) = field(literal) {
            return Some(found);
        }
        let norm = literal.replace.as_deref()?;
        self.entries.get(norm).and_then(field)
    }

    pub fn lookup_type(&self, key: &str) -> Option<&str> {
        self.lookup_with(key, |e| e.kind.as_deref())
    }

    pub fn lookup_replacement(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|e| e.replace.as_deref())
    }

    /// Trait names mapped to `key`; empty when none are.
    pub fn lookup_trait_list(&self, key: &str) -> &[String] {
        self.lookup_with(key, |e| {
            if e.traits.is_empty() {
                None
            } else {
                Some(e.traits.as_slice())
            }
        })
        .unwrap_or(&[])
    }

    pub fn lookup_core_fruit_type(&self, key: &str) -> Option<&str> {
        self.lookup_with(key, |e| e.core_fruit_type.as_deref())
    }

    /// Keywords that carry a term class, for tagging.
    pub fn phrases(&self) -> impl Iterator<Item = (&str, TermClass)> + '_ {
        self.entries
            .iter()
            .filter_map(|(keyword, entry)| entry.term_class.map(|class| (keyword.as_str(), class)))
    }

    /// Canonical names of every fruit type the table knows about.
    ///
    /// Covers the normalized form of each fruit-type keyword and every core
    /// fruit type value.
    pub fn canonical_fruit_types(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        for (keyword, entry) in &self.entries {
            if let Some(core) = &entry.core_fruit_type {
                names.insert(core.clone());
            }
            if entry.term_class == Some(TermClass::FruitTypeTerm) {
                let canonical = self
                    .lookup_core_fruit_type(keyword)
                    .or_else(|| entry.replace.as_deref())
                    .unwrap_or(keyword.as_str());
                names.insert(canonical.to_string());
            }
        }
        names
    }
}

fn is_flag_set(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_lowercase()).as_deref(),
        Some("1") | Some("true") | Some("yes")
    )
}

/// Resolve `path` against `base` unless it is already absolute.
pub fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

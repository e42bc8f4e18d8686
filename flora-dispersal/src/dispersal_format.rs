//! Aggregation of dispersal keys into the ternary trait block.
//!
//! - `1` when a trait is present
//! - `0` only when it is explicitly absent (`wingless`, `without pappus`)
//! - omitted when unknown
//!
//! Only keys attributed to a fruit, a seed or a fruit type are counted.
//! Every dispersal and fruit-type key is removed from the bag, whether it
//! counted or not, so formatting a bag twice leaves an empty block.

use std::collections::{BTreeSet, HashSet};

use layered_flora::vocabulary::{is_trait_name, strip_absent, DISPERSAL_TRAIT_NAMES};
use layered_flora::TermTable;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::export::{
    PropertyBag, FRUIT_TYPE_KEY, FRUIT_TYPE_KEYWORD_KEY, KEYWORD_SUFFIX, STRUCTURE_SUFFIX,
    TRAITS_SUFFIX,
};
use crate::LinkConfig;

/// Generic parts that always pass the part filter.
pub const BASE_PARTS: &[&str] = &["fruit", "seed"];

/// Trait flags in vocabulary order, plus the fruit type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraitFlags {
    flags: Vec<(&'static str, u8)>,
    pub fruit_type: Option<String>,
}

impl TraitFlags {
    pub fn get(&self, name: &str) -> Option<u8> {
        self.flags
            .iter()
            .find(|(flag, _)| *flag == name)
            .map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u8)> + '_ {
        self.flags.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty() && self.fruit_type.is_none()
    }
}

impl Serialize for TraitFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.flags.len() + usize::from(self.fruit_type.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        for (name, value) in &self.flags {
            map.serialize_entry(name, value)?;
        }
        if let Some(fruit_type) = &self.fruit_type {
            map.serialize_entry(FRUIT_TYPE_KEY, fruit_type)?;
        }
        map.end()
    }
}

/// The `dispersal` block of a treatment.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct DispersalBlock {
    pub keywords_found: Vec<String>,
    pub traits: TraitFlags,
}

fn normalize(part: &str) -> String {
    part.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Part named by `key` if it ends in `suffix`, optionally followed by a
/// `_` disambiguator. The part is what precedes the suffix, after the last
/// `_`.
fn part_of<'k>(key: &'k str, suffix: &str) -> Option<&'k str> {
    let lower = key.to_ascii_lowercase();
    let at = lower.find(&suffix.to_ascii_lowercase())?;
    let rest = &lower[at + suffix.len()..];
    if !(rest.is_empty() || rest.starts_with('_')) {
        return None;
    }
    let prefix = &key[..at];
    Some(prefix.rsplit('_').next().unwrap_or(prefix))
}

fn is_key_or_variant(key: &str, base: &str) -> bool {
    key == base
        || key
            .strip_prefix(base)
            .map_or(false, |rest| rest.starts_with('_'))
}

enum KeyKind<'k> {
    Traits(&'k str),
    Keyword(&'k str),
    FruitType,
    FruitTypeKeyword,
}

fn classify(key: &str) -> Option<KeyKind<'_>> {
    if let Some(part) = part_of(key, TRAITS_SUFFIX).or_else(|| part_of(key, STRUCTURE_SUFFIX)) {
        return Some(KeyKind::Traits(part));
    }
    if let Some(part) = part_of(key, KEYWORD_SUFFIX) {
        return Some(KeyKind::Keyword(part));
    }
    if is_key_or_variant(key, FRUIT_TYPE_KEYWORD_KEY) {
        return Some(KeyKind::FruitTypeKeyword);
    }
    if is_key_or_variant(key, FRUIT_TYPE_KEY) {
        return Some(KeyKind::FruitType);
    }
    None
}

/// Encodes a property bag's dispersal keys as a [`DispersalBlock`].
#[derive(Debug)]
pub struct DispersalFormatter<'t> {
    table: &'t TermTable,
    allowed: HashSet<String>,
}

impl<'t> DispersalFormatter<'t> {
    /// Allowed parts are fruit, seed, every fruit type of the fallback part
    /// table and every canonical fruit type of `table`.
    pub fn new(table: &'t TermTable, link: &LinkConfig) -> Self {
        let allowed = BASE_PARTS
            .iter()
            .map(|part| part.to_string())
            .chain(link.fruit_type_parts.keys().cloned())
            .chain(table.canonical_fruit_types())
            .map(|part| normalize(&part))
            .collect();
        Self { table, allowed }
    }

    pub fn is_allowed_part(&self, part: &str) -> bool {
        let part = normalize(part);
        !part.is_empty() && self.allowed.contains(&part)
    }

    /// Remove dispersal and fruit-type keys from `bag` and encode them.
    pub fn format(&self, bag: &mut PropertyBag) -> DispersalBlock {
        let mut present: HashSet<String> = HashSet::new();
        let mut absent: HashSet<String> = HashSet::new();
        let mut keywords: BTreeSet<String> = BTreeSet::new();
        let mut fruit_types: Vec<String> = Vec::new();

        let keys: Vec<String> = bag.keys().cloned().collect();
        for key in keys {
            let kind = match classify(&key) {
                Some(kind) => kind,
                None => continue,
            };
            let value = bag.remove(&key);
            let text = match value.as_ref().and_then(Value::as_str) {
                Some(text) => text,
                None => {
                    tracing::debug!(%key, "skipping non-string dispersal value");
                    continue;
                }
            };

            match kind {
                KeyKind::Traits(part) if self.is_allowed_part(part) => {
                    for name in text.split('|').map(str::trim) {
                        if is_trait_name(name) {
                            present.insert(name.to_string());
                        } else if let Some(base) = strip_absent(name).filter(|b| is_trait_name(b)) {
                            absent.insert(base.to_string());
                        }
                    }
                }
                KeyKind::Traits(part) => {
                    tracing::debug!(%key, %part, "dispersal key for unrelated part filtered");
                }
                KeyKind::Keyword(part) if self.is_allowed_part(part) => {
                    keywords.extend(split_values(text));
                }
                KeyKind::Keyword(_) => {}
                KeyKind::FruitType => fruit_types.push(text.to_string()),
                KeyKind::FruitTypeKeyword => keywords.extend(split_values(text)),
            }
        }

        for fruit_type in &fruit_types {
            for value in split_values(fruit_type) {
                for implied in self.table.lookup_trait_list(&value) {
                    present.insert(implied.clone());
                }
            }
        }

        let flags = DISPERSAL_TRAIT_NAMES
            .iter()
            .filter_map(|name| {
                if present.contains(*name) {
                    Some((*name, 1))
                } else if absent.contains(*name) {
                    Some((*name, 0))
                } else {
                    None
                }
            })
            .collect();

        DispersalBlock {
            keywords_found: keywords.into_iter().collect(),
            traits: TraitFlags {
                flags,
                // the bare `fruitType` key sorts first and holds the earliest mention
                fruit_type: fruit_types.into_iter().next(),
            },
        }
    }
}

fn split_values(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split('|')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

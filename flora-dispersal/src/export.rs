//! Flattening of entities into a part-qualified property bag.
//!
//! | record             | key                          | value                  |
//! |--------------------|------------------------------|------------------------|
//! | DispersalTraits    | `{part}DispersalTraits`      | trait names, `\|`-joined |
//! | DispersalStructure | `{part}DispersalStructure`   | structure type         |
//! | both               | `{part}DispersalKeyword`     | matched keyword(s)     |
//! | FruitType          | `fruitType`                  | canonical fruit type   |
//! | FruitType          | `fruitTypeKeyword`           | matched keyword(s)     |
//! | Subpart            | `{part}Subpart`              | subpart name           |
//!
//! `{part}` is the camel-cased part. An entity with a list part writes one
//! key per element; an unlinked entity writes an unqualified key
//! (`dispersalTraits`). A key that already holds a different value is
//! disambiguated with the keyword, then a counter.

use serde_json::{Map, Value};

use crate::{Entity, TraitRecord};

/// Flat key → value properties of one treatment.
pub type PropertyBag = Map<String, Value>;

pub const TRAITS_SUFFIX: &str = "DispersalTraits";
pub const STRUCTURE_SUFFIX: &str = "DispersalStructure";
pub const KEYWORD_SUFFIX: &str = "DispersalKeyword";
pub const SUBPART_SUFFIX: &str = "Subpart";
pub const FRUIT_TYPE_KEY: &str = "fruitType";
pub const FRUIT_TYPE_KEYWORD_KEY: &str = "fruitTypeKeyword";

/// `stone fruit` → `stoneFruit`, `berry-like cone` → `berryLikeCone`.
pub fn camel_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, word) in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .enumerate()
    {
        let word = word.to_lowercase();
        if i == 0 {
            out.push_str(&word);
        } else {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }
    out
}

/// `{part}{suffix}`, or the suffix with a lowercase head when there is no
/// part.
pub fn qualified_key(part: &str, suffix: &str) -> String {
    let prefix = camel_case(part);
    if prefix.is_empty() {
        let mut chars = suffix.chars();
        match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        }
    } else {
        format!("{}{}", prefix, suffix)
    }
}

fn slug(keyword: &str) -> String {
    keyword
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}

/// Insert `value` under `key` or a disambiguated variant of it. Returns the
/// suffix that was appended (possibly empty).
fn insert_unique(bag: &mut PropertyBag, key: &str, value: &str, keyword: &str) -> String {
    let free = |bag: &PropertyBag, candidate: &str| match bag.get(candidate) {
        None => true,
        Some(existing) => existing.as_str() == Some(value),
    };

    let mut suffix = String::new();
    if !free(bag, key) {
        suffix = format!("_{}", slug(keyword));
        let mut n = 2;
        while !free(bag, &format!("{}{}", key, suffix)) {
            suffix = format!("_{}", n);
            n += 1;
        }
    }
    bag.insert(format!("{}{}", key, suffix), Value::String(value.to_string()));
    suffix
}

/// Add `keyword` to a `|`-joined provenance value.
fn append_keyword(bag: &mut PropertyBag, key: String, keyword: &str) {
    let joined = match bag.get(&key).and_then(Value::as_str) {
        Some(existing) if existing.split('|').any(|k| k == keyword) => return,
        Some(existing) => format!("{}|{}", existing, keyword),
        None => keyword.to_string(),
    };
    bag.insert(key, Value::String(joined));
}

fn part_names(entity: &Entity) -> Vec<String> {
    match entity.record.part() {
        Some(part) => part.values().into_iter().map(str::to_string).collect(),
        None => vec![String::new()],
    }
}

/// Export every entity's canonical values into a new bag.
///
/// Fruit types go first, in text order, so the earliest fruit type holds the
/// bare `fruitType` key. Everything else follows the order of `entities`.
pub fn export_entities(entities: &[Entity]) -> PropertyBag {
    let mut fruit_types: Vec<&Entity> = entities
        .iter()
        .filter(|entity| matches!(entity.record, TraitRecord::FruitType { .. }))
        .collect();
    fruit_types.sort_by_key(|entity| entity.span.start);
    let others = entities
        .iter()
        .filter(|entity| !matches!(entity.record, TraitRecord::FruitType { .. }));

    let mut bag = PropertyBag::new();
    for entity in fruit_types.into_iter().chain(others) {
        match &entity.record {
            TraitRecord::Part { .. } => {}
            TraitRecord::Subpart { subpart, .. } => {
                for part in part_names(entity) {
                    let key = qualified_key(&part, SUBPART_SUFFIX);
                    insert_unique(&mut bag, &key, subpart, subpart);
                }
            }
            TraitRecord::FruitType { part, keyword } => {
                let suffix = insert_unique(&mut bag, FRUIT_TYPE_KEY, &part.joined(), keyword);
                append_keyword(&mut bag, format!("{}{}", FRUIT_TYPE_KEYWORD_KEY, suffix), keyword);
            }
            TraitRecord::DispersalTraits { traits, keyword, .. } => {
                let value = traits.join("|");
                for part in part_names(entity) {
                    let key = qualified_key(&part, TRAITS_SUFFIX);
                    let suffix = insert_unique(&mut bag, &key, &value, keyword);
                    let keyword_key = qualified_key(&part, KEYWORD_SUFFIX) + &suffix;
                    append_keyword(&mut bag, keyword_key, keyword);
                }
            }
            TraitRecord::DispersalStructure {
                structure, keyword, ..
            } => {
                for part in part_names(entity) {
                    let key = qualified_key(&part, STRUCTURE_SUFFIX);
                    let suffix = insert_unique(&mut bag, &key, structure, keyword);
                    let keyword_key = qualified_key(&part, KEYWORD_SUFFIX) + &suffix;
                    append_keyword(&mut bag, keyword_key, keyword);
                }
            }
        }
    }
    bag
}

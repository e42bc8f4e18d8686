//! Trait records and the entities that carry them.

use std::fmt;

use layered_flora::{Annotated, AssociatedSpan, SpanRef};
use serde::{Deserialize, Serialize};

/// A part name: usually one value, occasionally a list (`fruit and seed`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PartValue {
    One(String),
    Many(Vec<String>),
}

impl PartValue {
    pub fn one(value: impl Into<String>) -> Self {
        PartValue::One(value.into())
    }

    /// Build from a list, dropping duplicates. A single remaining value
    /// collapses to [`PartValue::One`]; an empty list yields `None`.
    pub fn from_values(values: Vec<String>) -> Option<Self> {
        let mut unique: Vec<String> = Vec::with_capacity(values.len());
        for value in values {
            if !unique.contains(&value) {
                unique.push(value);
            }
        }
        match unique.len() {
            0 => None,
            1 => unique.pop().map(PartValue::One),
            _ => Some(PartValue::Many(unique)),
        }
    }

    pub fn values(&self) -> Vec<&str> {
        match self {
            PartValue::One(value) => vec![value.as_str()],
            PartValue::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// Values joined with `|`.
    pub fn joined(&self) -> String {
        self.values().join("|")
    }
}

impl fmt::Display for PartValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

/// Rule family of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleLabel {
    Part,
    Subpart,
    FruitType,
    DispersalStructure,
    DispersalTraits,
}

impl RuleLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleLabel::Part => "part",
            RuleLabel::Subpart => "subpart",
            RuleLabel::FruitType => "fruit_type",
            RuleLabel::DispersalStructure => "dispersal_structure",
            RuleLabel::DispersalTraits => "dispersal_traits",
        }
    }
}

impl fmt::Display for RuleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The typed result of resolving one matched span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "trait", rename_all = "snake_case")]
pub enum TraitRecord {
    /// Anatomical part such as `fruit`, `seed` or `stem`
    Part {
        part: PartValue,
        /// Part type from the term table (`fruit_part`, `plant_part`, ...)
        #[serde(rename = "type")]
        kind: Option<String>,
    },
    /// Part of a part; `part` is filled by linking
    Subpart {
        subpart: String,
        part: Option<PartValue>,
    },
    /// Fruit type; its canonical name is the part it defines
    FruitType { part: PartValue, keyword: String },
    DispersalStructure {
        structure: String,
        keyword: String,
        part: Option<PartValue>,
    },
    /// One or more trait names, possibly suffixed `_absent`
    DispersalTraits {
        traits: Vec<String>,
        keyword: String,
        part: Option<PartValue>,
    },
}

impl TraitRecord {
    pub fn label(&self) -> RuleLabel {
        match self {
            TraitRecord::Part { .. } => RuleLabel::Part,
            TraitRecord::Subpart { .. } => RuleLabel::Subpart,
            TraitRecord::FruitType { .. } => RuleLabel::FruitType,
            TraitRecord::DispersalStructure { .. } => RuleLabel::DispersalStructure,
            TraitRecord::DispersalTraits { .. } => RuleLabel::DispersalTraits,
        }
    }

    /// The part this record names or is attributed to.
    pub fn part(&self) -> Option<&PartValue> {
        match self {
            TraitRecord::Part { part, .. } | TraitRecord::FruitType { part, .. } => Some(part),
            TraitRecord::Subpart { part, .. }
            | TraitRecord::DispersalStructure { part, .. }
            | TraitRecord::DispersalTraits { part, .. } => part.as_ref(),
        }
    }

    /// Part-defining records anchor linking.
    pub fn is_part_defining(&self) -> bool {
        matches!(self, TraitRecord::Part { .. } | TraitRecord::FruitType { .. })
    }

    /// Dependent records receive their part from an anchor.
    pub fn is_dependent(&self) -> bool {
        !self.is_part_defining()
    }

    /// Attribute a dependent record to `new_part`. Part-defining records are
    /// returned unchanged.
    pub fn with_part(mut self, new_part: PartValue) -> Self {
        match &mut self {
            TraitRecord::Subpart { part, .. }
            | TraitRecord::DispersalStructure { part, .. }
            | TraitRecord::DispersalTraits { part, .. } => *part = Some(new_part),
            TraitRecord::Part { .. } | TraitRecord::FruitType { .. } => {}
        }
        self
    }

    /// Literal keyword that produced the record, if it keeps one.
    pub fn keyword(&self) -> Option<&str> {
        match self {
            TraitRecord::FruitType { keyword, .. }
            | TraitRecord::DispersalStructure { keyword, .. }
            | TraitRecord::DispersalTraits { keyword, .. } => Some(keyword),
            TraitRecord::Part { .. } | TraitRecord::Subpart { .. } => None,
        }
    }

    fn summary(&self) -> String {
        let (name, value, linked) = match self {
            TraitRecord::Part { part, .. } => ("Part", part.joined(), None),
            TraitRecord::FruitType { part, .. } => ("FruitType", part.joined(), None),
            TraitRecord::Subpart { subpart, part } => ("Subpart", subpart.clone(), part.as_ref()),
            TraitRecord::DispersalStructure {
                structure, part, ..
            } => ("DispersalStructure", structure.clone(), part.as_ref()),
            TraitRecord::DispersalTraits { traits, part, .. } => {
                ("DispersalTraits", traits.join("|"), part.as_ref())
            }
        };
        match linked {
            Some(part) => format!("{}({} @ {})", name, value, part),
            None => format!("{}({})", name, value),
        }
    }
}

/// A matched span with its trait record.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub span: SpanRef,
    pub record: TraitRecord,
    /// Where linked attributes came from
    pub associations: Vec<AssociatedSpan>,
}

impl Entity {
    pub fn new(span: SpanRef, record: TraitRecord) -> Self {
        Self {
            span,
            record,
            associations: Vec::new(),
        }
    }

    pub fn label(&self) -> RuleLabel {
        self.record.label()
    }
}

impl Annotated for Entity {
    fn span(&self) -> SpanRef {
        self.span
    }

    fn summary(&self) -> String {
        self.record.summary()
    }

    fn associations(&self) -> &[AssociatedSpan] {
        &self.associations
    }
}

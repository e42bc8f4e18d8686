//! Proximity relinking of subparts from fruit types to fruit or seed.
//!
//! After part propagation a subpart may be attributed to a fruit type
//! (`samara beak`). Such a subpart is moved to the nearest `fruit` or `seed`
//! part entity when one lies within the proximity threshold; otherwise the
//! static fruit-type table supplies the underlying part.

use std::collections::BTreeMap;

use layered_flora::{AssociatedSpan, SpanRef};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::{Entity, PartSource, PartValue, TraitRecord};

/// Fruit type → the part it is made of.
pub static FRUIT_TYPE_PARTS: Lazy<BTreeMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        // achenes
        "achene", "cypsela", "anthocarp",
        // berries
        "berry", "amphisarca", "arillocarpium", "balausta", "cactidium", "epispermatium",
        "hesperidium", "pepo", "syncarp",
        // capsules
        "capsule", "circumscissile", "loculicidal", "poricidal", "pyxis", "septicidal",
        "silicle", "silique",
        "caryopsis", "grain",
        // drupes
        "drupe", "drupelet", "drupetum", "pseudodrupe", "stone fruit",
        "follicle",
        // cones
        "cone", "megastrobilus", "microstrobilus", "strobili", "strobilus", "berry-like cone",
        "cone berry", "galbulus",
        // legumes
        "legume", "loment", "pod",
        "nut", "nutlet",
        "pome", "nuculanium",
        "samara", "samaroid",
        // schizocarps
        "schizocarp", "camara", "carcerulus", "coccus", "cremocarp", "mericarp", "regma",
        "sorosis", "syconium", "utricle",
    ]
    .iter()
    .map(|fruit_type| (*fruit_type, "fruit"))
    .collect()
});

/// Part names that make a part entity a relinking anchor.
const ANCHOR_PARTS: &[(&str, &str)] = &[
    ("fruit", "fruit"),
    ("fruits", "fruit"),
    ("seed", "seed"),
    ("seeds", "seed"),
];

/// Part type an anchor must carry.
pub const ANCHOR_KIND: &str = "fruit_part";

/// Tunables for subpart relinking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Anchors at this token distance or further are ignored
    pub proximity_threshold: usize,
    /// Fallback fruit type → part table
    pub fruit_type_parts: BTreeMap<String, String>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            proximity_threshold: 50,
            fruit_type_parts: FRUIT_TYPE_PARTS
                .iter()
                .map(|(fruit_type, part)| (fruit_type.to_string(), part.to_string()))
                .collect(),
        }
    }
}

impl LinkConfig {
    pub fn with_threshold(mut self, proximity_threshold: usize) -> Self {
        self.proximity_threshold = proximity_threshold;
        self
    }

    /// Nearest anchor strictly within the threshold. The earliest listed
    /// anchor wins a tie.
    fn nearest<'a>(
        &self,
        span: SpanRef,
        anchors: &'a [(SpanRef, &'static str)],
    ) -> Option<&'a (SpanRef, &'static str)> {
        let mut best: Option<(usize, &(SpanRef, &'static str))> = None;
        for anchor in anchors {
            let distance = anchor.0.distance(&span);
            if distance >= self.proximity_threshold {
                continue;
            }
            if best.map_or(true, |(closest, _)| distance < closest) {
                best = Some((distance, anchor));
            }
        }
        best.map(|(_, anchor)| anchor)
    }

    /// Underlying part for one part value, with the anchor it came from.
    fn relink_value(
        &self,
        value: &str,
        span: SpanRef,
        anchors: &[(SpanRef, &'static str)],
    ) -> Option<(String, Option<SpanRef>)> {
        let fallback = self.fruit_type_parts.get(&value.to_lowercase())?;
        Some(match self.nearest(span, anchors) {
            Some((anchor_span, part)) => (part.to_string(), Some(*anchor_span)),
            None => (fallback.clone(), None),
        })
    }
}

fn anchor_of(entity: &Entity) -> Option<(SpanRef, &'static str)> {
    match &entity.record {
        TraitRecord::Part { part, kind } if kind.as_deref() == Some(ANCHOR_KIND) => part
            .values()
            .into_iter()
            .find_map(|value| {
                let value = value.to_lowercase();
                ANCHOR_PARTS
                    .iter()
                    .find(|(name, _)| *name == value)
                    .map(|(_, singular)| *singular)
            })
            .map(|singular| (entity.span, singular)),
        _ => None,
    }
}

/// Relink fruit-type subparts, then reverse the entity list.
pub fn relink_subparts(entities: Vec<Entity>, config: &LinkConfig) -> Vec<Entity> {
    let anchors: Vec<(SpanRef, &'static str)> = entities.iter().filter_map(anchor_of).collect();

    let mut relinked: Vec<Entity> = entities
        .into_iter()
        .map(|entity| {
            let (subpart, part) = match &entity.record {
                TraitRecord::Subpart {
                    subpart,
                    part: Some(part),
                } => (subpart.clone(), part.clone()),
                _ => return entity,
            };

            let new_part = match &part {
                PartValue::One(value) => config
                    .relink_value(value, entity.span, &anchors)
                    .map(|(underlying, anchor_span)| {
                        (PartValue::One(underlying), anchor_span.into_iter().collect())
                    }),
                PartValue::Many(values) => {
                    let mut found = false;
                    let mut updated = Vec::with_capacity(values.len());
                    let mut anchor_spans: Vec<SpanRef> = Vec::new();
                    for value in values {
                        match config.relink_value(value, entity.span, &anchors) {
                            Some((underlying, anchor_span)) => {
                                found = true;
                                updated.push(underlying);
                                if let Some(anchor_span) = anchor_span {
                                    if !anchor_spans.contains(&anchor_span) {
                                        anchor_spans.push(anchor_span);
                                    }
                                }
                            }
                            None => updated.push(value.clone()),
                        }
                    }
                    if found {
                        PartValue::from_values(updated).map(|part| (part, anchor_spans))
                    } else {
                        None
                    }
                }
            };

            match new_part {
                Some((new_part, anchor_spans)) => {
                    tracing::debug!(%subpart, from = %part, to = %new_part, "subpart relinked");
                    let mut associations = entity.associations;
                    if !anchor_spans.is_empty() {
                        associations.retain(|assoc| !assoc.is::<PartSource>());
                        associations.extend(
                            anchor_spans
                                .into_iter()
                                .map(|anchor_span| AssociatedSpan::new(PartSource, anchor_span)),
                        );
                    }
                    Entity {
                        span: entity.span,
                        record: entity.record.with_part(new_part),
                        associations,
                    }
                }
                None => entity,
            }
        })
        .collect();

    relinked.reverse();
    relinked
}

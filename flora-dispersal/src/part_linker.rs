//! Part propagation from anchors to dependent entities.
//!
//! Anchors are part entities (`fruit`, `seeds`, `stem`) and fruit types.
//! Every dependent (dispersal traits, dispersal structures, subparts) takes
//! the part of the nearest anchor in its own sentence; a tie goes to the
//! anchor that precedes it.
//!
//! ```text
//! Fruit  a  samara  ,  seeds  winged  .
//!           ╰────╯[A] FruitType(samara)
//!                      ╰───╯[B] Part(seed)
//!                             ╰────╯DispersalTraits(wing @ seed)
//!                               └─@part─>[B]
//! ```

use layered_flora::{AssociatedSpan, Association, TokenLine};

use crate::Entity;

/// Marks the anchor a dependent's part was taken from.
#[derive(Debug, Clone, Copy)]
pub struct PartSource;

impl Association for PartSource {
    fn label(&self) -> &'static str {
        "part"
    }

    fn glyph(&self) -> Option<&'static str> {
        Some("@")
    }
}

/// Attribute every dependent entity to its nearest anchor.
///
/// Returns a new entity list in the same order. Running it again on its own
/// output changes nothing.
pub fn link_parts(line: &TokenLine, entities: Vec<Entity>) -> Vec<Entity> {
    let sentence_of = |entity: &Entity| line.sentence_of(entity.span.start);

    let anchors: Vec<Entity> = entities
        .iter()
        .filter(|entity| entity.record.is_part_defining())
        .cloned()
        .collect();

    entities
        .into_iter()
        .map(|entity| {
            if !entity.record.is_dependent() {
                return entity;
            }
            let sentence = sentence_of(&entity);
            let nearest = anchors
                .iter()
                .filter(|anchor| sentence_of(anchor) == sentence)
                .min_by_key(|anchor| {
                    let follows = anchor.span.start > entity.span.start;
                    (anchor.span.distance(&entity.span), follows)
                });

            match nearest.and_then(|anchor| anchor.record.part().map(|part| (anchor.span, part))) {
                Some((anchor_span, part)) => {
                    let Entity {
                        span,
                        record,
                        mut associations,
                    } = entity;
                    associations.retain(|assoc| !assoc.is::<PartSource>());
                    associations.push(AssociatedSpan::new(PartSource, anchor_span));
                    Entity {
                        span,
                        record: record.with_part(part.clone()),
                        associations,
                    }
                }
                None => {
                    tracing::debug!(
                        label = %entity.label(),
                        start = entity.span.start,
                        "no part anchor in sentence"
                    );
                    entity
                }
            }
        })
        .collect()
}

//! A single treatment moving through the pipeline.

use layered_flora::{LineDisplay, TokenLine, Token};

use crate::{Entity, RuleLabel};

/// Tokens of one treatment plus the entities found so far.
#[derive(Debug, Clone)]
pub struct Treatment {
    line: TokenLine,
    entities: Vec<Entity>,
}

impl Treatment {
    pub fn new(line: TokenLine) -> Self {
        Self {
            line,
            entities: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        self.line.text()
    }

    pub fn line(&self) -> &TokenLine {
        &self.line
    }

    pub fn tokens(&self) -> &[Token] {
        self.line.tokens()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Add one rule's matches.
    ///
    /// A match that overlaps existing entities replaces them when all of
    /// their labels are in `overwrite`; otherwise the match is dropped.
    /// Entities stay ordered by start.
    pub fn commit(&mut self, matches: Vec<Entity>, overwrite: &[RuleLabel]) {
        for entity in matches {
            let blocker = self
                .entities
                .iter()
                .find(|e| e.span.overlaps(&entity.span) && !overwrite.contains(&e.label()));
            if let Some(blocker) = blocker {
                tracing::debug!(
                    label = %entity.label(),
                    blocked_by = %blocker.label(),
                    start = entity.span.start,
                    end = entity.span.end,
                    "overlapping match dropped"
                );
                continue;
            }

            self.entities.retain(|e| !e.span.overlaps(&entity.span));
            let at = self
                .entities
                .partition_point(|e| e.span.start <= entity.span.start);
            self.entities.insert(at, entity);
        }
    }

    /// Replace the entity list with the output of a linking stage.
    pub fn with_entities(mut self, entities: Vec<Entity>) -> Self {
        self.entities = entities;
        self
    }

    pub fn into_entities(self) -> Vec<Entity> {
        self.entities
    }

    /// Render the tokens with every entity and its links.
    pub fn display(&self) -> LineDisplay<'_> {
        LineDisplay::new(&self.line).with_associations(&self.entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PartValue, TraitRecord};
    use layered_flora::SpanRef;

    fn part(start: usize, end: usize) -> Entity {
        Entity::new(
            SpanRef::new(start, end),
            TraitRecord::Part {
                part: PartValue::one("seed"),
                kind: None,
            },
        )
    }

    fn traits(start: usize, end: usize) -> Entity {
        Entity::new(
            SpanRef::new(start, end),
            TraitRecord::DispersalTraits {
                traits: vec!["wing".into()],
                keyword: "winged".into(),
                part: None,
            },
        )
    }

    #[test]
    fn overwrite_replaces_listed_labels() {
        let mut treatment = Treatment::new(TokenLine::untagged("a b c d"));
        treatment.commit(vec![part(0, 1), part(2, 3)], &[RuleLabel::Part]);
        treatment.commit(vec![traits(1, 3)], &[RuleLabel::Part, RuleLabel::DispersalTraits]);

        let labels: Vec<(RuleLabel, usize)> = treatment
            .entities()
            .iter()
            .map(|e| (e.label(), e.span.start))
            .collect();
        assert_eq!(labels, vec![(RuleLabel::Part, 0), (RuleLabel::DispersalTraits, 1)]);
    }

    #[test]
    fn protected_entity_blocks_match() {
        let mut treatment = Treatment::new(TokenLine::untagged("a b c d"));
        treatment.commit(vec![traits(1, 2)], &[]);
        treatment.commit(vec![part(0, 2), part(3, 4)], &[RuleLabel::Part]);

        let spans: Vec<SpanRef> = treatment.entities().iter().map(|e| e.span).collect();
        assert_eq!(spans, vec![SpanRef::new(1, 2), SpanRef::new(3, 4)]);
    }
}

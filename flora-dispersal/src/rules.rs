//! Rule kinds and their compile-time wiring.
//!
//! Every rule kind knows its decoder, its pattern strings, which entity
//! labels its matches may overwrite, and which resolver turns a match into a
//! record. There is no name registry: dispatch is a `match`.

use layered_flora::{Compiler, CompiledRule, MatchEngine, TermTable, Token};
use serde::{Deserialize, Serialize};

use crate::{
    DispersalResult, DispersalStructureResolver, DispersalTraitsResolver, Entity,
    FruitTypeResolver, PartResolver, RuleLabel, SubpartResolver, TraitRecord, Treatment,
};

/// Turns the tokens of one matched span into a record.
///
/// Returning `None` drops the match.
pub trait TraitResolver {
    fn resolve(&self, tokens: &[Token], table: &TermTable) -> Option<TraitRecord>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Part,
    Subpart,
    FruitType,
    DispersalStructure,
    DispersalTraits,
}

impl RuleKind {
    pub fn label(self) -> RuleLabel {
        match self {
            RuleKind::Part => RuleLabel::Part,
            RuleKind::Subpart => RuleLabel::Subpart,
            RuleKind::FruitType => RuleLabel::FruitType,
            RuleKind::DispersalStructure => RuleLabel::DispersalStructure,
            RuleKind::DispersalTraits => RuleLabel::DispersalTraits,
        }
    }

    pub fn compiler(self) -> Compiler<RuleKind> {
        let (decoder, patterns) = match self {
            RuleKind::Part => (PartResolver::decoder(), PartResolver::PATTERNS),
            RuleKind::Subpart => (SubpartResolver::decoder(), SubpartResolver::PATTERNS),
            RuleKind::FruitType => (FruitTypeResolver::decoder(), FruitTypeResolver::PATTERNS),
            RuleKind::DispersalStructure => (
                DispersalStructureResolver::decoder(),
                DispersalStructureResolver::PATTERNS,
            ),
            RuleKind::DispersalTraits => (
                DispersalTraitsResolver::decoder(),
                DispersalTraitsResolver::PATTERNS,
            ),
        };
        Compiler::new(self, decoder, patterns)
    }

    /// Labels of existing entities a match of this kind may replace.
    pub fn overwrite(self) -> &'static [RuleLabel] {
        match self {
            RuleKind::Part => &[RuleLabel::Part],
            RuleKind::Subpart => &[RuleLabel::Subpart],
            RuleKind::FruitType => &[RuleLabel::FruitType],
            RuleKind::DispersalStructure => &[RuleLabel::Part, RuleLabel::DispersalStructure],
            RuleKind::DispersalTraits => &[RuleLabel::Part, RuleLabel::DispersalTraits],
        }
    }

    pub fn resolve(self, tokens: &[Token], table: &TermTable) -> Option<TraitRecord> {
        match self {
            RuleKind::Part => PartResolver.resolve(tokens, table),
            RuleKind::Subpart => SubpartResolver.resolve(tokens, table),
            RuleKind::FruitType => FruitTypeResolver.resolve(tokens, table),
            RuleKind::DispersalStructure => DispersalStructureResolver.resolve(tokens, table),
            RuleKind::DispersalTraits => DispersalTraitsResolver.resolve(tokens, table),
        }
    }
}

/// A rule kind with its patterns compiled.
#[derive(Debug, Clone)]
pub struct Rule {
    compiled: CompiledRule<RuleKind>,
}

impl Rule {
    pub fn new(kind: RuleKind) -> DispersalResult<Self> {
        Ok(Self {
            compiled: kind.compiler().compile()?,
        })
    }

    pub fn kind(&self) -> RuleKind {
        self.compiled.label
    }

    /// Match, resolve and commit this rule on a treatment.
    pub fn apply<E: MatchEngine + ?Sized>(
        &self,
        treatment: &mut Treatment,
        table: &TermTable,
        engine: &E,
    ) {
        let kind = self.kind();
        let tokens = treatment.tokens();
        let entities: Vec<Entity> = self
            .compiled
            .find(engine, tokens)
            .into_iter()
            .filter_map(|span| match kind.resolve(&tokens[span.indices()], table) {
                Some(record) => Some(Entity::new(span, record)),
                None => {
                    tracing::debug!(rule = %kind.label(), start = span.start, end = span.end, "match resolved to nothing");
                    None
                }
            })
            .collect();
        treatment.commit(entities, kind.overwrite());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_rule_compiles() {
        for kind in [
            RuleKind::Part,
            RuleKind::Subpart,
            RuleKind::FruitType,
            RuleKind::DispersalStructure,
            RuleKind::DispersalTraits,
        ]
        .iter()
        {
            let rule = Rule::new(*kind).unwrap();
            assert_eq!(rule.kind(), *kind);
        }
    }

    #[test]
    fn dispersal_rules_may_overwrite_parts() {
        assert!(RuleKind::DispersalTraits.overwrite().contains(&RuleLabel::Part));
        assert!(!RuleKind::FruitType.overwrite().contains(&RuleLabel::Part));
    }
}

//! Pipeline presets for running the dispersal rules in the correct order.
//!
//! Parts and subparts are matched before fruit types and dispersal terms, so
//! the dispersal rule can overwrite part matches it overlaps. Linking runs
//! once all rules have committed.

use layered_flora::{MatchEngine, SequenceEngine, TermTable, TermTagger};

use crate::{
    export_entities, link_parts, relink_subparts, DispersalFormatter, DispersalResult, LinkConfig,
    Rule, RuleKind, Treatment, TreatmentOutput,
};

/// Pipeline preset for dispersal extraction.
///
/// - `standard()` - negation-aware dispersal traits
/// - `structure_only()` - single-term dispersal structures
#[derive(Debug, Clone)]
pub struct Pipeline {
    /// Rules to run (in order)
    rules: Vec<RuleKind>,
    link: LinkConfig,
}

impl Pipeline {
    /// Runs in order:
    /// 1. Part - fruit, seed, stem, ... (no deps)
    /// 2. Subpart - beak, margin, ... (no deps)
    /// 3. FruitType - achene, samara, ... (no deps)
    /// 4. DispersalTraits - negator? dispersal+ (overwrites parts)
    pub fn standard() -> Self {
        Self {
            rules: vec![
                RuleKind::Part,
                RuleKind::Subpart,
                RuleKind::FruitType,
                RuleKind::DispersalTraits,
            ],
            link: LinkConfig::default(),
        }
    }

    /// Same as [`standard`](Self::standard) with DispersalStructure in place
    /// of DispersalTraits.
    pub fn structure_only() -> Self {
        Self {
            rules: vec![
                RuleKind::Part,
                RuleKind::Subpart,
                RuleKind::FruitType,
                RuleKind::DispersalStructure,
            ],
            link: LinkConfig::default(),
        }
    }

    pub fn with_link_config(mut self, link: LinkConfig) -> Self {
        self.link = link;
        self
    }

    pub fn rules(&self) -> &[RuleKind] {
        &self.rules
    }

    pub fn link_config(&self) -> &LinkConfig {
        &self.link
    }

    /// Compile the rules against a loaded term table.
    pub fn extractor<'t>(&self, table: &'t TermTable) -> DispersalResult<Extractor<'t>> {
        let rules = self
            .rules
            .iter()
            .map(|kind| Rule::new(*kind))
            .collect::<DispersalResult<Vec<_>>>()?;
        Ok(Extractor {
            table,
            tagger: TermTagger::new(table),
            rules,
            link: self.link.clone(),
            formatter: DispersalFormatter::new(table, &self.link),
        })
    }

    /// Run on a single text, returning the linked treatment.
    pub fn run_on_text(&self, text: &str, table: &TermTable) -> DispersalResult<Treatment> {
        Ok(self.extractor(table)?.run(text))
    }
}

/// A pipeline bound to one term table, reusable across treatments.
#[derive(Debug)]
pub struct Extractor<'t> {
    table: &'t TermTable,
    tagger: TermTagger,
    rules: Vec<Rule>,
    link: LinkConfig,
    formatter: DispersalFormatter<'t>,
}

impl<'t> Extractor<'t> {
    pub fn run(&self, text: &str) -> Treatment {
        self.run_with_engine(text, &SequenceEngine)
    }

    /// Tag, match every rule with `engine`, then link.
    pub fn run_with_engine<E: MatchEngine + ?Sized>(&self, text: &str, engine: &E) -> Treatment {
        let mut treatment = Treatment::new(self.tagger.tag(text));
        for rule in &self.rules {
            rule.apply(&mut treatment, self.table, engine);
        }

        let linked = link_parts(treatment.line(), treatment.entities().to_vec());
        let relinked = relink_subparts(linked, &self.link);
        treatment.with_entities(relinked)
    }

    /// Full extraction: run, export and encode.
    pub fn extract(&self, text: &str) -> TreatmentOutput {
        let treatment = self.run(text);
        let mut properties = export_entities(treatment.entities());
        let dispersal = self.formatter.format(&mut properties);
        tracing::info!(
            entities = treatment.entities().len(),
            traits = dispersal.traits.iter().count(),
            keywords = dispersal.keywords_found.len(),
            "treatment extracted"
        );
        TreatmentOutput {
            properties,
            dispersal,
            text: text.to_string(),
        }
    }
}

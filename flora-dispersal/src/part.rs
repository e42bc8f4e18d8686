//! Part and subpart mentions.

use layered_flora::pattern::TokenTest;
use layered_flora::{Decoder, TermClass, TermTable, Token};

use crate::{PartValue, TraitRecord, TraitResolver};

/// Conjunctions joining a part list (`fruit and seed`).
pub const CONJ: &[&str] = &["and", "or", "&"];

fn normalized(token: &Token, table: &TermTable) -> String {
    table
        .lookup_replacement(&token.lower)
        .unwrap_or(token.lower.as_str())
        .to_string()
}

/// Resolves `fruit`, `seeds`, `stem and leaf`, ...
#[derive(Debug, Clone, Copy, Default)]
pub struct PartResolver;

impl PartResolver {
    pub const PATTERNS: &'static [&'static str] = &["part", "part conj part"];

    pub fn decoder() -> Decoder {
        Decoder::new()
            .with("part", TokenTest::term(&[TermClass::PartTerm]))
            .with("conj", TokenTest::text_in(CONJ))
    }
}

impl TraitResolver for PartResolver {
    fn resolve(&self, tokens: &[Token], table: &TermTable) -> Option<TraitRecord> {
        let parts: Vec<&Token> = tokens
            .iter()
            .filter(|token| token.has_term(TermClass::PartTerm))
            .collect();
        let kind = parts
            .first()
            .and_then(|token| table.lookup_type(&token.lower))
            .map(str::to_string);
        let part =
            PartValue::from_values(parts.iter().map(|token| normalized(token, table)).collect())?;
        Some(TraitRecord::Part { part, kind })
    }
}

/// Resolves `beak`, `margins`, ...
#[derive(Debug, Clone, Copy, Default)]
pub struct SubpartResolver;

impl SubpartResolver {
    pub const PATTERNS: &'static [&'static str] = &["subpart"];

    pub fn decoder() -> Decoder {
        Decoder::new().with("subpart", TokenTest::term(&[TermClass::SubpartTerm]))
    }
}

impl TraitResolver for SubpartResolver {
    fn resolve(&self, tokens: &[Token], table: &TermTable) -> Option<TraitRecord> {
        let token = tokens
            .iter()
            .find(|token| token.has_term(TermClass::SubpartTerm))?;
        Some(TraitRecord::Subpart {
            subpart: normalized(token, table),
            part: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layered_flora::{TermEntry, TermTagger};

    fn table() -> TermTable {
        TermTable::empty()
            .with("fruit", TermEntry::new(Some(TermClass::PartTerm)).with_type("fruit_part"))
            .with(
                "seeds",
                TermEntry::new(Some(TermClass::PartTerm)).with_type("fruit_part").with_replace("seed"),
            )
            .with("seed", TermEntry::new(Some(TermClass::PartTerm)).with_type("fruit_part"))
            .with("beaks", TermEntry::new(Some(TermClass::SubpartTerm)).with_replace("beak"))
    }

    fn resolve<R: TraitResolver>(resolver: R, text: &str) -> Option<TraitRecord> {
        let table = table();
        let line = TermTagger::new(&table).tag(text);
        resolver.resolve(line.tokens(), &table)
    }

    #[test]
    fn single_part_is_normalized() {
        assert_eq!(
            resolve(PartResolver, "Seeds"),
            Some(TraitRecord::Part {
                part: PartValue::one("seed"),
                kind: Some("fruit_part".into()),
            })
        );
    }

    #[test]
    fn part_list() {
        let record = resolve(PartResolver, "fruit and seeds");
        assert_eq!(
            record.and_then(|r| r.part().cloned()),
            Some(PartValue::Many(vec!["fruit".into(), "seed".into()]))
        );
        // duplicate parts collapse
        let record = resolve(PartResolver, "seed or seeds");
        assert_eq!(record.and_then(|r| r.part().cloned()), Some(PartValue::one("seed")));
    }

    #[test]
    fn subpart_starts_unlinked() {
        assert_eq!(
            resolve(SubpartResolver, "beaks"),
            Some(TraitRecord::Subpart {
                subpart: "beak".into(),
                part: None,
            })
        );
    }
}

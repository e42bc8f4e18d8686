//! Single-term dispersal structures, without negation.

use layered_flora::pattern::TokenTest;
use layered_flora::{Decoder, TermClass, TermTable, Token};

use crate::{TraitRecord, TraitResolver};

/// Resolves a dispersal term to its structure type.
///
/// The first token whose type resolves wins, even when a later token in the
/// span would be more specific.
#[derive(Debug, Clone, Copy, Default)]
pub struct DispersalStructureResolver;

impl DispersalStructureResolver {
    pub const PATTERNS: &'static [&'static str] = &["  dispersal ", "( dispersal )"];

    pub fn decoder() -> Decoder {
        Decoder::with_brackets().with("dispersal", TokenTest::term(&[TermClass::DispersalTerm]))
    }
}

impl TraitResolver for DispersalStructureResolver {
    fn resolve(&self, tokens: &[Token], table: &TermTable) -> Option<TraitRecord> {
        tokens
            .iter()
            .filter(|token| token.has_term(TermClass::DispersalTerm))
            .find_map(|token| {
                table.lookup_type(&token.lower).map(|structure| TraitRecord::DispersalStructure {
                    structure: structure.to_string(),
                    keyword: token.lower.clone(),
                    part: None,
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layered_flora::{TermEntry, TokenLine};

    fn dispersal_tokens(words: &[&str]) -> Vec<Token> {
        let mut tokens = TokenLine::untagged(&words.join(" ")).tokens().to_vec();
        for token in tokens.iter_mut() {
            token.term = Some(TermClass::DispersalTerm);
        }
        tokens
    }

    fn table() -> TermTable {
        TermTable::empty()
            .with("winged", TermEntry::new(Some(TermClass::DispersalTerm)).with_type("wing"))
            .with("wings", TermEntry::new(Some(TermClass::DispersalTerm)).with_replace("winged"))
            .with("hooked", TermEntry::new(Some(TermClass::DispersalTerm)).with_type("hook"))
            .with("odd", TermEntry::new(Some(TermClass::DispersalTerm)))
    }

    fn structure(words: &[&str]) -> Option<String> {
        match DispersalStructureResolver.resolve(&dispersal_tokens(words), &table()) {
            Some(TraitRecord::DispersalStructure { structure, .. }) => Some(structure),
            _ => None,
        }
    }

    #[test]
    fn type_then_replacement_type() {
        assert_eq!(structure(&["winged"]).as_deref(), Some("wing"));
        assert_eq!(structure(&["wings"]).as_deref(), Some("wing"));
    }

    #[test]
    fn earliest_resolvable_token_wins() {
        assert_eq!(structure(&["hooked", "winged"]).as_deref(), Some("hook"));
        assert_eq!(structure(&["odd", "winged"]).as_deref(), Some("wing"));
    }

    #[test]
    fn unresolved_term_is_dropped() {
        assert_eq!(structure(&["odd"]), None);
        assert_eq!(structure(&["barbed"]), None);
    }
}

//! Fruit type detection (achene, berry, drupe, samara, ...).
//!
//! A fruit type is kept apart from ordinary parts so that it can anchor
//! linking: its canonical name becomes the part of nearby dispersal traits.
//!
//! ```text
//! Fruit  a  samaroid  achene  .
//!           ╰──────╯FruitType(samara)
//!                     ╰────╯FruitType(achene)
//! ```

use layered_flora::pattern::TokenTest;
use layered_flora::{Decoder, TermClass, TermTable, Token};

use crate::{PartValue, TraitRecord, TraitResolver};

#[derive(Debug, Clone, Copy, Default)]
pub struct FruitTypeResolver;

impl FruitTypeResolver {
    pub const PATTERNS: &'static [&'static str] = &["  fruit_type ", "( fruit_type )"];

    pub fn decoder() -> Decoder {
        Decoder::with_brackets().with("fruit_type", TokenTest::term(&[TermClass::FruitTypeTerm]))
    }

    /// Canonical name for a fruit-type keyword.
    ///
    /// Core fruit type first, then the replacement, then the keyword itself.
    pub fn canonical(keyword: &str, table: &TermTable) -> String {
        table
            .lookup_core_fruit_type(keyword)
            .or_else(|| table.lookup_replacement(keyword))
            .unwrap_or(keyword)
            .to_string()
    }
}

impl TraitResolver for FruitTypeResolver {
    fn resolve(&self, tokens: &[Token], table: &TermTable) -> Option<TraitRecord> {
        let token = tokens
            .iter()
            .find(|token| token.has_term(TermClass::FruitTypeTerm))?;
        Some(TraitRecord::FruitType {
            part: PartValue::One(Self::canonical(&token.lower, table)),
            keyword: token.lower.clone(),
        })
    }
}

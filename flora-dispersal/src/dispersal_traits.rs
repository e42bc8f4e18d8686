//! Dispersal traits with negation and absence handling.
//!
//! ```text
//! Seeds  without  pappus  ;  fruit  wingless  .
//!        ╰──────────────╯DispersalTraits(pappus_absent)
//!                                   ╰──────╯DispersalTraits(wing_absent)
//! ```
//!
//! The dispersal tokens of a span are joined into one lookup key. A
//! multi-trait mapping row for the key wins over the key's single `type`.
//! When the joined key has no entry (`arillate winged`), each token is
//! resolved on its own and the traits are combined. A negator, or a token
//! that is itself an absence term, marks every resolved trait absent.

use layered_flora::pattern::TokenTest;
use layered_flora::vocabulary::mark_absent;
use layered_flora::{Decoder, TermClass, TermTable, Token};

use crate::{TraitRecord, TraitResolver};

#[derive(Debug, Clone, Copy, Default)]
pub struct DispersalTraitsResolver;

impl DispersalTraitsResolver {
    pub const PATTERNS: &'static [&'static str] =
        &["  negator? dispersal+ ", "( negator? dispersal+ )"];

    pub fn decoder() -> Decoder {
        Decoder::with_brackets()
            .with("negator", TokenTest::term(&[TermClass::DispersalNegator]))
            .with(
                "dispersal",
                TokenTest::term(&[TermClass::DispersalTerm, TermClass::DispersalAbsence]),
            )
    }

    /// Trait names for a composite key, before absence marking.
    pub fn traits_for(key: &str, table: &TermTable) -> Vec<String> {
        let mapped = table.lookup_trait_list(key);
        if !mapped.is_empty() {
            return mapped.to_vec();
        }
        table
            .lookup_type(key)
            .map(|kind| vec![kind.to_string()])
            .unwrap_or_default()
    }
}

impl TraitResolver for DispersalTraitsResolver {
    fn resolve(&self, tokens: &[Token], table: &TermTable) -> Option<TraitRecord> {
        let negated = tokens
            .iter()
            .any(|token| token.has_term(TermClass::DispersalNegator));

        let dispersal: Vec<&Token> = tokens
            .iter()
            .filter(|token| {
                token.has_term(TermClass::DispersalTerm) || token.has_term(TermClass::DispersalAbsence)
            })
            .collect();
        let absence_term = dispersal
            .iter()
            .any(|token| token.has_term(TermClass::DispersalAbsence));

        let key = dispersal
            .iter()
            .map(|token| token.lower.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        if key.is_empty() {
            return None;
        }

        let composite = Self::traits_for(&key, table);
        let (traits, keyword) = if !composite.is_empty() {
            let traits = if negated || absence_term {
                composite.iter().map(|name| mark_absent(name)).collect()
            } else {
                composite
            };
            (traits, key)
        } else {
            // unrelated neighbours: resolve each token on its own
            let mut traits: Vec<String> = Vec::new();
            let mut keywords: Vec<&str> = Vec::new();
            for token in dispersal.iter().copied() {
                let found = Self::traits_for(&token.lower, table);
                if found.is_empty() {
                    continue;
                }
                let absent = negated || token.has_term(TermClass::DispersalAbsence);
                for name in found {
                    let name = if absent { mark_absent(&name) } else { name };
                    if !traits.contains(&name) {
                        traits.push(name);
                    }
                }
                keywords.push(token.lower.as_str());
            }
            if traits.is_empty() {
                tracing::debug!(%key, "no dispersal trait for keyword");
                return None;
            }
            (traits, keywords.join("|"))
        };

        Some(TraitRecord::DispersalTraits {
            traits,
            keyword,
            part: None,
        })
    }
}

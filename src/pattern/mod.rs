//! Rule patterns over term-classed tokens.
//!
//! A rule is written as a handful of short pattern strings whose words are
//! keys of a [`Decoder`]:
//!
//! ```text
//! decoder:  "(" → text in OPEN, "negator" → dispersal_negator,
//!           "dispersal" → dispersal_term | dispersal_absence
//! patterns: "  negator? dispersal+ "
//!           "( negator? dispersal+ )"
//! ```
//!
//! A key may carry a `?`, `+` or `*` quantifier. [`Compiler::compile`] turns
//! the strings into [`Pattern`]s; a [`MatchEngine`] scans a token slice for
//! them.

mod engine;

pub use engine::{filter_spans, MatchEngine, SequenceEngine};

use std::collections::HashMap;

use crate::{FloraError, FloraResult, SpanRef, TermClass, Token};

/// Opening brackets accepted by `(` decoder keys.
pub const OPEN: &[&str] = &["(", "["];
/// Closing brackets accepted by `)` decoder keys.
pub const CLOSE: &[&str] = &[")", "]"];

/// Predicate on a single token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenTest {
    /// Token carries one of these term classes
    Term(Vec<TermClass>),
    /// Token text (lowercased) is one of these words
    TextIn(Vec<String>),
}

impl TokenTest {
    pub fn term(classes: &[TermClass]) -> Self {
        TokenTest::Term(classes.to_vec())
    }

    pub fn text_in(words: &[&str]) -> Self {
        TokenTest::TextIn(words.iter().map(|w| w.to_lowercase()).collect())
    }

    pub fn matches(&self, token: &Token) -> bool {
        match self {
            TokenTest::Term(classes) => token.term.map_or(false, |term| classes.contains(&term)),
            TokenTest::TextIn(words) => words.iter().any(|w| *w == token.lower),
        }
    }
}

/// How many consecutive tokens a step consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    One,
    /// `?`
    Optional,
    /// `+`
    OneOrMore,
    /// `*`
    ZeroOrMore,
}

impl Quantifier {
    /// Minimum and (optional) maximum repetition.
    pub fn bounds(&self) -> (usize, Option<usize>) {
        match self {
            Quantifier::One => (1, Some(1)),
            Quantifier::Optional => (0, Some(1)),
            Quantifier::OneOrMore => (1, None),
            Quantifier::ZeroOrMore => (0, None),
        }
    }

    fn split(word: &str) -> (&str, Quantifier) {
        if word.len() > 1 {
            if let Some(key) = word.strip_suffix('?') {
                return (key, Quantifier::Optional);
            }
            if let Some(key) = word.strip_suffix('+') {
                return (key, Quantifier::OneOrMore);
            }
            if let Some(key) = word.strip_suffix('*') {
                return (key, Quantifier::ZeroOrMore);
            }
        }
        (word, Quantifier::One)
    }
}

/// One element of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub test: TokenTest,
    pub quantifier: Quantifier,
}

/// A compiled token-class pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    steps: Vec<Step>,
}

impl Pattern {
    /// Compile one pattern string against a decoder.
    pub fn parse(source: &str, decoder: &Decoder) -> FloraResult<Self> {
        let mut steps = Vec::new();
        for word in source.split_whitespace() {
            let (key, quantifier) = Quantifier::split(word);
            let test = decoder
                .get(key)
                .ok_or_else(|| FloraError::UnknownDecoderKey {
                    pattern: source.trim().to_string(),
                    key: key.to_string(),
                })?
                .clone();
            steps.push(Step { test, quantifier });
        }
        if steps.is_empty() {
            return Err(FloraError::EmptyPattern {
                pattern: source.to_string(),
            });
        }
        Ok(Self {
            source: source.trim().to_string(),
            steps,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

/// Maps pattern words to token tests.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    entries: HashMap<String, TokenTest>,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoder pre-loaded with the `(` and `)` bracket keys.
    pub fn with_brackets() -> Self {
        Self::new()
            .with("(", TokenTest::text_in(OPEN))
            .with(")", TokenTest::text_in(CLOSE))
    }

    pub fn with(mut self, key: &str, test: TokenTest) -> Self {
        self.entries.insert(key.to_string(), test);
        self
    }

    pub fn get(&self, key: &str) -> Option<&TokenTest> {
        self.entries.get(key)
    }
}

/// A labelled set of pattern strings waiting to be compiled.
#[derive(Debug, Clone)]
pub struct Compiler<L> {
    pub label: L,
    pub decoder: Decoder,
    pub patterns: Vec<String>,
}

impl<L: Copy> Compiler<L> {
    pub fn new(label: L, decoder: Decoder, patterns: &[&str]) -> Self {
        Self {
            label,
            decoder,
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn compile(&self) -> FloraResult<CompiledRule<L>> {
        let patterns = self
            .patterns
            .iter()
            .map(|source| Pattern::parse(source, &self.decoder))
            .collect::<FloraResult<Vec<_>>>()?;
        Ok(CompiledRule {
            label: self.label,
            patterns,
        })
    }
}

/// The compiled patterns of one rule.
#[derive(Debug, Clone)]
pub struct CompiledRule<L> {
    pub label: L,
    pub patterns: Vec<Pattern>,
}

impl<L> CompiledRule<L> {
    /// Non-overlapping matches of any of the rule's patterns, ordered by start.
    pub fn find<E: MatchEngine + ?Sized>(&self, engine: &E, tokens: &[Token]) -> Vec<SpanRef> {
        let spans = self
            .patterns
            .iter()
            .flat_map(|pattern| engine.find(pattern, tokens))
            .collect();
        filter_spans(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TermEntry, TermTable, TermTagger};

    fn decoder() -> Decoder {
        Decoder::with_brackets()
            .with("negator", TokenTest::term(&[TermClass::DispersalNegator]))
            .with(
                "dispersal",
                TokenTest::term(&[TermClass::DispersalTerm, TermClass::DispersalAbsence]),
            )
    }

    fn tokens(text: &str) -> Vec<Token> {
        let table = TermTable::empty()
            .with("no", TermEntry::new(Some(TermClass::DispersalNegator)))
            .with("wings", TermEntry::new(Some(TermClass::DispersalTerm)))
            .with("hooked", TermEntry::new(Some(TermClass::DispersalTerm)))
            .with("wingless", TermEntry::new(Some(TermClass::DispersalAbsence)));
        TermTagger::new(&table).tag(text).tokens().to_vec()
    }

    #[test]
    fn quantifiers_are_parsed() {
        let pattern = Pattern::parse("( negator? dispersal+ )", &decoder()).unwrap();
        let quantifiers: Vec<Quantifier> = pattern.steps().iter().map(|s| s.quantifier).collect();
        assert_eq!(
            quantifiers,
            vec![Quantifier::One, Quantifier::Optional, Quantifier::OneOrMore, Quantifier::One]
        );
    }

    #[test]
    fn unknown_key_is_an_error() {
        let err = Pattern::parse("negator color", &decoder()).unwrap_err();
        match err {
            FloraError::UnknownDecoderKey { key, .. } => assert_eq!(key, "color"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn blank_pattern_is_an_error() {
        assert!(matches!(
            Pattern::parse("   ", &decoder()),
            Err(FloraError::EmptyPattern { .. })
        ));
    }

    #[test]
    fn rule_prefers_longest_match() {
        let rule = Compiler::new(
            "dispersal_traits",
            decoder(),
            &["negator? dispersal+", "( negator? dispersal+ )"],
        )
        .compile()
        .unwrap();

        let toks = tokens("Seeds (no wings), fruit hooked; leaves wingless");
        let spans = rule.find(&SequenceEngine, &toks);
        assert_eq!(
            spans,
            vec![SpanRef::new(1, 5), SpanRef::new(7, 8), SpanRef::new(10, 11)]
        );
    }
}

//! Tokens and the token line of a single treatment.
//!
//! Tokenization is word-bound segmentation (UAX #29) with whitespace
//! dropped. Term classes are attached afterwards by the
//! [`TermTagger`](crate::TermTagger); once a [`TokenLine`] is built it is
//! never mutated.

use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Vocabulary class assigned to a token by term lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermClass {
    /// Anatomical part: fruit, seed, stem, leaf
    PartTerm,
    /// Part of a part: beak, margin, apex
    SubpartTerm,
    /// Fruit type: achene, berry, drupe, samara
    FruitTypeTerm,
    /// Dispersal structure or trait: winged, pappus, hooked
    DispersalTerm,
    /// Negator in front of a dispersal term: no, without, lacking
    DispersalNegator,
    /// Single-word absence term: wingless, epappose
    DispersalAbsence,
}

impl TermClass {
    /// Every term class, in declaration order.
    pub const ALL: [TermClass; 6] = [
        TermClass::PartTerm,
        TermClass::SubpartTerm,
        TermClass::FruitTypeTerm,
        TermClass::DispersalTerm,
        TermClass::DispersalNegator,
        TermClass::DispersalAbsence,
    ];

    /// The label used for this class in term tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            TermClass::PartTerm => "part_term",
            TermClass::SubpartTerm => "subpart_term",
            TermClass::FruitTypeTerm => "fruit_type_term",
            TermClass::DispersalTerm => "dispersal_term",
            TermClass::DispersalNegator => "dispersal_negator",
            TermClass::DispersalAbsence => "dispersal_absence",
        }
    }

    /// Parse a term-table label. Unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.iter().copied().find(|class| class.as_str() == label)
    }
}

impl fmt::Display for TermClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A slice of the source text produced by word-bound segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordPiece<'a> {
    pub text: &'a str,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
}

/// Split text into word-bound pieces, skipping whitespace.
pub fn split_words(text: &str) -> Vec<WordPiece<'_>> {
    text.split_word_bound_indices()
        .filter(|(_, piece)| !piece.chars().all(char::is_whitespace))
        .map(|(start, piece)| WordPiece {
            text: piece,
            start,
            end: start + piece.len(),
        })
        .collect()
}

/// A token of a treatment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Position in the token line
    pub idx: usize,
    /// Literal text as it appears in the source
    pub text: String,
    /// Lowercase form; for a merged term phrase this is the table keyword
    pub lower: String,
    /// Term class assigned by vocabulary lookup
    pub term: Option<TermClass>,
    /// Sentence index (0-based)
    pub sent: usize,
    pub pos_starts_at: usize,
    pub pos_ends_at: usize,
}

/// Abbreviations common in treatments. A `.` right after one of these does
/// not close a sentence.
pub const ABBREVIATIONS: &[&str] = &[
    "approx", "c", "ca", "cf", "diam", "e.g", "esp", "f", "fig", "figs", "i.e", "incl", "sect",
    "ser", "sp", "spp", "ssp", "subsp", "var", "vs",
];

impl Token {
    /// True for sentence-ending punctuation.
    pub fn is_sentence_end(&self) -> bool {
        matches!(self.text.as_str(), "." | "!" | "?")
    }

    /// True if this token ends a sentence given the token before it.
    pub fn closes_sentence(&self, previous: Option<&Token>) -> bool {
        if !self.is_sentence_end() {
            return false;
        }
        let abbreviated = self.text == "."
            && previous.map_or(false, |prev| ABBREVIATIONS.contains(&prev.lower.as_str()));
        !abbreviated
    }

    pub fn has_term(&self, class: TermClass) -> bool {
        self.term == Some(class)
    }
}

/// The ordered tokens of one treatment together with its raw text.
#[derive(Debug, Clone)]
pub struct TokenLine {
    text: String,
    tokens: Vec<Token>,
}

impl TokenLine {
    /// Build a line from already tagged tokens.
    ///
    /// Token indices and sentence numbers are reassigned so they are always
    /// dense and consistent with the token order.
    pub fn new(text: impl Into<String>, mut tokens: Vec<Token>) -> Self {
        let mut sent = 0;
        for idx in 0..tokens.len() {
            let closes = tokens[idx].closes_sentence(idx.checked_sub(1).map(|prev| &tokens[prev]));
            let token = &mut tokens[idx];
            token.idx = idx;
            token.sent = sent;
            if closes {
                sent += 1;
            }
        }
        Self {
            text: text.into(),
            tokens,
        }
    }

    /// Tokenize text without any term tagging.
    pub fn untagged(text: &str) -> Self {
        let tokens = split_words(text)
            .into_iter()
            .map(|piece| Token {
                idx: 0,
                text: piece.text.to_string(),
                lower: piece.text.to_lowercase(),
                term: None,
                sent: 0,
                pos_starts_at: piece.start,
                pos_ends_at: piece.end,
            })
            .collect();
        Self::new(text, tokens)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Token> {
        self.tokens.get(idx)
    }

    /// Sentence index of the token at `idx`, if any.
    pub fn sentence_of(&self, idx: usize) -> Option<usize> {
        self.tokens.get(idx).map(|token| token.sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_is_dropped() {
        let pieces: Vec<&str> = split_words("Fruit  winged,\tseeds.")
            .into_iter()
            .map(|piece| piece.text)
            .collect();
        assert_eq!(pieces, vec!["Fruit", "winged", ",", "seeds", "."]);
    }

    #[test]
    fn offsets_point_into_source() {
        let text = "Achenes winged";
        let pieces = split_words(text);
        assert_eq!(&text[pieces[1].start..pieces[1].end], "winged");
    }

    #[test]
    fn sentences_are_numbered() {
        let line = TokenLine::untagged("Fruit a berry. Seeds winged!");
        let sents: Vec<usize> = line.tokens().iter().map(|t| t.sent).collect();
        assert_eq!(sents, vec![0, 0, 0, 0, 1, 1, 1]);
    }

    #[test]
    fn abbreviation_periods_stay_in_sentence() {
        let line = TokenLine::untagged("Achenes ca. 3 mm. Seeds winged.");
        let sents: Vec<usize> = line.tokens().iter().map(|t| t.sent).collect();
        // `ca.` stays open, `mm.` closes
        assert_eq!(sents, vec![0, 0, 0, 0, 0, 0, 1, 1, 1]);

        let line = TokenLine::untagged("Fruit a berry. Var. glabra.");
        let sents: Vec<usize> = line.tokens().iter().map(|t| t.sent).collect();
        assert_eq!(sents, vec![0, 0, 0, 0, 1, 1, 1, 1]);
    }

    #[test]
    fn term_class_labels_round_trip() {
        for class in TermClass::ALL.iter() {
            assert_eq!(TermClass::from_label(class.as_str()), Some(*class));
        }
        assert_eq!(TermClass::from_label("color_term"), None);
    }
}

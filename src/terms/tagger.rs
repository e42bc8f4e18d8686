//! Term tagging of a treatment's tokens.
//!
//! Keywords are indexed by their first word (lowercased) for O(1) lookup and
//! then matched by their remaining words. At each position the longest
//! keyword wins; a multi-word keyword is merged into one token whose `lower`
//! form is the keyword itself, so later lookups see the table key.

use std::collections::HashMap;

use crate::token::split_words;
use crate::{TermClass, TermTable, Token, TokenLine};

#[derive(Debug, Clone)]
struct Phrase {
    rest: Vec<String>,
    keyword: String,
    class: TermClass,
}

/// Assigns term classes to tokens by phrase lookup.
#[derive(Debug, Clone, Default)]
pub struct TermTagger {
    /// Maps first word → candidate phrases, longest first
    dictionary: HashMap<String, Vec<Phrase>>,
}

impl TermTagger {
    /// Index every keyword of `table` that carries a term class.
    pub fn new(table: &TermTable) -> Self {
        let mut tagger = Self::default();
        for (keyword, class) in table.phrases() {
            tagger.add(keyword, class);
        }
        tagger
    }

    /// Add one keyword. It is split with the same segmentation as the text.
    pub fn add(&mut self, keyword: &str, class: TermClass) {
        let keyword = keyword.trim().to_lowercase();
        let words: Vec<String> = split_words(&keyword)
            .into_iter()
            .map(|piece| piece.text.to_string())
            .collect();

        if let Some((first, rest)) = words.split_first() {
            let bucket = self.dictionary.entry(first.clone()).or_default();
            bucket.push(Phrase {
                rest: rest.to_vec(),
                keyword,
                class,
            });
            bucket.sort_by(|a, b| {
                b.rest
                    .len()
                    .cmp(&a.rest.len())
                    .then_with(|| a.keyword.cmp(&b.keyword))
            });
        }
    }

    pub fn len(&self) -> usize {
        self.dictionary.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.dictionary.is_empty()
    }

    fn longest_match(&self, words: &[String]) -> Option<&Phrase> {
        let (first, following) = words.split_first()?;
        self.dictionary.get(first)?.iter().find(|phrase| {
            following.len() >= phrase.rest.len() && following[..phrase.rest.len()] == phrase.rest[..]
        })
    }

    /// Tokenize and tag `text`.
    pub fn tag(&self, text: &str) -> TokenLine {
        let pieces = split_words(text);
        let lowers: Vec<String> = pieces.iter().map(|p| p.text.to_lowercase()).collect();

        let mut tokens = Vec::with_capacity(pieces.len());
        let mut i = 0;
        while i < pieces.len() {
            let token = match self.longest_match(&lowers[i..]) {
                Some(phrase) => {
                    let last = i + phrase.rest.len();
                    let (start, end) = (pieces[i].start, pieces[last].end);
                    i = last + 1;
                    Token {
                        idx: 0,
                        text: text[start..end].to_string(),
                        lower: phrase.keyword.clone(),
                        term: Some(phrase.class),
                        sent: 0,
                        pos_starts_at: start,
                        pos_ends_at: end,
                    }
                }
                None => {
                    let piece = pieces[i];
                    i += 1;
                    Token {
                        idx: 0,
                        text: piece.text.to_string(),
                        lower: lowers[i - 1].clone(),
                        term: None,
                        sent: 0,
                        pos_starts_at: piece.start,
                        pos_ends_at: piece.end,
                    }
                }
            };
            tokens.push(token);
        }

        TokenLine::new(text, tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TermEntry;

    fn tagger() -> TermTagger {
        let table = TermTable::empty()
            .with("stone fruit", TermEntry::new(Some(TermClass::FruitTypeTerm)))
            .with("fruit", TermEntry::new(Some(TermClass::PartTerm)))
            .with("berry-like cone", TermEntry::new(Some(TermClass::FruitTypeTerm)))
            .with("winged", TermEntry::new(Some(TermClass::DispersalTerm)))
            .with("no", TermEntry::new(Some(TermClass::DispersalNegator)))
            .with("samaroid", TermEntry::new(None));
        TermTagger::new(&table)
    }

    fn tagged(text: &str) -> Vec<(String, String, Option<TermClass>)> {
        tagger()
            .tag(text)
            .tokens()
            .iter()
            .map(|t| (t.text.clone(), t.lower.clone(), t.term))
            .collect()
    }

    #[test]
    fn longest_phrase_wins() {
        let tokens = tagged("A Stone fruit, the fruit winged.");
        assert_eq!(
            tokens[1],
            ("Stone fruit".to_string(), "stone fruit".to_string(), Some(TermClass::FruitTypeTerm))
        );
        assert_eq!(tokens[4].2, Some(TermClass::PartTerm));
        assert_eq!(tokens[5].2, Some(TermClass::DispersalTerm));
        assert_eq!(tokens.len(), 7);
    }

    #[test]
    fn hyphenated_phrase_is_merged() {
        let tokens = tagged("Fruit a berry-like cone");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[2].0, "berry-like cone");
        assert_eq!(tokens[2].2, Some(TermClass::FruitTypeTerm));
    }

    #[test]
    fn unclassed_keywords_are_not_tagged() {
        let tokens = tagged("samaroid");
        assert_eq!(tokens[0].2, None);
    }

    #[test]
    fn offsets_cover_merged_phrase() {
        let line = tagger().tag("no stone fruit");
        let token = &line.tokens()[1];
        assert_eq!(&line.text()[token.pos_starts_at..token.pos_ends_at], "stone fruit");
        assert_eq!(token.idx, 1);
    }
}

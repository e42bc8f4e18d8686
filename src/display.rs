//! Text rendering of a token line with annotated spans.
//!
//! ```text
//! Fruit  a  samara  ,  seeds  winged  .
//!           ╰────╯[A] FruitType(samara)
//!                      ╰───╯Part(seed)
//!                             ╰────╯DispersalTraits(wing)
//!                               └─@part─>[A]
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use unicode_width::UnicodeWidthStr;

use crate::{AssociatedSpan, SpanRef, TokenLine};

/// Something that can be drawn under a token line.
pub trait Annotated {
    fn span(&self) -> SpanRef;

    /// Short text written after the span marker.
    fn summary(&self) -> String;

    fn associations(&self) -> &[AssociatedSpan] {
        &[]
    }
}

/// A, B, ..., Z, AA, AB, ...
fn index_to_base26_label(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        n -= 1;
        letters.push(char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    letters.iter().rev().collect()
}

struct IncludedSpan {
    span: SpanRef,
    summary: String,
    associations: Vec<AssociatedSpan>,
}

pub struct LineDisplay<'a> {
    line: &'a TokenLine,
    included: Vec<IncludedSpan>,
}

impl<'a> std::fmt::Display for LineDisplay<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const SPACE_PADDING: usize = 2;
        let mut starts = Vec::with_capacity(self.line.len());
        let mut ends = Vec::with_capacity(self.line.len());

        let mut opening_line = String::new();
        for (i, token) in self.line.tokens().iter().enumerate() {
            if i > 0 {
                opening_line.extend(std::iter::repeat(' ').take(SPACE_PADDING));
            }
            starts.push(UnicodeWidthStr::width(&*opening_line));
            opening_line.push_str(&token.text);
            ends.push(UnicodeWidthStr::width(&*opening_line));
        }
        f.write_str(&opening_line)?;

        let span_labels = self.build_span_labels();

        for item in &self.included {
            let (start_col, end_col) = match (
                starts.get(item.span.start),
                item.span.end.checked_sub(1).and_then(|last| ends.get(last)),
            ) {
                (Some(start), Some(end)) => (*start, *end),
                _ => continue,
            };

            f.write_char('\n')?;
            for _ in 0..start_col {
                f.write_char(' ')?;
            }
            f.write_char('╰')?;
            for _ in (start_col + 1)..end_col.saturating_sub(1) {
                f.write_char('─')?;
            }
            if end_col - start_col > 1 {
                f.write_char('╯')?;
            }
            if let Some(label) = span_labels.get(&item.span) {
                write!(f, "{} ", label)?;
            }
            f.write_str(&item.summary)?;

            for assoc in &item.associations {
                f.write_char('\n')?;
                for _ in 0..start_col + 2 {
                    f.write_char(' ')?;
                }
                let target = match span_labels.get(&assoc.span) {
                    Some(label) => label.clone(),
                    None => format!("[{}..{}]", assoc.span.start, assoc.span.end),
                };
                write!(
                    f,
                    "└─{}{}─>{}",
                    assoc.glyph().unwrap_or(""),
                    assoc.label(),
                    target
                )?;
            }
        }

        Ok(())
    }
}

impl<'a> LineDisplay<'a> {
    pub fn new(line: &'a TokenLine) -> Self {
        LineDisplay {
            line,
            included: Vec::new(),
        }
    }

    /// Labels `[A]`, `[B]`, ... for included spans that some association
    /// points at.
    fn build_span_labels(&self) -> HashMap<SpanRef, String> {
        let included: HashSet<SpanRef> = self.included.iter().map(|item| item.span).collect();
        let mut targets: Vec<SpanRef> = self
            .included
            .iter()
            .flat_map(|item| &item.associations)
            .map(|assoc| assoc.span)
            .filter(|span| included.contains(span))
            .collect();
        targets.sort();
        targets.dedup();

        targets
            .into_iter()
            .enumerate()
            .map(|(i, span)| (span, format!("[{}]", index_to_base26_label(i))))
            .collect()
    }

    /// Include a span with a summary and no associations.
    pub fn include(&mut self, span: SpanRef, summary: impl Into<String>) {
        self.included.push(IncludedSpan {
            span,
            summary: summary.into(),
            associations: Vec::new(),
        });
    }

    /// Include every item, without association arrows.
    pub fn with<A: Annotated>(mut self, items: &[A]) -> Self {
        for item in items {
            self.include(item.span(), item.summary());
        }
        self
    }

    /// Include every item together with its association arrows.
    pub fn with_associations<A: Annotated>(mut self, items: &[A]) -> Self {
        for item in items {
            self.included.push(IncludedSpan {
                span: item.span(),
                summary: item.summary(),
                associations: item.associations().to_vec(),
            });
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Association;

    #[derive(Debug)]
    struct Source;

    impl Association for Source {
        fn label(&self) -> &'static str {
            "source"
        }

        fn glyph(&self) -> Option<&'static str> {
            Some("@")
        }
    }

    struct Note {
        span: SpanRef,
        text: &'static str,
        associations: Vec<AssociatedSpan>,
    }

    impl Annotated for Note {
        fn span(&self) -> SpanRef {
            self.span
        }

        fn summary(&self) -> String {
            self.text.to_string()
        }

        fn associations(&self) -> &[AssociatedSpan] {
            &self.associations
        }
    }

    #[test]
    fn labels_are_bijective_base26() {
        let labels: Vec<String> = [0, 1, 25, 26, 27, 701, 702]
            .iter()
            .map(|n| index_to_base26_label(*n))
            .collect();
        assert_eq!(labels, vec!["A", "B", "Z", "AA", "AB", "ZZ", "AAA"]);
    }

    #[test]
    fn spans_and_arrows() {
        let line = TokenLine::untagged("Fruit a samara, wings 2.");
        let notes = vec![
            Note {
                span: SpanRef::new(2, 3),
                text: "Samara",
                associations: Vec::new(),
            },
            Note {
                span: SpanRef::new(4, 5),
                text: "Wing",
                associations: vec![AssociatedSpan::new(Source, SpanRef::new(2, 3))],
            },
            Note {
                span: SpanRef::new(0, 1),
                text: "Part",
                associations: vec![AssociatedSpan::new(Source, SpanRef::new(6, 7))],
            },
        ];

        let display = LineDisplay::new(&line).with_associations(&notes);
        insta::assert_snapshot!(format!("{}", display), @r###"
        Fruit  a  samara  ,  wings  2  .
                  ╰────╯[A] Samara
                             ╰───╯Wing
                               └─@source─>[A]
        ╰───╯Part
          └─@source─>[6..7]
        "###);
    }

    #[test]
    fn single_width_token() {
        let line = TokenLine::untagged("a b");
        let display = LineDisplay::new(&line).with(&[Note {
            span: SpanRef::new(1, 2),
            text: "B",
            associations: Vec::new(),
        }]);
        insta::assert_snapshot!(format!("{}", display), @r###"
        a  b
           ╰B
        "###);
    }
}

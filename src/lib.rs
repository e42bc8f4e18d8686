//! Core layers for rule-based extraction from botanical treatment text.
//!
//! ## Building blocks
//!
//! - [`TermTable`] - Keyword lookup merged from CSV term sources
//! - [`TermTagger`] - Tokenizes a treatment and tags term classes
//! - [`TokenLine`] - The immutable, tagged tokens of one treatment
//! - [`Compiler`] / [`MatchEngine`] - Token-class patterns and their matcher
//! - [`AssociatedSpan`] - Typed links between spans
//! - [`LineDisplay`] - Snapshot-friendly rendering of annotated spans
//!
//! ## Example
//!
//! ```
//! use layered_flora::{TermClass, TermEntry, TermTable, TermTagger};
//!
//! let table = TermTable::empty()
//!     .with("winged", TermEntry::new(Some(TermClass::DispersalTerm)).with_type("wing"));
//! let line = TermTagger::new(&table).tag("Achenes winged.");
//!
//! assert_eq!(line.tokens()[1].term, Some(TermClass::DispersalTerm));
//! assert_eq!(table.lookup_type("winged"), Some("wing"));
//! ```

mod display;
mod errors;
mod span;
mod terms;
mod token;

pub mod pattern;
pub mod vocabulary;

pub use display::{Annotated, LineDisplay};
pub use errors::{FloraError, FloraResult};
pub use pattern::{filter_spans, CompiledRule, Compiler, Decoder, MatchEngine, SequenceEngine, TokenTest};
pub use span::{AssociatedSpan, Association, SpanRef};
pub use terms::{resolve_path, TermEntry, TermSource, TermTable, TermTagger};
pub use token::{split_words, TermClass, Token, TokenLine, WordPiece, ABBREVIATIONS};

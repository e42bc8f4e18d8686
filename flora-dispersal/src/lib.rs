//! Fruit type and seed dispersal trait extraction for layered-flora.
//!
//! ## Resolvers
//!
//! - [`PartResolver`] / [`SubpartResolver`] - anatomical parts and subparts
//! - [`FruitTypeResolver`] - fruit types (achene, samara, berry)
//! - [`DispersalStructureResolver`] - single-term dispersal structures
//! - [`DispersalTraitsResolver`] - dispersal traits with negation and absence
//!
//! ## Treatment-Level Processing
//!
//! - [`link_parts`] - propagates parts from anchors to dependent entities
//! - [`relink_subparts`] - moves fruit-type subparts to a nearby fruit or seed
//! - [`export_entities`] - flattens entities into a [`PropertyBag`]
//! - [`DispersalFormatter`] - encodes the bag as a ternary [`DispersalBlock`]
//!
//! ## Example
//!
//! ```
//! use flora_dispersal::{Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::default();
//! let cache = config.term_cache();
//! let table = cache.get().unwrap();
//!
//! let output = config.pipeline().extractor(table).unwrap().extract("Seeds winged.");
//! assert_eq!(output.dispersal.traits.get("wing"), Some(1));
//! # let _ = Pipeline::standard();
//! ```

mod config;
mod dispersal_format;
mod dispersal_structure;
mod dispersal_traits;
mod errors;
mod export;
mod fruit_type;
mod part;
mod part_linker;
mod record;
mod rules;
mod subpart_linker;
mod treatment;
mod writer;

// Pipeline presets for running rules in dependency order
pub mod pipeline;

pub use config::{default_term_sources, default_terms_dir, DispersalRule, PipelineConfig, TermCache};
pub use dispersal_format::{DispersalBlock, DispersalFormatter, TraitFlags, BASE_PARTS};
pub use dispersal_structure::DispersalStructureResolver;
pub use dispersal_traits::DispersalTraitsResolver;
pub use errors::{DispersalError, DispersalResult};
pub use export::{
    camel_case, export_entities, qualified_key, PropertyBag, FRUIT_TYPE_KEY,
    FRUIT_TYPE_KEYWORD_KEY, KEYWORD_SUFFIX, STRUCTURE_SUFFIX, SUBPART_SUFFIX, TRAITS_SUFFIX,
};
pub use fruit_type::FruitTypeResolver;
pub use part::{PartResolver, SubpartResolver, CONJ};
pub use part_linker::{link_parts, PartSource};
pub use pipeline::{Extractor, Pipeline};
pub use record::{Entity, PartValue, RuleLabel, TraitRecord};
pub use rules::{Rule, RuleKind, TraitResolver};
pub use subpart_linker::{relink_subparts, LinkConfig, ANCHOR_KIND, FRUIT_TYPE_PARTS};
pub use treatment::Treatment;
pub use writer::{write_json, TreatmentOutput};

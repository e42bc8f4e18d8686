//! Pipeline configuration.
//!
//! ```toml
//! dispersal_rule = "traits"
//!
//! [link]
//! proximity_threshold = 50
//!
//! # merged in this order, last loaded wins per field
//! [[terms]]
//! path = "terms/dispersal_terms.csv"
//! term_class = "dispersal_term"
//! ```

use std::path::{Path, PathBuf};

use layered_flora::{resolve_path, TermClass, TermSource, TermTable};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::{DispersalError, DispersalResult, LinkConfig, Pipeline};

/// Which dispersal rule the pipeline runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispersalRule {
    /// Negation-aware traits
    Traits,
    /// Single-term structures
    Structure,
}

impl Default for DispersalRule {
    fn default() -> Self {
        DispersalRule::Traits
    }
}

/// Directory of the term tables shipped with this crate.
pub fn default_terms_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("terms")
}

/// The shipped term tables, in load order.
pub fn default_term_sources() -> Vec<TermSource> {
    let dir = default_terms_dir();
    vec![
        TermSource::new(dir.join("part_terms.csv"), Some(TermClass::PartTerm)),
        TermSource::new(dir.join("subpart_terms.csv"), Some(TermClass::SubpartTerm)),
        TermSource::new(dir.join("fruit_type_terms.csv"), Some(TermClass::FruitTypeTerm)),
        TermSource::new(dir.join("dispersal_terms.csv"), Some(TermClass::DispersalTerm)),
        TermSource::new(
            dir.join("dispersal_negator_terms.csv"),
            Some(TermClass::DispersalNegator),
        ),
        TermSource::new(
            dir.join("dispersal_absence_terms.csv"),
            Some(TermClass::DispersalAbsence),
        ),
        TermSource::new(dir.join("dispersal_mapping.csv"), None),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Term sources in load order
    pub terms: Vec<TermSource>,
    pub dispersal_rule: DispersalRule,
    pub link: LinkConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            terms: default_term_sources(),
            dispersal_rule: DispersalRule::default(),
            link: LinkConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load from a TOML file. Relative term paths resolve against the
    /// file's directory.
    pub fn load(path: &Path) -> DispersalResult<Self> {
        let name = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| DispersalError::Io {
            path: name.clone(),
            source,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_toml(&content, base, &name)
    }

    /// Parse TOML text, resolving relative term paths against `base`.
    pub fn from_toml(content: &str, base: &Path, name: &str) -> DispersalResult<Self> {
        let mut config: Self = toml::from_str(content).map_err(|source| DispersalError::Toml {
            path: name.to_string(),
            source,
        })?;
        for source in config.terms.iter_mut() {
            source.path = resolve_path(base, &source.path);
        }
        config.validate(name)?;
        Ok(config)
    }

    fn validate(&self, name: &str) -> DispersalResult<()> {
        if self.link.proximity_threshold == 0 {
            return Err(DispersalError::Config {
                path: name.to_string(),
                message: "link.proximity_threshold must be positive".to_string(),
            });
        }
        Ok(())
    }

    pub fn pipeline(&self) -> Pipeline {
        let pipeline = match self.dispersal_rule {
            DispersalRule::Traits => Pipeline::standard(),
            DispersalRule::Structure => Pipeline::structure_only(),
        };
        pipeline.with_link_config(self.link.clone())
    }

    pub fn term_cache(&self) -> TermCache {
        TermCache::new(self.terms.clone())
    }
}

/// Loads the term table on first use and hands out shared references.
#[derive(Debug, Default)]
pub struct TermCache {
    sources: Vec<TermSource>,
    table: OnceCell<TermTable>,
}

impl TermCache {
    pub fn new(sources: Vec<TermSource>) -> Self {
        Self {
            sources,
            table: OnceCell::new(),
        }
    }

    pub fn get(&self) -> DispersalResult<&TermTable> {
        let table = self
            .table
            .get_or_try_init(|| TermTable::load(&self.sources))?;
        Ok(table)
    }

    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }
}

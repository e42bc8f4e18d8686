//! JSON output, one file per treatment.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::{DispersalBlock, DispersalError, DispersalResult, PropertyBag};

/// Everything written for one treatment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreatmentOutput {
    /// Remaining properties after dispersal keys were consumed
    pub properties: PropertyBag,
    pub dispersal: DispersalBlock,
    pub text: String,
}

/// Write `{dir}/{name}.json` for every `(name, output)` pair, creating `dir`
/// if needed. Returns the written paths.
pub fn write_json(outputs: &[(String, TreatmentOutput)], dir: &Path) -> DispersalResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|source| DispersalError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    let mut written = Vec::with_capacity(outputs.len());
    for (name, output) in outputs {
        let json = serde_json::to_string_pretty(output).map_err(|source| DispersalError::Json {
            name: name.clone(),
            source,
        })?;
        let path = dir.join(format!("{}.json", name));
        std::fs::write(&path, json).map_err(|source| DispersalError::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "treatment written");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn writes_one_file_per_treatment() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("json");
        let mut properties = PropertyBag::new();
        properties.insert("beakSubpart".into(), json!("beak"));
        let output = TreatmentOutput {
            properties,
            dispersal: DispersalBlock::default(),
            text: "Fruit beaked.".into(),
        };

        let written = write_json(&[("acer_rubrum".to_string(), output)], &out_dir).unwrap();
        assert_eq!(written, vec![out_dir.join("acer_rubrum.json")]);

        let content = std::fs::read_to_string(&written[0]).unwrap();
        let value: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(
            value,
            json!({
                "properties": {"beakSubpart": "beak"},
                "dispersal": {"keywords_found": [], "traits": {}},
                "text": "Fruit beaked.",
            })
        );
    }
}

#![deny(warnings)]

//! Scenario files and presets.
//!
//! A scenario file wraps one [`ScenarioInput`] with an id and a display name.
//! Files are YAML (`.yaml`/`.yml`) or JSON (`.json`); every loaded scenario is
//! validated before it is handed out.

use nursery_core::{validate_scenario, ConfigurationError, ScenarioInput};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

const DIRECT_YAML: &str = include_str!("../../../assets/scenarios/direct.yaml");
const TRAY_YAML: &str = include_str!("../../../assets/scenarios/tray.yaml");

/// A named scenario as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub scenario: ScenarioInput,
}

#[derive(Debug, Error)]
pub enum ScenarioFileError {
    #[error("io error: {0}")]
    Io(String),
    #[error("invalid scenario file {origin}: {reason}")]
    Parse { origin: String, reason: String },
    #[error("unsupported scenario file: {0}")]
    UnsupportedFormat(String),
    #[error("scenario {id} is invalid: {source}")]
    Invalid {
        id: String,
        #[source]
        source: ConfigurationError,
    },
    #[error("unknown preset: {0}")]
    UnknownPreset(String),
}

impl From<std::io::Error> for ScenarioFileError {
    fn from(e: std::io::Error) -> Self {
        ScenarioFileError::Io(e.to_string())
    }
}

/// Serialization format of a scenario file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// Format implied by the file extension, if supported.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

impl ScenarioFile {
    /// Parse and validate a scenario from text. `origin` names the source in
    /// error messages.
    pub fn parse(text: &str, format: Format, origin: &str) -> Result<Self, ScenarioFileError> {
        let parsed: ScenarioFile = match format {
            Format::Yaml => serde_yaml::from_str(text).map_err(|e| ScenarioFileError::Parse {
                origin: origin.to_string(),
                reason: e.to_string(),
            })?,
            Format::Json => serde_json::from_str(text).map_err(|e| ScenarioFileError::Parse {
                origin: origin.to_string(),
                reason: e.to_string(),
            })?,
        };
        parsed.validate()?;
        Ok(parsed)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ScenarioFileError> {
        Self::parse(text, Format::Yaml, "<yaml>")
    }

    pub fn from_json_str(text: &str) -> Result<Self, ScenarioFileError> {
        Self::parse(text, Format::Json, "<json>")
    }

    /// Read a scenario file, choosing the format by extension.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioFileError> {
        let path = path.as_ref();
        let format = Format::from_path(path)
            .ok_or_else(|| ScenarioFileError::UnsupportedFormat(path.display().to_string()))?;
        let text = fs::read_to_string(path)?;
        let file = Self::parse(&text, format, &path.display().to_string())?;
        debug!(id = %file.id, path = %path.display(), "loaded scenario file");
        Ok(file)
    }

    pub fn validate(&self) -> Result<(), ScenarioFileError> {
        validate_scenario(&self.scenario).map_err(|source| ScenarioFileError::Invalid {
            id: self.id.clone(),
            source,
        })
    }
}

/// Scenario presets looked up by id.
#[derive(Debug, Clone, Default)]
pub struct PresetLibrary {
    presets: Vec<ScenarioFile>,
}

impl PresetLibrary {
    /// Library holding only the presets compiled into the binary.
    pub fn builtin() -> Result<Self, ScenarioFileError> {
        let mut lib = Self::default();
        for (origin, text) in [("direct.yaml", DIRECT_YAML), ("tray.yaml", TRAY_YAML)] {
            lib.insert(ScenarioFile::parse(text, Format::Yaml, origin)?);
        }
        Ok(lib)
    }

    /// Add a preset, replacing any preset with the same id.
    pub fn insert(&mut self, file: ScenarioFile) {
        if let Some(existing) = self.presets.iter_mut().find(|p| p.id == file.id) {
            info!(id = %file.id, "replacing preset");
            *existing = file;
        } else {
            self.presets.push(file);
        }
    }

    /// Load every scenario file in `dir`, in file name order. Files with
    /// other extensions are skipped. Returns the number of files loaded.
    pub fn load_dir<P: AsRef<Path>>(&mut self, dir: P) -> Result<usize, ScenarioFileError> {
        let mut paths: Vec<PathBuf> = Vec::new();
        for ent in fs::read_dir(dir.as_ref())? {
            let ent = ent?;
            if !ent.file_type()?.is_file() {
                continue;
            }
            let path = ent.path();
            if Format::from_path(&path).is_some() {
                paths.push(path);
            }
        }
        paths.sort();
        for path in &paths {
            self.insert(ScenarioFile::load(path)?);
        }
        info!(dir = %dir.as_ref().display(), count = paths.len(), "loaded scenario presets");
        Ok(paths.len())
    }

    pub fn get(&self, id: &str) -> Result<&ScenarioFile, ScenarioFileError> {
        self.presets
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ScenarioFileError::UnknownPreset(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScenarioFile> + '_ {
        self.presets.iter()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nursery_core::{CycleTiming, RiskScenario, YieldSizing};
    use rust_decimal::Decimal;

    fn assets_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../assets/scenarios")
    }

    #[test]
    fn builtin_presets_parse() {
        let lib = PresetLibrary::builtin().unwrap();
        assert_eq!(lib.len(), 2);
        let tray = lib.get("tray").unwrap();
        assert_eq!(tray.scenario.success_rate, Decimal::new(85, 2));
        assert_eq!(
            tray.scenario.sizing,
            YieldSizing::Tray {
                num_trays: 10_000,
                cells_per_tray: 200,
                veg_fraction: Decimal::new(70, 2),
            }
        );
        let direct = lib.get("direct").unwrap();
        assert!(!direct.scenario.timing.is_uniform());
        assert_eq!(direct.scenario.price_per_seedling_usd.tree, Decimal::new(450, 2));
    }

    #[test]
    fn assets_dir_loads_yaml_and_json() {
        let mut lib = PresetLibrary::builtin().unwrap();
        let n = lib.load_dir(assets_dir()).unwrap();
        assert_eq!(n, 3);
        // direct and tray replace the builtins with identical content
        assert_eq!(lib.len(), 3);
        let pest = lib.get("tray-pest").unwrap();
        assert_eq!(pest.scenario.risk, RiskScenario::PestOutbreak);
        assert!(matches!(
            pest.scenario.timing,
            CycleTiming::Uniform {
                months_per_cycle: 2,
                ..
            }
        ));
    }

    #[test]
    fn unknown_preset_is_reported() {
        let lib = PresetLibrary::builtin().unwrap();
        assert!(matches!(
            lib.get("hydroponics"),
            Err(ScenarioFileError::UnknownPreset(id)) if id == "hydroponics"
        ));
    }

    #[test]
    fn out_of_domain_file_is_rejected() {
        let text = DIRECT_YAML.replace("success_rate: 0.85", "success_rate: 1.5");
        let err = ScenarioFile::from_yaml_str(&text).unwrap_err();
        assert!(matches!(
            err,
            ScenarioFileError::Invalid {
                source: ConfigurationError::SuccessRateOutOfRange(_),
                ..
            }
        ));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let err = ScenarioFile::from_json_str("{\"id\": \"x\"}").unwrap_err();
        assert!(matches!(err, ScenarioFileError::Parse { .. }));
    }

    #[test]
    fn unsupported_extension() {
        let err = ScenarioFile::load(assets_dir().join("direct.toml")).unwrap_err();
        assert!(matches!(err, ScenarioFileError::UnsupportedFormat(_)));
    }

    #[test]
    fn missing_risk_defaults_to_none() {
        let text = TRAY_YAML.replace("  risk: none\n", "");
        let file = ScenarioFile::from_yaml_str(&text).unwrap();
        assert_eq!(file.scenario.risk, RiskScenario::None);
    }
}

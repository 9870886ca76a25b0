// scenario.rs
// A scenario bundles everything one mix computation needs: tank volume,
// a crop preset and/or explicit mg/L targets, catalog overrides, and the
// solver toggles. Scenarios load from and save to TOML.

use crate::catalog::OverrideMap;
use crate::composition::IonVector;
use crate::elements::Ion;
use crate::presets;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("unknown preset '{name}'")]
    UnknownPreset { name: String },
    #[error("unknown ion symbol '{0}' in targets")]
    UnknownIon(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse scenario: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize scenario: {0}")]
    Serialize(#[from] toml::ser::Error),
}

fn default_true() -> bool {
    true
}

/// Keep scalar fields ahead of the maps so TOML serialization puts the
/// tables last.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub volume_l: f64,
    /// Crop preset supplying baseline targets; explicit targets override
    /// individual ions on top of it.
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default = "default_true")]
    pub include_micros: bool,
    #[serde(default = "default_true")]
    pub optimize: bool,
    /// Explicit targets keyed by ion symbol, mg/L.
    #[serde(default)]
    pub targets_mg_l: BTreeMap<String, f64>,
    /// Catalog corrections keyed by salt id.
    #[serde(default)]
    pub overrides: OverrideMap,
}

impl Scenario {
    /// Starter scenario for `init`: a preset, one explicit target tweak,
    /// and one price override to show the syntax.
    pub fn example() -> Scenario {
        let mut targets_mg_l = BTreeMap::new();
        targets_mg_l.insert("K".to_string(), 220.0);
        let mut overrides = OverrideMap::new();
        overrides.insert(
            "mg_so4_7h2o".to_string(),
            crate::catalog::SaltOverride {
                molar_mass: None,
                cost_per_kg: Some(0.55),
            },
        );
        Scenario {
            name: "lettuce_100l".to_string(),
            volume_l: 100.0,
            preset: Some("Lettuce".to_string()),
            include_micros: true,
            optimize: true,
            targets_mg_l,
            overrides,
        }
    }

    /// Merge preset and explicit targets into the final mg/L vector.
    pub fn resolve_targets(&self) -> Result<IonVector, ScenarioError> {
        let mut targets = match &self.preset {
            Some(name) => *presets::preset_targets(name).ok_or_else(|| {
                ScenarioError::UnknownPreset { name: name.clone() }
            })?,
            None => IonVector::zero(),
        };
        for (symbol, &mg_l) in &self.targets_mg_l {
            let ion = Ion::from_symbol(symbol)
                .ok_or_else(|| ScenarioError::UnknownIon(symbol.clone()))?;
            targets.set(ion, mg_l);
        }
        Ok(targets)
    }

    pub fn from_file(path: &str) -> Result<Scenario, ScenarioError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn to_file(&self, path: &str) -> Result<(), ScenarioError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn example_round_trips_through_toml() {
        let scenario = Scenario::example();
        let text = toml::to_string_pretty(&scenario).unwrap();
        let back: Scenario = toml::from_str(&text).unwrap();
        assert_eq!(back, scenario);
    }

    #[test]
    fn minimal_toml_gets_defaults() {
        let scenario: Scenario = toml::from_str(
            r#"
name = "bare"
volume_l = 50.0
"#,
        )
        .unwrap();
        assert_eq!(scenario.preset, None);
        assert!(scenario.include_micros);
        assert!(scenario.optimize);
        assert!(scenario.targets_mg_l.is_empty());
        assert!(scenario.overrides.is_empty());
        // No preset and no explicit targets means an all-zero vector
        assert!(scenario.resolve_targets().unwrap().is_zero());
    }

    #[test]
    fn explicit_targets_override_the_preset() {
        let scenario = Scenario {
            name: "test".to_string(),
            volume_l: 100.0,
            preset: Some("Lettuce".to_string()),
            include_micros: true,
            optimize: true,
            targets_mg_l: BTreeMap::from([("K".to_string(), 250.0)]),
            overrides: OverrideMap::new(),
        };
        let targets = scenario.resolve_targets().unwrap();
        // K replaced, the rest straight from the preset
        assert_relative_eq!(targets.get(Ion::K), 250.0);
        assert_relative_eq!(targets.get(Ion::N), 150.0);
        assert_relative_eq!(targets.get(Ion::Mo), 0.05);
    }

    #[test]
    fn unknown_names_are_rejected() {
        let mut scenario = Scenario::example();
        scenario.preset = Some("Orchid".to_string());
        assert!(matches!(
            scenario.resolve_targets(),
            Err(ScenarioError::UnknownPreset { name }) if name == "Orchid"
        ));

        let mut scenario = Scenario::example();
        scenario.targets_mg_l.insert("Na".to_string(), 10.0);
        assert!(matches!(
            scenario.resolve_targets(),
            Err(ScenarioError::UnknownIon(symbol)) if symbol == "Na"
        ));
    }

    #[test]
    fn file_round_trip() {
        let path = std::env::temp_dir().join(format!(
            "nutrient_mix_scenario_{}.toml",
            std::process::id()
        ));
        let path_str = path.to_str().unwrap();

        let scenario = Scenario::example();
        scenario.to_file(path_str).unwrap();
        let back = Scenario::from_file(path_str).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(back, scenario);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Scenario::from_file("/nonexistent/dir/scenario.toml").unwrap_err();
        assert!(matches!(err, ScenarioError::Io(_)));
    }
}

//! Scenario documents: the reference data and herd a run operates on.

use anyhow::Context;
use chrono::NaiveDate;
use ganadero_core::climate::ClimateHistory;
use ganadero_core::registry::{BreedRegistry, FeedCatalog};
use ganadero_data::{Animal, Breed, DatedReading, FeedItem};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ScenarioError {
    #[error("Duplicate animal id: {0}")]
    DuplicateAnimal(String),

    #[error("Animal not found: {0}")]
    AnimalNotFound(String),

    #[error("Animal {0} has no diet assigned")]
    NoDiet(String),
}

/// A farm scenario as stored on disk (JSON).
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    /// Grazing area, for the stocking-density check.
    #[serde(default)]
    pub hectares: Option<f64>,
    #[serde(default)]
    pub breeds: Vec<Breed>,
    /// Shared breed registry (JSON array), relative to the scenario file.
    /// Inline `breeds` override entries with the same id.
    #[serde(default)]
    pub breeds_file: Option<PathBuf>,
    #[serde(default)]
    pub feeds: Vec<FeedItem>,
    pub animals: Vec<Animal>,
    #[serde(default)]
    pub climate: Vec<DatedReading>,
    /// Dates already weighed, by animal id.
    #[serde(default)]
    pub existing_weighings: HashMap<String, Vec<NaiveDate>>,
}

impl Scenario {
    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let scenario: Self = serde_json::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        let mut scenario = Self::from_json(&content)
            .with_context(|| format!("Invalid scenario {}", path.display()))?;
        if let Some(file) = &scenario.breeds_file {
            let breeds_path = path.parent().unwrap_or_else(|| Path::new(".")).join(file);
            let shared = BreedRegistry::load(&breeds_path)
                .with_context(|| format!("Failed to load breeds {}", breeds_path.display()))?;
            tracing::info!(path = %breeds_path.display(), breeds = shared.len(), "Loaded breed registry");
            let inline = std::mem::take(&mut scenario.breeds);
            scenario.breeds = shared.iter().cloned().chain(inline).collect();
        }
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        let mut seen = HashSet::new();
        for animal in &self.animals {
            if !seen.insert(animal.id.as_str()) {
                return Err(ScenarioError::DuplicateAnimal(animal.id.clone()));
            }
        }
        Ok(())
    }

    pub fn registry(&self) -> BreedRegistry {
        BreedRegistry::from_breeds(self.breeds.iter().cloned())
    }

    pub fn catalog(&self) -> FeedCatalog {
        FeedCatalog::from_items(self.feeds.iter().cloned())
    }

    pub fn climate_history(&self) -> ClimateHistory {
        ClimateHistory::from_readings(self.climate.iter().copied())
    }

    pub fn animal(&self, id: &str) -> Result<&Animal, ScenarioError> {
        self.animals
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| ScenarioError::AnimalNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = r#"{
        "name": "Dehesa",
        "hectares": 40,
        "breeds": [{"id": "retinta", "name": "Retinta", "weight_male_adult": "950-1050"}],
        "feeds": [{
            "id": "heno", "name": "Heno de avena", "category": "Forage",
            "dry_matter_pct": 88, "crude_protein_pct": 8, "ndf_pct": 58,
            "net_energy_mcal": 1.0
        }],
        "animals": [{
            "id": "ES01", "sex": "Female", "birth_date": "2023-03-01",
            "breed": "retinta", "birth_weight": 35,
            "diet": {"lines": [{"feed_id": "heno", "kg": 9}]}
        }],
        "climate": [{"date": "2023-07-01", "mean_temp_c": 31.5, "precipitation_mm": 0}],
        "existing_weighings": {"ES01": ["2023-04-01"]}
    }"#;

    #[test]
    fn test_parse_scenario() {
        let scenario = Scenario::from_json(SCENARIO).unwrap();
        assert_eq!(scenario.hectares, Some(40.0));
        assert_eq!(scenario.registry().len(), 1);
        assert_eq!(scenario.catalog().len(), 1);
        assert_eq!(scenario.climate_history().len(), 1);
        assert!(scenario.animal("ES01").unwrap().diet.is_some());
        assert_eq!(
            scenario.animal("ES99").unwrap_err(),
            ScenarioError::AnimalNotFound("ES99".into())
        );
    }

    #[test]
    fn test_breeds_file_is_merged_under_inline_breeds() {
        let dir = tempfile::tempdir().unwrap();
        BreedRegistry::from_breeds(vec![
            Breed {
                id: "retinta".into(),
                name: "Retinta (registro)".into(),
                ..Default::default()
            },
            Breed {
                id: "limousin".into(),
                name: "Limousin".into(),
                ..Default::default()
            },
        ])
        .save(dir.path().join("razas.json"))
        .unwrap();

        let mut json: serde_json::Value = serde_json::from_str(SCENARIO).unwrap();
        json["breeds_file"] = "razas.json".into();
        let path = dir.path().join("finca.json");
        fs::write(&path, json.to_string()).unwrap();

        let scenario = Scenario::load(&path).unwrap();
        let registry = scenario.registry();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("retinta").unwrap().name, "Retinta");
        assert!(registry.get("limousin").is_some());

        json["breeds_file"] = "otra.json".into();
        fs::write(&path, json.to_string()).unwrap();
        assert!(Scenario::load(&path).is_err());
    }

    #[test]
    fn test_duplicate_animals_rejected() {
        let mut scenario = Scenario::from_json(SCENARIO).unwrap();
        scenario.animals.push(scenario.animals[0].clone());
        assert_eq!(
            scenario.validate(),
            Err(ScenarioError::DuplicateAnimal("ES01".into()))
        );
    }
}

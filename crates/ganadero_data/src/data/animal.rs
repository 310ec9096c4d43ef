use super::breed::BreedRef;
use super::feed::DietComposition;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Female,
    Male,
    /// Castrated male (steer / "buey").
    Castrated,
}

impl Sex {
    /// Males and steers share the male growth targets.
    #[must_use]
    pub fn is_male(self) -> bool {
        matches!(self, Sex::Male | Sex::Castrated)
    }
}

/// Production system the animal is raised under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProductionSystem {
    /// Feedlot / confinement.
    Intensivo,
    /// Pasture-based.
    Extensivo,
    /// Pasture plus supplementation.
    #[default]
    Mixto,
}

impl fmt::Display for ProductionSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProductionSystem::Intensivo => "Intensivo",
            ProductionSystem::Extensivo => "Extensivo",
            ProductionSystem::Mixto => "Mixto",
        };
        f.write_str(label)
    }
}

/// Reproductive situation used to resolve adult-female lifecycle stages.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ReproductiveState {
    pub pregnant: bool,
    /// Months of gestation completed (only meaningful when pregnant).
    #[serde(default)]
    pub gestation_months: Option<f64>,
    /// Days since the last calving, if the animal has calved.
    #[serde(default)]
    pub days_post_partum: Option<u32>,
}

/// Management practices that feed the meat-quality model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Management {
    /// High-oleic acorn ("bellota") feeding during finishing.
    #[serde(default)]
    pub acorn_feeding: bool,
    /// Soy-lecithin supplementation.
    #[serde(default)]
    pub soy_lecithin: bool,
}

/// Nutritional lifecycle stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifeStage {
    /// "Lactancia": suckling calf.
    Suckling,
    /// "Pre-destete": female calf approaching weaning.
    PreWeaning,
    /// "Recría": growing heifer.
    Rearing,
    /// "Vacía": open adult female, maintenance.
    Open,
    /// "Lactante": lactating cow.
    Lactating,
    /// "Lactante + Gestación temprana": early lactation overlapping early gestation.
    LactatingEarlyGestation,
    /// "Gestación": confirmed pregnancy.
    Gestation,
    /// "Gestación seca": late gestation, dried off.
    DryGestation,
    /// "Transición": weaned male calf.
    Transition,
    /// "Cebo": fattening bull calf.
    Fattening,
    /// "Toros": adult breeding bull.
    Bull,
    /// "Recría-Buey": growing steer.
    SteerRearing,
    /// "Acabado-Buey": finishing steer.
    SteerFinishing,
}

impl LifeStage {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            LifeStage::Suckling => "Lactancia",
            LifeStage::PreWeaning => "Pre-destete",
            LifeStage::Rearing => "Recría",
            LifeStage::Open => "Vacía",
            LifeStage::Lactating => "Lactante",
            LifeStage::LactatingEarlyGestation => "Lactante + Gestación temprana",
            LifeStage::Gestation => "Gestación",
            LifeStage::DryGestation => "Gestación seca",
            LifeStage::Transition => "Transición",
            LifeStage::Fattening => "Cebo",
            LifeStage::Bull => "Toros",
            LifeStage::SteerRearing => "Recría-Buey",
            LifeStage::SteerFinishing => "Acabado-Buey",
        }
    }
}

impl fmt::Display for LifeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A recorded weighing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightObservation {
    pub date: NaiveDate,
    pub weight: f64,
}

/// An animal as handed to the engines.
///
/// Only the growth engine produces new weights; only the nutrition engine
/// decides the stage. Callers write those results back.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Animal {
    pub id: String,
    pub sex: Sex,
    pub birth_date: NaiveDate,
    pub breed: BreedRef,
    /// Birth weight (kg).
    pub birth_weight: f64,
    /// Last known weight and when it was taken.
    #[serde(default)]
    pub last_weighing: Option<WeightObservation>,
    #[serde(default)]
    pub stage: Option<LifeStage>,
    #[serde(default)]
    pub diet: Option<DietComposition>,
    #[serde(default)]
    pub system: ProductionSystem,
    #[serde(default)]
    pub reproduction: ReproductiveState,
    /// Date the finishing phase began, if it has.
    #[serde(default)]
    pub finishing_start: Option<NaiveDate>,
    #[serde(default)]
    pub management: Management,
    /// Caller-supplied seed for individual genetic variance.
    #[serde(default)]
    pub genetic_seed: Option<u64>,
}

impl Animal {
    /// A minimal animal with neutral defaults.
    #[must_use]
    pub fn new(id: &str, sex: Sex, birth_date: NaiveDate, breed: BreedRef, birth_weight: f64) -> Self {
        Self {
            id: id.to_string(),
            sex,
            birth_date,
            breed,
            birth_weight,
            last_weighing: None,
            stage: None,
            diet: None,
            system: ProductionSystem::default(),
            reproduction: ReproductiveState::default(),
            finishing_start: None,
            management: Management::default(),
            genetic_seed: None,
        }
    }

    /// Age in whole days on `on`; negative when born after `on`.
    #[must_use]
    pub fn age_days(&self, on: NaiveDate) -> i64 {
        (on - self.birth_date).num_days()
    }

    /// Age in months (30.4375-day months), never negative.
    #[must_use]
    pub fn age_months(&self, on: NaiveDate) -> f64 {
        self.age_days(on).max(0) as f64 / 30.4375
    }

    /// Last known weight, falling back to birth weight.
    #[must_use]
    pub fn current_weight(&self) -> f64 {
        self.last_weighing
            .map(|w| w.weight)
            .unwrap_or(self.birth_weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_helpers() {
        let animal = Animal::new("a1", Sex::Female, date(2024, 1, 1), BreedRef::registered("x"), 38.0);
        assert_eq!(animal.age_days(date(2024, 1, 31)), 30);
        assert_eq!(animal.age_months(date(2023, 12, 1)), 0.0);
        assert!((animal.age_months(date(2025, 1, 1)) - 366.0 / 30.4375).abs() < 1e-12);
    }

    #[test]
    fn test_current_weight_falls_back_to_birth() {
        let mut animal = Animal::new("a1", Sex::Male, date(2024, 1, 1), BreedRef::registered("x"), 40.0);
        assert_eq!(animal.current_weight(), 40.0);
        animal.last_weighing = Some(WeightObservation {
            date: date(2024, 3, 1),
            weight: 95.0,
        });
        assert_eq!(animal.current_weight(), 95.0);
    }

    #[test]
    fn test_stage_labels() {
        assert_eq!(LifeStage::SteerFinishing.to_string(), "Acabado-Buey");
        assert_eq!(LifeStage::DryGestation.label(), "Gestación seca");
    }
}

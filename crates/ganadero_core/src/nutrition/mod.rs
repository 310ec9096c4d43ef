//! Nutrition engine: requirements, performance prediction, lifecycle stages
//! and ration checks.
//!
//! The engine owns the feed catalog and the nutrition parameters; all other
//! inputs are passed per call.

pub mod balance;
pub mod diet;
pub mod lifecycle;
pub mod requirements;

pub use balance::{
    assess_stocking, estimate_tdn, livestock_units, nutrient_balance, BalanceAlert, BalanceInput,
    NutrientBalance, NutrientFlow, StockingAssessment, StockingLevel,
};
pub use diet::{AlertCode, AlertLevel, DietAlert, DietAnalysis, DietValidation};
pub use lifecycle::{
    compare_to_targets, refresh_stage, resolve_stage, stage_targets, StageTargets,
    TargetComparison,
};
pub use requirements::{LimitingFactor, Performance, Requirements};

use crate::config::NutritionConfig;
use crate::error::Result;
use crate::genetics::BreedLogic;
use crate::registry::FeedCatalog;
use chrono::{Datelike, NaiveDate};
use ganadero_data::{Animal, Breed, DietComposition, LifeStage, ProductionSystem};

pub struct NutritionEngine {
    config: NutritionConfig,
    catalog: FeedCatalog,
}

impl NutritionEngine {
    pub fn new(config: NutritionConfig, catalog: FeedCatalog) -> Self {
        Self { config, catalog }
    }

    pub fn config(&self) -> &NutritionConfig {
        &self.config
    }

    pub fn catalog(&self) -> &FeedCatalog {
        &self.catalog
    }

    pub fn requirements(&self, bw: f64, adg: f64, system: ProductionSystem) -> Result<Requirements> {
        requirements::requirements(bw, adg, system, &self.config)
    }

    pub fn intake_capacity(&self, bw: f64, system: ProductionSystem) -> f64 {
        requirements::intake_capacity(bw, system, &self.config)
    }

    pub fn calculate_performance(
        &self,
        bw: f64,
        intake_energy: f64,
        cp_pct: f64,
        genetic_adg: f64,
    ) -> Result<Performance> {
        requirements::calculate_performance(
            bw,
            intake_energy,
            cp_pct,
            genetic_adg,
            self.config.genetic_ceiling_factor,
        )
    }

    pub fn analyze_diet(&self, diet: &DietComposition) -> DietAnalysis {
        diet::analyze_diet(diet, &self.catalog)
    }

    /// Energy the animal can actually eat: dry matter beyond intake
    /// capacity is refused pro rata.
    pub fn usable_energy(&self, analysis: &DietAnalysis, bw: f64, system: ProductionSystem) -> f64 {
        let capacity = self.intake_capacity(bw, system);
        if analysis.dry_matter_kg > capacity && analysis.dry_matter_kg > 0.0 {
            analysis.energy_mcal * capacity / analysis.dry_matter_kg
        } else {
            analysis.energy_mcal
        }
    }

    /// Predicted performance of a ration at a body weight.
    pub fn predict_performance(
        &self,
        analysis: &DietAnalysis,
        bw: f64,
        system: ProductionSystem,
        genetic_adg: f64,
    ) -> Result<Performance> {
        let energy = self.usable_energy(analysis, bw, system);
        self.calculate_performance(bw, energy, analysis.crude_protein_pct, genetic_adg)
    }

    /// Runs every ration rule for a breed in the month of `on`.
    pub fn validate_diet(&self, diet: &DietComposition, breed: &Breed, on: NaiveDate) -> DietValidation {
        let analysis = self.analyze_diet(diet);
        self.validate_analysis(&analysis, breed, on)
    }

    pub fn validate_analysis(
        &self,
        analysis: &DietAnalysis,
        breed: &Breed,
        on: NaiveDate,
    ) -> DietValidation {
        let validation = diet::validate_diet(analysis, breed.is_indicine(), on.month(), &self.config);
        if !validation.is_valid() {
            tracing::debug!(
                breed = %breed.id,
                alerts = validation.alerts.len(),
                highest = ?validation.highest_level(),
                "Ration raised alerts"
            );
        }
        validation
    }

    pub fn stage(&self, animal: &Animal, on: NaiveDate) -> LifeStage {
        resolve_stage(animal, on)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ganadero_data::{FeedCategory, FeedItem};

    fn engine() -> NutritionEngine {
        let item = |id: &str, category, cp, ndf, ne| FeedItem {
            id: id.to_string(),
            name: id.to_string(),
            category,
            legume: false,
            dry_matter_pct: 90.0,
            crude_protein_pct: cp,
            ndf_pct: ndf,
            adf_pct: 0.0,
            fat_pct: 2.5,
            phosphorus_pct: 0.3,
            net_energy_mcal: ne,
            cost_per_kg: 0.25,
        };
        NutritionEngine::new(
            NutritionConfig::default(),
            FeedCatalog::from_items(vec![
                item("pienso", FeedCategory::Concentrate, 14.0, 20.0, 2.0),
                item("heno", FeedCategory::Forage, 9.0, 60.0, 1.1),
            ]),
        )
    }

    #[test]
    fn test_usable_energy_caps_at_capacity() {
        let engine = engine();
        let diet = DietComposition::new().with("pienso", 20.0);
        let analysis = engine.analyze_diet(&diet);
        assert!((analysis.dry_matter_kg - 18.0).abs() < 1e-9);
        let capacity = engine.intake_capacity(300.0, ProductionSystem::Intensivo);
        let usable = engine.usable_energy(&analysis, 300.0, ProductionSystem::Intensivo);
        assert!((usable - capacity * 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_predict_performance_on_feedlot_ration() {
        let engine = engine();
        let diet = DietComposition::new().with("pienso", 6.0).with("heno", 2.0);
        let analysis = engine.analyze_diet(&diet);
        let perf = engine
            .predict_performance(&analysis, 350.0, ProductionSystem::Intensivo, 1.4)
            .unwrap();
        assert!(perf.adg > 0.0);
        assert!(perf.adg <= 1.4 * 1.2 + 1e-12);
    }

    #[test]
    fn test_validate_diet_uses_breed_subspecies() {
        let engine = engine();
        let diet = DietComposition::new().with("pienso", 5.5).with("heno", 4.5);
        let on = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let taurine = Breed {
            id: "retinta".into(),
            name: "Retinta".into(),
            subspecies: "Bos taurus".into(),
            ..Default::default()
        };
        let indicine = Breed {
            id: "brahman".into(),
            name: "Brahman".into(),
            subspecies: "Bos indicus".into(),
            ..Default::default()
        };
        assert!(!engine.validate_diet(&diet, &taurine, on).has(AlertCode::Acidosis));
        assert!(engine.validate_diet(&diet, &indicine, on).has(AlertCode::Acidosis));
    }
}

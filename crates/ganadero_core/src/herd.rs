//! Batch evaluation of a herd.
//!
//! Breeds (and F1 hybrids) are resolved sequentially up front so that a
//! missing breed skips the animal before any carcass or quality math. The
//! per-animal work then runs in parallel over shared immutable state.

use crate::carcass::{CarcassInput, CarcassQualityEngine, QualityInput};
use crate::climate::ClimateProvider;
use crate::config::EngineConfig;
use crate::error::{ensure_positive, EngineError, Result};
use crate::genetics::{resolve_breed, HybridCache};
use crate::growth::GrowthSimulator;
use crate::metrics::EngineMetrics;
use crate::nutrition::{
    compare_to_targets, livestock_units, nutrient_balance, resolve_stage, BalanceInput, DietAlert,
    DietAnalysis, NutrientBalance, NutritionEngine, TargetComparison,
};
use crate::registry::{BreedRegistry, FeedCatalog};
use chrono::NaiveDate;
use ganadero_data::{Animal, Breed, LifeStage, MonthlyRecord};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Everything computed for one animal in a run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnimalEvaluation {
    pub animal_id: String,
    pub breed_id: String,
    pub stage: LifeStage,
    pub final_weight: f64,
    /// New monthly records, excluding ticks already weighed.
    pub records: Vec<MonthlyRecord>,
    pub alerts: Vec<DietAlert>,
    pub targets: Option<TargetComparison>,
    pub balance: Option<NutrientBalance>,
    pub growth_fallbacks: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SkippedAnimal {
    pub animal_id: String,
    pub reason: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HerdReport {
    pub as_of: NaiveDate,
    pub config_fingerprint: String,
    pub evaluations: Vec<AnimalEvaluation>,
    pub skipped: Vec<SkippedAnimal>,
    /// Livestock units (UGM) of the evaluated animals.
    pub livestock_units: f64,
}

impl HerdReport {
    pub fn total_records(&self) -> usize {
        self.evaluations.iter().map(|e| e.records.len()).sum()
    }

    /// Alert counts by code, sorted by code name.
    pub fn alert_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for alert in self.evaluations.iter().flat_map(|e| &e.alerts) {
            *counts.entry(alert.code.to_string()).or_insert(0) += 1;
        }
        counts
    }

    pub fn records(&self) -> impl Iterator<Item = &MonthlyRecord> {
        self.evaluations.iter().flat_map(|e| &e.records)
    }
}

pub struct HerdEvaluator<'a> {
    registry: &'a BreedRegistry,
    growth: GrowthSimulator,
    nutrition: NutritionEngine,
    carcass: CarcassQualityEngine,
    fingerprint: String,
    metrics: EngineMetrics,
}

impl<'a> HerdEvaluator<'a> {
    pub fn new(config: &EngineConfig, registry: &'a BreedRegistry, catalog: FeedCatalog) -> Self {
        Self {
            registry,
            growth: GrowthSimulator::new(config.growth.clone()),
            nutrition: NutritionEngine::new(config.nutrition.clone(), catalog),
            carcass: CarcassQualityEngine::new(
                config.carcass.clone(),
                config.quality.clone(),
                config.growth.clone(),
            ),
            fingerprint: config.fingerprint(),
            metrics: EngineMetrics::new(),
        }
    }

    pub fn metrics(&self) -> &EngineMetrics {
        &self.metrics
    }

    pub fn growth(&self) -> &GrowthSimulator {
        &self.growth
    }

    pub fn nutrition(&self) -> &NutritionEngine {
        &self.nutrition
    }

    pub fn carcass(&self) -> &CarcassQualityEngine {
        &self.carcass
    }

    /// Evaluates every animal up to `now`.
    ///
    /// `existing` maps animal ids to dates already weighed; ticks near those
    /// dates produce no new records.
    pub fn evaluate(
        &self,
        animals: &[Animal],
        climate: &dyn ClimateProvider,
        existing: &HashMap<String, Vec<NaiveDate>>,
        now: NaiveDate,
    ) -> HerdReport {
        let mut cache = HybridCache::new();
        let mut skipped = Vec::new();
        let mut resolved: Vec<(&Animal, Breed)> = Vec::with_capacity(animals.len());
        for animal in animals {
            match resolve_breed(self.registry, &animal.breed, &mut cache) {
                Ok(breed) => resolved.push((animal, breed)),
                Err(err) => {
                    tracing::warn!(animal = %animal.id, breed = %animal.breed, error = %err, "Skipping animal");
                    self.metrics.increment_counter("skipped");
                    skipped.push(SkippedAnimal {
                        animal_id: animal.id.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        let no_dates = Vec::new();
        let evaluate_one = |(animal, breed): &(&Animal, Breed)| {
            let dates = existing.get(&animal.id).unwrap_or(&no_dates);
            self.evaluate_animal(animal, breed, climate, dates, now)
                .map_err(|err| (animal.id.clone(), err))
        };

        #[cfg(feature = "parallel")]
        let results: Vec<_> = resolved.par_iter().map(evaluate_one).collect();
        #[cfg(not(feature = "parallel"))]
        let results: Vec<_> = resolved.iter().map(evaluate_one).collect();

        let mut evaluations = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(evaluation) => evaluations.push(evaluation),
                Err((animal_id, err)) => {
                    tracing::warn!(animal = %animal_id, error = %err, "Evaluation failed");
                    self.metrics.increment_counter("skipped");
                    skipped.push(SkippedAnimal {
                        animal_id,
                        reason: err.to_string(),
                    });
                }
            }
        }

        let livestock_units = evaluations.iter().map(|e| livestock_units(e.stage)).sum();
        self.metrics.log_summary();
        tracing::info!(
            evaluated = evaluations.len(),
            skipped = skipped.len(),
            hybrids = cache.len(),
            "Herd report ready"
        );

        HerdReport {
            as_of: now,
            config_fingerprint: self.fingerprint.clone(),
            evaluations,
            skipped,
            livestock_units,
        }
    }

    /// Growth, carcass, quality and ration checks for one resolved animal.
    pub fn evaluate_animal(
        &self,
        animal: &Animal,
        breed: &Breed,
        climate: &dyn ClimateProvider,
        existing_dates: &[NaiveDate],
        now: NaiveDate,
    ) -> Result<AnimalEvaluation> {
        let context = |err: EngineError| err.with_context(format!("animal {}", animal.id));
        ensure_positive("birth weight", animal.birth_weight).map_err(context)?;

        let params = self.growth.params(animal, Some(breed));
        let analysis = animal.diet.as_ref().map(|d| self.nutrition.analyze_diet(d));

        let points = match (&analysis, animal.last_weighing) {
            (Some(_), _) => self
                .growth
                .simulate_with_diet(animal, Some(breed), climate, &self.nutrition, now)
                .map_err(context)?,
            (None, Some(from)) => self.growth.resume(animal, Some(breed), climate, from, now),
            (None, None) => self.growth.simulate(animal, Some(breed), climate, now),
        };
        let pending = self.growth.pending_observations(&points, existing_dates);

        let window = self.growth.config().climate_window_days;
        let mut records = Vec::with_capacity(pending.len());
        for point in &pending {
            let thi = climate.window_mean(point.date, window).map(|r| r.thi());
            let carcass = self
                .carcass
                .estimate_carcass(
                    animal,
                    breed,
                    &CarcassInput {
                        live_weight: point.weight,
                        observed_adg: point.adg,
                        diet_energy: analysis
                            .as_ref()
                            .map(DietAnalysis::energy_density)
                            .filter(|e| *e > 0.0),
                        thi,
                        on: point.date,
                    },
                )
                .map_err(context)?;
            let quality = self.carcass.estimate_quality(
                breed,
                &QualityInput {
                    days_on_finishing: animal
                        .finishing_start
                        .map_or(0.0, |start| (point.date - start).num_days().max(0) as f64),
                    energy_intake_mcal: analysis.as_ref().map_or(0.0, |a| {
                        self.nutrition.usable_energy(a, point.weight, animal.system)
                    }),
                    adg: point.adg.max(0.0),
                    // No reading means no heat load.
                    thi: thi.unwrap_or(0.0),
                    diet_instability: 0.0,
                    health_issues: 0.0,
                    sex: animal.sex,
                    acorn_feeding: animal.management.acorn_feeding,
                    soy_lecithin: animal.management.soy_lecithin,
                },
            );
            records.push(MonthlyRecord {
                animal_id: animal.id.clone(),
                date: point.date,
                weight: point.weight,
                adg: point.adg,
                climate_factor: point.climate_factor,
                maturity_factor: point.maturity_factor,
                stage: resolve_stage(animal, point.date),
                carcass: carcass.estimate(),
                quality: quality.estimate(),
            });
        }

        let stage = resolve_stage(animal, now);
        let final_weight = points.last().map_or(animal.current_weight(), |p| p.weight);
        let last_adg = points.last().map_or(0.0, |p| p.adg);

        let (alerts, targets, balance) = match &analysis {
            Some(analysis) => {
                let alerts = self.nutrition.validate_analysis(analysis, breed, now).alerts;
                let predicted = analysis
                    .drives_growth(animal.system)
                    .then(|| {
                        self.nutrition.predict_performance(
                            analysis,
                            final_weight,
                            animal.system,
                            params.base_adg,
                        )
                    })
                    .and_then(|p| p.ok())
                    .map(|p| p.adg);
                let capacity = self.nutrition.intake_capacity(final_weight, animal.system);
                let balance = nutrient_balance(&BalanceInput {
                    dry_matter_kg: analysis.dry_matter_kg.min(capacity),
                    crude_protein_pct: analysis.crude_protein_pct,
                    phosphorus_pct: analysis.phosphorus_pct,
                    adg: last_adg,
                    milk_kg: 0.0,
                    gestation_months: animal
                        .reproduction
                        .pregnant
                        .then_some(animal.reproduction.gestation_months)
                        .flatten(),
                });
                (
                    alerts,
                    Some(compare_to_targets(analysis, stage, predicted)),
                    Some(balance),
                )
            }
            None => (Vec::new(), None, None),
        };

        self.metrics
            .record_animal(points.len(), params.fallbacks, alerts.len());
        for alert in &alerts {
            self.metrics.increment_counter(&alert.code.to_string());
        }

        Ok(AnimalEvaluation {
            animal_id: animal.id.clone(),
            breed_id: breed.id.clone(),
            stage,
            final_weight,
            records,
            alerts,
            targets,
            balance,
            growth_fallbacks: params.fallbacks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate::NoClimate;
    use ganadero_data::{BreedRef, Sex};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn registry() -> BreedRegistry {
        BreedRegistry::from_breeds(vec![
            Breed {
                id: "retinta".into(),
                name: "Retinta".into(),
                subspecies: "Bos taurus".into(),
                weight_male_adult: Some(1000.0.into()),
                adg_feedlot: Some(1.2.into()),
                adg_grazing: Some(0.8.into()),
                ..Default::default()
            },
            Breed {
                id: "limousin".into(),
                name: "Limousin".into(),
                subspecies: "Bos taurus".into(),
                weight_male_adult: Some(1100.0.into()),
                adg_feedlot: Some(1.4.into()),
                adg_grazing: Some(0.9.into()),
                ..Default::default()
            },
        ])
    }

    #[test]
    fn test_missing_breed_is_skipped() {
        let registry = registry();
        let evaluator = HerdEvaluator::new(&EngineConfig::default(), &registry, FeedCatalog::new());
        let animals = vec![
            Animal::new("ok", Sex::Male, date(2024, 1, 1), BreedRef::registered("retinta"), 40.0),
            Animal::new("bad", Sex::Male, date(2024, 1, 1), BreedRef::registered("wagyu"), 40.0),
            Animal::new("f1", Sex::Castrated, date(2024, 1, 1), BreedRef::cross("limousin", "retinta"), 40.0),
        ];
        let report = evaluator.evaluate(&animals, &NoClimate, &HashMap::new(), date(2024, 7, 1));
        assert_eq!(report.evaluations.len(), 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].animal_id, "bad");
        assert_eq!(report.evaluations[1].breed_id, "limousin/retinta");
        assert_eq!(report.total_records(), 12);
        assert_eq!(evaluator.metrics().counter("skipped"), 1);
    }

    #[test]
    fn test_blank_breed_is_reported_as_missing() {
        let registry = registry();
        let evaluator = HerdEvaluator::new(&EngineConfig::default(), &registry, FeedCatalog::new());
        let animals = vec![Animal::new("blank", Sex::Male, date(2024, 1, 1), BreedRef::registered(""), 40.0)];
        let report = evaluator.evaluate(&animals, &NoClimate, &HashMap::new(), date(2024, 7, 1));
        assert!(report.evaluations.is_empty());
        assert_eq!(report.skipped[0].reason, "Missing breed: empty breed key");
    }

    #[test]
    fn test_existing_weighings_suppress_records() {
        let registry = registry();
        let evaluator = HerdEvaluator::new(&EngineConfig::default(), &registry, FeedCatalog::new());
        let animals = vec![Animal::new("ok", Sex::Male, date(2024, 1, 1), BreedRef::registered("retinta"), 40.0)];
        let mut existing = HashMap::new();
        existing.insert("ok".to_string(), vec![date(2024, 2, 2)]);
        let report = evaluator.evaluate(&animals, &NoClimate, &existing, date(2024, 4, 30));
        let dates: Vec<_> = report.records().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(2024, 3, 1), date(2024, 3, 31), date(2024, 4, 30)]);
    }

    #[test]
    fn test_invalid_birth_weight_is_reported() {
        let registry = registry();
        let evaluator = HerdEvaluator::new(&EngineConfig::default(), &registry, FeedCatalog::new());
        let animals = vec![Animal::new("zero", Sex::Female, date(2024, 1, 1), BreedRef::registered("retinta"), 0.0)];
        let report = evaluator.evaluate(&animals, &NoClimate, &HashMap::new(), date(2024, 7, 1));
        assert!(report.evaluations.is_empty());
        assert!(report.skipped[0].reason.contains("animal zero"));
    }
}

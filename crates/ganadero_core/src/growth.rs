//! Monthly growth simulation.
//!
//! Weight advances in fixed ticks anchored on the birth date. Each period
//! gains `base_adg × climate × maturity × days`, so growth slows as the
//! animal approaches its adult target and stops just past it.

use crate::climate::{climate_factor, ClimateProvider};
use crate::config::GrowthConfig;
use crate::error::{ensure_positive, Result};
use crate::genetics::BreedLogic;
use crate::nutrition::NutritionEngine;
use chrono::{Duration, NaiveDate};
use ganadero_data::{Animal, Breed, WeightObservation};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// One simulated tick.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct GrowthPoint {
    pub date: NaiveDate,
    /// Weight at the end of the period (kg).
    pub weight: f64,
    /// Realized daily gain over the period (kg/day).
    pub adg: f64,
    pub climate_factor: f64,
    pub maturity_factor: f64,
}

/// Per-animal growth parameters after breed fallbacks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthParams {
    /// Reference ADG including sex adjustment and individual variance.
    pub base_adg: f64,
    /// Adult target weight (kg).
    pub target_weight: f64,
    /// Individual genetic multiplier already folded into `base_adg`.
    pub variance_factor: f64,
    /// Number of breed fields that fell back to defaults.
    pub fallbacks: u32,
}

impl GrowthParams {
    /// Resolves the animal's growth parameters. A missing breed uses defaults.
    pub fn resolve(animal: &Animal, breed: Option<&Breed>, config: &GrowthConfig) -> Self {
        let mut fallbacks = 0;

        let mut base_adg = match breed.and_then(|b| b.adg_for(animal.system)) {
            Some(adg) => adg,
            None => {
                fallbacks += 1;
                config.default_adg
            }
        };
        if !animal.sex.is_male() {
            base_adg *= config.female_adg_factor;
        }

        let male_weight = breed.and_then(BreedLogic::male_adult_weight);
        let target = if animal.sex.is_male() {
            male_weight
        } else {
            breed
                .and_then(BreedLogic::female_adult_weight)
                .or_else(|| male_weight.map(|w| w * config.female_weight_factor))
        };
        let target_weight = match target {
            Some(w) => w,
            None => {
                fallbacks += 1;
                if animal.sex.is_male() {
                    config.default_target_weight
                } else {
                    config.default_target_weight * config.female_weight_factor
                }
            }
        };

        let variance_factor = match animal.genetic_seed {
            Some(seed) if config.genetic_variance > 0.0 => {
                let v = config.genetic_variance;
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                rng.gen_range((1.0 - v)..=(1.0 + v))
            }
            _ => 1.0,
        };

        if fallbacks > 0 {
            tracing::debug!(
                animal = %animal.id,
                breed = breed.map_or("-", |b| b.id.as_str()),
                fallbacks,
                "Growth parameters fell back to defaults"
            );
        }

        Self {
            base_adg: base_adg * variance_factor,
            target_weight,
            variance_factor,
            fallbacks,
        }
    }
}

/// Fraction of potential growth left: 1 at zero weight, 0 at or past the cutoff.
pub fn maturity_factor(weight: f64, target: f64, cutoff: f64) -> f64 {
    if target <= 0.0 || !weight.is_finite() || weight >= cutoff * target {
        return 0.0;
    }
    (1.0 - weight / target).clamp(0.0, 1.0)
}

/// Keeps points with no date in `existing_dates` within `window_days`.
pub fn pending_observations(
    points: &[GrowthPoint],
    existing_dates: &[NaiveDate],
    window_days: i64,
) -> Vec<GrowthPoint> {
    points
        .iter()
        .filter(|p| {
            !existing_dates
                .iter()
                .any(|d| (p.date - *d).num_days().abs() <= window_days)
        })
        .copied()
        .collect()
}

/// First birth-anchored tick strictly after `after`; `None` past the calendar range.
fn first_tick_after(birth: NaiveDate, after: NaiveDate, tick_days: i64) -> Option<NaiveDate> {
    let elapsed = (after - birth).num_days();
    let k = if elapsed < 0 { 1 } else { elapsed / tick_days + 1 };
    birth.checked_add_signed(Duration::days(k.checked_mul(tick_days)?))
}

fn birth_observation(animal: &Animal) -> WeightObservation {
    WeightObservation {
        date: animal.birth_date,
        weight: animal.birth_weight,
    }
}

/// Stop conditions of a run. At least one of `until` and `max_ticks` is set.
#[derive(Debug, Clone, Copy)]
struct Run {
    from: WeightObservation,
    until: Option<NaiveDate>,
    max_ticks: Option<usize>,
    target_weight: Option<f64>,
}

pub struct GrowthSimulator {
    config: GrowthConfig,
}

impl GrowthSimulator {
    pub fn new(config: GrowthConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GrowthConfig {
        &self.config
    }

    pub fn params(&self, animal: &Animal, breed: Option<&Breed>) -> GrowthParams {
        GrowthParams::resolve(animal, breed, &self.config)
    }

    fn climate_at(&self, climate: &dyn ClimateProvider, date: NaiveDate) -> f64 {
        let mean = climate.window_mean(date, self.config.climate_window_days);
        climate_factor(mean.as_ref(), &self.config.climate)
    }

    /// Ticks from birth up to `now`. Born after `now` gives no points.
    pub fn simulate(
        &self,
        animal: &Animal,
        breed: Option<&Breed>,
        climate: &dyn ClimateProvider,
        now: NaiveDate,
    ) -> Vec<GrowthPoint> {
        self.resume(animal, breed, climate, birth_observation(animal), now)
    }

    /// Continues from a known weighing on the birth-anchored cadence.
    pub fn resume(
        &self,
        animal: &Animal,
        breed: Option<&Breed>,
        climate: &dyn ClimateProvider,
        from: WeightObservation,
        now: NaiveDate,
    ) -> Vec<GrowthPoint> {
        let params = self.params(animal, breed);
        let run = Run {
            from,
            until: Some(now),
            max_ticks: None,
            target_weight: None,
        };
        self.run(
            animal,
            &params,
            run,
            |date| self.climate_at(climate, date),
            |_, climate, maturity| params.base_adg * climate * maturity,
        )
    }

    /// Grows the animal on its assigned ration instead of the breed reference ADG.
    ///
    /// Starts from the last weighing (or birth). Each tick the nutrition
    /// engine predicts ADG for the current weight; positive gains are scaled
    /// by climate and maturity, an energy deficit loses weight down to the
    /// birth weight. Animals without a diet, or whose ration cannot drive
    /// growth (see [`drives_growth`]), fall back to [`resume`](Self::resume).
    ///
    /// [`drives_growth`]: crate::nutrition::DietAnalysis::drives_growth
    pub fn simulate_with_diet(
        &self,
        animal: &Animal,
        breed: Option<&Breed>,
        climate: &dyn ClimateProvider,
        nutrition: &NutritionEngine,
        now: NaiveDate,
    ) -> Result<Vec<GrowthPoint>> {
        let from = animal
            .last_weighing
            .unwrap_or_else(|| birth_observation(animal));
        let Some(diet) = animal.diet.as_ref() else {
            return Ok(self.resume(animal, breed, climate, from, now));
        };
        ensure_positive("birth weight", animal.birth_weight)?;
        ensure_positive("start weight", from.weight)?;

        let analysis = nutrition.analyze_diet(diet);
        if !analysis.drives_growth(animal.system) {
            tracing::debug!(
                animal = %animal.id,
                system = %animal.system,
                unknown = analysis.unknown_feeds.len(),
                dry_matter = analysis.dry_matter_kg,
                "Ration cannot drive growth, using reference curve"
            );
            return Ok(self.resume(animal, breed, climate, from, now));
        }

        let params = self.params(animal, breed);
        let run = Run {
            from,
            until: Some(now),
            max_ticks: None,
            target_weight: None,
        };
        Ok(self.run(
            animal,
            &params,
            run,
            |date| self.climate_at(climate, date),
            |weight, climate, maturity| {
                // Weight stays positive, so the prediction cannot fail here.
                let predicted = nutrition
                    .predict_performance(&analysis, weight, animal.system, params.base_adg)
                    .map_or(0.0, |p| p.adg);
                if predicted > 0.0 {
                    predicted * climate * maturity
                } else {
                    predicted
                }
            },
        ))
    }

    /// Ticks from `from` until `target_weight` is reached, under neutral climate.
    ///
    /// `None` when the animal stops gaining or cannot reach the target
    /// within `max_ticks`.
    pub fn project_to_weight(
        &self,
        animal: &Animal,
        breed: Option<&Breed>,
        from: WeightObservation,
        target_weight: f64,
        max_ticks: usize,
    ) -> Option<Vec<GrowthPoint>> {
        if !target_weight.is_finite() {
            return None;
        }
        if from.weight >= target_weight {
            return Some(Vec::new());
        }
        let params = self.params(animal, breed);
        let run = Run {
            from,
            until: None,
            max_ticks: Some(max_ticks),
            target_weight: Some(target_weight),
        };
        let points = self.run(animal, &params, run, |_| 1.0, |_, climate, maturity| {
            params.base_adg * climate * maturity
        });
        match points.last() {
            Some(last) if last.weight >= target_weight => Some(points),
            _ => None,
        }
    }

    /// Points with no existing weighing within the dedup window.
    pub fn pending_observations(
        &self,
        points: &[GrowthPoint],
        existing_dates: &[NaiveDate],
    ) -> Vec<GrowthPoint> {
        pending_observations(points, existing_dates, self.config.dedup_window_days)
    }

    fn run<C, G>(
        &self,
        animal: &Animal,
        params: &GrowthParams,
        run: Run,
        climate_at: C,
        daily_gain: G,
    ) -> Vec<GrowthPoint>
    where
        C: Fn(NaiveDate) -> f64,
        G: Fn(f64, f64, f64) -> f64,
    {
        let mut points = Vec::new();
        if run.until.is_some_and(|until| animal.birth_date > until) {
            return points;
        }

        let tick_days = self.config.tick_days.max(1);
        let mut date = run.from.date.max(animal.birth_date);
        let mut weight = run.from.weight;
        let floor = animal.birth_weight.min(weight);
        let Some(mut next) = first_tick_after(animal.birth_date, date, tick_days) else {
            return points;
        };

        loop {
            if run.until.is_some_and(|until| next > until) {
                break;
            }
            if run.max_ticks.is_some_and(|max| points.len() >= max) {
                break;
            }

            let days = (next - date).num_days() as f64;
            let maturity = maturity_factor(weight, params.target_weight, self.config.maturity_cutoff);
            let climate = climate_at(next);
            let gain = daily_gain(weight, climate, maturity) * days;

            let mut new_weight = weight + gain;
            if !new_weight.is_finite() {
                new_weight = weight;
            }
            new_weight = new_weight.max(floor);
            // A projection that stops gaining never reaches its target.
            if run.target_weight.is_some() && new_weight <= weight {
                break;
            }

            points.push(GrowthPoint {
                date: next,
                weight: new_weight,
                adg: (new_weight - weight) / days,
                climate_factor: climate,
                maturity_factor: maturity,
            });

            weight = new_weight;
            date = next;

            if run.target_weight.is_some_and(|target| weight >= target) {
                break;
            }
            match next.checked_add_signed(Duration::days(tick_days)) {
                Some(following) => next = following,
                None => break,
            }
        }

        tracing::trace!(animal = %animal.id, ticks = points.len(), weight, "Growth run finished");
        points
    }
}

//! Hybrid genetics: deterministic F1 blending of two parent breeds.
//!
//! Numeric traits are blended with fixed parental shares and heterosis
//! bonuses; qualitative traits are blended on the ordinal scale and mapped
//! back to the nearest label.

use crate::error::{EngineError, Result};
use crate::registry::BreedRegistry;
use ganadero_data::{
    normalize_key, Breed, BreedRef, CrossType, HeterosisFactors, HybridBreed, HybridScores,
    Lineage, Measure, ProductionSystem, TraitLevel,
};
use std::collections::HashMap;

/// Joins parent ids into a hybrid id. Registered breed ids never contain it.
pub const HYBRID_ID_SEPARATOR: char = '/';

/// Sire share of adult weight (paternal frame-size influence).
pub const SIRE_WEIGHT_SHARE: f64 = 0.6;
/// Sire share of marbling potential.
pub const SIRE_MARBLING_SHARE: f64 = 0.4;
/// Sire share of heat tolerance.
pub const SIRE_HEAT_SHARE: f64 = 0.5;
/// Sire share of calving ease (the dam dominates through maternal effects).
pub const SIRE_CALVING_SHARE: f64 = 0.3;

pub const INDICINE_TAURINE_HETEROSIS: HeterosisFactors = HeterosisFactors {
    adg: 0.12,
    fcr: 0.06,
    resilience: 0.20,
};

pub const TAURINE_HETEROSIS: HeterosisFactors = HeterosisFactors {
    adg: 0.05,
    fcr: 0.03,
    resilience: 0.08,
};

// Fallbacks for parents without usable numbers.
const DEFAULT_MALE_WEIGHT: f64 = 900.0;
const FEMALE_WEIGHT_RATIO: f64 = 0.85;
const DEFAULT_ADG: f64 = 0.8;
const DEFAULT_FCR: f64 = 6.5;
const DEFAULT_SLAUGHTER_AGE: f64 = 24.0;

// Plausibility bounds for hybrid traits.
const MALE_WEIGHT_BOUNDS: (f64, f64) = (250.0, 1500.0);
const FEMALE_WEIGHT_BOUNDS: (f64, f64) = (200.0, 1100.0);
const ADG_BOUNDS: (f64, f64) = (0.1, 2.5);
const FCR_BOUNDS: (f64, f64) = (3.0, 15.0);
const SLAUGHTER_AGE_BOUNDS: (f64, f64) = (6.0, 60.0);

const INDICINE_MARKERS: [&str; 3] = ["indicus", "brahman", "nelore"];

pub trait BreedLogic {
    /// Indicine (zebu) content, from the subspecies string or, failing that, the name.
    fn is_indicine(&self) -> bool;
    fn male_adult_weight(&self) -> Option<f64>;
    fn female_adult_weight(&self) -> Option<f64>;
    /// Reference ADG for a production system; `Mixto` averages feedlot and grazing.
    fn adg_for(&self, system: ProductionSystem) -> Option<f64>;
    fn slaughter_age(&self) -> Option<f64>;
    /// Marbling ceiling on the 1–5 scale.
    fn marbling_cap(&self) -> f64;
    fn cross(&self, dam: &Breed) -> HybridBreed;
}

fn measure(field: &Option<Measure>) -> Option<f64> {
    field.as_ref().and_then(Measure::value)
}

impl BreedLogic for Breed {
    fn is_indicine(&self) -> bool {
        let subspecies = normalize_key(&self.subspecies);
        let text = if subspecies.is_empty() {
            normalize_key(&self.name)
        } else {
            subspecies
        };
        INDICINE_MARKERS.iter().any(|m| text.contains(m))
    }

    fn male_adult_weight(&self) -> Option<f64> {
        measure(&self.weight_male_adult)
    }

    fn female_adult_weight(&self) -> Option<f64> {
        measure(&self.weight_female_adult)
    }

    fn adg_for(&self, system: ProductionSystem) -> Option<f64> {
        let feedlot = measure(&self.adg_feedlot);
        let grazing = measure(&self.adg_grazing);
        match system {
            ProductionSystem::Intensivo => feedlot,
            ProductionSystem::Extensivo => grazing,
            ProductionSystem::Mixto => match (feedlot, grazing) {
                (Some(f), Some(g)) => Some((f + g) / 2.0),
                (one, other) => one.or(other),
            },
        }
    }

    fn slaughter_age(&self) -> Option<f64> {
        measure(&self.slaughter_age_months)
    }

    fn marbling_cap(&self) -> f64 {
        self.marbling_potential.marbling_scale()
    }

    fn cross(&self, dam: &Breed) -> HybridBreed {
        cross(self, dam)
    }
}

/// Cross type and heterosis set for a parent pair.
pub fn heterosis_for(sire: &Breed, dam: &Breed) -> (CrossType, HeterosisFactors) {
    if normalize_key(&sire.id) == normalize_key(&dam.id) {
        return (CrossType::SameBreed, HeterosisFactors::default());
    }
    if sire.is_indicine() != dam.is_indicine() {
        (CrossType::IndicineTaurine, INDICINE_TAURINE_HETEROSIS)
    } else {
        (CrossType::TaurineCross, TAURINE_HETEROSIS)
    }
}

/// Nullable entry point: no hybrid unless both parents are present.
pub fn calculate(sire: Option<&Breed>, dam: Option<&Breed>) -> Option<HybridBreed> {
    match (sire, dam) {
        (Some(sire), Some(dam)) => Some(cross(sire, dam)),
        _ => None,
    }
}

fn blend(sire: f64, dam: f64, sire_share: f64) -> f64 {
    sire_share * sire + (1.0 - sire_share) * dam
}

fn bounded(value: f64, bounds: (f64, f64)) -> f64 {
    value.clamp(bounds.0, bounds.1)
}

fn male_weight_or_default(breed: &Breed) -> f64 {
    breed.male_adult_weight().unwrap_or(DEFAULT_MALE_WEIGHT)
}

fn female_weight_or_default(breed: &Breed) -> f64 {
    breed
        .female_adult_weight()
        .unwrap_or_else(|| male_weight_or_default(breed) * FEMALE_WEIGHT_RATIO)
}

/// Derives the F1 record of `sire` × `dam`.
pub fn cross(sire: &Breed, dam: &Breed) -> HybridBreed {
    let (cross_type, heterosis) = heterosis_for(sire, dam);

    let weight_male = bounded(
        blend(
            male_weight_or_default(sire),
            male_weight_or_default(dam),
            SIRE_WEIGHT_SHARE,
        ),
        MALE_WEIGHT_BOUNDS,
    );
    let weight_female = bounded(
        blend(
            female_weight_or_default(sire),
            female_weight_or_default(dam),
            SIRE_WEIGHT_SHARE,
        ),
        FEMALE_WEIGHT_BOUNDS,
    );

    let adg = |s: Option<f64>, d: Option<f64>| {
        let mean = (s.unwrap_or(DEFAULT_ADG) + d.unwrap_or(DEFAULT_ADG)) / 2.0;
        bounded(mean * (1.0 + heterosis.adg), ADG_BOUNDS)
    };
    let adg_feedlot = adg(measure(&sire.adg_feedlot), measure(&dam.adg_feedlot));
    let adg_grazing = adg(measure(&sire.adg_grazing), measure(&dam.adg_grazing));

    let fcr_mean = (measure(&sire.fcr).unwrap_or(DEFAULT_FCR)
        + measure(&dam.fcr).unwrap_or(DEFAULT_FCR))
        / 2.0;
    let fcr = bounded(fcr_mean * (1.0 - heterosis.fcr), FCR_BOUNDS);

    let slaughter_age = bounded(
        blend(
            sire.slaughter_age().unwrap_or(DEFAULT_SLAUGHTER_AGE),
            dam.slaughter_age().unwrap_or(DEFAULT_SLAUGHTER_AGE),
            0.5,
        ),
        SLAUGHTER_AGE_BOUNDS,
    );

    let heat_bonus = if cross_type == CrossType::IndicineTaurine {
        heterosis.resilience * 5.0
    } else {
        0.0
    };
    let scores = HybridScores {
        marbling: blend(
            sire.marbling_potential.ordinal(),
            dam.marbling_potential.ordinal(),
            SIRE_MARBLING_SHARE,
        ),
        heat_tolerance: (blend(
            sire.heat_tolerance.ordinal(),
            dam.heat_tolerance.ordinal(),
            SIRE_HEAT_SHARE,
        ) + heat_bonus)
            .min(9.0),
        calving_ease: blend(
            sire.calving_ease.ordinal(),
            dam.calving_ease.ordinal(),
            SIRE_CALVING_SHARE,
        ),
    };

    let subspecies = if cross_type == CrossType::SameBreed || sire.subspecies == dam.subspecies {
        sire.subspecies.clone()
    } else {
        format!("{} x {}", sire.subspecies, dam.subspecies)
    };

    let dressing_pct = match (sire.dressing_pct, dam.dressing_pct) {
        (Some(s), Some(d)) => Some((s + d) / 2.0),
        _ => None,
    };
    let widest = |a: Option<f64>, b: Option<f64>, pick: fn(f64, f64) -> f64| match (a, b) {
        (Some(a), Some(b)) => Some(pick(a, b)),
        (one, other) => one.or(other),
    };

    let breed = Breed {
        id: hybrid_id(&sire.id, &dam.id),
        name: format!("{} x {}", sire.name, dam.name),
        subspecies,
        weight_male_adult: Some(Measure::Value(weight_male)),
        weight_female_adult: Some(Measure::Value(weight_female)),
        adg_feedlot: Some(Measure::Value(adg_feedlot)),
        adg_grazing: Some(Measure::Value(adg_grazing)),
        fcr: Some(Measure::Value(fcr)),
        slaughter_age_months: Some(Measure::Value(slaughter_age)),
        heat_tolerance: TraitLevel::from_score(scores.heat_tolerance),
        marbling_potential: TraitLevel::from_score(scores.marbling),
        calving_ease: TraitLevel::from_score(scores.calving_ease),
        dressing_pct,
        dressing_min_pct: widest(sire.dressing_min_pct, dam.dressing_min_pct, f64::min),
        dressing_max_pct: widest(sire.dressing_max_pct, dam.dressing_max_pct, f64::max),
        quality_profile: dam.quality_profile.or(sire.quality_profile),
    };

    tracing::debug!(
        sire = %sire.id,
        dam = %dam.id,
        cross = ?cross_type,
        weight_male,
        adg_feedlot,
        "Derived hybrid breed"
    );

    HybridBreed {
        breed,
        lineage: Lineage {
            sire_id: sire.id.clone(),
            sire_name: sire.name.clone(),
            dam_id: dam.id.clone(),
            dam_name: dam.name.clone(),
            cross: cross_type,
            heterosis,
            scores,
        },
    }
}

pub fn hybrid_id(sire: &str, dam: &str) -> String {
    format!("{sire}{HYBRID_ID_SEPARATOR}{dam}")
}

fn require_key(key: &str, what: &str) -> Result<()> {
    if key.trim().is_empty() {
        Err(EngineError::missing_breed(what))
    } else {
        Ok(())
    }
}

/// Memo of derived hybrids keyed by (sire id, dam id). Owned by the caller.
#[derive(Debug, Default)]
pub struct HybridCache {
    hybrids: HashMap<(String, String), HybridBreed>,
}

impl HybridCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up both parents and derives the cross once per pair.
    pub fn get_or_cross(
        &mut self,
        registry: &BreedRegistry,
        sire: &str,
        dam: &str,
    ) -> Result<&HybridBreed> {
        require_key(sire, "cross without sire")?;
        require_key(dam, "cross without dam")?;
        let sire = registry.require(sire)?;
        let dam = registry.require(dam)?;
        let key = (sire.id.clone(), dam.id.clone());
        Ok(self
            .hybrids
            .entry(key)
            .or_insert_with(|| cross(sire, dam)))
    }

    pub fn len(&self) -> usize {
        self.hybrids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hybrids.is_empty()
    }
}

/// Resolves an animal's breed reference into a concrete record.
pub fn resolve_breed(
    registry: &BreedRegistry,
    breed_ref: &BreedRef,
    cache: &mut HybridCache,
) -> Result<Breed> {
    match breed_ref {
        BreedRef::Registered(key) => {
            require_key(key, "empty breed key")?;
            registry.require(key).cloned()
        }
        BreedRef::Cross { sire, dam } => Ok(cache.get_or_cross(registry, sire, dam)?.breed.clone()),
    }
}

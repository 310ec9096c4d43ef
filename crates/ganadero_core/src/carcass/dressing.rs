//! Dressing percentage (RC) and SEUROP conformation.

use super::normalize;
use crate::config::{CarcassConfig, GrowthConfig};
use crate::error::{ensure_positive, Result};
use crate::genetics::BreedLogic;
use crate::growth::GrowthParams;
use chrono::NaiveDate;
use ganadero_data::{Animal, Breed, CarcassEstimate, ProductionSystem, Seurop};
use serde::{Deserialize, Serialize};

/// Per-animal inputs to the carcass estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarcassInput {
    /// Live weight (kg).
    pub live_weight: f64,
    /// Observed ADG (kg/day).
    pub observed_adg: f64,
    /// Ration energy density (Mcal/kg DM); `None` when unknown.
    pub diet_energy: Option<f64>,
    /// Temperature-humidity index; `None` when unknown.
    pub thi: Option<f64>,
    pub on: NaiveDate,
}

/// Normalized drivers of the dressing adjustment, each in [0, 1].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct CarcassIndices {
    pub age_progress: f64,
    pub diet_energy: f64,
    pub adg_ratio: f64,
    pub heat_stress: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct CarcassResult {
    pub base_rc_pct: f64,
    /// Percentage points added to the base before clamping.
    pub delta_pct: f64,
    pub rc_pct: f64,
    pub carcass_weight: f64,
    pub conformation: Seurop,
    pub indices: CarcassIndices,
}

impl CarcassResult {
    pub fn estimate(&self) -> CarcassEstimate {
        CarcassEstimate {
            rc_pct: self.rc_pct,
            carcass_weight: self.carcass_weight,
            conformation: self.conformation,
        }
    }
}

fn base_rc(system: ProductionSystem, breed: &Breed, config: &CarcassConfig) -> f64 {
    if let Some(rc) = breed.dressing_pct.filter(|rc| rc.is_finite() && *rc > 0.0) {
        return rc;
    }
    match system {
        ProductionSystem::Extensivo => config.base_rc_extensive,
        ProductionSystem::Mixto => config.base_rc_mixed,
        ProductionSystem::Intensivo => config.base_rc_intensive,
    }
}

fn rc_bounds(breed: &Breed, config: &CarcassConfig) -> (f64, f64) {
    let lo = breed.dressing_min_pct.unwrap_or(config.rc_min_pct);
    let hi = breed.dressing_max_pct.unwrap_or(config.rc_max_pct);
    if lo <= hi {
        (lo, hi)
    } else {
        (hi, lo)
    }
}

/// Dressing percentage, carcass weight and SEUROP class for a live animal.
pub fn estimate_carcass_result(
    animal: &Animal,
    breed: &Breed,
    input: &CarcassInput,
    config: &CarcassConfig,
    growth: &GrowthConfig,
) -> Result<CarcassResult> {
    let live_weight = ensure_positive("live weight", input.live_weight)?;

    let slaughter_age = breed
        .slaughter_age()
        .unwrap_or(config.default_slaughter_age_months);
    let predicted_adg = GrowthParams::resolve(animal, Some(breed), growth).base_adg;
    let adg_ratio = if predicted_adg > 0.0 && input.observed_adg.is_finite() {
        input.observed_adg / predicted_adg
    } else {
        0.0
    };

    let indices = CarcassIndices {
        age_progress: normalize(animal.age_months(input.on), 0.0, slaughter_age),
        diet_energy: input
            .diet_energy
            .map_or(0.0, |e| normalize(e, config.diet_energy_min, config.diet_energy_max)),
        adg_ratio: normalize(adg_ratio, config.adg_ratio_min, config.adg_ratio_max),
        heat_stress: input
            .thi
            .map_or(0.0, |thi| normalize(thi, config.thi_threshold, config.thi_max)),
    };

    let w = &config.weights;
    let delta_pct = w.age_progress * indices.age_progress
        + w.diet_energy * indices.diet_energy
        + w.adg_ratio * indices.adg_ratio
        + w.heat_stress * indices.heat_stress;

    let base_rc_pct = base_rc(animal.system, breed, config);
    let (lo, hi) = rc_bounds(breed, config);
    let rc_pct = (base_rc_pct + delta_pct).clamp(lo, hi);

    Ok(CarcassResult {
        base_rc_pct,
        delta_pct,
        rc_pct,
        carcass_weight: live_weight * rc_pct / 100.0,
        conformation: Seurop::from_dressing_pct(rc_pct),
        indices,
    })
}

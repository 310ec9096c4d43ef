//! Carcass yield and meat-quality estimation.

pub mod dressing;
pub mod quality;

pub use dressing::{estimate_carcass_result, CarcassIndices, CarcassInput, CarcassResult};
pub use quality::{calculate_quality_index, QualityInput, QualityProfile, QualityResult};

use crate::config::{CarcassConfig, GrowthConfig, QualityConfig};
use crate::error::Result;
use ganadero_data::{Animal, Breed};

/// Maps `value` from `[min, max]` onto `[0, 1]`, clamped. A degenerate or
/// non-finite input gives 0.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if !value.is_finite() || !span.is_finite() || span == 0.0 {
        return 0.0;
    }
    ((value - min) / span).clamp(0.0, 1.0)
}

pub struct CarcassQualityEngine {
    carcass: CarcassConfig,
    quality: QualityConfig,
    growth: GrowthConfig,
}

impl CarcassQualityEngine {
    pub fn new(carcass: CarcassConfig, quality: QualityConfig, growth: GrowthConfig) -> Self {
        Self {
            carcass,
            quality,
            growth,
        }
    }

    pub fn estimate_carcass(
        &self,
        animal: &Animal,
        breed: &Breed,
        input: &CarcassInput,
    ) -> Result<CarcassResult> {
        estimate_carcass_result(animal, breed, input, &self.carcass, &self.growth)
    }

    /// Quality index with the breed's profile and marbling potential.
    pub fn estimate_quality(&self, breed: &Breed, input: &QualityInput) -> QualityResult {
        let profile = QualityProfile::for_breed(breed);
        calculate_quality_index(input, &profile, breed.marbling_potential, &self.quality)
    }
}

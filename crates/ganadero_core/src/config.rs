//! Configuration management for model parameters.
//!
//! Every constant the engines rely on lives here with its reference value as
//! the `Default`. A TOML file may override any subset of them.
//!
//! ## Example `ganadero.toml`
//!
//! ```toml
//! [growth]
//! default_adg = 0.8
//! genetic_variance = 0.05
//!
//! [nutrition]
//! acidosis_concentrate_fraction = 0.6
//!
//! [carcass.weights]
//! heat_stress = -2.5
//! ```

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Climate penalties applied to the growth rate.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClimatePenalties {
    pub hot_threshold_c: f64,
    pub hot_penalty: f64,
    pub warm_threshold_c: f64,
    pub warm_penalty: f64,
    pub cold_threshold_c: f64,
    pub cold_penalty: f64,
    pub rain_threshold_mm: f64,
    pub rain_penalty: f64,
    pub floor: f64,
}

impl Default for ClimatePenalties {
    fn default() -> Self {
        Self {
            hot_threshold_c: 30.0,
            hot_penalty: 0.15,
            warm_threshold_c: 25.0,
            warm_penalty: 0.05,
            cold_threshold_c: 5.0,
            cold_penalty: 0.05,
            rain_threshold_mm: 10.0,
            rain_penalty: 0.10,
            floor: 0.5,
        }
    }
}

/// Growth simulation parameters.
///
/// The default target weight and ADG are the fallbacks for breeds without
/// usable numbers; unmatched breeds still grow with them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GrowthConfig {
    pub default_target_weight: f64,
    pub default_adg: f64,
    pub female_adg_factor: f64,
    pub female_weight_factor: f64,
    pub tick_days: i64,
    /// Growth stops once weight reaches this multiple of the target.
    pub maturity_cutoff: f64,
    pub climate_window_days: i64,
    pub dedup_window_days: i64,
    /// Half-width of the seeded individual ADG multiplier (0 disables it).
    pub genetic_variance: f64,
    pub climate: ClimatePenalties,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            default_target_weight: 900.0,
            default_adg: 0.8,
            female_adg_factor: 0.85,
            female_weight_factor: 0.85,
            tick_days: 30,
            maturity_cutoff: 1.05,
            climate_window_days: 15,
            dedup_window_days: 10,
            genetic_variance: 0.0,
            climate: ClimatePenalties::default(),
        }
    }
}

/// Intake, performance and ration-check parameters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct NutritionConfig {
    /// Dry-matter intake as % of body weight.
    pub intake_pct_intensive: f64,
    pub intake_pct_extensive: f64,
    pub intake_pct_default: f64,
    pub heavy_weight_kg: f64,
    pub heavy_intake_factor: f64,
    pub genetic_ceiling_factor: f64,
    pub acidosis_concentrate_fraction: f64,
    pub acidosis_concentrate_fraction_indicine: f64,
    pub min_ndf_pct: f64,
    pub bloat_legume_fraction: f64,
    pub acorn_min_ndf_pct: f64,
    pub acorn_supplement_min_cp_pct: f64,
    pub acorn_max_fraction: f64,
    /// Calendar months (1–12) of the montanera season.
    pub acorn_season_months: Vec<u32>,
}

impl Default for NutritionConfig {
    fn default() -> Self {
        Self {
            intake_pct_intensive: 2.8,
            intake_pct_extensive: 2.2,
            intake_pct_default: 2.5,
            heavy_weight_kg: 500.0,
            heavy_intake_factor: 0.95,
            genetic_ceiling_factor: 1.2,
            acidosis_concentrate_fraction: 0.60,
            acidosis_concentrate_fraction_indicine: 0.50,
            min_ndf_pct: 20.0,
            bloat_legume_fraction: 0.50,
            acorn_min_ndf_pct: 28.0,
            acorn_supplement_min_cp_pct: 30.0,
            acorn_max_fraction: 0.40,
            acorn_season_months: vec![10, 11, 12, 1],
        }
    }
}

/// Weights (percentage points of dressing) for the carcass-yield indices.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CarcassWeights {
    pub age_progress: f64,
    pub diet_energy: f64,
    pub adg_ratio: f64,
    /// Negative: heat stress lowers yield.
    pub heat_stress: f64,
}

impl Default for CarcassWeights {
    fn default() -> Self {
        Self {
            age_progress: 2.0,
            diet_energy: 2.0,
            adg_ratio: 1.5,
            heat_stress: -2.5,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CarcassConfig {
    pub base_rc_extensive: f64,
    pub base_rc_mixed: f64,
    pub base_rc_intensive: f64,
    pub rc_min_pct: f64,
    pub rc_max_pct: f64,
    pub default_slaughter_age_months: f64,
    pub thi_threshold: f64,
    pub thi_max: f64,
    pub diet_energy_min: f64,
    pub diet_energy_max: f64,
    pub adg_ratio_min: f64,
    pub adg_ratio_max: f64,
    pub weights: CarcassWeights,
}

impl Default for CarcassConfig {
    fn default() -> Self {
        Self {
            base_rc_extensive: 54.0,
            base_rc_mixed: 56.0,
            base_rc_intensive: 58.0,
            rc_min_pct: 48.0,
            rc_max_pct: 66.0,
            default_slaughter_age_months: 24.0,
            thi_threshold: 72.0,
            thi_max: 90.0,
            diet_energy_min: 1.0,
            diet_energy_max: 2.2,
            adg_ratio_min: 0.5,
            adg_ratio_max: 1.5,
            weights: CarcassWeights::default(),
        }
    }
}

/// Meat-quality (marbling) model parameters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct QualityConfig {
    /// Logistic steepness.
    pub logistic_k: f64,
    pub finishing_days_max: f64,
    pub energy_intake_min: f64,
    pub energy_intake_max: f64,
    pub adg_max: f64,
    pub synergy_bonus_castrated: f64,
    pub synergy_bonus_other: f64,
    pub overflow_threshold: f64,
    pub overflow_max: f64,
    pub bms_factor: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            logistic_k: 2.0,
            finishing_days_max: 300.0,
            energy_intake_min: 8.0,
            energy_intake_max: 30.0,
            adg_max: 2.0,
            synergy_bonus_castrated: 0.5,
            synergy_bonus_other: 0.3,
            overflow_threshold: 95.0,
            overflow_max: 0.6,
            bms_factor: 2.75,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub growth: GrowthConfig,
    pub nutrition: NutritionConfig,
    pub carcass: CarcassConfig,
    pub quality: QualityConfig,
}

impl EngineConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        // Growth validation
        let g = &self.growth;
        anyhow::ensure!(
            g.default_target_weight > 0.0,
            "Default target weight must be positive"
        );
        anyhow::ensure!(g.default_adg > 0.0, "Default ADG must be positive");
        anyhow::ensure!(
            g.female_adg_factor > 0.0 && g.female_adg_factor <= 1.5,
            "Female ADG factor must be in (0.0, 1.5]"
        );
        anyhow::ensure!(
            g.female_weight_factor > 0.0 && g.female_weight_factor <= 1.5,
            "Female weight factor must be in (0.0, 1.5]"
        );
        anyhow::ensure!(g.tick_days > 0, "Tick length must be positive");
        anyhow::ensure!(
            g.maturity_cutoff >= 1.0,
            "Maturity cutoff must be at least 1.0"
        );
        anyhow::ensure!(
            g.climate_window_days >= 0 && g.dedup_window_days >= 0,
            "Window sizes must be non-negative"
        );
        anyhow::ensure!(
            (0.0..=0.5).contains(&g.genetic_variance),
            "Genetic variance must be in [0.0, 0.5]"
        );
        anyhow::ensure!(
            g.climate.floor > 0.0 && g.climate.floor <= 1.0,
            "Climate factor floor must be in (0.0, 1.0]"
        );

        // Nutrition validation
        let n = &self.nutrition;
        anyhow::ensure!(
            n.intake_pct_intensive > 0.0 && n.intake_pct_extensive > 0.0 && n.intake_pct_default > 0.0,
            "Intake percentages must be positive"
        );
        anyhow::ensure!(
            n.genetic_ceiling_factor >= 1.0,
            "Genetic ceiling factor must be at least 1.0"
        );
        for (name, fraction) in [
            ("Acidosis fraction", n.acidosis_concentrate_fraction),
            ("Indicine acidosis fraction", n.acidosis_concentrate_fraction_indicine),
            ("Bloat legume fraction", n.bloat_legume_fraction),
            ("Acorn max fraction", n.acorn_max_fraction),
        ] {
            anyhow::ensure!(
                (0.0..=1.0).contains(&fraction),
                "{name} must be in [0.0, 1.0]"
            );
        }
        anyhow::ensure!(
            n.acorn_season_months.iter().all(|m| (1..=12).contains(m)),
            "Acorn season months must be calendar months (1-12)"
        );

        // Carcass validation
        let c = &self.carcass;
        anyhow::ensure!(
            c.rc_min_pct > 0.0 && c.rc_min_pct < c.rc_max_pct && c.rc_max_pct < 100.0,
            "Dressing bounds must satisfy 0 < min < max < 100"
        );
        anyhow::ensure!(
            c.weights.heat_stress <= 0.0,
            "Heat-stress weight must be non-positive"
        );
        anyhow::ensure!(
            c.default_slaughter_age_months > 0.0,
            "Default slaughter age must be positive"
        );

        // Quality validation
        let q = &self.quality;
        anyhow::ensure!(q.logistic_k > 0.0, "Logistic steepness must be positive");
        anyhow::ensure!(
            (0.0..100.0).contains(&q.overflow_threshold),
            "Overflow threshold must be in [0, 100)"
        );
        anyhow::ensure!(
            q.overflow_max >= 0.0 && q.overflow_max <= 1.0,
            "Overflow bonus must be in [0.0, 1.0]"
        );
        anyhow::ensure!(q.bms_factor > 0.0, "BMS factor must be positive");

        Ok(())
    }

    /// Parses and validates a TOML document. Missing keys keep their defaults.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config =
            toml::from_str::<Self>(content).map_err(|e| EngineError::config(e.to_string()))?;
        config
            .validate()
            .map_err(|e| EngineError::config(e.to_string()))?;
        Ok(config)
    }

    /// Stable hash of all model parameters, for tagging reports.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.growth).as_bytes());
        hasher.update(format!("{:?}", self.nutrition).as_bytes());
        hasher.update(format!("{:?}", self.carcass).as_bytes());
        hasher.update(format!("{:?}", self.quality).as_bytes());
        hex::encode(hasher.finalize())
    }
}

//! Net-energy requirements and energy/protein-limited performance.

use crate::config::NutritionConfig;
use crate::error::{ensure_positive, EngineError, Result};
use ganadero_data::ProductionSystem;
use serde::{Deserialize, Serialize};

const NEM_COEFF: f64 = 0.077;
const NEG_COEFF: f64 = 0.0635;
const METABOLIC_EXP: f64 = 0.75;
const GAIN_EXP: f64 = 1.097;

/// Below this crude protein (% DM) gain is capped outright.
const CP_SEVERE_PCT: f64 = 6.0;
const CP_SEVERE_MAX_ADG: f64 = 0.1;
/// Below this crude protein (% DM) energy-allowable gain is scaled down.
const CP_LOW_PCT: f64 = 10.0;
const CP_LOW_FACTOR: f64 = 0.7;
const DEFICIT_FACTOR: f64 = 0.5;

fn metabolic_weight(bw: f64) -> f64 {
    bw.powf(METABOLIC_EXP)
}

/// Maintenance net energy (Mcal/day).
pub fn maintenance_energy(bw: f64) -> f64 {
    NEM_COEFF * metabolic_weight(bw)
}

/// Net energy for gain (Mcal/day). Zero for non-positive gains.
pub fn gain_energy(bw: f64, adg: f64) -> f64 {
    if adg <= 0.0 {
        return 0.0;
    }
    NEG_COEFF * metabolic_weight(bw) * adg.powf(GAIN_EXP)
}

/// Daily dry-matter intake capacity (kg).
pub fn intake_capacity(bw: f64, system: ProductionSystem, config: &NutritionConfig) -> f64 {
    let pct = match system {
        ProductionSystem::Intensivo => config.intake_pct_intensive,
        ProductionSystem::Extensivo => config.intake_pct_extensive,
        ProductionSystem::Mixto => config.intake_pct_default,
    };
    let mut dmi = bw * pct / 100.0;
    if bw > config.heavy_weight_kg {
        dmi *= config.heavy_intake_factor;
    }
    dmi
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Requirements {
    pub maintenance_mcal: f64,
    pub gain_mcal: f64,
    pub total_mcal: f64,
    pub intake_capacity_kg: f64,
}

pub fn requirements(
    bw: f64,
    adg: f64,
    system: ProductionSystem,
    config: &NutritionConfig,
) -> Result<Requirements> {
    let bw = ensure_positive("body weight", bw)?;
    let maintenance_mcal = maintenance_energy(bw);
    let gain_mcal = gain_energy(bw, adg);
    Ok(Requirements {
        maintenance_mcal,
        gain_mcal,
        total_mcal: maintenance_mcal + gain_mcal,
        intake_capacity_kg: intake_capacity(bw, system, config),
    })
}

/// Which constraint set the predicted gain.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitingFactor {
    Energy,
    Protein,
    GeneticCeiling,
    /// Intake below maintenance: the animal loses weight.
    EnergyDeficit,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Performance {
    /// Predicted ADG (kg/day); negative under an energy deficit.
    pub adg: f64,
    pub energy_adg: f64,
    /// `None` when protein does not limit.
    pub protein_adg: Option<f64>,
    pub ceiling_adg: f64,
    pub binding: LimitingFactor,
}

/// Inverts the gain equation to predict ADG from intake energy.
///
/// The result is the minimum of the energy-allowable gain, the
/// protein-allowable gain and the genetic ceiling; ties go to energy.
pub fn calculate_performance(
    bw: f64,
    intake_energy: f64,
    cp_pct: f64,
    genetic_adg: f64,
    ceiling_factor: f64,
) -> Result<Performance> {
    let bw = ensure_positive("body weight", bw)?;
    if !intake_energy.is_finite() || intake_energy < 0.0 {
        return Err(EngineError::invalid_input(format!(
            "intake energy must be a non-negative number, got {intake_energy}"
        )));
    }

    let nem = maintenance_energy(bw);
    let surplus = intake_energy - nem;
    let ceiling_adg = genetic_adg.max(0.0) * ceiling_factor;

    if surplus < 0.0 {
        let adg = surplus / nem * DEFICIT_FACTOR;
        return Ok(Performance {
            adg,
            energy_adg: adg,
            protein_adg: None,
            ceiling_adg,
            binding: LimitingFactor::EnergyDeficit,
        });
    }

    let energy_adg = if surplus > 0.0 {
        (surplus / (NEG_COEFF * metabolic_weight(bw))).powf(1.0 / GAIN_EXP)
    } else {
        0.0
    };

    let protein_adg = if cp_pct < CP_SEVERE_PCT {
        Some(CP_SEVERE_MAX_ADG)
    } else if cp_pct < CP_LOW_PCT {
        Some(energy_adg * CP_LOW_FACTOR)
    } else {
        None
    };

    let mut adg = energy_adg;
    let mut binding = LimitingFactor::Energy;
    if let Some(protein) = protein_adg {
        if protein < adg {
            adg = protein;
            binding = LimitingFactor::Protein;
        }
    }
    if ceiling_adg < adg {
        adg = ceiling_adg;
        binding = LimitingFactor::GeneticCeiling;
    }

    Ok(Performance {
        adg,
        energy_adg,
        protein_adg,
        ceiling_adg,
        binding,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirement_equations() {
        let bw: f64 = 400.0;
        assert!((maintenance_energy(bw) - 0.077 * bw.powf(0.75)).abs() < 1e-12);
        assert!((gain_energy(bw, 1.2) - 0.0635 * bw.powf(0.75) * 1.2f64.powf(1.097)).abs() < 1e-12);
        assert_eq!(gain_energy(bw, 0.0), 0.0);
        assert_eq!(gain_energy(bw, -0.5), 0.0);
    }

    #[test]
    fn test_intake_capacity() {
        let config = NutritionConfig::default();
        assert!((intake_capacity(400.0, ProductionSystem::Intensivo, &config) - 11.2).abs() < 1e-9);
        assert!((intake_capacity(400.0, ProductionSystem::Extensivo, &config) - 8.8).abs() < 1e-9);
        assert!((intake_capacity(600.0, ProductionSystem::Mixto, &config) - 15.0 * 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_maintenance_intake_gives_zero_gain() {
        let bw = 350.0;
        let perf = calculate_performance(bw, maintenance_energy(bw), 14.0, 1.2, 1.2).unwrap();
        assert_eq!(perf.adg, 0.0);
        assert_eq!(perf.binding, LimitingFactor::Energy);
    }

    #[test]
    fn test_inversion_matches_gain_energy() {
        let bw = 350.0;
        let intake = maintenance_energy(bw) + gain_energy(bw, 1.0);
        let perf = calculate_performance(bw, intake, 14.0, 2.0, 1.2).unwrap();
        assert!((perf.adg - 1.0).abs() < 1e-9);
        assert_eq!(perf.binding, LimitingFactor::Energy);
    }

    #[test]
    fn test_energy_deficit_is_negative() {
        let bw = 500.0;
        let nem = maintenance_energy(bw);
        let perf = calculate_performance(bw, nem * 0.8, 12.0, 1.0, 1.2).unwrap();
        assert!((perf.adg - (-0.2 * 0.5)).abs() < 1e-12);
        assert_eq!(perf.binding, LimitingFactor::EnergyDeficit);
    }

    #[test]
    fn test_protein_and_ceiling_limits() {
        let bw = 300.0;
        let intake = maintenance_energy(bw) + gain_energy(bw, 1.0);

        let severe = calculate_performance(bw, intake, 5.0, 2.0, 1.2).unwrap();
        assert_eq!(severe.adg, 0.1);
        assert_eq!(severe.binding, LimitingFactor::Protein);

        let low = calculate_performance(bw, intake, 8.0, 2.0, 1.2).unwrap();
        assert!((low.adg - 0.7).abs() < 1e-9);
        assert_eq!(low.binding, LimitingFactor::Protein);

        let capped = calculate_performance(bw, intake, 14.0, 0.5, 1.2).unwrap();
        assert!((capped.adg - 0.6).abs() < 1e-12);
        assert_eq!(capped.binding, LimitingFactor::GeneticCeiling);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(calculate_performance(0.0, 5.0, 12.0, 1.0, 1.2).is_err());
        assert!(calculate_performance(300.0, f64::NAN, 12.0, 1.0, 1.2).is_err());
        assert!(requirements(-1.0, 1.0, ProductionSystem::Mixto, &NutritionConfig::default()).is_err());
    }
}

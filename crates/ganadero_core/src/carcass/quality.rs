//! Meat-quality index: logistic efficiency mapped to marbling and BMS.

use super::normalize;
use crate::config::QualityConfig;
use crate::genetics::BreedLogic;
use ganadero_data::{Breed, QualityEstimate, QualityProfileKind, Sex, TraitLevel};
use serde::{Deserialize, Serialize};

const THI_COMFORT: f64 = 72.0;
const THI_SEVERE: f64 = 90.0;
const MARBLING_MAX: f64 = 5.0;
const BMS_MAX: f64 = 12.0;

/// Term weights of the quality score.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct QualityProfile {
    pub kind: QualityProfileKind,
    pub days: f64,
    pub energy: f64,
    pub adg: f64,
    pub heat: f64,
    pub instability: f64,
    pub health: f64,
    pub bias: f64,
}

impl QualityProfile {
    pub fn for_kind(kind: QualityProfileKind) -> Self {
        let (days, energy, adg, heat, instability, health, bias) = match kind {
            QualityProfileKind::Standard => (1.5, 1.0, 1.0, 1.0, 0.8, 0.8, 1.5),
            QualityProfileKind::Wagyu => (3.0, 1.0, 0.3, 1.0, 1.0, 0.8, 2.2),
            QualityProfileKind::RusticIndicine => (0.8, 1.0, 1.2, 0.3, 0.6, 0.6, 1.2),
        };
        Self {
            kind,
            days,
            energy,
            adg,
            heat,
            instability,
            health,
            bias,
        }
    }

    /// Explicit breed profile, else rustic for indicine breeds, else standard.
    pub fn for_breed(breed: &Breed) -> Self {
        let kind = breed.quality_profile.unwrap_or(if breed.is_indicine() {
            QualityProfileKind::RusticIndicine
        } else {
            QualityProfileKind::Standard
        });
        Self::for_kind(kind)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct QualityInput {
    pub days_on_finishing: f64,
    /// Net energy intake (Mcal/day).
    pub energy_intake_mcal: f64,
    pub adg: f64,
    pub thi: f64,
    /// Ration changes and feeding irregularity, in [0, 1].
    pub diet_instability: f64,
    /// Health incidents, in [0, 1].
    pub health_issues: f64,
    pub sex: Sex,
    pub acorn_feeding: bool,
    pub soy_lecithin: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct QualityResult {
    pub z: f64,
    /// Logistic efficiency (0–100).
    pub efficiency: f64,
    /// Marbling on the 1–5 scale.
    pub marbling: f64,
    pub bms: f64,
    pub synergy_bonus: f64,
    pub overflow_bonus: f64,
}

impl QualityResult {
    pub fn estimate(&self) -> QualityEstimate {
        QualityEstimate {
            efficiency: self.efficiency,
            marbling: self.marbling,
            bms: self.bms,
        }
    }
}

pub fn calculate_quality_index(
    input: &QualityInput,
    profile: &QualityProfile,
    marbling_potential: TraitLevel,
    config: &QualityConfig,
) -> QualityResult {
    let days = normalize(input.days_on_finishing, 0.0, config.finishing_days_max);
    let energy = normalize(
        input.energy_intake_mcal,
        config.energy_intake_min,
        config.energy_intake_max,
    );
    let adg = normalize(input.adg, 0.0, config.adg_max);
    let heat = normalize(input.thi, THI_COMFORT, THI_SEVERE);
    let instability = normalize(input.diet_instability, 0.0, 1.0);
    let health = normalize(input.health_issues, 0.0, 1.0);

    let z = profile.days * days + profile.energy * energy + profile.adg * adg
        - profile.heat * heat
        - profile.instability * instability
        - profile.health * health
        - profile.bias;
    let efficiency = 100.0 / (1.0 + (-config.logistic_k * z).exp());

    let cap = marbling_potential.marbling_scale();
    let mut marbling = 1.0 + efficiency / 100.0 * (cap - 1.0);

    let mut synergy_bonus = 0.0;
    if input.acorn_feeding && input.soy_lecithin {
        let bonus = if input.sex == Sex::Castrated {
            config.synergy_bonus_castrated
        } else {
            config.synergy_bonus_other
        };
        let boosted = (marbling + bonus).min(cap).max(marbling);
        synergy_bonus = boosted - marbling;
        marbling = boosted;
    }

    let overflow_bonus = if efficiency > config.overflow_threshold {
        let span = 100.0 - config.overflow_threshold;
        ((efficiency - config.overflow_threshold) / span * config.overflow_max).min(config.overflow_max)
    } else {
        0.0
    };
    marbling += overflow_bonus;

    let ceiling = (cap + config.overflow_max).min(MARBLING_MAX);
    let marbling = marbling.clamp(1.0, ceiling);
    let bms = (marbling * config.bms_factor).clamp(1.0, BMS_MAX);

    QualityResult {
        z,
        efficiency,
        marbling,
        bms,
        synergy_bonus,
        overflow_bonus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> QualityInput {
        QualityInput {
            days_on_finishing: 150.0,
            energy_intake_mcal: 19.0,
            adg: 1.0,
            thi: 72.0,
            diet_instability: 0.0,
            health_issues: 0.0,
            sex: Sex::Male,
            acorn_feeding: false,
            soy_lecithin: false,
        }
    }

    #[test]
    fn test_standard_profile_z() {
        let profile = QualityProfile::for_kind(QualityProfileKind::Standard);
        let result =
            calculate_quality_index(&input(), &profile, TraitLevel::Medium, &QualityConfig::default());
        // 1.5×0.5 + 1.0×0.5 + 1.0×0.5 − 1.5 = 0.25
        assert!((result.z - 0.25).abs() < 1e-12);
        let eff = 100.0 / (1.0 + (-0.5f64).exp());
        assert!((result.efficiency - eff).abs() < 1e-9);
        assert!((result.marbling - (1.0 + eff / 100.0 * 2.0)).abs() < 1e-9);
        assert!((result.bms - result.marbling * 2.75).abs() < 1e-9);
    }

    #[test]
    fn test_synergy_bounded_by_cap() {
        let profile = QualityProfile::for_kind(QualityProfileKind::Standard);
        let mut steer = input();
        steer.sex = Sex::Castrated;
        steer.acorn_feeding = true;
        steer.soy_lecithin = true;
        let base =
            calculate_quality_index(&input(), &profile, TraitLevel::High, &QualityConfig::default());
        let boosted =
            calculate_quality_index(&steer, &profile, TraitLevel::High, &QualityConfig::default());
        assert!((boosted.synergy_bonus - 0.5).abs() < 1e-12);
        assert!((boosted.marbling - base.marbling - 0.5).abs() < 1e-9);

        steer.sex = Sex::Female;
        let heifer =
            calculate_quality_index(&steer, &profile, TraitLevel::High, &QualityConfig::default());
        assert!((heifer.synergy_bonus - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_overflow_only_above_threshold() {
        let profile = QualityProfile::for_kind(QualityProfileKind::Wagyu);
        let mut ideal = input();
        ideal.days_on_finishing = 600.0;
        ideal.energy_intake_mcal = 40.0;
        ideal.adg = 3.0;
        let result =
            calculate_quality_index(&ideal, &profile, TraitLevel::VeryHigh, &QualityConfig::default());
        assert!(result.efficiency > 95.0);
        assert!(result.overflow_bonus > 0.0 && result.overflow_bonus <= 0.6);
        assert!(result.marbling <= 5.0);
        assert!(result.bms <= 12.0);

        let poor = calculate_quality_index(&input(), &profile, TraitLevel::VeryHigh, &QualityConfig::default());
        assert_eq!(poor.overflow_bonus, 0.0);
    }

    #[test]
    fn test_heat_penalty() {
        let profile = QualityProfile::for_kind(QualityProfileKind::Standard);
        let mut hot = input();
        hot.thi = 90.0;
        let cool = calculate_quality_index(&input(), &profile, TraitLevel::Medium, &QualityConfig::default());
        let hot = calculate_quality_index(&hot, &profile, TraitLevel::Medium, &QualityConfig::default());
        assert!((cool.z - hot.z - 1.0).abs() < 1e-12);
        assert!(hot.marbling < cool.marbling);
    }

    #[test]
    fn test_profile_selection() {
        let mut breed = Breed {
            id: "brahman".into(),
            name: "Brahman".into(),
            subspecies: "Bos indicus".into(),
            ..Default::default()
        };
        assert_eq!(QualityProfile::for_breed(&breed).kind, QualityProfileKind::RusticIndicine);
        breed.quality_profile = Some(QualityProfileKind::Wagyu);
        assert_eq!(QualityProfile::for_breed(&breed).kind, QualityProfileKind::Wagyu);
        breed.quality_profile = None;
        breed.subspecies = "Bos taurus".into();
        assert_eq!(QualityProfile::for_breed(&breed).kind, QualityProfileKind::Standard);
    }

    #[test]
    fn test_very_low_potential_stays_at_one() {
        let profile = QualityProfile::for_kind(QualityProfileKind::Standard);
        let result =
            calculate_quality_index(&input(), &profile, TraitLevel::VeryLow, &QualityConfig::default());
        assert_eq!(result.marbling, 1.0);
    }
}

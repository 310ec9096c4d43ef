//! Lifecycle stage resolution and per-stage nutritional targets.

use super::diet::DietAnalysis;
use chrono::NaiveDate;
use ganadero_data::{Animal, LifeStage, ReproductiveState, Sex};
use serde::{Deserialize, Serialize};

const SUCKLING_MONTHS: f64 = 3.0;
const WEANING_MONTHS: f64 = 7.0;
const HEIFER_MONTHS: f64 = 15.0;
const BULL_MONTHS: f64 = 24.0;
const STEER_FINISHING_MONTHS: f64 = 30.0;

const EARLY_LACTATION_DAYS: u32 = 90;
const LACTATION_DAYS: u32 = 305;
const EARLY_GESTATION_MONTHS: f64 = 3.0;
const DRY_OFF_GESTATION_MONTHS: f64 = 7.0;

/// Stage for an animal on `on`, from age, sex and reproductive state.
pub fn resolve_stage(animal: &Animal, on: NaiveDate) -> LifeStage {
    let months = animal.age_months(on);
    if months < SUCKLING_MONTHS {
        return LifeStage::Suckling;
    }
    match animal.sex {
        Sex::Female => {
            if months < WEANING_MONTHS {
                LifeStage::PreWeaning
            } else if is_bred(&animal.reproduction) {
                adult_female_stage(&animal.reproduction)
            } else if months < HEIFER_MONTHS {
                LifeStage::Rearing
            } else {
                adult_female_stage(&animal.reproduction)
            }
        }
        Sex::Male => {
            if months < WEANING_MONTHS {
                LifeStage::Transition
            } else if months < BULL_MONTHS {
                LifeStage::Fattening
            } else {
                LifeStage::Bull
            }
        }
        Sex::Castrated => {
            if months < WEANING_MONTHS {
                LifeStage::Transition
            } else if months < STEER_FINISHING_MONTHS {
                LifeStage::SteerRearing
            } else {
                LifeStage::SteerFinishing
            }
        }
    }
}

fn is_bred(state: &ReproductiveState) -> bool {
    state.pregnant || state.days_post_partum.is_some()
}

fn adult_female_stage(state: &ReproductiveState) -> LifeStage {
    let gestation = if state.pregnant {
        state.gestation_months.unwrap_or(0.0)
    } else {
        0.0
    };
    let dpp = state.days_post_partum;

    if state.pregnant
        && dpp.is_some_and(|d| d < EARLY_LACTATION_DAYS)
        && gestation < EARLY_GESTATION_MONTHS
    {
        LifeStage::LactatingEarlyGestation
    } else if state.pregnant && gestation >= DRY_OFF_GESTATION_MONTHS {
        LifeStage::DryGestation
    } else if dpp.is_some_and(|d| d < LACTATION_DAYS) {
        LifeStage::Lactating
    } else if state.pregnant {
        LifeStage::Gestation
    } else {
        LifeStage::Open
    }
}

/// Recomputes the stored stage. Returns whether it changed.
pub fn refresh_stage(animal: &mut Animal, on: NaiveDate) -> bool {
    let stage = resolve_stage(animal, on);
    if animal.stage == Some(stage) {
        return false;
    }
    tracing::debug!(animal = %animal.id, from = ?animal.stage, to = %stage, "Lifecycle stage changed");
    animal.stage = Some(stage);
    true
}

/// Advisory ration targets for a stage.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct StageTargets {
    /// Crude protein (% DM).
    pub protein_pct: f64,
    /// Net energy density (Mcal/kg DM).
    pub energy_mcal_kg: f64,
    /// Minimum NDF (% DM).
    pub ndf_pct: f64,
    pub adg_min: f64,
    pub adg_max: f64,
}

const fn targets(protein_pct: f64, energy_mcal_kg: f64, ndf_pct: f64, adg_min: f64, adg_max: f64) -> StageTargets {
    StageTargets {
        protein_pct,
        energy_mcal_kg,
        ndf_pct,
        adg_min,
        adg_max,
    }
}

pub fn stage_targets(stage: LifeStage) -> StageTargets {
    match stage {
        LifeStage::Suckling => targets(18.0, 2.0, 20.0, 0.6, 1.0),
        LifeStage::PreWeaning => targets(16.0, 1.7, 25.0, 0.7, 1.0),
        LifeStage::Rearing => targets(13.0, 1.4, 35.0, 0.5, 0.8),
        LifeStage::Open => targets(9.0, 1.1, 45.0, 0.0, 0.2),
        LifeStage::Lactating => targets(13.0, 1.5, 35.0, 0.0, 0.3),
        LifeStage::LactatingEarlyGestation => targets(14.0, 1.6, 33.0, 0.0, 0.3),
        LifeStage::Gestation => targets(10.0, 1.2, 42.0, 0.2, 0.4),
        LifeStage::DryGestation => targets(11.0, 1.3, 40.0, 0.3, 0.5),
        LifeStage::Transition => targets(15.0, 1.6, 28.0, 0.8, 1.1),
        LifeStage::Fattening => targets(13.0, 1.8, 22.0, 1.1, 1.6),
        LifeStage::Bull => targets(10.0, 1.2, 40.0, 0.0, 0.3),
        LifeStage::SteerRearing => targets(12.0, 1.3, 38.0, 0.6, 0.9),
        LifeStage::SteerFinishing => targets(12.0, 1.7, 25.0, 0.9, 1.3),
    }
}

/// How a ration compares with its stage targets. Deltas are ration minus target.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct TargetComparison {
    pub stage: LifeStage,
    pub protein_delta_pct: f64,
    pub energy_delta_mcal_kg: f64,
    pub ndf_delta_pct: f64,
    /// Whether the predicted ADG falls inside the stage band, when known.
    pub adg_in_band: Option<bool>,
}

impl TargetComparison {
    pub fn meets_targets(&self) -> bool {
        self.protein_delta_pct >= 0.0
            && self.energy_delta_mcal_kg >= 0.0
            && self.ndf_delta_pct >= 0.0
            && self.adg_in_band.unwrap_or(true)
    }
}

pub fn compare_to_targets(
    analysis: &DietAnalysis,
    stage: LifeStage,
    predicted_adg: Option<f64>,
) -> TargetComparison {
    let t = stage_targets(stage);
    TargetComparison {
        stage,
        protein_delta_pct: analysis.crude_protein_pct - t.protein_pct,
        energy_delta_mcal_kg: analysis.energy_density() - t.energy_mcal_kg,
        ndf_delta_pct: analysis.ndf_pct - t.ndf_pct,
        adg_in_band: predicted_adg.map(|adg| adg >= t.adg_min && adg <= t.adg_max),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use ganadero_data::BreedRef;

    fn born() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 1, 1).unwrap()
    }

    fn animal(sex: Sex) -> Animal {
        Animal::new("a", sex, born(), BreedRef::registered("retinta"), 38.0)
    }

    fn at_months(months: f64) -> NaiveDate {
        born() + Duration::days((months * 30.4375).round() as i64)
    }

    #[test]
    fn test_male_path() {
        let bull = animal(Sex::Male);
        assert_eq!(resolve_stage(&bull, at_months(1.0)), LifeStage::Suckling);
        assert_eq!(resolve_stage(&bull, at_months(5.0)), LifeStage::Transition);
        assert_eq!(resolve_stage(&bull, at_months(12.0)), LifeStage::Fattening);
        assert_eq!(resolve_stage(&bull, at_months(26.0)), LifeStage::Bull);
    }

    #[test]
    fn test_steer_path() {
        let steer = animal(Sex::Castrated);
        assert_eq!(resolve_stage(&steer, at_months(6.0)), LifeStage::Transition);
        assert_eq!(resolve_stage(&steer, at_months(20.0)), LifeStage::SteerRearing);
        assert_eq!(resolve_stage(&steer, at_months(31.0)), LifeStage::SteerFinishing);
    }

    #[test]
    fn test_heifer_path() {
        let heifer = animal(Sex::Female);
        assert_eq!(resolve_stage(&heifer, at_months(2.0)), LifeStage::Suckling);
        assert_eq!(resolve_stage(&heifer, at_months(5.0)), LifeStage::PreWeaning);
        assert_eq!(resolve_stage(&heifer, at_months(10.0)), LifeStage::Rearing);
        assert_eq!(resolve_stage(&heifer, at_months(20.0)), LifeStage::Open);
    }

    #[test]
    fn test_pregnant_heifer_uses_adult_rules() {
        let mut heifer = animal(Sex::Female);
        heifer.reproduction = ReproductiveState {
            pregnant: true,
            gestation_months: Some(4.0),
            days_post_partum: None,
        };
        assert_eq!(resolve_stage(&heifer, at_months(14.0)), LifeStage::Gestation);
    }

    #[test]
    fn test_adult_female_priority() {
        let mut cow = animal(Sex::Female);
        let on = at_months(48.0);

        cow.reproduction = ReproductiveState {
            pregnant: true,
            gestation_months: Some(1.5),
            days_post_partum: Some(60),
        };
        assert_eq!(resolve_stage(&cow, on), LifeStage::LactatingEarlyGestation);

        cow.reproduction.gestation_months = Some(7.5);
        cow.reproduction.days_post_partum = Some(200);
        assert_eq!(resolve_stage(&cow, on), LifeStage::DryGestation);

        cow.reproduction.gestation_months = Some(4.0);
        assert_eq!(resolve_stage(&cow, on), LifeStage::Lactating);

        cow.reproduction.days_post_partum = Some(320);
        assert_eq!(resolve_stage(&cow, on), LifeStage::Gestation);

        cow.reproduction = ReproductiveState {
            pregnant: false,
            gestation_months: None,
            days_post_partum: Some(100),
        };
        assert_eq!(resolve_stage(&cow, on), LifeStage::Lactating);
    }

    #[test]
    fn test_refresh_stage_reports_change() {
        let mut calf = animal(Sex::Male);
        assert!(refresh_stage(&mut calf, at_months(1.0)));
        assert!(!refresh_stage(&mut calf, at_months(2.0)));
        assert!(refresh_stage(&mut calf, at_months(4.0)));
        assert_eq!(calf.stage, Some(LifeStage::Transition));
    }

    #[test]
    fn test_compare_to_targets() {
        let analysis = DietAnalysis {
            dry_matter_kg: 10.0,
            energy_mcal: 18.0,
            crude_protein_pct: 12.0,
            ndf_pct: 30.0,
            ..Default::default()
        };
        let cmp = compare_to_targets(&analysis, LifeStage::Fattening, Some(1.3));
        assert!((cmp.protein_delta_pct + 1.0).abs() < 1e-12);
        assert!(cmp.energy_delta_mcal_kg.abs() < 1e-12);
        assert_eq!(cmp.adg_in_band, Some(true));
        assert!(!cmp.meets_targets());
    }
}

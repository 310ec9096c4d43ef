//! Feed-value estimates, stocking density and nitrogen/phosphorus balance.

use ganadero_data::LifeStage;
use serde::{Deserialize, Serialize};

/// Total digestible nutrients (% DM) from proximate fractions.
pub fn estimate_tdn(crude_protein: f64, fat: f64, fiber: f64, nfe: f64) -> f64 {
    crude_protein + 2.25 * fat + fiber + nfe
}

const SUSTAINABLE_UGM_HA: f64 = 0.70;
const ELEVATED_UGM_HA: f64 = 0.95;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockingLevel {
    Sustainable,
    Elevated,
    Critical,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct StockingAssessment {
    /// Livestock units per hectare; infinite for a zero area.
    pub density: f64,
    pub level: StockingLevel,
}

pub fn assess_stocking(livestock_units: f64, hectares: f64) -> StockingAssessment {
    if hectares <= 0.0 || !hectares.is_finite() {
        return StockingAssessment {
            density: f64::INFINITY,
            level: StockingLevel::Critical,
        };
    }
    let density = livestock_units.max(0.0) / hectares;
    let level = if density <= SUSTAINABLE_UGM_HA {
        StockingLevel::Sustainable
    } else if density <= ELEVATED_UGM_HA {
        StockingLevel::Elevated
    } else {
        StockingLevel::Critical
    };
    StockingAssessment { density, level }
}

/// Livestock-unit (UGM) equivalent of one head at a stage.
pub fn livestock_units(stage: LifeStage) -> f64 {
    match stage {
        LifeStage::Suckling | LifeStage::PreWeaning => 0.4,
        LifeStage::Rearing
        | LifeStage::Transition
        | LifeStage::Fattening
        | LifeStage::SteerRearing
        | LifeStage::SteerFinishing => 0.6,
        LifeStage::Open
        | LifeStage::Lactating
        | LifeStage::LactatingEarlyGestation
        | LifeStage::Gestation
        | LifeStage::DryGestation
        | LifeStage::Bull => 1.0,
    }
}

// Grams retained per kg of live-weight gain and per kg of milk.
const N_PER_KG_GAIN: f64 = 25.6;
const P_PER_KG_GAIN: f64 = 7.8;
const N_PER_KG_MILK: f64 = 5.3;
const P_PER_KG_MILK: f64 = 0.9;

const LATE_GESTATION_MONTHS: f64 = 6.0;
const MID_GESTATION_MONTHS: f64 = 3.0;

const MIN_N_EFFICIENCY: f64 = 0.15;
const MIN_P_EFFICIENCY: f64 = 0.20;

/// Daily inputs for a nutrient balance.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct BalanceInput {
    pub dry_matter_kg: f64,
    pub crude_protein_pct: f64,
    pub phosphorus_pct: f64,
    pub adg: f64,
    #[serde(default)]
    pub milk_kg: f64,
    #[serde(default)]
    pub gestation_months: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BalanceAlert {
    LowNitrogenEfficiency,
    NitrogenDeficit,
    PhosphorusExcess,
    PhosphorusDeficit,
}

/// Grams per day of one nutrient.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct NutrientFlow {
    pub intake_g: f64,
    pub retention_g: f64,
    pub excretion_g: f64,
    pub efficiency: f64,
}

impl NutrientFlow {
    fn new(intake_g: f64, retention_g: f64) -> Self {
        Self {
            intake_g,
            retention_g,
            excretion_g: (intake_g - retention_g).max(0.0),
            efficiency: if intake_g > 0.0 {
                retention_g / intake_g
            } else {
                0.0
            },
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct NutrientBalance {
    pub nitrogen: NutrientFlow,
    pub phosphorus: NutrientFlow,
    pub alerts: Vec<BalanceAlert>,
}

fn fetal_retention(gestation_months: Option<f64>) -> (f64, f64) {
    match gestation_months {
        Some(m) if m >= LATE_GESTATION_MONTHS => (20.0, 5.0),
        Some(m) if m >= MID_GESTATION_MONTHS => (5.0, 1.5),
        _ => (0.0, 0.0),
    }
}

/// Intake minus retention (growth, milk, fetus) gives excretion.
pub fn nutrient_balance(input: &BalanceInput) -> NutrientBalance {
    let dm = input.dry_matter_kg.max(0.0);
    let n_intake = dm * input.crude_protein_pct.max(0.0) / 100.0 / 6.25 * 1000.0;
    let p_intake = dm * input.phosphorus_pct.max(0.0) / 100.0 * 1000.0;

    let gain = input.adg.max(0.0);
    let milk = input.milk_kg.max(0.0);
    let (fetal_n, fetal_p) = fetal_retention(input.gestation_months);
    let n_retained = gain * N_PER_KG_GAIN + milk * N_PER_KG_MILK + fetal_n;
    let p_retained = gain * P_PER_KG_GAIN + milk * P_PER_KG_MILK + fetal_p;

    let nitrogen = NutrientFlow::new(n_intake, n_retained);
    let phosphorus = NutrientFlow::new(p_intake, p_retained);

    let mut alerts = Vec::new();
    if n_intake > 0.0 && nitrogen.efficiency < MIN_N_EFFICIENCY {
        alerts.push(BalanceAlert::LowNitrogenEfficiency);
    }
    if n_retained > n_intake {
        alerts.push(BalanceAlert::NitrogenDeficit);
    }
    if p_intake > 0.0 && phosphorus.efficiency < MIN_P_EFFICIENCY {
        alerts.push(BalanceAlert::PhosphorusExcess);
    }
    if p_retained > p_intake {
        alerts.push(BalanceAlert::PhosphorusDeficit);
    }

    NutrientBalance {
        nitrogen,
        phosphorus,
        alerts,
    }
}

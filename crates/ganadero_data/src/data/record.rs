use super::animal::LifeStage;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// SEUROP carcass conformation class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Seurop {
    S,
    E,
    U,
    R,
    O,
    P,
}

impl Seurop {
    /// Class for a dressing percentage: S ≥ 62, E ≥ 60, U ≥ 57, R ≥ 55, O ≥ 50, else P.
    #[must_use]
    pub fn from_dressing_pct(rc_pct: f64) -> Self {
        if rc_pct >= 62.0 {
            Seurop::S
        } else if rc_pct >= 60.0 {
            Seurop::E
        } else if rc_pct >= 57.0 {
            Seurop::U
        } else if rc_pct >= 55.0 {
            Seurop::R
        } else if rc_pct >= 50.0 {
            Seurop::O
        } else {
            Seurop::P
        }
    }
}

impl fmt::Display for Seurop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Carcass summary carried on a monthly record.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct CarcassEstimate {
    /// Dressing percentage (RC).
    pub rc_pct: f64,
    /// Hot carcass weight (kg).
    pub carcass_weight: f64,
    pub conformation: Seurop,
}

/// Meat-quality summary carried on a monthly record.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct QualityEstimate {
    /// Quality efficiency score (0–100).
    pub efficiency: f64,
    /// Marbling on the 1–5 scale.
    pub marbling: f64,
    /// Beef Marbling Score equivalent (1–12).
    pub bms: f64,
}

/// One simulated period of an animal's life. Records are append-only.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MonthlyRecord {
    pub animal_id: String,
    pub date: NaiveDate,
    /// Live weight at the end of the period (kg).
    pub weight: f64,
    /// Average daily gain over the period (kg/day).
    pub adg: f64,
    pub climate_factor: f64,
    pub maturity_factor: f64,
    pub stage: LifeStage,
    pub carcass: CarcassEstimate,
    pub quality: QualityEstimate,
}

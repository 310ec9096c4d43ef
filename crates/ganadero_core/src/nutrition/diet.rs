//! Ration analysis and rule-based ration checks.
//!
//! Checks never fail: every problem becomes an alert, and rules are
//! evaluated independently so several may fire on the same ration.

use crate::config::NutritionConfig;
use crate::registry::FeedCatalog;
use ganadero_data::{DietComposition, FeedCategory, ProductionSystem};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Nutrient totals of a daily ration, on a dry-matter basis.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct DietAnalysis {
    pub dry_matter_kg: f64,
    /// Net energy supplied (Mcal/day).
    pub energy_mcal: f64,
    pub crude_protein_pct: f64,
    pub ndf_pct: f64,
    pub fat_pct: f64,
    pub phosphorus_pct: f64,
    pub concentrate_fraction: f64,
    pub legume_fraction: f64,
    pub acorn_fraction: f64,
    /// Highest crude protein (% DM) of any included feed.
    pub max_item_cp_pct: f64,
    pub has_acorn: bool,
    pub cost_per_day: f64,
    /// Feed ids missing from the catalog, in ration order.
    pub unknown_feeds: Vec<String>,
}

impl DietAnalysis {
    /// Energy density (Mcal/kg DM); 0 for an empty ration.
    pub fn energy_density(&self) -> f64 {
        if self.dry_matter_kg > 0.0 {
            self.energy_mcal / self.dry_matter_kg
        } else {
            0.0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dry_matter_kg <= 0.0
    }

    /// Whether predicted performance can replace the reference growth curve.
    ///
    /// Pasture intake is not modeled, so grazing animals keep the curve, as
    /// do rations with unknown feeds or no dry matter.
    pub fn drives_growth(&self, system: ProductionSystem) -> bool {
        !self.is_empty()
            && self.unknown_feeds.is_empty()
            && !matches!(system, ProductionSystem::Extensivo)
    }
}

pub fn analyze_diet(diet: &DietComposition, catalog: &FeedCatalog) -> DietAnalysis {
    let mut analysis = DietAnalysis::default();
    let mut cp = 0.0;
    let mut ndf = 0.0;
    let mut fat = 0.0;
    let mut phosphorus = 0.0;
    let mut concentrate = 0.0;
    let mut legume = 0.0;
    let mut acorn = 0.0;

    for line in &diet.lines {
        let Some(item) = catalog.get(&line.feed_id) else {
            analysis.unknown_feeds.push(line.feed_id.clone());
            continue;
        };
        let dm = item.dry_matter(line.kg);
        if dm <= 0.0 {
            continue;
        }
        analysis.dry_matter_kg += dm;
        analysis.energy_mcal += dm * item.net_energy_mcal.max(0.0);
        analysis.cost_per_day += line.kg.max(0.0) * item.cost_per_kg;
        cp += dm * item.crude_protein_pct;
        ndf += dm * item.ndf_pct;
        fat += dm * item.fat_pct;
        phosphorus += dm * item.phosphorus_pct;
        analysis.max_item_cp_pct = analysis.max_item_cp_pct.max(item.crude_protein_pct);

        if matches!(
            item.category,
            FeedCategory::Concentrate | FeedCategory::ProteinSupplement
        ) {
            concentrate += dm;
        }
        if item.is_legume() {
            legume += dm;
        }
        if item.is_acorn() {
            analysis.has_acorn = true;
            acorn += dm;
        }
    }

    let total = analysis.dry_matter_kg;
    if total > 0.0 {
        analysis.crude_protein_pct = cp / total;
        analysis.ndf_pct = ndf / total;
        analysis.fat_pct = fat / total;
        analysis.phosphorus_pct = phosphorus / total;
        analysis.concentrate_fraction = concentrate / total;
        analysis.legume_fraction = legume / total;
        analysis.acorn_fraction = acorn / total;
    }
    analysis
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AlertLevel {
    Caution,
    Warning,
    Danger,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertCode {
    Acidosis,
    LowFiber,
    Bloat,
    OutOfSeason,
    AcornLowFiber,
    MissingProteinSupplement,
    AcornExcess,
    EmptyDiet,
    UnknownFeed,
}

impl fmt::Display for AlertCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DietAlert {
    pub level: AlertLevel,
    pub code: AlertCode,
    pub message: String,
}

impl DietAlert {
    fn new(level: AlertLevel, code: AlertCode, message: String) -> Self {
        Self {
            level,
            code,
            message,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct DietValidation {
    pub alerts: Vec<DietAlert>,
}

impl DietValidation {
    pub fn is_valid(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn highest_level(&self) -> Option<AlertLevel> {
        self.alerts.iter().map(|a| a.level).max()
    }

    pub fn has(&self, code: AlertCode) -> bool {
        self.alerts.iter().any(|a| a.code == code)
    }
}

/// Checks a ration for acidosis, fiber, bloat and acorn-protocol risks.
///
/// `month` is the calendar month (1–12) the ration is fed in.
pub fn validate_diet(
    analysis: &DietAnalysis,
    indicine: bool,
    month: u32,
    config: &NutritionConfig,
) -> DietValidation {
    let mut alerts = Vec::new();

    for feed in &analysis.unknown_feeds {
        alerts.push(DietAlert::new(
            AlertLevel::Caution,
            AlertCode::UnknownFeed,
            format!("Feed '{feed}' is not in the catalog and was ignored"),
        ));
    }

    if analysis.is_empty() {
        alerts.push(DietAlert::new(
            AlertLevel::Caution,
            AlertCode::EmptyDiet,
            "Ration supplies no dry matter".to_string(),
        ));
        return DietValidation { alerts };
    }

    let acidosis_limit = if indicine {
        config.acidosis_concentrate_fraction_indicine
    } else {
        config.acidosis_concentrate_fraction
    };
    if analysis.concentrate_fraction > acidosis_limit {
        alerts.push(DietAlert::new(
            AlertLevel::Warning,
            AlertCode::Acidosis,
            format!(
                "Concentrate is {:.0}% of dry matter (limit {:.0}%): acidosis risk",
                analysis.concentrate_fraction * 100.0,
                acidosis_limit * 100.0
            ),
        ));
    }

    if analysis.ndf_pct < config.min_ndf_pct {
        alerts.push(DietAlert::new(
            AlertLevel::Caution,
            AlertCode::LowFiber,
            format!(
                "NDF is {:.1}% of dry matter (minimum {:.0}%)",
                analysis.ndf_pct, config.min_ndf_pct
            ),
        ));
    }

    if analysis.legume_fraction > config.bloat_legume_fraction {
        alerts.push(DietAlert::new(
            AlertLevel::Warning,
            AlertCode::Bloat,
            format!(
                "Legumes are {:.0}% of dry matter: bloat risk",
                analysis.legume_fraction * 100.0
            ),
        ));
    }

    if analysis.has_acorn {
        if !config.acorn_season_months.contains(&month) {
            alerts.push(DietAlert::new(
                AlertLevel::Warning,
                AlertCode::OutOfSeason,
                format!("Acorns fed in month {month}, outside the montanera season"),
            ));
        }
        if analysis.ndf_pct < config.acorn_min_ndf_pct {
            alerts.push(DietAlert::new(
                AlertLevel::Danger,
                AlertCode::AcornLowFiber,
                format!(
                    "Acorn ration with {:.1}% NDF (minimum {:.0}%)",
                    analysis.ndf_pct, config.acorn_min_ndf_pct
                ),
            ));
        }
        if analysis.max_item_cp_pct < config.acorn_supplement_min_cp_pct {
            alerts.push(DietAlert::new(
                AlertLevel::Danger,
                AlertCode::MissingProteinSupplement,
                format!(
                    "Acorn ration without a protein supplement (>= {:.0}% CP)",
                    config.acorn_supplement_min_cp_pct
                ),
            ));
        }
        if analysis.acorn_fraction > config.acorn_max_fraction {
            alerts.push(DietAlert::new(
                AlertLevel::Warning,
                AlertCode::AcornExcess,
                format!(
                    "Acorns are {:.0}% of dry matter (maximum {:.0}%)",
                    analysis.acorn_fraction * 100.0,
                    config.acorn_max_fraction * 100.0
                ),
            ));
        }
    }

    DietValidation { alerts }
}

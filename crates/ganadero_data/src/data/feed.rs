use super::scale::normalize_key;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedCategory {
    /// Hay, silage, pasture, straw.
    Forage,
    /// Grains and energy concentrates.
    Concentrate,
    /// Soybean meal and similar high-protein ingredients.
    ProteinSupplement,
    /// Minerals, vitamins, additives.
    Mineral,
}

/// A catalog feed ingredient. Percentages are on a dry-matter basis
/// except `dry_matter_pct` itself.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub id: String,
    pub name: String,
    pub category: FeedCategory,
    /// Bloat-prone legume forage (alfalfa, clover...).
    #[serde(default)]
    pub legume: bool,
    pub dry_matter_pct: f64,
    pub crude_protein_pct: f64,
    #[serde(default)]
    pub ndf_pct: f64,
    #[serde(default)]
    pub adf_pct: f64,
    #[serde(default)]
    pub fat_pct: f64,
    #[serde(default)]
    pub phosphorus_pct: f64,
    /// Net energy density (Mcal per kg DM).
    pub net_energy_mcal: f64,
    /// Cost per kg as fed.
    #[serde(default)]
    pub cost_per_kg: f64,
}

const ACORN_NAMES: [&str; 2] = ["acorn", "bellota"];
const LEGUME_NAMES: [&str; 6] = ["alfalfa", "lucerne", "trebol", "clover", "veza", "esparceta"];

impl FeedItem {
    /// Whether the feed names acorns ("bellota").
    #[must_use]
    pub fn is_acorn(&self) -> bool {
        let key = normalize_key(&self.name);
        ACORN_NAMES.iter().any(|n| key.contains(n))
    }

    /// Flagged as legume, or named after a common legume forage.
    #[must_use]
    pub fn is_legume(&self) -> bool {
        if self.legume {
            return true;
        }
        let key = normalize_key(&self.name);
        LEGUME_NAMES.iter().any(|n| key.contains(n))
    }

    /// Kilograms of dry matter in `kg_as_fed`.
    #[must_use]
    pub fn dry_matter(&self, kg_as_fed: f64) -> f64 {
        kg_as_fed.max(0.0) * self.dry_matter_pct.clamp(0.0, 100.0) / 100.0
    }
}

/// One ration line: a feed id and its daily as-fed quantity.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DietLine {
    pub feed_id: String,
    /// Kilograms as fed per head per day.
    pub kg: f64,
}

/// An ordered daily ration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct DietComposition {
    pub lines: Vec<DietLine>,
}

impl DietComposition {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, feed_id: &str, kg: f64) -> Self {
        self.lines.push(DietLine {
            feed_id: feed_id.to_string(),
            kg,
        });
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

use super::scale::{Measure, TraitLevel};
use serde::{Deserialize, Serialize};

/// Weighting profile used by the meat-quality model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QualityProfileKind {
    /// Balanced European beef profile.
    #[default]
    Standard,
    /// Long-finishing, high-marbling profile; time on feed dominates.
    Wagyu,
    /// Hardy indicine/rustic profile; heat matters little, time on feed less so.
    RusticIndicine,
}

/// Immutable reference record describing a cattle breed.
///
/// Numeric fields are kept as [`Measure`] because breed sheets are messy;
/// engines resolve them with explicit fallbacks and never fail on them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Breed {
    /// Registry key.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Subspecies classification, e.g. "Bos taurus" or "Bos indicus (Brahman)".
    #[serde(default)]
    pub subspecies: String,
    /// Adult male live weight (kg).
    #[serde(default)]
    pub weight_male_adult: Option<Measure>,
    /// Adult female live weight (kg).
    #[serde(default)]
    pub weight_female_adult: Option<Measure>,
    /// Average daily gain in feedlot (kg/day).
    #[serde(default)]
    pub adg_feedlot: Option<Measure>,
    /// Average daily gain on pasture (kg/day).
    #[serde(default)]
    pub adg_grazing: Option<Measure>,
    /// Feed-conversion ratio (kg DM per kg gain).
    #[serde(default)]
    pub fcr: Option<Measure>,
    /// Reference slaughter age in months; ranges such as "18-24" allowed.
    #[serde(default)]
    pub slaughter_age_months: Option<Measure>,
    #[serde(default)]
    pub heat_tolerance: TraitLevel,
    #[serde(default)]
    pub marbling_potential: TraitLevel,
    #[serde(default)]
    pub calving_ease: TraitLevel,
    /// Breed-specific base dressing percentage, overriding the system default.
    #[serde(default)]
    pub dressing_pct: Option<f64>,
    /// Lower dressing-percentage bound.
    #[serde(default)]
    pub dressing_min_pct: Option<f64>,
    /// Upper dressing-percentage bound.
    #[serde(default)]
    pub dressing_max_pct: Option<f64>,
    #[serde(default)]
    pub quality_profile: Option<QualityProfileKind>,
}

/// How the two parents of a cross relate genetically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrossType {
    /// Both parents are the same breed: no hybrid vigour.
    SameBreed,
    /// Distinct breeds of the same subspecies group.
    TaurineCross,
    /// Exactly one indicine parent: maximum hybrid vigour.
    IndicineTaurine,
}

/// Fractional heterosis bonuses applied to a cross.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HeterosisFactors {
    /// Relative ADG improvement.
    pub adg: f64,
    /// Relative FCR improvement (lower FCR is better).
    pub fcr: f64,
    /// Resilience bonus feeding heat tolerance.
    pub resilience: f64,
}

/// Blended ordinal scores before they were mapped back to labels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HybridScores {
    pub marbling: f64,
    pub heat_tolerance: f64,
    pub calving_ease: f64,
}

/// Where a hybrid record came from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Lineage {
    pub sire_id: String,
    pub sire_name: String,
    pub dam_id: String,
    pub dam_name: String,
    pub cross: CrossType,
    pub heterosis: HeterosisFactors,
    pub scores: HybridScores,
}

/// A derived F1 breed record plus its lineage.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HybridBreed {
    pub breed: Breed,
    pub lineage: Lineage,
}

/// How an animal refers to its genetics.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum BreedRef {
    /// A breed in the registry, looked up by key or name.
    Registered(String),
    /// An F1 cross of two registered breeds.
    Cross { sire: String, dam: String },
}

impl BreedRef {
    #[must_use]
    pub fn registered(key: &str) -> Self {
        BreedRef::Registered(key.to_string())
    }

    #[must_use]
    pub fn cross(sire: &str, dam: &str) -> Self {
        BreedRef::Cross {
            sire: sire.to_string(),
            dam: dam.to_string(),
        }
    }
}

impl std::fmt::Display for BreedRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BreedRef::Registered(key) => f.write_str(key),
            BreedRef::Cross { sire, dam } => write!(f, "{sire} x {dam}"),
        }
    }
}

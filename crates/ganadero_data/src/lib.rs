//! # Ganadero Data
//!
//! Plain, serde-serializable records shared by the engines and by whatever
//! application layer feeds them: breeds and hybrids, animals, feeds and
//! rations, climate readings and monthly simulation records.
//!
//! Nothing here computes anything beyond parsing and unit helpers; the
//! models live in `ganadero_core`.

pub mod data;

pub use data::animal::{
    Animal, LifeStage, Management, ProductionSystem, ReproductiveState, Sex, WeightObservation,
};
pub use data::breed::{
    Breed, BreedRef, CrossType, HeterosisFactors, HybridBreed, HybridScores, Lineage,
    QualityProfileKind,
};
pub use data::climate::{ClimateReading, DatedReading};
pub use data::feed::{DietComposition, DietLine, FeedCategory, FeedItem};
pub use data::record::{CarcassEstimate, MonthlyRecord, QualityEstimate, Seurop};
pub use data::scale::{normalize_key, parse_measure_text, Measure, TraitLevel};

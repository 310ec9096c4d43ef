//! # Ganadero Core
//!
//! Simulation engines for beef-cattle herds: hybrid genetics, monthly growth,
//! nutrition and ration checks, and carcass yield and meat quality.
//!
//! Every engine is synchronous and deterministic over its explicit inputs.
//! Reference data (breeds, feeds, climate) is built once and only borrowed.
//! Individual genetic variance is drawn from a caller-supplied seed.
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use ganadero_core::climate::NoClimate;
//! use ganadero_core::config::GrowthConfig;
//! use ganadero_core::growth::GrowthSimulator;
//! use ganadero_data::{Animal, BreedRef, Sex};
//!
//! let born = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let calf = Animal::new("ES01", Sex::Male, born, BreedRef::registered("retinta"), 40.0);
//!
//! let simulator = GrowthSimulator::new(GrowthConfig::default());
//! let points = simulator.simulate(&calf, None, &NoClimate, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
//! assert_eq!(points.len(), 6);
//! assert!(points.windows(2).all(|w| w[1].weight >= w[0].weight));
//! ```

/// Carcass yield and meat-quality estimation
pub mod carcass;
/// Daily climate inputs and the growth climate factor
pub mod climate;
/// Configuration management for model parameters
pub mod config;
/// Error types
pub mod error;
/// F1 hybrid derivation and breed resolution
pub mod genetics;
/// Monthly growth simulation
pub mod growth;
/// Parallel batch evaluation of a herd
pub mod herd;
/// Run metrics and structured logging
pub mod metrics;
/// Requirements, performance, lifecycle stages and ration checks
pub mod nutrition;
/// Breed registry and feed catalog
pub mod registry;

pub use carcass::CarcassQualityEngine;
pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use genetics::{BreedLogic, HybridCache};
pub use growth::{GrowthPoint, GrowthSimulator};
pub use herd::{HerdEvaluator, HerdReport};
pub use nutrition::NutritionEngine;
pub use registry::{BreedRegistry, FeedCatalog};

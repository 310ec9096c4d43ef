use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily weather summary for a farm.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ClimateReading {
    /// Mean daily temperature (°C).
    pub mean_temp_c: f64,
    /// Daily precipitation (mm).
    #[serde(default)]
    pub precipitation_mm: f64,
    /// Relative humidity (%), when known.
    #[serde(default)]
    pub relative_humidity: Option<f64>,
}

impl ClimateReading {
    #[must_use]
    pub fn new(mean_temp_c: f64, precipitation_mm: f64) -> Self {
        Self {
            mean_temp_c,
            precipitation_mm,
            relative_humidity: None,
        }
    }

    /// Temperature-humidity index (NRC 1971 form). Humidity defaults to 50 %.
    #[must_use]
    pub fn thi(&self) -> f64 {
        let t = self.mean_temp_c;
        let rh = self.relative_humidity.unwrap_or(50.0).clamp(0.0, 100.0);
        (1.8 * t + 32.0) - (0.55 - 0.0055 * rh) * (1.8 * t - 26.0)
    }
}

/// A dated climate reading as stored in scenario files.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct DatedReading {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub reading: ClimateReading,
}

//! Daily climate inputs and the growth climate factor.

use crate::config::ClimatePenalties;
use chrono::{Duration, NaiveDate};
use ganadero_data::{ClimateReading, DatedReading};
use std::collections::BTreeMap;

/// Source of daily weather for a farm.
pub trait ClimateProvider: Sync {
    fn reading(&self, date: NaiveDate) -> Option<ClimateReading>;

    /// Mean of all readings within `radius_days` of `center`, or `None` if there are none.
    fn window_mean(&self, center: NaiveDate, radius_days: i64) -> Option<ClimateReading> {
        let readings = (-radius_days..=radius_days)
            .filter_map(|offset| self.reading(center + Duration::days(offset)));
        mean_reading(readings)
    }
}

/// No weather data: every climate factor is neutral.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClimate;

impl ClimateProvider for NoClimate {
    fn reading(&self, _date: NaiveDate) -> Option<ClimateReading> {
        None
    }

    fn window_mean(&self, _center: NaiveDate, _radius_days: i64) -> Option<ClimateReading> {
        None
    }
}

/// Recorded daily readings keyed by date.
#[derive(Debug, Clone, Default)]
pub struct ClimateHistory {
    readings: BTreeMap<NaiveDate, ClimateReading>,
}

impl ClimateHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later readings for the same date replace earlier ones.
    pub fn from_readings<I: IntoIterator<Item = DatedReading>>(readings: I) -> Self {
        let mut history = Self::new();
        for dated in readings {
            history.insert(dated.date, dated.reading);
        }
        history
    }

    pub fn insert(&mut self, date: NaiveDate, reading: ClimateReading) {
        self.readings.insert(date, reading);
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

impl ClimateProvider for ClimateHistory {
    fn reading(&self, date: NaiveDate) -> Option<ClimateReading> {
        self.readings.get(&date).copied()
    }

    fn window_mean(&self, center: NaiveDate, radius_days: i64) -> Option<ClimateReading> {
        let from = center - Duration::days(radius_days);
        let to = center + Duration::days(radius_days);
        mean_reading(self.readings.range(from..=to).map(|(_, r)| *r))
    }
}

fn mean_reading<I: Iterator<Item = ClimateReading>>(readings: I) -> Option<ClimateReading> {
    let mut count = 0usize;
    let mut temp = 0.0;
    let mut rain = 0.0;
    let mut humidity = 0.0;
    let mut humidity_count = 0usize;
    for r in readings {
        count += 1;
        temp += r.mean_temp_c;
        rain += r.precipitation_mm;
        if let Some(rh) = r.relative_humidity {
            humidity += rh;
            humidity_count += 1;
        }
    }
    if count == 0 {
        return None;
    }
    Some(ClimateReading {
        mean_temp_c: temp / count as f64,
        precipitation_mm: rain / count as f64,
        relative_humidity: (humidity_count > 0).then(|| humidity / humidity_count as f64),
    })
}

/// Growth multiplier for a window mean; `None` means no data and a neutral 1.0.
pub fn climate_factor(mean: Option<&ClimateReading>, penalties: &ClimatePenalties) -> f64 {
    let Some(reading) = mean else {
        return 1.0;
    };
    let mut factor = 1.0;
    let t = reading.mean_temp_c;
    if t > penalties.hot_threshold_c {
        factor -= penalties.hot_penalty;
    } else if t > penalties.warm_threshold_c {
        factor -= penalties.warm_penalty;
    } else if t < penalties.cold_threshold_c {
        factor -= penalties.cold_penalty;
    }
    if reading.precipitation_mm > penalties.rain_threshold_mm {
        factor -= penalties.rain_penalty;
    }
    if factor.is_finite() {
        factor.max(penalties.floor)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_window_mean_uses_only_window() {
        let history = ClimateHistory::from_readings(vec![
            DatedReading {
                date: date(2024, 7, 1),
                reading: ClimateReading::new(30.0, 0.0),
            },
            DatedReading {
                date: date(2024, 7, 10),
                reading: ClimateReading::new(34.0, 4.0),
            },
            DatedReading {
                date: date(2024, 9, 1),
                reading: ClimateReading::new(10.0, 50.0),
            },
        ]);
        let mean = history.window_mean(date(2024, 7, 5), 15).unwrap();
        assert!((mean.mean_temp_c - 32.0).abs() < 1e-12);
        assert!((mean.precipitation_mm - 2.0).abs() < 1e-12);
        assert!(mean.relative_humidity.is_none());
        assert!(history.window_mean(date(2024, 8, 10), 15).is_none());
    }

    #[test]
    fn test_default_window_mean_matches_history() {
        struct Fixed;
        impl ClimateProvider for Fixed {
            fn reading(&self, date: NaiveDate) -> Option<ClimateReading> {
                (date.format("%d").to_string() == "01").then(|| ClimateReading::new(20.0, 12.0))
            }
        }
        let mean = Fixed.window_mean(date(2024, 3, 5), 15).unwrap();
        assert_eq!(mean.mean_temp_c, 20.0);
        assert!(Fixed.window_mean(date(2024, 3, 16), 5).is_none());
    }

    #[test]
    fn test_climate_factor_penalties() {
        let p = ClimatePenalties::default();
        assert_eq!(climate_factor(None, &p), 1.0);
        assert_eq!(climate_factor(Some(&ClimateReading::new(18.0, 2.0)), &p), 1.0);
        assert!((climate_factor(Some(&ClimateReading::new(32.0, 0.0)), &p) - 0.85).abs() < 1e-12);
        assert!((climate_factor(Some(&ClimateReading::new(27.0, 0.0)), &p) - 0.95).abs() < 1e-12);
        assert!((climate_factor(Some(&ClimateReading::new(25.0, 0.0)), &p) - 1.0).abs() < 1e-12);
        assert!((climate_factor(Some(&ClimateReading::new(2.0, 15.0)), &p) - 0.85).abs() < 1e-12);
        assert!((climate_factor(Some(&ClimateReading::new(35.0, 20.0)), &p) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_climate_factor_floor() {
        let p = ClimatePenalties {
            hot_penalty: 0.6,
            ..Default::default()
        };
        assert_eq!(climate_factor(Some(&ClimateReading::new(40.0, 30.0)), &p), 0.5);
    }
}

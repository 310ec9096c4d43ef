use serde::{Deserialize, Serialize};
use std::fmt;

/// A numeric reference value as it appears in breed sheets.
///
/// Breed data arrives either as plain numbers or as free text (`"1.2"`,
/// `"18-24"`, `"850 kg"`). Consumers only ever read it through
/// [`Measure::value`], which never yields NaN.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Measure {
    /// Plain numeric value.
    Value(f64),
    /// Textual value, possibly a range.
    Text(String),
}

impl Measure {
    /// Returns the usable value: finite and strictly positive, ranges
    /// resolved to their midpoint. Anything else is `None`.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        match self {
            Measure::Value(v) => positive(*v),
            Measure::Text(text) => parse_measure_text(text),
        }
    }
}

impl From<f64> for Measure {
    fn from(value: f64) -> Self {
        Measure::Value(value)
    }
}

impl From<&str> for Measure {
    fn from(text: &str) -> Self {
        Measure::Text(text.to_string())
    }
}

fn positive(v: f64) -> Option<f64> {
    (v.is_finite() && v > 0.0).then_some(v)
}

/// Parses `"21"`, `"1,2"`, `"18-24"`, `"18 a 24 meses"` and similar.
///
/// Ranges yield the midpoint of their two bounds. A dash directly before
/// the first number is a minus sign, so the value is rejected like any
/// other non-positive number.
#[must_use]
pub fn parse_measure_text(text: &str) -> Option<f64> {
    let cleaned = text.trim().replace(',', ".");
    let mut numbers = Vec::new();
    let mut current = String::new();
    let mut after_dash = false;
    for c in cleaned.chars() {
        if c.is_ascii_digit() || (c == '.' && !current.is_empty()) {
            if after_dash && numbers.is_empty() && current.is_empty() {
                return None;
            }
            current.push(c);
        } else if !current.is_empty() {
            numbers.push(std::mem::take(&mut current));
        }
        after_dash = matches!(c, '-' | '–' | '−') || (after_dash && c == '.');
    }
    if !current.is_empty() {
        numbers.push(current);
    }

    let values: Vec<f64> = numbers
        .iter()
        .filter_map(|n| n.trim_end_matches('.').parse::<f64>().ok())
        .collect();

    let is_range = cleaned.contains('-')
        || cleaned.contains('–')
        || cleaned.to_lowercase().contains(" a ")
        || cleaned.to_lowercase().contains(" to ");

    let value = match values.as_slice() {
        [] => return None,
        [first, second, ..] if is_range => (first + second) / 2.0,
        [first, ..] => *first,
    };
    positive(value)
}

/// Lowercases, folds Spanish accents and collapses punctuation to single spaces.
///
/// Used both for qualitative labels and for breed-name indexing.
#[must_use]
pub fn normalize_key(text: &str) -> String {
    let folded: String = text
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            c if c.is_alphanumeric() => c,
            _ => ' ',
        })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Qualitative genetic trait on the five-step ordinal scale used by breed sheets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(from = "String", into = "String")]
pub enum TraitLevel {
    /// "muy baja" (1).
    VeryLow,
    /// "baja" (3).
    Low,
    /// "media" (5). Also the value for anything unrecognised.
    #[default]
    Medium,
    /// "alta" (7).
    High,
    /// "muy alta" (9).
    VeryHigh,
}

const LEVEL_TABLE: [(TraitLevel, &[&str]); 5] = [
    (
        TraitLevel::VeryLow,
        &["muy baja", "muy bajo", "very low", "minima", "minimo"],
    ),
    (TraitLevel::Low, &["baja", "bajo", "low", "limitada"]),
    (
        TraitLevel::Medium,
        &["media", "medio", "moderada", "moderado", "medium", "moderate", "intermedia"],
    ),
    (TraitLevel::High, &["alta", "alto", "high", "buena"]),
    (
        TraitLevel::VeryHigh,
        &["muy alta", "muy alto", "very high", "excelente", "excellent"],
    ),
];

impl TraitLevel {
    pub const ALL: [TraitLevel; 5] = [
        TraitLevel::VeryLow,
        TraitLevel::Low,
        TraitLevel::Medium,
        TraitLevel::High,
        TraitLevel::VeryHigh,
    ];

    /// Ordinal score: 1, 3, 5, 7, 9.
    #[must_use]
    pub fn ordinal(self) -> f64 {
        match self {
            TraitLevel::VeryLow => 1.0,
            TraitLevel::Low => 3.0,
            TraitLevel::Medium => 5.0,
            TraitLevel::High => 7.0,
            TraitLevel::VeryHigh => 9.0,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TraitLevel::VeryLow => "muy baja",
            TraitLevel::Low => "baja",
            TraitLevel::Medium => "media",
            TraitLevel::High => "alta",
            TraitLevel::VeryHigh => "muy alta",
        }
    }

    /// Nearest level for a blended score. Ties resolve upward; NaN is `Medium`.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if !score.is_finite() {
            return TraitLevel::Medium;
        }
        let step = ((score.clamp(1.0, 9.0) - 1.0) / 2.0).round() as usize;
        Self::ALL[step.min(4)]
    }

    /// Table lookup on the normalized label. Numeric text is read as a score.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let key = normalize_key(label);
        for (level, aliases) in LEVEL_TABLE {
            if aliases.contains(&key.as_str()) {
                return level;
            }
        }
        key.parse::<f64>()
            .map(Self::from_score)
            .unwrap_or(TraitLevel::Medium)
    }

    /// Position on the 1–5 marbling scale.
    #[must_use]
    pub fn marbling_scale(self) -> f64 {
        1.0 + (self.ordinal() - 1.0) / 2.0
    }
}

impl From<String> for TraitLevel {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<TraitLevel> for String {
    fn from(level: TraitLevel) -> Self {
        level.label().to_string()
    }
}

impl fmt::Display for TraitLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

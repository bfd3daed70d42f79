//! BMI arithmetic.
//!
//! The only computation in the system: `weight / height²` with height taken
//! in centimetres, and the WHO category bands. Values are rounded to two
//! decimal places, matching what the dashboard displays and logs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Body-mass index from weight in kilograms and height in centimetres.
///
/// Returns `None` for non-positive weight or height.
#[must_use]
pub fn bmi(weight_kg: f64, height_cm: f64) -> Option<f64> {
    if weight_kg <= 0.0 || height_cm <= 0.0 {
        return None;
    }
    let height_m = height_cm / 100.0;
    Some(weight_kg / (height_m * height_m))
}

/// WHO BMI category bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Category for a BMI value: `< 18.5` underweight, `< 25` normal,
    /// `< 30` overweight, `>= 30` obese.
    #[must_use]
    pub fn from_bmi(value: f64) -> Self {
        if value < 18.5 {
            Self::Underweight
        } else if value < 25.0 {
            Self::Normal
        } else if value < 30.0 {
            Self::Overweight
        } else {
            Self::Obese
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Underweight => "Underweight",
            Self::Normal => "Normal",
            Self::Overweight => "Overweight",
            Self::Obese => "Obese",
        };
        f.write_str(label)
    }
}

/// A computed BMI reading, as displayed by the calculator and logged by the
/// tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiReading {
    pub weight_kg: f64,
    pub height_cm: f64,
    /// BMI rounded to two decimal places.
    pub bmi: f64,
    pub category: BmiCategory,
}

impl BmiReading {
    /// Compute a reading, or `None` for non-positive inputs.
    #[must_use]
    pub fn compute(weight_kg: f64, height_cm: f64) -> Option<Self> {
        let raw = bmi(weight_kg, height_cm)?;
        let rounded = (raw * 100.0).round() / 100.0;
        Some(Self {
            weight_kg,
            height_cm,
            bmi: rounded,
            category: BmiCategory::from_bmi(raw),
        })
    }
}

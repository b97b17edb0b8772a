//! Body-mass index from height and weight. Independent of the model
//! pipeline and never persisted.

use crate::error::GemLensError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BmiReport {
    pub bmi: f64,
    pub category: BmiCategory,
}

impl fmt::Display for BmiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BMI {:.1} ({})", self.bmi, self.category.label())
    }
}

pub fn calculate(height_cm: f64, weight_kg: f64) -> Result<BmiReport, GemLensError> {
    if !height_cm.is_finite() || height_cm <= 0.0 {
        return Err(GemLensError::validation("Height must be a positive number of centimetres."));
    }
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(GemLensError::validation("Weight must be a positive number of kilograms."));
    }

    let height_m = height_cm / 100.0;
    let bmi = weight_kg / (height_m * height_m);

    Ok(BmiReport {
        bmi,
        category: BmiCategory::from_bmi(bmi),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_weight() {
        let report = calculate(180.0, 72.0).unwrap();
        assert!((report.bmi - 22.222).abs() < 0.01);
        assert_eq!(report.category, BmiCategory::Normal);
        assert_eq!(report.to_string(), "BMI 22.2 (Normal weight)");
    }

    #[test]
    fn test_category_boundaries() {
        assert_eq!(BmiCategory::from_bmi(18.49), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Obese);
    }

    #[test]
    fn test_rejects_non_positive_input() {
        assert!(calculate(0.0, 70.0).unwrap_err().is_warning());
        assert!(calculate(170.0, -1.0).unwrap_err().is_warning());
        assert!(calculate(f64::NAN, 70.0).is_err());
    }
}

//! Deterministic stand-in for the trained model, used by the reference service.
//!
//! Classes follow BMI bands. The predicted band always carries at least half
//! of the probability mass; the remainder is spread over the other classes by
//! distance from their band centers.

use std::collections::BTreeMap;

pub const CLASSES: [&str; 7] = [
    "Insufficient_Weight",
    "Normal_Weight",
    "Overweight_Level_I",
    "Overweight_Level_II",
    "Obesity_Type_I",
    "Obesity_Type_II",
    "Obesity_Type_III",
];

/// Lower bound (inclusive) and upper bound (exclusive) for each class in [`CLASSES`].
const BANDS: [(f64, f64); 7] = [
    (13.5, 18.5),
    (18.5, 25.0),
    (25.0, 27.5),
    (27.5, 30.0),
    (30.0, 35.0),
    (35.0, 40.0),
    (40.0, 45.0),
];

const FALLBACK_RECOMMENDATION: &str = "Consult a healthcare professional.";

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub class_label: &'static str,
    pub confidence: f64,
    pub bmi: f64,
    pub probabilities: BTreeMap<String, f64>,
}

/// Body-mass index from height in meters and weight in kilograms, rounded to two decimals.
pub fn body_mass_index(height_m: f64, weight_kg: f64) -> f64 {
    round_to(weight_kg / (height_m * height_m), 2)
}

pub fn classify(bmi: f64) -> Classification {
    let predicted = BANDS
        .iter()
        .position(|(_, upper)| bmi < *upper)
        .unwrap_or(CLASSES.len() - 1);

    let (lower, upper) = BANDS[predicted];
    let half_width = (upper - lower) / 2.0;
    let offset = ((bmi - center(predicted)).abs() / half_width).min(1.0);
    let confidence = 0.95 - 0.45 * offset;

    let weights: Vec<f64> = (0..CLASSES.len())
        .map(|index| {
            if index == predicted {
                0.0
            } else {
                (-(bmi - center(index)).abs() / 3.0).exp()
            }
        })
        .collect();
    let total: f64 = weights.iter().sum();

    let probabilities = CLASSES
        .iter()
        .zip(&weights)
        .enumerate()
        .map(|(index, (label, weight))| {
            let probability = if index == predicted {
                confidence
            } else {
                (1.0 - confidence) * weight / total
            };
            (label.to_string(), round_to(probability, 4))
        })
        .collect();

    Classification {
        class_label: CLASSES[predicted],
        confidence: round_to(confidence, 4),
        bmi,
        probabilities,
    }
}

pub fn recommendation_for(class_label: &str) -> &'static str {
    match class_label {
        "Insufficient_Weight" => {
            "Increase calorie intake with balanced, nutrient-dense meals rich in protein. \
             Consult a nutritionist about a healthy weight-gain plan."
        }
        "Normal_Weight" => {
            "Keep up a healthy diet and at least 150 minutes of physical activity per week. \
             Carry on with your healthy lifestyle!"
        }
        "Overweight_Level_I" => {
            "Cut daily intake by about 500 kcal, raise physical activity to 200 minutes per week, \
             and eat more vegetables and lean protein."
        }
        "Overweight_Level_II" => {
            "Aim to lose 5-10% of body weight within 6 months. Consult a nutritionist for a \
             structured weight-loss program and increase moderate-intensity activity."
        }
        "Obesity_Type_I" => {
            "Medical intervention is advised. Consult a doctor and a nutritionist for an intensive \
             program targeting 5-10% weight loss within 6 months, and consider behavioral counseling."
        }
        "Obesity_Type_II" => {
            "Serious condition. See a medical team (doctor, nutritionist, psychologist) promptly; \
             pharmacological treatment may be needed alongside closely monitored care."
        }
        "Obesity_Type_III" => {
            "Very serious condition. See an obesity specialist promptly and consider intensive \
             weight-loss programs, pharmacotherapy, or bariatric surgery where indicated."
        }
        _ => FALLBACK_RECOMMENDATION,
    }
}

fn center(index: usize) -> f64 {
    let (lower, upper) = BANDS[index];
    (lower + upper) / 2.0
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

use std::fmt;
use std::str::FromStr;

use super::FieldError;

/// The closed set of lifestyle and health attributes collected for a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attribute {
    Gender,
    Age,
    Height,
    Weight,
    FamilyHistoryOverweight,
    HighCaloricFoodFrequent,
    VegetableFrequency,
    MainMealsCount,
    SnackingFrequency,
    Smokes,
    WaterIntakeLevel,
    CaloriesMonitored,
    PhysicalActivityLevel,
    TechnologyUseLevel,
    AlcoholConsumption,
    TransportMode,
}

impl Attribute {
    pub const COUNT: usize = 16;

    /// Canonical order, shared by the request body and every rendered listing.
    pub const ALL: [Attribute; Attribute::COUNT] = [
        Attribute::Gender,
        Attribute::Age,
        Attribute::Height,
        Attribute::Weight,
        Attribute::FamilyHistoryOverweight,
        Attribute::HighCaloricFoodFrequent,
        Attribute::VegetableFrequency,
        Attribute::MainMealsCount,
        Attribute::SnackingFrequency,
        Attribute::Smokes,
        Attribute::WaterIntakeLevel,
        Attribute::CaloriesMonitored,
        Attribute::PhysicalActivityLevel,
        Attribute::TechnologyUseLevel,
        Attribute::AlcoholConsumption,
        Attribute::TransportMode,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Attribute::Gender => "gender",
            Attribute::Age => "age",
            Attribute::Height => "height",
            Attribute::Weight => "weight",
            Attribute::FamilyHistoryOverweight => "familyHistoryOverweight",
            Attribute::HighCaloricFoodFrequent => "highCaloricFoodFrequent",
            Attribute::VegetableFrequency => "vegetableFrequency",
            Attribute::MainMealsCount => "mainMealsCount",
            Attribute::SnackingFrequency => "snackingFrequency",
            Attribute::Smokes => "smokes",
            Attribute::WaterIntakeLevel => "waterIntakeLevel",
            Attribute::CaloriesMonitored => "caloriesMonitored",
            Attribute::PhysicalActivityLevel => "physicalActivityLevel",
            Attribute::TechnologyUseLevel => "technologyUseLevel",
            Attribute::AlcoholConsumption => "alcoholConsumption",
            Attribute::TransportMode => "transportMode",
        }
    }

    /// Key used by the prediction service, which names attributes after its dataset columns.
    pub fn wire_key(self) -> &'static str {
        match self {
            Attribute::Gender => "Gender",
            Attribute::Age => "Age",
            Attribute::Height => "Height",
            Attribute::Weight => "Weight",
            Attribute::FamilyHistoryOverweight => "family_history_with_overweight",
            Attribute::HighCaloricFoodFrequent => "FAVC",
            Attribute::VegetableFrequency => "FCVC",
            Attribute::MainMealsCount => "NCP",
            Attribute::SnackingFrequency => "CAEC",
            Attribute::Smokes => "SMOKE",
            Attribute::WaterIntakeLevel => "CH2O",
            Attribute::CaloriesMonitored => "SCC",
            Attribute::PhysicalActivityLevel => "FAF",
            Attribute::TechnologyUseLevel => "TUE",
            Attribute::AlcoholConsumption => "CALC",
            Attribute::TransportMode => "MTRANS",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Attribute::Gender => "Gender",
            Attribute::Age => "Age (years)",
            Attribute::Height => "Height (meters)",
            Attribute::Weight => "Weight (kg)",
            Attribute::FamilyHistoryOverweight => "Family history of overweight",
            Attribute::HighCaloricFoodFrequent => "Frequent high-caloric food",
            Attribute::VegetableFrequency => "Vegetable frequency",
            Attribute::MainMealsCount => "Main meals per day",
            Attribute::SnackingFrequency => "Food between meals",
            Attribute::Smokes => "Smoker",
            Attribute::WaterIntakeLevel => "Daily water intake",
            Attribute::CaloriesMonitored => "Calorie monitoring",
            Attribute::PhysicalActivityLevel => "Physical activity per week",
            Attribute::TechnologyUseLevel => "Technology use per day",
            Attribute::AlcoholConsumption => "Alcohol consumption",
            Attribute::TransportMode => "Transportation",
        }
    }

    /// Resolves either the canonical name or the wire key, ignoring ASCII case.
    pub fn from_name(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Attribute::ALL.into_iter().find(|attribute| {
            attribute.name().eq_ignore_ascii_case(raw)
                || attribute.wire_key().eq_ignore_ascii_case(raw)
        })
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Attribute {
    type Err = FieldError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Attribute::from_name(raw).ok_or_else(|| FieldError::UnknownAttribute(raw.to_string()))
    }
}

use super::Attribute;

/// One selectable token for a categorical attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldOption {
    pub value: &'static str,
    pub label: &'static str,
}

const fn option(value: &'static str, label: &'static str) -> FieldOption {
    FieldOption { value, label }
}

const GENDER: &[FieldOption] = &[option("Male", "Male"), option("Female", "Female")];

const YES_NO: &[FieldOption] = &[option("yes", "Yes"), option("no", "No")];

const VEGETABLES: &[FieldOption] = &[
    option("1", "1 - Never"),
    option("2", "2 - Sometimes"),
    option("3", "3 - Always"),
];

const MAIN_MEALS: &[FieldOption] = &[
    option("1", "1 meal"),
    option("2", "2 meals"),
    option("3", "3 meals"),
    option("4", "4+ meals"),
];

const FREQUENCY: &[FieldOption] = &[
    option("no", "No"),
    option("Sometimes", "Sometimes"),
    option("Frequently", "Frequently"),
    option("Always", "Always"),
];

const WATER: &[FieldOption] = &[
    option("1", "Less than 1L"),
    option("2", "1-2 liters"),
    option("3", "More than 2L"),
];

const ACTIVITY: &[FieldOption] = &[
    option("0", "0 days"),
    option("1", "1-2 days"),
    option("2", "3-4 days"),
    option("3", "5+ days"),
];

const TECHNOLOGY: &[FieldOption] = &[
    option("0", "0-2 hours"),
    option("1", "3-5 hours"),
    option("2", "More than 5 hours"),
];

const TRANSPORT: &[FieldOption] = &[
    option("Walking", "Walking"),
    option("Bike", "Bike"),
    option("Motorbike", "Motorbike"),
    option("Automobile", "Automobile"),
    option("Public_Transportation", "Public Transportation"),
];

/// Static option table for a categorical attribute; `None` for free-form numeric input.
pub fn options_for(attribute: Attribute) -> Option<&'static [FieldOption]> {
    match attribute {
        Attribute::Age | Attribute::Height | Attribute::Weight => None,
        Attribute::Gender => Some(GENDER),
        Attribute::FamilyHistoryOverweight
        | Attribute::HighCaloricFoodFrequent
        | Attribute::Smokes
        | Attribute::CaloriesMonitored => Some(YES_NO),
        Attribute::VegetableFrequency => Some(VEGETABLES),
        Attribute::MainMealsCount => Some(MAIN_MEALS),
        Attribute::SnackingFrequency | Attribute::AlcoholConsumption => Some(FREQUENCY),
        Attribute::WaterIntakeLevel => Some(WATER),
        Attribute::PhysicalActivityLevel => Some(ACTIVITY),
        Attribute::TechnologyUseLevel => Some(TECHNOLOGY),
        Attribute::TransportMode => Some(TRANSPORT),
    }
}

/// Whether `value` is one of the tokens offered for `attribute`.
///
/// Free-form attributes accept anything here; the service parses them.
pub fn is_offered(attribute: Attribute, value: &str) -> bool {
    match options_for(attribute) {
        Some(options) => options.iter().any(|option| option.value == value),
        None => true,
    }
}

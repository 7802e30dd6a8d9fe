//! Risk-level tags and their presentation colors.

use std::fmt;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

/// Coarse severity tag the service attaches to a predicted class.
///
/// Unrecognized tags decode to [`RiskLevel::Unknown`] instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskLevel {
    Normal,
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
    Unknown,
}

impl RiskLevel {
    /// Rank of the most severe known level.
    pub const MAX_SEVERITY: u8 = 5;

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "normal" => RiskLevel::Normal,
            "low" => RiskLevel::Low,
            "moderate" => RiskLevel::Moderate,
            "high" => RiskLevel::High,
            "very_high" => RiskLevel::VeryHigh,
            "extreme" => RiskLevel::Extreme,
            _ => RiskLevel::Unknown,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            RiskLevel::Normal => "normal",
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::VeryHigh => "very_high",
            RiskLevel::Extreme => "extreme",
            RiskLevel::Unknown => "unknown",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Normal => "Normal",
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
            RiskLevel::VeryHigh => "Very high",
            RiskLevel::Extreme => "Extreme",
            RiskLevel::Unknown => "Unknown",
        }
    }

    pub fn color(self) -> Color {
        match self {
            RiskLevel::Normal => Color::Green500,
            RiskLevel::Low => Color::Blue500,
            RiskLevel::Moderate => Color::Amber500,
            RiskLevel::High => Color::Red500,
            RiskLevel::VeryHigh => Color::Red700,
            RiskLevel::Extreme => Color::Red900,
            RiskLevel::Unknown => Color::NEUTRAL,
        }
    }

    /// Rank from least to most severe; `None` for tags the client does not know.
    pub fn severity(self) -> Option<u8> {
        match self {
            RiskLevel::Normal => Some(0),
            RiskLevel::Low => Some(1),
            RiskLevel::Moderate => Some(2),
            RiskLevel::High => Some(3),
            RiskLevel::VeryHigh => Some(4),
            RiskLevel::Extreme => Some(5),
            RiskLevel::Unknown => None,
        }
    }

    /// Risk level the prediction service assigns to each of its class labels.
    pub fn for_class(class_label: &str) -> Self {
        match class_label {
            "Insufficient_Weight" => RiskLevel::Low,
            "Normal_Weight" => RiskLevel::Normal,
            "Overweight_Level_I" | "Overweight_Level_II" => RiskLevel::Moderate,
            "Obesity_Type_I" => RiskLevel::High,
            "Obesity_Type_II" => RiskLevel::VeryHigh,
            "Obesity_Type_III" => RiskLevel::Extreme,
            _ => RiskLevel::Unknown,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Serialize for RiskLevel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for RiskLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(RiskLevel::from_tag(&raw))
    }
}

/// Display color for a risk badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Green500,
    Blue500,
    Amber500,
    Red500,
    Red700,
    Red900,
    Gray500,
}

impl Color {
    pub const NEUTRAL: Color = Color::Gray500;

    pub fn name(self) -> &'static str {
        match self {
            Color::Green500 => "green-500",
            Color::Blue500 => "blue-500",
            Color::Amber500 => "amber-500",
            Color::Red500 => "red-500",
            Color::Red700 => "red-700",
            Color::Red900 => "red-900",
            Color::Gray500 => "gray-500",
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            Color::Green500 => "#10B981",
            Color::Blue500 => "#3B82F6",
            Color::Amber500 => "#F59E0B",
            Color::Red500 => "#EF4444",
            Color::Red700 => "#DC2626",
            Color::Red900 => "#991B1B",
            Color::Gray500 => "#6B7280",
        }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Color::Green500 => (0x10, 0xB9, 0x81),
            Color::Blue500 => (0x3B, 0x82, 0xF6),
            Color::Amber500 => (0xF5, 0x9E, 0x0B),
            Color::Red500 => (0xEF, 0x44, 0x44),
            Color::Red700 => (0xDC, 0x26, 0x26),
            Color::Red900 => (0x99, 0x1B, 0x1B),
            Color::Gray500 => (0x6B, 0x72, 0x80),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Total lookup from a raw risk tag to its color; unknown tags get [`Color::NEUTRAL`].
pub fn color_for(tag: &str) -> Color {
    RiskLevel::from_tag(tag).color()
}

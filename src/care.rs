//! Built-in care guidance keyed by scientific name.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CareGuide {
    pub common_name: &'static str,
    pub scientific_name: &'static str,
    pub temperature: &'static str,
    pub sunlight: &'static str,
    pub humidity: &'static str,
    pub watering: &'static str,
    pub soil: &'static str,
    pub fertilizer: &'static str,
}

pub const CARE_GUIDES: &[CareGuide] = &[
    CareGuide {
        common_name: "Monstera Deliciosa",
        scientific_name: "Monstera deliciosa",
        temperature: "18-27°C (65-80°F)",
        sunlight: "Bright, indirect light. Avoid direct sun.",
        humidity: "Moderate to high humidity (60-80%)",
        watering: "Water when top 2-3 inches of soil are dry",
        soil: "Well-draining potting mix",
        fertilizer: "Balanced fertilizer monthly during growing season",
    },
    CareGuide {
        common_name: "Snake Plant",
        scientific_name: "Sansevieria trifasciata",
        temperature: "15-24°C (60-75°F)",
        sunlight: "Low to bright indirect light. Tolerates low light.",
        humidity: "Average household humidity (30-50%)",
        watering: "Allow soil to dry completely between waterings",
        soil: "Well-draining cactus/succulent mix",
        fertilizer: "Light feeding during growing season",
    },
    CareGuide {
        common_name: "Pothos",
        scientific_name: "Epipremnum aureum",
        temperature: "18-24°C (65-75°F)",
        sunlight: "Low to bright indirect light",
        humidity: "Average household humidity",
        watering: "Water when top inch of soil is dry",
        soil: "Well-draining potting mix",
        fertilizer: "Balanced fertilizer every 2-3 months",
    },
    CareGuide {
        common_name: "Fiddle Leaf Fig",
        scientific_name: "Ficus lyrata",
        temperature: "18-27°C (65-80°F)",
        sunlight: "Bright, indirect light",
        humidity: "High humidity (50-80%)",
        watering: "Keep soil consistently moist but not soggy",
        soil: "Well-draining, rich potting mix",
        fertilizer: "Monthly during growing season",
    },
    CareGuide {
        common_name: "Spider Plant",
        scientific_name: "Chlorophytum comosum",
        temperature: "18-24°C (65-75°F)",
        sunlight: "Bright, indirect light",
        humidity: "Average to high humidity",
        watering: "Keep soil slightly moist",
        soil: "Well-draining potting mix",
        fertilizer: "Monthly during growing season",
    },
];

/// Shown for plants without a matching guide.
pub const GENERAL_TIPS: &[&str] = &[
    "Water when the top inch of soil feels dry.",
    "Provide bright, indirect sunlight.",
    "Fertilize monthly during growing season.",
    "Mist leaves occasionally to increase humidity.",
    "Rotate plant periodically for even growth.",
];

/// Case-insensitive, whitespace-tolerant lookup.
pub fn lookup(scientific_name: &str) -> Option<&'static CareGuide> {
    let wanted = scientific_name.trim();
    if wanted.is_empty() {
        return None;
    }
    CARE_GUIDES
        .iter()
        .find(|g| g.scientific_name.eq_ignore_ascii_case(wanted))
}

/// `(common name, scientific name)` pairs, for suggestions.
pub fn common_plants() -> Vec<(&'static str, &'static str)> {
    CARE_GUIDES
        .iter()
        .map(|g| (g.common_name, g.scientific_name))
        .collect()
}

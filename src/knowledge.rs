//! Compiled-in agronomic notes for each fertilizer the classifier can emit.

use serde::Serialize;

/// Descriptive metadata attached to a recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FertilizerDetails {
    pub description: &'static str,
    pub benefits: &'static [&'static str],
    pub best_for: &'static [&'static str],
    pub application_rate: &'static str,
    pub timing: &'static str,
}

/// Result of a knowledge-table lookup.
///
/// A label the table does not cover is a supported case, not an error: the
/// generic record is returned, tagged so callers can tell it apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnowledgeEntry {
    Known(&'static FertilizerDetails),
    Fallback(&'static FertilizerDetails),
}

impl KnowledgeEntry {
    pub fn details(self) -> &'static FertilizerDetails {
        match self {
            KnowledgeEntry::Known(details) | KnowledgeEntry::Fallback(details) => details,
        }
    }

    pub fn is_fallback(self) -> bool {
        matches!(self, KnowledgeEntry::Fallback(_))
    }
}

static ENTRIES: [(&str, FertilizerDetails); 7] = [
    (
        "Urea",
        FertilizerDetails {
            description: "High nitrogen content fertilizer (46% N)",
            benefits: &[
                "Promotes leafy growth",
                "Improves protein content",
                "Quick nitrogen release",
            ],
            best_for: &["Cereals", "Leafy vegetables", "Grass crops"],
            application_rate: "100-200 kg/ha",
            timing: "Pre-planting and top-dressing",
        },
    ),
    (
        "DAP",
        FertilizerDetails {
            description: "Di-ammonium Phosphate (18% N, 46% P₂O₅)",
            benefits: &[
                "Root development",
                "Early plant growth",
                "Flower and fruit formation",
            ],
            best_for: &["All crops", "Especially during planting"],
            application_rate: "50-100 kg/ha",
            timing: "At planting time",
        },
    ),
    (
        "14-35-14",
        FertilizerDetails {
            description: "NPK complex fertilizer (14% N, 35% P₂O₅, 14% K₂O)",
            benefits: &[
                "Balanced nutrition",
                "Root development",
                "Overall plant health",
            ],
            best_for: &["Fruit crops", "Vegetables", "Cash crops"],
            application_rate: "150-250 kg/ha",
            timing: "At planting and flowering",
        },
    ),
    (
        "28-28",
        FertilizerDetails {
            description: "NPK fertilizer (28% N, 28% P₂O₅)",
            benefits: &[
                "Balanced N-P nutrition",
                "Strong root system",
                "Healthy growth",
            ],
            best_for: &["Field crops", "Vegetables"],
            application_rate: "100-150 kg/ha",
            timing: "At planting and vegetative stage",
        },
    ),
    (
        "17-17-17",
        FertilizerDetails {
            description: "Balanced NPK fertilizer (17% each of N, P₂O₅, K₂O)",
            benefits: &[
                "Complete balanced nutrition",
                "All-round growth",
                "Stress tolerance",
            ],
            best_for: &["All crops", "General purpose"],
            application_rate: "150-200 kg/ha",
            timing: "Throughout growing season",
        },
    ),
    (
        "20-20",
        FertilizerDetails {
            description: "NPK fertilizer (20% N, 20% P₂O₅)",
            benefits: &["Good N-P balance", "Vigorous growth", "High yield potential"],
            best_for: &["Cereals", "Pulses", "Oilseeds"],
            application_rate: "125-175 kg/ha",
            timing: "At sowing and top-dressing",
        },
    ),
    (
        "10-26-26",
        FertilizerDetails {
            description: "NPK fertilizer (10% N, 26% P₂O₅, 26% K₂O)",
            benefits: &["High P-K content", "Root development", "Disease resistance"],
            best_for: &[
                "Fruit crops",
                "Vegetables",
                "High K requirement crops",
            ],
            application_rate: "100-200 kg/ha",
            timing: "At planting and fruit development",
        },
    ),
];

static FALLBACK: FertilizerDetails = FertilizerDetails {
    description: "Specialized fertilizer blend",
    benefits: &["Optimized nutrition", "Improved yield", "Better quality"],
    best_for: &["As recommended for your specific crop"],
    application_rate: "As per soil test recommendations",
    timing: "As per crop growth stage",
};

/// Look up `label` (exact, case-sensitive match).
pub fn lookup(label: &str) -> KnowledgeEntry {
    ENTRIES
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, details)| KnowledgeEntry::Known(details))
        .unwrap_or(KnowledgeEntry::Fallback(&FALLBACK))
}

/// Fertilizer names covered by the table.
pub fn known_fertilizers() -> impl Iterator<Item = &'static str> {
    ENTRIES.iter().map(|(name, _)| *name)
}

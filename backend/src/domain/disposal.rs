//! Category-based disposal guidance.

use crate::domain::{Category, Medicine, MedicineId};

const SOLID_DOSE_STEPS: &[&str] = &[
    "Remove medicine from original container.",
    "Mix with undesirable substance (e.g., coffee grounds, dirt).",
    "Place in a sealed bag/container.",
    "Throw in household trash.",
];

const LIQUID_STEPS: &[&str] = &[
    "Pour into a sealable bag with absorbent material (e.g., cat litter).",
    "Seal the bag and throw in household trash.",
];

const INJECTION_STEPS: &[&str] = &[
    "Place in a sharps container.",
    "Do not recap needles.",
    "Take to a pharmacy or authorized collection site.",
];

const GENERAL_STEPS: &[&str] = &[
    "Check local guidelines or ask your pharmacist.",
    "Do not flush medicines down the toilet.",
];

/// Broad disposal family derived from a free-text category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisposalKind {
    SolidDose,
    Liquid,
    Injection,
    General,
}

impl DisposalKind {
    /// Classify a category label, ignoring case and surrounding whitespace.
    pub fn for_category(category: &Category) -> Self {
        match category.as_ref().trim().to_lowercase().as_str() {
            "tablet" | "capsule" => Self::SolidDose,
            "syrup" | "liquid" => Self::Liquid,
            "injection" => Self::Injection,
            _ => Self::General,
        }
    }

    pub fn steps(self) -> &'static [&'static str] {
        match self {
            Self::SolidDose => SOLID_DOSE_STEPS,
            Self::Liquid => LIQUID_STEPS,
            Self::Injection => INJECTION_STEPS,
            Self::General => GENERAL_STEPS,
        }
    }
}

/// Disposal instructions for one medicine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisposalGuide {
    pub medicine_id: MedicineId,
    pub medicine_name: String,
    pub category: String,
    pub kind: DisposalKind,
    pub steps: &'static [&'static str],
}

impl DisposalGuide {
    pub fn for_medicine(medicine: &Medicine) -> Self {
        let kind = DisposalKind::for_category(medicine.category());
        Self {
            medicine_id: medicine.id(),
            medicine_name: medicine.name().to_string(),
            category: medicine.category().to_string(),
            kind,
            steps: kind.steps(),
        }
    }
}

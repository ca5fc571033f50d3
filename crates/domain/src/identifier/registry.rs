//! Static registry of principal categories and their two-digit subtypes.

/// One registered subtype under a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeEntry {
    /// Two-digit type code.
    pub code: &'static str,
    /// Display name of the subtype.
    pub name: &'static str,
    /// Short description shown next to form fields.
    pub description: &'static str,
}

/// One registered principal category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryEntry {
    /// Single-character category code.
    pub code: char,
    /// Display name of the category.
    pub name: &'static str,
    types: &'static [TypeEntry],
}

impl CategoryEntry {
    /// Returns every subtype registered under this category.
    #[must_use]
    pub fn types(&self) -> &'static [TypeEntry] {
        self.types
    }

    /// Finds a registered subtype by its two-digit code.
    #[must_use]
    pub fn type_entry(&self, type_code: &str) -> Option<&'static TypeEntry> {
        self.types.iter().find(|entry| entry.code == type_code)
    }
}

/// Category code for natural persons.
pub const HUMAN: char = 'H';
/// Category code for animals.
pub const ANIMAL: char = 'A';
/// Category code for companies.
pub const COMPANY: char = 'C';
/// Category code for organizational entities (hospitals, clinics, departments).
pub const ORGANIZATION: char = 'O';

const fn entry(
    code: &'static str,
    name: &'static str,
    description: &'static str,
) -> TypeEntry {
    TypeEntry {
        code,
        name,
        description,
    }
}

const HUMAN_TYPES: &[TypeEntry] = &[
    entry("00", "Citizen", "National citizen with a registered civil record"),
    entry(
        "01",
        "Permanent resident",
        "Foreign-born person holding permanent residency",
    ),
    entry(
        "02",
        "Foreign national",
        "Visitor or temporary resident without residency",
    ),
    entry("03", "Newborn", "Person registered at birth before civil registration"),
    entry(
        "04",
        "Unidentified patient",
        "Patient admitted before identity could be established",
    ),
];

const ANIMAL_TYPES: &[TypeEntry] = &[
    entry("00", "Dog", "Canine"),
    entry("01", "Cat", "Feline"),
    entry("02", "Horse", "Equine"),
    entry("03", "Cattle", "Bovine livestock"),
    entry("04", "Bird", "Avian, domestic or poultry"),
    entry("05", "Exotic", "Any species not listed separately"),
];

const COMPANY_TYPES: &[TypeEntry] = &[
    entry("00", "Private company", "Privately held business"),
    entry("01", "Public company", "Publicly listed business"),
    entry("02", "Non-profit", "Charity, foundation or association"),
    entry("03", "Government agency", "Public administration body"),
    entry("04", "Insurer", "Health or veterinary insurance carrier"),
];

const ORGANIZATION_TYPES: &[TypeEntry] = &[
    entry("00", "Hospital", "Inpatient care facility"),
    entry("01", "Clinic", "Outpatient care facility"),
    entry("02", "Laboratory", "Diagnostic or research laboratory"),
    entry("03", "Pharmacy", "Dispensing pharmacy"),
    entry("04", "Department", "Organizational unit inside a facility"),
    entry("05", "Research institute", "Academic or clinical research body"),
];

const CATEGORIES: &[CategoryEntry] = &[
    CategoryEntry {
        code: HUMAN,
        name: "Human",
        types: HUMAN_TYPES,
    },
    CategoryEntry {
        code: ANIMAL,
        name: "Animal",
        types: ANIMAL_TYPES,
    },
    CategoryEntry {
        code: COMPANY,
        name: "Company",
        types: COMPANY_TYPES,
    },
    CategoryEntry {
        code: ORGANIZATION,
        name: "Organization",
        types: ORGANIZATION_TYPES,
    },
];

/// Returns every registered category in display order.
#[must_use]
pub fn categories() -> &'static [CategoryEntry] {
    CATEGORIES
}

/// Finds a registered category by its exact code.
#[must_use]
pub fn category(code: char) -> Option<&'static CategoryEntry> {
    CATEGORIES.iter().find(|entry| entry.code == code)
}

/// Finds a registered (category, type) combination.
#[must_use]
pub fn type_entry(category_code: char, type_code: &str) -> Option<&'static TypeEntry> {
    category(category_code).and_then(|entry| entry.type_entry(type_code))
}

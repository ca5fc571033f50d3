//! Platform identifier codec.
//!
//! A platform identifier has the fixed layout
//! `<category:1 char><type:2 digits><sequence:alphanumeric>`, for example
//! `H00000001` (a citizen) or `O00000042` (a hospital). The codec only splits,
//! checks and labels identifiers; it never issues or rewrites them, and every
//! failure is returned as a value.

mod registry;

#[cfg(test)]
mod tests;

use thiserror::Error;

pub use registry::{
    ANIMAL, COMPANY, CategoryEntry, HUMAN, ORGANIZATION, TypeEntry, categories, category,
    type_entry,
};

const PLACEHOLDER_SEQUENCE: &str = "000001";

/// Syntactic split of a platform identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedIdentifier<'a> {
    /// First character of the identifier.
    pub category_code: char,
    /// The two characters following the category code.
    pub type_code: &'a str,
    /// Everything after the type code. May be empty after parsing.
    pub sequence: &'a str,
}

impl std::fmt::Display for ParsedIdentifier<'_> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}{}{}",
            self.category_code, self.type_code, self.sequence
        )
    }
}

/// Registry entries matched by a valid identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Matched category.
    pub category: &'static CategoryEntry,
    /// Matched subtype within the category.
    pub subtype: &'static TypeEntry,
}

/// Reason an identifier failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// Fewer characters than a category code plus a two-digit type code.
    #[error("identifier is too short ({length} characters): expected a category code and a two-digit type code")]
    TooShort {
        /// Character count of the rejected input.
        length: usize,
    },

    /// Category code is not registered.
    #[error("unknown identifier category '{code}'")]
    UnknownCategory {
        /// Rejected category code.
        code: char,
    },

    /// Type code is not exactly two ASCII digits.
    #[error("type code '{type_code}' must be exactly two digits")]
    MalformedTypeCode {
        /// Rejected type code.
        type_code: String,
    },

    /// Type code is well-formed but not registered under the category.
    #[error("type code '{type_code}' is not registered for category '{category}'")]
    UnregisteredType {
        /// Category code of the identifier.
        category: char,
        /// Rejected type code.
        type_code: String,
    },

    /// Sequential part is empty or contains non-alphanumeric characters.
    #[error("sequential part '{sequence}' must be a non-empty run of letters and digits")]
    MalformedSequence {
        /// Rejected sequential part.
        sequence: String,
    },
}

impl IdentifierError {
    /// Returns a stable machine-readable code for this failure.
    #[must_use]
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::TooShort { .. } => "too_short",
            Self::UnknownCategory { .. } => "unknown_category",
            Self::MalformedTypeCode { .. } => "malformed_type_code",
            Self::UnregisteredType { .. } => "unregistered_type",
            Self::MalformedSequence { .. } => "malformed_sequence",
        }
    }

    /// Returns whether the input violates the identifier grammar.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::TooShort { .. } | Self::MalformedTypeCode { .. } | Self::MalformedSequence { .. }
        )
    }

    /// Returns whether the input is well-formed but names an unsupported classification.
    #[must_use]
    pub fn is_unknown_classification(&self) -> bool {
        matches!(
            self,
            Self::UnknownCategory { .. } | Self::UnregisteredType { .. }
        )
    }
}

/// Splits an identifier into its category, type and sequential parts.
///
/// Returns `None` when fewer than three characters are present. No registry
/// lookups happen here.
#[must_use]
pub fn parse(raw: &str) -> Option<ParsedIdentifier<'_>> {
    let mut indices = raw.char_indices();
    let (_, category_code) = indices.next()?;
    let (type_start, _) = indices.next()?;
    indices.next()?;
    let sequence_start = indices.next().map_or(raw.len(), |(index, _)| index);

    Some(ParsedIdentifier {
        category_code,
        type_code: &raw[type_start..sequence_start],
        sequence: &raw[sequence_start..],
    })
}

/// Validates an identifier against the grammar and the category registry.
///
/// Checks run in a fixed order (length, category, type-code shape, registered
/// combination, sequential part) and the first failure is reported.
pub fn validate(raw: &str) -> Result<Classification, IdentifierError> {
    let parsed = parse(raw).ok_or_else(|| IdentifierError::TooShort {
        length: raw.chars().count(),
    })?;

    let category = category(parsed.category_code).ok_or(IdentifierError::UnknownCategory {
        code: parsed.category_code,
    })?;

    if !is_two_digit_code(parsed.type_code) {
        return Err(IdentifierError::MalformedTypeCode {
            type_code: parsed.type_code.to_owned(),
        });
    }

    let subtype = category.type_entry(parsed.type_code).ok_or_else(|| {
        IdentifierError::UnregisteredType {
            category: category.code,
            type_code: parsed.type_code.to_owned(),
        }
    })?;

    if !is_alphanumeric_sequence(parsed.sequence) {
        return Err(IdentifierError::MalformedSequence {
            sequence: parsed.sequence.to_owned(),
        });
    }

    Ok(Classification { category, subtype })
}

/// Returns whether the identifier parses and carries the given category code.
#[must_use]
pub fn classify(raw: &str, category_code: char) -> bool {
    parse(raw).is_some_and(|parsed| parsed.category_code == category_code)
}

/// Returns whether the identifier belongs to a natural person.
#[must_use]
pub fn is_person(raw: &str) -> bool {
    classify(raw, HUMAN)
}

/// Returns whether the identifier belongs to an animal.
#[must_use]
pub fn is_animal(raw: &str) -> bool {
    classify(raw, ANIMAL)
}

/// Returns whether the identifier belongs to a company.
#[must_use]
pub fn is_company(raw: &str) -> bool {
    classify(raw, COMPANY)
}

/// Returns whether the identifier belongs to an organizational entity.
#[must_use]
pub fn is_organization(raw: &str) -> bool {
    classify(raw, ORGANIZATION)
}

/// Looks up the registered subtype named by an identifier.
#[must_use]
pub fn subtype(raw: &str) -> Option<&'static TypeEntry> {
    parse(raw).and_then(|parsed| type_entry(parsed.category_code, parsed.type_code))
}

/// Looks up the species of an animal identifier.
#[must_use]
pub fn animal_species(raw: &str) -> Option<&'static TypeEntry> {
    if is_animal(raw) { subtype(raw) } else { None }
}

/// Formats an identifier with its category and subtype names for display.
///
/// Falls back to the raw input when it does not parse or names an
/// unregistered classification.
#[must_use]
pub fn describe(raw: &str) -> String {
    let Some(parsed) = parse(raw) else {
        return raw.to_owned();
    };

    match (
        category(parsed.category_code),
        type_entry(parsed.category_code, parsed.type_code),
    ) {
        (Some(category), Some(subtype)) => {
            format!("{raw} ({} · {})", category.name, subtype.name)
        }
        _ => raw.to_owned(),
    }
}

/// Builds an example identifier for form hints.
#[must_use]
pub fn placeholder(category_code: char, type_code: &str) -> String {
    format!("{category_code}{type_code}{PLACEHOLDER_SEQUENCE}")
}

fn is_two_digit_code(value: &str) -> bool {
    value.len() == 2 && value.bytes().all(|byte| byte.is_ascii_digit())
}

fn is_alphanumeric_sequence(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|byte| byte.is_ascii_alphanumeric())
}

use proptest::prelude::*;

use super::{
    IdentifierError, animal_species, categories, classify, describe, is_animal, is_company,
    is_organization, is_person, parse, placeholder, subtype, validate,
};

#[test]
fn registered_citizen_identifier_is_valid() {
    let result = validate("H00000001");
    match result {
        Ok(classification) => {
            assert_eq!(classification.category.code, 'H');
            assert_eq!(classification.subtype.name, "Citizen");
        }
        Err(error) => panic!("expected valid identifier, got {error}"),
    }
}

#[test]
fn alphanumeric_sequence_is_accepted() {
    assert!(validate("H00ABC001").is_ok());
}

#[test]
fn unknown_category_is_reported_as_classification_error() {
    let result = validate("X00000001");
    assert_eq!(result, Err(IdentifierError::UnknownCategory { code: 'X' }));
    assert!(result.is_err_and(|error| error.is_unknown_classification() && !error.is_malformed()));
}

#[test]
fn unregistered_type_code_is_rejected() {
    let result = validate("H99000001");
    assert_eq!(
        result,
        Err(IdentifierError::UnregisteredType {
            category: 'H',
            type_code: "99".to_owned(),
        })
    );
}

#[test]
fn non_digit_type_code_is_malformed_even_for_known_category() {
    let result = validate("HA1000001");
    assert!(matches!(
        result,
        Err(IdentifierError::MalformedTypeCode { ref type_code }) if type_code == "A1"
    ));
    assert!(result.is_err_and(|error| error.is_malformed()));
}

#[test]
fn punctuation_in_sequence_is_rejected() {
    let result = validate("H00-00001");
    assert!(matches!(
        result,
        Err(IdentifierError::MalformedSequence { .. })
    ));
}

#[test]
fn empty_sequence_is_rejected_after_code_checks() {
    assert_eq!(
        validate("H00"),
        Err(IdentifierError::MalformedSequence {
            sequence: String::new(),
        })
    );
}

#[test]
fn empty_string_fails_length_check() {
    assert_eq!(validate(""), Err(IdentifierError::TooShort { length: 0 }));
}

#[test]
fn category_is_checked_before_type_code_shape() {
    assert!(matches!(
        validate("xZZ-"),
        Err(IdentifierError::UnknownCategory { code: 'x' })
    ));
}

#[test]
fn category_codes_are_case_sensitive() {
    assert!(matches!(
        validate("h00000001"),
        Err(IdentifierError::UnknownCategory { .. })
    ));
    assert!(!classify("h00000001", 'H'));
}

#[test]
fn parse_splits_fixed_positions() {
    let parsed = parse("O04DEPT7");
    assert!(parsed.is_some_and(|parsed| {
        parsed.category_code == 'O' && parsed.type_code == "04" && parsed.sequence == "DEPT7"
    }));
}

#[test]
fn parse_handles_multibyte_input_without_panicking() {
    let parsed = parse("É0ü1");
    assert!(parsed.is_some_and(|parsed| {
        parsed.category_code == 'É' && parsed.type_code == "0ü" && parsed.sequence == "1"
    }));
    assert!(matches!(
        validate("É0ü1"),
        Err(IdentifierError::UnknownCategory { code: 'É' })
    ));
}

#[test]
fn category_predicates_follow_first_character() {
    assert!(is_person("H01000123"));
    assert!(is_animal("A02000001"));
    assert!(is_company("C04INS01"));
    assert!(is_organization("O00000042"));
    assert!(!is_person("A02000001"));
    assert!(!is_person("H"));
}

#[test]
fn animal_species_only_resolves_for_animals() {
    assert_eq!(animal_species("A01000007").map(|entry| entry.name), Some("Cat"));
    assert_eq!(animal_species("H01000007"), None);
    assert_eq!(subtype("H01000007").map(|entry| entry.name), Some("Permanent resident"));
}

#[test]
fn describe_appends_category_and_subtype_names() {
    assert_eq!(describe("O00000042"), "O00000042 (Organization · Hospital)");
}

#[test]
fn describe_falls_back_to_raw_value() {
    assert_eq!(describe("H0"), "H0");
    assert_eq!(describe("Z00000001"), "Z00000001");
    assert_eq!(describe("H99000001"), "H99000001");
}

#[test]
fn placeholder_concatenates_codes() {
    assert_eq!(placeholder('A', "03"), "A03000001");
    assert_eq!(placeholder('Q', "xx"), "Qxx000001");
}

#[test]
fn every_registered_placeholder_validates() {
    for category in categories() {
        for entry in category.types() {
            let example = placeholder(category.code, entry.code);
            assert!(validate(example.as_str()).is_ok(), "{example} should be valid");
        }
    }
}

#[test]
fn reason_codes_are_distinct() {
    let errors = [
        IdentifierError::TooShort { length: 1 },
        IdentifierError::UnknownCategory { code: 'X' },
        IdentifierError::MalformedTypeCode {
            type_code: "A1".to_owned(),
        },
        IdentifierError::UnregisteredType {
            category: 'H',
            type_code: "99".to_owned(),
        },
        IdentifierError::MalformedSequence {
            sequence: "-".to_owned(),
        },
    ];
    let codes: std::collections::BTreeSet<&str> =
        errors.iter().map(IdentifierError::reason_code).collect();
    assert_eq!(codes.len(), errors.len());
}

fn registered_pair() -> impl Strategy<Value = (char, &'static str)> {
    let pairs: Vec<(char, &'static str)> = categories()
        .iter()
        .flat_map(|category| {
            category
                .types()
                .iter()
                .map(move |entry| (category.code, entry.code))
        })
        .collect();
    proptest::sample::select(pairs)
}

proptest! {
    #[test]
    fn valid_identifiers_round_trip_through_parse(
        (category_code, type_code) in registered_pair(),
        sequence in "[A-Za-z0-9]{1,12}",
    ) {
        let raw = format!("{category_code}{type_code}{sequence}");
        let classification = validate(raw.as_str());
        prop_assert!(classification.is_ok_and(|value| value.category.code == category_code));

        let rebuilt = parse(raw.as_str()).map(|parsed| parsed.to_string());
        prop_assert_eq!(rebuilt, Some(raw));
    }

    #[test]
    fn short_inputs_fail_length_check(raw in "\\PC{0,2}") {
        let is_too_short = matches!(validate(raw.as_str()), Err(IdentifierError::TooShort { .. }));
        prop_assert!(is_too_short);
    }

    #[test]
    fn validation_is_idempotent(raw in "\\PC{0,12}") {
        prop_assert_eq!(validate(raw.as_str()), validate(raw.as_str()));
    }
}

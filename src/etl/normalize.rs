//! Value corrections for the two tag keys that were audited by hand.
//!
//! Street names are fixed through a closed table of exact full values. New
//! corrections are added as new rows, never as pattern rules.

pub const STREET_KEY: &str = "street";
pub const POSTCODE_KEY: &str = "postcode";

const POSTCODE_LEN: usize = 5;

const STREET_CORRECTIONS: [(&str, &str); 7] = [
    ("James St", "James Street"),
    ("Presidental Courts", "Presidential Court"),
    ("New York 31", "New York 31"),
    ("State Route 31", "New York 31"),
    ("State Highway 31", "New York 31"),
    ("State Route 298", "New York 298"),
    ("US Route 11", "Route 11"),
];

pub fn normalize_street(value: &str) -> String {
    STREET_CORRECTIONS
        .iter()
        .find(|&&(bad, _)| bad == value)
        .map_or(value, |&(_, fixed)| fixed)
        .to_string()
}

/// Keeps the leading five-character ZIP, dropping any `-NNNN` extension.
/// Shorter values are kept as they are.
pub fn normalize_postcode(value: &str) -> String {
    value.chars().take(POSTCODE_LEN).collect()
}

pub fn normalize_value(key: &str, value: &str) -> String {
    match key {
        STREET_KEY => normalize_street(value),
        POSTCODE_KEY => normalize_postcode(value),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("James St", "James Street")]
    #[case("Presidental Courts", "Presidential Court")]
    #[case("New York 31", "New York 31")]
    #[case("State Route 31", "New York 31")]
    #[case("State Highway 31", "New York 31")]
    #[case("State Route 298", "New York 298")]
    #[case("US Route 11", "Route 11")]
    #[case("Main Street", "Main Street")]
    #[case("James St North", "James St North")]
    #[case("", "")]
    fn corrects_known_street_names(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_street(raw), expected);
    }

    #[rstest]
    #[case("13066", "13066")]
    #[case("13066-1234", "13066")]
    #[case("130", "130")]
    #[case("NY 13210", "NY 13")]
    #[case("", "")]
    fn truncates_postcodes(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_postcode(raw), expected);
    }

    #[rstest]
    fn postcode_counts_characters_not_bytes() {
        assert_eq!(normalize_postcode("ÄÖÜßéèx"), "ÄÖÜßé");
    }

    #[rstest]
    #[case("street", "James St", "James Street")]
    #[case("postcode", "13066-1234", "13066")]
    #[case("name", "James St", "James St")]
    #[case("city", "13066-1234", "13066-1234")]
    fn dispatches_on_bare_key(#[case] key: &str, #[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_value(key, raw), expected);
    }

    proptest! {
        #[test]
        fn street_normalization_is_idempotent(value in ".{0,24}") {
            let once = normalize_street(&value);
            prop_assert_eq!(normalize_street(&once), once);
        }

        #[test]
        fn corrected_streets_are_idempotent(index in 0..STREET_CORRECTIONS.len()) {
            let once = normalize_street(STREET_CORRECTIONS[index].0);
            prop_assert_eq!(normalize_street(&once), once);
        }

        #[test]
        fn postcode_normalization_is_idempotent(value in "\\PC{0,12}") {
            let once = normalize_postcode(&value);
            prop_assert!(once.chars().count() <= POSTCODE_LEN);
            prop_assert_eq!(normalize_postcode(&once), once);
        }
    }
}

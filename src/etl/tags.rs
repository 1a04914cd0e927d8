//! Tag classification shared by points and ways.
//!
//! A raw key such as `addr:street` is split at its first `:` into a namespace
//! (`addr`) and a bare key (`street`). Keys without a namespace get the
//! `regular` type. Keys containing characters that cannot become a SQL column
//! value are rejected outright.
use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use super::normalize::normalize_value;
use crate::data::{CleanTag, RawTag};

pub const DEFAULT_TAG_TYPE: &str = "regular";
pub const NAMESPACE_SEPARATOR: char = ':';

static PROBLEM_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[=+/&<>;'"?%#$@,. \t\r\n]"#).expect("problem character class is a valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagClass {
    Reject,
    Keep { tag_type: String, key: String },
}

pub fn has_problem_chars(raw_key: &str) -> bool {
    PROBLEM_CHARS.is_match(raw_key)
}

pub fn classify(raw_key: &str) -> TagClass {
    if has_problem_chars(raw_key) {
        return TagClass::Reject;
    }
    match raw_key.split_once(NAMESPACE_SEPARATOR) {
        Some((tag_type, key)) => TagClass::Keep {
            tag_type: tag_type.to_string(),
            key: key.to_string(),
        },
        None => TagClass::Keep {
            tag_type: DEFAULT_TAG_TYPE.to_string(),
            key: raw_key.to_string(),
        },
    }
}

/// Classifies and normalizes one raw tag of the element `owner_id`.
/// Returns `None` when the tag is rejected.
pub fn clean_tag(owner_id: &str, raw: &RawTag) -> Option<CleanTag> {
    match classify(&raw.key) {
        TagClass::Reject => {
            debug!(owner_id = owner_id, key = raw.key.as_str(); "Dropping tag with problem characters");
            None
        }
        TagClass::Keep { tag_type, key } => Some(CleanTag {
            id: owner_id.to_string(),
            value: normalize_value(&key, &raw.value),
            key,
            tag_type,
        }),
    }
}

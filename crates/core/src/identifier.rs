//! Prefixed identifier formatting.
//!
//! Claim and beneficiary identifiers are a fixed prefix followed by digits
//! (`CLM0001`, `BENE11001`). User input is reduced to its digits and the prefix
//! is put back in front, so the prefix is always present and only the digit
//! portion is editable.

use crate::constants::{BENE_ID_PREFIX, CLAIM_ID_PREFIX};

/// Which identifier a value belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdPrefix {
    Claim,
    Beneficiary,
}

impl IdPrefix {
    pub fn as_str(self) -> &'static str {
        match self {
            IdPrefix::Claim => CLAIM_ID_PREFIX,
            IdPrefix::Beneficiary => BENE_ID_PREFIX,
        }
    }
}

/// Strip every non-digit character from `input` and prepend the prefix.
///
/// Digits keep their original order. Input without digits formats to the bare prefix.
///
/// # Arguments
///
/// * `prefix` - Identifier kind, which decides the `CLM`/`BENE` prefix
/// * `input` - Raw user input; may already carry the prefix
///
/// # Returns
///
/// The prefix followed by every digit of `input`, e.g. `"00a1"` becomes `"CLM001"`.
pub fn format_identifier(prefix: IdPrefix, input: &str) -> String {
    let digits = digits_of(input);
    let mut out = String::with_capacity(prefix.as_str().len() + digits.len());
    out.push_str(prefix.as_str());
    out.push_str(&digits);
    out
}

/// The editable digit portion of an identifier, as shown next to the fixed prefix.
pub fn editable_digits(prefix: IdPrefix, value: &str) -> String {
    digits_of(value.strip_prefix(prefix.as_str()).unwrap_or(value))
}

/// Canonical identifier, or `None` when the input carries no digits.
pub fn canonical_identifier(prefix: IdPrefix, input: &str) -> Option<String> {
    let digits = digits_of(input);
    if digits.is_empty() {
        None
    } else {
        Some(format!("{}{}", prefix.as_str(), digits))
    }
}

fn digits_of(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_keeps_digits_in_order() {
        assert_eq!(format_identifier(IdPrefix::Claim, "a1-2 b3"), "CLM123");
        assert_eq!(format_identifier(IdPrefix::Beneficiary, "11001"), "BENE11001");
    }

    #[test]
    fn format_of_prefixed_value_is_stable() {
        let once = format_identifier(IdPrefix::Claim, "CLM0042");
        assert_eq!(once, "CLM0042");
        assert_eq!(format_identifier(IdPrefix::Claim, &once), once);
    }

    #[test]
    fn format_without_digits_is_bare_prefix() {
        assert_eq!(format_identifier(IdPrefix::Beneficiary, "abc"), "BENE");
        assert_eq!(format_identifier(IdPrefix::Claim, ""), "CLM");
    }

    #[test]
    fn non_ascii_digits_are_stripped() {
        assert_eq!(format_identifier(IdPrefix::Claim, "٣7"), "CLM7");
    }

    #[test]
    fn every_output_is_prefix_then_digits() {
        for input in ["", "x", "CLM12", "12 34", "--9--", "BENE5", "0x1F"] {
            let out = format_identifier(IdPrefix::Claim, input);
            let rest = out.strip_prefix("CLM").unwrap();
            assert!(rest.chars().all(|c| c.is_ascii_digit()), "{input:?} -> {out:?}");
            let expected: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
            assert_eq!(rest, expected);
        }
    }

    #[test]
    fn editable_digits_hides_prefix() {
        assert_eq!(editable_digits(IdPrefix::Beneficiary, "BENE11001"), "11001");
        assert_eq!(editable_digits(IdPrefix::Claim, "CLM"), "");
    }

    #[test]
    fn canonical_identifier_requires_digits() {
        assert_eq!(canonical_identifier(IdPrefix::Claim, "CLM"), None);
        assert_eq!(
            canonical_identifier(IdPrefix::Claim, " CLM 77 "),
            Some("CLM77".to_string())
        );
    }
}

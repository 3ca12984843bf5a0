/// Postal code validation
///
/// Codes are stored sanitized (digits only, at most five) on every edit;
/// full validation additionally requires the prefix to resolve to a region.
use crate::region;

/// Required number of digits
pub const POSTAL_CODE_LEN: usize = 5;

/// Message shown when a submitted code is rejected
pub const INVALID_POSTAL_CODE_MESSAGE: &str = "Please enter a valid 5-digit US ZIP code";

/// Strip non-digits and truncate to five characters
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(POSTAL_CODE_LEN)
        .collect()
}

/// Exactly five ASCII digits
pub fn is_complete(code: &str) -> bool {
    code.len() == POSTAL_CODE_LEN && code.bytes().all(|b| b.is_ascii_digit())
}

/// Five digits and a prefix known to the region table
pub fn is_valid(code: &str) -> bool {
    is_complete(code) && region::resolve_postal_code(code).is_some()
}

/// Region shown while typing, before the code is submitted.
///
/// Only complete codes produce a hint; partial input never resolves.
pub fn region_hint(code: &str) -> Option<&'static str> {
    if is_complete(code) {
        region::resolve_postal_code(code)
    } else {
        None
    }
}

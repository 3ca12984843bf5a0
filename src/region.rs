/// Postal-code prefix to region lookup
///
/// Regions are US states keyed by the first two digits of a ZIP code. The
/// table is kept exactly as authored, including the duplicate `"03"` key:
/// later entries win, so `"03"` resolves to New Hampshire and the Maine entry
/// is shadowed.
use std::collections::HashMap;
use std::sync::OnceLock;

/// Region table in registration order
const REGION_TABLE: &[(&str, &str)] = &[
    ("35", "Alabama"),
    ("99", "Alaska"),
    ("85", "Arizona"),
    ("71", "Arkansas"),
    ("90", "California"),
    ("80", "Colorado"),
    ("06", "Connecticut"),
    ("19", "Delaware"),
    ("32", "Florida"),
    ("30", "Georgia"),
    ("96", "Hawaii"),
    ("83", "Idaho"),
    ("60", "Illinois"),
    ("46", "Indiana"),
    ("50", "Iowa"),
    ("66", "Kansas"),
    ("40", "Kentucky"),
    ("70", "Louisiana"),
    ("03", "Maine"),
    ("20", "Maryland"),
    ("01", "Massachusetts"),
    ("48", "Michigan"),
    ("55", "Minnesota"),
    ("38", "Mississippi"),
    ("63", "Missouri"),
    ("59", "Montana"),
    ("68", "Nebraska"),
    ("88", "Nevada"),
    ("03", "New Hampshire"),
    ("07", "New Jersey"),
    ("87", "New Mexico"),
    ("10", "New York"),
    ("27", "North Carolina"),
    ("58", "North Dakota"),
    ("43", "Ohio"),
    ("73", "Oklahoma"),
    ("97", "Oregon"),
    ("15", "Pennsylvania"),
    ("02", "Rhode Island"),
    ("29", "South Carolina"),
    ("57", "South Dakota"),
    ("37", "Tennessee"),
    ("75", "Texas"),
    ("84", "Utah"),
    ("05", "Vermont"),
    ("22", "Virginia"),
    ("98", "Washington"),
    ("24", "West Virginia"),
    ("53", "Wisconsin"),
    ("82", "Wyoming"),
];

/// Number of leading digits used as the lookup key
pub const PREFIX_LEN: usize = 2;

fn index() -> &'static HashMap<&'static str, &'static str> {
    static INDEX: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

    INDEX.get_or_init(|| {
        let mut map = HashMap::with_capacity(REGION_TABLE.len());
        for &(prefix, region) in REGION_TABLE {
            if let Some(previous) = map.insert(prefix, region) {
                tracing::warn!(
                    "Region prefix {} registered twice: {} replaced by {}",
                    prefix,
                    previous,
                    region
                );
            }
        }
        map
    })
}

/// Resolve a two-digit prefix to its region
pub fn resolve(prefix: &str) -> Option<&'static str> {
    if prefix.len() != PREFIX_LEN || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    index().get(prefix).copied()
}

/// Resolve the region for a full postal code by its prefix
pub fn resolve_postal_code(code: &str) -> Option<&'static str> {
    code.get(..PREFIX_LEN).and_then(resolve)
}

/// The table as authored, duplicates included
pub fn entries() -> &'static [(&'static str, &'static str)] {
    REGION_TABLE
}

/// Entries hidden by a later registration of the same prefix
pub fn shadowed_entries() -> Vec<(&'static str, &'static str)> {
    REGION_TABLE
        .iter()
        .enumerate()
        .filter(|(i, (prefix, _))| {
            REGION_TABLE[i + 1..].iter().any(|(later, _)| later == prefix)
        })
        .map(|(_, entry)| *entry)
        .collect()
}

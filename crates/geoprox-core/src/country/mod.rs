// crates/geoprox-core/src/country/mod.rs

//! # Country Code Resolver
//!
//! The facilities dataset names countries in plain English ("Afghanistan"),
//! the schools API keys them by ISO3 ("AFG"). Every country-scoped query
//! that crosses the two datasets goes through [`resolve`] first.

mod table;

use crate::text::fold_key;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Sentinel used by the filter for "no country restriction".
pub const ALL_COUNTRIES: &str = "all";

static NAME_INDEX: Lazy<HashMap<String, &'static str>> = Lazy::new(|| {
    table::COUNTRY_ISO3
        .iter()
        .map(|(name, iso3)| (fold_key(name), *iso3))
        .collect()
});

static KNOWN_CODES: Lazy<HashSet<&'static str>> =
    Lazy::new(|| table::COUNTRY_ISO3.iter().map(|(_, iso3)| *iso3).collect());

/// Map a human-readable country name to its ISO3 code.
///
/// Total: on a miss the input comes back unchanged, so callers that already
/// hold a code (or an unlisted territory) still get something comparable.
/// A known ISO3 code in any casing is returned upper-cased.
///
/// ```rust
/// use geoprox_core::country::resolve;
///
/// assert_eq!(resolve("Afghanistan"), "AFG");
/// assert_eq!(resolve("côte d'ivoire"), "CIV");
/// assert_eq!(resolve("Nonexistent Land"), "Nonexistent Land");
/// ```
pub fn resolve(display_name: &str) -> String {
    lookup(display_name)
        .map(str::to_owned)
        .unwrap_or_else(|| display_name.to_owned())
}

/// Like [`resolve`] but reports misses instead of falling back.
pub fn lookup(display_name: &str) -> Option<&'static str> {
    if let Some(iso3) = NAME_INDEX.get(&fold_key(display_name)) {
        return Some(iso3);
    }
    let trimmed = display_name.trim();
    if trimmed.len() == 3 {
        let upper = trimmed.to_ascii_uppercase();
        return KNOWN_CODES.get(upper.as_str()).copied();
    }
    None
}

/// `true` if `selection` is the "all countries" sentinel.
#[inline]
pub fn is_all(selection: &str) -> bool {
    selection.trim().eq_ignore_ascii_case(ALL_COUNTRIES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_names() {
        assert_eq!(resolve("Afghanistan"), "AFG");
        assert_eq!(resolve("  united kingdom "), "GBR");
        assert_eq!(resolve("Democratic Republic of the Congo"), "COD");
        assert_eq!(resolve("Türkiye"), "TUR");
        assert_eq!(resolve("Turkey"), "TUR");
    }

    #[test]
    fn falls_back_to_identity() {
        assert_eq!(resolve("Nonexistent Land"), "Nonexistent Land");
        assert_eq!(resolve(""), "");
        assert_eq!(lookup("Nonexistent Land"), None);
    }

    #[test]
    fn accepts_codes_already_resolved() {
        assert_eq!(resolve("AFG"), "AFG");
        assert_eq!(resolve("afg"), "AFG");
        // Three letters but not a code we know.
        assert_eq!(resolve("XYZ"), "XYZ");
    }

    #[test]
    fn table_has_no_conflicting_duplicates() {
        let mut seen: HashMap<String, &str> = HashMap::new();
        for (name, iso3) in table::COUNTRY_ISO3 {
            assert_eq!(iso3.len(), 3, "{name} maps to {iso3}");
            if let Some(prev) = seen.insert(fold_key(name), iso3) {
                assert_eq!(prev, *iso3, "{name} is listed twice with different codes");
            }
        }
    }

    #[test]
    fn all_sentinel_is_case_insensitive() {
        assert!(is_all("all"));
        assert!(is_all(" ALL "));
        assert!(!is_all("Albania"));
    }
}

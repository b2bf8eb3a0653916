// crates/geoprox-core/src/text.rs

/// Convert a string into a folded key suitable for lookups and comparison.
///
/// Transliterates Unicode to ASCII (`Côte d’Ivoire` -> `Cote d'Ivoire`),
/// lowercases, and collapses runs of whitespace so that sloppy spreadsheet
/// values still hit the lookup tables.
///
/// # Examples
///
/// ```rust
/// use geoprox_core::text::fold_key;
///
/// assert_eq!(fold_key("  Côte d'Ivoire "), "cote d'ivoire");
/// assert_eq!(fold_key("TÜRKIYE"), "turkiye");
/// ```
pub fn fold_key(s: &str) -> String {
    let ascii = deunicode::deunicode(s).to_lowercase();
    ascii.split_whitespace().collect::<Vec<_>>().join(" ")
}

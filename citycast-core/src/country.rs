//! Country code to display name lookup.

use std::fmt::Debug;

pub trait CountryNames: Send + Sync + Debug {
    /// Display name for an ISO 3166 alpha-2 `code`. Unknown codes come back unchanged.
    fn display_name(&self, code: &str) -> String;
}

/// Small built-in table covering the most commonly searched countries.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCountries;

const COUNTRIES: &[(&str, &str)] = &[
    ("US", "United States"),
    ("GB", "United Kingdom"),
    ("CA", "Canada"),
    ("AU", "Australia"),
    ("DE", "Germany"),
    ("FR", "France"),
    ("JP", "Japan"),
    ("CN", "China"),
    ("IN", "India"),
    ("BR", "Brazil"),
    ("RU", "Russia"),
    ("IT", "Italy"),
    ("ES", "Spain"),
    ("MX", "Mexico"),
    ("KR", "South Korea"),
    ("NL", "Netherlands"),
    ("SE", "Sweden"),
    ("NO", "Norway"),
    ("DK", "Denmark"),
    ("FI", "Finland"),
];

impl CountryNames for BuiltinCountries {
    fn display_name(&self, code: &str) -> String {
        COUNTRIES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, name)| (*name).to_string())
            .unwrap_or_else(|| code.to_string())
    }
}

// crates/geoprox-core/src/model/raw.rs

//! Wire shapes of the two upstream datasets.
//! NOTE: These types mirror external documents; they are not part of the
//! normalized model and are only consumed by [`super::convert`].

use serde::Deserialize;
use serde_json::Value;

/// A coordinate that may arrive as a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Num(f64),
    Text(String),
}

impl RawNumber {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawNumber::Num(n) => Some(*n),
            RawNumber::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

/// A text cell that spreadsheet exports sometimes leave as a number or bool.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawText {
    Text(String),
    Num(serde_json::Number),
    Flag(bool),
}

impl RawText {
    pub fn into_text(self) -> String {
        match self {
            RawText::Text(s) => s,
            RawText::Num(n) => n.to_string(),
            RawText::Flag(b) => b.to_string(),
        }
    }
}

/// One row of the facilities spreadsheet export.
#[derive(Debug, Clone, Deserialize)]
pub struct FacilityRaw {
    #[serde(rename = "Latitude", default)]
    pub latitude: Option<RawNumber>,
    #[serde(rename = "Longitude", default)]
    pub longitude: Option<RawNumber>,
    #[serde(rename = "Health facility type", default)]
    pub facility_type: Option<RawText>,
    #[serde(rename = "Facility name", default)]
    pub name: Option<RawText>,
    #[serde(rename = "Country", default)]
    pub country: Option<RawText>,
}

/// `{ success, data }` wrapper around the facilities export.
///
/// Rows stay as plain JSON until [`super::convert`] decodes them one by one,
/// so a single malformed row cannot sink the document.
#[derive(Debug, Deserialize)]
pub struct FacilitiesDocument {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<Vec<Value>>,
}

/// One school from the paged API.
#[derive(Debug, Clone, Deserialize)]
pub struct SchoolRaw {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub school_id: Option<Value>,
    #[serde(default)]
    pub latitude: Option<RawNumber>,
    #[serde(default)]
    pub longitude: Option<RawNumber>,
    #[serde(default)]
    pub school_name: Option<RawText>,
    #[serde(default)]
    pub education_level: Option<RawText>,
    #[serde(default)]
    pub country_iso3_code: Option<RawText>,
}

/// Object form of a schools page: the records sit under `data` or `content`.
#[derive(Debug, Deserialize)]
pub struct SchoolEnvelope {
    #[serde(default)]
    pub data: Option<Vec<Value>>,
    #[serde(default)]
    pub content: Option<Vec<Value>>,
}

/// The three shapes a schools page may take. Rows are left undecoded.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SchoolPage {
    Bare(Vec<Value>),
    Wrapped(SchoolEnvelope),
}

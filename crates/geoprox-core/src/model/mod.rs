// crates/geoprox-core/src/model/mod.rs

//! # Data Model
//!
//! Normalized, immutable records produced by the loader. Raw JSON shapes
//! live in [`raw`] and are never exposed past [`convert`].

pub mod convert;
pub mod raw;

use crate::geo::GeoPoint;
use crate::traits::Located;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const UNKNOWN_COUNTRY: &str = "Unknown";
pub const UNKNOWN_FACILITY: &str = "Unknown Facility";
pub const UNKNOWN_SCHOOL: &str = "Unknown School";

/// Closed set of health facility categories.
///
/// Anything the source spells differently (or leaves empty) lands in
/// [`FacilityType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FacilityType {
    PrimaryHealthCare,
    Hospital,
    AmbulanceStation,
    BloodCentre,
    Pharmacy,
    SpecializedServices,
    TrainingFacility,
    ResidentialFacility,
    Other,
}

impl FacilityType {
    pub const ALL: [FacilityType; 9] = [
        FacilityType::PrimaryHealthCare,
        FacilityType::Hospital,
        FacilityType::AmbulanceStation,
        FacilityType::BloodCentre,
        FacilityType::Pharmacy,
        FacilityType::SpecializedServices,
        FacilityType::TrainingFacility,
        FacilityType::ResidentialFacility,
        FacilityType::Other,
    ];

    /// Label as it appears in the facilities dataset.
    pub fn label(&self) -> &'static str {
        match self {
            FacilityType::PrimaryHealthCare => "Primary Health Care Centres",
            FacilityType::Hospital => "Hospitals",
            FacilityType::AmbulanceStation => "Ambulance Stations",
            FacilityType::BloodCentre => "Blood Centres",
            FacilityType::Pharmacy => "Pharmacies",
            FacilityType::SpecializedServices => "Specialized Services",
            FacilityType::TrainingFacility => "Training Facilities",
            FacilityType::ResidentialFacility => "Residential Facilities",
            FacilityType::Other => "Other",
        }
    }

    /// Exact label match, ignoring case and surrounding whitespace.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(label))
    }

    /// Lenient parse used by the loader: unknown or absent becomes `Other`.
    pub fn parse_or_other(label: Option<&str>) -> Self {
        label.and_then(Self::from_label).unwrap_or(FacilityType::Other)
    }
}

impl fmt::Display for FacilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A school as served by the paged schools API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolRecord {
    /// Dataset id when provided, otherwise `"{ISO3}-{sequence}"`.
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    /// ISO3 code.
    pub country_code: String,
    pub name: String,
    pub education_level: Option<String>,
}

/// A health facility from the facilities document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub facility_type: FacilityType,
    /// Human-readable country name, not a code.
    pub country_name: String,
    pub name: String,
}

impl Located for SchoolRecord {
    #[inline]
    fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

impl Located for FacilityRecord {
    #[inline]
    fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

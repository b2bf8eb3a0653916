// crates/geoprox-core/src/lib.rs

//! Proximity engine for schools and health facilities.
//!
//! Loads a facilities dataset and per-country school pages, filters
//! facilities by type and country, and counts how many schools fall inside
//! the union of the visible facilities' buffer zones.
//!
//! ```rust
//! use geoprox_core::prelude::*;
//!
//! let facilities = [GeoPoint::new(34.5, 69.2)];
//! let schools = [GeoPoint::new(34.52, 69.21), GeoPoint::new(40.0, 40.0)];
//! let mask = BruteForce.in_buffer_mask(&facilities, &schools, 10.0);
//! assert_eq!(mask, vec![true, false]);
//! ```

pub mod country;
pub mod error;
pub mod filter;
pub mod geo;
pub mod loader;
pub mod model;
pub mod prelude;
pub mod proximity;
pub mod session;
pub mod stats;
pub mod text;
pub mod traits;

// Re-exports
pub use crate::error::{FilterError, LoadError, Result};
pub use crate::filter::{FilterState, FilterStore, Transition};
pub use crate::geo::{haversine_km, GeoPoint};
pub use crate::loader::{CancelToken, CountryLoad, DataSource, LoaderConfig, SchoolLoader};
#[cfg(feature = "http")]
pub use crate::loader::HttpSource;
pub use crate::model::{FacilityRecord, FacilityType, SchoolRecord};
pub use crate::proximity::{
    count_schools_in_buffer, BufferCounts, IdentityPolicy, ProximityConfig, ProximityEngine,
    Strategy,
};
pub use crate::session::Session;
pub use crate::stats::{country_stats, CountryStats};

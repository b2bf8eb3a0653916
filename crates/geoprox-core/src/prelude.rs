// crates/geoprox-core/src/prelude.rs
pub use crate::country::{is_all, resolve, ALL_COUNTRIES};
pub use crate::error::{FilterError, LoadError, Result};
pub use crate::filter::{FilterState, FilterStore, Transition};
pub use crate::geo::{haversine_km, GeoPoint};
pub use crate::loader::{
    load_facilities, CancelToken, CountryLoad, DataSource, LoaderConfig, SchoolLoader,
};
#[cfg(feature = "http")]
pub use crate::loader::HttpSource;
pub use crate::model::{FacilityRecord, FacilityType, SchoolRecord};
pub use crate::proximity::{
    count_schools_in_buffer, BruteForce, BufferCounts, GridSearch, IdentityPolicy,
    ProximityConfig, ProximityEngine, Strategy,
};
pub use crate::session::Session;
pub use crate::stats::{country_stats, CountryStats, REFERENCE_RADII_KM};
pub use crate::traits::{Identified, Located, ProximitySearch};

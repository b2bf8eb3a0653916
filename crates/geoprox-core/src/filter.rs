// crates/geoprox-core/src/filter.rs

//! # Filter State Store
//!
//! Holds the facility-type selection, the country selection and the buffer
//! radius, and derives which facilities are visible. Every setter is a plain
//! state transition that hands back the new state together with the
//! recomputed visible list; the caller decides what to redraw.

use crate::country::{is_all, ALL_COUNTRIES};
use crate::error::FilterError;
use crate::model::{FacilityRecord, FacilityType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const MIN_RADIUS_KM: f64 = 0.0;
pub const MAX_RADIUS_KM: f64 = 500.0;
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

/// Current selection. `selected_country` is a facility display name or
/// [`ALL_COUNTRIES`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub selected_types: BTreeSet<FacilityType>,
    pub selected_country: String,
    pub buffer_radius_km: f64,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            selected_types: FacilityType::ALL.into_iter().collect(),
            selected_country: ALL_COUNTRIES.to_owned(),
            buffer_radius_km: DEFAULT_RADIUS_KM,
        }
    }
}

impl FilterState {
    /// Visibility predicate: type selected, and country matches unless "all".
    ///
    /// Country comparison is exact on the display name; schools are never
    /// filtered here.
    pub fn is_visible(&self, facility: &FacilityRecord) -> bool {
        self.selected_types.contains(&facility.facility_type)
            && (is_all(&self.selected_country) || facility.country_name == self.selected_country)
    }

    pub fn visible_facilities<'a>(&self, all: &'a [FacilityRecord]) -> Vec<&'a FacilityRecord> {
        all.iter().filter(|f| self.is_visible(f)).collect()
    }

    pub fn with_types(mut self, types: impl IntoIterator<Item = FacilityType>) -> Self {
        self.selected_types = types.into_iter().collect();
        self
    }

    pub fn with_country(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.selected_country = if is_all(&name) {
            ALL_COUNTRIES.to_owned()
        } else {
            name
        };
        self
    }

    /// Clamps to `[0, 500]` km; NaN is rejected.
    pub fn with_radius(mut self, km: f64) -> Result<Self, FilterError> {
        if km.is_nan() {
            return Err(FilterError::InvalidRadius(km));
        }
        self.buffer_radius_km = km.clamp(MIN_RADIUS_KM, MAX_RADIUS_KM);
        Ok(self)
    }
}

/// Result of a state transition.
#[derive(Debug, Clone)]
pub struct Transition<'a> {
    pub state: FilterState,
    pub visible: Vec<&'a FacilityRecord>,
}

/// Owner of the live [`FilterState`].
#[derive(Debug, Clone, Default)]
pub struct FilterStore {
    state: FilterState,
}

impl FilterStore {
    pub fn new(state: FilterState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn visible_facilities<'a>(&self, all: &'a [FacilityRecord]) -> Vec<&'a FacilityRecord> {
        self.state.visible_facilities(all)
    }

    pub fn set_selected_types<'a>(
        &mut self,
        types: impl IntoIterator<Item = FacilityType>,
        all: &'a [FacilityRecord],
    ) -> Transition<'a> {
        self.state = self.state.clone().with_types(types);
        self.transition(all)
    }

    pub fn set_selected_country<'a>(
        &mut self,
        name: impl Into<String>,
        all: &'a [FacilityRecord],
    ) -> Transition<'a> {
        self.state = self.state.clone().with_country(name);
        self.transition(all)
    }

    /// Radius does not affect visibility, but the transition still reports
    /// the visible list so every setter has the same shape.
    pub fn set_buffer_radius<'a>(
        &mut self,
        km: f64,
        all: &'a [FacilityRecord],
    ) -> Result<Transition<'a>, FilterError> {
        self.state = self.state.clone().with_radius(km)?;
        Ok(self.transition(all))
    }

    fn transition<'a>(&self, all: &'a [FacilityRecord]) -> Transition<'a> {
        Transition {
            state: self.state.clone(),
            visible: self.state.visible_facilities(all),
        }
    }
}

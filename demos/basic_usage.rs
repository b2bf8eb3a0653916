//! Basic usage example for geoprox-rs
//!
//! This example demonstrates how to:
//! - Feed a session from an in-memory data source
//! - Filter facilities by type and country
//! - Count schools inside the buffer zones
//! - Compute fixed-radius country statistics

use geoprox_rs::model::raw::FacilitiesDocument;
use geoprox_rs::prelude::*;
use serde_json::json;

/// Two facilities and one page of schools, served from memory.
struct Demo;

impl DataSource for Demo {
    fn facilities_document(&self) -> Result<FacilitiesDocument> {
        Ok(serde_json::from_value(json!({
            "success": true,
            "data": [
                { "Latitude": 34.5, "Longitude": 69.2, "Health facility type": "Hospitals",
                  "Facility name": "Kabul General", "Country": "Afghanistan" },
                { "Latitude": 31.6, "Longitude": 65.7, "Health facility type": "Pharmacies",
                  "Facility name": "Kandahar Pharmacy", "Country": "Afghanistan" }
            ]
        }))?)
    }

    fn school_page(&self, iso3: &str, page: u32, _size: usize) -> Result<Vec<serde_json::Value>> {
        if iso3 != "AFG" || page > 1 {
            return Ok(Vec::new());
        }
        Ok(vec![
            json!({ "id": "s1", "latitude": 34.52, "longitude": 69.21, "school_name": "North" }),
            json!({ "id": "s2", "latitude": 31.65, "longitude": 65.7, "school_name": "South" }),
            json!({ "id": "s3", "latitude": 36.0, "longitude": 71.0, "school_name": "Far" }),
        ])
    }
}

fn main() -> Result<()> {
    println!("=== GeoProx-RS Basic Usage Example ===\n");

    let mut session = Session::with_source(Demo);
    let n = session.load_facilities()?;
    println!("✓ {n} facilities loaded");

    // Example 1: resolve and load a country
    println!("\n--- Example 1: Load schools for a country ---");
    println!("Afghanistan -> {}", resolve("Afghanistan"));
    for school in session.load_schools_for_country("Afghanistan")? {
        println!("  {} ({:.2}, {:.2})", school.name, school.latitude, school.longitude);
    }
    let again = session.load_schools_report("Afghanistan")?;
    println!("reload served from memory: {}", again.cached);

    // Example 2: buffer counts at the default radius
    println!("\n--- Example 2: Buffer counts ---");
    let counts = session.buffer_counts();
    println!(
        "{} km: {} in, {} out",
        session.filter_state().buffer_radius_km,
        counts.in_count,
        counts.out_count
    );

    // Example 3: narrow to hospitals and shrink the radius
    println!("\n--- Example 3: Hospitals only, 5 km ---");
    session.set_selected_types([FacilityType::Hospital]);
    if let Err(e) = session.set_buffer_radius(5.0) {
        println!("radius rejected: {e}");
    }
    let counts = session.buffer_counts();
    println!("{} in, {} out", counts.in_count, counts.out_count);

    // Example 4: country statistics
    println!("\n--- Example 4: Country statistics ---");
    let stats = session.country_stats("Afghanistan");
    for (radius, within) in REFERENCE_RADII_KM
        .iter()
        .zip([stats.within_5km, stats.within_10km, stats.within_50km])
    {
        println!("within {radius} km: {within}/{}", stats.total_schools);
    }

    Ok(())
}

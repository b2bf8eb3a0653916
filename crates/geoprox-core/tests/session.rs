use geoprox_core::model::raw::FacilitiesDocument;
use geoprox_core::prelude::*;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory stand-in for the facilities export and the paged schools API.
struct Scripted {
    facilities: Value,
    pages: HashMap<&'static str, Vec<Vec<Value>>>,
    fail_once: RefCell<Option<(&'static str, u32)>>,
    requests: RefCell<Vec<(String, u32)>>,
}

impl Scripted {
    fn new() -> Self {
        let facilities = json!({
            "success": true,
            "data": [
                { "Latitude": 34.5, "Longitude": 69.2, "Health facility type": "Hospitals",
                  "Facility name": "Kabul General", "Country": "Afghanistan" },
                { "Latitude": "31.6", "Longitude": "65.7", "Health facility type": "Pharmacies",
                  "Facility name": "Kandahar Pharmacy", "Country": "Afghanistan" },
                { "Latitude": 33.7, "Longitude": 73.0, "Health facility type": "Hospitals",
                  "Facility name": "Islamabad Central", "Country": "Pakistan" },
                { "Latitude": "abc", "Longitude": 1.0, "Health facility type": "Hospitals",
                  "Country": "Pakistan" },
                { "Latitude": 0.0, "Longitude": 0.0, "Health facility type": "Mystery" }
            ]
        });

        let mut pages = HashMap::new();
        pages.insert(
            "AFG",
            vec![
                vec![
                    school("afg-1", 34.52, 69.21),
                    school("afg-2", 34.52, 69.21),
                ],
                vec![school("afg-3", 31.65, 65.7), school("afg-4", 36.0, 71.0)],
                vec![school("afg-5", 34.58, 69.2)],
            ],
        );
        pages.insert("PAK", vec![vec![school("pak-1", 33.71, 73.0)]]);

        Self {
            facilities,
            pages,
            fail_once: RefCell::new(None),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn requests_for(&self, iso3: &str) -> Vec<u32> {
        self.requests
            .borrow()
            .iter()
            .filter(|(c, _)| c == iso3)
            .map(|(_, p)| *p)
            .collect()
    }
}

fn school(id: &str, lat: f64, lng: f64) -> Value {
    json!({ "id": id, "latitude": lat, "longitude": lng, "school_name": id })
}

impl DataSource for Scripted {
    fn facilities_document(&self) -> Result<FacilitiesDocument> {
        Ok(serde_json::from_value(self.facilities.clone())?)
    }

    fn school_page(&self, iso3: &str, page: u32, _page_size: usize) -> Result<Vec<Value>> {
        self.requests.borrow_mut().push((iso3.to_owned(), page));

        let failing = *self.fail_once.borrow();
        if let Some((country, failing_page)) = failing {
            if country == iso3 && failing_page == page {
                self.fail_once.borrow_mut().take();
                return Err(LoadError::Status {
                    status: 502,
                    url: format!("http://schools.test/?country_iso3_code={iso3}&page={page}"),
                });
            }
        }

        let rows = self
            .pages
            .get(iso3)
            .and_then(|p| p.get(page as usize - 1))
            .cloned()
            .unwrap_or_default();
        Ok(rows)
    }
}

fn session_with(identity: IdentityPolicy, strategy: Strategy) -> Session<Scripted> {
    let loader = LoaderConfig {
        page_size: 2,
        ..Default::default()
    };
    Session::new(Scripted::new(), &loader, ProximityConfig { identity, strategy })
}

fn session() -> Session<Scripted> {
    session_with(IdentityPolicy::Coordinates, Strategy::BruteForce)
}

#[test]
fn facilities_are_normalized_on_load() {
    let mut s = session();
    assert_eq!(s.load_facilities().unwrap(), 4);
    assert_eq!(s.countries(), vec!["Afghanistan", "Pakistan", "Unknown"]);

    let unknown = &s.facilities()[3];
    assert_eq!(unknown.facility_type, FacilityType::Other);
    assert_eq!(unknown.name, "Unknown Facility");
    assert_eq!((unknown.latitude, unknown.longitude), (0.0, 0.0));

    // Second call is served from memory.
    assert_eq!(s.load_facilities().unwrap(), 4);
}

#[test]
fn country_is_fetched_once_and_stops_at_short_page() {
    let mut s = session();
    let first = s.load_schools_report("Afghanistan").unwrap();
    assert_eq!(first.pages_requested, 3);
    assert_eq!(first.added, 5);

    let second = s.load_schools_report("Afghanistan").unwrap();
    assert!(second.cached);
    assert_eq!(s.source().requests_for("AFG"), vec![1, 2, 3]);
    assert_eq!(s.schools().len(), 5);
    assert!(s.schools().iter().all(|school| school.country_code == "AFG"));
}

#[test]
fn filters_drive_the_buffer_counts() {
    let mut s = session();
    s.load_facilities().unwrap();
    s.load_schools_for_country("AFG").unwrap();

    // Default: every type, every country, 10 km. afg-1/afg-2 share coordinates.
    assert_eq!(s.buffer_counts(), BufferCounts { in_count: 3, out_count: 2 });

    let t = s.set_selected_types([FacilityType::Hospital]);
    assert_eq!(t.visible.len(), 2);
    assert_eq!(s.buffer_counts(), BufferCounts { in_count: 2, out_count: 3 });

    let t = s.set_selected_country("Pakistan");
    assert_eq!(t.visible.len(), 1);
    assert_eq!(s.buffer_counts(), BufferCounts { in_count: 0, out_count: 5 });

    s.focus_country("Pakistan").unwrap();
    assert_eq!(s.schools().len(), 6);
    assert_eq!(s.buffer_counts(), BufferCounts { in_count: 1, out_count: 5 });

    s.set_selected_types(Vec::<FacilityType>::new());
    assert!(s.visible_facilities().is_empty());
    assert_eq!(s.buffer_counts(), BufferCounts { in_count: 0, out_count: 6 });
}

#[test]
fn radius_changes_are_monotonic_for_every_engine() {
    for strategy in [Strategy::BruteForce, Strategy::Grid] {
        for identity in [IdentityPolicy::Coordinates, IdentityPolicy::RecordId] {
            let mut s = session_with(identity, strategy);
            s.load_facilities().unwrap();
            s.load_schools_for_country("AFG").unwrap();
            s.load_schools_for_country("PAK").unwrap();

            let mut previous = 0;
            for km in [0.0, 2.0, 5.0, 10.0, 100.0, 300.0, 500.0] {
                s.set_buffer_radius(km).unwrap();
                let counts = s.buffer_counts();
                assert!(counts.in_count >= previous, "{strategy:?}/{identity:?} at {km}");
                assert_eq!(counts.total(), 6);
                previous = counts.in_count;
            }
        }
    }
}

#[test]
fn radius_is_clamped_and_nan_leaves_state_alone() {
    let mut s = session();
    assert_eq!(s.set_buffer_radius(1e6).unwrap().state.buffer_radius_km, 500.0);
    assert!(s.set_buffer_radius(f64::NAN).is_err());
    assert_eq!(s.filter_state().buffer_radius_km, 500.0);
}

#[test]
fn country_stats_ignore_type_filter_and_live_radius() {
    let mut s = session();
    s.load_facilities().unwrap();
    s.load_schools_for_country("AFG").unwrap();
    s.set_selected_types([FacilityType::Hospital]);
    s.set_buffer_radius(0.0).unwrap();

    let stats = s.country_stats("Afghanistan");
    assert_eq!(
        stats,
        CountryStats {
            total_schools: 5,
            total_facilities: 2,
            within_5km: 1,
            within_10km: 3,
            within_50km: 3,
        }
    );

    let mut by_id = session_with(IdentityPolicy::RecordId, Strategy::Grid);
    by_id.load_facilities().unwrap();
    by_id.load_schools_for_country("AFG").unwrap();
    let stats = by_id.country_stats("Afghanistan");
    assert_eq!((stats.within_5km, stats.within_10km), (2, 4));
}

#[test]
fn failed_page_is_resumed_without_duplicates() {
    let mut s = session();
    *s.source().fail_once.borrow_mut() = Some(("AFG", 2));

    let err = s.load_schools_for_country("Afghanistan").unwrap_err();
    assert!(matches!(err, LoadError::Status { status: 502, .. }));
    assert_eq!(s.schools().len(), 2);
    assert!(!s.is_country_loaded("AFG"));

    s.load_schools_for_country("Afghanistan").unwrap();
    assert_eq!(s.schools().len(), 5);
    assert!(s.is_country_loaded("AFG"));
    assert_eq!(s.source().requests_for("AFG"), vec![1, 2, 2, 3]);
}

#[test]
fn cancelled_load_fetches_nothing_until_reset() {
    let mut s = session();
    let token = s.cancel_token();
    token.cancel();
    assert!(matches!(
        s.load_schools_for_country("PAK"),
        Err(LoadError::Cancelled)
    ));
    assert!(s.source().requests_for("PAK").is_empty());

    token.reset();
    let added = s.load_schools_for_country("PAK").unwrap();
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].id, "pak-1");
}

#[test]
fn type_counts_follow_visibility() {
    let mut s = session();
    s.load_facilities().unwrap();
    let counts = s.facility_type_counts();
    assert_eq!(counts.get(&FacilityType::Hospital), Some(&2));
    assert_eq!(counts.get(&FacilityType::Pharmacy), Some(&1));
    assert_eq!(counts.get(&FacilityType::Other), Some(&1));

    s.set_selected_country("Afghanistan");
    let counts = s.facility_type_counts();
    assert_eq!(counts.values().sum::<usize>(), 2);
    assert!(!counts.contains_key(&FacilityType::Other));
}

#[test]
fn load_returns_only_the_schools_it_added() {
    let mut s = session();
    let afg: Vec<String> = s
        .load_schools_for_country("Afghanistan")
        .unwrap()
        .iter()
        .map(|school| school.id.clone())
        .collect();
    assert_eq!(afg, vec!["afg-1", "afg-2", "afg-3", "afg-4", "afg-5"]);

    let pak = s.load_schools_for_country("Pakistan").unwrap();
    assert_eq!(pak.len(), 1);
    assert_eq!(pak[0].country_code, "PAK");

    assert!(s.load_schools_for_country("Afghanistan").unwrap().is_empty());
    assert!(s.load_schools_for_country("all").unwrap().is_empty());
    assert!(s.source().requests_for("ALL").is_empty());
    assert_eq!(s.schools().len(), 6);
}

#[test]
fn malformed_rows_are_skipped_not_fatal() {
    let mut source = Scripted::new();
    source.facilities["data"]
        .as_array_mut()
        .unwrap()
        .push(json!({ "Latitude": 35.0, "Longitude": 70.0, "Facility name": 4711 }));
    source.pages.insert(
        "IRN",
        vec![vec![
            json!({ "id": 1, "school_id": "G-1", "latitude": 35.7, "longitude": 51.4 }),
            json!({ "id": 2, "latitude": 35.8, "longitude": 51.4, "school_name": 12 }),
            json!({ "id": 3, "latitude": { "deg": 35 }, "longitude": 51.4 }),
        ]],
    );
    let loader = LoaderConfig {
        page_size: 5,
        ..Default::default()
    };
    let mut s = Session::new(source, &loader, ProximityConfig::default());

    assert_eq!(s.load_facilities().unwrap(), 5);
    assert_eq!(s.facilities()[4].name, "4711");

    let added = s.load_schools_for_country("Iran").unwrap();
    let ids: Vec<&str> = added.iter().map(|school| school.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(added[1].name, "12");
    assert!(s.is_country_loaded("IRN"));
}

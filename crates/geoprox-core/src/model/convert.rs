// crates/geoprox-core/src/model/convert.rs
use super::raw::{FacilitiesDocument, FacilityRaw, RawNumber, RawText, SchoolPage, SchoolRaw};
use super::{
    FacilityRecord, FacilityType, SchoolRecord, UNKNOWN_COUNTRY, UNKNOWN_FACILITY, UNKNOWN_SCHOOL,
};
use crate::error::{LoadError, Result};
use crate::geo::GeoPoint;
use serde_json::Value;
use tracing::{debug, warn};

/// **Facilities Converter:** Document -> Records.
///
/// A document with `success: false` or without `data` is a payload error.
/// Rows that do not decode, or decode without usable coordinates, are
/// dropped and counted.
pub fn facilities_from_document(doc: FacilitiesDocument) -> Result<Vec<FacilityRecord>> {
    if !doc.success {
        return Err(LoadError::Payload(
            "facilities document reports success = false".into(),
        ));
    }
    let rows = doc
        .data
        .ok_or_else(|| LoadError::Payload("facilities document has no `data` array".into()))?;

    let total = rows.len();
    let mut malformed = 0usize;
    let mut records = Vec::with_capacity(total);
    for (seq, row) in rows.into_iter().enumerate() {
        match serde_json::from_value::<FacilityRaw>(row) {
            Ok(raw) => records.extend(facility_from_raw(raw, seq)),
            Err(e) => {
                debug!(seq, error = %e, "facility row does not decode");
                malformed += 1;
            }
        }
    }

    let skipped = total - records.len();
    if skipped > 0 {
        warn!(
            skipped,
            malformed,
            total,
            "dropped facilities that were malformed or had no valid coordinates"
        );
    }
    Ok(records)
}

pub fn facility_from_raw(raw: FacilityRaw, seq: usize) -> Option<FacilityRecord> {
    let point = parse_point(raw.latitude.as_ref(), raw.longitude.as_ref())?;
    let facility_type = non_blank(raw.facility_type);
    Some(FacilityRecord {
        id: format!("F{seq}"),
        latitude: point.lat,
        longitude: point.lng,
        facility_type: FacilityType::parse_or_other(facility_type.as_deref()),
        country_name: non_blank(raw.country).unwrap_or_else(|| UNKNOWN_COUNTRY.to_owned()),
        name: non_blank(raw.name).unwrap_or_else(|| UNKNOWN_FACILITY.to_owned()),
    })
}

/// Unwraps whichever of the three page shapes arrived. Rows come back
/// undecoded; the page length is what drives pagination.
pub fn school_page_rows(page: SchoolPage) -> Result<Vec<Value>> {
    match page {
        SchoolPage::Bare(rows) => Ok(rows),
        SchoolPage::Wrapped(env) => env.data.or(env.content).ok_or_else(|| {
            LoadError::Payload("schools page has neither `data` nor `content`".into())
        }),
    }
}

/// **Schools Converter:** JSON row -> Record. `None` when the row does not
/// decode or has no usable coordinates.
pub fn school_from_row(row: Value, requested_iso3: &str, seq: usize) -> Option<SchoolRecord> {
    match serde_json::from_value::<SchoolRaw>(row) {
        Ok(raw) => school_from_raw(raw, requested_iso3, seq),
        Err(e) => {
            debug!(%requested_iso3, error = %e, "school row does not decode");
            None
        }
    }
}

/// **Schools Converter:** Raw -> Record.
///
/// `requested_iso3` fills in a missing `country_iso3_code`; `seq` numbers
/// the school within its country for the synthetic id. `id` wins over
/// `school_id` when both are present.
pub fn school_from_raw(raw: SchoolRaw, requested_iso3: &str, seq: usize) -> Option<SchoolRecord> {
    let Some(point) = parse_point(raw.latitude.as_ref(), raw.longitude.as_ref()) else {
        debug!(?raw.id, ?raw.school_id, "school without valid coordinates skipped");
        return None;
    };
    let country_code = non_blank(raw.country_iso3_code)
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or_else(|| requested_iso3.to_owned());
    let id = raw
        .id
        .as_ref()
        .and_then(id_string)
        .or_else(|| raw.school_id.as_ref().and_then(id_string))
        .unwrap_or_else(|| format!("{requested_iso3}-{seq}"));

    Some(SchoolRecord {
        id,
        latitude: point.lat,
        longitude: point.lng,
        country_code,
        name: non_blank(raw.school_name).unwrap_or_else(|| UNKNOWN_SCHOOL.to_owned()),
        education_level: non_blank(raw.education_level),
    })
}

fn parse_point(lat: Option<&RawNumber>, lng: Option<&RawNumber>) -> Option<GeoPoint> {
    GeoPoint::checked(lat?.as_f64()?, lng?.as_f64()?)
}

fn non_blank(s: Option<RawText>) -> Option<String> {
    s.map(|v| v.into_text().trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn id_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(json: &str) -> FacilitiesDocument {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn converts_facility_rows_with_defaults() {
        let records = facilities_from_document(doc(
            r#"{ "success": true, "data": [
                { "Latitude": 34.5, "Longitude": 69.2, "Health facility type": "Hospitals",
                  "Facility name": "Kabul General", "Country": "Afghanistan" },
                { "Latitude": "35.1", "Longitude": " 70.0 " },
                { "Latitude": null, "Longitude": 70.0, "Facility name": "No position" },
                { "Latitude": 95.0, "Longitude": 70.0 }
            ] }"#,
        ))
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].facility_type, FacilityType::Hospital);
        assert_eq!(records[0].country_name, "Afghanistan");
        assert_eq!(records[1].facility_type, FacilityType::Other);
        assert_eq!(records[1].country_name, UNKNOWN_COUNTRY);
        assert_eq!(records[1].name, UNKNOWN_FACILITY);
        assert_eq!(records[1].latitude, 35.1);
        assert_ne!(records[0].id, records[1].id);
    }

    #[test]
    fn unsuccessful_or_empty_document_is_a_payload_error() {
        let err = facilities_from_document(doc(r#"{ "success": false, "data": [] }"#));
        assert!(matches!(err, Err(LoadError::Payload(_))));

        let err = facilities_from_document(doc(r#"{ "success": true }"#));
        assert!(matches!(err, Err(LoadError::Payload(_))));
    }

    #[test]
    fn accepts_all_three_page_shapes() {
        let bare: SchoolPage = serde_json::from_str(r#"[{ "latitude": 1, "longitude": 2 }]"#).unwrap();
        let data: SchoolPage =
            serde_json::from_str(r#"{ "data": [{ "latitude": 1, "longitude": 2 }] }"#).unwrap();
        let content: SchoolPage =
            serde_json::from_str(r#"{ "content": [], "totalPages": 3 }"#).unwrap();

        assert_eq!(school_page_rows(bare).unwrap().len(), 1);
        assert_eq!(school_page_rows(data).unwrap().len(), 1);
        assert!(school_page_rows(content).unwrap().is_empty());

        let neither: SchoolPage = serde_json::from_str(r#"{ "items": [] }"#).unwrap();
        assert!(matches!(school_page_rows(neither), Err(LoadError::Payload(_))));
    }

    #[test]
    fn one_bad_facility_row_does_not_sink_the_document() {
        let records = facilities_from_document(doc(
            r#"{ "success": true, "data": [
                { "Latitude": 34.5, "Longitude": 69.2, "Facility name": "Good" },
                { "Latitude": 35, "Longitude": 70, "Facility name": 4711, "Country": true },
                { "Latitude": [1, 2], "Longitude": 70, "Facility name": "Broken" },
                "not even an object"
            ] }"#,
        ))
        .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Good");
        assert_eq!(records[1].name, "4711");
        assert_eq!(records[1].country_name, "true");
    }

    #[test]
    fn one_bad_school_row_does_not_sink_the_page() {
        let page: SchoolPage = serde_json::from_str(
            r#"{ "data": [
                { "id": "a", "latitude": 34.5, "longitude": 69.2, "school_name": 12 },
                { "id": "b", "latitude": { "deg": 34 }, "longitude": 69.2 },
                { "id": "c", "latitude": 34.6, "longitude": 69.3, "education_level": 3 }
            ] }"#,
        )
        .unwrap();
        let rows = school_page_rows(page).unwrap();
        assert_eq!(rows.len(), 3);

        let schools: Vec<SchoolRecord> = rows
            .into_iter()
            .enumerate()
            .filter_map(|(seq, row)| school_from_row(row, "AFG", seq))
            .collect();
        assert_eq!(schools.len(), 2);
        assert_eq!(schools[0].name, "12");
        assert_eq!(schools[1].education_level.as_deref(), Some("3"));
    }

    #[test]
    fn row_with_both_id_fields_prefers_id() {
        let page: SchoolPage = serde_json::from_str(
            r#"[{ "id": 1, "school_id": "G-1", "latitude": 34.5, "longitude": 69.2 },
                { "id": null, "school_id": "G-2", "latitude": 34.5, "longitude": 69.2 }]"#,
        )
        .unwrap();
        let ids: Vec<String> = school_page_rows(page)
            .unwrap()
            .into_iter()
            .filter_map(|row| school_from_row(row, "AFG", 0))
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["1", "G-2"]);
    }

    #[test]
    fn school_ids_prefer_dataset_values() {
        let raw: SchoolRaw = serde_json::from_str(
            r#"{ "school_id": 991, "latitude": 34.52, "longitude": 69.21,
                 "school_name": "Lycee", "education_level": "Secondary",
                 "country_iso3_code": "afg" }"#,
        )
        .unwrap();
        let s = school_from_raw(raw, "AFG", 7).unwrap();
        assert_eq!(s.id, "991");
        assert_eq!(s.country_code, "AFG");
        assert_eq!(s.education_level.as_deref(), Some("Secondary"));

        let raw: SchoolRaw = serde_json::from_str(r#"{ "latitude": 1.0, "longitude": 2.0 }"#).unwrap();
        let s = school_from_raw(raw, "AFG", 7).unwrap();
        assert_eq!(s.id, "AFG-7");
        assert_eq!(s.name, UNKNOWN_SCHOOL);
        assert_eq!(s.education_level, None);
    }

    #[test]
    fn school_without_coordinates_is_skipped() {
        let raw: SchoolRaw = serde_json::from_str(r#"{ "latitude": "n/a", "longitude": 2.0 }"#).unwrap();
        assert!(school_from_raw(raw, "AFG", 0).is_none());
    }
}

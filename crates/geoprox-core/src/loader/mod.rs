// crates/geoprox-core/src/loader/mod.rs

//! # Remote Dataset Loader
//!
//! Two acquisition strategies behind one [`DataSource`] seam:
//!
//! - facilities: a single `{ success, data }` document,
//! - schools: a paged API, one country (ISO3) at a time, page size 1000 by
//!   default, stopping at the first short or empty page.
//!
//! [`SchoolLoader`] remembers which countries are complete and where an
//! interrupted country should resume, so repeated triggers never refetch
//! finished countries nor duplicate records already kept.

pub mod common_io;
#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::HttpSource;

use crate::country::{is_all, resolve, ALL_COUNTRIES};
use crate::error::{LoadError, Result};
use crate::model::convert::{facilities_from_document, school_from_row};
use crate::model::raw::FacilitiesDocument;
use crate::model::{FacilityRecord, SchoolRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_PAGE_SIZE: usize = 1000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_PAGES: u32 = 10_000;

/// Where the two datasets come from and how to page through schools.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Remote facilities document. Ignored when `facilities_path` is set.
    pub facilities_url: Option<String>,
    /// Local facilities document (`.json` or `.json.gz`).
    pub facilities_path: Option<PathBuf>,
    /// Paged schools endpoint, queried with `country_iso3_code`, `page`, `size`.
    pub schools_url: String,
    pub page_size: usize,
    /// Upper bound on pages per country, in case an API never returns a short page.
    pub max_pages: u32,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            facilities_url: None,
            facilities_path: None,
            schools_url: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: concat!("geoprox/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

/// Transport for both datasets. Implementations only fetch and decode;
/// paging policy, memoization and normalization live in the loader.
pub trait DataSource {
    /// The whole facilities document.
    fn facilities_document(&self) -> Result<FacilitiesDocument>;

    /// Page `page` (1-indexed) of schools for one ISO3 code, unwrapped from
    /// whichever page shape the API used. Rows stay undecoded so the loader
    /// can drop bad ones without losing the page length.
    fn school_page(&self, iso3: &str, page: u32, page_size: usize) -> Result<Vec<Value>>;
}

impl<T: DataSource + ?Sized> DataSource for &T {
    fn facilities_document(&self) -> Result<FacilitiesDocument> {
        (**self).facilities_document()
    }

    fn school_page(&self, iso3: &str, page: u32, page_size: usize) -> Result<Vec<Value>> {
        (**self).school_page(iso3, page, page_size)
    }
}

/// Cooperative cancellation flag, checked before every page request.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// **Facilities Loader:** one request, normalized records.
pub fn load_facilities<S: DataSource>(source: &S) -> Result<Vec<FacilityRecord>> {
    let doc = source.facilities_document()?;
    let records = facilities_from_document(doc)?;
    info!(count = records.len(), "loaded health facilities");
    Ok(records)
}

/// Progress of a country whose pagination has not finished yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    next_page: u32,
    /// Schools already kept for this country; numbers synthetic ids.
    kept: usize,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            next_page: 1,
            kept: 0,
        }
    }
}

/// What one call to [`SchoolLoader::load_country`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryLoad {
    pub iso3: String,
    /// Number of page requests issued by this call.
    pub pages_requested: u32,
    /// Records appended to the sink by this call.
    pub added: usize,
    /// `true` when the country was already complete and nothing was fetched.
    pub cached: bool,
}

/// Paginating, memoizing schools loader.
#[derive(Debug, Clone)]
pub struct SchoolLoader {
    page_size: usize,
    max_pages: u32,
    loaded: HashSet<String>,
    cursors: HashMap<String, Cursor>,
    cancel: CancelToken,
}

impl Default for SchoolLoader {
    fn default() -> Self {
        Self::new(&LoaderConfig::default())
    }
}

impl SchoolLoader {
    pub fn new(config: &LoaderConfig) -> Self {
        Self {
            page_size: config.page_size.max(1),
            max_pages: config.max_pages.max(1),
            loaded: HashSet::new(),
            cursors: HashMap::new(),
            cancel: CancelToken::new(),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Token that aborts the page loop of any in-progress or later load.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_loaded(&self, iso3: &str) -> bool {
        self.loaded.contains(iso3)
    }

    /// Page the next call for `iso3` would request, if unfinished.
    pub fn resume_page(&self, iso3: &str) -> Option<u32> {
        if self.is_loaded(iso3) {
            return None;
        }
        Some(self.cursors.get(iso3).copied().unwrap_or_default().next_page)
    }

    pub fn loaded_countries(&self) -> impl Iterator<Item = &str> {
        self.loaded.iter().map(String::as_str)
    }

    /// Fetch every remaining page for `country` (display name or ISO3) and
    /// append the normalized schools to `sink`.
    ///
    /// Pages are requested strictly in order. On a failed page the records
    /// already appended stay in `sink`, the country stays unfinished and the
    /// next call resumes at the failed page. The "all" selection names no
    /// country and fetches nothing.
    pub fn load_country<S: DataSource>(
        &mut self,
        source: &S,
        country: &str,
        sink: &mut Vec<SchoolRecord>,
    ) -> Result<CountryLoad> {
        if is_all(country) {
            return Ok(CountryLoad {
                iso3: ALL_COUNTRIES.to_owned(),
                pages_requested: 0,
                added: 0,
                cached: false,
            });
        }

        let iso3 = resolve(country).trim().to_ascii_uppercase();
        let mut report = CountryLoad {
            iso3: iso3.clone(),
            pages_requested: 0,
            added: 0,
            cached: false,
        };

        if self.loaded.contains(&iso3) {
            debug!(%iso3, "schools already loaded, skipping fetch");
            report.cached = true;
            return Ok(report);
        }

        let mut cursor = self.cursors.get(&iso3).copied().unwrap_or_default();
        if cursor.next_page > 1 {
            info!(%iso3, page = cursor.next_page, "resuming interrupted school load");
        }

        let outcome = loop {
            if self.cancel.is_cancelled() {
                break Err(LoadError::Cancelled);
            }
            if cursor.next_page > self.max_pages {
                break Err(LoadError::Payload(format!(
                    "schools for {iso3} exceed {} pages",
                    self.max_pages
                )));
            }

            let page = cursor.next_page;
            report.pages_requested += 1;
            let rows = match source.school_page(&iso3, page, self.page_size) {
                Ok(rows) => rows,
                Err(e) => break Err(e),
            };
            let received = rows.len();
            let before = report.added;
            for row in rows {
                if let Some(school) = school_from_row(row, &iso3, cursor.kept) {
                    sink.push(school);
                    cursor.kept += 1;
                    report.added += 1;
                }
            }
            let skipped = received - (report.added - before);
            debug!(%iso3, page, received, skipped, "fetched schools page");
            if skipped > 0 {
                warn!(%iso3, page, skipped, "dropped malformed schools or schools without valid coordinates");
            }
            cursor.next_page += 1;

            if received < self.page_size {
                break Ok(());
            }
        };

        match outcome {
            Ok(()) => {
                self.cursors.remove(&iso3);
                self.loaded.insert(iso3.clone());
                info!(%iso3, schools = cursor.kept, pages = cursor.next_page - 1, "loaded schools");
                Ok(report)
            }
            Err(e) => {
                warn!(%iso3, page = cursor.next_page, kept = cursor.kept, error = %e, "school load interrupted");
                self.cursors.insert(iso3, cursor);
                Err(e)
            }
        }
    }
}

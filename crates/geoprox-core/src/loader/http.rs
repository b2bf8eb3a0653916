// crates/geoprox-core/src/loader/http.rs
use super::common_io::read_facilities_document;
use super::{DataSource, LoaderConfig};
use crate::error::{LoadError, Result};
use crate::model::convert::school_page_rows;
use crate::model::raw::{FacilitiesDocument, SchoolPage};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Blocking HTTP transport for both datasets.
///
/// Facilities come from `facilities_path` when set, otherwise from
/// `facilities_url`. Schools always come from `schools_url`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    config: LoaderConfig,
}

impl HttpSource {
    pub fn new(config: LoaderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        let response = self.client.get(url).query(query).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }
        let body = response.bytes()?;
        Ok(serde_json::from_slice(&body)?)
    }
}

fn school_query(iso3: &str, page: u32, page_size: usize) -> [(&'static str, String); 3] {
    [
        ("country_iso3_code", iso3.to_owned()),
        ("page", page.to_string()),
        ("size", page_size.to_string()),
    ]
}

impl DataSource for HttpSource {
    fn facilities_document(&self) -> Result<FacilitiesDocument> {
        if let Some(path) = &self.config.facilities_path {
            debug!(path = %path.display(), "reading facilities from disk");
            return read_facilities_document(path);
        }
        let url = self.config.facilities_url.as_deref().ok_or_else(|| {
            LoadError::NotFound("no facilities url or file configured".into())
        })?;
        debug!(%url, "fetching facilities");
        self.get_json(url, &[])
    }

    fn school_page(&self, iso3: &str, page: u32, page_size: usize) -> Result<Vec<Value>> {
        if self.config.schools_url.is_empty() {
            return Err(LoadError::NotFound("no schools url configured".into()));
        }
        let query = school_query(iso3, page, page_size);
        let body: SchoolPage = self.get_json(&self.config.schools_url, &query)?;
        school_page_rows(body)
    }
}

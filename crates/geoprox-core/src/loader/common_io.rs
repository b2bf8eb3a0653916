// crates/geoprox-core/src/loader/common_io.rs
use crate::error::{LoadError, Result};
use crate::model::raw::FacilitiesDocument;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[cfg(feature = "compact")]
use flate2::read::GzDecoder;

/// Opens a local file, buffers it, and unwraps gzip when the name ends in
/// `.gz`. Callers get a plain reader either way.
pub fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        LoadError::NotFound(format!("Dataset not found at {}: {}", path.display(), e))
    })?;

    let reader = BufReader::new(file);
    let gzipped = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));

    if !gzipped {
        return Ok(Box::new(reader));
    }

    #[cfg(feature = "compact")]
    {
        Ok(Box::new(GzDecoder::new(reader)))
    }

    #[cfg(not(feature = "compact"))]
    {
        Err(LoadError::Payload(format!(
            "{} is gzipped but the 'compact' feature is disabled",
            path.display()
        )))
    }
}

/// Reads a `{ success, data }` facilities document from disk.
pub fn read_facilities_document(path: &Path) -> Result<FacilitiesDocument> {
    let reader = open_stream(path)?;
    serde_json::from_reader(reader).map_err(LoadError::Json)
}

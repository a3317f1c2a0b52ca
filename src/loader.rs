//! CSV data sources.
//!
//! Every chart reads one or two named CSV files from a data directory. Rows are
//! deserialized into the typed records of [`crate::models`]; a missing file or a
//! malformed row fails the whole source. There is no retry: callers decide how a
//! failed source is surfaced (the gauge shows a caption, the other charts stay
//! empty).

use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Source file names expected in the data directory.
pub mod sources {
    pub const MACRO_VS_RWA: &str = "viz1_macro_vs_rwa.csv";
    pub const ASSET_TYPE_SHARES: &str = "viz2_asset_type_shares.csv";
    pub const CHAIN_ALLOCATION: &str = "viz3_chain_allocation.csv";
    pub const PROTOCOL_TIMESERIES: &str = "viz4_protocol_timeseries.csv";
    pub const PROTOCOL_LATEST: &str = "viz4_protocol_latest.csv";
    pub const YIELD_TIMESERIES: &str = "viz5_yield_timeseries.csv";
    pub const M2_GAUGE: &str = "m2_liquidity_gauge.csv";
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// A directory holding the dashboard's CSV sources.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, source: &str) -> PathBuf {
        self.root.join(source)
    }

    /// Load all rows of `source`, in file order.
    pub fn load<T: DeserializeOwned>(&self, source: &str) -> Result<Vec<T>, LoadError> {
        let path = self.path(source);
        let file = File::open(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        let rows = read_rows(file).map_err(|source| LoadError::Csv {
            path: path.clone(),
            source,
        })?;
        log::debug!("loaded {} rows from {}", rows.len(), path.display());
        Ok(rows)
    }
}

/// Deserialize headered CSV rows from any reader. Cells are trimmed.
pub fn read_rows<T: DeserializeOwned, R: Read>(reader: R) -> Result<Vec<T>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    rdr.deserialize().collect()
}

//! Reference data from the NASA Exoplanet Archive.
//!
//! Queries the archive's TAP endpoint for one planet, cleans the returned
//! rows and writes them to JSON / CSV for the thermal model.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ExportError, FetchError};

pub const ARCHIVE_URL: &str = "https://exoplanetarchive.ipac.caltech.edu/TAP/sync";

pub const DEFAULT_PLANET: &str = "TRAPPIST-1 g";

const COLUMNS: [&str; 7] = ["pl_name", "hostname", "pl_rade", "pl_masse", "st_teff", "st_rad", "sy_dist"];

/// One archive row. Column names follow the archive's `ps` table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Exoplanet {
    pub pl_name: Option<String>,
    /// Host star name
    pub hostname: Option<String>,
    /// Planet radius (Earth radii)
    pub pl_rade: Option<f64>,
    /// Planet mass (Earth masses)
    pub pl_masse: Option<f64>,
    /// Star effective temperature (K)
    pub st_teff: Option<f64>,
    /// Star radius (solar radii)
    pub st_rad: Option<f64>,
    /// Distance to the system (pc)
    pub sy_dist: Option<f64>,
}

impl Exoplanet {
    fn is_empty(&self) -> bool {
        self.pl_name.is_none()
            && self.hostname.is_none()
            && self.pl_rade.is_none()
            && self.pl_masse.is_none()
            && self.st_teff.is_none()
            && self.st_rad.is_none()
            && self.sy_dist.is_none()
    }

    fn csv_fields(&self) -> [String; 7] {
        let num = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
        let text = |v: &Option<String>| v.as_deref().map(csv_escape).unwrap_or_default();
        [
            text(&self.pl_name),
            text(&self.hostname),
            num(self.pl_rade),
            num(self.pl_masse),
            num(self.st_teff),
            num(self.st_rad),
            num(self.sy_dist),
        ]
    }
}

fn csv_escape(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Configuration for the archive client
#[derive(Clone, Debug)]
pub struct ArchiveConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            base_url: ARCHIVE_URL.to_string(),
            timeout_secs: 15,
        }
    }
}

/// Blocking client for the archive's synchronous TAP service.
pub struct NasaExoplanetClient {
    config: ArchiveConfig,
    client: reqwest::blocking::Client,
}

impl NasaExoplanetClient {
    pub fn new(config: ArchiveConfig) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Fetch every `ps` row for `planet`.
    pub fn fetch_planet(&self, planet: &str) -> Result<Vec<Exoplanet>, FetchError> {
        let query = planet_query(planet);
        debug!(%query, "querying exoplanet archive");

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[("query", query.as_str()), ("format", "json")])
            .send()?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().unwrap_or_default();
            return Err(FetchError::Api { status, body });
        }

        let rows: Vec<Exoplanet> = response
            .json()
            .map_err(|e| FetchError::Parse(e.to_string()))?;
        info!(planet, rows = rows.len(), "archive rows received");
        Ok(rows)
    }
}

/// ADQL query selecting the columns of [`Exoplanet`] for one planet name.
pub fn planet_query(planet: &str) -> String {
    format!(
        "SELECT {} FROM ps WHERE pl_name = '{}'",
        COLUMNS.join(", "),
        planet.replace('\'', "''")
    )
}

/// Descending order with missing values last.
fn desc_nulls_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Drop empty rows, prefer the most complete measurements, keep one row per
/// planet name.
pub fn clean_records(rows: Vec<Exoplanet>) -> Vec<Exoplanet> {
    let mut rows: Vec<Exoplanet> = rows.into_iter().filter(|r| !r.is_empty()).collect();
    rows.sort_by(|a, b| {
        desc_nulls_last(a.pl_masse, b.pl_masse).then_with(|| desc_nulls_last(a.pl_rade, b.pl_rade))
    });

    let mut seen = HashSet::new();
    rows.retain(|r| seen.insert(r.pl_name.clone()));
    rows
}

/// The planet described by the first cleaned row.
pub fn to_exoplanet(cleaned: &[Exoplanet], planet: &str) -> Result<Exoplanet, FetchError> {
    cleaned.first().cloned().ok_or_else(|| FetchError::NoRows {
        planet: planet.to_string(),
    })
}

/// Write `planet` as pretty JSON into `dir/filename`, creating `dir`.
pub fn export_json(planet: &Exoplanet, dir: &Path, filename: &str) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    let writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(writer, planet)?;
    Ok(path)
}

/// Write rows as CSV with a header line into `dir/filename`, creating `dir`.
pub fn export_csv(rows: &[Exoplanet], dir: &Path, filename: &str) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    let mut writer = BufWriter::new(File::create(&path)?);
    writeln!(writer, "{}", COLUMNS.join(","))?;
    for row in rows {
        writeln!(writer, "{}", row.csv_fields().join(","))?;
    }
    writer.flush()?;
    Ok(path)
}

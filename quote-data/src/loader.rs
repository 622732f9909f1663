use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use quote_core::{RateTable, ServiceRate};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Errors that can occur when loading a rate table.
#[derive(Debug, Error)]
pub enum RateTableError {
    #[error("CSV parse error: {0}")]
    Csv(String),

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Service '{0}' appears more than once")]
    DuplicateService(String),

    #[error("Invalid rate for '{service}': {reason}")]
    InvalidRate { service: String, reason: String },

    #[error("Rate table has no services")]
    Empty,
}

impl From<csv::Error> for RateTableError {
    fn from(err: csv::Error) -> Self {
        RateTableError::Csv(err.to_string())
    }
}

/// A single record from the service rates CSV file.
///
/// - `service_id`: identifier matching the `projectType` answer (e.g. `site-web`)
/// - `base_price`: price in euros, per hour when `is_hourly`
/// - `timeline_label`: label shown for a standard timeline
/// - `is_hourly`: `true`/`false`, `yes`/`no`, `1`/`0`; blank means `false`
/// - `urgent_multiplier`: factor applied for urgent requests (e.g. 1.3)
/// - `flexible_discount`: factor applied for flexible requests (e.g. 0.9)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServiceRateRecord {
    pub service_id: String,
    pub base_price: Decimal,
    pub timeline_label: String,
    #[serde(deserialize_with = "deserialize_flag")]
    pub is_hourly: bool,
    pub urgent_multiplier: Decimal,
    pub flexible_discount: Decimal,
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim).map(str::to_ascii_lowercase).as_deref() {
        None | Some("") | Some("false") | Some("no") | Some("0") => Ok(false),
        Some("true") | Some("yes") | Some("1") => Ok(true),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a boolean flag, found '{other}'"
        ))),
    }
}

impl ServiceRateRecord {
    fn validate(&self) -> Result<(), RateTableError> {
        let invalid = |reason: &str| RateTableError::InvalidRate {
            service: self.service_id.clone(),
            reason: reason.to_string(),
        };

        if self.service_id.trim().is_empty() {
            return Err(invalid("service_id is blank"));
        }
        if self.base_price <= Decimal::ZERO {
            return Err(invalid("base_price must be positive"));
        }
        if self.urgent_multiplier <= Decimal::ZERO {
            return Err(invalid("urgent_multiplier must be positive"));
        }
        if self.flexible_discount <= Decimal::ZERO {
            return Err(invalid("flexible_discount must be positive"));
        }
        Ok(())
    }

    fn to_service_rate(&self) -> ServiceRate {
        ServiceRate {
            base_price: self.base_price,
            timeline_label: self.timeline_label.trim().to_string(),
            is_hourly: self.is_hourly,
            urgent_multiplier: self.urgent_multiplier,
            flexible_discount: self.flexible_discount,
        }
    }
}

/// Loader for the service rate table.
///
/// The table is read once at startup and never changes afterwards.
pub struct RateTableLoader;

impl RateTableLoader {
    /// Parse service rate records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a string slice.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<ServiceRateRecord>, RateTableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: ServiceRateRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Build a [`RateTable`] from parsed records.
    ///
    /// Every record must have positive prices and factors and a unique
    /// service identifier.
    pub fn build(records: &[ServiceRateRecord]) -> Result<RateTable, RateTableError> {
        if records.is_empty() {
            return Err(RateTableError::Empty);
        }

        let mut services = BTreeMap::new();
        for record in records {
            record.validate()?;
            let id = record.service_id.trim().to_string();
            if services.insert(id.clone(), record.to_service_rate()).is_some() {
                return Err(RateTableError::DuplicateService(id));
            }
        }

        Ok(RateTable::new(services))
    }

    /// Parse and build in one go.
    pub fn from_reader<R: Read>(reader: R) -> Result<RateTable, RateTableError> {
        let records = Self::parse(reader)?;
        Self::build(&records)
    }

    /// Load the rate table stored at `path`.
    pub fn load_file(path: impl AsRef<Path>) -> Result<RateTable, RateTableError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| RateTableError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let table = Self::from_reader(file)?;
        info!(path = %path.display(), services = table.len(), "rate table loaded");
        Ok(table)
    }
}

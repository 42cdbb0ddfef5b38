use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use time::OffsetDateTime;

/// Placeholder country for photos without a resolved location.
pub const UNKNOWN_COUNTRY: &str = "Unknown_country";

/// Placeholder city for photos without a resolved location, or whose nearest
/// city lies beyond the requested distance.
pub const UNKNOWN_CITY: &str = "Unknown_city";

/// A photo to be sorted. Place fields always hold a value: missing data is
/// stored as the matching sentinel so the record still takes part in every
/// partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub path: PathBuf,
    pub timestamp: OffsetDateTime,
    pub country: String,
    pub city: String,
}

impl Record {
    pub fn new(
        path: impl Into<PathBuf>,
        timestamp: OffsetDateTime,
        country: Option<String>,
        city: Option<String>,
    ) -> Self {
        Self {
            path: path.into(),
            timestamp,
            country: or_sentinel(country, UNKNOWN_COUNTRY),
            city: or_sentinel(city, UNKNOWN_CITY),
        }
    }

    /// A record with no location data at all.
    pub fn unlocated(path: impl Into<PathBuf>, timestamp: OffsetDateTime) -> Self {
        Self::new(path, timestamp, None, None)
    }

    pub fn has_country(&self) -> bool {
        self.country != UNKNOWN_COUNTRY
    }

    pub fn has_city(&self) -> bool {
        self.city != UNKNOWN_CITY
    }
}

fn or_sentinel(value: Option<String>, sentinel: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => sentinel.to_string(),
    }
}

/// One entry of a record manifest, as written by the metadata/location step.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ManifestEntry {
    pub path: PathBuf,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    /// Distance in kilometres from the photo to `city`.
    #[serde(default)]
    pub city_distance_km: Option<f64>,
}

impl ManifestEntry {
    /// Convert into a record. A city further away than `max_distance_km`
    /// is treated as unknown.
    pub fn into_record(self, max_distance_km: Option<u32>) -> Record {
        let city = match (self.city, self.city_distance_km, max_distance_km) {
            (Some(city), Some(dist), Some(max)) if dist > f64::from(max) => {
                log::debug!(
                    "{}: nearest city {} is {:.1} km away (limit {} km)",
                    self.path.display(),
                    city,
                    dist,
                    max
                );
                None
            }
            (city, _, _) => city,
        };
        Record::new(self.path, self.date, self.country, city)
    }
}

use crate::phototree_core::error::{PhototreeError, Result};
use exiftool::ExifTool;
use serde::Deserialize;
use std::path::Path;
use time::macros::datetime;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Date format used in EXIF data.
const EXIF_DATE_FORMAT: &[time::format_description::FormatItem] =
    time::macros::format_description!("[year]:[month]:[day] [hour]:[minute]:[second]");

const EXIF_OFFSET_FORMAT: &[time::format_description::FormatItem] =
    time::macros::format_description!("[offset_hour]:[offset_minute]");

/// Capture times before this are treated as a misconfigured camera clock.
const EARLIEST_PLAUSIBLE: OffsetDateTime = datetime!(1970-01-01 0:00 UTC);

/// The exiftool fields needed to date a photo.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
struct RawExifDates {
    #[serde(default)]
    date_time_original: String,
    #[serde(default)]
    create_date: String,
    #[serde(default)]
    offset_time_original: Option<String>,
    #[serde(default)]
    offset_time: Option<String>,
}

/// Determine when a photo was taken.
///
/// Uses `DateTimeOriginal`, then `CreateDate`. Missing, unparseable or
/// implausible (future, pre-1970) dates fall back to the file's modification
/// time, which is what messaging apps tend to leave intact.
pub fn capture_time(exiftool: &mut ExifTool, path: &Path) -> Result<OffsetDateTime> {
    let raw: RawExifDates = exiftool.read_metadata(path, &[]).map_err(|e| {
        PhototreeError::MetadataExtraction {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    let now = OffsetDateTime::now_utc();
    let exif_date = parse_exif_date(&raw.date_time_original, raw.offset_time_original.as_deref())
        .or_else(|_| parse_exif_date(&raw.create_date, raw.offset_time.as_deref()));

    match exif_date {
        Ok(date) if is_plausible(date, now) => Ok(date),
        Ok(date) => {
            log::debug!(
                "Implausible capture date {} for {}, using modification time",
                date,
                path.display()
            );
            modified_time(path)
        }
        Err(e) => {
            log::debug!("No usable EXIF date for {} ({}), using modification time", path.display(), e);
            modified_time(path)
        }
    }
}

/// File modification time in the local offset.
pub fn modified_time(path: &Path) -> Result<OffsetDateTime> {
    let modified = std::fs::metadata(path)?.modified()?;
    Ok(OffsetDateTime::from(modified).to_offset(get_local_offset()))
}

fn is_plausible(date: OffsetDateTime, now: OffsetDateTime) -> bool {
    date >= EARLIEST_PLAUSIBLE && date <= now
}

/// Parse an EXIF date string with optional timezone offset.
fn parse_exif_date(date_str: &str, offset_str: Option<&str>) -> Result<OffsetDateTime> {
    if date_str.is_empty() {
        return Err(PhototreeError::InvalidDateFormat("empty date".to_string()));
    }

    let date_time = PrimitiveDateTime::parse(date_str, EXIF_DATE_FORMAT)
        .map_err(|e| PhototreeError::InvalidDateFormat(e.to_string()))?;

    let offset = match offset_str {
        Some(o) if !o.is_empty() => {
            UtcOffset::parse(o, EXIF_OFFSET_FORMAT).unwrap_or_else(|_| get_local_offset())
        }
        _ => get_local_offset(),
    };

    Ok(date_time.assume_offset(offset))
}

/// Get the local timezone offset, falling back to UTC if unavailable.
fn get_local_offset() -> UtcOffset {
    OffsetDateTime::now_local()
        .map(|dt| dt.offset())
        .unwrap_or(UtcOffset::UTC)
}

/// Check if exiftool is available on the system.
pub fn exiftool_available() -> bool {
    std::process::Command::new("exiftool")
        .arg("-ver")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

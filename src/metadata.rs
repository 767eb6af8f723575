use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use exiftool::ExifTool;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{ImportError, Result};

/// Tag holding the moment the shutter fired
const CAPTURE_TAG: &str = "DateTimeOriginal";

/// Offset tags that qualify a zone-less capture time, in order of preference
const OFFSET_TAGS: &[&str] = &["OffsetTimeOriginal", "OffsetTime"];

/// Source of capture timestamps for image files.
///
/// `Ok(None)` means the file carries no usable capture time; that is not an
/// error. `Err` means the extraction itself broke and the run must stop.
pub trait CaptureTimeReader {
    fn read_capture_time(&mut self, file_path: &Path) -> Result<Option<DateTime<Utc>>>;
}

impl<R: CaptureTimeReader + ?Sized> CaptureTimeReader for &mut R {
    fn read_capture_time(&mut self, file_path: &Path) -> Result<Option<DateTime<Utc>>> {
        (**self).read_capture_time(file_path)
    }
}

/// Reads capture times through a single long-lived exiftool process
pub struct ExifToolReader {
    exiftool: ExifTool,
}

impl ExifToolReader {
    pub fn new() -> Result<Self> {
        let exiftool = ExifTool::new().map_err(|e| ImportError::Metadata {
            path: "exiftool".into(),
            reason: format!("failed to start exiftool: {}", e),
        })?;

        Ok(ExifToolReader { exiftool })
    }

    fn extract(&mut self, file_path: &Path) -> Result<HashMap<String, Value>> {
        let metadata_error = |reason: String| ImportError::Metadata {
            path: file_path.to_path_buf(),
            reason,
        };

        let file_path_str = file_path
            .to_str()
            .ok_or_else(|| metadata_error("file path contains invalid UTF-8".to_string()))?;

        let capture_arg = format!("-{}", CAPTURE_TAG);
        let mut args = vec![capture_arg.as_str()];
        let offset_args: Vec<String> = OFFSET_TAGS.iter().map(|t| format!("-{}", t)).collect();
        args.extend(offset_args.iter().map(String::as_str));
        args.push(file_path_str);

        debug!(file = %file_path.display(), "running exiftool");
        let output = self
            .exiftool
            .json_execute(&args)
            .map_err(|e| metadata_error(format!("exiftool failed: {}", e)))?;

        let data: Vec<HashMap<String, Value>> = serde_json::from_value(output)
            .map_err(|e| metadata_error(format!("unexpected exiftool output: {}", e)))?;

        data.into_iter()
            .next()
            .ok_or_else(|| metadata_error("no metadata returned from exiftool".to_string()))
    }
}

impl CaptureTimeReader for ExifToolReader {
    fn read_capture_time(&mut self, file_path: &Path) -> Result<Option<DateTime<Utc>>> {
        let metadata = self.extract(file_path)?;
        Ok(capture_time_from_metadata(file_path, &metadata))
    }
}

/// Pick the capture time out of one exiftool JSON record
pub fn capture_time_from_metadata(
    file_path: &Path,
    metadata: &HashMap<String, Value>,
) -> Option<DateTime<Utc>> {
    let raw = metadata.get(CAPTURE_TAG).and_then(Value::as_str)?;
    let offset = extract_timezone_offset(metadata);

    let parsed = parse_date_string(raw, offset);
    if parsed.is_none() {
        warn!(
            file = %file_path.display(),
            value = raw,
            "unparsable {}, treating as missing",
            CAPTURE_TAG
        );
    }
    parsed
}

/// Parse an exiftool date: "YYYY:MM:DD HH:MM:SS", optional fraction, optional zone
fn parse_date_string(s: &str, timezone_offset: Option<i32>) -> Option<DateTime<Utc>> {
    let s = s.trim();

    for format in ["%Y:%m:%d %H:%M:%S%:z", "%Y:%m:%d %H:%M:%S%.f%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in ["%Y:%m:%d %H:%M:%S", "%Y:%m:%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(apply_timezone(naive, timezone_offset));
        }
    }

    None
}

fn apply_timezone(naive: NaiveDateTime, offset_seconds: Option<i32>) -> DateTime<Utc> {
    match offset_seconds {
        Some(offset) => Utc.from_utc_datetime(&(naive - chrono::Duration::seconds(offset as i64))),
        None => Utc.from_utc_datetime(&naive),
    }
}

fn extract_timezone_offset(metadata: &HashMap<String, Value>) -> Option<i32> {
    OFFSET_TAGS
        .iter()
        .filter_map(|tag| metadata.get(*tag).and_then(Value::as_str))
        .find_map(parse_timezone_offset)
}

fn parse_timezone_offset(s: &str) -> Option<i32> {
    // Format: "+08:00" or "-05:00"
    if s.len() != 6 || !s.is_ascii() || s.as_bytes()[3] != b':' {
        return None;
    }

    let sign = match s.as_bytes()[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let hours: i32 = s[1..3].parse().ok()?;
    let minutes: i32 = s[4..6].parse().ok()?;

    Some(sign * (hours * 3600 + minutes * 60))
}

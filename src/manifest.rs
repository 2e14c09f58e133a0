// Annotation manifest — JSON array of clip records
//
// The Diving48 annotation files are JSON arrays of objects:
//
//   [{"vid_name": "...", "label": 23, "start_frame": 0, ...}, ...]
//
// Only the clip id and the label are consumed; any other fields (frame
// ranges etc.) are ignored. The whole file is parsed eagerly at dataset
// construction — there is no streaming parse.

use std::fs;
use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::error::{Error, Result};

/// One entry of the annotation manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct ClipRecord {
    /// Clip identifier; resolves to `<videos_path>/<clip_id>.mp4`.
    #[serde(rename = "vid_name")]
    pub clip_id: String,
    /// Class label for the clip.
    pub label: i64,
}

/// Load and parse an annotation manifest.
///
/// Fails with [`Error::ManifestIo`] / [`Error::ManifestParse`] if the file is
/// unreadable or not a JSON array of records.
pub fn load_manifest(path: impl AsRef<Path>) -> Result<Vec<ClipRecord>> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| Error::ManifestIo {
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<ClipRecord> =
        serde_json::from_slice(&bytes).map_err(|source| Error::ManifestParse {
            path: path.to_path_buf(),
            source,
        })?;
    info!("loaded {} clip records from {}", records.len(), path.display());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn parses_records() {
        let f = write_temp(r#"[{"vid_name": "A", "label": 5}, {"vid_name": "B", "label": 7}]"#);
        let records = load_manifest(f.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].clip_id, "A");
        assert_eq!(records[0].label, 5);
        assert_eq!(records[1].clip_id, "B");
        assert_eq!(records[1].label, 7);
    }

    #[test]
    fn ignores_extra_fields() {
        let f = write_temp(
            r#"[{"vid_name": "X", "label": 1, "start_frame": 0, "end_frame": 92}]"#,
        );
        let records = load_manifest(f.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].clip_id, "X");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_manifest("/nonexistent/annotations.json").unwrap_err();
        assert!(matches!(err, Error::ManifestIo { .. }));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let f = write_temp(r#"{"vid_name": "not-an-array"}"#);
        let err = load_manifest(f.path()).unwrap_err();
        assert!(matches!(err, Error::ManifestParse { .. }));
    }
}

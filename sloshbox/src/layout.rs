//! LED layout files.
//!
//! A layout is a JSON array of records in the openpixelcontrol format.
//! Records with a `point: [x, y, z]` contribute one coordinate each, in file
//! order; anything else in the array is ignored.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Physical position of one LED, in layout units.
pub type Coordinate = [f32; 3];

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("cannot open layout {path}: {source}")]
    Open { path: PathBuf, #[source] source: std::io::Error },

    #[error("invalid layout JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct LayoutRecord {
    #[serde(default)]
    point: Option<Coordinate>,
}

/// Coordinates from any reader holding a layout array.
pub fn parse_layout<R: Read>(reader: R) -> Result<Vec<Coordinate>, LayoutError> {
    let records: Vec<LayoutRecord> = serde_json::from_reader(reader)?;
    Ok(records.into_iter().filter_map(|r| r.point).collect())
}

pub fn load_layout(path: &Path) -> Result<Vec<Coordinate>, LayoutError> {
    let file = File::open(path).map_err(|source| LayoutError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_layout(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_points_in_file_order() {
        let json = r#"[
            {"point": [0, 0, 0]},
            {"point": [1.5, -2, 3]}
        ]"#;
        let coords = parse_layout(json.as_bytes()).unwrap();
        assert_eq!(coords, vec![[0.0, 0.0, 0.0], [1.5, -2.0, 3.0]]);
    }

    #[test]
    fn records_without_point_are_skipped() {
        let json = r#"[{"point": [1, 2, 3]}, {"comment": "spacer"}, {}, {"point": [4, 5, 6]}]"#;
        let coords = parse_layout(json.as_bytes()).unwrap();
        assert_eq!(coords.len(), 2);
        assert_eq!(coords[1], [4.0, 5.0, 6.0]);
    }

    #[test]
    fn empty_array_is_empty_layout() {
        assert!(parse_layout("[]".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(parse_layout("{not json".as_bytes()), Err(LayoutError::Json(_))));
        assert!(matches!(parse_layout(r#"[{"point": [1, 2]}]"#.as_bytes()), Err(LayoutError::Json(_))));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_layout(Path::new("/nonexistent/layout.json")).unwrap_err();
        assert!(matches!(err, LayoutError::Open { .. }));
        assert!(err.to_string().contains("/nonexistent/layout.json"));
    }

    #[test]
    fn bundled_layout_has_128_points() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../layouts/fadecandy8x8x2.json");
        assert_eq!(load_layout(&path).unwrap().len(), 128);
    }
}

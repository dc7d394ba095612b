use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use super::model::{FlowSample, SetCoverSample, SizedSample, SpatialLayout};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures while reading experiment inputs.
///
/// `NotFound` is split out from other I/O failures because the
/// visualization input is optional and its absence is not an error.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{} does not exist", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed CSV in {}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: row {row} has problem size 0", .path.display())]
    ZeroSize { path: PathBuf, row: usize },

    #[error("line {line}: '{text}' is not an x,y pair")]
    InvalidPoint { line: usize, text: String },
}

impl LoadError {
    fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            LoadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// CSV loaders
// ---------------------------------------------------------------------------

/// Load a `flow_p*.csv` file (`size`, `runtime_ms`, `flow_value`).
pub fn load_flow_samples(path: &Path) -> Result<Vec<FlowSample>, LoadError> {
    load_csv(path)
}

/// Load `setcover_runtime.csv` (`size`, `runtime_ms`, `num_stops`).
pub fn load_setcover_samples(path: &Path) -> Result<Vec<SetCoverSample>, LoadError> {
    load_csv(path)
}

/// Deserialize every row by header name and reject rows with size 0.
fn load_csv<T>(path: &Path) -> Result<Vec<T>, LoadError>
where
    T: DeserializeOwned + SizedSample,
{
    let file = File::open(path).map_err(|e| LoadError::from_io(path, e))?;
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

    let mut samples = Vec::new();
    for (row, result) in reader.deserialize::<T>().enumerate() {
        let sample = result.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        if sample.size() == 0 {
            return Err(LoadError::ZeroSize {
                path: path.to_path_buf(),
                row,
            });
        }
        samples.push(sample);
    }

    log::debug!("loaded {} rows from {}", samples.len(), path.display());
    Ok(samples)
}

// ---------------------------------------------------------------------------
// Visualization loader
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Section {
    Students,
    Selected,
    Unselected,
}

/// Load the optional visualization file.
///
/// Returns `Ok(None)` when the file does not exist; every other failure is
/// reported as an error.
pub fn load_visualization(path: &Path) -> Result<Option<SpatialLayout>, LoadError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            return match LoadError::from_io(path, e) {
                LoadError::NotFound { .. } => Ok(None),
                other => Err(other),
            };
        }
    };
    parse_visualization(&text).map(Some)
}

/// Parse the sectioned `x,y` format:
///
/// ```text
/// STUDENTS
/// 12.5,300.0
/// SELECTED_STOPS
/// 40.0,280.0
/// UNSELECTED_STOPS
/// 900.0,15.0
/// ```
///
/// A header switches the active section. Lines without a comma, and point
/// lines seen before any header, are skipped.
pub fn parse_visualization(text: &str) -> Result<SpatialLayout, LoadError> {
    let mut layout = SpatialLayout::default();
    let mut section: Option<Section> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        match line {
            "STUDENTS" => section = Some(Section::Students),
            "SELECTED_STOPS" => section = Some(Section::Selected),
            "UNSELECTED_STOPS" => section = Some(Section::Unselected),
            _ if line.contains(',') => {
                let point = parse_point(line).ok_or_else(|| LoadError::InvalidPoint {
                    line: idx + 1,
                    text: line.to_string(),
                })?;
                match section {
                    Some(Section::Students) => layout.students.push(point),
                    Some(Section::Selected) => layout.selected_stops.push(point),
                    Some(Section::Unselected) => layout.unselected_stops.push(point),
                    None => {}
                }
            }
            _ => {}
        }
    }

    Ok(layout)
}

fn parse_point(line: &str) -> Option<(f64, f64)> {
    let (x, y) = line.split_once(',')?;
    let x = x.trim().parse::<f64>().ok()?;
    let y = y.trim().parse::<f64>().ok()?;
    Some((x, y))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn parses_sections_in_order() {
        let layout = parse_visualization("STUDENTS\n1,2\n3,4\nSELECTED_STOPS\n5,6\n").unwrap();
        assert_eq!(layout.students, vec![(1.0, 2.0), (3.0, 4.0)]);
        assert_eq!(layout.selected_stops, vec![(5.0, 6.0)]);
        assert!(layout.unselected_stops.is_empty());
    }

    #[test]
    fn sections_can_reopen_and_lines_are_trimmed() {
        let text = "  UNSELECTED_STOPS \n 7.5 , 8 \n\nSTUDENTS\n0,0\nUNSELECTED_STOPS\n9,10\n";
        let layout = parse_visualization(text).unwrap();
        assert_eq!(layout.students, vec![(0.0, 0.0)]);
        assert_eq!(layout.unselected_stops, vec![(7.5, 8.0), (9.0, 10.0)]);
    }

    #[test]
    fn points_before_first_header_are_ignored() {
        let layout = parse_visualization("1,1\nnotes\nSELECTED_STOPS\n2,2\n").unwrap();
        assert!(layout.students.is_empty());
        assert_eq!(layout.selected_stops, vec![(2.0, 2.0)]);
    }

    #[test]
    fn malformed_pair_reports_line() {
        let err = parse_visualization("STUDENTS\n1,2\n3,abc\n").unwrap_err();
        match err {
            LoadError::InvalidPoint { line, text } => {
                assert_eq!(line, 3);
                assert_eq!(text, "3,abc");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(parse_visualization("STUDENTS\n1,2,3\n").is_err());
    }

    #[test]
    fn missing_visualization_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_visualization(&dir.path().join("visualization.csv")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn missing_csv_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_flow_samples(&dir.path().join("flow_p1.csv")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[test]
    fn csv_columns_match_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flow.csv");
        fs::write(
            &path,
            "trial,flow_value,size,runtime_ms\n0,9,10,1.5\n1, 8 ,10,2.5\n",
        )
        .unwrap();

        let samples = load_flow_samples(&path).unwrap();
        assert_eq!(
            samples,
            vec![
                FlowSample { size: 10, runtime_ms: 1.5, flow_value: 9.0 },
                FlowSample { size: 10, runtime_ms: 2.5, flow_value: 8.0 },
            ]
        );
    }

    #[test]
    fn zero_size_rows_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("setcover.csv");
        fs::write(&path, "size,runtime_ms,num_stops\n10,1.0,3\n0,1.0,3\n").unwrap();

        let err = load_setcover_samples(&path).unwrap_err();
        assert!(matches!(err, LoadError::ZeroSize { row: 1, .. }));
    }

    #[test]
    fn missing_column_is_a_csv_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("setcover.csv");
        fs::write(&path, "size,runtime_ms\n10,1.0\n").unwrap();

        let err = load_setcover_samples(&path).unwrap_err();
        assert!(matches!(err, LoadError::Csv { .. }));
    }
}

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;

use super::model::{text_cell, Column, ColumnSet, Dataset, Record, SpeedLimit};
use crate::config::{ColumnNames, DEFAULT_DATA_FILE};

/// Fatal problems with an input file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("required column '{0}' not found in header")]
    MissingColumn(String),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a device table from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – comma-separated, UTF-8 with optional BOM
pub fn load_file(path: &Path, columns: &ColumnNames) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" | "txt" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            load_reader(file, columns).with_context(|| format!("loading {}", path.display()))
        }
        other => Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    }
}

/// Dataset to open at start-up.
///
/// A path the user named must load. Without one, the default file is loaded
/// when it exists and the dashboard otherwise starts empty.
pub fn load_startup(explicit: Option<&Path>, columns: &ColumnNames) -> Result<Option<Dataset>> {
    match explicit {
        Some(path) => load_file(path, columns).map(Some),
        None => {
            let default = Path::new(DEFAULT_DATA_FILE);
            if default.exists() {
                load_file(default, columns).map(Some)
            } else {
                log::info!("{DEFAULT_DATA_FILE} not found; waiting for File → Open");
                Ok(None)
            }
        }
    }
}

/// Parse CSV from any reader.
///
/// Header names are trimmed before matching. The district and jurisdiction
/// columns must be present; the other recognised columns are optional and
/// their absence is recorded on the dataset.
pub fn load_reader<R: Read>(reader: R, columns: &ColumnNames) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let labels = [
        columns.district.clone(),
        columns.jurisdiction.clone(),
        columns.speed_limit.clone(),
        columns.camera_direction.clone(),
        columns.installation_location.clone(),
    ];
    let positions: Vec<Option<usize>> = labels
        .iter()
        .map(|label| headers.iter().position(|h| h == label))
        .collect();

    for required in [Column::District, Column::Jurisdiction] {
        if positions[required as usize].is_none() {
            return Err(LoadError::MissingColumn(labels[required as usize].clone()).into());
        }
    }

    let present: ColumnSet = Column::ALL
        .into_iter()
        .filter(|c| positions[*c as usize].is_some())
        .collect();

    for column in Column::ALL {
        if !present.contains(column) {
            log::warn!(
                "Column '{}' not found; dependent charts will be skipped",
                labels[column as usize]
            );
        }
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {}", row_no + 1))?;
        let cell = |column: Column| positions[column as usize].and_then(|i| row.get(i));

        records.push(Record {
            district: cell(Column::District).and_then(text_cell),
            jurisdiction: cell(Column::Jurisdiction).and_then(text_cell),
            speed_limit: cell(Column::SpeedLimit).and_then(SpeedLimit::parse),
            camera_direction: cell(Column::CameraDirection).and_then(text_cell),
            installation_location: cell(Column::InstallationLocation).and_then(text_cell),
            cells: row.iter().map(str::to_string).collect(),
        });
    }

    log::debug!("Parsed {} records with headers {:?}", records.len(), headers);

    Ok(Dataset::new(records, headers, present, labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{apply_filter, list_districts, FilterCriteria};

    fn english_columns() -> ColumnNames {
        ColumnNames {
            district: "district".to_string(),
            jurisdiction: "jurisdiction".to_string(),
            speed_limit: "speed_limit".to_string(),
            camera_direction: "camera_direction".to_string(),
            installation_location: "location".to_string(),
        }
    }

    #[test]
    fn strips_bom_and_trims_headers() {
        let csv = "\u{feff} district ,jurisdiction , speed_limit,camera_direction,location\n\
                   North,East Precinct,40,N,Main St\n";
        let ds = load_reader(csv.as_bytes(), &english_columns()).unwrap();

        assert_eq!(ds.headers[0], "district");
        assert_eq!(ds.len(), 1);
        let rec = &ds.records[0];
        assert_eq!(rec.district.as_deref(), Some("North"));
        assert_eq!(rec.speed_limit, Some(SpeedLimit(40.0)));
        assert_eq!(rec.installation_location.as_deref(), Some("Main St"));
        assert_eq!(rec.cells.len(), 5);
    }

    #[test]
    fn default_mapping_reads_chinese_headers() {
        let csv = "行政區,轄區分局,速限,拍攝行向,設置位置\n東區,第一分局,50,南向北,東門路違規停車\n";
        let ds = load_reader(csv.as_bytes(), &ColumnNames::default()).unwrap();

        assert!(ds.has_column(Column::InstallationLocation));
        assert_eq!(ds.records[0].jurisdiction.as_deref(), Some("第一分局"));
        assert_eq!(ds.label(Column::SpeedLimit), "速限");
    }

    #[test]
    fn missing_optional_column_is_recorded() {
        let csv = "district,jurisdiction,camera_direction,location\nNorth,East,N,x\n";
        let ds = load_reader(csv.as_bytes(), &english_columns()).unwrap();

        assert!(!ds.has_column(Column::SpeedLimit));
        assert!(ds.has_column(Column::CameraDirection));
        assert_eq!(ds.records[0].speed_limit, None);
    }

    #[test]
    fn missing_district_column_is_fatal() {
        let csv = "jurisdiction,speed_limit\nEast,40\n";
        let err = load_reader(csv.as_bytes(), &english_columns()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::MissingColumn(name)) if name == "district"
        ));
    }

    #[test]
    fn blanks_and_short_rows_become_missing() {
        let csv = "district,jurisdiction,speed_limit,camera_direction,location\n\
                   North,East,n/a,  \n";
        let ds = load_reader(csv.as_bytes(), &english_columns()).unwrap();
        let rec = &ds.records[0];

        assert_eq!(rec.speed_limit, None);
        assert_eq!(rec.camera_direction, None);
        assert_eq!(rec.installation_location, None);
    }

    #[test]
    fn cell_text_is_kept_verbatim() {
        let csv = "district,jurisdiction,speed_limit,camera_direction,location\n\
                   \" North \",East,40,N,\"parking \"\n\
                   North,East,40,N,parking lot\n";
        let ds = load_reader(csv.as_bytes(), &english_columns()).unwrap();

        let districts: Vec<_> = list_districts(&ds).into_iter().collect();
        assert_eq!(districts, vec![" North ", "North"]);

        let padded = FilterCriteria::new(" North ", "East").with_keywords(["parking "]);
        assert_eq!(apply_filter(&ds, &padded).indices(), &[0]);

        let plain = FilterCriteria::new("North", "East").with_keywords(["parking "]);
        assert!(apply_filter(&ds, &plain).is_empty());
    }

    #[test]
    fn invalid_utf8_is_fatal() {
        let bytes: &[u8] = b"district,jurisdiction\nNorth,\xff\xfe\n";
        assert!(load_reader(bytes, &english_columns()).is_err());
    }

    #[test]
    fn missing_file_is_fatal() {
        let path = Path::new("no/such/dir/devices.csv");
        let err = load_file(path, &english_columns()).unwrap_err();
        assert!(err.downcast_ref::<LoadError>().is_none());
        assert!(format!("{err:#}").contains("devices.csv"));
    }

    #[test]
    fn named_startup_file_must_exist() {
        let path = Path::new("no/such/dir/devices.csv");
        assert!(load_startup(Some(path), &english_columns()).is_err());
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = load_file(Path::new("devices.xlsx"), &ColumnNames::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::UnsupportedExtension(ext)) if ext == "xlsx"
        ));
    }
}

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, info, warn};

use super::model::{Dataset, Field, Record, NOT_AVAILABLE};
use crate::error::{LoadError, ParseError};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Source header → canonical column. Columns not listed here are ignored.
pub const COLUMN_MAP: [(&str, Field); 7] = [
    ("Encode Route", Field::Route),
    ("Category", Field::Category),
    ("Time Of Travel", Field::TimeOfTravel),
    ("Seat Fare", Field::SeatFare),
    ("Total Ticket Amount", Field::TotalAmount),
    ("Gender", Field::Gender),
    ("Age Group", Field::AgeGroup),
];

/// Load and normalize a bus transaction CSV.
///
/// Fails only when the file is missing, unreadable, or not tabular. Bad fare
/// cells and missing columns are repaired rather than reported.
pub fn load_csv(path: &Path) -> Result<Dataset, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let dataset = load_reader(file).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Loaded {} rows from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Normalize CSV text from any reader. The first row must be a header.
pub fn load_reader<R: Read>(reader: R) -> Result<Dataset, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(ParseError::MissingHeader);
    }
    let layout = ColumnLayout::resolve(&headers);

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        if row.len() > headers.len() {
            return Err(ParseError::RaggedRow {
                line: row.position().map_or(0, |p| p.line()),
                expected: headers.len(),
                found: row.len(),
            });
        }
        records.push(layout.record(&row));
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Column resolution
// ---------------------------------------------------------------------------

/// Position of each canonical column in the source, if present.
struct ColumnLayout {
    positions: [Option<usize>; 7],
}

impl ColumnLayout {
    /// The source header wins; the canonical name is accepted too so that an
    /// exported view loads back unchanged.
    fn resolve(headers: &csv::StringRecord) -> Self {
        let mut positions = [None; 7];
        for (source, field) in COLUMN_MAP {
            let found = headers
                .iter()
                .position(|h| h == source)
                .or_else(|| headers.iter().position(|h| h == field.canonical_name()));

            match found {
                Some(idx) => debug!("Column '{field}' read from source column {idx}"),
                None => warn!(
                    "Column '{field}' missing from source, defaulting to {}",
                    if field.is_numeric() { "0" } else { NOT_AVAILABLE }
                ),
            }
            positions[field.index()] = found;
        }
        ColumnLayout { positions }
    }

    fn cell<'r>(&self, row: &'r csv::StringRecord, field: Field) -> Option<&'r str> {
        self.positions[field.index()].and_then(|col| row.get(col))
    }

    fn record(&self, row: &csv::StringRecord) -> Record {
        let text = |field: Field| normalize_label(self.cell(row, field));
        let number = |field: Field| self.cell(row, field).map_or(0.0, coerce_fare);

        Record {
            route: text(Field::Route),
            category: text(Field::Category),
            time_of_travel: text(Field::TimeOfTravel),
            seat_fare: number(Field::SeatFare),
            total_amount: number(Field::TotalAmount),
            gender: text(Field::Gender),
            age_group: text(Field::AgeGroup),
        }
    }
}

// ---------------------------------------------------------------------------
// Cell coercion
// ---------------------------------------------------------------------------

/// Parse a fare cell. Anything that is not a finite, non-negative number
/// becomes 0.
pub fn coerce_fare(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Categorical cells are kept verbatim unless blank.
fn normalize_label(raw: Option<&str>) -> String {
    match raw {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(text: &str) -> Dataset {
        load_reader(text.as_bytes()).unwrap()
    }

    #[test]
    fn fare_coercion() {
        assert_eq!(coerce_fare("12.5"), 12.5);
        assert_eq!(coerce_fare(" 40 "), 40.0);
        assert_eq!(coerce_fare("abc"), 0.0);
        assert_eq!(coerce_fare(""), 0.0);
        assert_eq!(coerce_fare("NaN"), 0.0);
        assert_eq!(coerce_fare("inf"), 0.0);
        assert_eq!(coerce_fare("-5"), 0.0);
    }

    #[test]
    fn renames_source_columns() {
        let ds = load(
            "Encode Route,Category,Time Of Travel,Seat Fare,Total Ticket Amount,Gender,Age Group,Extra\n\
             R1,Sleeper,Night,500,1000,Male,18-25,ignored\n",
        );
        assert_eq!(
            ds.records,
            vec![Record {
                route: "R1".into(),
                category: "Sleeper".into(),
                time_of_travel: "Night".into(),
                seat_fare: 500.0,
                total_amount: 1000.0,
                gender: "Male".into(),
                age_group: "18-25".into(),
            }]
        );
    }

    #[test]
    fn missing_columns_get_defaults() {
        let ds = load("Encode Route,Seat Fare\nR1,abc\nR2,30\n");
        assert_eq!(ds.len(), 2);
        let first = &ds.records[0];
        assert_eq!(first.route, "R1");
        assert_eq!(first.seat_fare, 0.0);
        assert_eq!(first.total_amount, 0.0);
        assert_eq!(first.category, NOT_AVAILABLE);
        assert_eq!(first.time_of_travel, NOT_AVAILABLE);
        assert_eq!(first.gender, NOT_AVAILABLE);
        assert_eq!(first.age_group, NOT_AVAILABLE);
        assert_eq!(ds.records[1].seat_fare, 30.0);
    }

    #[test]
    fn blank_categorical_cells_become_not_available() {
        let ds = load("Encode Route,Gender\n,  \n");
        assert_eq!(ds.records[0].route, NOT_AVAILABLE);
        assert_eq!(ds.records[0].gender, NOT_AVAILABLE);
    }

    #[test]
    fn short_rows_are_padded() {
        let ds = load("Encode Route,Seat Fare,Gender\nR1,10\n");
        assert_eq!(ds.records[0].seat_fare, 10.0);
        assert_eq!(ds.records[0].gender, NOT_AVAILABLE);
    }

    #[test]
    fn long_rows_are_rejected() {
        let err = load_reader("Encode Route\nR1,extra\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            ParseError::RaggedRow {
                expected: 1,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn empty_input_has_no_header() {
        let err = load_reader("".as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::MissingHeader));
    }

    #[test]
    fn canonical_headers_are_accepted() {
        let ds = load("Route,Time_of_Travel,Total_Amount,Age_Group\nR9,Morning,12.5,60+\n");
        let r = &ds.records[0];
        assert_eq!(r.route, "R9");
        assert_eq!(r.time_of_travel, "Morning");
        assert_eq!(r.total_amount, 12.5);
        assert_eq!(r.age_group, "60+");
    }

    #[test]
    fn source_header_wins_over_canonical() {
        let ds = load("Route,Encode Route\nold,new\n");
        assert_eq!(ds.records[0].route, "new");
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_csv(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }
}

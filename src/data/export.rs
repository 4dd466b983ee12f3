use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::info;

use super::model::{Field, Record};
use crate::error::ExportError;

/// File name offered for the filtered download.
pub const EXPORT_FILE_NAME: &str = "filtered_bus_data.csv";

/// Write `records` as comma-delimited UTF-8 with the canonical header.
///
/// The header is written even when there are no rows.
pub fn write_csv<'a, W, I>(records: I, writer: W) -> Result<(), ExportError>
where
    W: Write,
    I: IntoIterator<Item = &'a Record>,
{
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(Field::ALL.iter().map(|f| f.canonical_name()))?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// The export as an in-memory byte buffer.
pub fn to_csv_bytes<'a, I>(records: I) -> Result<Vec<u8>, ExportError>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut buf = Vec::new();
    write_csv(records, &mut buf)?;
    Ok(buf)
}

/// Write the export to `path`, returning the number of rows written.
pub fn export_to_path<'a, I>(records: I, path: &Path) -> Result<usize, ExportError>
where
    I: IntoIterator<Item = &'a Record>,
{
    let rows: Vec<&Record> = records.into_iter().collect();
    let file = File::create(path)?;
    write_csv(rows.iter().copied(), file)?;
    info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_reader;

    #[test]
    fn header_uses_canonical_names() {
        let bytes = to_csv_bytes(&Vec::<Record>::new()).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "Route,Category,Time_of_Travel,Seat Fare,Total_Amount,Gender,Age_Group\n"
        );
    }

    #[test]
    fn rows_follow_header() {
        let record = Record {
            route: "R1".into(),
            category: "AC, Sleeper".into(),
            time_of_travel: "Night".into(),
            seat_fare: 12.5,
            total_amount: 25.5,
            gender: "Female".into(),
            age_group: "26-35".into(),
        };
        let text = String::from_utf8(to_csv_bytes([&record]).unwrap()).unwrap();
        let mut lines = text.lines();
        lines.next();
        assert_eq!(
            lines.next(),
            Some("R1,\"AC, Sleeper\",Night,12.5,25.5,Female,26-35")
        );
    }

    #[test]
    fn export_loads_back() {
        let records = vec![
            Record {
                route: "R1".into(),
                seat_fare: 0.1,
                total_amount: 1e6,
                ..Record::default()
            },
            Record::default(),
        ];
        let bytes = to_csv_bytes(&records).unwrap();
        let reloaded = load_reader(bytes.as_slice()).unwrap();
        assert_eq!(reloaded.records, records);
    }
}

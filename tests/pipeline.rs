use std::io::Write;

use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

use bus_eda::data::export::{export_to_path, to_csv_bytes, EXPORT_FILE_NAME};
use bus_eda::data::filter::{filter, filtered_records};
use bus_eda::data::loader::{load_csv, load_reader};
use bus_eda::data::model::NOT_AVAILABLE;
use bus_eda::{recompute, CategoricalField, Criteria, DatasetHandle, Field, LoadError};

const SOURCE: &str = "\
Booking ID,Encode Route,Category,Time Of Travel,Seat Fare,Total Ticket Amount,Gender,Age Group
1,A,AC Sleeper,Night,500,1000,Male,26-35
2,B,AC Seater,Morning,300,300,Female,18-25
3,A,AC Sleeper,Night,abc,300,Female,26-35
4,C,Non-AC Seater,Morning,100,100,Male,36-45
5,B,AC Seater,Evening,,,Male,18-25
";

fn source_file(text: &str) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().unwrap();
    write!(tmp, "{}", text).unwrap();
    tmp
}

#[test]
fn loads_and_normalizes_source_file() {
    let tmp = source_file(SOURCE);
    let ds = load_csv(tmp.path()).unwrap();

    assert_eq!(ds.len(), 5);
    assert_eq!(ds.records[2].seat_fare, 0.0);
    assert_eq!(ds.records[4].seat_fare, 0.0);
    assert_eq!(ds.records[4].total_amount, 0.0);
    assert_eq!(
        ds.options(CategoricalField::Route).collect::<Vec<_>>(),
        vec!["A", "B", "C"]
    );
}

#[test]
fn every_subset_of_missing_columns_is_defaulted() {
    for mask in 0u32..(1 << 7) {
        let kept: Vec<Field> = Field::ALL
            .into_iter()
            .enumerate()
            .filter(|(i, _)| mask & (1u32 << *i) != 0)
            .map(|(_, f)| f)
            .collect();
        let header: Vec<&str> = kept.iter().map(|f| f.canonical_name()).collect();
        let row: Vec<&str> = kept
            .iter()
            .map(|f| if f.is_numeric() { "7" } else { "x" })
            .collect();
        let text = if header.is_empty() {
            // A header row with no recognised columns
            "Unrelated\nvalue\n".to_string()
        } else {
            format!("{}\n{}\n", header.join(","), row.join(","))
        };

        let ds = load_reader(text.as_bytes()).unwrap();
        let r = &ds.records[0];
        for field in Field::ALL {
            let present = kept.contains(&field);
            match field {
                Field::SeatFare => assert_eq!(r.seat_fare, if present { 7.0 } else { 0.0 }),
                Field::TotalAmount => assert_eq!(r.total_amount, if present { 7.0 } else { 0.0 }),
                _ => {
                    let cat = CategoricalField::ALL
                        .into_iter()
                        .find(|c| c.field() == field)
                        .unwrap();
                    assert_eq!(r.get(cat), if present { "x" } else { NOT_AVAILABLE });
                }
            }
        }
    }
}

#[test]
fn normalizing_normalized_data_is_a_no_op() {
    let tmp = source_file(SOURCE);
    let ds = load_csv(tmp.path()).unwrap();
    let again = load_reader(to_csv_bytes(&ds.records).unwrap().as_slice()).unwrap();
    assert_eq!(again, ds);
}

#[test]
fn filtered_export_round_trips() {
    let tmp = source_file(SOURCE);
    let ds = load_csv(tmp.path()).unwrap();
    let criteria = Criteria::new().with(CategoricalField::Route, ["A", "B"]);
    let view = filter(&ds, &criteria);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(EXPORT_FILE_NAME);
    assert_eq!(export_to_path(&view.records, &path).unwrap(), 4);

    let reloaded = load_csv(&path).unwrap();
    assert_eq!(reloaded.records, view.records);
}

#[test]
fn recompute_matches_manual_totals() {
    let tmp = source_file(SOURCE);
    let ds = load_csv(tmp.path()).unwrap();
    let criteria = Criteria::new().with(CategoricalField::Gender, ["Male"]);

    let summary = recompute(&ds, &criteria);
    let expected: f64 = filtered_records(&ds, &criteria)
        .iter()
        .map(|r| r.total_amount)
        .sum();

    assert_eq!(summary.kpis.total_tickets, 3);
    assert_eq!(summary.kpis.total_revenue, expected);
    assert_eq!(summary.kpis.total_revenue, 1100.0);
    assert_eq!(summary.kpis.max_booking, 1000.0);
    assert_eq!(summary.insights.dominant_gender, "Male");
}

#[test]
fn top_routes_tie_keeps_first_seen() {
    let text = "\
Encode Route,Total Ticket Amount
A,200
B,300
A,100
C,100
";
    let ds = load_reader(text.as_bytes()).unwrap();
    let summary = recompute(&ds, &Criteria::new());
    let order: Vec<&str> = summary
        .route_revenue_top10
        .iter()
        .map(|r| r.route.as_str())
        .collect();
    assert_eq!(order, vec!["A", "B", "C"]);
}

#[test]
fn empty_selection_degrades_gracefully() {
    let tmp = source_file(SOURCE);
    let ds = load_csv(tmp.path()).unwrap();
    let criteria = Criteria::new()
        .with(CategoricalField::Route, ["C"])
        .with(CategoricalField::Gender, ["Female"]);

    let summary = recompute(&ds, &criteria);
    assert_eq!(summary.kpis.total_tickets, 0);
    assert_eq!(summary.kpis.avg_fare, 0.0);
    assert_eq!(summary.insights.top_route, NOT_AVAILABLE);
    assert!(summary.route_time_heatmap.is_none());
}

#[test]
fn handle_loads_once_and_recomputes() {
    let tmp = source_file(SOURCE);
    let handle = DatasetHandle::new(tmp.path());
    assert!(!handle.is_loaded());

    let summary = handle.recompute(&Criteria::new()).unwrap();
    assert_eq!(summary.kpis.total_tickets, 5);
    assert!(handle.is_loaded());

    // Options stay those of the unfiltered data whatever the selection.
    let ds = handle.get_or_load().unwrap();
    let _ = handle.recompute(&Criteria::new().with(CategoricalField::Route, ["A"]));
    assert_eq!(ds.options(CategoricalField::Route).count(), 3);
}

#[test]
fn missing_source_names_the_path() {
    let err = load_csv(std::path::Path::new("no_such_dir/Final_bus.csv")).unwrap_err();
    assert!(matches!(err, LoadError::NotFound { .. }));
    assert!(err.to_string().contains("Final_bus.csv"));
}

#[test]
fn unparsable_source_is_a_parse_error() {
    let tmp = source_file("Encode Route,Seat Fare\nA,1,extra,cells\n");
    let err = load_csv(tmp.path()).unwrap_err();
    assert!(matches!(err, LoadError::Parse { .. }));
}

#[test]
fn summary_serializes_to_json() {
    let tmp = source_file(SOURCE);
    let ds = load_csv(tmp.path()).unwrap();
    let json = serde_json::to_value(recompute(&ds, &Criteria::new())).unwrap();
    assert_eq!(json["kpis"]["total_tickets"], 5);
    assert_eq!(json["insights"]["top_route"], "A");
    assert!(json["route_time_heatmap"]["routes"].is_array());
}

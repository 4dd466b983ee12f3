use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder for categorical cells that are missing or blank.
pub const NOT_AVAILABLE: &str = "N/A";

// ---------------------------------------------------------------------------
// Field – the seven canonical columns
// ---------------------------------------------------------------------------

/// A canonical column of the normalized dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Route,
    Category,
    TimeOfTravel,
    SeatFare,
    TotalAmount,
    Gender,
    AgeGroup,
}

impl Field {
    /// Canonical column order, also used for export.
    pub const ALL: [Field; 7] = [
        Field::Route,
        Field::Category,
        Field::TimeOfTravel,
        Field::SeatFare,
        Field::TotalAmount,
        Field::Gender,
        Field::AgeGroup,
    ];

    /// Internal (normalized) column name.
    pub const fn canonical_name(self) -> &'static str {
        match self {
            Field::Route => "Route",
            Field::Category => "Category",
            Field::TimeOfTravel => "Time_of_Travel",
            Field::SeatFare => "Seat Fare",
            Field::TotalAmount => "Total_Amount",
            Field::Gender => "Gender",
            Field::AgeGroup => "Age_Group",
        }
    }

    /// Position in [`Field::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn is_numeric(self) -> bool {
        matches!(self, Field::SeatFare | Field::TotalAmount)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

// ---------------------------------------------------------------------------
// CategoricalField – the five filterable columns
// ---------------------------------------------------------------------------

/// A column that can be filtered with an equality set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CategoricalField {
    Route,
    Category,
    TimeOfTravel,
    Gender,
    AgeGroup,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 5] = [
        CategoricalField::Route,
        CategoricalField::Category,
        CategoricalField::TimeOfTravel,
        CategoricalField::Gender,
        CategoricalField::AgeGroup,
    ];

    pub const fn field(self) -> Field {
        match self {
            CategoricalField::Route => Field::Route,
            CategoricalField::Category => Field::Category,
            CategoricalField::TimeOfTravel => Field::TimeOfTravel,
            CategoricalField::Gender => Field::Gender,
            CategoricalField::AgeGroup => Field::AgeGroup,
        }
    }

    /// Human-readable label for filter widgets.
    pub const fn label(self) -> &'static str {
        match self {
            CategoricalField::Route => "Route",
            CategoricalField::Category => "Category",
            CategoricalField::TimeOfTravel => "Time of Travel",
            CategoricalField::Gender => "Gender",
            CategoricalField::AgeGroup => "Age Group",
        }
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Record – one normalized ticket transaction
// ---------------------------------------------------------------------------

/// A single ticket transaction after normalization.
///
/// Serde names match the canonical column names so the filtered view can be
/// written back out with the same header the loader accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Route")]
    pub route: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Time_of_Travel")]
    pub time_of_travel: String,
    #[serde(rename = "Seat Fare")]
    pub seat_fare: f64,
    #[serde(rename = "Total_Amount")]
    pub total_amount: f64,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "Age_Group")]
    pub age_group: String,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            route: NOT_AVAILABLE.to_string(),
            category: NOT_AVAILABLE.to_string(),
            time_of_travel: NOT_AVAILABLE.to_string(),
            seat_fare: 0.0,
            total_amount: 0.0,
            gender: NOT_AVAILABLE.to_string(),
            age_group: NOT_AVAILABLE.to_string(),
        }
    }
}

impl Record {
    /// Value of a categorical column.
    pub fn get(&self, field: CategoricalField) -> &str {
        match field {
            CategoricalField::Route => &self.route,
            CategoricalField::Category => &self.category,
            CategoricalField::TimeOfTravel => &self.time_of_travel,
            CategoricalField::Gender => &self.gender,
            CategoricalField::AgeGroup => &self.age_group,
        }
    }

    /// A booking covers more than one seat when the total exceeds the seat fare.
    pub fn is_multi_seat(&self) -> bool {
        self.total_amount > self.seat_fare
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete normalized table
// ---------------------------------------------------------------------------

/// The normalized rows with a pre-computed index of distinct values per
/// categorical column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// All rows in source order.
    pub records: Vec<Record>,
    /// For each categorical column the sorted set of distinct values.
    pub unique_values: BTreeMap<CategoricalField, BTreeSet<String>>,
}

impl Dataset {
    /// Build the column index from the loaded rows.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut unique_values: BTreeMap<CategoricalField, BTreeSet<String>> = CategoricalField::ALL
            .iter()
            .map(|&field| (field, BTreeSet::new()))
            .collect();

        for record in &records {
            for field in CategoricalField::ALL {
                if let Some(values) = unique_values.get_mut(&field) {
                    if !values.contains(record.get(field)) {
                        values.insert(record.get(field).to_string());
                    }
                }
            }
        }

        Dataset {
            records,
            unique_values,
        }
    }

    /// Distinct sorted values of `field`, used to populate filter controls.
    pub fn options(&self, field: CategoricalField) -> impl Iterator<Item = &str> {
        self.unique_values
            .get(&field)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(route: &str, gender: &str) -> Record {
        Record {
            route: route.to_string(),
            gender: gender.to_string(),
            ..Record::default()
        }
    }

    #[test]
    fn options_are_sorted_and_distinct() {
        let ds = Dataset::from_records(vec![
            record("R2", "Male"),
            record("R1", "Female"),
            record("R2", "Male"),
        ]);
        let routes: Vec<&str> = ds.options(CategoricalField::Route).collect();
        assert_eq!(routes, vec!["R1", "R2"]);
        let genders: Vec<&str> = ds.options(CategoricalField::Gender).collect();
        assert_eq!(genders, vec!["Female", "Male"]);
    }

    #[test]
    fn empty_dataset_has_empty_options() {
        let ds = Dataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert_eq!(ds.options(CategoricalField::AgeGroup).count(), 0);
    }

    #[test]
    fn multi_seat_is_strictly_greater() {
        let mut r = Record::default();
        r.seat_fare = 100.0;
        r.total_amount = 100.0;
        assert!(!r.is_multi_seat());
        r.total_amount = 200.0;
        assert!(r.is_multi_seat());
    }

    #[test]
    fn numeric_fields_are_the_fares() {
        let numeric: Vec<Field> = Field::ALL.into_iter().filter(|f| f.is_numeric()).collect();
        assert_eq!(numeric, vec![Field::SeatFare, Field::TotalAmount]);
    }
}

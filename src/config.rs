use std::ffi::OsString;
use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

use crate::data::filter::Criteria;
use crate::data::model::CategoricalField;

/// Dataset read when no path is given.
pub const DEFAULT_DATA_FILE: &str = "Final_bus.csv";

/// Runtime settings gathered from the command line and environment.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    /// Print the summary as JSON instead of opening a window.
    pub summary_only: bool,
    /// Initial filter selection.
    pub criteria: Criteria,
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            summary_only: false,
            criteria: Criteria::default(),
            window_size: [1400.0, 900.0],
        }
    }
}

/// Command-line flag for each filterable column.
const FILTER_FLAGS: [(&str, CategoricalField); 5] = [
    ("route", CategoricalField::Route),
    ("category", CategoricalField::Category),
    ("time", CategoricalField::TimeOfTravel),
    ("gender", CategoricalField::Gender),
    ("age-group", CategoricalField::AgeGroup),
];

pub fn command() -> Command {
    let mut cmd = Command::new("bus-eda")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Bus travel data dashboard")
        .arg(
            Arg::new("data")
                .value_name("DATA")
                .env("BUS_EDA_DATA")
                .default_value(DEFAULT_DATA_FILE)
                .value_parser(value_parser!(PathBuf))
                .help("CSV file with bus ticket transactions"),
        )
        .arg(
            Arg::new("summary")
                .long("summary")
                .action(ArgAction::SetTrue)
                .help("Print the summary as JSON and exit"),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .default_value("1400")
                .value_parser(value_parser!(f32))
                .help("Initial window width"),
        )
        .arg(
            Arg::new("height")
                .long("height")
                .default_value("900")
                .value_parser(value_parser!(f32))
                .help("Initial window height"),
        );

    for (flag, field) in FILTER_FLAGS {
        cmd = cmd.arg(
            Arg::new(flag)
                .long(flag)
                .action(ArgAction::Append)
                .value_name("VALUE")
                .help(format!("Only include rows with this {} (repeatable)", field.label())),
        );
    }
    cmd
}

impl DashboardConfig {
    /// Parse the process arguments, exiting with usage on error.
    pub fn from_args() -> Self {
        Self::from_matches(&command().get_matches())
    }

    pub fn try_from_iter<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Ok(Self::from_matches(&command().try_get_matches_from(args)?))
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        let defaults = Self::default();

        let mut criteria = Criteria::new();
        for (flag, field) in FILTER_FLAGS {
            if let Some(values) = matches.get_many::<String>(flag) {
                criteria.set(field, values.cloned().collect());
            }
        }

        Self {
            data_path: matches
                .get_one::<PathBuf>("data")
                .cloned()
                .unwrap_or(defaults.data_path),
            summary_only: matches.get_flag("summary"),
            criteria,
            window_size: [
                matches
                    .get_one::<f32>("width")
                    .copied()
                    .unwrap_or(defaults.window_size[0]),
                matches
                    .get_one::<f32>("height")
                    .copied()
                    .unwrap_or(defaults.window_size[1]),
            ],
        }
    }

    /// The initial filter selection.
    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }
}

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use fitbit_client::{DateRange, FitbitError, Series};

#[derive(Debug, Parser)]
#[command(author, version, about = "Refresh the Fitbit token and print an activity summary")]
pub struct Args {
    /// Date range to summarize.
    #[arg(long, value_enum, env = "FITBIT_RANGE", default_value_t = RangeKind::Week)]
    pub range: RangeKind,

    /// Number of days in a trailing range, today included.
    #[arg(long, env = "FITBIT_DAYS", default_value_t = 7)]
    pub days: u32,

    /// Comma-separated series: distance, azm, steps, calories.
    #[arg(
        long,
        env = "FITBIT_SERIES",
        value_delimiter = ',',
        default_value = "distance,azm"
    )]
    pub series: Vec<Series>,

    /// Directory holding `.fitbit_refresh_token`, overrides `FITBIT_CONFIG_DIR`.
    #[arg(long)]
    pub config_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RangeKind {
    /// Since the most recent Sunday.
    Week,
    /// The last `--days` days.
    Trailing,
}

impl Args {
    pub fn date_range(&self, today: NaiveDate) -> Result<DateRange, FitbitError> {
        match self.range {
            RangeKind::Week => Ok(DateRange::week_to_date(today)),
            RangeKind::Trailing => DateRange::trailing(today, self.days),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_weekly_distance_and_azm() {
        let args = Args::try_parse_from(["fitbit-summary"]).expect("args");
        assert_eq!(args.range, RangeKind::Week);
        assert_eq!(args.series, vec![Series::Distance, Series::ActiveZoneMinutes]);
        assert!(args.config_dir.is_none());
    }

    #[test]
    fn trailing_range_uses_days() {
        let args = Args::try_parse_from([
            "fitbit-summary",
            "--range",
            "trailing",
            "--days",
            "3",
            "--series",
            "steps,calories",
        ])
        .expect("args");
        let today = NaiveDate::from_ymd_opt(2022, 5, 4).unwrap();
        let range = args.date_range(today).expect("range");
        assert_eq!(range.start(), NaiveDate::from_ymd_opt(2022, 5, 2).unwrap());
        assert_eq!(args.series, vec![Series::Steps, Series::Calories]);
    }

    #[test]
    fn unknown_series_is_rejected() {
        assert!(Args::try_parse_from(["fitbit-summary", "--series", "sleep"]).is_err());
    }
}

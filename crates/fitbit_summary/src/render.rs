use fitbit_client::Series;
use fitbit_client::summary::SeriesSummary;

/// One line with each series' total, in the order given.
pub fn render(summaries: &[SeriesSummary]) -> String {
    summaries
        .iter()
        .map(|s| render_total(s.series, s.summary.total))
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_total(series: Series, total: f64) -> String {
    let total = total.round();
    match series {
        Series::Distance => format!("{total} km"),
        Series::ActiveZoneMinutes => format!("⚡️ {total}"),
        Series::Steps => format!("👣 {total}"),
        Series::Calories => format!("🔥 {total}"),
    }
}

//! Reduce daily series to a most-recent value and a range total.

use crate::{DailyMetric, DateRange, FitbitClient, FitbitError, Series};
use futures_util::future::try_join_all;
use secrecy::SecretString;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SummaryResult {
    /// Value of the last day in the range, 0 for an empty series.
    pub most_recent: f64,
    pub total: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeriesSummary {
    pub series: Series,
    pub summary: SummaryResult,
}

/// Entries are expected in ascending date order, as the API returns them.
pub fn summarize(metrics: &[DailyMetric]) -> SummaryResult {
    SummaryResult {
        most_recent: metrics.last().map_or(0.0, |m| m.value.as_f64()),
        total: metrics.iter().map(|m| m.value.as_f64()).sum(),
    }
}

#[derive(Clone)]
pub struct ActivitySummaryFetcher {
    client: Arc<dyn FitbitClient>,
}

impl ActivitySummaryFetcher {
    pub fn new(client: Arc<dyn FitbitClient>) -> Self {
        Self { client }
    }

    pub async fn fetch_one(
        &self,
        access_token: &SecretString,
        series: Series,
        range: DateRange,
    ) -> Result<SeriesSummary, FitbitError> {
        let metrics = self
            .client
            .get_daily_series(access_token, series, range)
            .await?;
        let summary = summarize(&metrics);
        tracing::debug!(
            %series,
            total = summary.total,
            most_recent = summary.most_recent,
            "summarized series"
        );
        Ok(SeriesSummary { series, summary })
    }

    /// Fetch every series concurrently; results keep the order of `series`.
    ///
    /// The first failure fails the whole call, so callers never see a partial summary.
    pub async fn fetch(
        &self,
        access_token: &SecretString,
        range: DateRange,
        series: &[Series],
    ) -> Result<Vec<SeriesSummary>, FitbitError> {
        tracing::info!(%range, count = series.len(), "fetching series");
        try_join_all(
            series
                .iter()
                .map(|&s| self.fetch_one(access_token, s, range)),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Credentials, MetricValue, TokenPair, ZoneMinutes};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn day(d: u32, value: MetricValue) -> DailyMetric {
        DailyMetric {
            date: NaiveDate::from_ymd_opt(2022, 5, d).unwrap(),
            value,
        }
    }

    #[test]
    fn summarize_two_days() {
        let metrics = [
            day(1, MetricValue::Number(21.0)),
            day(2, MetricValue::Number(25.0)),
        ];
        let s = summarize(&metrics);
        assert_eq!(s.most_recent, 25.0);
        assert_eq!(s.total, 46.0);
    }

    #[test]
    fn summarize_empty_is_zero() {
        assert_eq!(summarize(&[]), SummaryResult::default());
    }

    #[test]
    fn summarize_parsed_distance_strings() {
        let metrics: Vec<DailyMetric> = serde_json::from_value(serde_json::json!([
            {"dateTime": "2022-05-01", "value": "1.5"},
            {"dateTime": "2022-05-02", "value": "2.25"}
        ]))
        .unwrap();
        assert_eq!(summarize(&metrics).total, 3.75);
    }

    #[test]
    fn summarize_zone_minutes_uses_active_total() {
        let zones = |n| {
            MetricValue::Zones(ZoneMinutes {
                active_zone_minutes: n,
                ..ZoneMinutes::default()
            })
        };
        let s = summarize(&[day(1, zones(10)), day(2, zones(32))]);
        assert_eq!(s.total, 42.0);
        assert_eq!(s.most_recent, 32.0);
    }

    struct CannedSeries(HashMap<Series, Result<Vec<DailyMetric>, String>>);

    #[async_trait]
    impl FitbitClient for CannedSeries {
        async fn refresh_access_token(
            &self,
            _credentials: &Credentials,
        ) -> Result<TokenPair, FitbitError> {
            unreachable!()
        }

        async fn get_daily_series(
            &self,
            _access_token: &SecretString,
            series: Series,
            _range: DateRange,
        ) -> Result<Vec<DailyMetric>, FitbitError> {
            match self.0.get(&series) {
                Some(Ok(v)) => Ok(v.clone()),
                Some(Err(msg)) => Err(FitbitError::ResponseShape(msg.clone())),
                None => Ok(Vec::new()),
            }
        }
    }

    fn range() -> DateRange {
        DateRange::week_to_date(NaiveDate::from_ymd_opt(2022, 5, 2).unwrap())
    }

    #[tokio::test]
    async fn fetch_keeps_requested_order() {
        let mut canned = HashMap::new();
        canned.insert(
            Series::Distance,
            Ok(vec![day(1, MetricValue::Number(1.5)), day(2, MetricValue::Number(2.25))]),
        );
        canned.insert(Series::Steps, Ok(vec![day(2, MetricValue::Number(9000.0))]));
        let fetcher = ActivitySummaryFetcher::new(Arc::new(CannedSeries(canned)));

        let token = SecretString::new("tok".into());
        let out = fetcher
            .fetch(&token, range(), &[Series::Steps, Series::Distance])
            .await
            .expect("summaries");
        assert_eq!(out[0].series, Series::Steps);
        assert_eq!(out[0].summary.total, 9000.0);
        assert_eq!(out[1].series, Series::Distance);
        assert_eq!(out[1].summary.total, 3.75);
    }

    #[tokio::test]
    async fn fetch_fails_whole_on_any_shape_error() {
        let mut canned = HashMap::new();
        canned.insert(Series::Distance, Ok(vec![day(1, MetricValue::Number(1.0))]));
        canned.insert(
            Series::ActiveZoneMinutes,
            Err("missing `activities-active-zone-minutes`".to_string()),
        );
        let fetcher = ActivitySummaryFetcher::new(Arc::new(CannedSeries(canned)));

        let token = SecretString::new("tok".into());
        let res = fetcher
            .fetch(&token, range(), &[Series::Distance, Series::ActiveZoneMinutes])
            .await;
        assert!(matches!(res, Err(FitbitError::ResponseShape(_))));
    }
}

use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;

use serde::Serialize;
use thiserror::Error;

use super::filter::FilteredView;
use super::model::{Column, SpeedLimit};

/// Non-fatal problem surfaced next to aggregate results.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum AggregateError {
    #[error("field not found: {0}")]
    FieldNotFound(String),
}

// ---------------------------------------------------------------------------
// Frequency table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyEntry<K> {
    pub value: K,
    pub count: usize,
}

/// Count of records per distinct value, in presentation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FrequencyTable<K> {
    entries: Vec<FrequencyEntry<K>>,
}

impl<K> FrequencyTable<K> {
    pub fn entries(&self) -> &[FrequencyEntry<K>] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> {
        self.entries.iter().map(|e| (&e.value, e.count))
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn max_count(&self) -> usize {
        self.entries.iter().map(|e| e.count).max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K> FromIterator<(K, usize)> for FrequencyTable<K> {
    fn from_iter<I: IntoIterator<Item = (K, usize)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(value, count)| FrequencyEntry { value, count })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Devices in the view.
    pub count: usize,
    /// Distinct speed limits, `None` when the column is absent.
    pub distinct_speed_limits: Option<usize>,
    /// Distinct camera directions, `None` when the column is absent.
    pub distinct_directions: Option<usize>,
}

fn missing(view: &FilteredView<'_>, column: Column) -> AggregateError {
    AggregateError::FieldNotFound(view.dataset().label(column).to_string())
}

fn count_distinct<T: Eq + Hash>(values: impl Iterator<Item = T>) -> usize {
    values.collect::<HashSet<_>>().len()
}

/// Row count and distinct counts of speed limit and camera direction.
pub fn summarize(view: &FilteredView<'_>) -> Summary {
    let ds = view.dataset();
    Summary {
        count: view.len(),
        distinct_speed_limits: ds
            .has_column(Column::SpeedLimit)
            .then(|| count_distinct(view.records().filter_map(|r| r.speed_limit))),
        distinct_directions: ds
            .has_column(Column::CameraDirection)
            .then(|| count_distinct(view.records().filter_map(|r| r.camera_direction.as_deref()))),
    }
}

/// Devices per speed limit, ascending by speed limit.
pub fn speed_limit_frequency(
    view: &FilteredView<'_>,
) -> Result<FrequencyTable<SpeedLimit>, AggregateError> {
    if !view.dataset().has_column(Column::SpeedLimit) {
        return Err(missing(view, Column::SpeedLimit));
    }
    let mut counts: BTreeMap<SpeedLimit, usize> = BTreeMap::new();
    for limit in view.records().filter_map(|r| r.speed_limit) {
        *counts.entry(limit).or_default() += 1;
    }
    Ok(counts.into_iter().collect())
}

/// Devices per camera direction, most frequent first. Ties keep the order in
/// which the directions first appear in the view.
pub fn direction_frequency(
    view: &FilteredView<'_>,
) -> Result<FrequencyTable<String>, AggregateError> {
    if !view.dataset().has_column(Column::CameraDirection) {
        return Err(missing(view, Column::CameraDirection));
    }
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for direction in view.records().filter_map(|r| r.camera_direction.as_deref()) {
        let count = counts.entry(direction).or_insert_with(|| {
            order.push(direction);
            0
        });
        *count += 1;
    }
    // Stable sort keeps first-appearance order among equal counts.
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    Ok(order
        .into_iter()
        .map(|d| (d.to_string(), counts[d]))
        .collect())
}

// ---------------------------------------------------------------------------
// Report – everything the dashboard shows for one selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub summary: Summary,
    pub speed_limits: Option<FrequencyTable<SpeedLimit>>,
    pub directions: Option<FrequencyTable<String>>,
    /// Aggregates that were skipped and why.
    pub notices: Vec<AggregateError>,
}

impl Report {
    /// Report for an empty selection against a dataset without any columns
    /// missing. Used before the first filter runs.
    pub fn empty() -> Self {
        Self {
            summary: Summary {
                count: 0,
                distinct_speed_limits: Some(0),
                distinct_directions: Some(0),
            },
            speed_limits: Some(FrequencyTable::from_iter(Vec::new())),
            directions: Some(FrequencyTable::from_iter(Vec::new())),
            notices: Vec::new(),
        }
    }
}

/// Compute the summary and both frequency tables, collecting notices for
/// any aggregate whose column is missing.
pub fn build_report(view: &FilteredView<'_>) -> Report {
    let mut notices = Vec::new();

    let speed_limits = speed_limit_frequency(view)
        .map_err(|e| notices.push(e))
        .ok();
    let directions = direction_frequency(view)
        .map_err(|e| notices.push(e))
        .ok();

    for notice in &notices {
        log::warn!("{notice}");
    }

    Report {
        summary: summarize(view),
        speed_limits,
        directions,
        notices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{apply_filter, FilterCriteria};
    use crate::data::model::{ColumnSet, Dataset, Record};

    fn device(speed: Option<f64>, direction: Option<&str>) -> Record {
        Record {
            district: Some("North".to_string()),
            jurisdiction: Some("East Precinct".to_string()),
            speed_limit: speed.map(SpeedLimit),
            camera_direction: direction.map(str::to_string),
            ..Default::default()
        }
    }

    fn north_east() -> Dataset {
        let mut records = vec![
            device(Some(40.0), Some("N")),
            device(Some(40.0), Some("N")),
            device(Some(50.0), Some("S")),
            device(Some(60.0), Some("S")),
            device(None, Some("S")),
        ];
        records.push(Record {
            district: Some("North".to_string()),
            jurisdiction: Some("West Precinct".to_string()),
            speed_limit: Some(SpeedLimit(70.0)),
            camera_direction: Some("E".to_string()),
            ..Default::default()
        });
        Dataset::from_records(records)
    }

    #[test]
    fn north_east_precinct_example() {
        let ds = north_east();
        let view = apply_filter(&ds, &FilterCriteria::new("North", "East Precinct"));

        let summary = summarize(&view);
        assert_eq!(summary.count, 5);
        assert_eq!(summary.distinct_speed_limits, Some(3));
        assert_eq!(summary.distinct_directions, Some(2));

        let speeds: Vec<_> = speed_limit_frequency(&view)
            .unwrap()
            .iter()
            .map(|(k, c)| (k.value(), c))
            .collect();
        assert_eq!(speeds, vec![(40.0, 2), (50.0, 1), (60.0, 1)]);

        let directions: Vec<_> = direction_frequency(&view)
            .unwrap()
            .iter()
            .map(|(k, c)| (k.clone(), c))
            .collect();
        assert_eq!(directions, vec![("S".to_string(), 3), ("N".to_string(), 2)]);
    }

    #[test]
    fn speed_limit_counts_sum_to_numeric_rows() {
        let ds = north_east();
        let view = apply_filter(&ds, &FilterCriteria::new("North", "East Precinct"));
        let numeric = view.records().filter(|r| r.speed_limit.is_some()).count();

        assert_eq!(speed_limit_frequency(&view).unwrap().total(), numeric);
        assert_eq!(summarize(&view).count, view.len());
    }

    #[test]
    fn direction_ties_keep_first_appearance() {
        let ds = Dataset::from_records(vec![
            device(None, Some("W")),
            device(None, Some("E")),
            device(None, Some("E")),
            device(None, Some("W")),
            device(None, Some("N")),
        ]);
        let view = apply_filter(&ds, &FilterCriteria::new("North", "East Precinct"));
        let order: Vec<_> = direction_frequency(&view)
            .unwrap()
            .iter()
            .map(|(k, _)| k.clone())
            .collect();
        assert_eq!(order, vec!["W", "E", "N"]);
    }

    #[test]
    fn empty_view_reports_zeros() {
        let ds = north_east();
        let view = apply_filter(&ds, &FilterCriteria::new("South", "Nowhere"));
        let report = build_report(&view);

        assert_eq!(report.summary.count, 0);
        assert_eq!(report.summary.distinct_speed_limits, Some(0));
        assert_eq!(report.summary.distinct_directions, Some(0));
        assert!(report.speed_limits.unwrap().is_empty());
        assert!(report.directions.unwrap().is_empty());
        assert!(report.notices.is_empty());
    }

    #[test]
    fn missing_column_skips_aggregate_with_notice() {
        let mut ds = north_east();
        ds.columns = [Column::District, Column::Jurisdiction, Column::CameraDirection]
            .into_iter()
            .collect::<ColumnSet>();
        let view = apply_filter(&ds, &FilterCriteria::new("North", "East Precinct"));
        let report = build_report(&view);

        assert_eq!(report.summary.count, 5);
        assert_eq!(report.summary.distinct_speed_limits, None);
        assert!(report.speed_limits.is_none());
        assert!(report.directions.is_some());
        assert_eq!(
            report.notices,
            vec![AggregateError::FieldNotFound("speed_limit".to_string())]
        );
        assert_eq!(report.notices[0].to_string(), "field not found: speed_limit");
    }

    #[test]
    fn report_serializes_tables_as_lists() {
        let ds = north_east();
        let view = apply_filter(&ds, &FilterCriteria::new("North", "West Precinct"));
        let json = serde_json::to_value(build_report(&view)).unwrap();

        assert_eq!(json["summary"]["count"], 1);
        assert_eq!(json["speed_limits"][0]["value"], 70.0);
        assert_eq!(json["directions"][0]["value"], "E");
        assert_eq!(json["directions"][0]["count"], 1);
    }
}

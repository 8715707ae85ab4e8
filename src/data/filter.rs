use std::collections::BTreeSet;

use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Violation kinds offered by the keyword selector
// ---------------------------------------------------------------------------

/// Violation types a device may enforce. The installation-location text of
/// the source data names them, so each kind doubles as a match keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ViolationKind {
    RunningRedLight,
    RightTurnOnRed,
    StopLine,
    IgnoringMarkings,
    NotYieldingToPedestrians,
    IllegalParking,
    Speeding,
    NotStoppingAtFlashingRed,
}

impl ViolationKind {
    pub const ALL: [ViolationKind; 8] = [
        ViolationKind::RunningRedLight,
        ViolationKind::RightTurnOnRed,
        ViolationKind::StopLine,
        ViolationKind::IgnoringMarkings,
        ViolationKind::NotYieldingToPedestrians,
        ViolationKind::IllegalParking,
        ViolationKind::Speeding,
        ViolationKind::NotStoppingAtFlashingRed,
    ];

    /// English label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            ViolationKind::RunningRedLight => "running a red light",
            ViolationKind::RightTurnOnRed => "right-turn-on-red violation",
            ViolationKind::StopLine => "stop-line violation",
            ViolationKind::IgnoringMarkings => "failure to follow markings",
            ViolationKind::NotYieldingToPedestrians => "failure to yield to pedestrians",
            ViolationKind::IllegalParking => "illegal parking",
            ViolationKind::Speeding => "speeding",
            ViolationKind::NotStoppingAtFlashingRed => "failure to stop at flashing red",
        }
    }

    /// Term as written in the source data's installation-location column.
    pub fn keyword(self) -> &'static str {
        match self {
            ViolationKind::RunningRedLight => "闖紅燈",
            ViolationKind::RightTurnOnRed => "紅燈右轉",
            ViolationKind::StopLine => "紅燈越線",
            ViolationKind::IgnoringMarkings => "未依標誌標線行駛",
            ViolationKind::NotYieldingToPedestrians => "車輛未停讓行人",
            ViolationKind::IllegalParking => "違規停車",
            ViolationKind::Speeding => "超速",
            ViolationKind::NotStoppingAtFlashingRed => "行經閃紅號誌路口未停車再開",
        }
    }
}

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// One district, one jurisdiction, and optional location keywords.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub district: String,
    pub jurisdiction: String,
    /// Empty means no keyword filtering.
    pub keywords: Vec<String>,
}

impl FilterCriteria {
    pub fn new(district: impl Into<String>, jurisdiction: impl Into<String>) -> Self {
        Self {
            district: district.into(),
            jurisdiction: jurisdiction.into(),
            keywords: Vec::new(),
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Whether a record passes every active constraint.
    ///
    /// Keyword matching is a case-sensitive substring test; a record with no
    /// installation location never matches a non-empty keyword list.
    pub fn matches(&self, record: &Record) -> bool {
        if record.district.as_deref() != Some(self.district.as_str())
            || record.jurisdiction.as_deref() != Some(self.jurisdiction.as_str())
        {
            return false;
        }
        if self.keywords.is_empty() {
            return true;
        }
        match &record.installation_location {
            Some(location) => self.keywords.iter().any(|k| location.contains(k.as_str())),
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Selector options
// ---------------------------------------------------------------------------

/// Sorted distinct districts.
pub fn list_districts(dataset: &Dataset) -> BTreeSet<String> {
    dataset
        .records
        .iter()
        .filter_map(|r| r.district.clone())
        .collect()
}

/// Sorted distinct jurisdictions that co-occur with `district`.
pub fn list_jurisdictions(dataset: &Dataset, district: &str) -> BTreeSet<String> {
    dataset
        .records
        .iter()
        .filter(|r| r.district.as_deref() == Some(district))
        .filter_map(|r| r.jurisdiction.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Records of a dataset that passed a filter, in file order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// Rebuild a view from indices computed earlier against the same dataset.
    pub fn from_indices(dataset: &'a Dataset, indices: Vec<usize>) -> Self {
        Self { dataset, indices }
    }

    /// A view with no rows.
    pub fn empty(dataset: &'a Dataset) -> Self {
        Self::from_indices(dataset, Vec::new())
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }

    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let dataset = self.dataset;
        self.indices.iter().map(move |&i| &dataset.records[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Return the records that pass `criteria`.
pub fn apply_filter<'a>(dataset: &'a Dataset, criteria: &FilterCriteria) -> FilteredView<'a> {
    let indices = dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| criteria.matches(r))
        .map(|(i, _)| i)
        .collect();
    FilteredView::from_indices(dataset, indices)
}

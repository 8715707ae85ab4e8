use std::collections::BTreeSet;
use std::sync::Arc;

use crate::data::aggregate::{build_report, Report};
use crate::data::filter::{
    apply_filter, list_districts, list_jurisdictions, FilterCriteria, FilteredView, ViolationKind,
};
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<Arc<Dataset>>,

    /// Options for the district selector.
    pub districts: Vec<String>,

    /// Options for the jurisdiction selector, given the current district.
    pub jurisdictions: Vec<String>,

    pub district: Option<String>,
    pub jurisdiction: Option<String>,

    /// Violation kinds ticked in the keyword selector.
    pub violations: BTreeSet<ViolationKind>,

    /// Indices of records passing the current filter (cached).
    pub visible_indices: Vec<usize>,

    /// Aggregates over the visible records (cached).
    pub report: Report,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            districts: Vec::new(),
            jurisdictions: Vec::new(),
            district: None,
            jurisdiction: None,
            violations: BTreeSet::new(),
            visible_indices: Vec::new(),
            report: Report::empty(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset and select its first district.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.districts = list_districts(&dataset).into_iter().collect();
        self.dataset = Some(dataset);
        self.status_message = None;

        let first = self.districts.first().cloned();
        self.select_district(first);
    }

    /// Change district; the jurisdiction falls back to the first one
    /// available in the new district.
    pub fn select_district(&mut self, district: Option<String>) {
        self.jurisdictions = match (&self.dataset, &district) {
            (Some(ds), Some(d)) => list_jurisdictions(ds, d).into_iter().collect(),
            _ => Vec::new(),
        };
        self.district = district;
        self.jurisdiction = self.jurisdictions.first().cloned();
        self.refilter();
    }

    pub fn select_jurisdiction(&mut self, jurisdiction: String) {
        self.jurisdiction = Some(jurisdiction);
        self.refilter();
    }

    /// Tick or untick a violation kind in the keyword selector.
    pub fn toggle_violation(&mut self, kind: ViolationKind) {
        if !self.violations.remove(&kind) {
            self.violations.insert(kind);
        }
        self.refilter();
    }

    /// Criteria for the current selection. Missing selections match nothing.
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new(
            self.district.clone().unwrap_or_default(),
            self.jurisdiction.clone().unwrap_or_default(),
        )
        .with_keywords(self.violations.iter().map(|v| v.keyword()))
    }

    /// Recompute `visible_indices` and `report` after a selection change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let view = if self.district.is_some() && self.jurisdiction.is_some() {
            apply_filter(ds, &self.criteria())
        } else {
            FilteredView::empty(ds)
        };
        self.report = build_report(&view);
        log::debug!(
            "Filter {:?} matched {} of {} records",
            self.criteria(),
            view.len(),
            ds.len()
        );
        self.visible_indices = view.into_indices();
    }
}

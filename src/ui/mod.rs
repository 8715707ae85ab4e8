//! egui widgets: filter panel, metrics, data table and charts.

pub mod charts;
pub mod panels;

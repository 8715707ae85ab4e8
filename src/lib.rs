//! Traffic-enforcement device dashboard.
//!
//! The `data` module holds the pure filter/aggregate core; `state`, `app`
//! and `ui` wrap it in an egui desktop application.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;

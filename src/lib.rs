//! Workforce attendance reporting.
//!
//! Turns raw check-in/check-out events, a per-month working-days calendar and
//! an approved-leave ledger into per-user monthly summaries and day-by-day
//! attendance grids, served over HTTP and exportable as spreadsheets.

pub mod api;
pub mod config;
pub mod db;
pub mod docs;
pub mod export;
pub mod model;
pub mod provider;
pub mod report;
pub mod routes;

//! Filtering and aggregation core for the New England airports dashboard.
//!
//! The library is GUI-free: front ends call [`dashboard::recompute`] with the
//! current [`data::filter::FilterCriteria`] and render the returned
//! [`dashboard::DashboardView`].

pub mod color;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod view;

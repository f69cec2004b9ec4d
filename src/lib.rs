#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Subscription sign-up form: field validation, idle detection and a
//! terminal front end.

pub mod config;
pub mod form;
pub mod model;
pub mod state;
pub mod tui;

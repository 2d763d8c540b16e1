//! Core of regcheck: declarative regression-test definitions and the harness
//! pipeline that builds, runs and checks them.

pub mod api;
pub mod config;
pub mod definition;
pub mod engine;
pub mod error;
pub mod events_out;
pub mod report;
pub mod runner;
pub mod sanity;
pub mod select;

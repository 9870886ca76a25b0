pub mod catalog;
pub mod composition;
pub mod config;
pub mod elements;
pub mod presets;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod solver;
pub mod units;

pub mod app;

//! Experiment reporters for the max-flow matching and greedy set-cover runs.
//!
//! Both reporters follow the same path: load the result CSVs, aggregate by
//! problem size, fit a polynomial to the runtime for a complexity label,
//! render PNG figures and print a short console summary.

pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod fit;
pub mod report;

//! One module per experiment reporter.
//!
//! Each exposes a report type (load → aggregate → fit) with a `Display`
//! summary, and a `run` pipeline that also renders the figures.
pub mod flow;
pub mod setcover;

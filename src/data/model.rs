use serde::Deserialize;

// ---------------------------------------------------------------------------
// Samples – one row of an experiment CSV
// ---------------------------------------------------------------------------

/// One max-flow trial (a row of `flow_p*.csv`).
///
/// Columns are matched by header name; extra columns are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FlowSample {
    /// Problem size `n` (drivers = requests).
    pub size: u32,
    pub runtime_ms: f64,
    /// Value of the maximum flow, i.e. number of matched requests.
    pub flow_value: f64,
}

/// One greedy set-cover trial (a row of `setcover_runtime.csv`).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SetCoverSample {
    /// Problem size `n` (number of students).
    pub size: u32,
    pub runtime_ms: f64,
    /// Stops selected by the greedy cover.
    pub num_stops: f64,
}

/// Rows that carry a problem size, so the loader can validate them uniformly.
pub trait SizedSample {
    fn size(&self) -> u32;
}

impl SizedSample for FlowSample {
    fn size(&self) -> u32 {
        self.size
    }
}

impl SizedSample for SetCoverSample {
    fn size(&self) -> u32 {
        self.size
    }
}

// ---------------------------------------------------------------------------
// AggregatedPoint – one group after grouping by size
// ---------------------------------------------------------------------------

/// Summary of one metric over all samples sharing a problem size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatedPoint {
    pub size: u32,
    pub mean: f64,
    /// Sample standard deviation; `None` for a single-sample group.
    pub std_dev: Option<f64>,
    /// Number of samples in the group.
    pub count: usize,
}

impl AggregatedPoint {
    /// Problem size as a plotting coordinate.
    pub fn x(&self) -> f64 {
        self.size as f64
    }
}

// ---------------------------------------------------------------------------
// SpatialLayout – the bus-stop visualization record
// ---------------------------------------------------------------------------

/// Point sets parsed from `visualization.csv`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpatialLayout {
    pub students: Vec<(f64, f64)>,
    pub selected_stops: Vec<(f64, f64)>,
    pub unselected_stops: Vec<(f64, f64)>,
}

impl SpatialLayout {
    /// Iterate over every point in the layout, regardless of section.
    pub fn all_points(&self) -> impl Iterator<Item = &(f64, f64)> {
        self.students
            .iter()
            .chain(self.selected_stops.iter())
            .chain(self.unselected_stops.iter())
    }

    /// Whether no section holds any point.
    pub fn is_empty(&self) -> bool {
        self.all_points().next().is_none()
    }
}

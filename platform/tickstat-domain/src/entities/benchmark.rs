use serde::{Deserialize, Serialize};

pub const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// One measurement per (strategy, input size).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub strategy_name: String,
    pub input_size: usize,
    /// Fastest of `repeats` trials.
    pub elapsed_seconds: f64,
    /// `None` when memory sampling was disabled.
    pub peak_memory_mib: Option<f64>,
    pub repeats: usize,
    pub signals_emitted: usize,
    pub total_return: f64,
    pub attribution: Option<StepAttribution>,
}

/// Per-`update` cost breakdown of a single run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepAttribution {
    pub calls: usize,
    pub total_seconds: f64,
    pub mean_ns: f64,
    pub p50_ns: u64,
    pub p99_ns: u64,
    pub max_ns: u64,
    /// Consecutive slices of the run, in order.
    pub segments: Vec<SegmentCost>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentCost {
    /// Index of the first update in the slice.
    pub start: usize,
    pub calls: usize,
    pub mean_ns: f64,
}

pub fn bytes_to_mib(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MIB
}

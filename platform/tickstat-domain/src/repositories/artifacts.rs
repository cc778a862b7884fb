use crate::entities::benchmark::BenchmarkResult;
use std::path::Path;

pub trait BenchArtifactWriter {
    fn ensure_dir(&self, path: &Path) -> Result<(), String>;
    fn write_results_csv(&self, path: &Path, results: &[BenchmarkResult]) -> Result<(), String>;
    fn write_json(&self, path: &Path, value: &serde_json::Value) -> Result<(), String>;
}

use serde::Serialize;
use std::path::{Path, PathBuf};
use tickstat_domain::entities::benchmark::BenchmarkResult;
use tickstat_domain::repositories::artifacts::BenchArtifactWriter;
use tracing::info_span;

/// Parallel (size, seconds) and (size, MiB) series for one strategy, ready
/// for an external plotter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSeries {
    pub strategy_name: String,
    pub sizes: Vec<usize>,
    pub elapsed_seconds: Vec<f64>,
    pub peak_memory_mib: Vec<Option<f64>>,
}

impl ReportSeries {
    /// Time ratio between consecutive sizes, paired with the size ratio.
    /// A linear-total strategy tracks the size ratio; a quadratic one tracks
    /// its square.
    pub fn time_growth(&self) -> Vec<(f64, f64)> {
        self.sizes
            .windows(2)
            .zip(self.elapsed_seconds.windows(2))
            .filter(|(_, t)| t[0] > 0.0)
            .map(|(n, t)| (n[1] as f64 / n[0] as f64, t[1] / t[0]))
            .collect()
    }
}

/// Groups results per strategy, keeping first-seen strategy order and the
/// input-size order within each strategy.
pub fn build_series(results: &[BenchmarkResult]) -> Vec<ReportSeries> {
    let mut series: Vec<ReportSeries> = Vec::new();
    for result in results {
        let idx = match series
            .iter()
            .position(|s| s.strategy_name == result.strategy_name)
        {
            Some(idx) => idx,
            None => {
                series.push(ReportSeries {
                    strategy_name: result.strategy_name.clone(),
                    sizes: Vec::new(),
                    elapsed_seconds: Vec::new(),
                    peak_memory_mib: Vec::new(),
                });
                series.len() - 1
            }
        };
        let entry = &mut series[idx];
        entry.sizes.push(result.input_size);
        entry.elapsed_seconds.push(result.elapsed_seconds);
        entry.peak_memory_mib.push(result.peak_memory_mib);
    }
    series
}

pub fn series_json(series: &[ReportSeries]) -> Result<serde_json::Value, String> {
    serde_json::to_value(series).map_err(|err| format!("failed to serialize series: {err}"))
}

pub fn attribution_json(results: &[BenchmarkResult]) -> Option<serde_json::Value> {
    let entries: Vec<serde_json::Value> = results
        .iter()
        .filter_map(|r| {
            let attribution = r.attribution.as_ref()?;
            Some(serde_json::json!({
                "strategy_name": r.strategy_name,
                "input_size": r.input_size,
                "attribution": attribution,
            }))
        })
        .collect();
    (!entries.is_empty()).then(|| serde_json::Value::Array(entries))
}

pub struct WriteReportResult {
    pub out_dir: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Writes `results.csv`, `series.json` and, when attribution ran,
/// `attribution.json` into `out_dir`.
pub fn write_report(
    out_dir: &Path,
    results: &[BenchmarkResult],
    writer: &dyn BenchArtifactWriter,
) -> Result<WriteReportResult, String> {
    let _span = info_span!("write_report", out_dir = %out_dir.display()).entered();

    writer.ensure_dir(out_dir)?;
    let mut files = Vec::new();

    let results_path = out_dir.join("results.csv");
    writer.write_results_csv(&results_path, results)?;
    files.push(results_path);

    let series_path = out_dir.join("series.json");
    writer.write_json(&series_path, &series_json(&build_series(results))?)?;
    files.push(series_path);

    if let Some(value) = attribution_json(results) {
        let path = out_dir.join("attribution.json");
        writer.write_json(&path, &value)?;
        files.push(path);
    }

    tracing::info!(files = files.len(), "benchmark report written");
    Ok(WriteReportResult {
        out_dir: out_dir.to_path_buf(),
        files,
    })
}

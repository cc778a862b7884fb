use std::fs;
use std::path::Path;
use tickstat_domain::entities::benchmark::BenchmarkResult;
use tickstat_domain::repositories::artifacts::BenchArtifactWriter;

#[derive(Debug, Default, Clone, Copy)]
pub struct FilesystemArtifactWriter;

impl FilesystemArtifactWriter {
    pub fn new() -> Self {
        Self
    }
}

impl BenchArtifactWriter for FilesystemArtifactWriter {
    fn ensure_dir(&self, path: &Path) -> Result<(), String> {
        fs::create_dir_all(path)
            .map_err(|err| format!("failed to create dir {}: {}", path.display(), err))
    }

    fn write_results_csv(&self, path: &Path, results: &[BenchmarkResult]) -> Result<(), String> {
        write_results_csv(path, results)
    }

    fn write_json(&self, path: &Path, value: &serde_json::Value) -> Result<(), String> {
        let raw = serde_json::to_string_pretty(value)
            .map_err(|err| format!("failed to serialize {}: {}", path.display(), err))?;
        fs::write(path, raw).map_err(|err| format!("failed to write {}: {}", path.display(), err))
    }
}

pub fn write_results_csv(path: &Path, results: &[BenchmarkResult]) -> Result<(), String> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|err| format!("failed to create results csv {}: {}", path.display(), err))?;
    wtr.write_record([
        "strategy_name",
        "input_size",
        "elapsed_seconds",
        "peak_memory_mib",
        "repeats",
        "signals_emitted",
        "total_return",
    ])
    .map_err(|err| format!("failed to write results csv header: {}", err))?;

    for result in results {
        wtr.write_record([
            result.strategy_name.clone(),
            result.input_size.to_string(),
            result.elapsed_seconds.to_string(),
            result
                .peak_memory_mib
                .map(|mib| mib.to_string())
                .unwrap_or_default(),
            result.repeats.to_string(),
            result.signals_emitted.to_string(),
            result.total_return.to_string(),
        ])
        .map_err(|err| format!("failed to write results row: {}", err))?;
    }

    wtr.flush()
        .map_err(|err| format!("failed to flush results csv: {}", err))
}

use crate::benchmarking::{BenchPlan, MemorySampling};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tickstat_domain::services::strategy::{StrategyKind, DEFAULT_WINDOW};

pub const DEFAULT_INPUT_SIZES: [usize; 3] = [1_000, 10_000, 100_000];
pub const DEFAULT_REPEATS: usize = 3;
pub const DEFAULT_SYNTHETIC_TICKS: usize = 100_000;
pub const DEFAULT_SYMBOL: &str = "SYNTH";
pub const DEFAULT_INTERVAL_MS: u64 = 10;
pub const DEFAULT_MAX_SAMPLING_MS: u64 = 60_000;
pub const DEFAULT_SEGMENTS: usize = 10;
pub const DEFAULT_OUT_DIR: &str = "runs/";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub bench: BenchConfig,
    pub memory: Option<MemoryConfig>,
    pub attribution: Option<AttributionConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    pub csv_path: Option<String>,
    pub synthetic_ticks: Option<usize>,
    pub symbol: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct BenchConfig {
    pub input_sizes: Option<Vec<usize>>,
    pub repeats: Option<usize>,
    pub strategies: Option<Vec<String>>,
    pub window: Option<usize>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    pub enabled: Option<bool>,
    pub interval_ms: Option<u64>,
    pub max_sampling_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct AttributionConfig {
    pub enabled: Option<bool>,
    pub segments: Option<usize>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub out_dir: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
}

impl Config {
    pub fn input_sizes(&self) -> Vec<usize> {
        self.bench
            .input_sizes
            .clone()
            .unwrap_or_else(|| DEFAULT_INPUT_SIZES.to_vec())
    }

    pub fn repeats(&self) -> usize {
        self.bench.repeats.unwrap_or(DEFAULT_REPEATS)
    }

    pub fn window(&self) -> usize {
        self.bench.window.unwrap_or(DEFAULT_WINDOW)
    }

    pub fn strategies(&self) -> Result<Vec<StrategyKind>, String> {
        let window = self.window();
        match &self.bench.strategies {
            None => Ok(vec![
                StrategyKind::FullHistory,
                StrategyKind::FixedWindow { window },
                StrategyKind::RunningAggregate,
            ]),
            Some(labels) => labels
                .iter()
                .map(|label| StrategyKind::parse(label, window))
                .collect(),
        }
    }

    pub fn memory_sampling(&self) -> Option<MemorySampling> {
        let memory = self.memory.clone().unwrap_or_default();
        if !memory.enabled.unwrap_or(true) {
            return None;
        }
        Some(MemorySampling {
            interval: Duration::from_millis(memory.interval_ms.unwrap_or(DEFAULT_INTERVAL_MS)),
            max_sampling: Duration::from_millis(
                memory.max_sampling_ms.unwrap_or(DEFAULT_MAX_SAMPLING_MS),
            ),
        })
    }

    pub fn attribution_segments(&self) -> Option<usize> {
        let attribution = self.attribution.as_ref()?;
        attribution
            .enabled
            .unwrap_or(false)
            .then(|| attribution.segments.unwrap_or(DEFAULT_SEGMENTS))
    }

    pub fn synthetic_ticks(&self) -> usize {
        self.data
            .synthetic_ticks
            .unwrap_or_else(|| self.input_sizes().into_iter().max().unwrap_or(DEFAULT_SYNTHETIC_TICKS))
    }

    pub fn symbol(&self) -> &str {
        self.data.symbol.as_deref().unwrap_or(DEFAULT_SYMBOL)
    }

    pub fn out_dir(&self) -> &str {
        self.output
            .as_ref()
            .and_then(|o| o.out_dir.as_deref())
            .unwrap_or(DEFAULT_OUT_DIR)
    }

    pub fn log_level(&self) -> &str {
        self.output
            .as_ref()
            .and_then(|o| o.log_level.as_deref())
            .unwrap_or("info")
    }

    pub fn log_format(&self) -> &str {
        self.output
            .as_ref()
            .and_then(|o| o.log_format.as_deref())
            .unwrap_or("pretty")
    }

    pub fn validate(&self) -> Result<(), String> {
        let sizes = self.input_sizes();
        if sizes.is_empty() {
            return Err("bench.input_sizes must not be empty".to_string());
        }
        if sizes.iter().any(|&n| n == 0) {
            return Err("bench.input_sizes must all be > 0".to_string());
        }
        if self.repeats() == 0 {
            return Err("bench.repeats must be > 0".to_string());
        }
        if self.window() == 0 {
            return Err("bench.window must be > 0".to_string());
        }
        if self.bench.strategies.as_ref().is_some_and(|s| s.is_empty()) {
            return Err("bench.strategies must not be empty".to_string());
        }
        self.strategies()?;
        if let Some(sampling) = self.memory_sampling() {
            if sampling.interval.is_zero() {
                return Err("memory.interval_ms must be > 0".to_string());
            }
            if sampling.max_sampling < sampling.interval {
                return Err("memory.max_sampling_ms must be >= memory.interval_ms".to_string());
            }
        }
        if self.attribution_segments() == Some(0) {
            return Err("attribution.segments must be > 0".to_string());
        }
        if self.data.csv_path.is_none() && self.synthetic_ticks() == 0 {
            return Err("data.synthetic_ticks must be > 0 when data.csv_path is unset".to_string());
        }
        match self.log_format().trim().to_lowercase().as_str() {
            "pretty" | "json" => {}
            other => {
                return Err(format!(
                    "unsupported output.log_format '{other}' (use: pretty | json)"
                ))
            }
        }
        Ok(())
    }

    pub fn bench_plan(&self) -> Result<BenchPlan, String> {
        self.validate()?;
        Ok(BenchPlan {
            input_sizes: self.input_sizes(),
            repeats: self.repeats(),
            strategies: self.strategies()?,
            memory: self.memory_sampling(),
            attribution_segments: self.attribution_segments(),
        })
    }
}

pub fn load_config(path: &Path) -> Result<Config, String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("failed to read config {}: {}", path.display(), err))?;
    load_config_from_str(&contents)
        .map_err(|err| format!("failed to parse TOML {}: {}", path.display(), err))
}

pub fn load_config_from_str(contents: &str) -> Result<Config, String> {
    toml::from_str(contents).map_err(|err| err.to_string())
}

pub fn to_toml_pretty(config: &Config) -> Result<String, String> {
    toml::to_string_pretty(config)
        .map_err(|err| format!("failed to serialize config as TOML: {err}"))
}

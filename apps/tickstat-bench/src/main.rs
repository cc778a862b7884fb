use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tickstat_application::config::{
    load_config, to_toml_pretty, AttributionConfig, Config, MemoryConfig, OutputConfig,
};
use tickstat_application::market_data::{load_ticks, SyntheticTickSource};
use tickstat_application::reporting::{build_series, write_report};
use tickstat_domain::entities::benchmark::BenchmarkResult;
use tickstat_domain::repositories::market_data::TickSource;
use tickstat_domain::repositories::memory::MemoryProbe;
use tickstat_infrastructure::artifacts::FilesystemArtifactWriter;
use tickstat_infrastructure::market_data::CsvTickSource;
use tickstat_infrastructure::memory::ProcfsRssProbe;

mod obs;

#[derive(Parser, Debug)]
#[command(name = "tickstat-bench")]
#[command(about = "Compare moving-average signal strategies by time and peak memory")]
struct Args {
    /// TOML config; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tick CSV with `timestamp,symbol,price` columns. Synthetic ticks are used when absent.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Number of synthetic ticks to generate (default: largest input size).
    #[arg(long)]
    synthetic_ticks: Option<usize>,

    /// Input sizes, comma-separated (e.g. 1000,10000,100000).
    #[arg(long, value_delimiter = ',')]
    sizes: Option<Vec<usize>>,

    /// Timed trials per (strategy, size); the minimum is reported.
    #[arg(long)]
    repeats: Option<usize>,

    /// Strategies, comma-separated: full_history | fixed_window | running_aggregate.
    #[arg(long, value_delimiter = ',')]
    strategies: Option<Vec<String>>,

    /// Window length for fixed_window.
    #[arg(long)]
    window: Option<usize>,

    /// Skip the peak-memory run.
    #[arg(long, default_value_t = false)]
    no_memory: bool,

    /// Time every update and report per-segment costs (default: 10 segments).
    #[arg(long, num_args = 0..=1, default_missing_value = "10")]
    attribution: Option<usize>,

    /// Report output directory (results.csv, series.json, attribution.json).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Do not write report files.
    #[arg(long, default_value_t = false)]
    no_report: bool,

    /// Print one JSON line per result instead of human output.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Prometheus metrics listen addr (e.g. 127.0.0.1:9898). Optional.
    #[arg(long)]
    metrics_addr: Option<String>,

    /// Write a CPU profile as an SVG flamegraph to this path (requires feature `pprof`).
    #[arg(long)]
    profile_svg: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    let config = match resolve_config(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = obs::init_tracing(config.log_level(), config.log_format()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
    if let Err(err) = obs::init_metrics(args.metrics_addr.as_deref()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }

    if let Err(err) = run(&args, &config) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Loads the optional TOML file and layers CLI flags on top.
fn resolve_config(args: &Args) -> Result<Config, String> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    if let Some(path) = &args.csv {
        config.data.csv_path = Some(path.display().to_string());
    }
    if args.synthetic_ticks.is_some() {
        config.data.synthetic_ticks = args.synthetic_ticks;
    }
    if args.sizes.is_some() {
        config.bench.input_sizes = args.sizes.clone();
    }
    if args.repeats.is_some() {
        config.bench.repeats = args.repeats;
    }
    if args.strategies.is_some() {
        config.bench.strategies = args.strategies.clone();
    }
    if args.window.is_some() {
        config.bench.window = args.window;
    }
    if args.no_memory {
        config.memory.get_or_insert_with(MemoryConfig::default).enabled = Some(false);
    }
    if let Some(segments) = args.attribution {
        let attribution = config
            .attribution
            .get_or_insert_with(AttributionConfig::default);
        attribution.enabled = Some(true);
        attribution.segments = Some(segments);
    }
    if let Some(out) = &args.out {
        config.output.get_or_insert_with(OutputConfig::default).out_dir =
            Some(out.display().to_string());
    }

    config.validate()?;
    Ok(config)
}

fn run(args: &Args, config: &Config) -> Result<(), String> {
    #[cfg(feature = "pprof")]
    let guard = if let Some(path) = &args.profile_svg {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create {}: {err}", parent.display()))?;
        }
        Some(
            pprof::ProfilerGuard::new(100)
                .map_err(|err| format!("failed to start profiler: {err}"))?,
        )
    } else {
        None
    };

    #[cfg(not(feature = "pprof"))]
    if args.profile_svg.is_some() {
        return Err("profiling requires tickstat-bench feature `pprof`".to_string());
    }

    let source: Box<dyn TickSource> = match &config.data.csv_path {
        Some(path) => Box::new(CsvTickSource::new(path)),
        None => Box::new(SyntheticTickSource::new(
            config.synthetic_ticks(),
            config.symbol(),
        )),
    };
    let ticks = load_ticks(source.as_ref())?;

    let plan = config.bench_plan()?;
    let rss = ProcfsRssProbe::new();
    let probe: Option<&dyn MemoryProbe> = plan.memory.map(|_| &rss as &dyn MemoryProbe);
    let results = tickstat_application::benchmarking::run_benchmarks(&ticks, &plan, probe)?;

    #[cfg(feature = "pprof")]
    if let (Some(guard), Some(path)) = (guard, &args.profile_svg) {
        let report = guard
            .report()
            .build()
            .map_err(|err| format!("failed to build profile report: {err}"))?;
        let file = fs::File::create(path)
            .map_err(|err| format!("failed to create {}: {err}", path.display()))?;
        report
            .flamegraph(file)
            .map_err(|err| format!("failed to write flamegraph: {err}"))?;
        tracing::info!(profile_svg = %path.display(), "wrote cpu profile flamegraph");
    }

    if args.json {
        print_json(&results)?;
    } else {
        print_human(source.describe(), &results);
    }

    if !args.no_report {
        let out_dir = Path::new(config.out_dir());
        let report = write_report(out_dir, &results, &FilesystemArtifactWriter::new())?;
        let snapshot = out_dir.join("config.toml");
        fs::write(&snapshot, to_toml_pretty(config)?)
            .map_err(|err| format!("failed to write {}: {err}", snapshot.display()))?;
        if !args.json {
            println!("report: {}", report.out_dir.display());
            for file in report.files.iter().chain(std::iter::once(&snapshot)) {
                println!("  {}", file.display());
            }
        }
    }
    Ok(())
}

fn print_json(results: &[BenchmarkResult]) -> Result<(), String> {
    for result in results {
        let line = serde_json::to_string(result)
            .map_err(|err| format!("failed to serialize result: {err}"))?;
        println!("{line}");
    }
    Ok(())
}

fn print_human(source: String, results: &[BenchmarkResult]) {
    println!("source: {source}");
    println!(
        "{:<20} {:>10} {:>14} {:>12} {:>12}",
        "strategy", "n", "seconds(min)", "peak MiB", "return"
    );
    for r in results {
        let mib = r
            .peak_memory_mib
            .map(|m| format!("{m:.2}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<20} {:>10} {:>14.6} {:>12} {:>12.6}",
            r.strategy_name, r.input_size, r.elapsed_seconds, mib, r.total_return
        );
        if let Some(attribution) = &r.attribution {
            let costs: Vec<String> = attribution
                .segments
                .iter()
                .map(|s| format!("{:.0}", s.mean_ns))
                .collect();
            println!(
                "    per update: mean={:.0}ns p50={}ns p99={}ns max={}ns segments(ns)=[{}]",
                attribution.mean_ns,
                attribution.p50_ns,
                attribution.p99_ns,
                attribution.max_ns,
                costs.join(", ")
            );
        }
    }

    for series in build_series(results) {
        let growth: Vec<String> = series
            .time_growth()
            .iter()
            .map(|(size_ratio, time_ratio)| format!("x{size_ratio:.1} -> x{time_ratio:.1}"))
            .collect();
        if !growth.is_empty() {
            println!("growth {}: {}", series.strategy_name, growth.join(", "));
        }
    }
}

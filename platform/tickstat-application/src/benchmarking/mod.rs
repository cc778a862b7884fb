use std::time::Instant;
use tickstat_domain::entities::benchmark::{bytes_to_mib, BenchmarkResult};
use tickstat_domain::repositories::memory::MemoryProbe;
use tickstat_domain::services::strategy::{Strategy, StrategyKind};
use tickstat_domain::value_objects::tick::Tick;
use tracing::info_span;

mod attribution;
mod memory;

pub use attribution::{attribute_steps, summarize};
pub use memory::{sample_peak, MemorySampling, PeakSample};

#[derive(Debug, Clone, PartialEq)]
pub struct BenchPlan {
    pub input_sizes: Vec<usize>,
    pub repeats: usize,
    pub strategies: Vec<StrategyKind>,
    /// `None` skips the peak-memory run.
    pub memory: Option<MemorySampling>,
    /// `Some(segments)` adds a per-update attribution run.
    pub attribution_segments: Option<usize>,
}

impl BenchPlan {
    pub fn validate(&self, available_ticks: usize) -> Result<(), String> {
        if self.input_sizes.is_empty() {
            return Err("input_sizes must not be empty".to_string());
        }
        if let Some(&n) = self.input_sizes.iter().find(|&&n| n == 0) {
            return Err(format!("input size must be > 0 (got {n})"));
        }
        if let Some(&n) = self.input_sizes.iter().find(|&&n| n > available_ticks) {
            return Err(format!(
                "input size {n} exceeds the {available_ticks} ticks available"
            ));
        }
        if self.repeats == 0 {
            return Err("repeats must be > 0".to_string());
        }
        if self.strategies.is_empty() {
            return Err("at least one strategy is required".to_string());
        }
        if self.attribution_segments == Some(0) {
            return Err("attribution segments must be > 0".to_string());
        }
        for kind in &self.strategies {
            kind.build()
                .map_err(|err| format!("invalid strategy {kind}: {err}"))?;
        }
        Ok(())
    }
}

/// Feeds every tick's price to `strategy`, in order.
pub fn run_strategy(strategy: &mut dyn Strategy, ticks: &[Tick]) -> Result<(), String> {
    for (idx, tick) in ticks.iter().enumerate() {
        strategy
            .update(tick.price)
            .map_err(|err| format!("{} update {idx} failed: {err}", strategy.name()))?;
    }
    Ok(())
}

/// Fastest wall-clock time over `repeats` trials. Every trial builds its own
/// strategy; the instance from the last trial is returned for inspection.
pub fn time_min(
    kind: &StrategyKind,
    ticks: &[Tick],
    repeats: usize,
) -> Result<(f64, Box<dyn Strategy>), String> {
    time_trials(ticks, repeats, kind.label(), || {
        kind.build().map_err(|err| err.to_string())
    })
}

/// Trial loop behind [`time_min`]. The previous trial's instance is dropped
/// before the next one is built, so at most one is alive at a time.
pub fn time_trials<F>(
    ticks: &[Tick],
    repeats: usize,
    label: &'static str,
    mut build: F,
) -> Result<(f64, Box<dyn Strategy>), String>
where
    F: FnMut() -> Result<Box<dyn Strategy>, String>,
{
    if repeats == 0 {
        return Err("repeats must be > 0".to_string());
    }
    let mut best = f64::INFINITY;
    let mut last: Option<Box<dyn Strategy>> = None;
    for _ in 0..repeats {
        drop(last.take());
        let start = Instant::now();
        let mut strategy = build()?;
        run_strategy(strategy.as_mut(), ticks)?;
        let elapsed = start.elapsed().as_secs_f64();
        best = best.min(elapsed);
        metrics::counter!("tickstat.bench.trials_total", "strategy" => label).increment(1);
        last = Some(strategy);
    }
    let strategy = last.ok_or_else(|| "no trial ran".to_string())?;
    Ok((best, strategy))
}

/// Peak resident memory (MiB) over one fresh run of `kind`.
pub fn peak_memory_mib(
    kind: &StrategyKind,
    ticks: &[Tick],
    probe: &dyn MemoryProbe,
    sampling: MemorySampling,
) -> Result<f64, String> {
    let (outcome, peak) = sample_peak(probe, sampling, || {
        let mut strategy = kind.build().map_err(|err| err.to_string())?;
        run_strategy(strategy.as_mut(), ticks)
    })?;
    outcome?;
    tracing::debug!(
        strategy = kind.label(),
        samples = peak.samples,
        peak_bytes = peak.peak_bytes,
        "memory sampled"
    );
    Ok(bytes_to_mib(peak.peak_bytes))
}

/// Runs every (size, strategy) pair of `plan` over prefixes of `ticks`.
/// Results come back grouped by size, in plan order.
pub fn run_benchmarks(
    ticks: &[Tick],
    plan: &BenchPlan,
    probe: Option<&dyn MemoryProbe>,
) -> Result<Vec<BenchmarkResult>, String> {
    let _span = info_span!(
        "run_benchmarks",
        sizes = ?plan.input_sizes,
        repeats = plan.repeats,
        strategies = plan.strategies.len()
    )
    .entered();

    plan.validate(ticks.len())?;
    let probe = match (plan.memory, probe) {
        (Some(sampling), Some(probe)) => Some((sampling, probe)),
        (Some(_), None) => return Err("memory sampling requested without a probe".to_string()),
        (None, _) => None,
    };

    let mut results = Vec::with_capacity(plan.input_sizes.len() * plan.strategies.len());
    for &n in &plan.input_sizes {
        let prefix = &ticks[..n];
        for kind in &plan.strategies {
            let _measure = info_span!("measure", strategy = kind.label(), n).entered();

            let (elapsed_seconds, strategy) = time_min(kind, prefix, plan.repeats)?;
            let total_return = strategy
                .total_return()
                .map_err(|err| format!("{kind} over {n} ticks: {err}"))?;
            let signals_emitted = strategy.signals().len();
            drop(strategy);

            let peak_mib = match probe {
                Some((sampling, probe)) => Some(peak_memory_mib(kind, prefix, probe, sampling)?),
                None => None,
            };

            let attribution = match plan.attribution_segments {
                Some(segments) => {
                    let mut fresh = kind.build().map_err(|err| err.to_string())?;
                    Some(attribute_steps(fresh.as_mut(), prefix, segments)?)
                }
                None => None,
            };

            metrics::histogram!("tickstat.bench.elapsed_seconds", "strategy" => kind.label())
                .record(elapsed_seconds);
            if let Some(mib) = peak_mib {
                metrics::gauge!("tickstat.bench.peak_memory_mib", "strategy" => kind.label())
                    .set(mib);
            }
            tracing::info!(
                strategy = kind.label(),
                n,
                elapsed_seconds,
                peak_memory_mib = ?peak_mib,
                total_return,
                "benchmark measured"
            );

            results.push(BenchmarkResult {
                strategy_name: kind.label().to_string(),
                input_size: n,
                elapsed_seconds,
                peak_memory_mib: peak_mib,
                repeats: plan.repeats,
                signals_emitted,
                total_return,
                attribution,
            });
        }
    }
    Ok(results)
}

use std::time::Instant;
use tickstat_domain::entities::benchmark::{SegmentCost, StepAttribution};
use tickstat_domain::services::strategy::Strategy;
use tickstat_domain::value_objects::tick::Tick;

/// Feeds `ticks` to `strategy`, timing every `update` call individually.
///
/// The run is split into `segments` contiguous slices so growth in per-call
/// cost over the run (full-history re-summing) shows up next to flat
/// constant-time variants.
pub fn attribute_steps(
    strategy: &mut dyn Strategy,
    ticks: &[Tick],
    segments: usize,
) -> Result<StepAttribution, String> {
    if segments == 0 {
        return Err("attribution segments must be > 0".to_string());
    }

    let mut costs = Vec::with_capacity(ticks.len());
    for (idx, tick) in ticks.iter().enumerate() {
        let start = Instant::now();
        let outcome = strategy.update(tick.price);
        costs.push(start.elapsed().as_nanos() as u64);
        outcome.map_err(|err| format!("{} update {idx} failed: {err}", strategy.name()))?;
    }

    Ok(summarize(&costs, segments))
}

pub fn summarize(costs: &[u64], segments: usize) -> StepAttribution {
    let calls = costs.len();
    let total_ns: u128 = costs.iter().map(|&c| c as u128).sum();
    let mean_ns = if calls > 0 {
        total_ns as f64 / calls as f64
    } else {
        0.0
    };

    let mut sorted = costs.to_vec();
    sorted.sort_unstable();

    // Boundaries at `i * calls / n` give exactly `min(calls, segments)`
    // non-empty slices whose lengths differ by at most one.
    let n = segments.min(calls);
    let segments = (0..n)
        .map(|i| {
            let start = i * calls / n;
            let end = (i + 1) * calls / n;
            let slice = &costs[start..end];
            SegmentCost {
                start,
                calls: slice.len(),
                mean_ns: slice.iter().map(|&c| c as f64).sum::<f64>() / slice.len() as f64,
            }
        })
        .collect();

    StepAttribution {
        calls,
        total_seconds: total_ns as f64 / 1e9,
        mean_ns,
        p50_ns: percentile(&sorted, 50),
        p99_ns: percentile(&sorted, 99),
        max_ns: sorted.last().copied().unwrap_or(0),
        segments,
    }
}

/// Nearest-rank percentile over an ascending slice.
fn percentile(sorted: &[u64], pct: usize) -> u64 {
    if sorted.is_empty() {
        return 0;
    }
    let rank = (pct * sorted.len()).div_ceil(100).max(1);
    sorted[rank.min(sorted.len()) - 1]
}

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tickstat_domain::repositories::memory::MemoryProbe;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemorySampling {
    pub interval: Duration,
    /// Upper bound on how long the sampler keeps polling, whether or not the
    /// measured work has finished.
    pub max_sampling: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeakSample {
    pub peak_bytes: u64,
    pub samples: usize,
}

/// Runs `work` on the calling thread while a scoped thread polls `probe`
/// every `sampling.interval`. Returns the work's output and the largest
/// resident size seen, including one sample before and one after the work.
pub fn sample_peak<R>(
    probe: &dyn MemoryProbe,
    sampling: MemorySampling,
    work: impl FnOnce() -> R,
) -> Result<(R, PeakSample), String> {
    if sampling.interval.is_zero() {
        return Err("memory sampling interval must be > 0".to_string());
    }

    let baseline = probe.resident_bytes()?;
    let stop = AtomicBool::new(false);

    let (output, sampled) = thread::scope(|scope| {
        let sampler = scope.spawn(|| poll(probe, sampling, &stop));
        let output = work();
        stop.store(true, Ordering::Release);
        let sampled = sampler
            .join()
            .map_err(|_| "memory sampler thread panicked".to_string())
            .and_then(|res| res);
        (output, sampled)
    });
    let sampled = sampled?;
    let after = probe.resident_bytes()?;

    Ok((
        output,
        PeakSample {
            peak_bytes: baseline.max(after).max(sampled.peak_bytes),
            samples: sampled.samples + 2,
        },
    ))
}

fn poll(
    probe: &dyn MemoryProbe,
    sampling: MemorySampling,
    stop: &AtomicBool,
) -> Result<PeakSample, String> {
    let started = Instant::now();
    let mut peak = PeakSample {
        peak_bytes: 0,
        samples: 0,
    };
    while !stop.load(Ordering::Acquire) && started.elapsed() < sampling.max_sampling {
        let bytes = probe.resident_bytes()?;
        peak.peak_bytes = peak.peak_bytes.max(bytes);
        peak.samples += 1;
        thread::sleep(sampling.interval);
    }
    if !stop.load(Ordering::Acquire) {
        tracing::warn!(
            max_sampling_ms = sampling.max_sampling.as_millis() as u64,
            "memory sampling stopped before work finished"
        );
    }
    Ok(peak)
}

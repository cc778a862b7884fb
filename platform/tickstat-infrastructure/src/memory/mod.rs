use tickstat_domain::repositories::memory::MemoryProbe;

const PROC_STATUS: &str = "/proc/self/status";

/// Resident set size of the current process, read from `VmRSS` in
/// `/proc/self/status`. Linux only.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcfsRssProbe;

impl ProcfsRssProbe {
    pub fn new() -> Self {
        Self
    }
}

impl MemoryProbe for ProcfsRssProbe {
    #[cfg(target_os = "linux")]
    fn resident_bytes(&self) -> Result<u64, String> {
        let status = std::fs::read_to_string(PROC_STATUS)
            .map_err(|err| format!("failed to read {PROC_STATUS}: {err}"))?;
        parse_vm_rss(&status)
    }

    #[cfg(not(target_os = "linux"))]
    fn resident_bytes(&self) -> Result<u64, String> {
        Err(format!(
            "resident memory probe needs {PROC_STATUS} (linux only); disable memory sampling"
        ))
    }
}

/// Extracts `VmRSS` (reported in kB) as bytes.
pub fn parse_vm_rss(status: &str) -> Result<u64, String> {
    let line = status
        .lines()
        .find(|line| line.starts_with("VmRSS:"))
        .ok_or_else(|| "VmRSS not found in process status".to_string())?;
    let mut parts = line["VmRSS:".len()..].split_whitespace();
    let value: u64 = parts
        .next()
        .ok_or_else(|| format!("malformed VmRSS line: {line}"))?
        .parse()
        .map_err(|err| format!("malformed VmRSS value in {line:?}: {err}"))?;
    match parts.next() {
        Some("kB") | None => Ok(value * 1024),
        Some(unit) => Err(format!("unexpected VmRSS unit {unit}")),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_vm_rss, ProcfsRssProbe};
    use tickstat_domain::repositories::memory::MemoryProbe;

    #[test]
    fn parses_vm_rss_in_kib() {
        let status = "Name:\ttickstat\nVmPeak:\t  20000 kB\nVmRSS:\t    1536 kB\nThreads:\t1\n";
        assert_eq!(parse_vm_rss(status), Ok(1536 * 1024));
    }

    #[test]
    fn rejects_missing_or_malformed_rss() {
        assert!(parse_vm_rss("Name:\tx\n").is_err());
        assert!(parse_vm_rss("VmRSS:\tlots kB\n").is_err());
        assert!(parse_vm_rss("VmRSS:\t12 MB\n").is_err());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn live_probe_reports_nonzero_rss() {
        let bytes = ProcfsRssProbe::new().resident_bytes().expect("rss");
        assert!(bytes > 0);
    }

    #[cfg(not(target_os = "linux"))]
    #[test]
    fn live_probe_is_unsupported_off_linux() {
        assert!(ProcfsRssProbe::new().resident_bytes().is_err());
    }
}

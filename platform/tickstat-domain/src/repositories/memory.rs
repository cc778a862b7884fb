/// Reads the current resident set size of this process.
///
/// Implementations are polled from a sampling thread while a strategy runs,
/// so they must be shareable across threads and must not block for long.
pub trait MemoryProbe: Send + Sync {
    fn resident_bytes(&self) -> Result<u64, String>;
}

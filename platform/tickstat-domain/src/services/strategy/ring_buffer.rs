use crate::errors::StrategyError;

/// Fixed-capacity FIFO over `f64` backed by a single allocation.
///
/// Slots are addressed by position: `head` is the oldest value once the buffer
/// has filled, and a push into a full buffer overwrites that slot in place.
#[derive(Debug, Clone)]
pub struct RingBuffer {
    slots: Vec<f64>,
    capacity: usize,
    head: usize,
}

impl RingBuffer {
    /// Reserves every slot up front; a capacity that cannot be allocated is
    /// an error rather than an abort.
    pub fn new(capacity: usize) -> Result<Self, StrategyError> {
        if capacity == 0 {
            return Err(StrategyError::InvalidWindow(capacity));
        }
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| StrategyError::WindowTooLarge(capacity))?;
        Ok(Self {
            slots,
            capacity,
            head: 0,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() == self.capacity
    }

    /// The value a `push` would evict right now.
    pub fn next_eviction(&self) -> Option<f64> {
        self.is_full().then(|| self.slots[self.head])
    }

    /// Appends `value`, returning the evicted oldest value when full.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        if !self.is_full() {
            self.slots.push(value);
            return None;
        }
        let evicted = std::mem::replace(&mut self.slots[self.head], value);
        self.head = (self.head + 1) % self.capacity;
        Some(evicted)
    }

    pub fn front(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        Some(self.slots[self.head])
    }

    pub fn back(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let idx = (self.head + self.slots.len() - 1) % self.capacity;
        Some(self.slots[idx])
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        let (newer, older) = self.slots.split_at(self.head);
        older.iter().chain(newer.iter()).copied()
    }
}

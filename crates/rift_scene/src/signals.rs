//! Frame-scoped signal bits
//!
//! Signals connect senders (triggers, buttons) to consumers (doors,
//! cutscenes) without direct references. The set resets exactly once per
//! frame, before any gameplay update runs, so a signal only reads active in
//! the frame it was sent.

/// A fixed-size bit set of signals, reset every frame
#[derive(Debug, Clone)]
pub struct SignalSet {
    bits: Vec<u64>,
    count: usize,
}

impl SignalSet {
    /// Create a set holding `count` signals, all inactive
    pub fn new(count: usize) -> Self {
        Self {
            bits: vec![0; count.div_ceil(64)],
            count,
        }
    }

    /// Number of signals in the set
    pub fn count(&self) -> usize {
        self.count
    }

    /// Clear every signal. Called once at the top of each frame.
    pub fn reset(&mut self) {
        self.bits.fill(0);
    }

    /// Activate a signal for the rest of the current frame
    pub fn send(&mut self, index: u32) {
        let index = index as usize;
        if index < self.count {
            self.bits[index / 64] |= 1 << (index % 64);
        }
    }

    /// Whether a signal was sent this frame
    pub fn is_active(&self, index: u32) -> bool {
        let index = index as usize;
        index < self.count && (self.bits[index / 64] >> (index % 64)) & 1 != 0
    }
}
